//! Canned answer and follow-up text for product questions.
//!
//! Templates use `{name}`, `{category}` and `{description}` placeholders.

use aisle_model::Product;

/// Broad product family used to pick answer templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductKind {
    Rice,
    Footwear,
    Skincare,
    Outerwear,
    Generic,
}

impl ProductKind {
    pub fn of(product: &Product) -> Self {
        let category = product.category.to_lowercase();
        let name = product.name.to_lowercase();

        if category.contains("pantry") || category.contains("rice") || name.contains("rice") {
            Self::Rice
        } else if category.contains("running")
            || category.contains("shoes")
            || name.contains("shoe")
            || name.contains("runner")
        {
            Self::Footwear
        } else if category.contains("sunscreen")
            || category.contains("cream")
            || category.contains("skincare")
        {
            Self::Skincare
        } else if category.contains("jacket")
            || category.contains("clothing")
            || name.contains("jacket")
        {
            Self::Outerwear
        } else {
            Self::Generic
        }
    }
}

/// One topic a product kind has templates for.
struct Topic {
    triggers: &'static [&'static str],
    templates: &'static [&'static str],
}

const RICE_TOPICS: &[Topic] = &[
    Topic {
        triggers: &["cook", "prevent", "stick"],
        templates: &[
            "To prevent your {name} from sticking, rinse the rice thoroughly before cooking to remove excess starch. Use a ratio of 1.5 cups of water per 1 cup of rice, and avoid lifting the lid during cooking to maintain consistent temperature and steam. After cooking, fluff gently with a fork instead of stirring vigorously.",
            "The key to fluffy {name} is proper rinsing! Wash the rice until the water runs clear, then use the absorption method with 1.5 cups water per cup of rice. Keep the lid on during cooking and let it steam for 10 minutes after cooking for perfect texture.",
            "For fluffy {name}, start by soaking the rice for 30 minutes, then rinse well. Use slightly less water (1.25 cups per cup of rice) and cook on low heat. The soaking helps achieve separate grains.",
            "Here's a chef's tip for {name}: toast the rice lightly in a dry pan before adding water. This creates a protective layer around each grain. Then add your water (1.5:1 ratio) and cook covered without stirring.",
        ],
    },
    Topic {
        triggers: &["biryani"],
        templates: &[
            "Yes, {name} is excellent for biryani! The long grains remain separate when cooked, giving you that authentic biryani texture. The aromatic quality and fluffy texture make it ideal for absorbing the rich flavors of biryani spices.",
            "Absolutely! {name} is one of the best choices for biryani. The long grains stay distinct and fluffy, and the natural aroma complements the spices beautifully.",
            "{name} is perfect for biryani! The aged grains expand beautifully and hold together during the layering process. The subtle nutty flavor enhances the overall taste without overpowering the spices.",
            "This {name} is ideal for biryani preparation. The grains have excellent elongation and keep their shape even after dum cooking, which is essential for perfect biryani texture.",
        ],
    },
    Topic {
        triggers: &["water"],
        templates: &[
            "For {name}, use a 1:1.5 ratio of rice to water. Bring to a boil, then reduce heat and simmer covered for 18-20 minutes.",
            "The ideal water ratio for {name} is 1.5 cups of water per cup of rice. Some prefer 1.25 cups for firmer grains. Always bring to a boil first, then simmer on low heat.",
            "I recommend 1.5 cups of water per cup of {name}. If you prefer slightly firmer rice, try 1.25 cups. The key is gentle heat after the initial boil.",
            "For {name}, start with 1.5 cups water per cup of rice. Adjust to taste: less water for firmer grains, slightly more for a softer texture.",
        ],
    },
];

const FOOTWEAR_TOPICS: &[Topic] = &[
    Topic {
        triggers: &["running", "distance", "comfort"],
        templates: &[
            "{name} are designed for comfort during running with a breathable mesh upper, responsive foam midsole, and durable rubber outsole for traction. They give great energy return and cushioning for daily runs and longer distances.",
            "These {name} excel in comfort with their cushioning system. The breathable design keeps feet cool, while the responsive midsole returns energy for efficient running.",
            "{name} offer superior comfort through an engineered mesh upper and plush midsole. The outsole pattern grips reliably on various running surfaces.",
            "The comfort of {name} comes from an anatomical design and quality materials. The cushioning adapts to your stride and supports you where you need it most.",
        ],
    },
    Topic {
        triggers: &["fit"],
        templates: &[
            "{name} typically fit true to size, with a secure feel and adequate toe room. The breathable upper adapts to your foot shape during runs.",
            "The fit of {name} is generally true to size, with a secure heel and roomy toe box. The upper conforms to your foot over time.",
            "{name} have a reliable, true-to-size fit. The lacing system allows customization, and the upper feels snug yet comfortable.",
            "These {name} fit as expected size-wise. The engineered upper is secure without being restrictive, and the toe area leaves space for natural movement.",
        ],
    },
];

const SKINCARE_TOPICS: &[Topic] = &[
    Topic {
        triggers: &["sensitive", "skin"],
        templates: &[
            "{name} is formulated to be gentle on sensitive skin. It gives broad-spectrum protection without harsh chemicals, and the lightweight formula absorbs quickly without a greasy residue.",
            "Yes, {name} works well for sensitive skin. It uses mineral-based ingredients that are less likely to cause reactions.",
            "{name} is designed with sensitive skin in mind. It contains soothing ingredients and avoids common irritants.",
            "This {name} is gentle enough for sensitive skin. The non-comedogenic formula won't clog pores and includes calming ingredients.",
        ],
    },
    Topic {
        triggers: &["reapply", "often"],
        templates: &[
            "For full protection with {name}, reapply every 2 hours outdoors, or right after swimming, sweating, or toweling off.",
            "Reapply {name} every 2 hours during sun exposure, and immediately after swimming or heavy sweating. Apply generously for full protection.",
            "The general rule for {name} is reapplication every 2 hours. If you're active or in water, reapply more frequently.",
            "With {name}, stick to the 2-hour reapplication rule. For beach days, consider every 90 minutes and always after water exposure.",
        ],
    },
];

const OUTERWEAR_TOPICS: &[Topic] = &[
    Topic {
        triggers: &["warm", "temperature"],
        templates: &[
            "{name} is designed to keep you warm in cold conditions. The insulation retains heat while staying breathable, and works down to freezing with layering.",
            "This {name} offers excellent warmth. The insulation traps body heat while letting moisture escape, which suits cold weather activities.",
            "{name} provides reliable warmth in cold conditions. The design minimizes heat loss while staying comfortable in motion.",
            "The warmth of {name} is impressive. The insulation handles cold temperatures and retains body heat without overheating during activity.",
        ],
    },
    Topic {
        triggers: &["waterproof", "water"],
        templates: &[
            "{name} features water-resistant technology that repels light rain and moisture, with a focus on wind and cold protection.",
            "This {name} handles light rain and snow well. For heavy downpours you may want extra rain protection, but it's great for everyday weather.",
            "{name} is effective against light moisture and drizzle. The coating sheds water while staying breathable.",
            "The water resistance of {name} suits moderate conditions. It handles light rain well and dries quickly.",
        ],
    },
];

const GENERIC_TEMPLATES: &[&str] = &[
    "{name} is a high-quality product in our {category} category. {description} It's designed to meet your needs with excellent performance and value.",
    "This {name} stands out in the {category} category. {description} The attention to detail and quality construction make it a reliable choice.",
    "{name} represents excellent value in the {category} space. {description} The thoughtful design and quality materials ensure long-lasting performance.",
    "You'll find {name} to be a solid choice in {category}. {description} The combination of quality and functionality makes it a popular option.",
];

/// Templates for the product kind and question, falling back to generic.
pub fn answer_templates(kind: ProductKind, question: &str) -> &'static [&'static str] {
    let topics: &[Topic] = match kind {
        ProductKind::Rice => RICE_TOPICS,
        ProductKind::Footwear => FOOTWEAR_TOPICS,
        ProductKind::Skincare => SKINCARE_TOPICS,
        ProductKind::Outerwear => OUTERWEAR_TOPICS,
        ProductKind::Generic => &[],
    };

    let q = question.to_lowercase();
    topics
        .iter()
        .find(|t| t.triggers.iter().any(|w| q.contains(w)))
        .map(|t| t.templates)
        .unwrap_or(GENERIC_TEMPLATES)
}

/// Fill placeholders from the product.
pub fn render(template: &str, product: &Product) -> String {
    template
        .replace("{name}", &product.name)
        .replace("{category}", &product.category)
        .replace("{description}", &product.description)
}

/// Suggested next questions for the product kind.
pub fn follow_up_questions(kind: ProductKind, question: &str) -> Vec<String> {
    let q = question.to_lowercase();
    let questions: &[&str] = match kind {
        ProductKind::Rice if q.contains("cook") || q.contains("stick") => &[
            "What spices work best with this rice?",
            "How long should I let it rest after cooking?",
            "Can I use this rice for other dishes?",
        ],
        ProductKind::Rice => &[
            "What's the best way to cook this rice?",
            "How much water should I use?",
            "Is this good for biryani?",
        ],
        ProductKind::Footwear => &[
            "What's the durability like?",
            "Are these good for different terrains?",
            "How does the cushioning compare to other brands?",
        ],
        ProductKind::Skincare => &[
            "Does it leave a white residue?",
            "Is this water resistant?",
            "What's the SPF level?",
        ],
        ProductKind::Outerwear | ProductKind::Generic => GENERIC_FOLLOW_UPS,
    };
    questions.iter().map(|s| s.to_string()).collect()
}

pub const GENERIC_FOLLOW_UPS: &[&str] = &[
    "What are the main features?",
    "How does this compare to similar products?",
    "What do customers say about this?",
];

pub const OFF_TOPIC_FOLLOW_UPS: &[&str] = &[
    "What are the main features?",
    "How does this compare to similar products?",
    "What's the quality like?",
];

pub const NUTRITION_FOLLOW_UPS: &[&str] = &[
    "What are the main macronutrients?",
    "Does it contain any allergens?",
    "Are there any vitamins or minerals present?",
];
