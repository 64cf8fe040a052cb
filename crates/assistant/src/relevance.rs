//! Question relevance and classification.

use aisle_model::QuestionKind;
use regex::Regex;
use std::sync::LazyLock;

/// Topics the assistant does not treat as questions about the product.
static OFF_TOPIC_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // Politics
        r"(?i)\b(president|prime minister|government|politics|election|minister|parliament|congress|senate)\b",
        // General knowledge
        r"(?i)\b(who is|what is|when did|where is|why did|how many|capital of|currency of)\b.*\b(country|nation|state|city|world|universe|planet|earth|history|war|battle)\b",
        // Science and academics
        r"(?i)\b(formula|equation|theory|law of|scientific|chemistry|physics|biology|mathematics|calculate|solve)\b",
        // Sports and entertainment
        r"(?i)\b(football|cricket|basketball|movie|actor|actress|singer|music|song|album|film|celebrity)\b",
        // Weather and time
        r"(?i)\b(weather|temperature|rain|snow|today|tomorrow|yesterday|time|date|calendar)\b",
        // Personal
        r"(?i)\b(my name|your name|who are you|where do you live|how old|birthday|age)\b",
        // Cooking procedures are general knowledge, not product questions
        r"(?i)\b(recipe|recipie|recepy|receipe|how to make|how to cook|cooking|preparation|ingredients|steps|method|procedure)\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("off-topic pattern is valid"))
    .collect()
});

static NUTRITION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)calories?|nutrition|nutritional|energy").expect("nutrition pattern is valid")
});

static NEGATIVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(not|no|doesn't|isn't|cannot|can't|unsuitable|bad)\b")
        .expect("negative pattern is valid")
});

const PRODUCT_KEYWORDS: &[&str] = &[
    "product", "item", "buy", "purchase", "price", "cost", "quality", "features",
    "specifications", "size", "weight", "color", "material", "brand", "model",
    "warranty", "guarantee", "return", "shipping", "delivery", "installation",
    "usage", "use", "how to", "instructions", "manual", "guide", "setup",
    "maintenance", "care", "clean", "store", "compatible", "works with",
    "suitable", "good for", "best for", "recommended", "reviews", "rating",
    "comparison", "vs", "versus", "better", "difference", "alternative",
    "similar", "like this", "durability", "lasting", "lifespan", "performance",
];

const QUESTION_WORDS: &[&str] = &[
    "how", "what", "when", "where", "why", "which", "can", "will", "does", "is", "are",
];

/// Short questions with a question word are given the benefit of the doubt.
const SHORT_QUESTION_LEN: usize = 50;

/// Decide whether a question is about the named product.
///
/// Off-topic patterns win over everything. Otherwise the question is
/// relevant when it names the product, uses a shopping keyword, or is a
/// short question.
pub fn is_question_relevant(question: &str, product_name: &str) -> bool {
    let q = question.to_lowercase();

    if OFF_TOPIC_PATTERNS.iter().any(|re| re.is_match(&q)) {
        return false;
    }

    let name = product_name.to_lowercase();
    if name
        .split(' ')
        .any(|word| word.chars().count() > 2 && q.contains(word))
    {
        return true;
    }

    if PRODUCT_KEYWORDS.iter().any(|k| q.contains(k)) {
        return true;
    }

    QUESTION_WORDS.iter().any(|w| q.contains(w)) && q.chars().count() < SHORT_QUESTION_LEN
}

/// Check whether a question asks about calories or nutrition.
pub fn is_nutrition_question(question: &str) -> bool {
    NUTRITION_RE.is_match(question)
}

/// Check whether an answer reads as a negative verdict.
pub fn is_negative_answer(answer: &str) -> bool {
    NEGATIVE_RE.is_match(answer)
}

/// Classify a question; the first matching group wins.
pub fn classify_question(question: &str) -> QuestionKind {
    const GROUPS: &[(QuestionKind, &[&str])] = &[
        (QuestionKind::Usage, &["how", "cook", "use", "install"]),
        (QuestionKind::Comparison, &["compare", "vs", "better", "difference"]),
        (QuestionKind::Pricing, &["price", "cost", "cheap", "expensive"]),
        (QuestionKind::Policy, &["warranty", "guarantee", "return", "policy"]),
        (QuestionKind::Specifications, &["size", "dimensions", "weight", "fit"]),
        (QuestionKind::Logistics, &["delivery", "shipping", "when", "arrive"]),
    ];

    let q = question.to_lowercase();
    GROUPS
        .iter()
        .find(|(_, words)| words.iter().any(|w| q.contains(w)))
        .map(|(kind, _)| *kind)
        .unwrap_or(QuestionKind::General)
}
