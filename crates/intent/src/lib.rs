//! Search intent extraction.
//!
//! Converts a free-text shopping query into a `SearchIntent`:
//! - An ordered priority chain of classification rules (first match wins)
//! - Recipe dish vocabulary with ingredient expansion
//! - Skin type and clothing keyword detection
//! - Budget extraction from currency amounts

use aisle_features::{
    all_present, contains_any, extract_budget, first_present, normalize_query, tokenize,
    CURRENCY_SYMBOL,
};
use aisle_model::{IntentType, SearchIntent};

/// Dish names recognized in recipe queries.
pub const DISHES: &[&str] = &["fried rice", "biryani", "stir fry", "pasta", "curry", "soup"];

/// Skin types, highest priority first.
pub const SKIN_TYPES: &[&str] = &["oily", "dry", "sensitive", "combination"];

const RECIPE_TRIGGERS: &[&str] = &["cook", "recipe", "make"];
const SKINCARE_TRIGGERS: &[&str] = &["skin", "face", "sunscreen", "oily", "dry", "acne"];
const CLOTHING_TRIGGERS: &[&str] = &["jacket", "shirt", "wear", "clothing"];
const CLOTHING_KEYWORDS: &[&str] = &["jacket", "shirt", "winter", "casual"];

/// Tokens shorter than or equal to this are dropped from generic queries.
const MIN_KEYWORD_LEN: usize = 2;

/// Ingredients needed for a dish. Dishes without an entry expand to nothing.
pub fn ingredients_for(dish: &str) -> &'static [&'static str] {
    match dish {
        "fried rice" => &["rice", "soy sauce", "onions", "oil", "eggs", "vegetables"],
        "biryani" => &["basmati rice", "spices", "onions", "meat", "yogurt"],
        "stir fry" => &["vegetables", "soy sauce", "oil", "garlic", "ginger"],
        _ => &[],
    }
}

/// One link in the classification priority chain.
#[derive(Debug, Clone, Copy)]
pub struct IntentRule {
    pub intent_type: IntentType,
    /// Human-readable description of what triggers the rule
    pub description: &'static str,
    predicate: fn(&str) -> bool,
}

impl IntentRule {
    /// Check the rule against an already lowercased query.
    pub fn matches(&self, query: &str) -> bool {
        (self.predicate)(query)
    }
}

/// Classification rules in priority order. The checks overlap, so order
/// decides the outcome: "make my face glow" is a recipe query.
pub const RULES: &[IntentRule] = &[
    IntentRule {
        intent_type: IntentType::Recipe,
        description: "mentions cook, recipe or make",
        predicate: is_recipe_query,
    },
    IntentRule {
        intent_type: IntentType::Skincare,
        description: "mentions skin, face, sunscreen, oily, dry or acne",
        predicate: is_skincare_query,
    },
    IntentRule {
        intent_type: IntentType::Clothing,
        description: "mentions a garment, or 'under' with a currency amount",
        predicate: is_clothing_query,
    },
];

fn is_recipe_query(q: &str) -> bool {
    contains_any(q, RECIPE_TRIGGERS)
}

fn is_skincare_query(q: &str) -> bool {
    contains_any(q, SKINCARE_TRIGGERS)
}

fn is_clothing_query(q: &str) -> bool {
    contains_any(q, CLOTHING_TRIGGERS) || (q.contains("under") && q.contains(CURRENCY_SYMBOL))
}

/// Trait for turning query text into a search intent.
pub trait IntentExtractor {
    /// Extract an intent. Never fails; unknown queries become generic
    /// product searches.
    fn extract(&self, query: &str) -> SearchIntent;
}

/// Keyword and pattern based extractor walking `RULES` in order.
#[derive(Debug, Default)]
pub struct RuleBasedExtractor;

impl IntentExtractor for RuleBasedExtractor {
    fn extract(&self, query: &str) -> SearchIntent {
        let q = normalize_query(query);
        let intent_type = classify(&q);

        match intent_type {
            IntentType::Recipe => {
                let dishes = all_present(&q, DISHES);
                let ingredients: Vec<String> = dishes
                    .iter()
                    .flat_map(|d| ingredients_for(d).iter().map(|i| i.to_string()))
                    .collect();
                SearchIntent::new(IntentType::Recipe)
                    .with_keywords(dishes)
                    .with_ingredients(ingredients)
                    .with_category("Groceries")
            }
            IntentType::Skincare => {
                let mut intent = SearchIntent::new(IntentType::Skincare)
                    .with_keywords(skincare_keywords(&q))
                    .with_category("Skincare");
                intent.skin_type = first_present(&q, SKIN_TYPES).map(str::to_string);
                intent
            }
            IntentType::Clothing => {
                let mut intent = SearchIntent::new(IntentType::Clothing)
                    .with_keywords(all_present(&q, CLOTHING_KEYWORDS))
                    .with_category("Clothing");
                intent.budget = extract_budget(&q);
                intent
            }
            IntentType::Product => {
                let mut intent = SearchIntent::new(IntentType::Product)
                    .with_keywords(tokenize(&q, MIN_KEYWORD_LEN));
                intent.budget = extract_budget(&q);
                intent
            }
        }
    }
}

/// Walk the priority chain on a lowercased query.
pub fn classify(query: &str) -> IntentType {
    RULES
        .iter()
        .find(|rule| rule.matches(query))
        .map(|rule| rule.intent_type)
        .unwrap_or(IntentType::Product)
}

fn skincare_keywords(q: &str) -> Vec<String> {
    let mut keywords = Vec::new();
    if contains_any(q, &["sunscreen", "spf"]) {
        keywords.push("sunscreen".to_string());
    }
    if contains_any(q, &["cleanser", "face wash"]) {
        keywords.push("cleanser".to_string());
    }
    if q.contains("moisturizer") {
        keywords.push("moisturizer".to_string());
    }
    keywords
}

/// Extract an intent with the default rule-based extractor.
pub fn extract_intent(query: &str) -> SearchIntent {
    RuleBasedExtractor.extract(query)
}
