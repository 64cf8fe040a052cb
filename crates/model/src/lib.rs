//! Core domain model for the Aisle storefront.
//!
//! This crate defines the fundamental types used throughout the system:
//! - `Product`: An immutable catalog entry with its sentiment scores
//! - `SearchIntent`: The structured reading of a free-text query
//! - `SearchResults`: Strict and related product lists
//! - `QaAnswer`: A product assistant reply
//! - `Catalog`: The loaded, id-validated product list

mod catalog;

pub use catalog::{Catalog, CatalogError};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregate review sentiment for a product.
///
/// `positive` and `negative` are independent 0-100 scores and need not sum
/// to 100.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    pub positive: u8,
    pub negative: u8,
    /// Named facets (comfort, flavor, durability, ...) scored 0-100
    #[serde(default)]
    pub aspects: BTreeMap<String, u8>,
}

impl Sentiment {
    pub fn new(positive: u8, negative: u8) -> Self {
        Self {
            positive,
            negative,
            aspects: BTreeMap::new(),
        }
    }

    /// Positive minus negative, which may go below zero.
    pub fn net(&self) -> i16 {
        self.positive as i16 - self.negative as i16
    }
}

/// A product in the storefront catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique catalog identifier
    pub id: String,

    pub name: String,

    /// One-line description shown on cards
    #[serde(default)]
    pub description: String,

    /// Full description shown on the detail page
    #[serde(default)]
    pub long_description: String,

    /// Price as stored in the catalog (unit is not normalized)
    pub price: f64,

    pub category: String,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub sentiment: Sentiment,

    /// Free-text hint describing the product, searched by keyword filters
    #[serde(default, rename = "dataAiHint")]
    pub ai_hint: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Embeddable 3D model URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_src: Option<String>,
}

impl Product {
    /// Create a minimal product for testing.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        price: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            long_description: String::new(),
            price,
            category: category.into(),
            tags: Vec::new(),
            sentiment: Sentiment::default(),
            ai_hint: String::new(),
            image: None,
            model_src: None,
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_sentiment(mut self, positive: u8, negative: u8) -> Self {
        self.sentiment.positive = positive;
        self.sentiment.negative = negative;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Case-insensitive category comparison.
    pub fn in_category(&self, category: &str) -> bool {
        self.category.to_lowercase() == category.to_lowercase()
    }
}

/// The kind of shopping request a query expresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntentType {
    /// Generic product lookup
    Product,
    /// Cooking a dish; resolved to ingredients
    Recipe,
    Skincare,
    Clothing,
}

impl Default for IntentType {
    fn default() -> Self {
        Self::Product
    }
}

impl IntentType {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Product => "product",
            Self::Recipe => "recipe",
            Self::Skincare => "skincare",
            Self::Clothing => "clothing",
        }
    }
}

/// Inclusive price bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl PriceRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Range from zero up to a budget.
    pub fn up_to(max: f64) -> Self {
        Self { min: 0.0, max }
    }

    pub fn contains(&self, price: f64) -> bool {
        self.min <= price && price <= self.max
    }
}

/// Structured reading of a free-text search query.
///
/// Built fresh per search and discarded after the results are shown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchIntent {
    #[serde(rename = "type")]
    pub intent_type: IntentType,

    /// Lowercase tokens or phrases
    #[serde(default)]
    pub keywords: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Upper price bound parsed from the query
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_range: Option<PriceRange>,

    /// Recipe ingredients, lowercase
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ingredients: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skin_type: Option<String>,
}

impl SearchIntent {
    pub fn new(intent_type: IntentType) -> Self {
        Self {
            intent_type,
            ..Default::default()
        }
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_budget(mut self, budget: u64) -> Self {
        self.budget = Some(budget);
        self
    }

    pub fn with_price_range(mut self, range: PriceRange) -> Self {
        self.price_range = Some(range);
        self
    }

    pub fn with_ingredients<I, S>(mut self, ingredients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ingredients = ingredients.into_iter().map(Into::into).collect();
        self
    }

    /// The price bounds filtering should apply.
    ///
    /// An explicit range wins; otherwise a budget caps the price from zero.
    pub fn effective_price_range(&self) -> Option<PriceRange> {
        self.price_range
            .or_else(|| self.budget.map(|b| PriceRange::up_to(b as f64)))
    }
}

/// Output of ranking a search intent against the catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    /// Products satisfying every active filter
    pub strict: Vec<Product>,
    /// Fallback suggestions, disjoint from `strict`
    pub related: Vec<Product>,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.strict.is_empty() && self.related.is_empty()
    }

    /// Sum of strict match prices, shown as a recipe's shopping list total.
    pub fn strict_total(&self) -> f64 {
        self.strict.iter().map(|p| p.price).sum()
    }
}

/// Coarse classification of a shopper's question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    Usage,
    Comparison,
    Pricing,
    Policy,
    Specifications,
    Logistics,
    General,
}

impl QuestionKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Usage => "usage",
            Self::Comparison => "comparison",
            Self::Pricing => "pricing",
            Self::Policy => "policy",
            Self::Specifications => "specifications",
            Self::Logistics => "logistics",
            Self::General => "general",
        }
    }
}

/// A reply from the product assistant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QaAnswer {
    pub answer: String,
    /// Confidence reported to the shopper (0.0 - 1.0)
    pub confidence: f32,
    pub follow_up_questions: Vec<String>,
    /// Same-category products offered when the answer is negative
    #[serde(default)]
    pub alternatives: Vec<Product>,
    pub question_kind: QuestionKind,
    /// Whether the question was judged to be about the product
    pub relevant: bool,
}

/// Sentiment breakdown for a product detail page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentReport {
    pub positive: u8,
    pub negative: u8,
    pub aspects: BTreeMap<String, u8>,
    /// Review highlights; the catalog carries none yet
    pub highlights: Vec<String>,
}

impl From<&Sentiment> for SentimentReport {
    fn from(sentiment: &Sentiment) -> Self {
        Self {
            positive: sentiment.positive,
            negative: sentiment.negative,
            aspects: sentiment.aspects.clone(),
            highlights: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_total() {
        let results = SearchResults {
            strict: vec![
                Product::new("1", "Rice", "Groceries", 1299.0),
                Product::new("2", "Soy Sauce", "Groceries", 449.0),
            ],
            related: vec![Product::new("3", "Oil", "Groceries", 169.9)],
        };
        assert_eq!(results.strict_total(), 1748.0);
        assert_eq!(SearchResults::default().strict_total(), 0.0);
    }

    #[test]
    fn test_intent_serialization() {
        let intent = SearchIntent::new(IntentType::Clothing)
            .with_keywords(["jacket"])
            .with_budget(3000);
        let json = serde_json::to_value(&intent).unwrap();
        assert_eq!(json["type"], "clothing");
        assert_eq!(json["budget"], 3000);
        assert!(json.get("priceRange").is_none());
    }

    #[test]
    fn test_effective_price_range() {
        let budget_only = SearchIntent::new(IntentType::Clothing).with_budget(3000);
        assert_eq!(
            budget_only.effective_price_range(),
            Some(PriceRange::new(0.0, 3000.0))
        );

        let explicit = budget_only
            .clone()
            .with_price_range(PriceRange::new(100.0, 500.0));
        assert_eq!(
            explicit.effective_price_range(),
            Some(PriceRange::new(100.0, 500.0))
        );

        assert_eq!(SearchIntent::default().effective_price_range(), None);
    }

    #[test]
    fn test_price_range_inclusive() {
        let range = PriceRange::new(10.0, 20.0);
        assert!(range.contains(10.0));
        assert!(range.contains(20.0));
        assert!(!range.contains(20.01));
    }

    #[test]
    fn test_product_category_case_insensitive() {
        let product = Product::new("1", "Rain Jacket", "Clothing", 2500.0);
        assert!(product.in_category("clothing"));
        assert!(!product.in_category("Groceries"));
    }

    #[test]
    fn test_sentiment_net_can_be_negative() {
        assert_eq!(Sentiment::new(89, 90).net(), -1);
    }
}
