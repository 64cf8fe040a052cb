//! Ranking of catalog products against a search intent.
//!
//! Takes a `SearchIntent` and the catalog and produces strict matches
//! (every active filter passes) plus related fallback suggestions, both
//! ordered by sentiment.

mod recommend;

pub use recommend::{recommend, DEFAULT_RECOMMENDATION_LIMIT};

use aisle_features::{has_ingredient, matches_any_keyword, search_haystack, tag_overlap};
use aisle_model::{IntentType, PriceRange, Product, SearchIntent, SearchResults};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Which sentiment value orders results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// `sentiment.positive` alone
    #[default]
    Positive,
    /// `sentiment.positive - sentiment.negative`
    NetPositive,
}

impl SortKey {
    fn score(&self, product: &Product) -> i16 {
        match self {
            Self::Positive => product.sentiment.positive as i16,
            Self::NetPositive => product.sentiment.net(),
        }
    }
}

/// Configuration for the ranker.
#[derive(Debug, Clone, Default)]
pub struct RankConfig {
    pub sort_key: SortKey,
}

/// A strict-match predicate implied by the intent.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Price within inclusive bounds
    Price(PriceRange),
    /// Case-insensitive category equality
    Category(String),
    /// Any keyword in name, description, tags or hint
    Keywords(Vec<String>),
    /// Any ingredient among the tags
    Ingredients(Vec<String>),
}

impl Filter {
    pub fn accepts(&self, product: &Product) -> bool {
        match self {
            Self::Price(range) => range.contains(product.price),
            Self::Category(category) => product.in_category(category),
            Self::Keywords(keywords) => matches_any_keyword(&search_haystack(product), keywords),
            Self::Ingredients(ingredients) => has_ingredient(product, ingredients),
        }
    }
}

/// The filters an intent activates, in application order.
pub fn active_filters(intent: &SearchIntent) -> Vec<Filter> {
    let mut filters = Vec::new();

    if let Some(range) = intent.effective_price_range() {
        filters.push(Filter::Price(range));
    }
    if let Some(category) = &intent.category {
        filters.push(Filter::Category(category.clone()));
    }
    // Recipe searches match on ingredients, not dish names
    if !intent.keywords.is_empty() && intent.intent_type != IntentType::Recipe {
        filters.push(Filter::Keywords(intent.keywords.clone()));
    }
    if !intent.ingredients.is_empty() {
        filters.push(Filter::Ingredients(intent.ingredients.clone()));
    }

    filters
}

/// Rank the catalog for an intent.
pub fn rank(intent: &SearchIntent, catalog: &[Product], config: &RankConfig) -> SearchResults {
    // Each filter narrows the previous working set
    let mut working: Vec<&Product> = catalog.iter().collect();
    for filter in active_filters(intent) {
        working.retain(|p| filter.accepts(p));
    }
    sort_by_sentiment(&mut working, config.sort_key);

    let strict_ids: HashSet<&str> = working.iter().map(|&p| p.id.as_str()).collect();
    let related = related_products(intent, catalog, config.sort_key)
        .into_iter()
        .filter(|p| !strict_ids.contains(p.id.as_str()))
        .cloned()
        .collect();

    SearchResults {
        strict: working.into_iter().cloned().collect(),
        related,
    }
}

/// Relaxed matches, computed independently of the strict filters.
///
/// With an explicit price range: everything in range, then the category,
/// deduplicated. Without one: category or tag overlap with a keyword.
fn related_products<'a>(
    intent: &SearchIntent,
    catalog: &'a [Product],
    sort_key: SortKey,
) -> Vec<&'a Product> {
    let in_category =
        |p: &Product| intent.category.as_deref().is_some_and(|c| p.in_category(c));

    if let Some(range) = intent.price_range {
        let mut in_range: Vec<&Product> =
            catalog.iter().filter(|p| range.contains(p.price)).collect();
        sort_by_sentiment(&mut in_range, sort_key);

        let mut same_category: Vec<&Product> = catalog.iter().filter(|&p| in_category(p)).collect();
        sort_by_sentiment(&mut same_category, sort_key);

        let mut seen = HashSet::new();
        in_range
            .into_iter()
            .chain(same_category)
            .filter(|&p| seen.insert(p.id.as_str()))
            .collect()
    } else {
        let mut related: Vec<&Product> = catalog
            .iter()
            .filter(|&p| in_category(p) || tag_overlap(p, &intent.keywords))
            .collect();
        sort_by_sentiment(&mut related, sort_key);
        related
    }
}

/// Sort descending by sentiment; ties keep catalog order.
fn sort_by_sentiment(products: &mut [&Product], sort_key: SortKey) {
    products.sort_by(|a, b| sort_key.score(b).cmp(&sort_key.score(a)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use aisle_intent::extract_intent;
    use aisle_model::Catalog;
    use pretty_assertions::assert_eq;

    fn ids(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.id.as_str()).collect()
    }

    fn grocery_catalog() -> Vec<Product> {
        vec![
            Product::new("rice", "Basmati Rice", "Groceries", 120.0)
                .with_tags(["rice", "grains"])
                .with_sentiment(87, 13),
            Product::new("soy", "Soy Sauce", "Groceries", 45.0)
                .with_tags(["soy sauce", "condiment"])
                .with_sentiment(91, 9),
            Product::new("onion", "Red Onions", "Groceries", 30.0)
                .with_tags(["onions", "vegetables"])
                .with_sentiment(84, 16),
            Product::new("spf", "Sunscreen SPF 50", "Skincare", 189.0)
                .with_tags(["sunscreen", "oily-skin"])
                .with_sentiment(95, 5),
        ]
    }

    #[test]
    fn test_jackets_under_budget() {
        let catalog = vec![
            Product::new("j1", "Puffer Jacket", "Clothing", 2500.0)
                .with_tags(["jacket"])
                .with_sentiment(90, 10),
            Product::new("j2", "Leather Jacket", "Clothing", 3500.0)
                .with_tags(["jacket"])
                .with_sentiment(95, 5),
        ];
        let intent = extract_intent("Show me jackets under ₹3000");
        assert_eq!(intent.intent_type, IntentType::Clothing);
        assert_eq!(intent.budget, Some(3000));

        let results = rank(&intent, &catalog, &RankConfig::default());
        assert_eq!(ids(&results.strict), vec!["j1"]);
        assert_eq!(ids(&results.related), vec!["j2"]);
    }

    #[test]
    fn test_fried_rice_ingredients() {
        let catalog = grocery_catalog();
        let intent = extract_intent("I want to cook fried rice");

        let results = rank(&intent, &catalog, &RankConfig::default());
        assert_eq!(ids(&results.strict), vec!["soy", "rice", "onion"]);
        assert!(!ids(&results.related).contains(&"spf"));
    }

    #[test]
    fn test_empty_catalog() {
        for query in ["cook biryani", "sunscreen", "jackets under ₹10", "anything"] {
            let results = rank(&extract_intent(query), &[], &RankConfig::default());
            assert!(results.strict.is_empty());
            assert!(results.related.is_empty());
        }
    }

    #[test]
    fn test_strict_satisfies_every_active_filter() {
        let catalog = Catalog::bundled().unwrap();
        let queries = [
            "I want to cook fried rice",
            "cook biryani tonight",
            "sunscreen for oily skin",
            "winter jacket under ₹3000",
            "wireless headphones",
            "fast charger",
        ];
        for query in queries {
            let intent = extract_intent(query);
            let filters = active_filters(&intent);
            let results = rank(&intent, catalog.products(), &RankConfig::default());
            for product in &results.strict {
                for filter in &filters {
                    assert!(filter.accepts(product), "{query}: {} fails {filter:?}", product.id);
                }
            }
        }
    }

    #[test]
    fn test_related_disjoint_from_strict() {
        let catalog = Catalog::bundled().unwrap();
        let price_intent = SearchIntent::new(IntentType::Product)
            .with_keywords(["rice"])
            .with_category("Groceries")
            .with_price_range(PriceRange::new(100.0, 500.0));

        let intents = [
            extract_intent("I want to cook fried rice"),
            extract_intent("sunscreen for oily skin"),
            extract_intent("casual shirt"),
            price_intent,
        ];
        for intent in &intents {
            let results = rank(intent, catalog.products(), &RankConfig::default());
            let strict: HashSet<&str> = ids(&results.strict).into_iter().collect();
            assert!(ids(&results.related).iter().all(|id| !strict.contains(id)));
        }
    }

    #[test]
    fn test_price_range_related_order_and_dedup() {
        let catalog = vec![
            Product::new("a", "Cheap Lamp", "Home", 50.0).with_sentiment(70, 0),
            Product::new("b", "Cheap Rice", "Groceries", 60.0).with_sentiment(80, 0),
            Product::new("c", "Fancy Oil", "Groceries", 900.0).with_sentiment(99, 0),
            Product::new("d", "Cheap Salt", "Groceries", 10.0)
                .with_tags(["salt"])
                .with_sentiment(60, 0),
        ];
        let intent = SearchIntent::new(IntentType::Product)
            .with_keywords(["salt"])
            .with_category("groceries")
            .with_price_range(PriceRange::new(0.0, 100.0));

        let results = rank(&intent, &catalog, &RankConfig::default());
        assert_eq!(ids(&results.strict), vec!["d"]);
        // in-range first (b, a), then category (c; b and d already seen or strict)
        assert_eq!(ids(&results.related), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_keywords_match_tags_in_strict() {
        let catalog = grocery_catalog();
        let intent = SearchIntent::new(IntentType::Product).with_keywords(["veg", "condiment"]);

        let results = rank(&intent, &catalog, &RankConfig::default());
        // "veg" matches the onion tag, "condiment" the soy tag
        assert_eq!(ids(&results.strict), vec!["soy", "onion"]);
        assert!(results.related.is_empty());
    }

    #[test]
    fn test_related_without_range_uses_tag_overlap() {
        let catalog = grocery_catalog();
        // The budget filters strict, but related has no explicit range
        let intent = SearchIntent::new(IntentType::Product)
            .with_keywords(["veg", "condiment"])
            .with_budget(40);

        let results = rank(&intent, &catalog, &RankConfig::default());
        assert_eq!(ids(&results.strict), vec!["onion"]);
        // Soy sauce is over budget and only reaches related through its tag
        assert_eq!(ids(&results.related), vec!["soy"]);
    }

    #[test]
    fn test_unknown_category_yields_empty_strict() {
        let catalog = grocery_catalog();
        let intent = SearchIntent::new(IntentType::Product)
            .with_keywords(["rice"])
            .with_category("Furniture");

        let results = rank(&intent, &catalog, &RankConfig::default());
        assert!(results.strict.is_empty());
        assert_eq!(ids(&results.related), vec!["rice"]);
    }

    #[test]
    fn test_ties_keep_catalog_order() {
        let catalog = vec![
            Product::new("first", "Shirt A", "Clothing", 10.0).with_sentiment(88, 1),
            Product::new("top", "Shirt B", "Clothing", 10.0).with_sentiment(92, 1),
            Product::new("second", "Shirt C", "Clothing", 10.0).with_sentiment(88, 50),
            Product::new("third", "Shirt D", "Clothing", 10.0).with_sentiment(88, 2),
        ];
        let intent = SearchIntent::new(IntentType::Clothing).with_category("Clothing");

        let results = rank(&intent, &catalog, &RankConfig::default());
        assert_eq!(ids(&results.strict), vec!["top", "first", "second", "third"]);
    }

    #[test]
    fn test_net_positive_sort_key() {
        let catalog = vec![
            Product::new("mixed", "Loved and hated", "Skincare", 10.0).with_sentiment(89, 90),
            Product::new("calm", "Quietly liked", "Skincare", 10.0).with_sentiment(85, 15),
        ];
        let intent = SearchIntent::new(IntentType::Skincare).with_category("Skincare");

        let by_positive = rank(&intent, &catalog, &RankConfig::default());
        assert_eq!(ids(&by_positive.strict), vec!["mixed", "calm"]);

        let config = RankConfig {
            sort_key: SortKey::NetPositive,
        };
        let by_net = rank(&intent, &catalog, &config);
        assert_eq!(ids(&by_net.strict), vec!["calm", "mixed"]);
    }
}
