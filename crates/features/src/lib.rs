//! Text features for query understanding and product matching.
//!
//! Provides pure functions used by intent extraction and ranking:
//! - Query normalization and tokenization
//! - Substring vocabulary checks
//! - Budget extraction from currency amounts
//! - Product haystacks and tag predicates

use aisle_model::Product;
use regex::Regex;
use std::sync::LazyLock;

/// The one currency symbol budgets are recognized with.
pub const CURRENCY_SYMBOL: char = '₹';

static BUDGET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"₹([0-9]+)").expect("budget pattern is valid"));

/// Case-fold a query. No other sanitization is applied.
pub fn normalize_query(text: &str) -> String {
    text.to_lowercase()
}

/// Check whether `text` contains any of the needles as a substring.
pub fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| text.contains(n))
}

/// Return the first candidate present in `text`, in candidate order.
pub fn first_present(text: &str, candidates: &[&'static str]) -> Option<&'static str> {
    candidates.iter().copied().find(|c| text.contains(c))
}

/// Return every candidate present in `text`, in candidate order.
pub fn all_present(text: &str, candidates: &[&'static str]) -> Vec<String> {
    candidates
        .iter()
        .filter(|c| text.contains(*c))
        .map(|c| c.to_string())
        .collect()
}

/// Split on whitespace and keep tokens longer than `min_len` characters.
pub fn tokenize(text: &str, min_len: usize) -> Vec<String> {
    text.split_whitespace()
        .filter(|w| w.chars().count() > min_len)
        .map(|w| w.to_string())
        .collect()
}

/// Extract the first currency amount, e.g. `₹3000` → 3000.
///
/// Only ASCII digits count as an amount. Amounts that overflow `u64` are
/// treated as absent.
pub fn extract_budget(text: &str) -> Option<u64> {
    BUDGET_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Lowercased `name description tags ai_hint` text searched by keyword filters.
pub fn search_haystack(product: &Product) -> String {
    format!(
        "{} {} {} {}",
        product.name,
        product.description,
        product.tags.join(" "),
        product.ai_hint
    )
    .to_lowercase()
}

/// Check whether the haystack contains any keyword (case-folded).
pub fn matches_any_keyword(haystack: &str, keywords: &[String]) -> bool {
    keywords
        .iter()
        .any(|k| haystack.contains(&k.to_lowercase()))
}

/// Check whether some product tag contains some keyword as a substring.
pub fn tag_overlap(product: &Product, keywords: &[String]) -> bool {
    keywords.iter().any(|k| {
        let k = k.to_lowercase();
        product.tags.iter().any(|t| t.contains(&k))
    })
}

/// Check whether the product's tags include any ingredient exactly.
pub fn has_ingredient(product: &Product, ingredients: &[String]) -> bool {
    ingredients.iter().any(|i| {
        let i = i.to_lowercase();
        product.tags.iter().any(|t| *t == i)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_drops_short_words() {
        assert_eq!(
            tokenize("a set of usb-c chargers", 2),
            vec!["set", "usb-c", "chargers"]
        );
        assert!(tokenize("   ", 2).is_empty());
    }

    #[test]
    fn test_extract_budget() {
        assert_eq!(extract_budget("jackets under ₹3000"), Some(3000));
        assert_eq!(extract_budget("between ₹500 and ₹900"), Some(500));
        assert_eq!(extract_budget("under 3000"), None);
        assert_eq!(extract_budget("₹ 3000"), None);
        assert_eq!(extract_budget("₹99999999999999999999999"), None);
    }

    #[test]
    fn test_extract_budget_ignores_non_ascii_digits() {
        // Devanagari digits are not amounts; the next ₹ still counts
        assert_eq!(extract_budget("jackets ₹३ or under ₹500"), Some(500));
        assert_eq!(extract_budget("under ₹3००"), Some(3));
        assert_eq!(extract_budget("under ₹३००"), None);
    }

    #[test]
    fn test_extract_budget_idempotent() {
        let query = "show me shirts under ₹1500 please";
        let first = extract_budget(query);
        let second = extract_budget(query);
        assert_eq!(first, second);
        let reparsed = extract_budget(&format!("₹{}", first.unwrap()));
        assert_eq!(reparsed, first);
    }

    #[test]
    fn test_first_present_priority() {
        let skin_types = ["oily", "dry", "sensitive", "combination"];
        assert_eq!(first_present("dry and oily skin", &skin_types), Some("oily"));
        assert_eq!(first_present("normal skin", &skin_types), None);
    }

    #[test]
    fn test_haystack_includes_tags_and_hint() {
        let mut product = Product::new("1", "Rain Shell", "Clothing", 10.0)
            .with_tags(["Waterproof", "hood"]);
        product.ai_hint = "Great in Storms".to_string();
        let haystack = search_haystack(&product);
        assert!(haystack.contains("waterproof hood"));
        assert!(haystack.contains("storms"));
    }

    #[test]
    fn test_tag_predicates() {
        let product = Product::new("2", "Soy Sauce", "Groceries", 449.0)
            .with_tags(["soy-sauce", "fried-rice"]);
        assert!(tag_overlap(&product, &["rice".to_string()]));
        assert!(!has_ingredient(&product, &["rice".to_string()]));
        assert!(has_ingredient(&product, &["Soy-Sauce".to_string()]));
    }
}
