//! Cart-driven product suggestions.

use aisle_model::Product;
use rand::seq::SliceRandom;
use rand::Rng;

pub const DEFAULT_RECOMMENDATION_LIMIT: usize = 4;

/// Suggest products from the category of the most recently added cart item.
///
/// Products already in the cart are excluded. Candidates are shuffled with
/// the caller's RNG so a seeded generator gives repeatable suggestions.
pub fn recommend<R: Rng + ?Sized>(
    catalog: &[Product],
    cart_ids: &[String],
    rng: &mut R,
    limit: usize,
) -> Vec<Product> {
    let Some(last_id) = cart_ids.last() else {
        return Vec::new();
    };
    let Some(last) = catalog.iter().find(|p| &p.id == last_id) else {
        return Vec::new();
    };

    let mut candidates: Vec<&Product> = catalog
        .iter()
        .filter(|p| p.category == last.category && !cart_ids.contains(&p.id))
        .collect();
    candidates.shuffle(rng);

    candidates.into_iter().take(limit).cloned().collect()
}
