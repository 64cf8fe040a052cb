//! Backend-driven product search.
//!
//! The knowledge backend reads the query and replies with product names,
//! which are mapped back onto the catalog by exact name.

use aisle_backend_gemini::{BackendError, KnowledgeBackend};
use aisle_model::{Catalog, Product};
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct NameList {
    products: Vec<String>,
}

fn search_prompt(query: &str, catalog: &Catalog) -> String {
    let names: Vec<&str> = catalog.products().iter().map(|p| p.name.as_str()).collect();
    format!(
        "You are a product search assistant. The user will provide a query, and you should \
         return a list of product names that match the user query. The product names should be \
         as specific as possible and taken from this list: {}.\n\
         Reply with JSON of the form {{\"products\": [\"name\", ...]}}.\n\n\
         User Query: {}",
        names.join("; "),
        query
    )
}

/// Read product names out of a backend reply.
///
/// Accepts `{"products": [...]}`, a bare JSON array (either possibly inside
/// a code fence), or one name per line with optional list markers.
pub fn parse_product_names(reply: &str) -> Vec<String> {
    let body = reply
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();

    if let Ok(list) = serde_json::from_str::<NameList>(body) {
        return list.products;
    }
    if let Ok(names) = serde_json::from_str::<Vec<String>>(body) {
        return names;
    }

    body.lines()
        .map(|line| {
            line.trim()
                .trim_start_matches(|c: char| c == '-' || c == '*' || c == '.' || c.is_ascii_digit())
                .trim()
        })
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Ask the backend which products fit `query`.
///
/// Returned names that are not in the catalog are ignored; results keep
/// catalog order.
pub async fn ai_search<B: KnowledgeBackend>(
    backend: &B,
    catalog: &Catalog,
    query: &str,
) -> Result<Vec<Product>, BackendError> {
    let reply = backend.ask(&search_prompt(query, catalog)).await?;
    let names = parse_product_names(&reply);
    debug!(backend = backend.name(), names = names.len(), "Backend search reply parsed");

    Ok(catalog
        .products()
        .iter()
        .filter(|p| names.contains(&p.name))
        .cloned()
        .collect())
}
