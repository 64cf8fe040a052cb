//! The static product catalog.

use crate::Product;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

const BUNDLED_CATALOG: &str = include_str!("../data/products.json");

/// Errors from loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Duplicate product id: {0}")]
    DuplicateId(String),
}

/// Immutable, id-unique list of products in display order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ids.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for product in &products {
            if !seen.insert(product.id.as_str()) {
                return Err(CatalogError::DuplicateId(product.id.clone()));
            }
        }
        Ok(Self { products })
    }

    /// The storefront's built-in product list.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_json_str(BUNDLED_CATALOG)
    }

    /// Parse a JSON array of products.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        Self::new(products)
    }

    /// Load a JSON catalog file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = Vec::new();
        for product in &self.products {
            if !categories.contains(&product.category.as_str()) {
                categories.push(&product.category);
            }
        }
        categories
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_catalog_loads() {
        let catalog = Catalog::bundled().unwrap();
        assert_eq!(catalog.len(), 12);
        assert_eq!(
            catalog.categories(),
            vec!["Groceries", "Skincare", "Clothing", "Electronics"]
        );

        let sunscreen = catalog.get("4").unwrap();
        assert_eq!(sunscreen.sentiment.positive, 89);
        assert_eq!(sunscreen.sentiment.negative, 90);
        assert_eq!(sunscreen.sentiment.aspects.get("waterproof"), Some(&85));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let products = vec![
            Product::new("1", "Rice", "Groceries", 100.0),
            Product::new("1", "Oil", "Groceries", 200.0),
        ];
        assert!(matches!(
            Catalog::new(products),
            Err(CatalogError::DuplicateId(id)) if id == "1"
        ));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            Catalog::from_json_str("{\"not\": \"a list\"}"),
            Err(CatalogError::Json(_))
        ));
    }

    #[test]
    fn test_optional_fields_default() {
        let catalog = Catalog::from_json_str(
            r#"[{"id": "x", "name": "Plain", "price": 10, "category": "Misc"}]"#,
        )
        .unwrap();
        let product = catalog.get("x").unwrap();
        assert!(product.tags.is_empty());
        assert_eq!(product.sentiment.positive, 0);
        assert!(product.ai_hint.is_empty());
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            Catalog::load("/nonexistent/catalog.json"),
            Err(CatalogError::Io(_))
        ));
    }
}
