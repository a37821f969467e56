//! Wire types for the e-souk backend and their normalization.
//!
//! The backend is a loosely-typed REST API: ids are Mongo-style `_id`
//! strings, booleans may be missing, and `category` arrives in three shapes
//! (absent, bare id string, populated object). Everything is normalized into
//! `e_souk_core` types here so the rest of the frontend never sees the wire
//! shapes.

use rust_decimal::Decimal;
use serde::Deserialize;

use e_souk_core::{Category, CategoryId, CategoryRecord, Price, Product, ProductId};

/// A product as the backend serializes it.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiProduct {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(rename = "isPublished", default)]
    pub is_published: bool,
    #[serde(default)]
    pub category: Option<CategoryField>,
}

/// The backend's `category` field: a bare id or a populated object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CategoryField {
    Id(String),
    Expanded(ApiCategory),
}

/// A category as the backend serializes it.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiCategory {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
}

impl From<ApiCategory> for CategoryRecord {
    fn from(category: ApiCategory) -> Self {
        Self {
            id: CategoryId::new(category.id),
            name: category.name,
        }
    }
}

impl From<ApiProduct> for Product {
    fn from(product: ApiProduct) -> Self {
        let category = match product.category {
            None => Category::Uncategorized,
            Some(CategoryField::Id(id)) => Category::Ref(CategoryId::new(id)),
            Some(CategoryField::Expanded(record)) => Category::Expanded(record.into()),
        };

        Self {
            id: ProductId::new(product.id),
            name: product.name,
            description: product.description,
            price: Price::new(product.price),
            image: product.image,
            is_published: product.is_published,
            category,
        }
    }
}

// =============================================================================
// Outgoing Payloads
// =============================================================================

/// An image file to upload with a product.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Fields for creating or updating a product.
///
/// The image is required on create and optional on update; the caller
/// enforces that, the client just forwards what it gets.
#[derive(Debug, Clone)]
pub struct ProductInput {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category: Option<CategoryId>,
    pub image: Option<ImageUpload>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_without_category_is_uncategorized() {
        let json = r#"{"_id":"p1","name":"Pain","description":"Au levain","price":4.5}"#;
        let product: Product = serde_json::from_str::<ApiProduct>(json).unwrap().into();

        assert_eq!(product.id, ProductId::new("p1"));
        assert_eq!(product.category, Category::Uncategorized);
        assert!(!product.is_published);
        assert_eq!(product.price.display(), "4.50 €");
    }

    #[test]
    fn test_product_with_category_id_string() {
        let json = r#"{"_id":"p1","name":"Pain","price":4.5,"category":"cat-1","isPublished":true}"#;
        let product: Product = serde_json::from_str::<ApiProduct>(json).unwrap().into();

        assert_eq!(product.category, Category::Ref(CategoryId::new("cat-1")));
        assert!(product.is_published);
    }

    #[test]
    fn test_product_with_expanded_category() {
        let json = r#"{
            "_id":"p1","name":"Pain","price":4.5,
            "category":{"_id":"cat-1","name":"Pains"}
        }"#;
        let product: Product = serde_json::from_str::<ApiProduct>(json).unwrap().into();

        assert_eq!(
            product.category,
            Category::Expanded(CategoryRecord {
                id: CategoryId::new("cat-1"),
                name: "Pains".to_string(),
            })
        );
    }

    #[test]
    fn test_product_with_null_category() {
        let json = r#"{"_id":"p1","name":"Pain","price":4.5,"category":null}"#;
        let product: Product = serde_json::from_str::<ApiProduct>(json).unwrap().into();

        assert_eq!(product.category, Category::Uncategorized);
    }

    #[test]
    fn test_price_accepts_string_numbers() {
        // Some backend routes stringify prices on the way out.
        let json = r#"{"_id":"p1","name":"Pain","price":"4.50"}"#;
        let product: Product = serde_json::from_str::<ApiProduct>(json).unwrap().into();

        assert_eq!(product.price, Price::new("4.50".parse().unwrap()));
    }
}
