//! Normalized catalog product.

use serde::{Deserialize, Serialize};

use crate::types::category::Category;
use crate::types::cart::ProductSnapshot;
use crate::types::id::ProductId;
use crate::types::price::Price;

/// A catalog product as the rest of the frontend sees it.
///
/// Raw backend payloads are converted into this shape at the API boundary,
/// which is where the loose `category` field gets normalized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Price,
    pub image: Option<String>,
    pub is_published: bool,
    pub category: Category,
}

impl Product {
    /// Freeze the fields a cart line keeps after the product leaves view.
    #[must_use]
    pub fn snapshot(&self) -> ProductSnapshot {
        ProductSnapshot {
            name: self.name.clone(),
            unit_price: self.price,
            image: self.image.clone(),
        }
    }
}
