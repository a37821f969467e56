//! Product category representation.
//!
//! The backend is loose about the `category` field: it may be missing, a bare
//! id string, or a populated object depending on whether the query expanded
//! it. The storefront normalizes all three shapes into [`Category`] once, at
//! the API boundary; everything past that point works with the sum type.

use serde::{Deserialize, Serialize};

use crate::types::id::CategoryId;

/// A fully expanded category record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRecord {
    pub id: CategoryId,
    pub name: String,
}

/// A product's category, normalized from the backend's optional field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    /// No category assigned.
    #[default]
    Uncategorized,
    /// Only the category id is known.
    Ref(CategoryId),
    /// The category was expanded server-side.
    Expanded(CategoryRecord),
}

impl Category {
    /// The category id, if one is assigned.
    #[must_use]
    pub const fn id(&self) -> Option<&CategoryId> {
        match self {
            Self::Uncategorized => None,
            Self::Ref(id) => Some(id),
            Self::Expanded(record) => Some(&record.id),
        }
    }

    /// The display name, if the category was expanded.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Expanded(record) => Some(record.name.as_str()),
            Self::Uncategorized | Self::Ref(_) => None,
        }
    }

    /// Whether a category is assigned at all.
    #[must_use]
    pub const fn is_assigned(&self) -> bool {
        !matches!(self, Self::Uncategorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uncategorized_has_no_id() {
        assert_eq!(Category::Uncategorized.id(), None);
        assert_eq!(Category::Uncategorized.name(), None);
        assert!(!Category::Uncategorized.is_assigned());
    }

    #[test]
    fn test_ref_exposes_id_only() {
        let category = Category::Ref(CategoryId::new("cat-1"));
        assert_eq!(category.id(), Some(&CategoryId::new("cat-1")));
        assert_eq!(category.name(), None);
    }

    #[test]
    fn test_expanded_exposes_id_and_name() {
        let category = Category::Expanded(CategoryRecord {
            id: CategoryId::new("cat-1"),
            name: "Viennoiseries".to_owned(),
        });
        assert_eq!(category.id(), Some(&CategoryId::new("cat-1")));
        assert_eq!(category.name(), Some("Viennoiseries"));
        assert!(category.is_assigned());
    }
}
