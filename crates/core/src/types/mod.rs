//! Core types for the e-souk frontend.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod category;
pub mod id;
pub mod price;
pub mod product;

pub use cart::{Cart, CartError, CartLine, CartTotals, ProductSnapshot};
pub use category::{Category, CategoryRecord};
pub use id::*;
pub use price::Price;
pub use product::Product;
