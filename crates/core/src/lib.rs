//! e-souk Core - Shared types library.
//!
//! This crate provides the common types used by the e-souk frontend:
//! - `storefront` - Public catalog pages, cart, and per-vendor admin panel
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no session
//! handling. The cart store lives here because its operations are pure; the
//! storefront crate owns persistence.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, categories, products, and the cart store

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
