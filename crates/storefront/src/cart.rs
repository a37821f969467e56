//! Session persistence for the cart store.
//!
//! The cart itself is pure data ([`e_souk_core::Cart`]); this module owns the
//! read-modify-write cycle against the per-client session. Every mutating
//! route loads the cart, applies exactly one operation, and writes the whole
//! cart back before responding.

use e_souk_core::Cart;
use tower_sessions::Session;

use crate::models::session_keys;

/// Restore the cart from the session.
///
/// A missing, corrupt, or invariant-violating persisted value yields an empty
/// cart; corruption is swallowed, never surfaced to the visitor.
pub async fn load_cart(session: &Session) -> Cart {
    session
        .get::<Cart>(session_keys::CART)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// Persist the full cart to the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn save_cart(
    session: &Session,
    cart: &Cart,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CART, cart).await
}
