//! Session-related types.
//!
//! Types stored in the per-client session: the vendor bearer token, the
//! serialized cart, and the one-shot post-login redirect intent.

use serde::{Deserialize, Serialize};

/// Session-stored vendor identity.
///
/// The bearer token issued by the backend on login. Its presence is what the
/// auth gate checks; it is written only by login/logout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendorSession {
    /// Opaque bearer credential for backend calls.
    pub token: String,
}

/// The destination a visitor wanted before being sent to the login page.
///
/// Captured when the auth gate denies a navigation (or seeded by a public
/// page's login link), consumed exactly once after a successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedirectIntent {
    pub original_path: String,
}

/// Session keys for persisted state.
pub mod keys {
    /// Key for the vendor bearer token.
    pub const AUTH_TOKEN: &str = "auth_token";

    /// Key for the serialized shopping cart.
    pub const CART: &str = "cart";

    /// Key for the one-shot post-login redirect intent.
    pub const REDIRECT_INTENT: &str = "redirect_intent";
}
