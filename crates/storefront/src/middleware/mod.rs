//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Session layer (tower-sessions with in-memory store)
//! 4. Auth gate (per-route extractor, not a layer)

pub mod auth;
pub mod session;

pub use auth::{
    OptionalVendorAuth, RequireVendorAuth, clear_auth_token, set_auth_token,
    store_redirect_intent, take_redirect_intent,
};
pub use session::create_session_layer;
