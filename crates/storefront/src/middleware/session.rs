//! Session middleware configuration.
//!
//! Sets up in-memory sessions using tower-sessions. The session is the
//! durable per-client storage slot: it holds the serialized cart, the vendor
//! bearer token, and the one-shot redirect intent. There is exactly one
//! writer per client (the current request) and no cross-client coordination;
//! two tabs sharing a cookie are last-writer-wins.

use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::EsoukConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "esouk_session";

/// Session expiry time in seconds (30 days).
///
/// Long enough that an open cart survives page reloads and return visits,
/// matching the durability of the storage slot it replaces.
const SESSION_EXPIRY_SECONDS: i64 = 30 * 24 * 60 * 60;

/// Create the session layer with an in-memory store.
#[must_use]
pub fn create_session_layer(config: &EsoukConfig) -> SessionManagerLayer<MemoryStore> {
    let store = MemoryStore::default();

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
