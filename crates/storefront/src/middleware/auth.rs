//! Authentication middleware and extractors.
//!
//! The auth gate: protected admin routes require a vendor bearer token in the
//! session. A denied navigation captures the requested path as a redirect
//! intent and sends the visitor to the login page; the intent is consumed
//! exactly once after a successful login.
//!
//! The gate performs no network call. It trusts token presence, with one
//! local check: a token that parses as a JWT whose `exp` claim has passed is
//! treated the same as a missing token (and removed from the session).
//! Opaque tokens and JWTs without `exp` are trusted on presence alone.

use axum::{
    extract::{FromRequestParts, OriginalUri},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;
use tower_sessions::Session;

use crate::models::{RedirectIntent, VendorSession, session_keys};

/// Extractor that requires a logged-in vendor.
///
/// If no valid token is stored, returns a redirect to the login page,
/// remembering the requested path.
///
/// # Example
///
/// ```rust,ignore
/// async fn panel_handler(
///     RequireVendorAuth(vendor): RequireVendorAuth,
/// ) -> impl IntoResponse {
///     // vendor.token is attached to backend calls
/// }
/// ```
pub struct RequireVendorAuth(pub VendorSession);

/// Error returned when authentication is required but no token is stored.
pub enum AuthRejection {
    /// Redirect to the login page.
    RedirectToLogin,
    /// The session layer is missing; nothing sensible can be rendered.
    Unauthorized,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/login").into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireVendorAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AuthRejection::Unauthorized)?
            .clone();

        let token: Option<String> = session
            .get(session_keys::AUTH_TOKEN)
            .await
            .ok()
            .flatten();

        match token {
            Some(token) if !token_is_expired(&token) => Ok(Self(VendorSession { token })),
            stored => {
                if stored.is_some() {
                    // Locally expired; treat the same as absent.
                    let _ = session.remove::<String>(session_keys::AUTH_TOKEN).await;
                }

                // Remember where the visitor wanted to go. Nested routers see
                // a stripped path, so prefer the original URI.
                let original_path = parts
                    .extensions
                    .get::<OriginalUri>()
                    .map_or_else(|| parts.uri.path().to_owned(), |uri| uri.path().to_owned());

                if let Err(e) = session
                    .insert(
                        session_keys::REDIRECT_INTENT,
                        &RedirectIntent { original_path },
                    )
                    .await
                {
                    tracing::error!("Failed to store redirect intent: {e}");
                }

                Err(AuthRejection::RedirectToLogin)
            }
        }
    }
}

/// Extractor that optionally gets the current vendor.
///
/// Unlike `RequireVendorAuth`, this never rejects; public pages use it to
/// decide between a login link and a link to the admin panel.
pub struct OptionalVendorAuth(pub Option<VendorSession>);

impl<S> FromRequestParts<S> for OptionalVendorAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token: Option<String> = match parts.extensions.get::<Session>() {
            Some(session) => session
                .get(session_keys::AUTH_TOKEN)
                .await
                .ok()
                .flatten(),
            None => None,
        };

        let vendor = token
            .filter(|token| !token_is_expired(token))
            .map(|token| VendorSession { token });

        Ok(Self(vendor))
    }
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Store the bearer token after a successful login.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_auth_token(
    session: &Session,
    token: &str,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::AUTH_TOKEN, token).await
}

/// Clear the bearer token (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_auth_token(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.remove::<String>(session_keys::AUTH_TOKEN).await?;
    Ok(())
}

/// Seed the redirect intent from a public page's login link.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn store_redirect_intent(
    session: &Session,
    original_path: &str,
) -> Result<(), tower_sessions::session::Error> {
    session
        .insert(
            session_keys::REDIRECT_INTENT,
            &RedirectIntent {
                original_path: original_path.to_owned(),
            },
        )
        .await
}

/// Consume the redirect intent (single use).
pub async fn take_redirect_intent(session: &Session) -> Option<RedirectIntent> {
    session
        .remove::<RedirectIntent>(session_keys::REDIRECT_INTENT)
        .await
        .ok()
        .flatten()
}

// =============================================================================
// Local Expiry Check
// =============================================================================

#[derive(Debug, Deserialize)]
struct Claims {
    exp: Option<i64>,
}

/// Whether a stored token is a JWT whose `exp` claim has passed.
///
/// Anything that does not decode as a JWT payload with an `exp` claim is not
/// expired as far as the gate is concerned; presence keeps its original
/// meaning for opaque tokens.
fn token_is_expired(token: &str) -> bool {
    let Some(payload) = token.split('.').nth(1) else {
        return false;
    };
    let Ok(bytes) = URL_SAFE_NO_PAD.decode(payload) else {
        return false;
    };
    let Ok(claims) = serde_json::from_slice::<Claims>(&bytes) else {
        return false;
    };
    claims
        .exp
        .is_some_and(|exp| exp <= chrono::Utc::now().timestamp())
}
