//! e-souk backend REST client.
//!
//! # Architecture
//!
//! - The backend is the source of truth - NO local sync, direct API calls
//! - In-memory caching via `moka` for the public catalog (5 minute TTL)
//! - Wire payloads are normalized into `e_souk_core` types at this boundary
//!   (notably the loose `category` field)
//!
//! # Failure model
//!
//! No timeouts, retries, or backoff: a failed call surfaces once to the
//! caller, which turns it into a user-visible message. Concurrent fetches of
//! the same resource are not de-duplicated; last response wins.
//!
//! # Example
//!
//! ```rust,ignore
//! use e_souk_storefront::backend::BackendClient;
//!
//! let client = BackendClient::new(&config);
//!
//! // Public catalog
//! let products = client.published_products().await?;
//!
//! // Authenticated vendor calls
//! let token = client.login("vendor@example.com", "secret").await?;
//! let all = client.products(&token).await?;
//! ```

mod client;
pub mod types;

pub use client::BackendClient;
pub use types::{ImageUpload, ProductInput};

use thiserror::Error;

/// Errors that can occur when talking to the e-souk backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend reported an error (`{error}` body).
    #[error("{message}")]
    Api {
        /// HTTP status code of the response.
        status: u16,
        /// Message from the backend's `{error}` body, or a fallback.
        message: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl BackendError {
    /// The message to show the visitor, falling back to a generic one for
    /// transport and decoding failures.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Api { message, .. } => message.clone(),
            Self::Http(_) | Self::Parse(_) => fallback.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display_is_the_server_message() {
        let err = BackendError::Api {
            status: 400,
            message: "Le nom est obligatoire.".to_string(),
        };
        assert_eq!(err.to_string(), "Le nom est obligatoire.");
    }

    #[test]
    fn test_user_message_prefers_server_body() {
        let err = BackendError::Api {
            status: 401,
            message: "Token invalide.".to_string(),
        };
        assert_eq!(err.user_message("Erreur serveur."), "Token invalide.");
    }

    #[test]
    fn test_user_message_falls_back_for_parse_errors() {
        let parse = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err = BackendError::Parse(parse);
        assert_eq!(err.user_message("Erreur serveur."), "Erreur serveur.");
    }
}
