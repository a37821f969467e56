//! Authentication route handlers.
//!
//! Login and registration delegate credential checking to the backend
//! (`POST /api/login`, `POST /api/register`); the only thing stored locally
//! is the issued bearer token. After a successful login the one-shot
//! redirect intent is consumed and resolved through the shop registry's
//! public-to-admin mapping.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::{clear_auth_token, set_auth_token, store_redirect_intent, take_redirect_intent};
use crate::shops::redirect_after_login;
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

// =============================================================================
// Query Types
// =============================================================================

/// Login page query parameters.
#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    /// Public page the visitor came from; seeds the redirect intent.
    pub from: Option<String>,
    /// Set after a successful registration.
    pub registered: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub error: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the login page.
///
/// A `?from=` parameter (attached by public pages' login links) is stored as
/// the redirect intent so the post-login mapping can use it.
#[instrument(skip(session))]
pub async fn login_page(session: Session, Query(query): Query<LoginQuery>) -> impl IntoResponse {
    if let Some(from) = query.from.as_deref() {
        if let Err(e) = store_redirect_intent(&session, from).await {
            tracing::error!("Failed to store redirect intent: {e}");
        }
    }

    let success = query
        .registered
        .is_some()
        .then(|| "Inscription réussie ! Veuillez vous connecter.".to_string());

    LoginTemplate {
        error: None,
        success,
    }
}

/// Handle login form submission.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    match state.backend().login(&form.email, &form.password).await {
        Ok(token) => {
            set_auth_token(&session, &token).await?;

            // Consume the intent (single use) and resolve it through the
            // public-to-admin mapping.
            let intent = take_redirect_intent(&session).await;
            let destination = redirect_after_login(intent.as_ref().map(|i| i.original_path.as_str()));
            Ok(Redirect::to(destination).into_response())
        }
        Err(e) => {
            tracing::warn!("Login failed: {e}");
            let message = e.user_message("Identifiants ou mot de passe incorrects.");
            Ok(LoginTemplate {
                error: Some(message),
                success: None,
            }
            .into_response())
        }
    }
}

/// Display the registration page.
pub async fn register_page() -> impl IntoResponse {
    RegisterTemplate { error: None }
}

/// Handle registration form submission.
///
/// Local preconditions first (matching passwords, minimum length), then the
/// backend call; success redirects to the login page with a banner.
#[instrument(skip(state, form))]
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Response {
    if form.password != form.password_confirm {
        return RegisterTemplate {
            error: Some("Les mots de passe ne correspondent pas.".to_string()),
        }
        .into_response();
    }
    if form.password.chars().count() < 6 {
        return RegisterTemplate {
            error: Some("Le mot de passe doit contenir au moins 6 caractères.".to_string()),
        }
        .into_response();
    }

    match state.backend().register(&form.email, &form.password).await {
        Ok(()) => Redirect::to("/login?registered=1").into_response(),
        Err(e) => {
            tracing::warn!("Registration failed: {e}");
            RegisterTemplate {
                error: Some(e.user_message("Erreur lors de l'inscription.")),
            }
            .into_response()
        }
    }
}

/// Handle logout: drop the token and return to the login page.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Response> {
    clear_auth_token(&session).await?;
    Ok(Redirect::to("/login").into_response())
}
