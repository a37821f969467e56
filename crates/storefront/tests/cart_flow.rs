//! Router-level tests for the cart flow and the auth gate.
//!
//! These drive the real axum service in-process, cookies included. Cart
//! mutations never touch the backend, so no server needs to be running; the
//! auth gate is likewise purely local.

#![allow(clippy::unwrap_used)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode, header};
use tower::ServiceExt;

use e_souk_storefront::config::EsoukConfig;
use e_souk_storefront::router;
use e_souk_storefront::state::AppState;

fn test_app() -> Router {
    let config = EsoukConfig {
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        base_url: "http://localhost:3000".to_string(),
        api_url: "http://localhost:5001".to_string(),
        sentry_dsn: None,
    };
    router(AppState::new(config))
}

/// Extract the session cookie pair ("name=value") from a response.
fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(ToOwned::to_owned)
}

fn form_request(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_owned())).unwrap()
}

fn get_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn health_check_works() {
    let app = test_app();
    let response = app.oneshot(get_request("/health", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");
}

#[tokio::test]
async fn cart_add_update_remove_flow() {
    let app = test_app();

    // Add one unit of product A; a session cookie is issued.
    let response = app
        .clone()
        .oneshot(form_request(
            "/cart/add",
            "product_id=A&name=Pain+de+Campagne&price=4.50",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = session_cookie(&response).expect("session cookie after first mutation");
    assert_eq!(body_text(response).await.trim(), "1");

    // Add the same product again: one line, quantity 2.
    let response = app
        .clone()
        .oneshot(form_request(
            "/cart/add",
            "product_id=A&name=Pain+de+Campagne&price=4.50",
            Some(&cookie),
        ))
        .await
        .unwrap();
    assert_eq!(body_text(response).await.trim(), "2");

    // The cart page shows the recomputed total.
    let response = app
        .clone()
        .oneshot(get_request("/cart", Some(&cookie)))
        .await
        .unwrap();
    let page = body_text(response).await;
    assert!(page.contains("Pain de Campagne"));
    assert!(page.contains("9.00 €"));

    // Decrement back to one unit.
    let response = app
        .clone()
        .oneshot(form_request(
            "/cart/update",
            "product_id=A&delta=-1",
            Some(&cookie),
        ))
        .await
        .unwrap();
    let fragment = body_text(response).await;
    assert!(fragment.contains("4.50 €"));

    // Decrement to zero: the line disappears entirely.
    let response = app
        .clone()
        .oneshot(form_request(
            "/cart/update",
            "product_id=A&delta=-1",
            Some(&cookie),
        ))
        .await
        .unwrap();
    let fragment = body_text(response).await;
    assert!(fragment.contains("Votre panier est vide."));
}

#[tokio::test]
async fn cart_update_unknown_product_is_noop() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(form_request(
            "/cart/add",
            "product_id=A&name=Croissant&price=1.20",
            None,
        ))
        .await
        .unwrap();
    let cookie = session_cookie(&response).unwrap();

    let response = app
        .clone()
        .oneshot(form_request(
            "/cart/update",
            "product_id=missing&delta=5",
            Some(&cookie),
        ))
        .await
        .unwrap();
    let fragment = body_text(response).await;
    assert!(fragment.contains("1 articles"));
}

#[tokio::test]
async fn cart_persists_across_requests() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(form_request(
            "/cart/add",
            "product_id=A&name=Croissant&price=1.20",
            None,
        ))
        .await
        .unwrap();
    let cookie = session_cookie(&response).unwrap();

    // A fresh request with the same cookie sees the same cart.
    let response = app
        .clone()
        .oneshot(get_request("/cart/count", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(body_text(response).await.trim(), "1");

    // A request without the cookie sees an empty cart.
    let response = app
        .clone()
        .oneshot(get_request("/cart/count", None))
        .await
        .unwrap();
    assert_eq!(body_text(response).await.trim(), "0");
}

#[tokio::test]
async fn cart_remove_and_clear() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(form_request(
            "/cart/add",
            "product_id=A&name=Pain&price=4.50",
            None,
        ))
        .await
        .unwrap();
    let cookie = session_cookie(&response).unwrap();

    app.clone()
        .oneshot(form_request(
            "/cart/add",
            "product_id=B&name=Croissant&price=1.20",
            Some(&cookie),
        ))
        .await
        .unwrap();

    // Remove one line; the other stays.
    let response = app
        .clone()
        .oneshot(form_request(
            "/cart/remove",
            "product_id=A",
            Some(&cookie),
        ))
        .await
        .unwrap();
    let fragment = body_text(response).await;
    assert!(fragment.contains("Croissant"));
    assert!(!fragment.contains(">Pain<"));
    assert!(fragment.contains("Total (1 articles)"));

    // Clear empties the cart.
    let response = app
        .clone()
        .oneshot(form_request("/cart/clear", "", Some(&cookie)))
        .await
        .unwrap();
    let fragment = body_text(response).await;
    assert!(fragment.contains("Votre panier est vide."));
}

#[tokio::test]
async fn protected_paths_redirect_to_login_without_token() {
    let app = test_app();

    for path in [
        "/ma-boulangerie",
        "/my-cake",
        "/mes-savons",
        "/ma-periculture",
    ] {
        let response = app.clone().oneshot(get_request(path, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "path {path}");
        assert_eq!(
            response
                .headers()
                .get(header::LOCATION)
                .and_then(|value| value.to_str().ok()),
            Some("/login"),
            "path {path}"
        );
    }
}

#[tokio::test]
async fn public_pages_do_not_require_a_token() {
    let app = test_app();

    for path in ["/", "/commerces", "/login", "/register", "/cart"] {
        let response = app.clone().oneshot(get_request(path, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "path {path}");
    }
}

#[tokio::test]
async fn login_page_shows_registration_banner() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(get_request("/login?registered=1", None))
        .await
        .unwrap();
    let page = body_text(response).await;
    assert!(page.contains("Inscription réussie"));
}

#[tokio::test]
async fn register_rejects_mismatched_passwords_locally() {
    let app = test_app();

    // No backend is running; a local precondition failure must short-circuit
    // before any network call.
    let response = app
        .clone()
        .oneshot(form_request(
            "/register",
            "email=vendor%40example.com&password=secret1&password_confirm=secret2",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;
    assert!(page.contains("Les mots de passe ne correspondent pas."));
}

#[tokio::test]
async fn register_rejects_short_passwords_locally() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(form_request(
            "/register",
            "email=vendor%40example.com&password=abc&password_confirm=abc",
            None,
        ))
        .await
        .unwrap();
    let page = body_text(response).await;
    assert!(page.contains("au moins 6 caractères"));
}

#[tokio::test]
async fn unknown_path_is_not_found() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(get_request("/savonnerie-inconnue", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
