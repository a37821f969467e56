//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Home page
//! GET  /health                  - Health check
//! GET  /commerces               - Shop directory (search + category filter)
//!
//! # Public shop pages (one per registry entry)
//! GET  /boulangerie-publique    - Published products + cart sidebar
//! GET  /cake-publique
//! GET  /savons-publique
//! GET  /periculture-publique
//!
//! # Cart (HTMX fragments)
//! GET  /cart                    - Cart page
//! POST /cart/add                - Add to cart (returns count badge)
//! POST /cart/update             - Apply quantity delta (returns cart_items fragment)
//! POST /cart/remove             - Remove item (returns cart_items fragment)
//! POST /cart/clear              - Empty the cart (returns cart_items fragment)
//! GET  /cart/count              - Cart count badge (fragment)
//!
//! # Auth
//! GET  /login                   - Login page (?from= seeds the redirect intent)
//! POST /login                   - Login action
//! GET  /register                - Register page
//! POST /register                - Register action
//! POST /logout                  - Logout action
//!
//! # Vendor admin panels (protected, one per registry entry)
//! GET  /ma-boulangerie          - Panel (product list, add/edit forms)
//! POST /ma-boulangerie/products                  - Create product (multipart)
//! POST /ma-boulangerie/products/{id}             - Update product (multipart)
//! POST /ma-boulangerie/products/{id}/delete      - Delete product
//! POST /ma-boulangerie/products/{id}/publish     - Publish/unpublish toggle
//! POST /ma-boulangerie/categories                - Create category
//! POST /ma-boulangerie/categories/{id}/delete    - Delete category
//! (same shape under /my-cake, /mes-savons, /ma-periculture)
//! ```

pub mod admin;
pub mod auth;
pub mod cart;
pub mod home;
pub mod shop;

use axum::{
    Extension, Router,
    routing::{get, post},
};

use crate::shops::SHOPS;
use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    let mut router = Router::new()
        .route("/", get(home::home))
        .route("/commerces", get(home::commerces))
        .nest("/cart", cart_routes())
        .merge(auth_routes());

    // Public catalog page and protected admin panel for every shop in the
    // registry; each route carries its shop via an extension.
    for shop in &SHOPS {
        router = router
            .route(shop.public_path, get(shop::show).layer(Extension(shop)))
            .nest(shop.admin_path, admin::routes(shop));
    }

    router
}
