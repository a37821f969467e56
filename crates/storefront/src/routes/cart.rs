//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! The cart itself lives in the session; mutations are pure session
//! operations with no backend round-trip. Add-to-cart forms carry the
//! product snapshot fields from the rendered catalog, so the price a visitor
//! saw is the price their cart keeps.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    response::{AppendHeaders, IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use e_souk_core::{Cart, Price, ProductId, ProductSnapshot};

use crate::cart::{load_cart, save_cart};
use crate::filters;

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub product_id: String,
    pub name: String,
    pub quantity: u32,
    pub unit_price: String,
    pub line_price: String,
    pub image: Option<String>,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total_items: u64,
    pub total_price: String,
}

impl CartView {
    /// Create an empty cart view.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total_items: 0,
            total_price: Price::default().display(),
        }
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        let totals = cart.totals();
        Self {
            items: cart
                .lines()
                .iter()
                .map(|line| CartItemView {
                    product_id: line.product_id.to_string(),
                    name: line.snapshot.name.clone(),
                    quantity: line.quantity,
                    unit_price: line.snapshot.unit_price.display(),
                    line_price: line.line_price().display(),
                    image: line.snapshot.image.clone(),
                })
                .collect(),
            total_items: totals.total_items,
            total_price: totals.total_price.display(),
        }
    }
}

// =============================================================================
// Form Types
// =============================================================================

/// Add to cart form data: the product id plus its snapshot fields.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub image: Option<String>,
}

/// Quantity delta form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: String,
    pub delta: i64,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u64,
}

// =============================================================================
// Handlers
// =============================================================================

/// Persist the cart, logging instead of failing the response; the in-memory
/// mutation already happened and the fragment should still render.
async fn persist(session: &Session, cart: &Cart) {
    if let Err(e) = save_cart(session, cart).await {
        tracing::error!("Failed to persist cart to session: {e}");
    }
}

fn items_fragment(cart: &Cart) -> Response {
    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            cart: CartView::from(cart),
        },
    )
        .into_response()
}

/// Display the cart page.
#[instrument(skip(session))]
pub async fn show(session: Session) -> impl IntoResponse {
    let cart = load_cart(&session).await;
    CartShowTemplate {
        cart: CartView::from(&cart),
    }
}

/// Add one unit of a product to the cart (HTMX).
///
/// Returns the cart count badge with a trigger to refresh other fragments.
#[instrument(skip(session, form))]
pub async fn add(session: Session, Form(form): Form<AddToCartForm>) -> Response {
    let mut cart = load_cart(&session).await;

    cart.add_item(
        ProductId::new(form.product_id),
        ProductSnapshot {
            name: form.name,
            unit_price: Price::new(form.price),
            image: form.image.filter(|image| !image.is_empty()),
        },
    );
    persist(&session, &cart).await;

    let count = cart.totals().total_items;
    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartCountTemplate { count },
    )
        .into_response()
}

/// Apply a quantity delta to a cart line (HTMX).
///
/// A line reaching zero is removed; unknown product ids are a no-op.
#[instrument(skip(session))]
pub async fn update(session: Session, Form(form): Form<UpdateCartForm>) -> Response {
    let mut cart = load_cart(&session).await;

    cart.update_quantity(&ProductId::new(form.product_id), form.delta);
    persist(&session, &cart).await;

    items_fragment(&cart)
}

/// Remove a line from the cart (HTMX).
#[instrument(skip(session))]
pub async fn remove(session: Session, Form(form): Form<RemoveFromCartForm>) -> Response {
    let mut cart = load_cart(&session).await;

    cart.remove_item(&ProductId::new(form.product_id));
    persist(&session, &cart).await;

    items_fragment(&cart)
}

/// Empty the cart (HTMX).
///
/// The confirmation step lives in the template (`hx-confirm`), not here.
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Response {
    let mut cart = load_cart(&session).await;

    cart.clear();
    persist(&session, &cart).await;

    items_fragment(&cart)
}

/// Get the cart count badge (HTMX).
#[instrument(skip(session))]
pub async fn count(session: Session) -> impl IntoResponse {
    let cart = load_cart(&session).await;
    CartCountTemplate {
        count: cart.totals().total_items,
    }
}
