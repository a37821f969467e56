//! Public shop page handler.
//!
//! One parameterized handler serves every shop in the registry; the route
//! layer attaches the `&'static Shop` as an extension.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Extension, extract::State, response::IntoResponse};
use tower_sessions::Session;
use tracing::instrument;

use e_souk_core::Product;

use crate::cart::load_cart;
use crate::filters;
use crate::middleware::OptionalVendorAuth;
use crate::routes::cart::CartView;
use crate::shops::Shop;
use crate::state::AppState;

/// Product display data for the public catalog.
pub struct ShopProductView {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Rounded for display, e.g. "4.50 €".
    pub price_display: String,
    /// Exact decimal carried into the add-to-cart form.
    pub price_value: String,
    pub image: Option<String>,
}

impl From<&Product> for ShopProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            description: product.description.clone(),
            price_display: product.price.display(),
            price_value: product.price.amount().to_string(),
            image: product.image.clone(),
        }
    }
}

/// Public shop page template.
#[derive(Template, WebTemplate)]
#[template(path = "shop/show.html")]
pub struct ShopPageTemplate {
    pub shop: &'static Shop,
    pub products: Vec<ShopProductView>,
    pub cart: CartView,
    pub error: Option<String>,
    pub logged_in: bool,
}

/// Display a shop's published products with the cart sidebar.
///
/// A backend failure degrades to an empty grid with a banner; the page never
/// hard-errors.
#[instrument(skip(state, session, vendor), fields(shop = %shop.name))]
pub async fn show(
    Extension(shop): Extension<&'static Shop>,
    State(state): State<AppState>,
    session: Session,
    OptionalVendorAuth(vendor): OptionalVendorAuth,
) -> impl IntoResponse {
    let (products, error) = match state.backend().published_products().await {
        Ok(products) => {
            let views = products.iter().map(ShopProductView::from).collect();
            (views, None)
        }
        Err(e) => {
            tracing::warn!("Failed to fetch published products: {e}");
            (
                Vec::new(),
                Some("Impossible de charger les produits. Vérifiez la connexion au serveur.".to_string()),
            )
        }
    };

    let cart = load_cart(&session).await;

    ShopPageTemplate {
        shop,
        products,
        cart: CartView::from(&cart),
        error,
        logged_in: vendor.is_some(),
    }
}
