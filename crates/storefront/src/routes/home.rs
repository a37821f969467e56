//! Home page and shop directory handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::Query, response::IntoResponse};
use serde::Deserialize;

use crate::filters;
use crate::shops::{SHOPS, Shop};

/// Directory search parameters.
#[derive(Debug, Deserialize)]
pub struct DirectoryQuery {
    pub q: Option<String>,
    pub kind: Option<String>,
}

/// Shop card display data for the directory.
pub struct ShopCardView {
    pub name: &'static str,
    pub kind: &'static str,
    pub blurb: &'static str,
    pub public_path: &'static str,
}

impl From<&'static Shop> for ShopCardView {
    fn from(shop: &'static Shop) -> Self {
        Self {
            name: shop.name,
            kind: shop.kind,
            blurb: shop.blurb,
            public_path: shop.public_path,
        }
    }
}

/// Directory filter option.
pub struct KindOption {
    pub value: &'static str,
    pub selected: bool,
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {}

/// Shop directory template.
#[derive(Template, WebTemplate)]
#[template(path = "commerces.html")]
pub struct CommercesTemplate {
    pub shops: Vec<ShopCardView>,
    pub q: String,
    pub kinds: Vec<KindOption>,
}

/// Display the home page.
pub async fn home() -> impl IntoResponse {
    HomeTemplate {}
}

/// Display the shop directory, filtered by name search and category.
pub async fn commerces(Query(query): Query<DirectoryQuery>) -> impl IntoResponse {
    let q = query.q.unwrap_or_default();
    let needle = q.to_lowercase();
    let kind = query.kind.filter(|k| !k.is_empty());

    let shops = SHOPS
        .iter()
        .filter(|shop| needle.is_empty() || shop.name.to_lowercase().contains(&needle))
        .filter(|shop| kind.as_deref().is_none_or(|k| shop.kind == k))
        .map(ShopCardView::from)
        .collect();

    let kinds = SHOPS
        .iter()
        .map(|shop| KindOption {
            value: shop.kind,
            selected: kind.as_deref() == Some(shop.kind),
        })
        .collect();

    CommercesTemplate { shops, q, kinds }
}
