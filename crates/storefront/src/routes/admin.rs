//! Vendor admin panel route handlers.
//!
//! One parameterized panel serves every shop in the registry: full product
//! list (including unpublished), add/edit forms with multipart image upload,
//! delete, publish toggle, and category management for shops configured with
//! it. Every action redirects back to the panel with a `?success=`/`?error=`
//! message; nothing here is fatal.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Extension, Router,
    extract::{Multipart, Path, Query, State},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use e_souk_core::{CategoryId, CategoryRecord, Product, ProductId};

use crate::backend::{ImageUpload, ProductInput};
use crate::error::AppError;
use crate::filters;
use crate::middleware::RequireVendorAuth;
use crate::shops::Shop;
use crate::state::AppState;

/// Create the admin panel router for one shop.
pub fn routes(shop: &'static Shop) -> Router<AppState> {
    Router::new()
        .route("/", get(panel))
        .route("/products", post(create_product))
        .route("/products/{id}", post(update_product))
        .route("/products/{id}/delete", post(delete_product))
        .route("/products/{id}/publish", post(toggle_publish))
        .route("/categories", post(create_category))
        .route("/categories/{id}/delete", post(delete_category))
        .layer(Extension(shop))
}

// =============================================================================
// Views
// =============================================================================

/// Product display data for the panel.
#[derive(Clone)]
pub struct AdminProductView {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Rounded for display, e.g. "4.50 €".
    pub price_display: String,
    /// Exact decimal for the edit form.
    pub price_value: String,
    pub image: Option<String>,
    pub is_published: bool,
    pub category_id: Option<String>,
    pub category_label: Option<String>,
}

impl From<&Product> for AdminProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            description: product.description.clone(),
            price_display: product.price.display(),
            price_value: product.price.amount().to_string(),
            image: product.image.clone(),
            is_published: product.is_published,
            category_id: product.category.id().map(ToString::to_string),
            category_label: product.category.name().map(ToOwned::to_owned),
        }
    }
}

/// Category display data for the panel.
#[derive(Clone)]
pub struct CategoryView {
    pub id: String,
    pub name: String,
    /// Preselected in the edit form.
    pub selected: bool,
}

// =============================================================================
// Query and Form Types
// =============================================================================

/// Panel query parameters: flash messages and the product being edited.
#[derive(Debug, Deserialize)]
pub struct PanelQuery {
    pub error: Option<String>,
    pub success: Option<String>,
    pub edit: Option<String>,
}

/// Publish toggle form data.
#[derive(Debug, Deserialize)]
pub struct PublishForm {
    pub is_published: bool,
}

/// New category form data.
#[derive(Debug, Deserialize)]
pub struct NewCategoryForm {
    pub name: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Admin panel page template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/panel.html")]
pub struct AdminPanelTemplate {
    pub shop: &'static Shop,
    pub products: Vec<AdminProductView>,
    pub categories: Vec<CategoryView>,
    pub edit: Option<AdminProductView>,
    pub error: Option<String>,
    pub success: Option<String>,
}

// =============================================================================
// Multipart Parsing
// =============================================================================

/// Raw fields read from the product form.
#[derive(Default)]
struct ProductFormData {
    name: Option<String>,
    description: Option<String>,
    price: Option<String>,
    category: Option<String>,
    image: Option<ImageUpload>,
}

async fn read_product_form(mut multipart: Multipart) -> Result<ProductFormData, AppError> {
    let mut data = ProductFormData::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_owned();
        match name.as_str() {
            "name" => {
                data.name = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?,
                );
            }
            "description" => {
                data.description = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?,
                );
            }
            "price" => {
                data.price = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?,
                );
            }
            "category" => {
                data.category = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?,
                );
            }
            "image" => {
                let file_name = field.file_name().map(ToOwned::to_owned);
                let content_type = field.content_type().map(ToOwned::to_owned);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                // An empty file input still submits a zero-byte part.
                if !bytes.is_empty() {
                    data.image = Some(ImageUpload {
                        file_name: file_name.unwrap_or_else(|| "image".to_string()),
                        content_type,
                        bytes: bytes.to_vec(),
                    });
                }
            }
            _ => {}
        }
    }

    Ok(data)
}

impl ProductFormData {
    /// Validate into a backend payload. `require_image` distinguishes the
    /// add form (image mandatory) from the edit form (image optional).
    fn into_input(self, require_image: bool) -> Result<ProductInput, String> {
        let name = self.name.unwrap_or_default();
        let description = self.description.unwrap_or_default();
        let price_text = self.price.unwrap_or_default();

        if name.is_empty()
            || description.is_empty()
            || price_text.is_empty()
            || (require_image && self.image.is_none())
        {
            return Err(
                "Tous les champs (Nom, Description, Prix, Image) doivent être remplis.".to_string(),
            );
        }

        let price = price_text
            .parse::<Decimal>()
            .map_err(|_| "Le prix doit être un nombre valide.".to_string())?;

        Ok(ProductInput {
            name,
            description,
            price,
            category: self
                .category
                .filter(|category| !category.is_empty())
                .map(CategoryId::new),
            image: self.image,
        })
    }
}

// =============================================================================
// Redirect Helpers
// =============================================================================

fn back_with_success(shop: &Shop, message: &str) -> Response {
    Redirect::to(&format!(
        "{}?success={}",
        shop.admin_path,
        urlencoding::encode(message)
    ))
    .into_response()
}

fn back_with_error(shop: &Shop, message: &str) -> Response {
    Redirect::to(&format!(
        "{}?error={}",
        shop.admin_path,
        urlencoding::encode(message)
    ))
    .into_response()
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the admin panel: add/edit form, product list, categories.
#[instrument(skip(vendor, state, query), fields(shop = %shop.name))]
pub async fn panel(
    RequireVendorAuth(vendor): RequireVendorAuth,
    Extension(shop): Extension<&'static Shop>,
    State(state): State<AppState>,
    Query(query): Query<PanelQuery>,
) -> impl IntoResponse {
    let (products, fetch_error) = match state.backend().products(&vendor.token).await {
        Ok(products) => {
            let views: Vec<AdminProductView> =
                products.iter().map(AdminProductView::from).collect();
            (views, None)
        }
        Err(e) => {
            tracing::error!("Failed to fetch products: {e}");
            (
                Vec::new(),
                Some(
                    "Impossible de charger les produits. Vérifiez la connexion au serveur API."
                        .to_string(),
                ),
            )
        }
    };

    let edit = query
        .edit
        .as_deref()
        .and_then(|id| products.iter().find(|p| p.id == id).cloned());

    let records: Vec<CategoryRecord> = if shop.categories {
        state
            .backend()
            .categories(&vendor.token)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to fetch categories: {e}");
                Vec::new()
            })
    } else {
        Vec::new()
    };
    let categories = records
        .into_iter()
        .map(|record| CategoryView {
            selected: edit
                .as_ref()
                .and_then(|p| p.category_id.as_deref())
                .is_some_and(|id| id == record.id.as_str()),
            id: record.id.to_string(),
            name: record.name,
        })
        .collect();

    AdminPanelTemplate {
        shop,
        products,
        categories,
        edit,
        error: query.error.or(fetch_error),
        success: query.success,
    }
}

/// Create a product from the add form (multipart, image required).
#[instrument(skip(vendor, state, multipart), fields(shop = %shop.name))]
pub async fn create_product(
    RequireVendorAuth(vendor): RequireVendorAuth,
    Extension(shop): Extension<&'static Shop>,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let form = read_product_form(multipart).await?;
    let input = match form.into_input(true) {
        Ok(input) => input,
        Err(message) => return Ok(back_with_error(shop, &message)),
    };

    match state.backend().create_product(&vendor.token, input).await {
        Ok(product) => Ok(back_with_success(
            shop,
            &format!("Produit \"{}\" ajouté avec succès!", product.name),
        )),
        Err(e) => {
            tracing::error!("Failed to create product: {e}");
            Ok(back_with_error(
                shop,
                &e.user_message("Erreur inconnue lors de l'ajout."),
            ))
        }
    }
}

/// Update a product from the edit form (multipart, image optional).
#[instrument(skip(vendor, state, multipart), fields(shop = %shop.name, product_id = %id))]
pub async fn update_product(
    RequireVendorAuth(vendor): RequireVendorAuth,
    Extension(shop): Extension<&'static Shop>,
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let form = read_product_form(multipart).await?;
    let input = match form.into_input(false) {
        Ok(input) => input,
        Err(message) => return Ok(back_with_error(shop, &message)),
    };

    let product_id = ProductId::new(id);
    match state
        .backend()
        .update_product(&vendor.token, &product_id, input)
        .await
    {
        Ok(product) => Ok(back_with_success(
            shop,
            &format!("Produit \"{}\" modifié avec succès!", product.name),
        )),
        Err(e) => {
            tracing::error!("Failed to update product: {e}");
            Ok(back_with_error(
                shop,
                &e.user_message("Erreur inconnue lors de la modification."),
            ))
        }
    }
}

/// Delete a product. The confirmation prompt lives in the template.
#[instrument(skip(vendor, state), fields(shop = %shop.name, product_id = %id))]
pub async fn delete_product(
    RequireVendorAuth(vendor): RequireVendorAuth,
    Extension(shop): Extension<&'static Shop>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let product_id = ProductId::new(id);
    match state
        .backend()
        .delete_product(&vendor.token, &product_id)
        .await
    {
        Ok(()) => back_with_success(shop, "Produit supprimé avec succès!"),
        Err(e) => {
            tracing::error!("Failed to delete product: {e}");
            back_with_error(shop, &e.user_message("Erreur lors de la suppression."))
        }
    }
}

/// Publish or unpublish a product.
#[instrument(skip(vendor, state), fields(shop = %shop.name, product_id = %id))]
pub async fn toggle_publish(
    RequireVendorAuth(vendor): RequireVendorAuth,
    Extension(shop): Extension<&'static Shop>,
    State(state): State<AppState>,
    Path(id): Path<String>,
    axum::Form(form): axum::Form<PublishForm>,
) -> Response {
    let product_id = ProductId::new(id);
    match state
        .backend()
        .set_published(&vendor.token, &product_id, form.is_published)
        .await
    {
        Ok(product) => {
            let message = if product.is_published {
                format!("Produit \"{}\" publié.", product.name)
            } else {
                format!("Produit \"{}\" dépublié.", product.name)
            };
            back_with_success(shop, &message)
        }
        Err(e) => {
            tracing::error!("Failed to toggle publish state: {e}");
            back_with_error(shop, &e.user_message("Erreur lors de la publication."))
        }
    }
}

/// Create a category (shops with category support only).
#[instrument(skip(vendor, state, form), fields(shop = %shop.name))]
pub async fn create_category(
    RequireVendorAuth(vendor): RequireVendorAuth,
    Extension(shop): Extension<&'static Shop>,
    State(state): State<AppState>,
    axum::Form(form): axum::Form<NewCategoryForm>,
) -> Response {
    if !shop.categories {
        return back_with_error(shop, "Ce commerce ne gère pas de catégories.");
    }
    if form.name.trim().is_empty() {
        return back_with_error(shop, "Le nom de la catégorie est obligatoire.");
    }

    match state
        .backend()
        .create_category(&vendor.token, form.name.trim())
        .await
    {
        Ok(category) => {
            back_with_success(shop, &format!("Catégorie \"{}\" ajoutée.", category.name))
        }
        Err(e) => {
            tracing::error!("Failed to create category: {e}");
            back_with_error(shop, &e.user_message("Erreur lors de l'ajout de la catégorie."))
        }
    }
}

/// Delete a category (shops with category support only).
#[instrument(skip(vendor, state), fields(shop = %shop.name, category_id = %id))]
pub async fn delete_category(
    RequireVendorAuth(vendor): RequireVendorAuth,
    Extension(shop): Extension<&'static Shop>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let category_id = CategoryId::new(id);
    match state
        .backend()
        .delete_category(&vendor.token, &category_id)
        .await
    {
        Ok(()) => back_with_success(shop, "Catégorie supprimée."),
        Err(e) => {
            tracing::error!("Failed to delete category: {e}");
            back_with_error(
                shop,
                &e.user_message("Erreur lors de la suppression de la catégorie."),
            )
        }
    }
}
