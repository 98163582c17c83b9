//! HTTP surface for the product catalog.
//!
//! Endpoints:
//! - `GET    /productos/`     — list products, optional `categoria`/`nombre` filters
//! - `GET    /productos/{id}` — fetch the product at a position
//! - `POST   /productos/`     — append a product
//! - `PUT    /productos/{id}` — replace the product at a position wholesale
//! - `PATCH  /productos/{id}` — merge the supplied fields into the product at a position
//! - `DELETE /productos/{id}` — remove the product at a position
//!
//! `{id}` is a position, not a stored identifier: deleting an element
//! renumbers everything behind it.

use axum::{
    extract::{FromRequest, Path, Query, Request, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use catalogo_core::catalog::{CatalogError, ProductFilter};
use catalogo_core::domain::product::{Product, ProductPatch};
use catalogo_core::SharedCatalog;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{info, warn};

const PRODUCT_NOT_FOUND: &str = "Producto no encontrado";

#[derive(Clone)]
pub struct ProductsState {
    catalog: SharedCatalog,
}

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(rename = "categoria")]
    pub category: Option<String>,
    #[serde(rename = "nombre")]
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MutationResponse {
    #[serde(rename = "mensaje")]
    pub message: &'static str,
    #[serde(rename = "producto")]
    pub product: Product,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

/// `Json` wrapper that reports malformed or incomplete bodies as a 422 with
/// a structured detail payload instead of axum's plain-text rejection.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorBody>);

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err((
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorBody { detail: rejection.body_text() }),
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn router(catalog: SharedCatalog) -> Router {
    Router::new()
        .route("/productos/", get(list_products).post(create_product))
        .route(
            "/productos/{id}",
            get(get_product).put(replace_product).patch(patch_product).delete(delete_product),
        )
        .with_state(ProductsState { catalog })
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn list_products(
    Query(query): Query<ListQuery>,
    State(state): State<ProductsState>,
) -> Json<Vec<Product>> {
    let filter = ProductFilter { category: query.category, name: query.name };
    let products = state.catalog.read().await.list(&filter);

    Json(products)
}

async fn get_product(
    Path(id): Path<i64>,
    State(state): State<ProductsState>,
) -> Result<Json<Product>, (StatusCode, Json<ErrorBody>)> {
    let product = state.catalog.read().await.get(id).map_err(not_found)?;

    Ok(Json(product))
}

async fn create_product(
    State(state): State<ProductsState>,
    JsonBody(product): JsonBody<Product>,
) -> Json<MutationResponse> {
    let mut catalog = state.catalog.write().await;
    let position = catalog.create(product.clone());

    info!(
        event_name = "catalog.product.created",
        position,
        name = %product.name,
        "product appended to catalog"
    );

    Json(MutationResponse { message: "Producto creado", product })
}

async fn replace_product(
    Path(id): Path<i64>,
    State(state): State<ProductsState>,
    JsonBody(product): JsonBody<Product>,
) -> Result<Json<MutationResponse>, (StatusCode, Json<ErrorBody>)> {
    let replaced = state.catalog.write().await.replace(id, product).map_err(not_found)?;

    info!(
        event_name = "catalog.product.replaced",
        position = id,
        name = %replaced.name,
        "product replaced in place"
    );

    Ok(Json(MutationResponse { message: "Producto actualizado", product: replaced }))
}

async fn patch_product(
    Path(id): Path<i64>,
    State(state): State<ProductsState>,
    JsonBody(patch): JsonBody<ProductPatch>,
) -> Result<Json<MutationResponse>, (StatusCode, Json<ErrorBody>)> {
    let merged = state.catalog.write().await.apply_patch(id, &patch).map_err(not_found)?;

    info!(
        event_name = "catalog.product.patched",
        position = id,
        name = %merged.name,
        "supplied fields merged into product"
    );

    Ok(Json(MutationResponse { message: "Producto actualizado parcialmente", product: merged }))
}

async fn delete_product(
    Path(id): Path<i64>,
    State(state): State<ProductsState>,
) -> Result<Json<MutationResponse>, (StatusCode, Json<ErrorBody>)> {
    let mut catalog = state.catalog.write().await;
    let removed = catalog.delete(id).map_err(not_found)?;

    info!(
        event_name = "catalog.product.deleted",
        position = id,
        remaining = catalog.len(),
        "product removed, later positions shifted down"
    );

    Ok(Json(MutationResponse { message: "Producto eliminado", product: removed }))
}

fn not_found(error: CatalogError) -> (StatusCode, Json<ErrorBody>) {
    warn!(
        event_name = "catalog.product.not_found",
        error = %error,
        "request addressed a position outside the catalog"
    );

    (StatusCode::NOT_FOUND, Json(ErrorBody { detail: PRODUCT_NOT_FOUND.to_string() }))
}
