//! API Handlers
//!
//! HTTP request handlers for each product endpoint. Handlers only validate,
//! call the store and shape the response.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use crate::error::{AppError, Result};
use crate::models::{CreateProductRequest, DeleteProductRequest, MessageResponse, Product};
use crate::store::ProductStore;

const PRODUCT_NOT_FOUND: &str = "Product not found";

/// Application state shared across all handlers.
///
/// Holds the store handle built at startup; nothing is global.
#[derive(Clone)]
pub struct AppState {
    /// Product persistence
    pub store: Arc<dyn ProductStore>,
}

impl AppState {
    /// Creates a new AppState around the given store.
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        Self { store }
    }

    /// Creates an AppState backed by an empty in-memory store.
    #[cfg(test)]
    pub(crate) fn in_memory() -> Self {
        Self::new(Arc::new(crate::store::DocumentStore::in_memory()))
    }
}

/// Handler for GET /
///
/// Liveness message.
pub async fn root_handler() -> &'static str {
    "Server is Running"
}

/// Handler for GET /users
///
/// Lists every stored product.
pub async fn list_products_handler(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let products = state.store.find_all().await?;
    Ok(Json(products))
}

/// Handler for GET /users/:barcode
///
/// Returns the first product stored under the barcode.
pub async fn get_product_handler(
    State(state): State<AppState>,
    Path(barcode): Path<String>,
) -> Result<Json<Product>> {
    state
        .store
        .find_by_barcode(&barcode)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(PRODUCT_NOT_FOUND.to_string()))
}

/// Handler for POST /users
///
/// Validates and stores a new product batch. The body is read raw so that a
/// missing, empty or malformed body still gets a JSON 400.
pub async fn create_product_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    let product = CreateProductRequest::from_body(&body)
        .and_then(CreateProductRequest::into_product)
        .map_err(AppError::Validation)?;
    let barcode = product.barcode.clone();

    state.store.insert(product).await?;
    info!(barcode = %barcode, "Product created");

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Product created successfully")),
    ))
}

/// Handler for DELETE /users
///
/// Deletes the batch matching both barcode and expiration date.
pub async fn delete_product_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<MessageResponse>> {
    let (barcode, expiration_date) = DeleteProductRequest::from_body(&body)
        .and_then(DeleteProductRequest::into_key)
        .map_err(AppError::Validation)?;

    match state.store.delete_by_key(&barcode, expiration_date).await? {
        Some(_) => {
            info!(barcode = %barcode, %expiration_date, "Product deleted");
            Ok(Json(MessageResponse::new("Product deleted successfully")))
        }
        None => Err(AppError::NotFound(PRODUCT_NOT_FOUND.to_string())),
    }
}
