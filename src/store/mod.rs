//! Store Module
//!
//! Persistence contract for product documents and its default implementation.

mod document;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::StoreError;
use crate::models::Product;

pub use document::DocumentStore;

/// Product persistence used by the HTTP handlers and the expiration scanner.
///
/// Each call is atomic on its own; no multi-document transactions exist.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Returns every stored product.
    async fn find_all(&self) -> Result<Vec<Product>, StoreError>;

    /// Returns the first product stored under `barcode`.
    async fn find_by_barcode(&self, barcode: &str) -> Result<Option<Product>, StoreError>;

    /// Returns products expiring within `[from, to]`, both ends inclusive.
    async fn find_in_range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Product>, StoreError>;

    /// Stores a new product.
    async fn insert(&self, product: Product) -> Result<(), StoreError>;

    /// Removes the first product matching the compound key and returns it.
    async fn delete_by_key(
        &self,
        barcode: &str,
        expiration_date: NaiveDate,
    ) -> Result<Option<Product>, StoreError>;
}
