//! Document Store
//!
//! In-memory product collection with optional JSON file persistence.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::StoreError;
use crate::models::Product;
use crate::store::ProductStore;

// == Document Store ==
/// Product collection kept in insertion order.
///
/// When a backing file is configured, every mutation rewrites it before the
/// in-memory change becomes visible; a failed write leaves the collection as
/// it was.
#[derive(Debug)]
pub struct DocumentStore {
    /// Stored documents
    products: RwLock<Vec<Product>>,
    /// Optional JSON snapshot location
    path: Option<PathBuf>,
}

impl DocumentStore {
    // == Constructors ==
    /// Creates an empty store that lives only in memory.
    pub fn in_memory() -> Self {
        Self {
            products: RwLock::new(Vec::new()),
            path: None,
        }
    }

    /// Opens a store backed by `path`, loading any existing snapshot.
    ///
    /// A missing file is treated as an empty collection.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        let products = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.is_empty() => Vec::new(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    tokio::fs::create_dir_all(parent).await?;
                }
                Vec::new()
            }
            Err(err) => return Err(err.into()),
        };

        info!(
            "Loaded {} products from {}",
            products.len(),
            path.display()
        );

        Ok(Self {
            products: RwLock::new(products),
            path: Some(path),
        })
    }

    // == Persist ==
    /// Writes the snapshot via a temp file and rename. No-op without a path.
    async fn persist(&self, products: &[Product]) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let bytes = serde_json::to_vec_pretty(products)?;
        let tmp = temp_path(path);
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, path).await?;

        debug!("Persisted {} products to {}", products.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
impl DocumentStore {
    /// Returns the number of stored products.
    pub(crate) async fn len(&self) -> usize {
        self.products.read().await.len()
    }

    pub(crate) async fn is_empty(&self) -> bool {
        self.products.read().await.is_empty()
    }
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

#[async_trait]
impl ProductStore for DocumentStore {
    async fn find_all(&self) -> Result<Vec<Product>, StoreError> {
        Ok(self.products.read().await.clone())
    }

    async fn find_by_barcode(&self, barcode: &str) -> Result<Option<Product>, StoreError> {
        let products = self.products.read().await;
        Ok(products.iter().find(|p| p.barcode == barcode).cloned())
    }

    async fn find_in_range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Product>, StoreError> {
        let products = self.products.read().await;
        Ok(products
            .iter()
            .filter(|p| p.expiration_date >= from && p.expiration_date <= to)
            .cloned()
            .collect())
    }

    async fn insert(&self, product: Product) -> Result<(), StoreError> {
        let mut products = self.products.write().await;
        products.push(product);

        if let Err(err) = self.persist(&products).await {
            products.pop();
            return Err(err);
        }
        Ok(())
    }

    async fn delete_by_key(
        &self,
        barcode: &str,
        expiration_date: NaiveDate,
    ) -> Result<Option<Product>, StoreError> {
        let mut products = self.products.write().await;
        let Some(index) = products
            .iter()
            .position(|p| p.matches_key(barcode, expiration_date))
        else {
            return Ok(None);
        };

        let removed = products.remove(index);
        if let Err(err) = self.persist(&products).await {
            products.insert(index, removed);
            return Err(err);
        }
        Ok(Some(removed))
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn product(barcode: &str, expires: NaiveDate) -> Product {
        Product::new(barcode, Some(format!("Item {}", barcode)), "1", expires)
    }

    #[tokio::test]
    async fn test_store_insert_and_find() {
        let store = DocumentStore::in_memory();
        assert!(store.is_empty().await);

        store.insert(product("123", date(2025, 5, 1))).await.unwrap();

        let found = store.find_by_barcode("123").await.unwrap().unwrap();
        assert_eq!(found.barcode, "123");
        assert!(store.find_by_barcode("999").await.unwrap().is_none());
        assert_eq!(store.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_find_by_barcode_returns_first_batch() {
        let store = DocumentStore::in_memory();
        store.insert(product("123", date(2025, 5, 1))).await.unwrap();
        store.insert(product("123", date(2025, 6, 1))).await.unwrap();

        let found = store.find_by_barcode("123").await.unwrap().unwrap();
        assert_eq!(found.expiration_date, date(2025, 5, 1));
    }

    #[tokio::test]
    async fn test_find_in_range_inclusive() {
        let store = DocumentStore::in_memory();
        for (code, day) in [("a", 9), ("b", 10), ("c", 15), ("d", 20), ("e", 21)] {
            store.insert(product(code, date(2025, 1, day))).await.unwrap();
        }

        let found = store
            .find_in_range(date(2025, 1, 10), date(2025, 1, 20))
            .await
            .unwrap();
        let codes: Vec<_> = found.iter().map(|p| p.barcode.as_str()).collect();
        assert_eq!(codes, vec!["b", "c", "d"]);
    }

    #[tokio::test]
    async fn test_delete_requires_compound_key() {
        let store = DocumentStore::in_memory();
        store.insert(product("123", date(2025, 5, 1))).await.unwrap();
        store.insert(product("123", date(2025, 6, 1))).await.unwrap();

        let missed = store.delete_by_key("123", date(2025, 5, 2)).await.unwrap();
        assert!(missed.is_none());
        assert_eq!(store.len().await, 2);

        let removed = store.delete_by_key("123", date(2025, 6, 1)).await.unwrap();
        assert_eq!(removed.unwrap().expiration_date, date(2025, 6, 1));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("products.json");

        {
            let store = DocumentStore::open(&path).await.unwrap();
            store.insert(product("1", date(2025, 5, 1))).await.unwrap();
            store.insert(product("2", date(2025, 5, 2))).await.unwrap();
            store.delete_by_key("1", date(2025, 5, 1)).await.unwrap();
        }

        let reopened = DocumentStore::open(&path).await.unwrap();
        let all = reopened.find_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].barcode, "2");
        assert!(!temp_path(&path).exists());
    }

    #[tokio::test]
    async fn test_open_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.json");
        std::fs::write(&path, b"not json").unwrap();

        let result = DocumentStore::open(&path).await;
        assert!(matches!(result, Err(StoreError::Serialization(_))));
    }

    #[tokio::test]
    async fn test_failed_write_rolls_back_insert() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.json");
        let store = DocumentStore::open(&path).await.unwrap();

        // Snapshot directory disappears, so the temp file cannot be written.
        drop(dir);

        let result = store.insert(product("1", date(2025, 5, 1))).await;
        assert!(matches!(result, Err(StoreError::Io(_))));
        assert!(store.is_empty().await);
    }
}
