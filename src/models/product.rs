//! Product document
//!
//! The single record type held by the store. Wire names follow the
//! existing clients of the API (`codigo_barra`, `validade_produto`, ...).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stock batch identified by barcode and expiration date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Document identity assigned on creation
    #[serde(rename = "_id")]
    pub id: Uuid,
    /// Lookup key, shared by batches of the same item
    #[serde(rename = "codigo_barra")]
    pub barcode: String,
    /// Display name
    #[serde(
        rename = "nome_produto",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,
    /// Free-form quantity, e.g. "12" or "3 boxes"
    #[serde(rename = "quantidade_produto")]
    pub quantity: String,
    /// Calendar day the batch expires
    #[serde(rename = "validade_produto")]
    pub expiration_date: NaiveDate,
}

impl Product {
    /// Creates a product with a fresh document id.
    pub fn new(
        barcode: impl Into<String>,
        name: Option<String>,
        quantity: impl Into<String>,
        expiration_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            barcode: barcode.into(),
            name,
            quantity: quantity.into(),
            expiration_date,
        }
    }

    /// Name for human-facing text; unnamed products show their barcode.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.barcode)
    }

    /// True if this document matches the (barcode, expiration date) compound key.
    pub fn matches_key(&self, barcode: &str, expiration_date: NaiveDate) -> bool {
        self.barcode == barcode && self.expiration_date == expiration_date
    }
}
