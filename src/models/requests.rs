//! Request DTOs for the product API
//!
//! Defines the structure of incoming HTTP request bodies. Every field is
//! optional here so that a missing field turns into a 400 from validation
//! rather than an extractor rejection. Bodies are parsed from raw bytes: an
//! empty or `null` body reads as `{}`, and any body that is not a JSON object
//! is reported with the same static message as missing fields.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::models::Product;

const MISSING_CREATE_FIELDS: &str = "Barcode, quantity and expiration date are required";
const MISSING_DELETE_FIELDS: &str = "Barcode and expiration date are required";

/// Request body for POST /users
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateProductRequest {
    #[serde(default)]
    pub codigo_barra: Option<Value>,
    #[serde(default)]
    pub nome_produto: Option<Value>,
    #[serde(default)]
    pub quantidade_produto: Option<Value>,
    #[serde(default)]
    pub validade_produto: Option<Value>,
}

impl CreateProductRequest {
    /// Parses a raw request body.
    pub fn from_body(body: &[u8]) -> Result<Self, String> {
        parse_body(body, MISSING_CREATE_FIELDS)
    }

    /// Validates the body and builds the product to insert.
    ///
    /// Returns the client-facing error message if validation fails.
    pub fn into_product(self) -> Result<Product, String> {
        let barcode = text_field(self.codigo_barra);
        let quantity = text_field(self.quantidade_produto);
        let expiration = text_field(self.validade_produto);

        let (Some(barcode), Some(quantity), Some(expiration)) = (barcode, quantity, expiration)
        else {
            return Err(MISSING_CREATE_FIELDS.to_string());
        };
        let expiration_date = parse_date(&expiration)?;

        Ok(Product::new(
            barcode,
            text_field(self.nome_produto),
            quantity,
            expiration_date,
        ))
    }
}

/// Request body for DELETE /users
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeleteProductRequest {
    #[serde(default)]
    pub codigo_barra: Option<Value>,
    #[serde(default)]
    pub validade_produto: Option<Value>,
}

impl DeleteProductRequest {
    /// Parses a raw request body.
    pub fn from_body(body: &[u8]) -> Result<Self, String> {
        parse_body(body, MISSING_DELETE_FIELDS)
    }

    /// Validates the body and returns the compound key to delete.
    pub fn into_key(self) -> Result<(String, NaiveDate), String> {
        let (Some(barcode), Some(expiration)) = (
            text_field(self.codigo_barra),
            text_field(self.validade_produto),
        ) else {
            return Err(MISSING_DELETE_FIELDS.to_string());
        };
        Ok((barcode, parse_date(&expiration)?))
    }
}

fn parse_body<T: DeserializeOwned + Default>(body: &[u8], rejected: &str) -> Result<T, String> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice::<Option<T>>(body)
        .map(Option::unwrap_or_default)
        .map_err(|err| {
            debug!("Rejected request body: {}", err);
            rejected.to_string()
        })
}

/// Reads a JSON string or number as opaque text. Empty strings count as absent.
///
/// Unlike a JS truthiness check, the number `0` counts as present: a batch
/// with zero units left is still a valid record.
fn text_field(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Parses `YYYY-MM-DD` or a full timestamp, keeping only the calendar day.
pub fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.date_naive()))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.date()))
        .map_err(|_| format!("Invalid expiration date: {}", raw))
}
