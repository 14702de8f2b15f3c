//! Product model and request/response DTOs
//!
//! This module defines the stored document type and the bodies used for
//! serializing/deserializing HTTP requests and responses.

pub mod product;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use product::Product;
pub use requests::{parse_date, CreateProductRequest, DeleteProductRequest};
pub use responses::{ErrorResponse, MessageResponse};
