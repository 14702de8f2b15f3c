//! API Module
//!
//! HTTP handlers and routing for the product REST API.
//!
//! # Endpoints
//! - `GET /` - Liveness message
//! - `GET /users` - List all products
//! - `GET /users/:barcode` - Fetch a product by barcode
//! - `POST /users` - Create a product
//! - `DELETE /users` - Delete a product by barcode and expiration date

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
