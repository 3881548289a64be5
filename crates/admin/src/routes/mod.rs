//! HTTP route handlers for the panel.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                - Health check
//!
//! # Products (proxied to Shopify)
//! GET    /products?query=       - Product listing / search
//! POST   /products/store        - Create product (JSON)
//! POST   /product/store         - Same, legacy path
//! PUT    /products/{id}         - Update title / add image
//! DELETE /products/{id}         - Delete product
//!
//! # Uploads (multipart)
//! POST   /hello/upload-image    - Staged image upload
//! POST   /products/upload-file  - Same, legacy path
//!
//! # Collections
//! GET    /collections           - Custom collection listing
//! ```

pub mod collections;
pub mod products;
pub mod uploads;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post, put},
};

use crate::state::AppState;

/// Room for multipart boundaries and text fields on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::index))
        .route("/products/store", post(products::store))
        .route("/product/store", post(products::store))
        .route(
            "/products/{id}",
            put(products::update).delete(products::destroy),
        )
}

/// Create the upload routes router.
///
/// The body limit is the configured upload limit plus multipart overhead, so
/// oversized files are refused before they are buffered.
pub fn upload_routes(max_upload_bytes: u64) -> Router<AppState> {
    let limit = usize::try_from(max_upload_bytes)
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    Router::new()
        .route("/hello/upload-image", post(uploads::upload_image))
        .route("/products/upload-file", post(uploads::upload_image))
        .layer(DefaultBodyLimit::max(limit))
}

/// Create the collection routes router.
pub fn collection_routes() -> Router<AppState> {
    Router::new().route("/collections", get(collections::index))
}

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    let max_upload_bytes = state.config().upload.max_bytes;

    Router::new()
        .route("/health", get(health))
        .merge(product_routes())
        .merge(upload_routes(max_upload_bytes))
        .merge(collection_routes())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}
