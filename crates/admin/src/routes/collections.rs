//! Collection route handlers.

use axum::Json;
use tracing::instrument;

use crate::{error::AppError, middleware::ShopContext, shopify::CollectionSummary};

/// Page size for the collection picker.
const COLLECTION_LIMIT: u32 = 250;

/// List custom collections.
///
/// GET /collections
#[instrument(skip(shop), fields(shop = %shop.shop_domain))]
pub async fn index(shop: ShopContext) -> Result<Json<Vec<CollectionSummary>>, AppError> {
    let collections = shop.client.list_custom_collections(COLLECTION_LIMIT).await?;
    Ok(Json(collections))
}
