//! Product route handlers.

use axum::{
    Json,
    extract::{Path, Query, rejection::JsonRejection},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use shop_panel_core::ProductId;
use tracing::instrument;

use crate::{
    error::AppError,
    middleware::ShopContext,
    services::products::{
        self, NewProduct, ProductChanges, ProductUpdateView, ProductView,
    },
};

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
}

/// A price sent either as a JSON number or a string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PriceInput {
    Number(serde_json::Number),
    Text(String),
}

impl PriceInput {
    fn into_text(self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s,
        }
    }
}

/// Body of a create request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductBody {
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    pub price: Option<PriceInput>,
    pub category: Option<String>,
    #[serde(default, alias = "image")]
    pub image_url: String,
}

/// Body of an update request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductBody {
    pub title: Option<String>,
    #[serde(alias = "image")]
    pub image_url: Option<String>,
}

/// Response of a delete request.
#[derive(Debug, Serialize)]
pub struct DeletedView {
    pub id: ProductId,
    pub deleted: bool,
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::Validation(rejection.body_text()))
}

fn product_id(raw: &str) -> Result<ProductId, AppError> {
    ProductId::parse(raw).map_err(|e| AppError::Validation(e.to_string()))
}

/// List or search products.
///
/// GET /products?query=
#[instrument(skip(shop), fields(shop = %shop.shop_domain))]
pub async fn index(
    shop: ShopContext,
    Query(search): Query<SearchQuery>,
) -> Result<Json<Vec<ProductView>>, AppError> {
    let products = products::list_products(&shop.client, search.query.as_deref()).await?;
    Ok(Json(products))
}

/// Create a product with an image.
///
/// POST /products/store
#[instrument(skip(shop, payload), fields(shop = %shop.shop_domain))]
pub async fn store(
    shop: ShopContext,
    payload: Result<Json<CreateProductBody>, JsonRejection>,
) -> Result<(StatusCode, Json<ProductView>), AppError> {
    let body = json_body(payload)?;

    let product = products::create_product(
        &shop.client,
        NewProduct {
            title: body.title,
            description: body.description,
            price: body.price.map(PriceInput::into_text),
            category: body.category,
            image_url: body.image_url,
        },
    )
    .await?;

    tracing::info!(product_id = %product.id, "product created");
    Ok((StatusCode::CREATED, Json(product)))
}

/// Change a product's title or add an image.
///
/// PUT /products/{id}
#[instrument(skip(shop, payload), fields(shop = %shop.shop_domain))]
pub async fn update(
    shop: ShopContext,
    Path(id): Path<String>,
    payload: Result<Json<UpdateProductBody>, JsonRejection>,
) -> Result<Json<ProductUpdateView>, AppError> {
    let id = product_id(&id)?;
    let body = json_body(payload)?;

    let view = products::update_product(
        &shop.client,
        id,
        ProductChanges {
            title: body.title,
            image_url: body.image_url,
        },
    )
    .await?;

    Ok(Json(view))
}

/// Delete a product.
///
/// DELETE /products/{id}
#[instrument(skip(shop), fields(shop = %shop.shop_domain))]
pub async fn destroy(
    shop: ShopContext,
    Path(id): Path<String>,
) -> Result<Json<DeletedView>, AppError> {
    let id = product_id(&id)?;
    products::delete_product(&shop.client, id).await?;

    tracing::info!(product_id = %id, "product deleted");
    Ok(Json(DeletedView { id, deleted: true }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_create_body_accepts_image_alias_and_numeric_price() {
        let body: CreateProductBody = serde_json::from_value(serde_json::json!({
            "title": "Board",
            "price": 19.5,
            "image": "https://cdn.example/x"
        }))
        .unwrap();

        assert_eq!(body.image_url, "https://cdn.example/x");
        assert_eq!(body.price.unwrap().into_text(), "19.5");
    }

    #[test]
    fn test_update_body_accepts_image_url() {
        let body: UpdateProductBody = serde_json::from_value(serde_json::json!({
            "imageUrl": "https://cdn.example/y"
        }))
        .unwrap();

        assert_eq!(body.title, None);
        assert_eq!(body.image_url.as_deref(), Some("https://cdn.example/y"));
    }

    #[test]
    fn test_product_id_accepts_numeric_and_gid() {
        assert_eq!(product_id("42").unwrap(), ProductId::new(42));
        assert_eq!(
            product_id("gid://shopify/Product/42").unwrap(),
            ProductId::new(42)
        );
        assert!(matches!(
            product_id("gid://shopify/Collection/42"),
            Err(AppError::Validation(_))
        ));
    }
}
