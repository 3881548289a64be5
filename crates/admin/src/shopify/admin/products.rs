//! Product CRUD operations for the Admin API.

use reqwest::Method;
use shop_panel_core::{Price, ProductId, VariantId};
use tracing::instrument;

use super::{
    AdminClient, AdminShopifyError,
    conversions::{convert_created_product, convert_product_summary, convert_user_errors},
    queries::{GetProducts, ProductCreate, ProductUpdate, ProductVariantsBulkUpdate},
};
use crate::shopify::types::{CreatedProduct, ProductCreateInput, ProductSummary};

impl AdminClient {
    /// Search products.
    ///
    /// # Arguments
    ///
    /// * `query` - Optional Shopify search syntax, e.g. `title:board*`
    /// * `first` - Maximum number of products to return
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self))]
    pub async fn search_products(
        &self,
        query: Option<&str>,
        first: i64,
    ) -> Result<Vec<ProductSummary>, AdminShopifyError> {
        let variables = super::queries::get_products::Variables {
            first,
            query: query.map(str::to_string),
        };

        let response = self.execute::<GetProducts>(variables).await?;

        let products = response
            .products
            .ok_or_else(|| AdminShopifyError::MalformedResponse("products missing".into()))?;

        products
            .edges
            .into_iter()
            .map(|e| convert_product_summary(e.node))
            .collect()
    }

    /// Create a new product.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns user errors.
    #[instrument(skip(self, input), fields(title = %input.title))]
    pub async fn create_product(
        &self,
        input: &ProductCreateInput<'_>,
    ) -> Result<CreatedProduct, AdminShopifyError> {
        use super::queries::product_create::{ProductCreateInput as Input, Variables};

        let variables = Variables {
            product: Input {
                title: input.title.to_string(),
                description_html: input.description_html.map(str::to_string),
                product_type: input.product_type.map(str::to_string),
            },
        };

        let response = self.execute::<ProductCreate>(variables).await?;

        let payload = response
            .product_create
            .ok_or_else(|| AdminShopifyError::MalformedResponse("productCreate payload missing".into()))?;

        if !payload.user_errors.is_empty() {
            return Err(AdminShopifyError::UserErrors(convert_user_errors(
                payload.user_errors,
            )));
        }

        payload
            .product
            .ok_or_else(|| AdminShopifyError::MalformedResponse("productCreate returned no product".into()))
            .and_then(convert_created_product)
    }

    /// Change a product's title.
    ///
    /// # Returns
    ///
    /// The title as stored by Shopify.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns user errors.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn update_product_title(
        &self,
        id: &ProductId,
        title: &str,
    ) -> Result<String, AdminShopifyError> {
        use super::queries::product_update::{ProductUpdateInput, Variables};

        let variables = Variables {
            product: ProductUpdateInput {
                id: id.gid(),
                title: Some(title.to_string()),
            },
        };

        let response = self.execute::<ProductUpdate>(variables).await?;

        let payload = response
            .product_update
            .ok_or_else(|| AdminShopifyError::MalformedResponse("productUpdate payload missing".into()))?;

        if !payload.user_errors.is_empty() {
            return Err(AdminShopifyError::UserErrors(convert_user_errors(
                payload.user_errors,
            )));
        }

        payload
            .product
            .map(|p| p.title)
            .ok_or_else(|| AdminShopifyError::NotFound(id.to_string()))
    }

    /// Set the price of one variant.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns user errors.
    #[instrument(skip(self), fields(product_id = %product_id, variant_id = %variant_id, price = %price))]
    pub async fn set_variant_price(
        &self,
        product_id: &ProductId,
        variant_id: &VariantId,
        price: Price,
    ) -> Result<(), AdminShopifyError> {
        use super::queries::product_variants_bulk_update::{ProductVariantsBulkInput, Variables};

        let variables = Variables {
            product_id: product_id.gid(),
            variants: vec![ProductVariantsBulkInput {
                id: variant_id.gid(),
                price: price.to_string(),
            }],
        };

        let response = self.execute::<ProductVariantsBulkUpdate>(variables).await?;

        let payload = response.product_variants_bulk_update.ok_or_else(|| {
            AdminShopifyError::MalformedResponse("productVariantsBulkUpdate payload missing".into())
        })?;

        if !payload.user_errors.is_empty() {
            return Err(AdminShopifyError::UserErrors(convert_user_errors(
                payload.user_errors,
            )));
        }

        Ok(())
    }

    /// Delete a product through the REST endpoint.
    ///
    /// # Errors
    ///
    /// Returns `AdminShopifyError::NotFound` if the product does not exist,
    /// or `AdminShopifyError::UserErrors` if the response carries errors.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete_product(&self, id: &ProductId) -> Result<(), AdminShopifyError> {
        self.rest(Method::DELETE, &format!("products/{}.json", id.numeric()), None)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use mockito::Matcher;
    use serde_json::json;

    use super::super::tests::{GRAPHQL_PATH, client_for};
    use super::*;

    #[tokio::test]
    async fn test_search_products_maps_featured_image() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", GRAPHQL_PATH)
            .match_body(Matcher::PartialJson(json!({
                "operationName": "GetProducts",
                "variables": { "first": 50, "query": "title:board*" }
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({ "data": { "products": { "edges": [
                    { "node": {
                        "id": "gid://shopify/Product/1",
                        "title": "Board",
                        "featuredMedia": { "preview": { "image": { "url": "https://cdn.example/b.png" } } }
                    }},
                    { "node": { "id": "gid://shopify/Product/2", "title": "Wax", "featuredMedia": null } }
                ]}}})
                .to_string(),
            )
            .create_async()
            .await;

        let client = client_for(&server.url());
        let products = client
            .search_products(Some("title:board*"), 50)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].id, ProductId::new(1));
        assert_eq!(products[0].image_src.as_deref(), Some("https://cdn.example/b.png"));
        assert_eq!(products[1].image_src, None);
    }

    #[tokio::test]
    async fn test_create_product_returns_default_variant() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", GRAPHQL_PATH)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({ "data": { "productCreate": {
                    "product": {
                        "id": "gid://shopify/Product/9",
                        "title": "Board",
                        "variants": { "edges": [{ "node": { "id": "gid://shopify/ProductVariant/90" } }] }
                    },
                    "userErrors": []
                }}})
                .to_string(),
            )
            .create_async()
            .await;

        let client = client_for(&server.url());
        let created = client
            .create_product(&ProductCreateInput {
                title: "Board",
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(created.id, ProductId::new(9));
        assert_eq!(created.default_variant_id, Some(VariantId::new(90)));
    }

    #[tokio::test]
    async fn test_create_product_user_errors() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", GRAPHQL_PATH)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({ "data": { "productCreate": {
                    "product": null,
                    "userErrors": [{ "field": ["title"], "message": "Title can't be blank" }]
                }}})
                .to_string(),
            )
            .create_async()
            .await;

        let client = client_for(&server.url());
        let err = client
            .create_product(&ProductCreateInput::default())
            .await
            .unwrap_err();

        match err {
            AdminShopifyError::UserErrors(errors) => {
                assert_eq!(errors[0].field.as_deref(), Some("title"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_set_variant_price_sends_decimal_string() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", GRAPHQL_PATH)
            .match_body(Matcher::PartialJson(json!({
                "variables": {
                    "productId": "gid://shopify/Product/9",
                    "variants": [{ "id": "gid://shopify/ProductVariant/90", "price": "19.90" }]
                }
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({ "data": { "productVariantsBulkUpdate": {
                    "userErrors": []
                }}})
                .to_string(),
            )
            .create_async()
            .await;

        let client = client_for(&server.url());
        client
            .set_variant_price(
                &ProductId::new(9),
                &VariantId::new(90),
                Price::parse("19.9").unwrap(),
            )
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_delete_product_uses_rest_and_maps_404() {
        let mut server = mockito::Server::new_async().await;
        let deleted = server
            .mock("DELETE", "/admin/api/2026-01/products/42.json")
            .match_header("X-Shopify-Access-Token", "shpat_test_token")
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;
        server
            .mock("DELETE", "/admin/api/2026-01/products/43.json")
            .with_status(404)
            .with_body(r#"{"errors":"Not Found"}"#)
            .create_async()
            .await;

        let client = client_for(&server.url());
        client.delete_product(&ProductId::new(42)).await.unwrap();
        deleted.assert_async().await;

        let err = client.delete_product(&ProductId::new(43)).await.unwrap_err();
        assert!(matches!(err, AdminShopifyError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_product_with_error_payload_fails() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("DELETE", "/admin/api/2026-01/products/5.json")
            .with_status(200)
            .with_body(r#"{"errors":"product is locked"}"#)
            .create_async()
            .await;

        let client = client_for(&server.url());
        let err = client.delete_product(&ProductId::new(5)).await.unwrap_err();

        assert!(
            matches!(err, AdminShopifyError::UserErrors(ref errors) if errors[0].message == "product is locked")
        );
    }
}
