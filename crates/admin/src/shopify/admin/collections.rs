//! Collection listing for the Admin API.

use reqwest::Method;
use tracing::instrument;

use super::{AdminClient, AdminShopifyError, conversions::convert_rest_collection};
use crate::shopify::types::CollectionSummary;

/// Largest page the REST endpoint serves.
const MAX_PAGE_SIZE: u32 = 250;

impl AdminClient {
    /// List custom collections through the REST endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the body has no
    /// `custom_collections` list.
    #[instrument(skip(self))]
    pub async fn list_custom_collections(
        &self,
        limit: u32,
    ) -> Result<Vec<CollectionSummary>, AdminShopifyError> {
        let limit = limit.clamp(1, MAX_PAGE_SIZE);
        let body = self
            .rest(
                Method::GET,
                &format!("custom_collections.json?limit={limit}"),
                None,
            )
            .await?;

        body.get("custom_collections")
            .and_then(serde_json::Value::as_array)
            .ok_or_else(|| {
                AdminShopifyError::MalformedResponse("custom_collections missing".into())
            })?
            .iter()
            .map(convert_rest_collection)
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use mockito::Matcher;
    use serde_json::json;
    use shop_panel_core::CollectionId;

    use super::super::tests::client_for;
    use super::*;

    #[tokio::test]
    async fn test_list_custom_collections() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/admin/api/2026-01/custom_collections.json")
            .match_query(Matcher::UrlEncoded("limit".into(), "250".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({ "custom_collections": [
                    { "id": 7, "title": "Boards", "image": null },
                    { "id": 8, "title": "Wax", "image": { "src": "https://cdn.example/wax.png" } }
                ]})
                .to_string(),
            )
            .create_async()
            .await;

        let client = client_for(&server.url());
        let collections = client.list_custom_collections(1000).await.unwrap();

        mock.assert_async().await;
        assert_eq!(collections.len(), 2);
        assert_eq!(collections[0].id, CollectionId::new(7));
        assert_eq!(collections[0].image_src, None);
        assert_eq!(collections[1].image_src.as_deref(), Some("https://cdn.example/wax.png"));
    }

    #[tokio::test]
    async fn test_list_custom_collections_malformed_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/admin/api/2026-01/custom_collections.json")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let client = client_for(&server.url());
        let err = client.list_custom_collections(50).await.unwrap_err();

        assert!(matches!(err, AdminShopifyError::MalformedResponse(_)));
    }
}
