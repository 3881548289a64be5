//! Staged uploads and media attachment for the Admin API.

use reqwest::multipart::{Form, Part};
use shop_panel_core::{CollectionId, ImageMimeType, ProductId};
use tracing::instrument;

use super::{
    AdminClient, AdminShopifyError,
    conversions::{
        convert_collection_image_payload, convert_file_payload, convert_product_media_payload,
        convert_staging_payload,
    },
    queries::{CollectionUpdateImage, FileCreate, ProductCreateMedia, StagedUploadsCreate},
};
use crate::shopify::types::{AttachOutcome, StagedUploadTarget, StagingResponse, TransferResponse};

impl AdminClient {
    /// Request a staged upload target for one image.
    ///
    /// User errors and empty target lists are returned as data so the caller
    /// can decide how to report them.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the payload is missing.
    #[instrument(skip(self))]
    pub async fn create_staged_upload(
        &self,
        filename: &str,
        mime_type: ImageMimeType,
        file_size: u64,
    ) -> Result<StagingResponse, AdminShopifyError> {
        use super::queries::staged_uploads_create::{
            StagedUploadHttpMethodType, StagedUploadInput,
            StagedUploadTargetGenerateUploadResource, Variables,
        };

        let variables = Variables {
            input: vec![StagedUploadInput {
                filename: filename.to_string(),
                mime_type: mime_type.as_str().to_string(),
                resource: StagedUploadTargetGenerateUploadResource::Image,
                file_size: file_size.to_string(),
                http_method: StagedUploadHttpMethodType::Post,
            }],
        };

        let response = self.execute::<StagedUploadsCreate>(variables).await?;

        response
            .staged_uploads_create
            .map(convert_staging_payload)
            .ok_or_else(|| {
                AdminShopifyError::MalformedResponse("stagedUploadsCreate payload missing".into())
            })
    }

    /// POST the file to a staged upload target.
    ///
    /// Sends every target parameter as a form field, in order, followed by
    /// the file as the `file` part. The access token is not sent. Any HTTP
    /// status is returned as data.
    ///
    /// # Errors
    ///
    /// Returns `AdminShopifyError::Http` on transport failure.
    #[instrument(skip(self, target, data), fields(url = %target.url, bytes = data.len()))]
    pub async fn upload_to_staged_target(
        &self,
        target: &StagedUploadTarget,
        filename: &str,
        mime_type: ImageMimeType,
        data: Vec<u8>,
    ) -> Result<TransferResponse, AdminShopifyError> {
        let mut form = Form::new();
        for (name, value) in &target.parameters {
            form = form.text(name.clone(), value.clone());
        }
        let file = Part::bytes(data)
            .file_name(filename.to_string())
            .mime_str(mime_type.as_str())?;
        form = form.part("file", file);

        let response = self
            .inner
            .client
            .post(&target.url)
            .multipart(form)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(TransferResponse { status, body })
    }

    /// Attach an uploaded image to a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the payload is missing.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn attach_media_to_product(
        &self,
        product_id: &ProductId,
        source_url: &str,
        alt: Option<&str>,
    ) -> Result<AttachOutcome, AdminShopifyError> {
        use super::queries::product_create_media::{CreateMediaInput, MediaContentType, Variables};

        let variables = Variables {
            product_id: product_id.gid(),
            media: vec![CreateMediaInput {
                original_source: source_url.to_string(),
                media_content_type: MediaContentType::Image,
                alt: alt.map(str::to_string),
            }],
        };

        let response = self.execute::<ProductCreateMedia>(variables).await?;

        response
            .product_create_media
            .map(convert_product_media_payload)
            .ok_or_else(|| {
                AdminShopifyError::MalformedResponse("productCreateMedia payload missing".into())
            })
    }

    /// Set the image of a collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the payload is missing.
    #[instrument(skip(self), fields(collection_id = %collection_id))]
    pub async fn update_collection_image(
        &self,
        collection_id: &CollectionId,
        source_url: &str,
        alt: Option<&str>,
    ) -> Result<AttachOutcome, AdminShopifyError> {
        use super::queries::collection_update_image::{CollectionInput, ImageInput, Variables};

        let variables = Variables {
            input: CollectionInput {
                id: collection_id.gid(),
                image: ImageInput {
                    src: source_url.to_string(),
                    alt_text: alt.map(str::to_string),
                },
            },
        };

        let response = self.execute::<CollectionUpdateImage>(variables).await?;

        response
            .collection_update
            .map(convert_collection_image_payload)
            .ok_or_else(|| {
                AdminShopifyError::MalformedResponse("collectionUpdate payload missing".into())
            })
    }

    /// Register an uploaded image as a standalone store file.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the payload is missing.
    #[instrument(skip(self))]
    pub async fn create_file(
        &self,
        source_url: &str,
        alt: Option<&str>,
    ) -> Result<AttachOutcome, AdminShopifyError> {
        use super::queries::file_create::{FileContentType, FileCreateInput, Variables};

        let variables = Variables {
            files: vec![FileCreateInput {
                original_source: source_url.to_string(),
                content_type: FileContentType::Image,
                alt: alt.map(str::to_string),
            }],
        };

        let response = self.execute::<FileCreate>(variables).await?;

        response
            .file_create
            .map(convert_file_payload)
            .ok_or_else(|| AdminShopifyError::MalformedResponse("fileCreate payload missing".into()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use mockito::Matcher;
    use serde_json::json;

    use super::super::tests::{GRAPHQL_PATH, client_for};
    use super::*;
    use crate::shopify::MediaStatus;

    #[tokio::test]
    async fn test_create_staged_upload_requests_image_post() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", GRAPHQL_PATH)
            .match_body(Matcher::PartialJson(json!({
                "operationName": "StagedUploadsCreate",
                "variables": { "input": [{
                    "filename": "swatch.jpg",
                    "mimeType": "image/jpeg",
                    "resource": "IMAGE",
                    "fileSize": "500000",
                    "httpMethod": "POST"
                }]}
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({ "data": { "stagedUploadsCreate": {
                    "stagedTargets": [{
                        "url": "https://storage.example/upload",
                        "resourceUrl": "https://storage.example/upload/abc",
                        "parameters": [{ "name": "key", "value": "abc" }]
                    }],
                    "userErrors": []
                }}})
                .to_string(),
            )
            .create_async()
            .await;

        let client = client_for(&server.url());
        let staging = client
            .create_staged_upload("swatch.jpg", ImageMimeType::Jpeg, 500_000)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(staging.targets.len(), 1);
        assert_eq!(staging.targets[0].resource_url, "https://storage.example/upload/abc");
    }

    #[tokio::test]
    async fn test_create_staged_upload_missing_payload_is_malformed() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", GRAPHQL_PATH)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"data":{"stagedUploadsCreate":null}}"#)
            .create_async()
            .await;

        let client = client_for(&server.url());
        let err = client
            .create_staged_upload("swatch.jpg", ImageMimeType::Jpeg, 10)
            .await
            .unwrap_err();

        assert!(matches!(err, AdminShopifyError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_upload_sends_parameters_then_file_without_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/bucket")
            .match_header("X-Shopify-Access-Token", Matcher::Missing)
            .match_body(Matcher::Regex(
                r#"(?s)name="key"\r\n\r\nabc/swatch.jpg.*name="acl"\r\n\r\nprivate.*name="file"; filename="swatch.jpg""#
                    .to_string(),
            ))
            .with_status(204)
            .create_async()
            .await;

        let client = client_for(&server.url());
        let target = StagedUploadTarget {
            url: format!("{}/bucket", server.url()),
            resource_url: format!("{}/bucket/abc/swatch.jpg", server.url()),
            parameters: vec![
                ("key".to_string(), "abc/swatch.jpg".to_string()),
                ("acl".to_string(), "private".to_string()),
            ],
        };

        let response = client
            .upload_to_staged_target(&target, "swatch.jpg", ImageMimeType::Jpeg, b"fake-jpeg".to_vec())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(response.status, 204);
        assert!(response.body.is_empty());
    }

    #[tokio::test]
    async fn test_attach_media_to_product_reads_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", GRAPHQL_PATH)
            .match_body(Matcher::PartialJson(json!({
                "variables": {
                    "productId": "gid://shopify/Product/42",
                    "media": [{ "originalSource": "https://storage.example/abc", "mediaContentType": "IMAGE" }]
                }
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({ "data": { "productCreateMedia": {
                    "media": [{
                        "alt": null,
                        "mediaContentType": "IMAGE",
                        "status": "UPLOADED",
                        "preview": { "image": { "url": "https://cdn.example/x" } }
                    }],
                    "mediaUserErrors": []
                }}})
                .to_string(),
            )
            .create_async()
            .await;

        let client = client_for(&server.url());
        let outcome = client
            .attach_media_to_product(&ProductId::new(42), "https://storage.example/abc", None)
            .await
            .unwrap();

        assert_eq!(outcome.status, Some(MediaStatus::Uploaded));
        assert_eq!(outcome.image_url.as_deref(), Some("https://cdn.example/x"));
        assert!(outcome.user_errors.is_empty());
    }

    #[tokio::test]
    async fn test_create_file_returns_user_errors_as_data() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", GRAPHQL_PATH)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({ "data": { "fileCreate": {
                    "files": [],
                    "userErrors": [{ "field": ["files", "0", "originalSource"], "message": "Invalid URL" }]
                }}})
                .to_string(),
            )
            .create_async()
            .await;

        let client = client_for(&server.url());
        let outcome = client.create_file("not-a-url", Some("alt")).await.unwrap();

        assert_eq!(outcome.status, None);
        assert_eq!(outcome.user_errors[0].to_string(), "files.0.originalSource: Invalid URL");
    }
}
