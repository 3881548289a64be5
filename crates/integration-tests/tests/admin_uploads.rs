//! Integration tests for the staged image upload endpoints.
//!
//! The mock server plays both Shopify's GraphQL API and the storage endpoint
//! that staged targets point at.

use mockito::{Matcher, ServerGuard};
use serde_json::json;
use shop_panel_integration_tests::{
    FilePart, GRAPHQL_PATH, app, multipart_body, multipart_request, send, test_config,
};

const JPEG: FilePart<'static> = FilePart {
    field: "image",
    file_name: "swatch.jpg",
    content_type: "image/jpeg",
    content: b"\xFF\xD8\xFF\xE0fake-jpeg",
};

async fn mock_staging(server: &mut ServerGuard) -> mockito::Mock {
    let bucket = format!("{}/bucket", server.url());
    server
        .mock("POST", GRAPHQL_PATH)
        .match_body(Matcher::PartialJson(json!({
            "operationName": "StagedUploadsCreate",
            "variables": { "input": [{
                "filename": "swatch.jpg",
                "mimeType": "image/jpeg",
                "resource": "IMAGE",
                "fileSize": "13",
                "httpMethod": "POST"
            }]}
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({ "data": { "stagedUploadsCreate": {
                "stagedTargets": [{
                    "url": &bucket,
                    "resourceUrl": format!("{bucket}/tmp/swatch.jpg"),
                    "parameters": [{ "name": "key", "value": "tmp/swatch.jpg" }]
                }],
                "userErrors": []
            }}})
            .to_string(),
        )
        .create_async()
        .await
}

#[tokio::test]
async fn test_upload_attaches_to_product() {
    let mut server = mockito::Server::new_async().await;
    let staging = mock_staging(&mut server).await;
    let storage = server
        .mock("POST", "/bucket")
        .match_header("X-Shopify-Access-Token", Matcher::Missing)
        .with_status(201)
        .with_body(
            "<?xml version=\"1.0\"?><PostResponse><Location>https://storage.example/tmp/swatch.jpg?a=1&amp;b=2</Location></PostResponse>",
        )
        .create_async()
        .await;
    let attach = server
        .mock("POST", GRAPHQL_PATH)
        .match_body(Matcher::PartialJson(json!({
            "operationName": "ProductCreateMedia",
            "variables": {
                "productId": "gid://shopify/Product/42",
                "media": [{
                    "originalSource": "https://storage.example/tmp/swatch.jpg?a=1&b=2",
                    "mediaContentType": "IMAGE",
                    "alt": "Blue swatch"
                }]
            }
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({ "data": { "productCreateMedia": {
                "media": [{
                    "alt": "Blue swatch",
                    "mediaContentType": "IMAGE",
                    "status": "UPLOADED",
                    "preview": { "image": { "url": "https://cdn.example/swatch.jpg" } }
                }],
                "mediaUserErrors": []
            }}})
            .to_string(),
        )
        .create_async()
        .await;

    let body = multipart_body(&[("productId", "42"), ("alt", "Blue swatch")], Some(&JPEG));
    let (status, body) = send(
        app(test_config(&server.url())),
        multipart_request("/hello/upload-image", body),
    )
    .await;

    staging.assert_async().await;
    storage.assert_async().await;
    attach.assert_async().await;
    assert_eq!(status, 200);
    assert_eq!(
        body,
        json!({
            "publicImageUrl": "https://cdn.example/swatch.jpg",
            "attachmentConfirmed": true,
            "remoteErrors": [],
            "imageUrl": "https://cdn.example/swatch.jpg"
        })
    );
}

#[tokio::test]
async fn test_upload_without_target_creates_standalone_file() {
    let mut server = mockito::Server::new_async().await;
    mock_staging(&mut server).await;
    server
        .mock("POST", "/bucket")
        .with_status(204)
        .create_async()
        .await;
    let file_create = server
        .mock("POST", GRAPHQL_PATH)
        .match_body(Matcher::PartialJson(json!({
            "operationName": "FileCreate",
            "variables": { "files": [{
                "originalSource": format!("{}/bucket/tmp/swatch.jpg", server.url()),
                "contentType": "IMAGE"
            }]}
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({ "data": { "fileCreate": {
                "files": [{ "id": "gid://shopify/MediaImage/5", "fileStatus": "UPLOADED", "alt": null }],
                "userErrors": []
            }}})
            .to_string(),
        )
        .create_async()
        .await;

    let file = FilePart { field: "file", ..JPEG };
    let (status, body) = send(
        app(test_config(&server.url())),
        multipart_request("/products/upload-file", multipart_body(&[], Some(&file))),
    )
    .await;

    file_create.assert_async().await;
    assert_eq!(status, 200);
    assert_eq!(
        body["publicImageUrl"],
        format!("{}/bucket/tmp/swatch.jpg", server.url())
    );
    assert_eq!(body["imageUrl"], body["publicImageUrl"]);
}

#[tokio::test]
async fn test_storage_rejection_skips_attach() {
    let mut server = mockito::Server::new_async().await;
    mock_staging(&mut server).await;
    server
        .mock("POST", "/bucket")
        .with_status(403)
        .with_body("<Error><Code>AccessDenied</Code></Error>")
        .create_async()
        .await;
    let attach = server
        .mock("POST", GRAPHQL_PATH)
        .match_body(Matcher::PartialJson(json!({ "operationName": "ProductCreateMedia" })))
        .expect(0)
        .create_async()
        .await;

    let body = multipart_body(&[("productId", "42")], Some(&JPEG));
    let (status, body) = send(
        app(test_config(&server.url())),
        multipart_request("/hello/upload-image", body),
    )
    .await;

    attach.assert_async().await;
    assert_eq!(status, 502);
    assert_eq!(body["kind"], "transfer_rejected");
}

#[tokio::test]
async fn test_unsupported_type_never_reaches_shopify() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", GRAPHQL_PATH)
        .expect(0)
        .create_async()
        .await;

    let pdf = FilePart {
        file_name: "notes.pdf",
        content_type: "application/pdf",
        ..JPEG
    };
    let (status, body) = send(
        app(test_config(&server.url())),
        multipart_request("/hello/upload-image", multipart_body(&[], Some(&pdf))),
    )
    .await;

    mock.assert_async().await;
    assert_eq!(status, 400);
    assert_eq!(body["kind"], "validation");
}

#[tokio::test]
async fn test_pdf_declared_as_jpeg_never_reaches_shopify() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", GRAPHQL_PATH)
        .expect(0)
        .create_async()
        .await;

    let disguised = FilePart {
        content: b"%PDF-1.7\n1 0 obj\n<< /Type /Catalog >>\nendobj\n",
        ..JPEG
    };
    let body = multipart_body(&[("productId", "42")], Some(&disguised));
    let (status, body) = send(
        app(test_config(&server.url())),
        multipart_request("/hello/upload-image", body),
    )
    .await;

    mock.assert_async().await;
    assert_eq!(status, 400);
    assert_eq!(body["kind"], "validation");
}

#[tokio::test]
async fn test_missing_file_is_validation_error() {
    let server = mockito::Server::new_async().await;

    let (status, body) = send(
        app(test_config(&server.url())),
        multipart_request("/hello/upload-image", multipart_body(&[("alt", "x")], None)),
    )
    .await;

    assert_eq!(status, 400);
    assert_eq!(body["kind"], "validation");
}

#[tokio::test]
async fn test_product_and_collection_together_is_validation_error() {
    let server = mockito::Server::new_async().await;

    let body = multipart_body(&[("productId", "1"), ("collectionId", "2")], Some(&JPEG));
    let (status, body) = send(
        app(test_config(&server.url())),
        multipart_request("/hello/upload-image", body),
    )
    .await;

    assert_eq!(status, 400);
    assert_eq!(body["kind"], "validation");
}
