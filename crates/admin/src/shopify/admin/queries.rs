//! GraphQL operation definitions for Shopify Admin API.
//!
//! Each operation implements `graphql_client::GraphQLQuery` and exposes its
//! `Variables` and `ResponseData` from a module named after the operation,
//! the same shape `#[derive(GraphQLQuery)]` generates. The types only cover
//! the fields the panel selects.

use graphql_client::{GraphQLQuery, QueryBody};
use serde::Deserialize;

/// Implement `GraphQLQuery` for an operation marker type.
macro_rules! graphql_operation {
    ($name:ident, $module:ident) => {
        pub struct $name;

        impl GraphQLQuery for $name {
            type Variables = $module::Variables;
            type ResponseData = $module::ResponseData;

            fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
                QueryBody {
                    variables,
                    query: $module::QUERY,
                    operation_name: $module::OPERATION_NAME,
                }
            }
        }
    };
}

/// `userErrors { field message }` selection shared by every mutation.
#[derive(Debug, Clone, Deserialize)]
pub struct UserErrorNode {
    pub field: Option<Vec<String>>,
    pub message: String,
}

/// `image { url }` selection.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageNode {
    pub url: String,
}

// =============================================================================
// Product queries
// =============================================================================

graphql_operation!(GetProducts, get_products);

pub mod get_products {
    use serde::{Deserialize, Serialize};

    use super::ImageNode;

    pub const OPERATION_NAME: &str = "GetProducts";
    pub const QUERY: &str = r"
        query GetProducts($first: Int!, $query: String) {
            products(first: $first, query: $query) {
                edges {
                    node {
                        id
                        title
                        featuredMedia {
                            preview {
                                image {
                                    url
                                }
                            }
                        }
                    }
                }
            }
        }
    ";

    #[derive(Debug, Serialize)]
    pub struct Variables {
        pub first: i64,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub query: Option<String>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub products: Option<ProductConnection>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ProductConnection {
        pub edges: Vec<ProductEdge>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ProductEdge {
        pub node: ProductNode,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductNode {
        pub id: String,
        pub title: String,
        pub featured_media: Option<FeaturedMedia>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct FeaturedMedia {
        pub preview: Option<MediaPreview>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct MediaPreview {
        pub image: Option<ImageNode>,
    }
}

graphql_operation!(ProductCreate, product_create);

pub mod product_create {
    use serde::{Deserialize, Serialize};

    use super::UserErrorNode;

    pub const OPERATION_NAME: &str = "ProductCreate";
    pub const QUERY: &str = r"
        mutation ProductCreate($product: ProductCreateInput!) {
            productCreate(product: $product) {
                product {
                    id
                    title
                    variants(first: 1) {
                        edges {
                            node {
                                id
                            }
                        }
                    }
                }
                userErrors {
                    field
                    message
                }
            }
        }
    ";

    #[derive(Debug, Serialize)]
    pub struct Variables {
        pub product: ProductCreateInput,
    }

    #[derive(Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductCreateInput {
        pub title: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub description_html: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub product_type: Option<String>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub product_create: Option<ProductCreatePayload>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductCreatePayload {
        pub product: Option<CreatedProduct>,
        pub user_errors: Vec<UserErrorNode>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct CreatedProduct {
        pub id: String,
        pub title: String,
        pub variants: VariantConnection,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct VariantConnection {
        pub edges: Vec<VariantEdge>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct VariantEdge {
        pub node: VariantNode,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct VariantNode {
        pub id: String,
    }
}

graphql_operation!(ProductUpdate, product_update);

pub mod product_update {
    use serde::{Deserialize, Serialize};

    use super::UserErrorNode;

    pub const OPERATION_NAME: &str = "ProductUpdate";
    pub const QUERY: &str = r"
        mutation ProductUpdate($product: ProductUpdateInput!) {
            productUpdate(product: $product) {
                product {
                    title
                }
                userErrors {
                    field
                    message
                }
            }
        }
    ";

    #[derive(Debug, Serialize)]
    pub struct Variables {
        pub product: ProductUpdateInput,
    }

    #[derive(Debug, Serialize)]
    pub struct ProductUpdateInput {
        pub id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub title: Option<String>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub product_update: Option<ProductUpdatePayload>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductUpdatePayload {
        pub product: Option<UpdatedProduct>,
        pub user_errors: Vec<UserErrorNode>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct UpdatedProduct {
        pub title: String,
    }
}

graphql_operation!(ProductVariantsBulkUpdate, product_variants_bulk_update);

pub mod product_variants_bulk_update {
    use serde::{Deserialize, Serialize};

    use super::UserErrorNode;

    pub const OPERATION_NAME: &str = "ProductVariantsBulkUpdate";
    pub const QUERY: &str = r"
        mutation ProductVariantsBulkUpdate($productId: ID!, $variants: [ProductVariantsBulkInput!]!) {
            productVariantsBulkUpdate(productId: $productId, variants: $variants) {
                userErrors {
                    field
                    message
                }
            }
        }
    ";

    #[derive(Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub product_id: String,
        pub variants: Vec<ProductVariantsBulkInput>,
    }

    #[derive(Debug, Serialize)]
    pub struct ProductVariantsBulkInput {
        pub id: String,
        pub price: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub product_variants_bulk_update: Option<ProductVariantsBulkUpdatePayload>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductVariantsBulkUpdatePayload {
        pub user_errors: Vec<UserErrorNode>,
    }
}

// =============================================================================
// Media queries
// =============================================================================

graphql_operation!(StagedUploadsCreate, staged_uploads_create);

pub mod staged_uploads_create {
    use serde::{Deserialize, Serialize};

    use super::UserErrorNode;

    pub const OPERATION_NAME: &str = "StagedUploadsCreate";
    pub const QUERY: &str = r"
        mutation StagedUploadsCreate($input: [StagedUploadInput!]!) {
            stagedUploadsCreate(input: $input) {
                stagedTargets {
                    url
                    resourceUrl
                    parameters {
                        name
                        value
                    }
                }
                userErrors {
                    field
                    message
                }
            }
        }
    ";

    #[derive(Debug, Serialize)]
    pub struct Variables {
        pub input: Vec<StagedUploadInput>,
    }

    #[derive(Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct StagedUploadInput {
        pub filename: String,
        pub mime_type: String,
        pub resource: StagedUploadTargetGenerateUploadResource,
        pub file_size: String,
        pub http_method: StagedUploadHttpMethodType,
    }

    #[derive(Debug, Clone, Copy, Serialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum StagedUploadTargetGenerateUploadResource {
        Image,
    }

    #[derive(Debug, Clone, Copy, Serialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum StagedUploadHttpMethodType {
        Post,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub staged_uploads_create: Option<StagedUploadsCreatePayload>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct StagedUploadsCreatePayload {
        pub staged_targets: Option<Vec<StagedMediaUploadTarget>>,
        pub user_errors: Vec<UserErrorNode>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct StagedMediaUploadTarget {
        pub url: Option<String>,
        pub resource_url: Option<String>,
        pub parameters: Vec<StagedUploadParameter>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct StagedUploadParameter {
        pub name: String,
        pub value: String,
    }
}

graphql_operation!(ProductCreateMedia, product_create_media);

pub mod product_create_media {
    use serde::{Deserialize, Serialize};

    use super::{ImageNode, UserErrorNode};

    pub const OPERATION_NAME: &str = "ProductCreateMedia";
    pub const QUERY: &str = r"
        mutation ProductCreateMedia($productId: ID!, $media: [CreateMediaInput!]!) {
            productCreateMedia(productId: $productId, media: $media) {
                media {
                    status
                    preview {
                        image {
                            url
                        }
                    }
                }
                mediaUserErrors {
                    field
                    message
                }
            }
        }
    ";

    #[derive(Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub product_id: String,
        pub media: Vec<CreateMediaInput>,
    }

    #[derive(Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CreateMediaInput {
        pub original_source: String,
        pub media_content_type: MediaContentType,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub alt: Option<String>,
    }

    #[derive(Debug, Clone, Copy, Serialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum MediaContentType {
        Image,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub product_create_media: Option<ProductCreateMediaPayload>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductCreateMediaPayload {
        pub media: Option<Vec<CreatedMedia>>,
        pub media_user_errors: Vec<UserErrorNode>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CreatedMedia {
        pub status: Option<String>,
        pub preview: Option<MediaPreview>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct MediaPreview {
        pub image: Option<ImageNode>,
    }
}

graphql_operation!(CollectionUpdateImage, collection_update_image);

pub mod collection_update_image {
    use serde::{Deserialize, Serialize};

    use super::{ImageNode, UserErrorNode};

    pub const OPERATION_NAME: &str = "CollectionUpdateImage";
    pub const QUERY: &str = r"
        mutation CollectionUpdateImage($input: CollectionInput!) {
            collectionUpdate(input: $input) {
                collection {
                    image {
                        url
                    }
                }
                userErrors {
                    field
                    message
                }
            }
        }
    ";

    #[derive(Debug, Serialize)]
    pub struct Variables {
        pub input: CollectionInput,
    }

    #[derive(Debug, Serialize)]
    pub struct CollectionInput {
        pub id: String,
        pub image: ImageInput,
    }

    #[derive(Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ImageInput {
        pub src: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub alt_text: Option<String>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub collection_update: Option<CollectionUpdatePayload>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CollectionUpdatePayload {
        pub collection: Option<UpdatedCollection>,
        pub user_errors: Vec<UserErrorNode>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct UpdatedCollection {
        pub image: Option<ImageNode>,
    }
}

graphql_operation!(FileCreate, file_create);

pub mod file_create {
    use serde::{Deserialize, Serialize};

    use super::{ImageNode, UserErrorNode};

    pub const OPERATION_NAME: &str = "FileCreate";
    pub const QUERY: &str = r"
        mutation FileCreate($files: [FileCreateInput!]!) {
            fileCreate(files: $files) {
                files {
                    fileStatus
                    ... on MediaImage {
                        image {
                            url
                        }
                    }
                }
                userErrors {
                    field
                    message
                }
            }
        }
    ";

    #[derive(Debug, Serialize)]
    pub struct Variables {
        pub files: Vec<FileCreateInput>,
    }

    #[derive(Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct FileCreateInput {
        pub original_source: String,
        pub content_type: FileContentType,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub alt: Option<String>,
    }

    #[derive(Debug, Clone, Copy, Serialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum FileContentType {
        Image,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub file_create: Option<FileCreatePayload>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct FileCreatePayload {
        pub files: Option<Vec<CreatedFile>>,
        pub user_errors: Vec<UserErrorNode>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CreatedFile {
        pub file_status: Option<String>,
        #[serde(default)]
        pub image: Option<ImageNode>,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_build_query_carries_operation_name() {
        let body = StagedUploadsCreate::build_query(staged_uploads_create::Variables {
            input: vec![staged_uploads_create::StagedUploadInput {
                filename: "swatch.jpg".to_string(),
                mime_type: "image/jpeg".to_string(),
                resource: staged_uploads_create::StagedUploadTargetGenerateUploadResource::Image,
                file_size: "500000".to_string(),
                http_method: staged_uploads_create::StagedUploadHttpMethodType::Post,
            }],
        });

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["operationName"], "StagedUploadsCreate");
        assert!(json["query"].as_str().unwrap().contains("stagedUploadsCreate"));

        let input = &json["variables"]["input"][0];
        assert_eq!(input["resource"], "IMAGE");
        assert_eq!(input["httpMethod"], "POST");
        assert_eq!(input["fileSize"], "500000");
        assert_eq!(input["mimeType"], "image/jpeg");
    }

    #[test]
    fn test_optional_inputs_are_omitted() {
        let body = ProductCreate::build_query(product_create::Variables {
            product: product_create::ProductCreateInput {
                title: "Board".to_string(),
                description_html: None,
                product_type: Some("sports".to_string()),
            },
        });

        let json = serde_json::to_value(&body).unwrap();
        let product = &json["variables"]["product"];
        assert_eq!(product["title"], "Board");
        assert_eq!(product["productType"], "sports");
        assert!(product.get("descriptionHtml").is_none());
    }

    #[test]
    fn test_file_create_response_without_image_fragment() {
        let data: file_create::ResponseData = serde_json::from_value(serde_json::json!({
            "fileCreate": {
                "files": [{ "id": "gid://shopify/GenericFile/1", "fileStatus": "UPLOADED", "alt": null }],
                "userErrors": []
            }
        }))
        .unwrap();

        let files = data.file_create.unwrap().files.unwrap();
        assert_eq!(files[0].file_status.as_deref(), Some("UPLOADED"));
        assert!(files[0].image.is_none());
    }
}
