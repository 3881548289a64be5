//! Conversions from GraphQL response shapes to domain types.

use shop_panel_core::{CollectionId, ProductId, VariantId};

use crate::shopify::{
    AdminShopifyError, UserError,
    types::{
        AttachOutcome, CollectionSummary, CreatedProduct, MediaStatus, ProductSummary,
        StagedUploadTarget, StagingResponse,
    },
};

use super::queries::{
    UserErrorNode, collection_update_image, file_create, get_products, product_create,
    product_create_media, staged_uploads_create,
};

pub fn convert_user_errors(errors: Vec<UserErrorNode>) -> Vec<UserError> {
    errors
        .into_iter()
        .map(|e| UserError::new(e.field, e.message))
        .collect()
}

fn malformed_id(err: impl std::fmt::Display) -> AdminShopifyError {
    AdminShopifyError::MalformedResponse(format!("unexpected id: {err}"))
}

// =============================================================================
// Products
// =============================================================================

pub fn convert_product_summary(
    node: get_products::ProductNode,
) -> Result<ProductSummary, AdminShopifyError> {
    Ok(ProductSummary {
        id: ProductId::parse(&node.id).map_err(malformed_id)?,
        title: node.title,
        image_src: node
            .featured_media
            .and_then(|m| m.preview)
            .and_then(|p| p.image)
            .map(|i| i.url),
    })
}

pub fn convert_created_product(
    product: product_create::CreatedProduct,
) -> Result<CreatedProduct, AdminShopifyError> {
    let default_variant_id = product
        .variants
        .edges
        .into_iter()
        .next()
        .map(|e| VariantId::parse(&e.node.id))
        .transpose()
        .map_err(malformed_id)?;

    Ok(CreatedProduct {
        id: ProductId::parse(&product.id).map_err(malformed_id)?,
        title: product.title,
        default_variant_id,
    })
}

// =============================================================================
// Collections
// =============================================================================

/// Convert one entry of the REST `custom_collections` list.
pub fn convert_rest_collection(
    value: &serde_json::Value,
) -> Result<CollectionSummary, AdminShopifyError> {
    let id = value
        .get("id")
        .and_then(serde_json::Value::as_u64)
        .ok_or_else(|| AdminShopifyError::MalformedResponse("collection without id".into()))?;

    Ok(CollectionSummary {
        id: CollectionId::new(id),
        title: value
            .get("title")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default()
            .to_string(),
        image_src: value
            .get("image")
            .and_then(|image| image.get("src"))
            .and_then(serde_json::Value::as_str)
            .map(str::to_string),
    })
}

// =============================================================================
// Media
// =============================================================================

pub fn convert_staging_payload(
    payload: staged_uploads_create::StagedUploadsCreatePayload,
) -> StagingResponse {
    let targets = payload
        .staged_targets
        .unwrap_or_default()
        .into_iter()
        .filter_map(|t| {
            Some(StagedUploadTarget {
                url: t.url?,
                resource_url: t.resource_url?,
                parameters: t
                    .parameters
                    .into_iter()
                    .map(|p| (p.name, p.value))
                    .collect(),
            })
        })
        .collect();

    StagingResponse {
        targets,
        user_errors: convert_user_errors(payload.user_errors),
    }
}

pub fn convert_product_media_payload(
    payload: product_create_media::ProductCreateMediaPayload,
) -> AttachOutcome {
    let first = payload.media.unwrap_or_default().into_iter().next();

    AttachOutcome {
        status: first
            .as_ref()
            .and_then(|m| m.status.as_deref())
            .map(MediaStatus::from_graphql),
        image_url: first
            .and_then(|m| m.preview)
            .and_then(|p| p.image)
            .map(|i| i.url),
        user_errors: convert_user_errors(payload.media_user_errors),
    }
}

/// A collection that comes back with an image has its image in place, so it
/// is reported as `Ready`.
pub fn convert_collection_image_payload(
    payload: collection_update_image::CollectionUpdatePayload,
) -> AttachOutcome {
    let image_url = payload
        .collection
        .and_then(|c| c.image)
        .map(|i| i.url);

    AttachOutcome {
        status: image_url.as_ref().map(|_| MediaStatus::Ready),
        image_url,
        user_errors: convert_user_errors(payload.user_errors),
    }
}

pub fn convert_file_payload(payload: file_create::FileCreatePayload) -> AttachOutcome {
    let first = payload.files.unwrap_or_default().into_iter().next();

    AttachOutcome {
        status: first
            .as_ref()
            .and_then(|f| f.file_status.as_deref())
            .map(MediaStatus::from_graphql),
        image_url: first.and_then(|f| f.image).map(|i| i.url),
        user_errors: convert_user_errors(payload.user_errors),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_staging_payload_keeps_parameter_order() {
        let payload: staged_uploads_create::StagedUploadsCreatePayload =
            serde_json::from_value(json!({
                "stagedTargets": [{
                    "url": "https://storage.example/bucket",
                    "resourceUrl": "https://storage.example/bucket/abc/swatch.jpg",
                    "parameters": [
                        { "name": "key", "value": "abc/swatch.jpg" },
                        { "name": "policy", "value": "p" },
                        { "name": "acl", "value": "private" }
                    ]
                }],
                "userErrors": []
            }))
            .unwrap();

        let staging = convert_staging_payload(payload);
        let names: Vec<_> = staging.targets[0]
            .parameters
            .iter()
            .map(|(name, _)| name.as_str())
            .collect();
        assert_eq!(names, ["key", "policy", "acl"]);
        assert!(staging.user_errors.is_empty());
    }

    #[test]
    fn test_staging_payload_drops_incomplete_targets() {
        let payload: staged_uploads_create::StagedUploadsCreatePayload =
            serde_json::from_value(json!({
                "stagedTargets": [{ "url": null, "resourceUrl": "r", "parameters": [] }],
                "userErrors": [{ "field": ["input", "0", "fileSize"], "message": "too big" }]
            }))
            .unwrap();

        let staging = convert_staging_payload(payload);
        assert!(staging.targets.is_empty());
        assert_eq!(
            staging.user_errors[0].field.as_deref(),
            Some("input.0.fileSize")
        );
    }

    #[test]
    fn test_collection_image_counts_as_ready() {
        let payload: collection_update_image::CollectionUpdatePayload =
            serde_json::from_value(json!({
                "collection": {
                    "id": "gid://shopify/Collection/7",
                    "image": { "url": "https://cdn.example/c.png" }
                },
                "userErrors": []
            }))
            .unwrap();

        let outcome = convert_collection_image_payload(payload);
        assert_eq!(outcome.status, Some(MediaStatus::Ready));
        assert_eq!(outcome.image_url.as_deref(), Some("https://cdn.example/c.png"));
    }

    #[test]
    fn test_product_summary_rejects_foreign_id() {
        let node: get_products::ProductNode = serde_json::from_value(json!({
            "id": "gid://shopify/Order/1",
            "title": "Board",
            "featuredMedia": null
        }))
        .unwrap();

        assert!(matches!(
            convert_product_summary(node),
            Err(AdminShopifyError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_rest_collection_conversion() {
        let summary = convert_rest_collection(&json!({
            "id": 841_564_295,
            "title": "Boards",
            "image": { "src": "https://cdn.example/boards.png" }
        }))
        .unwrap();

        assert_eq!(summary.id, CollectionId::new(841_564_295));
        assert_eq!(summary.image_src.as_deref(), Some("https://cdn.example/boards.png"));
    }
}
