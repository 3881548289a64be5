//! Image upload route handler.

use axum::{
    Json,
    extract::{Multipart, multipart::MultipartError},
};
use serde::Serialize;
use shop_panel_core::{CollectionId, ProductId};
use tracing::instrument;

use crate::{
    error::AppError,
    middleware::ShopContext,
    services::upload::{AttachmentTarget, StagedUpload, UploadRequest, UploadResult},
};

/// Upload response; `imageUrl` repeats `publicImageUrl` for older clients.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    #[serde(flatten)]
    pub result: UploadResult,
    pub image_url: String,
}

/// Fields read from the multipart form.
#[derive(Debug, Default)]
struct UploadForm {
    file: Option<UploadRequest>,
    product_id: Option<String>,
    collection_id: Option<String>,
    alt: Option<String>,
}

fn multipart_error(err: &MultipartError) -> AppError {
    AppError::Validation(format!("invalid multipart body: {}", err.body_text()))
}

/// Read the form. The file may be sent as `image` or `file`.
async fn read_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(&e))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "image" | "file" => {
                if form.file.is_some() {
                    return Err(AppError::Validation(
                        "send exactly one file, as `image` or `file`".to_string(),
                    ));
                }
                let file_name = field.file_name().unwrap_or_default().to_string();
                let mime_type = field.content_type().unwrap_or_default().to_string();
                let content = field.bytes().await.map_err(|e| multipart_error(&e))?.to_vec();

                form.file = Some(UploadRequest {
                    file_name,
                    mime_type,
                    size_bytes: content.len() as u64,
                    content,
                    alt_text: None,
                });
            }
            "productId" | "collectionId" | "alt" => {
                let value = field.text().await.map_err(|e| multipart_error(&e))?;
                let value = Some(value.trim().to_string()).filter(|v| !v.is_empty());
                match name.as_str() {
                    "productId" => form.product_id = value,
                    "collectionId" => form.collection_id = value,
                    _ => form.alt = value,
                }
            }
            _ => {}
        }
    }

    Ok(form)
}

fn attachment_target(form: &UploadForm) -> Result<AttachmentTarget, AppError> {
    match (&form.product_id, &form.collection_id) {
        (Some(_), Some(_)) => Err(AppError::Validation(
            "send productId or collectionId, not both".to_string(),
        )),
        (Some(id), None) => ProductId::parse(id)
            .map(AttachmentTarget::Product)
            .map_err(|e| AppError::Validation(e.to_string())),
        (None, Some(id)) => CollectionId::parse(id)
            .map(AttachmentTarget::Collection)
            .map_err(|e| AppError::Validation(e.to_string())),
        (None, None) => Ok(AttachmentTarget::StandaloneFile),
    }
}

/// Upload an image and attach it.
///
/// POST /hello/upload-image, POST /products/upload-file
#[instrument(skip(shop, multipart), fields(shop = %shop.shop_domain))]
pub async fn upload_image(
    shop: ShopContext,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let form = read_form(multipart).await?;
    let target = attachment_target(&form)?;

    let mut request = form
        .file
        .ok_or_else(|| AppError::Validation("an image file is required".to_string()))?;
    request.alt_text = form.alt;

    let mut upload = StagedUpload::new(&shop.client, &shop.upload);
    let result = upload.run(request, &target).await?;

    tracing::info!(
        attach_to = ?target,
        url = %result.public_image_url,
        "image uploaded"
    );

    Ok(Json(UploadResponse {
        image_url: result.public_image_url.clone(),
        result,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(product_id: Option<&str>, collection_id: Option<&str>) -> UploadForm {
        UploadForm {
            product_id: product_id.map(str::to_string),
            collection_id: collection_id.map(str::to_string),
            ..UploadForm::default()
        }
    }

    #[test]
    fn test_attachment_target_selection() {
        assert_eq!(
            attachment_target(&form(Some("42"), None)).ok(),
            Some(AttachmentTarget::Product(ProductId::new(42)))
        );
        assert_eq!(
            attachment_target(&form(None, Some("gid://shopify/Collection/7"))).ok(),
            Some(AttachmentTarget::Collection(CollectionId::new(7)))
        );
        assert_eq!(
            attachment_target(&form(None, None)).ok(),
            Some(AttachmentTarget::StandaloneFile)
        );
    }

    #[test]
    fn test_attachment_target_rejects_ambiguous_or_bad_ids() {
        assert!(matches!(
            attachment_target(&form(Some("1"), Some("2"))),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            attachment_target(&form(Some("gid://shopify/Collection/1"), None)),
            Err(AppError::Validation(_))
        ));
    }
}
