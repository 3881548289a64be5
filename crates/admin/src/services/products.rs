//! Product list, create, update and delete.
//!
//! Shopify holds all product state; these functions validate input, make the
//! remote calls in order, and reshape the results for the admin UI. Once a
//! product exists, later failures are reported as a partial success so the UI
//! can still link to the new product.

use std::future::Future;

use serde::Serialize;
use shop_panel_core::{Price, ProductId, VariantId};
use thiserror::Error;
use tracing::{instrument, warn};
use url::Url;

use crate::shopify::{
    AdminClient, AdminShopifyError, AttachOutcome, CreatedProduct, ProductCreateInput,
    ProductSummary, UserError,
};

/// Number of products returned by a list call.
pub const LIST_LIMIT: i64 = 50;

/// Longest title Shopify accepts.
pub const MAX_TITLE_CHARS: usize = 255;

/// The remote calls product handling needs.
pub trait ProductApi: Send + Sync {
    /// Up to `first` products matching a search query.
    fn search(
        &self,
        query: Option<&str>,
        first: i64,
    ) -> impl Future<Output = Result<Vec<ProductSummary>, AdminShopifyError>> + Send;

    /// Create a product with its default variant.
    fn create(
        &self,
        input: &ProductCreateInput<'_>,
    ) -> impl Future<Output = Result<CreatedProduct, AdminShopifyError>> + Send;

    /// Rename a product; returns the title Shopify stored.
    fn update_title(
        &self,
        id: &ProductId,
        title: &str,
    ) -> impl Future<Output = Result<String, AdminShopifyError>> + Send;

    /// Set one variant's price.
    fn set_price(
        &self,
        product_id: &ProductId,
        variant_id: &VariantId,
        price: Price,
    ) -> impl Future<Output = Result<(), AdminShopifyError>> + Send;

    /// Add an image from a public URL as product media.
    fn attach_image(
        &self,
        id: &ProductId,
        image_url: &str,
        alt: Option<&str>,
    ) -> impl Future<Output = Result<AttachOutcome, AdminShopifyError>> + Send;

    /// Delete a product.
    fn delete(&self, id: &ProductId) -> impl Future<Output = Result<(), AdminShopifyError>> + Send;
}

impl ProductApi for AdminClient {
    async fn search(
        &self,
        query: Option<&str>,
        first: i64,
    ) -> Result<Vec<ProductSummary>, AdminShopifyError> {
        self.search_products(query, first).await
    }

    async fn create(
        &self,
        input: &ProductCreateInput<'_>,
    ) -> Result<CreatedProduct, AdminShopifyError> {
        self.create_product(input).await
    }

    async fn update_title(&self, id: &ProductId, title: &str) -> Result<String, AdminShopifyError> {
        self.update_product_title(id, title).await
    }

    async fn set_price(
        &self,
        product_id: &ProductId,
        variant_id: &VariantId,
        price: Price,
    ) -> Result<(), AdminShopifyError> {
        self.set_variant_price(product_id, variant_id, price).await
    }

    async fn attach_image(
        &self,
        id: &ProductId,
        image_url: &str,
        alt: Option<&str>,
    ) -> Result<AttachOutcome, AdminShopifyError> {
        self.attach_media_to_product(id, image_url, alt).await
    }

    async fn delete(&self, id: &ProductId) -> Result<(), AdminShopifyError> {
        self.delete_product(id).await
    }
}

/// Errors from product handling.
#[derive(Debug, Error)]
pub enum ProductError {
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("Shopify rejected the request: {}", join_errors(.0))]
    RemoteBusiness(Vec<UserError>),

    #[error("product {entity_id} was saved, but: {}", join_errors(.errors))]
    PartialSuccess {
        entity_id: ProductId,
        errors: Vec<UserError>,
    },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("malformed remote response: {0}")]
    MalformedRemoteResponse(String),

    #[error(transparent)]
    Remote(AdminShopifyError),
}

impl From<AdminShopifyError> for ProductError {
    fn from(err: AdminShopifyError) -> Self {
        match err {
            AdminShopifyError::UserErrors(errors) => Self::RemoteBusiness(errors),
            AdminShopifyError::NotFound(what) => Self::NotFound(what),
            AdminShopifyError::MalformedResponse(msg) => Self::MalformedRemoteResponse(msg),
            AdminShopifyError::Parse(e) => Self::MalformedRemoteResponse(e.to_string()),
            other => Self::Remote(other),
        }
    }
}

fn join_errors(errors: &[UserError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// A product as the admin UI shows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    pub id: ProductId,
    pub title: String,
    pub image_src: Option<String>,
}

impl From<ProductSummary> for ProductView {
    fn from(summary: ProductSummary) -> Self {
        Self {
            id: summary.id,
            title: summary.title,
            image_src: summary.image_src,
        }
    }
}

/// Result of an update; only changed fields are set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdateView {
    pub id: ProductId,
    pub title: Option<String>,
    pub image_src: Option<String>,
}

/// Fields for a new product.
#[derive(Debug, Clone, Default)]
pub struct NewProduct {
    pub title: String,
    pub description: Option<String>,
    pub price: Option<String>,
    pub category: Option<String>,
    pub image_url: String,
}

/// Changes to an existing product.
#[derive(Debug, Clone, Default)]
pub struct ProductChanges {
    pub title: Option<String>,
    pub image_url: Option<String>,
}

fn validate_title(title: &str) -> Result<&str, ProductError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ProductError::Validation("title is required".to_string()));
    }
    if title.chars().count() > MAX_TITLE_CHARS {
        return Err(ProductError::Validation(format!(
            "title must be at most {MAX_TITLE_CHARS} characters"
        )));
    }
    Ok(title)
}

fn validate_image_url(raw: &str) -> Result<Url, ProductError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ProductError::Validation(format!("image URL is invalid: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ProductError::Validation(format!(
            "image URL must use http or https, not {other}"
        ))),
    }
}

/// Treat empty optional strings as absent.
fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Errors from a follow-up call, as field/message pairs.
fn follow_up_errors(err: ProductError) -> Vec<UserError> {
    match err {
        ProductError::RemoteBusiness(errors) => errors,
        other => vec![UserError::new(None, other.to_string())],
    }
}

/// Check an attach payload; returns the image URL Shopify reported.
fn attach_result(
    outcome: Result<AttachOutcome, AdminShopifyError>,
) -> Result<Option<String>, ProductError> {
    let outcome = outcome?;
    if !outcome.user_errors.is_empty() {
        return Err(ProductError::RemoteBusiness(outcome.user_errors));
    }
    match outcome.status {
        Some(status) if status.is_accepted() => Ok(outcome.image_url),
        Some(status) => Err(ProductError::RemoteBusiness(vec![UserError::new(
            Some(vec!["media".to_string()]),
            format!("media status {status}"),
        )])),
        None => Err(ProductError::MalformedRemoteResponse(
            "attach returned no media status".to_string(),
        )),
    }
}

/// List products, optionally filtered with Shopify search syntax.
///
/// # Errors
///
/// Returns an error if the remote call fails.
#[instrument(skip(api))]
pub async fn list_products<A: ProductApi>(
    api: &A,
    search: Option<&str>,
) -> Result<Vec<ProductView>, ProductError> {
    let products = api.search(non_blank(search), LIST_LIMIT).await?;
    Ok(products.into_iter().map(ProductView::from).collect())
}

/// Create a product with its image, and its price when given.
///
/// # Errors
///
/// Returns `ProductError::Validation` for bad input,
/// `ProductError::RemoteBusiness` if Shopify refuses the product, and
/// `ProductError::PartialSuccess` if the product was created but the price or
/// image could not be set.
#[instrument(skip(api, product), fields(title = %product.title))]
pub async fn create_product<A: ProductApi>(
    api: &A,
    product: NewProduct,
) -> Result<ProductView, ProductError> {
    let title = validate_title(&product.title)?;
    let image_url = validate_image_url(&product.image_url)?;
    let price = non_blank(product.price.as_deref())
        .map(Price::parse)
        .transpose()
        .map_err(|e| ProductError::Validation(e.to_string()))?;

    let created = api
        .create(&ProductCreateInput {
            title,
            description_html: non_blank(product.description.as_deref()),
            product_type: non_blank(product.category.as_deref()),
        })
        .await?;

    let mut errors = Vec::new();

    if let Some(price) = price {
        match created.default_variant_id {
            Some(variant_id) => {
                if let Err(err) = api.set_price(&created.id, &variant_id, price).await {
                    errors.extend(follow_up_errors(err.into()));
                }
            }
            None => errors.push(UserError::new(
                Some(vec!["variants".to_string()]),
                "product has no default variant to price",
            )),
        }
    }

    let image_src = match attach_result(
        api.attach_image(&created.id, image_url.as_str(), Some(title))
            .await,
    ) {
        Ok(url) => Some(url.unwrap_or_else(|| image_url.to_string())),
        Err(err) => {
            errors.extend(follow_up_errors(err));
            None
        }
    };

    if !errors.is_empty() {
        warn!(product_id = %created.id, ?errors, "product created with errors");
        return Err(ProductError::PartialSuccess {
            entity_id: created.id,
            errors,
        });
    }

    Ok(ProductView {
        id: created.id,
        title: created.title,
        image_src,
    })
}

/// Change a product's title and/or add an image.
///
/// # Errors
///
/// Returns `ProductError::Validation` if nothing is to be changed or input is
/// bad, and `ProductError::PartialSuccess` if the title changed but the image
/// could not be attached. When only an image was requested, its failure is
/// returned as is: user errors and rejected media as
/// `ProductError::RemoteBusiness`, a payload without a media status as
/// `ProductError::MalformedRemoteResponse`, and transport or rate limit
/// failures as `ProductError::Remote`.
#[instrument(skip(api, changes), fields(product_id = %id))]
pub async fn update_product<A: ProductApi>(
    api: &A,
    id: ProductId,
    changes: ProductChanges,
) -> Result<ProductUpdateView, ProductError> {
    let title = non_blank(changes.title.as_deref())
        .map(validate_title)
        .transpose()?;
    let image_url = non_blank(changes.image_url.as_deref())
        .map(validate_image_url)
        .transpose()?;

    if title.is_none() && image_url.is_none() {
        return Err(ProductError::Validation(
            "provide a title or an image URL".to_string(),
        ));
    }

    let new_title = match title {
        Some(title) => Some(api.update_title(&id, title).await?),
        None => None,
    };

    let image_src = match image_url {
        Some(url) => {
            match attach_result(api.attach_image(&id, url.as_str(), new_title.as_deref()).await) {
                Ok(reported) => Some(reported.unwrap_or_else(|| url.to_string())),
                Err(err) if new_title.is_some() => {
                    let errors = follow_up_errors(err);
                    warn!(product_id = %id, ?errors, "title updated but image failed");
                    return Err(ProductError::PartialSuccess {
                        entity_id: id,
                        errors,
                    });
                }
                Err(err) => return Err(err),
            }
        }
        None => None,
    };

    Ok(ProductUpdateView {
        id,
        title: new_title,
        image_src,
    })
}

/// Delete a product. Deleting a missing product is `ProductError::NotFound`.
///
/// # Errors
///
/// Returns an error if the product does not exist or the remote call fails.
#[instrument(skip(api), fields(product_id = %id))]
pub async fn delete_product<A: ProductApi>(api: &A, id: ProductId) -> Result<(), ProductError> {
    api.delete(&id).await?;
    Ok(())
}
