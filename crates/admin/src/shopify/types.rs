//! Domain types for the Shopify Admin API.
//!
//! These types provide a clean API separate from the raw GraphQL and REST
//! response shapes in `admin::queries`.

use serde::{Deserialize, Serialize};
use shop_panel_core::{CollectionId, ProductId, VariantId};

use super::UserError;

// =============================================================================
// Product Types
// =============================================================================

/// A product as shown in the panel's product list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSummary {
    /// Product ID.
    pub id: ProductId,
    /// Product title.
    pub title: String,
    /// URL of the first product image, if any.
    pub image_src: Option<String>,
}

/// Fields sent to `productCreate`.
#[derive(Debug, Default)]
pub struct ProductCreateInput<'a> {
    /// Product title.
    pub title: &'a str,
    /// Description (HTML).
    pub description_html: Option<&'a str>,
    /// Product type, shown as "category" in the panel.
    pub product_type: Option<&'a str>,
}

/// Result of a successful `productCreate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedProduct {
    /// ID of the new product.
    pub id: ProductId,
    /// Title as stored by Shopify.
    pub title: String,
    /// The default variant Shopify creates with every product.
    pub default_variant_id: Option<VariantId>,
}

// =============================================================================
// Collection Types
// =============================================================================

/// A custom collection, as listed through the REST API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSummary {
    /// Collection ID.
    pub id: CollectionId,
    /// Collection title.
    pub title: String,
    /// Collection image URL, if any.
    pub image_src: Option<String>,
}

// =============================================================================
// Staged Upload Types
// =============================================================================

/// Staged upload target for file uploads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagedUploadTarget {
    /// The URL to upload the file to.
    pub url: String,
    /// The resource URL after upload completes.
    pub resource_url: String,
    /// Form parameters to include with the upload, in the order Shopify sent them.
    pub parameters: Vec<(String, String)>,
}

/// Payload of `stagedUploadsCreate`, before any validation.
#[derive(Debug, Clone, Default)]
pub struct StagingResponse {
    /// Returned targets (one per requested input).
    pub targets: Vec<StagedUploadTarget>,
    /// User errors returned as data.
    pub user_errors: Vec<UserError>,
}

/// Raw response from the staged upload storage endpoint.
#[derive(Debug, Clone)]
pub struct TransferResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body (empty, or an XML document for location-bearing transports).
    pub body: String,
}

/// Processing status Shopify reports for media and files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaStatus {
    Uploaded,
    Processing,
    Ready,
    Failed,
    Other(String),
}

impl MediaStatus {
    /// Parse a GraphQL enum value such as `"UPLOADED"`.
    #[must_use]
    pub fn from_graphql(value: &str) -> Self {
        match value {
            "UPLOADED" => Self::Uploaded,
            "PROCESSING" => Self::Processing,
            "READY" => Self::Ready,
            "FAILED" => Self::Failed,
            other => Self::Other(other.to_string()),
        }
    }

    /// GraphQL spelling of the status.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Uploaded => "UPLOADED",
            Self::Processing => "PROCESSING",
            Self::Ready => "READY",
            Self::Failed => "FAILED",
            Self::Other(other) => other,
        }
    }

    /// Whether Shopify accepted the asset.
    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        matches!(self, Self::Uploaded | Self::Processing | Self::Ready)
    }
}

impl std::fmt::Display for MediaStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized payload of an attach mutation.
#[derive(Debug, Clone, Default)]
pub struct AttachOutcome {
    /// Status of the attached media or file, if the payload carried one.
    pub status: Option<MediaStatus>,
    /// Public URL of the attached image, when the mutation returns it.
    pub image_url: Option<String>,
    /// User errors returned as data.
    pub user_errors: Vec<UserError>,
}
