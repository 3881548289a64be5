//! Unified error handling for the panel's HTTP surface.
//!
//! Every error renders as JSON:
//!
//! ```json
//! { "kind": "partial_success", "message": "...", "errors": [...], "entityId": "gid://..." }
//! ```
//!
//! `errors` and `entityId` are omitted when empty.

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header::RETRY_AFTER},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::products::ProductError;
use crate::services::upload::UploadError;
use crate::shopify::{AdminShopifyError, UserError};

/// Application-level error type for the admin panel.
#[derive(Debug, Error)]
pub enum AppError {
    /// Request input failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Shopify refused to issue a staged upload target.
    #[error("Staging rejected: {message}")]
    StagingRejected {
        message: String,
        errors: Vec<UserError>,
    },

    /// The storage endpoint refused the file.
    #[error("Transfer rejected: {0}")]
    TransferRejected(String),

    /// Shopify refused to attach the uploaded file.
    #[error("Attach rejected: {message}")]
    AttachRejected {
        message: String,
        errors: Vec<UserError>,
    },

    /// Shopify answered without a field the operation depends on.
    #[error("Malformed remote response: {0}")]
    MalformedRemoteResponse(String),

    /// Shopify returned errors as data.
    #[error("Shopify rejected the request")]
    RemoteBusiness(Vec<UserError>),

    /// The entity was saved but a follow-up step failed.
    #[error("Saved with errors")]
    PartialSuccess {
        entity_id: String,
        errors: Vec<UserError>,
    },

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Request is not for this shop.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Shopify API call failed.
    #[error("Shopify error: {0}")]
    Shopify(#[from] AdminShopifyError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON error body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody<'a> {
    kind: &'static str,
    message: String,
    #[serde(skip_serializing_if = "no_errors")]
    errors: &'a [UserError],
    #[serde(skip_serializing_if = "Option::is_none")]
    entity_id: Option<&'a str>,
}

fn no_errors(errors: &&[UserError]) -> bool {
    errors.is_empty()
}

impl AppError {
    /// Machine-readable error kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::StagingRejected { .. } => "staging_rejected",
            Self::TransferRejected(_) => "transfer_rejected",
            Self::AttachRejected { .. } => "attach_rejected",
            Self::MalformedRemoteResponse(_) => "malformed_remote_response",
            Self::RemoteBusiness(_) => "remote_business",
            Self::PartialSuccess { .. } => "partial_success",
            Self::NotFound(_) => "not_found",
            Self::Unauthorized(_) => "unauthorized",
            Self::Shopify(AdminShopifyError::RateLimited(_)) => "rate_limited",
            Self::Shopify(_) => "shopify",
            Self::Internal(_) => "internal",
        }
    }

    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::StagingRejected { .. }
            | Self::TransferRejected(_)
            | Self::AttachRejected { .. }
            | Self::MalformedRemoteResponse(_) => StatusCode::BAD_GATEWAY,
            Self::RemoteBusiness(_) | Self::PartialSuccess { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Shopify(AdminShopifyError::RateLimited(_)) => StatusCode::TOO_MANY_REQUESTS,
            Self::Shopify(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn errors(&self) -> &[UserError] {
        match self {
            Self::StagingRejected { errors, .. }
            | Self::AttachRejected { errors, .. }
            | Self::RemoteBusiness(errors)
            | Self::PartialSuccess { errors, .. } => errors,
            _ => &[],
        }
    }
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::Validation(msg) => Self::Validation(msg),
            UploadError::StagingRejected { reason, errors } => Self::StagingRejected {
                message: reason,
                errors,
            },
            UploadError::TransferRejected(msg) => Self::TransferRejected(msg),
            UploadError::AttachRejected { reason, errors } => Self::AttachRejected {
                message: reason,
                errors,
            },
            UploadError::MalformedRemoteResponse(msg) => Self::MalformedRemoteResponse(msg),
            UploadError::Remote(err) => Self::Shopify(err),
        }
    }
}

impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::Validation(msg) => Self::Validation(msg),
            ProductError::RemoteBusiness(errors) => Self::RemoteBusiness(errors),
            ProductError::PartialSuccess { entity_id, errors } => Self::PartialSuccess {
                entity_id: entity_id.to_string(),
                errors,
            },
            ProductError::NotFound(what) => Self::NotFound(what),
            ProductError::MalformedRemoteResponse(msg) => Self::MalformedRemoteResponse(msg),
            ProductError::Remote(err) => Self::Shopify(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Log server errors with Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                kind = self.kind(),
                sentry_event_id = %event_id,
                "Admin request error"
            );
        }

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Internal(_) => "Internal server error".to_string(),
            Self::Shopify(AdminShopifyError::RateLimited(secs)) => {
                format!("Shopify rate limit reached, retry after {secs} seconds")
            }
            Self::Shopify(_) => "External service error".to_string(),
            _ => self.to_string(),
        };

        let entity_id = match &self {
            Self::PartialSuccess { entity_id, .. } => Some(entity_id.as_str()),
            _ => None,
        };

        let body = ErrorBody {
            kind: self.kind(),
            message,
            errors: self.errors(),
            entity_id,
        };
        let mut response = (status, Json(body)).into_response();

        if let Self::Shopify(AdminShopifyError::RateLimited(secs)) = &self
            && let Ok(value) = HeaderValue::from_str(&secs.to_string())
        {
            response.headers_mut().insert(RETRY_AFTER, value);
        }

        response
    }
}
