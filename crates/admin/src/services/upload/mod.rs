//! Staged image upload orchestration.
//!
//! An upload is three strictly sequential remote calls:
//!
//! 1. `stagedUploadsCreate` reserves a short-lived storage target
//! 2. the file is POSTed straight to that target
//! 3. an attach mutation links the stored file to a product, a collection, or
//!    the store's file library
//!
//! [`StagedUpload`] drives one such sequence and records each state it passes
//! through. Validation runs before any network call.

mod transfer;

pub use transfer::TransferOutcome;

use std::future::Future;

use serde::Serialize;
use shop_panel_core::{CollectionId, ImageMimeType, ProductId};
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::config::UploadConfig;
use crate::shopify::{
    AdminClient, AdminShopifyError, AttachOutcome, StagedUploadTarget, StagingResponse,
    TransferResponse, UserError,
};

/// The remote calls an upload needs.
pub trait RemoteAssetApi: Send + Sync {
    /// Request one staged target.
    fn stage_upload(
        &self,
        file_name: &str,
        mime_type: ImageMimeType,
        size_bytes: u64,
    ) -> impl Future<Output = Result<StagingResponse, AdminShopifyError>> + Send;

    /// POST the file to a staged target.
    fn transfer(
        &self,
        target: &StagedUploadTarget,
        file_name: &str,
        mime_type: ImageMimeType,
        content: Vec<u8>,
    ) -> impl Future<Output = Result<TransferResponse, AdminShopifyError>> + Send;

    /// Link a stored file to its target entity.
    fn attach(
        &self,
        target: &AttachmentTarget,
        resource_url: &str,
        alt_text: Option<&str>,
    ) -> impl Future<Output = Result<AttachOutcome, AdminShopifyError>> + Send;
}

impl RemoteAssetApi for AdminClient {
    async fn stage_upload(
        &self,
        file_name: &str,
        mime_type: ImageMimeType,
        size_bytes: u64,
    ) -> Result<StagingResponse, AdminShopifyError> {
        self.create_staged_upload(file_name, mime_type, size_bytes)
            .await
    }

    async fn transfer(
        &self,
        target: &StagedUploadTarget,
        file_name: &str,
        mime_type: ImageMimeType,
        content: Vec<u8>,
    ) -> Result<TransferResponse, AdminShopifyError> {
        self.upload_to_staged_target(target, file_name, mime_type, content)
            .await
    }

    async fn attach(
        &self,
        target: &AttachmentTarget,
        resource_url: &str,
        alt_text: Option<&str>,
    ) -> Result<AttachOutcome, AdminShopifyError> {
        match target {
            AttachmentTarget::Product(id) => {
                self.attach_media_to_product(id, resource_url, alt_text)
                    .await
            }
            AttachmentTarget::Collection(id) => {
                self.update_collection_image(id, resource_url, alt_text)
                    .await
            }
            AttachmentTarget::StandaloneFile => self.create_file(resource_url, alt_text).await,
        }
    }
}

/// A file received from the admin UI.
#[derive(Clone)]
pub struct UploadRequest {
    /// Original file name.
    pub file_name: String,
    /// Declared content type, as sent by the browser.
    pub mime_type: String,
    /// Declared size; must match `content`.
    pub size_bytes: u64,
    /// File bytes.
    pub content: Vec<u8>,
    /// Alt text forwarded to the attach mutation.
    pub alt_text: Option<String>,
}

impl std::fmt::Debug for UploadRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadRequest")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("size_bytes", &self.size_bytes)
            .field("content", &format_args!("[{} bytes]", self.content.len()))
            .field("alt_text", &self.alt_text)
            .finish()
    }
}

/// Where an uploaded image ends up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachmentTarget {
    Product(ProductId),
    Collection(CollectionId),
    StandaloneFile,
}

/// Result of a completed upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    /// URL of the uploaded image.
    pub public_image_url: String,
    /// Whether Shopify confirmed the attachment.
    pub attachment_confirmed: bool,
    /// Remote errors; always empty on success.
    pub remote_errors: Vec<UserError>,
}

/// Failure category of an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadFailure {
    Validation,
    StagingRejected,
    TransferRejected,
    AttachRejected,
    MalformedRemoteResponse,
    /// Shopify could not be reached or refused the credentials.
    Remote,
}

/// States an upload passes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadState {
    Idle,
    StagingRequested,
    Staged,
    Uploading,
    Uploaded,
    Attaching,
    Attached,
    Failed(UploadFailure),
}

impl UploadState {
    /// Whether no further transition is possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Attached | Self::Failed(_))
    }
}

/// Errors that end an upload.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("invalid upload: {0}")]
    Validation(String),

    #[error("staging rejected: {reason}")]
    StagingRejected {
        reason: String,
        errors: Vec<UserError>,
    },

    #[error("transfer rejected: {0}")]
    TransferRejected(String),

    #[error("attach rejected: {reason}")]
    AttachRejected {
        reason: String,
        errors: Vec<UserError>,
    },

    #[error("malformed remote response: {0}")]
    MalformedRemoteResponse(String),

    #[error(transparent)]
    Remote(AdminShopifyError),
}

impl UploadError {
    /// Failure category for state tracking.
    #[must_use]
    pub const fn kind(&self) -> UploadFailure {
        match self {
            Self::Validation(_) => UploadFailure::Validation,
            Self::StagingRejected { .. } => UploadFailure::StagingRejected,
            Self::TransferRejected(_) => UploadFailure::TransferRejected,
            Self::AttachRejected { .. } => UploadFailure::AttachRejected,
            Self::MalformedRemoteResponse(_) => UploadFailure::MalformedRemoteResponse,
            Self::Remote(_) => UploadFailure::Remote,
        }
    }

    /// Remote field/message pairs carried by the error.
    #[must_use]
    pub fn remote_errors(&self) -> &[UserError] {
        match self {
            Self::StagingRejected { errors, .. } | Self::AttachRejected { errors, .. } => errors,
            _ => &[],
        }
    }

    fn from_staging(err: AdminShopifyError) -> Self {
        match err {
            AdminShopifyError::UserErrors(errors) => Self::StagingRejected {
                reason: "staging returned user errors".to_string(),
                errors,
            },
            AdminShopifyError::MalformedResponse(msg) => Self::MalformedRemoteResponse(msg),
            AdminShopifyError::Parse(e) => Self::MalformedRemoteResponse(e.to_string()),
            other => Self::Remote(other),
        }
    }

    fn from_attach(err: AdminShopifyError) -> Self {
        match err {
            AdminShopifyError::UserErrors(errors) => Self::AttachRejected {
                reason: "attach returned user errors".to_string(),
                errors,
            },
            AdminShopifyError::MalformedResponse(msg) => Self::MalformedRemoteResponse(msg),
            AdminShopifyError::Parse(e) => Self::MalformedRemoteResponse(e.to_string()),
            other => Self::Remote(other),
        }
    }
}

/// Check a request against the upload limits.
///
/// # Errors
///
/// Returns `UploadError::Validation` describing the first problem found.
/// The declared type must agree with the content's leading bytes.
pub fn validate(request: &UploadRequest, config: &UploadConfig) -> Result<ImageMimeType, UploadError> {
    if request.file_name.trim().is_empty() {
        return Err(UploadError::Validation("file name is required".to_string()));
    }

    let mime_type = ImageMimeType::parse(&request.mime_type)
        .map_err(|e| UploadError::Validation(e.to_string()))?;
    if !config.allowed_mime_types.contains(&mime_type) {
        return Err(UploadError::Validation(format!(
            "unsupported image type: {mime_type}"
        )));
    }

    if request.size_bytes != request.content.len() as u64 {
        return Err(UploadError::Validation(format!(
            "declared size {} does not match content length {}",
            request.size_bytes,
            request.content.len()
        )));
    }
    if request.size_bytes == 0 {
        return Err(UploadError::Validation("file is empty".to_string()));
    }
    if request.size_bytes > config.max_bytes {
        return Err(UploadError::Validation(format!(
            "file is {} bytes, the limit is {}",
            request.size_bytes, config.max_bytes
        )));
    }

    match ImageMimeType::sniff(&request.content) {
        Some(detected) if detected == mime_type => Ok(mime_type),
        Some(detected) => Err(UploadError::Validation(format!(
            "declared type {mime_type} does not match content ({detected})"
        ))),
        None => Err(UploadError::Validation(format!(
            "content is not a {mime_type} image"
        ))),
    }
}

/// One staged upload, from validation to attachment.
///
/// An instance runs once. Staged targets are single-use, so a second
/// [`run`](Self::run) fails with `UploadError::Validation`.
pub struct StagedUpload<'a, A> {
    api: &'a A,
    config: &'a UploadConfig,
    state: UploadState,
    history: Vec<UploadState>,
}

impl<'a, A: RemoteAssetApi> StagedUpload<'a, A> {
    /// A new upload in the `Idle` state.
    #[must_use]
    pub fn new(api: &'a A, config: &'a UploadConfig) -> Self {
        Self {
            api,
            config,
            state: UploadState::Idle,
            history: vec![UploadState::Idle],
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> UploadState {
        self.state
    }

    /// Every state visited so far, starting with `Idle`.
    #[must_use]
    pub fn history(&self) -> &[UploadState] {
        &self.history
    }

    fn transition(&mut self, next: UploadState) {
        debug!(from = ?self.state, to = ?next, "upload transition");
        self.state = next;
        self.history.push(next);
    }

    /// Run the upload.
    ///
    /// # Errors
    ///
    /// Returns the error that moved the upload to `Failed`, or
    /// `UploadError::Validation` if this instance already ran.
    #[instrument(skip(self, request), fields(file_name = %request.file_name, size = request.size_bytes))]
    pub async fn run(
        &mut self,
        request: UploadRequest,
        target: &AttachmentTarget,
    ) -> Result<UploadResult, UploadError> {
        if self.state != UploadState::Idle {
            return Err(UploadError::Validation(
                "upload has already run; start a new one".to_string(),
            ));
        }

        match self.execute(request, target).await {
            Ok(result) => Ok(result),
            Err(err) => {
                self.transition(UploadState::Failed(err.kind()));
                Err(err)
            }
        }
    }

    async fn execute(
        &mut self,
        request: UploadRequest,
        target: &AttachmentTarget,
    ) -> Result<UploadResult, UploadError> {
        let mime_type = validate(&request, self.config)?;
        let UploadRequest {
            file_name,
            size_bytes,
            content,
            alt_text,
            ..
        } = request;
        self.transition(UploadState::StagingRequested);

        let staging = self
            .api
            .stage_upload(&file_name, mime_type, size_bytes)
            .await
            .map_err(UploadError::from_staging)?;
        let staged = accept_staging(staging)?;
        self.transition(UploadState::Staged);

        self.transition(UploadState::Uploading);
        let response = self
            .api
            .transfer(&staged, &file_name, mime_type, content)
            .await
            .map_err(|e| {
                // The transport error names the signed target URL.
                warn!(error = %e, "staged upload transfer failed");
                UploadError::TransferRejected("storage request failed".to_string())
            })?;
        let outcome = TransferOutcome::resolve(&response)?;
        self.transition(UploadState::Uploaded);

        let resource_url = outcome.resource_url(&staged).to_string();
        self.transition(UploadState::Attaching);
        let attached = self
            .api
            .attach(target, &resource_url, alt_text.as_deref())
            .await
            .map_err(UploadError::from_attach)?;
        let image_url = accept_attach(attached)?;
        self.transition(UploadState::Attached);

        Ok(UploadResult {
            public_image_url: image_url.unwrap_or(resource_url),
            attachment_confirmed: true,
            remote_errors: Vec::new(),
        })
    }
}

/// Pick the single staged target, or explain why there is none.
fn accept_staging(staging: StagingResponse) -> Result<StagedUploadTarget, UploadError> {
    if !staging.user_errors.is_empty() {
        return Err(UploadError::StagingRejected {
            reason: "staging returned user errors".to_string(),
            errors: staging.user_errors,
        });
    }

    staging
        .targets
        .into_iter()
        .next()
        .filter(|t| !t.url.is_empty())
        .ok_or_else(|| UploadError::StagingRejected {
            reason: "no staged target returned".to_string(),
            errors: Vec::new(),
        })
}

/// Check the attach payload; returns the image URL Shopify reported, if any.
fn accept_attach(outcome: AttachOutcome) -> Result<Option<String>, UploadError> {
    if !outcome.user_errors.is_empty() {
        return Err(UploadError::AttachRejected {
            reason: "attach returned user errors".to_string(),
            errors: outcome.user_errors,
        });
    }

    match outcome.status {
        None => Err(UploadError::MalformedRemoteResponse(
            "attach returned no status".to_string(),
        )),
        Some(status) if status.is_accepted() => Ok(outcome.image_url),
        Some(status) => Err(UploadError::AttachRejected {
            reason: format!("media status {status}"),
            errors: Vec::new(),
        }),
    }
}
