//! Resolution of the staged storage response.
//!
//! Staged targets come in two flavours. Most answer a successful POST with an
//! empty 2xx body, in which case the staged `resource_url` is the reference to
//! attach. S3-style targets answer with a `PostResponse` XML document whose
//! `Location` element is the reference instead.

use crate::shopify::{StagedUploadTarget, TransferResponse};

use super::UploadError;

/// How the storage endpoint reported a successful transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferOutcome {
    /// 2xx without a location document.
    DirectSuccess,
    /// 2xx with a `PostResponse` document naming the stored object.
    LocationDocument(String),
}

impl TransferOutcome {
    /// Classify a storage response.
    ///
    /// # Errors
    ///
    /// Returns `UploadError::TransferRejected` for non-2xx statuses and for
    /// `PostResponse` documents without a `Location` element.
    pub fn resolve(response: &TransferResponse) -> Result<Self, UploadError> {
        if !(200..300).contains(&response.status) {
            return Err(UploadError::TransferRejected(format!(
                "storage returned HTTP {}",
                response.status
            )));
        }

        if !response.body.contains("<PostResponse") {
            return Ok(Self::DirectSuccess);
        }

        element_text(&response.body, "Location")
            .map(|location| Self::LocationDocument(unescape_xml(location)))
            .ok_or_else(|| {
                UploadError::TransferRejected("PostResponse without a Location element".to_string())
            })
    }

    /// The reference to hand to the attach mutation.
    #[must_use]
    pub fn resource_url<'a>(&'a self, target: &'a StagedUploadTarget) -> &'a str {
        match self {
            Self::DirectSuccess => &target.resource_url,
            Self::LocationDocument(location) => location,
        }
    }
}

/// Trimmed text of the first `<name>...</name>` element, if non-empty.
fn element_text<'a>(document: &'a str, name: &str) -> Option<&'a str> {
    let open = format!("<{name}>");
    let close = format!("</{name}>");

    let start = document.find(&open)? + open.len();
    let end = document[start..].find(&close)? + start;
    let text = document[start..end].trim();

    (!text.is_empty()).then_some(text)
}

fn unescape_xml(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
