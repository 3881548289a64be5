//! Shopify Admin API client (HIGH PRIVILEGE).
//!
//! # Security
//!
//! **CRITICAL: This module holds the high-privilege Shopify Admin API token.**
//!
//! The Admin API has full access to products, collections and files, so the
//! token never leaves [`AdminClient`] and is redacted from `Debug` output.
//!
//! # Architecture
//!
//! - Typed GraphQL operations via `graphql_client::GraphQLQuery`
//! - A REST escape hatch for endpoints the panel still uses REST for
//! - Multipart POST to staged upload targets
//! - Direct API calls to Shopify (no local copy of store data)
//!
//! # Example
//!
//! ```rust,ignore
//! use shop_panel_admin::shopify::AdminClient;
//!
//! let client = AdminClient::new(&config.shopify)?;
//!
//! let products = client.search_products("board", 50).await?;
//! client.delete_product(&ProductId::new(42)).await?;
//! ```

mod admin;
pub mod types;

pub use admin::AdminClient;
pub use types::*;

use serde::Serialize;
use thiserror::Error;

/// Errors that can occur when interacting with Shopify Admin API.
#[derive(Debug, Error)]
pub enum AdminShopifyError {
    /// HTTP request failed (connection, timeout, body decoding).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// GraphQL query returned top-level errors.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by Shopify.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Authentication/authorization failed.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Mutation returned user errors (errors as data, HTTP 200).
    #[error("User error: {}", format_user_errors(.0))]
    UserErrors(Vec<UserError>),

    /// Response was missing a wrapper the operation depends on.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// REST call returned a non-success status without a usable error body.
    #[error("Unexpected status {0}")]
    UnexpectedStatus(u16),
}

/// A GraphQL error returned by the Shopify Admin API.
#[derive(Debug, Clone)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Source locations in the query.
    pub locations: Vec<GraphQLErrorLocation>,
    /// Path to the error in the response.
    pub path: Vec<serde_json::Value>,
}

/// Location in a GraphQL query where an error occurred.
#[derive(Debug, Clone)]
pub struct GraphQLErrorLocation {
    /// Line number (1-indexed).
    pub line: i64,
    /// Column number (1-indexed).
    pub column: i64,
}

/// A remote business error: a `{field, message}` pair returned as data.
///
/// `field` is the dotted join of the GraphQL input path (`media.0.originalSource`),
/// or the attribute name for REST errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserError {
    pub field: Option<String>,
    pub message: String,
}

impl UserError {
    /// Build a user error from a GraphQL field path.
    #[must_use]
    pub fn new(field: Option<Vec<String>>, message: impl Into<String>) -> Self {
        Self {
            field: field.filter(|f| !f.is_empty()).map(|f| f.join(".")),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for UserError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.field {
            Some(field) => write!(f, "{field}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    errors
        .iter()
        .map(|e| e.message.clone())
        .collect::<Vec<_>>()
        .join("; ")
}

fn format_user_errors(errors: &[UserError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
