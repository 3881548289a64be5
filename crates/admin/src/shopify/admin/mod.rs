//! Shopify Admin API client with access-token authentication.
//!
//! This module provides a type-safe client for the Shopify Admin API. Most
//! calls go through GraphQL; product deletion and collection listing use the
//! REST endpoints the panel has always used for them.

use std::sync::Arc;

use graphql_client::GraphQLQuery;
use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::instrument;

use crate::config::ShopifyAdminConfig;

use super::{AdminShopifyError, GraphQLError, GraphQLErrorLocation, UserError};

mod collections;
mod conversions;
mod media;
mod products;
pub mod queries;

/// Shopify Admin API client.
///
/// Cheap to clone; all clones share one connection pool.
///
/// # Security
///
/// The access token has HIGH PRIVILEGE access to the store. It is only ever
/// written into the `X-Shopify-Access-Token` header of Admin API calls and is
/// never sent to staged upload targets.
#[derive(Clone)]
pub struct AdminClient {
    inner: Arc<AdminClientInner>,
}

struct AdminClientInner {
    client: reqwest::Client,
    base_url: String,
    store: String,
    api_version: String,
    access_token: SecretString,
}

impl std::fmt::Debug for AdminClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminClient")
            .field("store", &self.inner.store)
            .field("api_version", &self.inner.api_version)
            .field("access_token", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

/// GraphQL response wrapper.
#[derive(Debug, Deserialize)]
struct GraphQLResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQLErrorResponse>>,
}

#[derive(Debug, Deserialize)]
struct GraphQLErrorResponse {
    message: String,
    #[serde(default)]
    locations: Vec<GraphQLErrorLocationResponse>,
    #[serde(default)]
    path: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct GraphQLErrorLocationResponse {
    line: i64,
    column: i64,
}

impl AdminClient {
    /// Create a new Admin API client.
    ///
    /// # Errors
    ///
    /// Returns `AdminShopifyError::Http` if the HTTP client cannot be built.
    pub fn new(config: &ShopifyAdminConfig) -> Result<Self, AdminShopifyError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(AdminClientInner {
                client,
                base_url: config.base_url(),
                store: config.shop_domain().to_string(),
                api_version: config.api_version.clone(),
                access_token: config.access_token.clone(),
            }),
        })
    }

    /// Get the store domain.
    #[must_use]
    pub fn store(&self) -> &str {
        &self.inner.store
    }

    /// Get the pinned Admin API version.
    #[must_use]
    pub fn api_version(&self) -> &str {
        &self.inner.api_version
    }

    fn api_url(&self, path: &str) -> String {
        format!(
            "{}/admin/api/{}/{}",
            self.inner.base_url,
            self.inner.api_version,
            path.trim_start_matches('/')
        )
    }

    // =========================================================================
    // GraphQL Execution
    // =========================================================================

    /// Execute a GraphQL query.
    async fn execute<Q: GraphQLQuery>(
        &self,
        variables: Q::Variables,
    ) -> Result<Q::ResponseData, AdminShopifyError>
    where
        Q::ResponseData: DeserializeOwned,
    {
        let body = Q::build_query(variables);

        let response = self
            .inner
            .client
            .post(self.api_url("graphql.json"))
            .header(
                "X-Shopify-Access-Token",
                self.inner.access_token.expose_secret(),
            )
            .json(&body)
            .send()
            .await?;

        check_auth_and_rate_limit(&response)?;

        let graphql_response: GraphQLResponse<Q::ResponseData> = response.json().await?;

        if let Some(errors) = graphql_response.errors
            && !errors.is_empty()
        {
            let converted_errors: Vec<GraphQLError> = errors
                .into_iter()
                .map(|e| GraphQLError {
                    message: e.message,
                    locations: e
                        .locations
                        .into_iter()
                        .map(|l| GraphQLErrorLocation {
                            line: l.line,
                            column: l.column,
                        })
                        .collect(),
                    path: e.path,
                })
                .collect();
            return Err(AdminShopifyError::GraphQL(converted_errors));
        }

        graphql_response.data.ok_or_else(|| {
            AdminShopifyError::MalformedResponse(format!(
                "{} returned no data",
                body.operation_name
            ))
        })
    }

    // =========================================================================
    // REST Execution
    // =========================================================================

    /// Execute a REST call against `admin/api/{version}/{path}`.
    ///
    /// An empty success body is returned as `Value::Null`. A success body
    /// that carries a non-empty `errors` key fails with `UserErrors`.
    #[instrument(skip(self, payload), fields(store = %self.inner.store))]
    pub(crate) async fn rest(
        &self,
        method: Method,
        path: &str,
        payload: Option<&Value>,
    ) -> Result<Value, AdminShopifyError> {
        let mut request = self
            .inner
            .client
            .request(method, self.api_url(path))
            .header(
                "X-Shopify-Access-Token",
                self.inner.access_token.expose_secret(),
            );
        if let Some(payload) = payload {
            request = request.json(payload);
        }

        let response = request.send().await?;
        check_auth_and_rate_limit(&response)?;

        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            let body = if text.trim().is_empty() {
                Value::Null
            } else {
                serde_json::from_str(&text)?
            };
            let errors = body_errors(&body);
            if !errors.is_empty() {
                return Err(AdminShopifyError::UserErrors(errors));
            }
            return Ok(body);
        }

        if status == StatusCode::NOT_FOUND {
            return Err(AdminShopifyError::NotFound(path.to_string()));
        }

        let errors = serde_json::from_str::<Value>(&text)
            .map(|body| body_errors(&body))
            .unwrap_or_default();
        if errors.is_empty() {
            Err(AdminShopifyError::UnexpectedStatus(status.as_u16()))
        } else {
            Err(AdminShopifyError::UserErrors(errors))
        }
    }
}

/// Map 429 and 401/403 to their dedicated errors.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn check_auth_and_rate_limit(response: &reqwest::Response) -> Result<(), AdminShopifyError> {
    match response.status() {
        StatusCode::TOO_MANY_REQUESTS => {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse::<f64>().ok())
                .map_or(60, |secs| secs.ceil() as u64);
            Err(AdminShopifyError::RateLimited(retry_after))
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(AdminShopifyError::Unauthorized(
            "Invalid or expired access token".to_string(),
        )),
        _ => Ok(()),
    }
}

fn body_errors(body: &Value) -> Vec<UserError> {
    body.get("errors").map(rest_user_errors).unwrap_or_default()
}

/// Flatten a REST `errors` value into user errors.
///
/// Shopify sends either a string, a list of strings, or an object mapping
/// attribute names to lists of messages.
fn rest_user_errors(errors: &Value) -> Vec<UserError> {
    match errors {
        Value::String(message) => vec![UserError::new(None, message.as_str())],
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(|message| UserError::new(None, message))
            .collect(),
        Value::Object(fields) => fields
            .iter()
            .flat_map(|(field, messages)| {
                let messages = match messages {
                    Value::Array(items) => items
                        .iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect(),
                    Value::String(message) => vec![message.clone()],
                    _ => Vec::new(),
                };
                messages
                    .into_iter()
                    .map(move |message| UserError::new(Some(vec![field.clone()]), message))
            })
            .collect(),
        _ => Vec::new(),
    }
}
