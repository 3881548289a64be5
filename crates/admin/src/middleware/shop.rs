//! Shop context extractor.
//!
//! Handlers receive the shop they act on as an explicit [`ShopContext`]
//! argument instead of looking it up from ambient state. The embedded admin
//! UI may send `X-Shopify-Shop-Domain`; when present it must name the
//! configured store.

use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::warn;

use crate::config::UploadConfig;
use crate::error::AppError;
use crate::shopify::AdminClient;
use crate::state::AppState;

/// Header naming the shop a request is for.
pub const SHOP_DOMAIN_HEADER: &str = "x-shopify-shop-domain";

/// The shop a request acts on, with the client bound to it.
#[derive(Debug, Clone)]
pub struct ShopContext {
    /// Shop domain, e.g. `my-shop.myshopify.com`.
    pub shop_domain: String,
    /// Admin API client for this shop.
    pub client: AdminClient,
    /// Upload limits for this shop.
    pub upload: UploadConfig,
}

impl FromRequestParts<AppState> for ShopContext {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let configured = state.shopify().store();

        if let Some(value) = parts.headers.get(SHOP_DOMAIN_HEADER) {
            let requested = value
                .to_str()
                .map_err(|_| AppError::Unauthorized("invalid shop domain header".to_string()))?
                .trim();

            if !requested.eq_ignore_ascii_case(configured) {
                warn!(requested, configured, "request for unknown shop");
                return Err(AppError::Unauthorized(format!(
                    "unknown shop {requested}"
                )));
            }
        }

        Ok(Self {
            shop_domain: configured.to_string(),
            client: state.shopify().clone(),
            upload: state.config().upload.clone(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::Request;

    use super::*;
    use crate::state::tests::test_state;

    async fn extract(header: Option<&str>) -> Result<ShopContext, AppError> {
        let mut builder = Request::builder().uri("/products");
        if let Some(header) = header {
            builder = builder.header(SHOP_DOMAIN_HEADER, header);
        }
        let (mut parts, ()) = builder.body(()).unwrap().into_parts();

        ShopContext::from_request_parts(&mut parts, &test_state("https://my-shop.myshopify.com"))
            .await
    }

    #[tokio::test]
    async fn test_missing_header_uses_configured_shop() {
        let ctx = extract(None).await.unwrap();
        assert_eq!(ctx.shop_domain, "my-shop.myshopify.com");
    }

    #[tokio::test]
    async fn test_matching_header_is_case_insensitive() {
        let ctx = extract(Some("My-Shop.myshopify.com")).await.unwrap();
        assert_eq!(ctx.shop_domain, "my-shop.myshopify.com");
    }

    #[tokio::test]
    async fn test_other_shop_is_unauthorized() {
        let err = extract(Some("other.myshopify.com")).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }
}
