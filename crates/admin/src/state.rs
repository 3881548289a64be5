//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::AdminConfig;
use crate::shopify::{AdminClient, AdminShopifyError};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration and the Shopify Admin API client.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    shopify: AdminClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the Shopify HTTP client cannot be built.
    pub fn new(config: AdminConfig) -> Result<Self, AdminShopifyError> {
        let shopify = AdminClient::new(&config.shopify)?;

        Ok(Self {
            inner: Arc::new(AppStateInner { config, shopify }),
        })
    }

    /// Get a reference to the admin configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Get a reference to the Shopify Admin API client.
    #[must_use]
    pub fn shopify(&self) -> &AdminClient {
        &self.inner.shopify
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use std::net::{IpAddr, Ipv4Addr};
    use std::time::Duration;

    use secrecy::SecretString;

    use super::*;
    use crate::config::{ShopifyAdminConfig, UploadConfig};

    /// State pointed at `store`, which may be a mock server origin.
    pub(crate) fn test_state(store: &str) -> AppState {
        AppState::new(AdminConfig {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 0,
            shopify: ShopifyAdminConfig {
                store: store.to_string(),
                api_version: "2026-01".to_string(),
                access_token: SecretString::from("shpat_test_token"),
                request_timeout: Duration::from_secs(5),
                connect_timeout: Duration::from_secs(5),
            },
            upload: UploadConfig::default(),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 0.0,
            sentry_traces_sample_rate: 0.0,
            tls: None,
        })
        .unwrap()
    }

    #[test]
    fn test_state_exposes_client_for_store() {
        let state = test_state("https://my-shop.myshopify.com/");
        assert_eq!(state.shopify().store(), "my-shop.myshopify.com");
        assert_eq!(state.config().upload.max_bytes, 2 * 1024 * 1024);
    }
}
