//! Shared providers for test runs
//!
//! Acceptance tests configure the provider many times against the same NetBox.
//! A [`ClientRegistry`] hands out one configured [`Provider`] per server and token.
//! It is an ordinary value owned by the test harness.

use crate::config::ProviderConfig;
use crate::error::ProviderError;
use crate::provider::Provider;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Cache of configured providers keyed by server URL and token
#[derive(Debug, Default)]
pub struct ClientRegistry {
    providers: Mutex<HashMap<String, Arc<Provider>>>,
}

impl ClientRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider for `config`, configuring it against NetBox on first use
    pub async fn get_or_configure(&self, config: ProviderConfig) -> Result<Arc<Provider>, ProviderError> {
        let key = Self::key(&config);
        self.get_or_insert_with(&key, || Provider::configure(config)).await
    }

    /// Provider stored under `key`, built by `init` on first use.
    ///
    /// Concurrent callers for the same key wait for the first one; `init` runs at
    /// most once per key unless it fails.
    pub async fn get_or_insert_with<F, Fut>(&self, key: &str, init: F) -> Result<Arc<Provider>, ProviderError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Provider, ProviderError>>,
    {
        let mut providers = self.providers.lock().await;
        if let Some(provider) = providers.get(key) {
            debug!("Reusing configured provider for {}", key);
            return Ok(Arc::clone(provider));
        }

        let provider = Arc::new(init().await?);
        providers.insert(key.to_string(), Arc::clone(&provider));
        Ok(provider)
    }

    /// Number of cached providers
    pub async fn len(&self) -> usize {
        self.providers.lock().await.len()
    }

    /// Whether no provider is cached
    pub async fn is_empty(&self) -> bool {
        self.providers.lock().await.is_empty()
    }

    /// Drop every cached provider
    pub async fn clear(&self) {
        self.providers.lock().await.clear();
    }

    fn key(config: &ProviderConfig) -> String {
        format!("{}#{}", config.server_url.trim_end_matches('/'), config.api_token)
    }
}
