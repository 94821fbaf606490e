//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::ShopConfig;
use crate::services::admin::{CredentialVerifier, FixedCredentials};
use crate::store::{FileStorage, StoreError};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the data files and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ShopConfig,
    storage: FileStorage,
    credentials: Arc<dyn CredentialVerifier>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(
        config: ShopConfig,
        storage: FileStorage,
        credentials: Arc<dyn CredentialVerifier>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                storage,
                credentials,
            }),
        }
    }

    /// Open the data directory named by `config` and check admin logins
    /// against the configured credential pair.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the data directory cannot be prepared.
    pub async fn from_config(config: ShopConfig) -> Result<Self, StoreError> {
        let storage = FileStorage::open(&config.data_dir).await?;
        let credentials = Arc::new(FixedCredentials::from(&config.admin));
        Ok(Self::new(config, storage, credentials))
    }

    /// Get a reference to the shop configuration.
    #[must_use]
    pub fn config(&self) -> &ShopConfig {
        &self.inner.config
    }

    /// Get a reference to the file storage.
    #[must_use]
    pub fn storage(&self) -> &FileStorage {
        &self.inner.storage
    }

    /// Get the admin credential verifier.
    #[must_use]
    pub fn credentials(&self) -> &dyn CredentialVerifier {
        self.inner.credentials.as_ref()
    }
}
