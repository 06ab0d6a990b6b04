use crate::client::IdentityClient;
use crate::core::IdentityResolver;
use crate::crypto::{Fingerprinter, HostFingerprinter, RandomFingerprinter};
use crate::error::Result;
use crate::protocol::DEFAULT_API_BASE_URL;
use crate::storage::JsonFileStore;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

pub const STORE_DIR_NAME: &str = "device-identity";
pub const STORE_FILE_NAME: &str = "storage.json";

/// Where a missing device id comes from
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum FingerprintSource {
    /// Hash of host signals, stable across reinstalls of the store
    #[default]
    Host,
    /// Fresh uuid
    Random,
}

#[async_trait]
impl Fingerprinter for FingerprintSource {
    async fn visitor_id(&self) -> Result<String> {
        match self {
            Self::Host => HostFingerprinter::new().visitor_id().await,
            Self::Random => RandomFingerprinter.visitor_id().await,
        }
    }
}

pub type DefaultResolver = IdentityResolver<IdentityClient, FingerprintSource, JsonFileStore>;

/// Settings for resolving against a real backend and on-disk store
#[derive(Clone, Debug, PartialEq)]
pub struct ResolverConfig {
    pub api_url: String,
    pub store_path: PathBuf,
    /// Per-request timeout; `None` leaves it to the transport
    pub timeout: Option<Duration>,
    pub fingerprint: FingerprintSource,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_BASE_URL.to_string(),
            store_path: Self::default_store_path(),
            timeout: None,
            fingerprint: FingerprintSource::default(),
        }
    }
}

impl ResolverConfig {
    /// `<data dir>/device-identity/storage.json`, or relative to the working
    /// directory when the platform has no data dir
    pub fn default_store_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(STORE_DIR_NAME)
            .join(STORE_FILE_NAME)
    }

    pub fn api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.store_path = path.into();
        self
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn fingerprint(mut self, source: FingerprintSource) -> Self {
        self.fingerprint = source;
        self
    }

    pub fn client(&self) -> Result<IdentityClient> {
        IdentityClient::with_timeout(&self.api_url, self.timeout)
    }

    pub fn store(&self) -> JsonFileStore {
        JsonFileStore::new(&self.store_path)
    }

    pub fn resolver(&self) -> Result<DefaultResolver> {
        Ok(IdentityResolver::new(
            Arc::new(self.client()?),
            Arc::new(self.fingerprint),
            Arc::new(self.store()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ResolverConfig::default();
        assert_eq!(config.api_url, "http://localhost:8080/api/identities");
        assert_eq!(config.timeout, None);
        assert_eq!(config.fingerprint, FingerprintSource::Host);
        assert!(config.store_path.ends_with("device-identity/storage.json"));
    }

    #[test]
    fn test_builder_chaining() {
        let config = ResolverConfig::default()
            .api_url("http://identity.internal/api/identities")
            .store_path("/tmp/ids.json")
            .timeout(Some(Duration::from_secs(5)))
            .fingerprint(FingerprintSource::Random);

        assert_eq!(config.api_url, "http://identity.internal/api/identities");
        assert_eq!(config.store_path, PathBuf::from("/tmp/ids.json"));
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.fingerprint, FingerprintSource::Random);
        assert!(config.resolver().is_ok());
    }

    #[test]
    fn test_bad_url_fails_early() {
        let config = ResolverConfig::default().api_url("::nope::");
        assert!(config.resolver().is_err());
    }

    #[tokio::test]
    async fn test_random_source_differs_per_call() {
        let a = FingerprintSource::Random.visitor_id().await.unwrap();
        let b = FingerprintSource::Random.visitor_id().await.unwrap();
        assert_ne!(a, b);
    }
}
