use crate::crypto::hash::sha256_from_bytes;
use crate::error::{IdentityError, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Length of a visitor id in hex characters
pub const VISITOR_ID_LEN: usize = 32;

/// Produces a visitor identifier for the current host.
///
/// Called at most once per storage scope; the resolver caches the result in
/// the key-value store.
#[async_trait]
pub trait Fingerprinter: Send + Sync {
    async fn visitor_id(&self) -> Result<String>;
}

/// Signals collected from the host that feed the visitor id
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct HostSignals {
    pub os: String,
    pub family: String,
    pub arch: String,
    pub hostname: Option<String>,
    pub username: Option<String>,
    pub machine_id: Option<String>,
}

impl HostSignals {
    /// Hash the signals into a stable visitor id
    pub fn visitor_id(&self) -> Result<String> {
        let canonical = serde_json::to_vec(self)?;
        let mut digest = sha256_from_bytes(&canonical);
        digest.truncate(VISITOR_ID_LEN);
        Ok(digest)
    }
}

/// Fingerprints the machine from OS, hostname, user and machine-id
#[derive(Clone, Debug)]
pub struct HostFingerprinter {
    machine_id_paths: Vec<PathBuf>,
}

impl Default for HostFingerprinter {
    fn default() -> Self {
        Self {
            machine_id_paths: vec![
                PathBuf::from("/etc/machine-id"),
                PathBuf::from("/var/lib/dbus/machine-id"),
            ],
        }
    }
}

impl HostFingerprinter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override where the machine id is looked up
    pub fn with_machine_id_paths(paths: Vec<PathBuf>) -> Self {
        Self {
            machine_id_paths: paths,
        }
    }

    /// Collect the host signals
    pub async fn load(&self) -> HostSignals {
        HostSignals {
            os: std::env::consts::OS.to_string(),
            family: std::env::consts::FAMILY.to_string(),
            arch: std::env::consts::ARCH.to_string(),
            hostname: hostname().await,
            username: non_empty_env(&["USER", "USERNAME"]),
            machine_id: first_readable(&self.machine_id_paths).await,
        }
    }
}

#[async_trait]
impl Fingerprinter for HostFingerprinter {
    async fn visitor_id(&self) -> Result<String> {
        let signals = self.load().await;
        tracing::debug!(
            "Collected host signals (hostname: {}, machine id: {})",
            signals.hostname.is_some(),
            signals.machine_id.is_some()
        );
        signals.visitor_id()
    }
}

/// Fingerprinter that returns a fresh random id on every call
#[derive(Clone, Debug, Default)]
pub struct RandomFingerprinter;

#[async_trait]
impl Fingerprinter for RandomFingerprinter {
    async fn visitor_id(&self) -> Result<String> {
        Ok(uuid::Uuid::new_v4().simple().to_string())
    }
}

/// Fingerprinter that always answers with the same id, or always fails
#[derive(Clone, Debug)]
pub struct FixedFingerprinter(std::result::Result<String, String>);

impl FixedFingerprinter {
    pub fn new(visitor_id: impl Into<String>) -> Self {
        Self(Ok(visitor_id.into()))
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self(Err(message.into()))
    }
}

#[async_trait]
impl Fingerprinter for FixedFingerprinter {
    async fn visitor_id(&self) -> Result<String> {
        self.0.clone().map_err(IdentityError::fingerprint)
    }
}

fn non_empty_env(names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}

async fn hostname() -> Option<String> {
    if let Some(name) = non_empty_env(&["HOSTNAME", "COMPUTERNAME"]) {
        return Some(name);
    }
    first_readable(&[PathBuf::from("/etc/hostname")]).await
}

async fn first_readable(paths: &[PathBuf]) -> Option<String> {
    for path in paths {
        if let Some(value) = read_trimmed(path).await {
            return Some(value);
        }
    }
    None
}

async fn read_trimmed(path: &Path) -> Option<String> {
    let contents = tokio::fs::read_to_string(path).await.ok()?;
    let trimmed = contents.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_host_fingerprint_is_stable() {
        let fingerprinter = HostFingerprinter::new();
        let first = fingerprinter.visitor_id().await.unwrap();
        let second = fingerprinter.visitor_id().await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.len(), VISITOR_ID_LEN);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[tokio::test]
    async fn test_machine_id_changes_visitor_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("machine-id");

        tokio::fs::write(&path, "aaaa\n").await.unwrap();
        let fingerprinter = HostFingerprinter::with_machine_id_paths(vec![path.clone()]);
        let signals = fingerprinter.load().await;
        assert_eq!(signals.machine_id.as_deref(), Some("aaaa"));
        let first = signals.visitor_id().unwrap();

        tokio::fs::write(&path, "bbbb\n").await.unwrap();
        let second = fingerprinter.visitor_id().await.unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_missing_machine_id_is_skipped() {
        let fingerprinter =
            HostFingerprinter::with_machine_id_paths(vec![PathBuf::from("/nonexistent/machine-id")]);
        let signals = fingerprinter.load().await;
        assert!(signals.machine_id.is_none());
        assert_eq!(signals.os, std::env::consts::OS);
    }

    #[tokio::test]
    async fn test_random_fingerprints_differ() {
        let a = RandomFingerprinter.visitor_id().await.unwrap();
        let b = RandomFingerprinter.visitor_id().await.unwrap();
        assert_ne!(a, b);
        assert_eq!(a.len(), 32);
    }

    #[tokio::test]
    async fn test_fixed_fingerprinter() {
        assert_eq!(
            FixedFingerprinter::new("abc123").visitor_id().await.unwrap(),
            "abc123"
        );
        assert!(matches!(
            FixedFingerprinter::failing("no canvas").visitor_id().await,
            Err(IdentityError::Fingerprint { .. })
        ));
    }
}
