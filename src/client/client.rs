use crate::error::{IdentityError, Result};
use crate::protocol::{
    CreateIdentityRequest, DeviceId, IdentityRecord, creation_failure_message, parse_exists_flag,
    parse_identity_record,
};
use async_trait::async_trait;
use reqwest::{Client as HttpClient, Url};
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Remote identity service as seen by the resolver.
///
/// Every call takes the activation's cancellation token and must resolve to
/// `IdentityError::Cancelled` once that token fires.
#[async_trait]
pub trait IdentityBackend: Send + Sync {
    async fn device_exists(
        &self,
        device_id: &DeviceId,
        token: &CancellationToken,
    ) -> Result<bool>;

    async fn fetch_identity(
        &self,
        device_id: &DeviceId,
        token: &CancellationToken,
    ) -> Result<IdentityRecord>;

    async fn create_identity(
        &self,
        device_id: &DeviceId,
        token: &CancellationToken,
    ) -> Result<IdentityRecord>;
}

/// Race a request against the cancellation token
pub async fn cancellable<T, F>(token: &CancellationToken, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(IdentityError::Cancelled),
        result = fut => result,
    }
}

/// HTTP client for the identity service
#[derive(Clone, Debug)]
pub struct IdentityClient {
    client: HttpClient,
    base_url: Url,
}

impl IdentityClient {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, None)
    }

    /// Build a client whose requests give up after `timeout`
    pub fn with_timeout(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| IdentityError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(IdentityError::InvalidUrl(base_url.to_string()));
        }

        let mut builder = HttpClient::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append percent-encoded path segments to the base URL
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| IdentityError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_device_exists(&self, device_id: &DeviceId) -> Result<bool> {
        let url = self.endpoint(&["device-exists", device_id.as_str()])?;
        tracing::debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(IdentityError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        parse_exists_flag(&bytes)
    }

    async fn get_identity(&self, device_id: &DeviceId) -> Result<IdentityRecord> {
        let url = self.endpoint(&["device", device_id.as_str()])?;
        tracing::debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(IdentityError::FetchFailed {
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        parse_identity_record(&bytes)
    }

    async fn post_identity(&self, device_id: &DeviceId) -> Result<IdentityRecord> {
        let request = CreateIdentityRequest {
            device_id: device_id.to_string(),
        };
        tracing::debug!("POST {}", self.base_url);

        let response = self
            .client
            .post(self.base_url.clone())
            .json(&request)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            // The failure body is optional; an unreadable one gets the generic message
            let body = response.bytes().await.unwrap_or_default();
            return Err(IdentityError::creation_failed(
                status.as_u16(),
                creation_failure_message(&body),
            ));
        }

        let bytes = response.bytes().await?;
        parse_identity_record(&bytes)
    }
}

#[async_trait]
impl IdentityBackend for IdentityClient {
    async fn device_exists(
        &self,
        device_id: &DeviceId,
        token: &CancellationToken,
    ) -> Result<bool> {
        cancellable(token, self.get_device_exists(device_id)).await
    }

    async fn fetch_identity(
        &self,
        device_id: &DeviceId,
        token: &CancellationToken,
    ) -> Result<IdentityRecord> {
        cancellable(token, self.get_identity(device_id)).await
    }

    async fn create_identity(
        &self,
        device_id: &DeviceId,
        token: &CancellationToken,
    ) -> Result<IdentityRecord> {
        cancellable(token, self.post_identity(device_id)).await
    }
}
