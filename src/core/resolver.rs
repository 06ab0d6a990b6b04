use crate::client::IdentityBackend;
use crate::core::state::ProcessState;
use crate::core::view::Snapshot;
use crate::crypto::Fingerprinter;
use crate::error::{IdentityError, Result};
use crate::protocol::{DEVICE_ID_KEY, DeviceId, IdentityRecord, validate_identity_record};
use crate::storage::KeyValueStore;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Resolves the identity of this installation against the backend.
///
/// Each [`activate`](Self::activate) runs the whole sequence once:
/// obtain the device id, check whether the backend knows it, then fetch or
/// create the record.
pub struct IdentityResolver<B, F, S> {
    backend: Arc<B>,
    fingerprinter: Arc<F>,
    store: Arc<S>,
}

impl<B, F, S> Clone for IdentityResolver<B, F, S> {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
            fingerprinter: self.fingerprinter.clone(),
            store: self.store.clone(),
        }
    }
}

impl<B, F, S> IdentityResolver<B, F, S>
where
    B: IdentityBackend + 'static,
    F: Fingerprinter + 'static,
    S: KeyValueStore + 'static,
{
    pub fn new(backend: Arc<B>, fingerprinter: Arc<F>, store: Arc<S>) -> Self {
        Self {
            backend,
            fingerprinter,
            store,
        }
    }

    /// Start a run on the tokio runtime.
    ///
    /// The returned handle owns the run's cancellation token; dropping it or
    /// calling [`Activation::deactivate`] abandons the run.
    pub fn activate(&self) -> Activation {
        let token = CancellationToken::new();
        let (publisher, receiver) = watch::channel(Snapshot::default());

        let resolver = self.clone();
        let task_token = token.clone();
        let handle = tokio::spawn(async move {
            resolver.run(&task_token, &publisher).await;
        });

        Activation {
            token,
            receiver,
            handle: Some(handle),
        }
    }

    /// Run the sequence in the current task, publishing every phase
    pub async fn run(&self, token: &CancellationToken, publisher: &watch::Sender<Snapshot>) {
        let progress = Progress { token, publisher };

        match self.resolve(&progress).await {
            Ok(()) => {}
            Err(e) if e.is_cancelled() || token.is_cancelled() => {
                tracing::debug!("Identity resolution abandoned: {}", e);
            }
            Err(e) => {
                tracing::error!(status = ?e.status(), "Device processing error: {}", e);
                progress.fail(e.to_string());
            }
        }
    }

    async fn resolve(&self, progress: &Progress<'_>) -> Result<()> {
        let device_id = self.obtain_device_id(progress).await?;

        progress.advance(ProcessState::Checking)?;
        let exists = self
            .backend
            .device_exists(&device_id, progress.token)
            .await?;
        progress.ensure_active()?;

        let record = if exists {
            progress.advance(ProcessState::Fetching)?;
            self.backend
                .fetch_identity(&device_id, progress.token)
                .await?
        } else {
            progress.advance(ProcessState::Creating)?;
            self.backend
                .create_identity(&device_id, progress.token)
                .await?
        };
        progress.ensure_active()?;

        validate_identity_record(&record)?;
        tracing::info!(
            "Resolved identity for device {} ({})",
            record.device_id,
            if exists { "existing" } else { "created" }
        );
        progress.succeed(record)
    }

    /// Read the stored id, or fingerprint the host and persist the result
    async fn obtain_device_id(&self, progress: &Progress<'_>) -> Result<DeviceId> {
        let stored = self.store.get(DEVICE_ID_KEY).await?;
        progress.ensure_active()?;

        if let Some(stored) = stored {
            match DeviceId::new(stored) {
                Ok(device_id) => {
                    tracing::debug!("Using stored device id {}", device_id);
                    return Ok(device_id);
                }
                Err(_) => tracing::warn!("Stored device id is blank, generating a new one"),
            }
        }

        progress.advance(ProcessState::Generating)?;
        let visitor_id = self.fingerprinter.visitor_id().await?;
        let device_id = DeviceId::new(visitor_id)?;

        // Persisted even if the run was abandoned meanwhile; the id stays valid
        self.store.set(DEVICE_ID_KEY, device_id.as_str()).await?;
        tracing::info!("Generated device id {}", device_id);
        progress.ensure_active()?;

        Ok(device_id)
    }
}

/// Publishes phase changes for one run, refusing to once it is cancelled
struct Progress<'a> {
    token: &'a CancellationToken,
    publisher: &'a watch::Sender<Snapshot>,
}

impl Progress<'_> {
    fn ensure_active(&self) -> Result<()> {
        if self.token.is_cancelled() {
            Err(IdentityError::Cancelled)
        } else {
            Ok(())
        }
    }

    fn next_state(&self, next: ProcessState) -> Result<ProcessState> {
        self.ensure_active()?;
        let current = self.publisher.borrow().state;
        current.transition(next)
    }

    fn advance(&self, next: ProcessState) -> Result<()> {
        let next = self.next_state(next)?;
        tracing::debug!("Identity resolution: {}", next);
        self.publisher.send_modify(|snapshot| snapshot.state = next);
        Ok(())
    }

    fn succeed(&self, record: IdentityRecord) -> Result<()> {
        let next = self.next_state(ProcessState::Success)?;
        self.publisher.send_modify(|snapshot| {
            snapshot.state = next;
            snapshot.record = Some(record);
        });
        Ok(())
    }

    fn fail(&self, message: String) {
        match self.next_state(ProcessState::Error) {
            Ok(next) => self.publisher.send_modify(|snapshot| {
                snapshot.state = next;
                snapshot.error = Some(message);
            }),
            Err(e) => tracing::debug!("Not publishing failure: {}", e),
        }
    }
}

/// Handle to one running resolution
pub struct Activation {
    token: CancellationToken,
    receiver: watch::Receiver<Snapshot>,
    handle: Option<JoinHandle<()>>,
}

impl Activation {
    /// Receiver that observes every published snapshot
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.receiver.clone()
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> Snapshot {
        self.receiver.borrow().clone()
    }

    pub fn is_active(&self) -> bool {
        !self.token.is_cancelled()
    }

    /// Abandon the run. In-flight requests are dropped and nothing more is
    /// published.
    pub fn deactivate(&self) {
        self.token.cancel();
    }

    /// Wait for the run to end and return its last snapshot
    pub async fn wait(mut self) -> Snapshot {
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                tracing::warn!("Identity resolution task ended abnormally: {}", e);
            }
        }
        self.snapshot()
    }
}

impl Drop for Activation {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
