pub mod client;
pub mod config;
pub mod core;
pub mod crypto;
pub mod error;
pub mod protocol;
pub mod storage;
pub mod prelude;

pub use client::{IdentityBackend, IdentityClient, cancellable};
pub use config::{DefaultResolver, FingerprintSource, ResolverConfig};
pub use core::{Activation, IdentityResolver, ProcessState, Snapshot, render};
pub use crypto::{
    FixedFingerprinter, Fingerprinter, HostFingerprinter, RandomFingerprinter, sha256_from_bytes,
};
pub use error::{IdentityError, Result};
pub use protocol::{
    CREATION_FAILED_MESSAGE, CreateIdentityRequest, DEFAULT_API_BASE_URL, DEVICE_ID_KEY, DeviceId,
    ErrorBody, IdentityRecord,
};
pub use storage::{FileSystem, JsonFileStore, KeyValueStore, MemoryStore, TokioFileSystem};

#[cfg(feature = "cli")]
pub mod cli;
