//! Prelude module for convenient imports
//!
//! Use `use device_identity::prelude::*;` to import commonly used types

// Core types
pub use crate::core::{Activation, IdentityResolver, ProcessState, Snapshot, render};

// Protocol types
pub use crate::protocol::{DEFAULT_API_BASE_URL, DEVICE_ID_KEY, DeviceId, IdentityRecord};

// Collaborators
pub use crate::client::{IdentityBackend, IdentityClient};
pub use crate::crypto::{Fingerprinter, HostFingerprinter, RandomFingerprinter};
pub use crate::storage::{JsonFileStore, KeyValueStore, MemoryStore};

// Configuration
pub use crate::config::{FingerprintSource, ResolverConfig};

// Error handling
pub use crate::error::{IdentityError, Result};
