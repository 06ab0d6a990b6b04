pub mod client;

pub use client::{IdentityBackend, IdentityClient, cancellable};
