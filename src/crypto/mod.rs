pub mod fingerprint;
pub mod hash;

pub use fingerprint::{
    FixedFingerprinter, Fingerprinter, HostFingerprinter, HostSignals, RandomFingerprinter,
    VISITOR_ID_LEN,
};
pub use hash::sha256_from_bytes;
