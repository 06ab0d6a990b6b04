use sha2::Digest;

/// Compute SHA-256 hash of bytes
pub fn sha256_from_bytes(data: &[u8]) -> String {
    let hash = sha2::Sha256::digest(data);
    format!("{:x}", hash)
}
