//! SHA-256 fingerprints of raw store bytes.

use std::path::Path;

use sha2::{Digest, Sha256};

use crate::StoreError;

/// Fingerprint of zero bytes; what an absent backing file reports.
pub const EMPTY_FINGERPRINT: &str =
    "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

/// Lowercase hex SHA-256 of `data`.
pub fn fingerprint_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

/// Fingerprint the raw bytes at `path`. An absent file hashes as empty.
pub fn fingerprint_file(path: &Path) -> Result<String, StoreError> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(fingerprint_bytes(&bytes)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(EMPTY_FINGERPRINT.to_string()),
        Err(e) => Err(StoreError::io(path, e)),
    }
}
