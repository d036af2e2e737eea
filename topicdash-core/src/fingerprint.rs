//! Input fingerprints: BLAKE3 digests identifying exactly which files a
//! dashboard session was built from.

use std::path::{Path, PathBuf};

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceFingerprint {
    /// Role of the input (`topics`, `cpm`, ...).
    pub role: String,
    pub path: PathBuf,
    pub bytes: u64,
    /// Lowercase hex BLAKE3 digest.
    pub digest: String,
}

impl SourceFingerprint {
    pub fn of_bytes(role: &str, path: &Path, data: &[u8]) -> Self {
        Self {
            role: role.to_string(),
            path: path.to_path_buf(),
            bytes: data.len() as u64,
            digest: blake3::hash(data).to_hex().to_string(),
        }
    }

    /// First 12 hex digits, for log lines and status bars.
    pub fn short(&self) -> &str {
        &self.digest[..12.min(self.digest.len())]
    }
}
