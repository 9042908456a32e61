//! PCH artifact naming.
//!
//! Artifacts are content-addressed by the SHA-256 hex digest of the header
//! path bytes, so a header always maps to the same file in the store and two
//! distinct headers never collide in practice.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

/// Lowercase 64-character hex digest of the path bytes.
pub fn path_digest(path: &Path) -> String {
    hex::encode(Sha256::digest(path.to_string_lossy().as_bytes()))
}

/// Where the PCH produced from `header` lives inside `store_dir`.
pub fn pch_artifact_path(store_dir: &Path, header: &Path) -> PathBuf {
    store_dir.join(path_digest(header))
}
