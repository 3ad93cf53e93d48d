#![deny(unsafe_code)]

use std::path::Path;

use sha2::Digest;

use crate::error::ArtifactLoadError;

pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(sha2::Sha256::digest(bytes))
}

/// Hash a file on disk, reporting a missing file distinctly from other I/O errors.
pub fn sha256_file(path: &Path) -> Result<String, ArtifactLoadError> {
    let bytes = std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ArtifactLoadError::MissingFile {
                path: path.to_path_buf(),
            }
        } else {
            ArtifactLoadError::io(path, e)
        }
    })?;
    Ok(sha256_hex(&bytes))
}
