//! Artifact directory path resolution.

use std::path::PathBuf;

/// Environment variable for overriding the artifact directory.
pub const ARTIFACTS_ENV_VAR: &str = "CMR_ARTIFACTS_DIR";

/// Directory used when neither a flag nor the environment names one.
pub const DEFAULT_ARTIFACTS_DIR: &str = "artifacts";

/// Get the artifact directory.
///
/// Resolution order:
/// 1. explicit path (e.g. a CLI flag)
/// 2. `CMR_ARTIFACTS_DIR` environment variable
/// 3. `artifacts/` relative to the working directory
pub fn artifacts_root(explicit: Option<PathBuf>) -> PathBuf {
    if let Some(path) = explicit {
        return path;
    }
    match std::env::var(ARTIFACTS_ENV_VAR) {
        Ok(root) if !root.trim().is_empty() => PathBuf::from(root),
        _ => PathBuf::from(DEFAULT_ARTIFACTS_DIR),
    }
}

/// Artifacts bundled with the workspace, used by tests and local runs.
pub fn bundled_artifacts_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../artifacts")
}
