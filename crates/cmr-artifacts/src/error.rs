#![deny(unsafe_code)]

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ArtifactLoadError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML manifest {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize manifest: {0}")]
    TomlWrite(#[from] toml::ser::Error),

    #[error("failed to parse artifact {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid manifest: {message}")]
    InvalidManifest { message: String },

    #[error("missing required role in manifest: {role}")]
    MissingRole { role: String },

    #[error("duplicate role in manifest: {role}")]
    DuplicateRole { role: String },

    #[error("unknown role in manifest: {role}")]
    UnknownRole { role: String },

    #[error("invalid sha256 for {path}: {message}")]
    InvalidSha256 { path: PathBuf, message: String },

    #[error("invalid manifest path {path}: {message}")]
    InvalidPath { path: PathBuf, message: String },

    #[error("missing artifact listed in manifest: {path}")]
    MissingFile { path: PathBuf },

    #[error("sha256 mismatch for {path} (expected {expected}, got {actual})")]
    Sha256Mismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("artifact {path} has kind `{actual}` but role {role} requires `{expected}`")]
    KindMismatch {
        path: PathBuf,
        role: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("invalid artifact {path}: {message}")]
    InvalidArtifact { path: PathBuf, message: String },

    #[error("feature order mismatch in {path}: expected {expected:?}, found {actual:?}")]
    FeatureOrder {
        path: PathBuf,
        expected: Vec<String>,
        actual: Vec<String>,
    },

    #[error("{path} expects {actual} features but the scaler produces {expected}")]
    FeatureCount {
        path: PathBuf,
        expected: usize,
        actual: usize,
    },
}

impl ArtifactLoadError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::InvalidArtifact {
            path: path.into(),
            message: message.into(),
        }
    }
}
