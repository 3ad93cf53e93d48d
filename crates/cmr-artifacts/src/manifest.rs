#![deny(unsafe_code)]

use std::path::Path;

use cmr_model::{Condition, FEATURE_ORDER, ModelKind, SCALER_ARTIFACT};
use serde::{Deserialize, Serialize};

use crate::error::ArtifactLoadError;
use crate::hash::sha256_file;

pub const MANIFEST_FILE: &str = "manifest.toml";
pub const MANIFEST_SCHEMA: &str = "cmr.artifact-manifest";
pub const MANIFEST_SCHEMA_VERSION: u32 = 1;

pub const SCALER_ROLE: &str = "scaler";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactManifest {
    pub manifest: ManifestHeader,
    #[serde(default)]
    pub notes: Option<ManifestNotes>,
    pub pins: Pins,
    pub files: Vec<ManifestFile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestHeader {
    pub schema: String,
    pub schema_version: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestNotes {
    pub summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pins {
    /// Column order the artifacts were fitted with.
    pub feature_order: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestFile {
    pub path: String,
    pub sha256: String,
    pub role: String,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Manifest role of the classifier for `kind` and `condition`.
pub fn classifier_role(kind: ModelKind, condition: Condition) -> String {
    format!("{}/{}", condition.as_str(), kind.key())
}

/// Every role a complete artifact set provides, paired with its default file name.
pub fn required_roles() -> Vec<(String, &'static str)> {
    let mut roles = vec![(SCALER_ROLE.to_string(), SCALER_ARTIFACT)];
    for condition in Condition::ALL {
        for kind in ModelKind::ALL {
            roles.push((classifier_role(kind, condition), kind.artifact(condition)));
        }
    }
    roles
}

impl ArtifactManifest {
    pub fn load(path: &Path) -> Result<Self, ArtifactLoadError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ArtifactLoadError::io(path, e))?;
        toml::from_str(&contents).map_err(|e| ArtifactLoadError::Toml {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Build a manifest for a directory holding the default artifact file names.
    pub fn generate(artifacts_dir: &Path) -> Result<Self, ArtifactLoadError> {
        let mut files = Vec::new();
        for (role, file_name) in required_roles() {
            let sha256 = sha256_file(&artifacts_dir.join(file_name))?;
            files.push(ManifestFile {
                path: file_name.to_string(),
                sha256,
                role,
                notes: None,
            });
        }
        Ok(Self {
            manifest: ManifestHeader {
                schema: MANIFEST_SCHEMA.to_string(),
                schema_version: MANIFEST_SCHEMA_VERSION,
            },
            notes: None,
            pins: Pins {
                feature_order: FEATURE_ORDER.iter().map(ToString::to_string).collect(),
            },
            files,
        })
    }

    pub fn to_toml(&self) -> Result<String, ArtifactLoadError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write `manifest.toml` into `artifacts_dir`.
    pub fn write(&self, artifacts_dir: &Path) -> Result<(), ArtifactLoadError> {
        let path = artifacts_dir.join(MANIFEST_FILE);
        std::fs::write(&path, self.to_toml()?).map_err(|e| ArtifactLoadError::io(path, e))
    }

    pub fn file_for_role(&self, role: &str) -> Result<&ManifestFile, ArtifactLoadError> {
        self.files
            .iter()
            .find(|file| file.role == role)
            .ok_or_else(|| ArtifactLoadError::MissingRole {
                role: role.to_string(),
            })
    }
}
