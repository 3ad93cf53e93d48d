#![deny(unsafe_code)]

use crate::manifest::{MANIFEST_SCHEMA_VERSION, Pins};
use crate::registry::{LoadSummary, LoadedArtifact};

/// Machine-readable outcome of verifying an artifact directory.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ArtifactReport {
    pub schema: String,
    pub schema_version: u32,
    pub pins: Pins,
    pub artifacts: Vec<LoadedArtifact>,
    pub counts: ArtifactCounts,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct ArtifactCounts {
    pub files: usize,
    pub classifiers: usize,
    pub features: usize,
}

impl ArtifactReport {
    pub fn from_summary(summary: &LoadSummary) -> Self {
        let classifiers = summary
            .artifacts
            .iter()
            .filter(|artifact| artifact.kind != "standard_scaler")
            .count();
        Self {
            schema: "cmr.artifact-report".to_string(),
            schema_version: MANIFEST_SCHEMA_VERSION,
            pins: Pins {
                feature_order: summary.feature_order.clone(),
            },
            artifacts: summary.artifacts.clone(),
            counts: ArtifactCounts {
                files: summary.artifacts.len(),
                classifiers,
                features: summary.feature_order.len(),
            },
        }
    }
}
