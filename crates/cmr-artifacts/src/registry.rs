#![deny(unsafe_code)]

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Component, Path, PathBuf};

use cmr_model::{Condition, FEATURE_ORDER, ModelKind};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::classifier::{Classifier, ClassifierArtifact};
use crate::error::ArtifactLoadError;
use crate::hash::sha256_file;
use crate::manifest::{
    ArtifactManifest, MANIFEST_FILE, MANIFEST_SCHEMA, MANIFEST_SCHEMA_VERSION, SCALER_ROLE,
    classifier_role, required_roles,
};
use crate::scaler::StandardScaler;

/// The prediabetes and hypertension classifiers of one model family.
pub struct RegisteredModel {
    pub kind: ModelKind,
    pub prediabetes: Box<dyn Classifier>,
    pub hypertension: Box<dyn Classifier>,
}

impl RegisteredModel {
    pub fn new(
        kind: ModelKind,
        prediabetes: Box<dyn Classifier>,
        hypertension: Box<dyn Classifier>,
    ) -> Self {
        Self {
            kind,
            prediabetes,
            hypertension,
        }
    }

    pub fn classifier(&self, condition: Condition) -> &dyn Classifier {
        match condition {
            Condition::Prediabetes => self.prediabetes.as_ref(),
            Condition::Hypertension => self.hypertension.as_ref(),
        }
    }
}

impl fmt::Debug for RegisteredModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredModel")
            .field("kind", &self.kind)
            .field("n_features", &self.prediabetes.n_features())
            .finish_non_exhaustive()
    }
}

/// The scaler and all classifiers, loaded once and never mutated.
#[derive(Debug)]
pub struct ModelRegistry {
    scaler: StandardScaler,
    models: Vec<RegisteredModel>,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct LoadedArtifact {
    pub role: String,
    pub path: String,
    pub sha256: String,
    pub kind: String,
    pub n_features: usize,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct LoadSummary {
    pub artifacts_dir: PathBuf,
    pub feature_order: Vec<String>,
    pub artifacts: Vec<LoadedArtifact>,
}

impl ModelRegistry {
    /// Assemble a registry from already constructed parts.
    ///
    /// Every model family must appear exactly once; models are kept in table
    /// order regardless of the order given.
    pub fn from_parts(
        scaler: StandardScaler,
        models: Vec<RegisteredModel>,
    ) -> Result<Self, ArtifactLoadError> {
        let mut seen = BTreeSet::new();
        for model in &models {
            if !seen.insert(model.kind) {
                return Err(ArtifactLoadError::DuplicateRole {
                    role: model.kind.key().to_string(),
                });
            }
        }
        if let Some(kind) = ModelKind::ALL.into_iter().find(|kind| !seen.contains(kind)) {
            return Err(ArtifactLoadError::MissingRole {
                role: kind.key().to_string(),
            });
        }
        let mut models = models;
        models.sort_by_key(|model| model.kind);
        Ok(Self { scaler, models })
    }

    /// Verify the manifest under `artifacts_dir` and load every artifact it lists.
    pub fn load(artifacts_dir: &Path) -> Result<(Self, LoadSummary), ArtifactLoadError> {
        let manifest = ArtifactManifest::load(&artifacts_dir.join(MANIFEST_FILE))?;
        validate_manifest(&manifest)?;

        let mut artifacts = Vec::new();

        let scaler_file = manifest.file_for_role(SCALER_ROLE)?;
        let scaler_path = verify_file(artifacts_dir, &scaler_file.path, &scaler_file.sha256)?;
        let scaler: StandardScaler = read_json(&scaler_path)?;
        scaler
            .validate()
            .map_err(|message| ArtifactLoadError::invalid(&scaler_path, message))?;
        if !scaler.matches_feature_order() {
            return Err(ArtifactLoadError::FeatureOrder {
                path: scaler_path,
                expected: FEATURE_ORDER.iter().map(ToString::to_string).collect(),
                actual: scaler.feature_names.clone(),
            });
        }
        debug!(path = %scaler_path.display(), "loaded scaler");
        artifacts.push(LoadedArtifact {
            role: SCALER_ROLE.to_string(),
            path: scaler_file.path.clone(),
            sha256: scaler_file.sha256.to_ascii_lowercase(),
            kind: "standard_scaler".to_string(),
            n_features: scaler.n_features(),
        });

        let mut models = Vec::new();
        for kind in ModelKind::ALL {
            let mut load = |condition: Condition| -> Result<ClassifierArtifact, ArtifactLoadError> {
                let role = classifier_role(kind, condition);
                let file = manifest.file_for_role(&role)?;
                let path = verify_file(artifacts_dir, &file.path, &file.sha256)?;
                let classifier = load_classifier(&path, &role, kind, scaler.n_features())?;
                debug!(role = %role, path = %path.display(), "loaded classifier");
                artifacts.push(LoadedArtifact {
                    role,
                    path: file.path.clone(),
                    sha256: file.sha256.to_ascii_lowercase(),
                    kind: classifier.kind_name().to_string(),
                    n_features: classifier.n_features(),
                });
                Ok(classifier)
            };
            let prediabetes = load(Condition::Prediabetes)?;
            let hypertension = load(Condition::Hypertension)?;
            models.push(RegisteredModel::new(
                kind,
                Box::new(prediabetes),
                Box::new(hypertension),
            ));
        }

        let registry = Self::from_parts(scaler, models)?;
        info!(
            artifacts = artifacts.len(),
            dir = %artifacts_dir.display(),
            "model registry loaded"
        );
        let summary = LoadSummary {
            artifacts_dir: artifacts_dir.to_path_buf(),
            feature_order: manifest.pins.feature_order.clone(),
            artifacts,
        };
        Ok((registry, summary))
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    pub fn models(&self) -> &[RegisteredModel] {
        &self.models
    }

    pub fn model(&self, kind: ModelKind) -> Option<&RegisteredModel> {
        self.models.iter().find(|model| model.kind == kind)
    }
}

fn load_classifier(
    path: &Path,
    role: &str,
    kind: ModelKind,
    scaler_width: usize,
) -> Result<ClassifierArtifact, ArtifactLoadError> {
    let classifier: ClassifierArtifact = read_json(path)?;
    if classifier.kind_name() != kind.key() {
        return Err(ArtifactLoadError::KindMismatch {
            path: path.to_path_buf(),
            role: role.to_string(),
            expected: kind.key(),
            actual: classifier.kind_name(),
        });
    }
    classifier
        .validate()
        .map_err(|message| ArtifactLoadError::invalid(path, message))?;
    if classifier.n_features() != scaler_width {
        return Err(ArtifactLoadError::FeatureCount {
            path: path.to_path_buf(),
            expected: scaler_width,
            actual: classifier.n_features(),
        });
    }
    Ok(classifier)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactLoadError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ArtifactLoadError::io(path, e))?;
    serde_json::from_str(&contents).map_err(|e| ArtifactLoadError::Json {
        path: path.to_path_buf(),
        source: e,
    })
}

fn validate_manifest(manifest: &ArtifactManifest) -> Result<(), ArtifactLoadError> {
    if manifest.manifest.schema != MANIFEST_SCHEMA {
        return Err(ArtifactLoadError::InvalidManifest {
            message: format!("unsupported schema: {}", manifest.manifest.schema),
        });
    }
    if manifest.manifest.schema_version != MANIFEST_SCHEMA_VERSION {
        return Err(ArtifactLoadError::InvalidManifest {
            message: format!(
                "unsupported schema_version: {}",
                manifest.manifest.schema_version
            ),
        });
    }
    if !manifest.pins.feature_order.iter().map(String::as_str).eq(FEATURE_ORDER) {
        return Err(ArtifactLoadError::FeatureOrder {
            path: PathBuf::from(MANIFEST_FILE),
            expected: FEATURE_ORDER.iter().map(ToString::to_string).collect(),
            actual: manifest.pins.feature_order.clone(),
        });
    }

    let known: BTreeSet<String> = required_roles().into_iter().map(|(role, _)| role).collect();
    let mut roles: BTreeSet<&str> = BTreeSet::new();
    for file in &manifest.files {
        if !known.contains(&file.role) {
            return Err(ArtifactLoadError::UnknownRole {
                role: file.role.clone(),
            });
        }
        if !roles.insert(file.role.as_str()) {
            return Err(ArtifactLoadError::DuplicateRole {
                role: file.role.clone(),
            });
        }
        validate_sha(&file.sha256, &file.path)?;
        validate_path(&file.path)?;
    }

    for role in &known {
        if !roles.contains(role.as_str()) {
            return Err(ArtifactLoadError::MissingRole { role: role.clone() });
        }
    }
    Ok(())
}

fn verify_file(
    artifacts_dir: &Path,
    relative: &str,
    expected: &str,
) -> Result<PathBuf, ArtifactLoadError> {
    let full_path = artifacts_dir.join(relative);
    let actual = sha256_file(&full_path)?;
    let expected = expected.to_ascii_lowercase();
    if actual != expected {
        return Err(ArtifactLoadError::Sha256Mismatch {
            path: full_path,
            expected,
            actual,
        });
    }
    Ok(full_path)
}

fn validate_sha(sha: &str, path: &str) -> Result<(), ArtifactLoadError> {
    if sha.len() != 64 || !sha.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ArtifactLoadError::InvalidSha256 {
            path: PathBuf::from(path),
            message: "sha256 must be 64 hex characters".to_string(),
        });
    }
    Ok(())
}

fn validate_path(path: &str) -> Result<(), ArtifactLoadError> {
    if path.contains('\\') {
        return Err(ArtifactLoadError::InvalidPath {
            path: PathBuf::from(path),
            message: "manifest path must use '/' separators".to_string(),
        });
    }
    let p = Path::new(path);
    if p.is_absolute() {
        return Err(ArtifactLoadError::InvalidPath {
            path: p.to_path_buf(),
            message: "manifest path must be relative".to_string(),
        });
    }
    if p.components().any(|c| matches!(c, Component::ParentDir)) {
        return Err(ArtifactLoadError::InvalidPath {
            path: p.to_path_buf(),
            message: "manifest path must stay inside the artifact directory".to_string(),
        });
    }
    Ok(())
}
