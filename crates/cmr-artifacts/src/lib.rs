#![deny(unsafe_code)]

pub mod classifier;
pub mod error;
pub mod hash;
pub mod manifest;
pub mod paths;
pub mod registry;
pub mod report;
pub mod scaler;

pub use crate::classifier::{
    Classifier, ClassifierArtifact, DecisionTree, Kernel, LogisticRegression, RandomForest,
    SupportVectorClassifier,
};
pub use crate::error::ArtifactLoadError;
pub use crate::manifest::ArtifactManifest;
pub use crate::registry::{LoadSummary, ModelRegistry, RegisteredModel};
pub use crate::report::ArtifactReport;
pub use crate::scaler::StandardScaler;
