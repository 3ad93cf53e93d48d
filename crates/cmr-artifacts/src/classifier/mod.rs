//! Fitted classifiers and the predict contract they share.
//!
//! Artifacts describe fitted parameters as JSON, tagged by `kind`:
//!
//! ```json
//! { "kind": "logistic_regression", "classes": [0, 1], "coef": [..], "intercept": 0.1 }
//! ```

#![deny(unsafe_code)]

mod forest;
mod logistic;
mod svm;

use cmr_model::{ClassLabel, InferenceError, ScaledFeatureRecord};
use serde::{Deserialize, Serialize};

pub use forest::{DecisionTree, RandomForest};
pub use logistic::LogisticRegression;
pub use svm::{Kernel, SupportVectorClassifier};

/// Anything that maps one scaled feature row to a class label.
pub trait Classifier: Send + Sync {
    /// Number of input columns the classifier was fitted on.
    fn n_features(&self) -> usize;

    fn predict(&self, features: &ScaledFeatureRecord) -> Result<ClassLabel, InferenceError>;
}

/// The on-disk form of a fitted classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierArtifact {
    LogisticRegression(LogisticRegression),
    SupportVectorMachine(SupportVectorClassifier),
    RandomForest(RandomForest),
}

impl ClassifierArtifact {
    pub fn kind_name(&self) -> &'static str {
        match self {
            ClassifierArtifact::LogisticRegression(_) => "logistic_regression",
            ClassifierArtifact::SupportVectorMachine(_) => "support_vector_machine",
            ClassifierArtifact::RandomForest(_) => "random_forest",
        }
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        match self {
            ClassifierArtifact::LogisticRegression(model) => model.validate(),
            ClassifierArtifact::SupportVectorMachine(model) => model.validate(),
            ClassifierArtifact::RandomForest(model) => model.validate(),
        }
    }

    fn inner(&self) -> &dyn Classifier {
        match self {
            ClassifierArtifact::LogisticRegression(model) => model,
            ClassifierArtifact::SupportVectorMachine(model) => model,
            ClassifierArtifact::RandomForest(model) => model,
        }
    }
}

impl Classifier for ClassifierArtifact {
    fn n_features(&self) -> usize {
        self.inner().n_features()
    }

    fn predict(&self, features: &ScaledFeatureRecord) -> Result<ClassLabel, InferenceError> {
        self.inner().predict(features)
    }
}

pub(crate) fn check_width(
    model: &str,
    expected: usize,
    features: &ScaledFeatureRecord,
) -> Result<(), InferenceError> {
    if features.len() != expected {
        return Err(InferenceError::FeatureCount {
            model: model.to_string(),
            expected,
            actual: features.len(),
        });
    }
    Ok(())
}

/// Binary decision: a positive margin selects the second class.
pub(crate) fn label_from_decision(
    model: &str,
    classes: &[ClassLabel],
    decision: f64,
) -> Result<ClassLabel, InferenceError> {
    if !decision.is_finite() {
        return Err(InferenceError::NonFinite {
            model: model.to_string(),
        });
    }
    class_at(model, classes, usize::from(decision > 0.0))
}

pub(crate) fn class_at(
    model: &str,
    classes: &[ClassLabel],
    index: usize,
) -> Result<ClassLabel, InferenceError> {
    classes
        .get(index)
        .copied()
        .ok_or_else(|| InferenceError::MissingClass {
            model: model.to_string(),
            index,
        })
}

pub(crate) fn validate_binary_classes(classes: &[ClassLabel]) -> Result<(), String> {
    if classes.len() != 2 {
        return Err(format!("expected 2 classes, found {}", classes.len()));
    }
    if classes[0] == classes[1] {
        return Err(format!("duplicate class label {}", classes[0]));
    }
    Ok(())
}

pub(crate) fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
