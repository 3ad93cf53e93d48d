//! The fixed set of model families and where their artifacts live.
//!
//! Artifact names are listed explicitly rather than derived from display
//! names at runtime.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::label::Condition;

/// File name of the shared feature scaler.
pub const SCALER_ARTIFACT: &str = "scaler.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ModelKind {
    #[serde(rename = "Logistic Regression")]
    LogisticRegression,
    #[serde(rename = "Support Vector Machine")]
    SupportVectorMachine,
    #[serde(rename = "Random Forest")]
    RandomForest,
}

impl ModelKind {
    pub const ALL: [ModelKind; 3] = [
        ModelKind::LogisticRegression,
        ModelKind::SupportVectorMachine,
        ModelKind::RandomForest,
    ];

    pub fn entry(self) -> &'static ModelEntry {
        match self {
            ModelKind::LogisticRegression => &MODEL_TABLE[0],
            ModelKind::SupportVectorMachine => &MODEL_TABLE[1],
            ModelKind::RandomForest => &MODEL_TABLE[2],
        }
    }

    pub fn display_name(self) -> &'static str {
        self.entry().display_name
    }

    /// Stable identifier used in manifest roles.
    pub fn key(self) -> &'static str {
        self.entry().key
    }

    pub fn artifact(self, condition: Condition) -> &'static str {
        let entry = self.entry();
        match condition {
            Condition::Prediabetes => entry.prediabetes_artifact,
            Condition::Hypertension => entry.hypertension_artifact,
        }
    }

    pub fn from_display_name(name: &str) -> Option<Self> {
        MODEL_TABLE
            .iter()
            .find(|entry| entry.display_name == name)
            .map(|entry| entry.kind)
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelEntry {
    pub kind: ModelKind,
    pub display_name: &'static str,
    pub key: &'static str,
    pub prediabetes_artifact: &'static str,
    pub hypertension_artifact: &'static str,
}

pub const MODEL_TABLE: [ModelEntry; 3] = [
    ModelEntry {
        kind: ModelKind::LogisticRegression,
        display_name: "Logistic Regression",
        key: "logistic_regression",
        prediabetes_artifact: "logistic_regression_model.json",
        hypertension_artifact: "logistic_regression_hypertension_model.json",
    },
    ModelEntry {
        kind: ModelKind::SupportVectorMachine,
        display_name: "Support Vector Machine",
        key: "support_vector_machine",
        prediabetes_artifact: "support_vector_machine_model.json",
        hypertension_artifact: "support_vector_machine_hypertension_model.json",
    },
    ModelEntry {
        kind: ModelKind::RandomForest,
        display_name: "Random Forest",
        key: "random_forest",
        prediabetes_artifact: "random_forest_model.json",
        hypertension_artifact: "random_forest_hypertension_model.json",
    },
];
