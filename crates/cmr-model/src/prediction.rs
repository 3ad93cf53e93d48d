use serde::{Deserialize, Serialize};

use crate::catalog::ModelKind;
use crate::label::{ClassLabel, Condition};

/// The two labels one model family produced for a patient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionLabels {
    pub prediabetes: ClassLabel,
    pub hypertension: ClassLabel,
}

impl ConditionLabels {
    pub fn get(&self, condition: Condition) -> ClassLabel {
        match condition {
            Condition::Prediabetes => self.prediabetes,
            Condition::Hypertension => self.hypertension,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelPrediction {
    pub model: ModelKind,
    #[serde(flatten)]
    pub labels: ConditionLabels,
}

/// Predictions for one request, keyed by model family.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PredictionResult {
    entries: Vec<ModelPrediction>,
}

impl PredictionResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the labels for `model`, replacing any earlier entry.
    pub fn insert(&mut self, model: ModelKind, labels: ConditionLabels) {
        match self.entries.iter_mut().find(|entry| entry.model == model) {
            Some(entry) => entry.labels = labels,
            None => self.entries.push(ModelPrediction { model, labels }),
        }
    }

    pub fn get(&self, model: ModelKind) -> Option<&ConditionLabels> {
        self.entries
            .iter()
            .find(|entry| entry.model == model)
            .map(|entry| &entry.labels)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModelPrediction> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
