#![deny(unsafe_code)]

use cmr_model::{FEATURE_COUNT, FEATURE_ORDER, FeatureRecord, ScaledFeatureRecord};
use serde::{Deserialize, Serialize};

/// Fitted standardisation: `(x - mean) / scale`, column by column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename = "standard_scaler")]
pub struct StandardScaler {
    /// Column names recorded when the scaler was fitted.
    pub feature_names: Vec<String>,
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.mean.len() != FEATURE_COUNT || self.scale.len() != FEATURE_COUNT {
            return Err(format!(
                "expected {FEATURE_COUNT} mean/scale values, found {}/{}",
                self.mean.len(),
                self.scale.len()
            ));
        }
        if self
            .mean
            .iter()
            .chain(&self.scale)
            .any(|value| !value.is_finite())
        {
            return Err("mean and scale must be finite".to_string());
        }
        Ok(())
    }

    /// Whether the recorded column names match the row order used at runtime.
    pub fn matches_feature_order(&self) -> bool {
        self.feature_names.iter().map(String::as_str).eq(FEATURE_ORDER)
    }

    pub fn transform(&self, record: &FeatureRecord) -> ScaledFeatureRecord {
        self.transform_row(&record.to_row())
    }

    /// Scale a raw row in whatever order it is given; no names are checked.
    pub fn transform_row(&self, row: &[f64]) -> ScaledFeatureRecord {
        let values = row
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(value, (mean, scale))| {
                // Constant columns are fitted with a zero scale.
                let scale = if *scale == 0.0 { 1.0 } else { *scale };
                (value - mean) / scale
            })
            .collect();
        ScaledFeatureRecord::new(values)
    }
}
