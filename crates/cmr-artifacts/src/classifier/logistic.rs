use cmr_model::{ClassLabel, InferenceError, ScaledFeatureRecord};
use serde::{Deserialize, Serialize};

use super::{Classifier, check_width, dot, label_from_decision, validate_binary_classes};

const NAME: &str = "logistic regression";

/// Binary logistic regression; only the sign of the margin matters for `predict`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    pub classes: Vec<ClassLabel>,
    pub coef: Vec<f64>,
    pub intercept: f64,
}

impl LogisticRegression {
    pub fn decision_function(&self, features: &[f64]) -> f64 {
        dot(&self.coef, features) + self.intercept
    }

    /// Probability of the second class.
    pub fn predict_proba(&self, features: &[f64]) -> f64 {
        1.0 / (1.0 + (-self.decision_function(features)).exp())
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        validate_binary_classes(&self.classes)?;
        if self.coef.is_empty() {
            return Err("coef must not be empty".to_string());
        }
        Ok(())
    }
}

impl Classifier for LogisticRegression {
    fn n_features(&self) -> usize {
        self.coef.len()
    }

    fn predict(&self, features: &ScaledFeatureRecord) -> Result<ClassLabel, InferenceError> {
        check_width(NAME, self.n_features(), features)?;
        let decision = self.decision_function(features.as_slice());
        label_from_decision(NAME, &self.classes, decision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> LogisticRegression {
        LogisticRegression {
            classes: vec![ClassLabel::NEGATIVE, ClassLabel::POSITIVE],
            coef: vec![2.0, -1.0, 0.5],
            intercept: -0.25,
        }
    }

    #[test]
    fn sign_of_margin_selects_class() {
        let model = model();
        let positive = ScaledFeatureRecord::new(vec![1.0, 0.0, 0.0]);
        let negative = ScaledFeatureRecord::new(vec![0.0, 1.0, 0.0]);
        assert_eq!(model.predict(&positive).unwrap(), ClassLabel::POSITIVE);
        assert_eq!(model.predict(&negative).unwrap(), ClassLabel::NEGATIVE);
    }

    #[test]
    fn zero_margin_is_negative() {
        let model = LogisticRegression {
            intercept: 0.0,
            ..model()
        };
        let zero = ScaledFeatureRecord::new(vec![0.0, 0.0, 0.0]);
        assert_eq!(model.predict(&zero).unwrap(), ClassLabel::NEGATIVE);
        assert!((model.predict_proba(zero.as_slice()) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn width_mismatch_is_reported() {
        let err = model()
            .predict(&ScaledFeatureRecord::new(vec![1.0, 2.0]))
            .unwrap_err();
        assert_eq!(
            err,
            InferenceError::FeatureCount {
                model: NAME.to_string(),
                expected: 3,
                actual: 2,
            }
        );
    }

    #[test]
    fn validate_rejects_single_class() {
        let model = LogisticRegression {
            classes: vec![ClassLabel::POSITIVE],
            ..model()
        };
        assert!(model.validate().is_err());
    }
}
