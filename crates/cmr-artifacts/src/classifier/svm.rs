//! Kernel support vector classifier.
//!
//! Decision function for a binary problem:
//!
//! - `f(x) = Σ dual_coefᵢ · K(svᵢ, x) + intercept`
//! - `f(x) > 0` selects `classes[1]`

use cmr_model::{ClassLabel, InferenceError, ScaledFeatureRecord};
use serde::{Deserialize, Serialize};

use super::{Classifier, check_width, dot, label_from_decision, validate_binary_classes};

const NAME: &str = "support vector machine";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Kernel {
    Linear,
    /// `exp(-γ‖x - y‖²)`
    Rbf { gamma: f64 },
    /// `(γ⟨x, y⟩ + coef0)^degree`
    Poly { gamma: f64, coef0: f64, degree: u32 },
    /// `tanh(γ⟨x, y⟩ + coef0)`
    Sigmoid { gamma: f64, coef0: f64 },
}

impl Kernel {
    #[inline]
    pub fn apply(&self, x: &[f64], y: &[f64]) -> f64 {
        match *self {
            Kernel::Linear => dot(x, y),
            Kernel::Rbf { gamma } => {
                let distance: f64 = x.iter().zip(y).map(|(a, b)| (a - b) * (a - b)).sum();
                (-gamma * distance).exp()
            }
            Kernel::Poly {
                gamma,
                coef0,
                degree,
            } => {
                let base = gamma * dot(x, y) + coef0;
                match i32::try_from(degree) {
                    Ok(degree) => base.powi(degree),
                    Err(_) => base.powf(f64::from(degree)),
                }
            }
            Kernel::Sigmoid { gamma, coef0 } => (gamma * dot(x, y) + coef0).tanh(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportVectorClassifier {
    pub classes: Vec<ClassLabel>,
    pub kernel: Kernel,
    pub support_vectors: Vec<Vec<f64>>,
    pub dual_coef: Vec<f64>,
    pub intercept: f64,
}

impl SupportVectorClassifier {
    pub fn decision_function(&self, features: &[f64]) -> f64 {
        self.support_vectors
            .iter()
            .zip(&self.dual_coef)
            .map(|(sv, alpha)| alpha * self.kernel.apply(sv, features))
            .sum::<f64>()
            + self.intercept
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        validate_binary_classes(&self.classes)?;
        if self.support_vectors.is_empty() {
            return Err("at least one support vector is required".to_string());
        }
        if self.support_vectors.len() != self.dual_coef.len() {
            return Err(format!(
                "{} support vectors but {} dual coefficients",
                self.support_vectors.len(),
                self.dual_coef.len()
            ));
        }
        if let Kernel::Poly { degree, .. } = self.kernel
            && i32::try_from(degree).is_err()
        {
            return Err(format!("polynomial degree {degree} is too large"));
        }
        let width = self.support_vectors[0].len();
        if width == 0 || self.support_vectors.iter().any(|sv| sv.len() != width) {
            return Err("support vectors must share a non-zero width".to_string());
        }
        Ok(())
    }
}

impl Classifier for SupportVectorClassifier {
    fn n_features(&self) -> usize {
        self.support_vectors.first().map_or(0, Vec::len)
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

    fn rbf_model() -> SupportVectorClassifier {
        SupportVectorClassifier {
            classes: vec![ClassLabel::NEGATIVE, ClassLabel::POSITIVE],
            kernel: Kernel::Rbf { gamma: 1.0 },
            support_vectors: vec![vec![1.0, 1.0, 0.0], vec![-1.0, -1.0, 0.0]],
            dual_coef: vec![1.0, -1.0],
            intercept: 0.0,
        }
    }

    #[test]
    fn rbf_follows_nearest_support_vector() {
        let model = rbf_model();
        let near_positive = ScaledFeatureRecord::new(vec![0.9, 1.1, 0.0]);
        let near_negative = ScaledFeatureRecord::new(vec![-0.8, -1.2, 0.0]);
        assert_eq!(model.predict(&near_positive).unwrap(), ClassLabel::POSITIVE);
        assert_eq!(model.predict(&near_negative).unwrap(), ClassLabel::NEGATIVE);
    }

    #[test]
    fn kernels_evaluate_expected_values() {
        let x = [1.0, 2.0, 0.0];
        let y = [0.5, -1.0, 3.0];
        assert_eq!(Kernel::Linear.apply(&x, &y), -1.5);
        assert_eq!(Kernel::Rbf { gamma: 0.0 }.apply(&x, &y), 1.0);
        assert_eq!(
            Kernel::Poly {
                gamma: 1.0,
                coef0: 2.0,
                degree: 2
            }
            .apply(&x, &y),
            0.25
        );
        assert_eq!(
            Kernel::Sigmoid {
                gamma: 1.0,
                coef0: 1.5
            }
            .apply(&x, &y),
            0.0
        );
    }

    #[test]
    fn kernel_parses_from_tagged_json() {
        let kernel: Kernel = serde_json::from_str(r#"{"type": "rbf", "gamma": 0.25}"#).unwrap();
        assert_eq!(kernel, Kernel::Rbf { gamma: 0.25 });
    }

    #[test]
    fn validate_catches_ragged_support_vectors() {
        let mut model = rbf_model();
        model.support_vectors[1].pop();
        assert!(model.validate().is_err());
        model.support_vectors.pop();
        assert!(model.validate().is_err());
    }

    #[test]
    fn validate_rejects_oversized_polynomial_degree() {
        let mut model = rbf_model();
        model.kernel = Kernel::Poly {
            gamma: 1.0,
            coef0: 0.0,
            degree: 3,
        };
        assert!(model.validate().is_ok());
        model.kernel = Kernel::Poly {
            gamma: 1.0,
            coef0: 0.0,
            degree: u32::MAX,
        };
        assert!(model.validate().is_err());
    }

    #[test]
    fn oversized_degree_does_not_wrap_sign() {
        let kernel = Kernel::Poly {
            gamma: 1.0,
            coef0: 0.0,
            degree: u32::MAX,
        };
        // 0.5^degree underflows to zero.
        assert_eq!(kernel.apply(&[0.5, 0.0, 0.0], &[1.0, 0.0, 0.0]), 0.0);
    }
}
