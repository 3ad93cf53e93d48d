use cmr_model::{ClassLabel, InferenceError, ScaledFeatureRecord};
use serde::{Deserialize, Serialize};

use super::{Classifier, check_width, class_at};

const NAME: &str = "random forest";

/// Marker used in `children_left`/`children_right` for leaf nodes.
pub const LEAF: i64 = -1;

/// One fitted decision tree in parallel-array form.
///
/// Node `i` splits on `feature[i]` at `threshold[i]`; samples with
/// `x[feature] <= threshold` go to `children_left[i]`. At a leaf, `value[i]`
/// holds the class weights in the order of the forest's `classes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<Vec<f64>>,
}

impl DecisionTree {
    fn node_count(&self) -> usize {
        self.children_left.len()
    }

    /// Walk from the root to a leaf and return its node index.
    fn leaf_for(&self, features: &[f64]) -> Option<usize> {
        let mut node = 0usize;
        // A well-formed tree reaches a leaf in fewer steps than it has nodes.
        for _ in 0..self.node_count() {
            let left = *self.children_left.get(node)?;
            if left == LEAF {
                return Some(node);
            }
            let feature = usize::try_from(*self.feature.get(node)?).ok()?;
            let value = *features.get(feature)?;
            let next = if value <= *self.threshold.get(node)? {
                left
            } else {
                *self.children_right.get(node)?
            };
            node = usize::try_from(next).ok()?;
        }
        None
    }

    fn validate(&self, n_features: usize, n_classes: usize) -> Result<(), String> {
        let nodes = self.node_count();
        if nodes == 0 {
            return Err("tree has no nodes".to_string());
        }
        if self.children_right.len() != nodes
            || self.feature.len() != nodes
            || self.threshold.len() != nodes
            || self.value.len() != nodes
        {
            return Err("tree arrays have different lengths".to_string());
        }
        for node in 0..nodes {
            let (left, right) = (self.children_left[node], self.children_right[node]);
            if left == LEAF {
                let weights = &self.value[node];
                if weights.len() != n_classes {
                    return Err(format!(
                        "leaf {node} has {} class weights, expected {n_classes}",
                        weights.len()
                    ));
                }
                if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
                    return Err(format!("leaf {node} has invalid class weights"));
                }
                continue;
            }
            for child in [left, right] {
                if child <= node as i64 || child >= nodes as i64 {
                    return Err(format!("node {node} has out-of-order child {child}"));
                }
            }
            let feature = self.feature[node];
            if feature < 0 || feature >= n_features as i64 {
                return Err(format!("node {node} splits on unknown feature {feature}"));
            }
        }
        Ok(())
    }
}

/// Forest of decision trees voting by averaged class probabilities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    pub classes: Vec<ClassLabel>,
    pub n_features: usize,
    pub trees: Vec<DecisionTree>,
}

impl RandomForest {
    /// Mean of the normalised leaf distributions across all trees.
    pub fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>, InferenceError> {
        let mut totals = vec![0.0; self.classes.len()];
        for (index, tree) in self.trees.iter().enumerate() {
            let weights = tree
                .leaf_for(features)
                .and_then(|leaf| tree.value.get(leaf))
                .ok_or_else(|| InferenceError::MalformedTree {
                    model: NAME.to_string(),
                    tree: index,
                    node: 0,
                })?;
            let sum: f64 = weights.iter().sum();
            if sum <= 0.0 {
                continue;
            }
            for (total, weight) in totals.iter_mut().zip(weights) {
                *total += weight / sum;
            }
        }
        let count = self.trees.len() as f64;
        Ok(totals.into_iter().map(|total| total / count).collect())
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.classes.len() < 2 {
            return Err(format!(
                "expected at least 2 classes, found {}",
                self.classes.len()
            ));
        }
        if self.n_features == 0 {
            return Err("n_features must be positive".to_string());
        }
        if self.trees.is_empty() {
            return Err("forest has no trees".to_string());
        }
        for (index, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features, self.classes.len())
                .map_err(|message| format!("tree {index}: {message}"))?;
        }
        Ok(())
    }
}

impl Classifier for RandomForest {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict(&self, features: &ScaledFeatureRecord) -> Result<ClassLabel, InferenceError> {
        check_width(NAME, self.n_features, features)?;
        let proba = self.predict_proba(features.as_slice())?;
        if proba.iter().any(|p| !p.is_finite()) {
            return Err(InferenceError::NonFinite {
                model: NAME.to_string(),
            });
        }
        // First maximum wins on ties.
        let mut best = 0;
        for (index, p) in proba.iter().enumerate() {
            if *p > proba[best] {
                best = index;
            }
        }
        class_at(NAME, &self.classes, best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stump(feature: i64, threshold: f64, left: [f64; 2], right: [f64; 2]) -> DecisionTree {
        DecisionTree {
            children_left: vec![1, LEAF, LEAF],
            children_right: vec![2, LEAF, LEAF],
            feature: vec![feature, -2, -2],
            threshold: vec![threshold, -2.0, -2.0],
            value: vec![vec![0.0, 0.0], left.to_vec(), right.to_vec()],
        }
    }

    fn forest() -> RandomForest {
        RandomForest {
            classes: vec![ClassLabel::NEGATIVE, ClassLabel::POSITIVE],
            n_features: 3,
            trees: vec![
                stump(0, 0.0, [9.0, 1.0], [2.0, 8.0]),
                stump(1, 0.5, [6.0, 4.0], [1.0, 3.0]),
                stump(2, -1.0, [5.0, 5.0], [10.0, 30.0]),
            ],
        }
    }

    #[test]
    fn averages_normalised_leaf_distributions() {
        let proba = forest().predict_proba(&[1.0, 0.0, 0.0]).unwrap();
        // leaves: [0.2, 0.8], [0.6, 0.4], [0.25, 0.75]
        assert!((proba[0] - 1.05 / 3.0).abs() < 1e-12);
        assert!((proba[1] - 1.95 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn predicts_majority_class() {
        let model = forest();
        let positive = ScaledFeatureRecord::new(vec![1.0, 1.0, 0.0]);
        let negative = ScaledFeatureRecord::new(vec![-1.0, 0.0, -2.0]);
        assert_eq!(model.predict(&positive).unwrap(), ClassLabel::POSITIVE);
        assert_eq!(model.predict(&negative).unwrap(), ClassLabel::NEGATIVE);
    }

    #[test]
    fn tie_goes_to_first_class() {
        let model = RandomForest {
            trees: vec![stump(0, 0.0, [1.0, 1.0], [1.0, 1.0])],
            ..forest()
        };
        let row = ScaledFeatureRecord::new(vec![0.0, 0.0, 0.0]);
        assert_eq!(model.predict(&row).unwrap(), ClassLabel::NEGATIVE);
    }

    #[test]
    fn validate_rejects_cycles_and_bad_features() {
        let mut model = forest();
        assert!(model.validate().is_ok());
        model.trees[0].children_left[0] = 0;
        assert!(model.validate().is_err());

        let mut model = forest();
        model.trees[1].feature[0] = 7;
        assert!(model.validate().is_err());
    }

    #[test]
    fn unvalidated_cycle_is_an_inference_error() {
        let mut model = forest();
        model.trees[2].children_left[0] = 0;
        model.trees[2].children_right[0] = 0;
        let err = model
            .predict(&ScaledFeatureRecord::new(vec![0.0, 0.0, 0.0]))
            .unwrap_err();
        assert!(matches!(err, InferenceError::MalformedTree { tree: 2, .. }));
    }

    #[test]
    fn unvalidated_empty_forest_is_an_inference_error() {
        let model = RandomForest {
            classes: vec![],
            n_features: 3,
            trees: vec![],
        };
        let err = model
            .predict(&ScaledFeatureRecord::new(vec![0.0, 0.0, 0.0]))
            .unwrap_err();
        assert_eq!(
            err,
            InferenceError::MissingClass {
                model: NAME.to_string(),
                index: 0
            }
        );

        let model = RandomForest {
            classes: vec![],
            ..forest()
        };
        let err = model
            .predict(&ScaledFeatureRecord::new(vec![1.0, 1.0, 0.0]))
            .unwrap_err();
        assert_eq!(
            err,
            InferenceError::MissingClass {
                model: NAME.to_string(),
                index: 0
            }
        );
    }

    #[test]
    fn leaf_without_weights_is_an_inference_error() {
        let mut model = forest();
        model.trees[0].value.truncate(1);
        let err = model
            .predict(&ScaledFeatureRecord::new(vec![1.0, 1.0, 0.0]))
            .unwrap_err();
        assert!(matches!(err, InferenceError::MalformedTree { tree: 0, .. }));
    }
}
