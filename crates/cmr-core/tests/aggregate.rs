//! Tests for prediction aggregation.

use std::sync::{Arc, Mutex};

use cmr_artifacts::paths::bundled_artifacts_dir;
use cmr_artifacts::{
    Classifier, LogisticRegression, ModelRegistry, RegisteredModel, StandardScaler,
};
use cmr_core::{make_predictions, predict_scaled};
use cmr_model::{
    ClassLabel, FEATURE_ORDER, FeatureRecord, InferenceError, ModelKind, PredictionResult,
    ScaledFeatureRecord,
};

fn bundled_registry() -> ModelRegistry {
    let (registry, _) =
        ModelRegistry::load(&bundled_artifacts_dir()).expect("load bundled artifacts");
    registry
}

fn identity_scaler() -> StandardScaler {
    StandardScaler {
        feature_names: FEATURE_ORDER.iter().map(ToString::to_string).collect(),
        mean: vec![0.0; 3],
        scale: vec![1.0; 3],
    }
}

fn assert_all(result: &PredictionResult, prediabetes: ClassLabel, hypertension: ClassLabel) {
    assert_eq!(result.len(), 3);
    for entry in result.iter() {
        assert_eq!(entry.labels.prediabetes, prediabetes, "{}", entry.model);
        assert_eq!(entry.labels.hypertension, hypertension, "{}", entry.model);
    }
}

/// Records every row it is asked about and answers with a fixed label.
struct Recording {
    label: ClassLabel,
    seen: Arc<Mutex<Vec<Vec<f64>>>>,
}

impl Classifier for Recording {
    fn n_features(&self) -> usize {
        3
    }

    fn predict(&self, features: &ScaledFeatureRecord) -> Result<ClassLabel, InferenceError> {
        self.seen.lock().unwrap().push(features.as_slice().to_vec());
        Ok(self.label)
    }
}

struct Failing;

impl Classifier for Failing {
    fn n_features(&self) -> usize {
        3
    }

    fn predict(&self, _features: &ScaledFeatureRecord) -> Result<ClassLabel, InferenceError> {
        Err(InferenceError::NonFinite {
            model: "failing".to_string(),
        })
    }
}

fn recording(label: i64, seen: &Arc<Mutex<Vec<Vec<f64>>>>) -> Box<dyn Classifier> {
    Box::new(Recording {
        label: ClassLabel::new(label),
        seen: Arc::clone(seen),
    })
}

#[test]
fn average_patient_is_negative_everywhere() {
    let registry = bundled_registry();
    let result = make_predictions(&registry, &FeatureRecord::new(120.0, 85.0, 70.0)).unwrap();
    assert_all(&result, ClassLabel::NEGATIVE, ClassLabel::NEGATIVE);

    let names: Vec<&str> = result.iter().map(|entry| entry.model.display_name()).collect();
    assert_eq!(
        names,
        vec!["Logistic Regression", "Support Vector Machine", "Random Forest"]
    );
}

#[test]
fn high_readings_are_positive_everywhere() {
    let registry = bundled_registry();
    let result = make_predictions(&registry, &FeatureRecord::new(190.0, 300.0, 95.0)).unwrap();
    assert_all(&result, ClassLabel::POSITIVE, ClassLabel::POSITIVE);
}

#[test]
fn conditions_are_predicted_independently() {
    let registry = bundled_registry();
    let result = make_predictions(&registry, &FeatureRecord::new(110.0, 60.0, 100.0)).unwrap();
    assert_all(&result, ClassLabel::NEGATIVE, ClassLabel::POSITIVE);
}

#[test]
fn reordering_the_row_changes_labels() {
    let registry = bundled_registry();
    let record = FeatureRecord::new(70.0, 85.0, 120.0);
    assert_eq!(record.to_row(), [70.0, 85.0, 120.0]);

    let in_order = make_predictions(&registry, &record).unwrap();
    assert_all(&in_order, ClassLabel::NEGATIVE, ClassLabel::POSITIVE);

    // Blood pressure and glucose swapped: the scaler cannot tell.
    let swapped = registry
        .scaler()
        .transform_row(&[record.blood_pressure, record.insulin, record.glucose]);
    let reordered = predict_scaled(&registry, &swapped).unwrap();
    assert_all(&reordered, ClassLabel::NEGATIVE, ClassLabel::NEGATIVE);
    assert_ne!(in_order, reordered);
}

#[test]
fn every_classifier_sees_the_same_scaled_row() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let scaler = StandardScaler {
        mean: vec![100.0, 50.0, 80.0],
        scale: vec![10.0, 25.0, 5.0],
        ..identity_scaler()
    };
    let models = ModelKind::ALL
        .into_iter()
        .map(|kind| RegisteredModel::new(kind, recording(1, &seen), recording(0, &seen)))
        .collect();
    let registry = ModelRegistry::from_parts(scaler, models).unwrap();

    let result = make_predictions(&registry, &FeatureRecord::new(120.0, 100.0, 70.0)).unwrap();
    assert_all(&result, ClassLabel::POSITIVE, ClassLabel::NEGATIVE);

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 6);
    for row in seen.iter() {
        assert_eq!(row, &vec![2.0, 2.0, -2.0]);
    }
}

#[test]
fn one_failing_classifier_fails_the_whole_call() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let models = vec![
        RegisteredModel::new(
            ModelKind::LogisticRegression,
            recording(1, &seen),
            recording(1, &seen),
        ),
        RegisteredModel::new(
            ModelKind::SupportVectorMachine,
            recording(0, &seen),
            Box::new(Failing),
        ),
        RegisteredModel::new(
            ModelKind::RandomForest,
            recording(0, &seen),
            recording(0, &seen),
        ),
    ];
    let registry = ModelRegistry::from_parts(identity_scaler(), models).unwrap();

    let err = make_predictions(&registry, &FeatureRecord::new(1.0, 2.0, 3.0)).unwrap_err();
    assert_eq!(
        err,
        InferenceError::NonFinite {
            model: "failing".to_string()
        }
    );
}

#[test]
fn hand_built_classifier_without_classes_errors_instead_of_panicking() {
    let unlabelled = || -> Box<dyn Classifier> {
        Box::new(LogisticRegression {
            classes: vec![],
            coef: vec![0.0; 3],
            intercept: 1.0,
        })
    };
    let models = ModelKind::ALL
        .into_iter()
        .map(|kind| RegisteredModel::new(kind, unlabelled(), unlabelled()))
        .collect();
    let registry = ModelRegistry::from_parts(identity_scaler(), models).unwrap();

    let err = make_predictions(&registry, &FeatureRecord::new(1.0, 2.0, 3.0)).unwrap_err();
    assert!(matches!(err, InferenceError::MissingClass { index: 1, .. }));
}

#[test]
fn registry_requires_every_model_family() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let models = vec![RegisteredModel::new(
        ModelKind::RandomForest,
        recording(0, &seen),
        recording(0, &seen),
    )];
    assert!(ModelRegistry::from_parts(identity_scaler(), models).is_err());
}

mod properties {
    use super::*;
    use proptest::prelude::*;
    use std::sync::OnceLock;

    fn registry() -> &'static ModelRegistry {
        static REGISTRY: OnceLock<ModelRegistry> = OnceLock::new();
        REGISTRY.get_or_init(bundled_registry)
    }

    proptest! {
        /// Every model family answers with binary labels for any plausible reading.
        #[test]
        fn three_binary_entries(
            glucose in 0.0f64..400.0,
            insulin in 0.0f64..900.0,
            blood_pressure in 0.0f64..200.0,
        ) {
            let record = FeatureRecord::new(glucose, insulin, blood_pressure);
            let result = make_predictions(registry(), &record).unwrap();
            prop_assert_eq!(result.len(), 3);
            for entry in result.iter() {
                prop_assert!(matches!(entry.labels.prediabetes.value(), 0 | 1));
                prop_assert!(matches!(entry.labels.hypertension.value(), 0 | 1));
            }
        }

        /// Identical input and artifacts give identical output.
        #[test]
        fn deterministic(
            glucose in 0.0f64..400.0,
            insulin in 0.0f64..900.0,
            blood_pressure in 0.0f64..200.0,
        ) {
            let record = FeatureRecord::new(glucose, insulin, blood_pressure);
            let first = make_predictions(registry(), &record).unwrap();
            let second = make_predictions(registry(), &record).unwrap();
            prop_assert_eq!(first, second);
        }
    }
}
