//! Turn one set of measurements into labels from every registered model.

use cmr_artifacts::{Classifier, ModelRegistry};
use cmr_model::{
    ConditionLabels, FeatureRecord, InferenceError, PredictionResult, ScaledFeatureRecord,
};
use tracing::{debug, debug_span};

/// Scale `features` once, then ask both classifiers of every model family.
///
/// All classifiers consume the same scaled row. The first failing classifier
/// aborts the whole call; no partial result is returned.
pub fn make_predictions(
    registry: &ModelRegistry,
    features: &FeatureRecord,
) -> Result<PredictionResult, InferenceError> {
    let scaled = registry.scaler().transform(features);
    predict_scaled(registry, &scaled)
}

/// Run every registered model on an already scaled row.
pub fn predict_scaled(
    registry: &ModelRegistry,
    scaled: &ScaledFeatureRecord,
) -> Result<PredictionResult, InferenceError> {
    let mut result = PredictionResult::new();
    for model in registry.models() {
        let _span = debug_span!("model", name = model.kind.display_name()).entered();
        let prediabetes = model.prediabetes.predict(scaled)?;
        let hypertension = model.hypertension.predict(scaled)?;
        debug!(%prediabetes, %hypertension, "model predicted");
        result.insert(
            model.kind,
            ConditionLabels {
                prediabetes,
                hypertension,
            },
        );
    }
    Ok(result)
}
