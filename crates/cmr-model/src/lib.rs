pub mod catalog;
pub mod error;
pub mod features;
pub mod label;
pub mod prediction;

pub use catalog::{MODEL_TABLE, ModelEntry, ModelKind, SCALER_ARTIFACT};
pub use error::{InferenceError, InputError, Result};
pub use features::{FEATURE_COUNT, FEATURE_ORDER, FeatureRecord, ScaledFeatureRecord};
pub use label::{ClassLabel, Condition};
pub use prediction::{ConditionLabels, ModelPrediction, PredictionResult};
