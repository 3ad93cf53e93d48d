use serde::{Deserialize, Serialize};

use crate::error::InputError;

/// Number of raw measurements the scaler was fitted on.
pub const FEATURE_COUNT: usize = 3;

/// Column order of the row handed to the scaler.
///
/// The scaler and every classifier only see positions, so this order must
/// match the order used when the artifacts were fitted.
pub const FEATURE_ORDER: [&str; FEATURE_COUNT] = ["Glucose", "Insulin", "BloodPressure"];

/// One patient's raw measurements, as submitted through the form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub glucose: f64,
    pub insulin: f64,
    pub blood_pressure: f64,
}

impl FeatureRecord {
    pub fn new(glucose: f64, insulin: f64, blood_pressure: f64) -> Self {
        Self {
            glucose,
            insulin,
            blood_pressure,
        }
    }

    /// Parse the three numeric form fields.
    ///
    /// Surrounding whitespace is ignored; empty, non-numeric and non-finite
    /// values are rejected with the offending field name.
    pub fn from_form_fields(
        insulin: Option<&str>,
        glucose: Option<&str>,
        blood_pressure: Option<&str>,
    ) -> Result<Self, InputError> {
        let insulin = parse_field("insulin", insulin)?;
        let glucose = parse_field("glucose", glucose)?;
        let blood_pressure = parse_field("blood_pressure", blood_pressure)?;
        Ok(Self::new(glucose, insulin, blood_pressure))
    }

    /// The single row passed to the scaler, ordered as [`FEATURE_ORDER`].
    pub fn to_row(&self) -> [f64; FEATURE_COUNT] {
        [self.glucose, self.insulin, self.blood_pressure]
    }
}

fn parse_field(field: &'static str, raw: Option<&str>) -> Result<f64, InputError> {
    let raw = raw.map(str::trim).filter(|value| !value.is_empty());
    let Some(raw) = raw else {
        return Err(InputError::MissingField { field });
    };
    let value: f64 = raw.parse().map_err(|_| InputError::NotNumeric { field })?;
    if !value.is_finite() {
        return Err(InputError::NotFinite { field });
    }
    Ok(value)
}

/// A feature row after the fitted scaler has been applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledFeatureRecord(Vec<f64>);

impl ScaledFeatureRecord {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
