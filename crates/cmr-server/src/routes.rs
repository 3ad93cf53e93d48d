//! HTTP routes: the form on `GET /`, predictions on `POST /`.

use std::sync::Arc;

use axum::Router;
use axum::extract::{Form, State};
use axum::response::Html;
use axum::routing::get;
use cmr_artifacts::ModelRegistry;
use cmr_core::make_predictions;
use cmr_model::{FeatureRecord, InputError};
use serde::Deserialize;
use tracing::{debug, info_span};

use crate::error::ServerError;
use crate::logging::redact_value;
use crate::views::{render_form, render_results};

/// Shared, read-only state handed to every request.
#[derive(Clone)]
pub struct AppState {
    registry: Arc<ModelRegistry>,
}

impl AppState {
    pub fn new(registry: ModelRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }
}

/// Raw form submission; numeric fields are parsed by [`FeatureRecord`].
#[derive(Debug, Default, Deserialize)]
pub struct PredictionForm {
    pub name: Option<String>,
    pub insulin: Option<String>,
    pub glucose: Option<String>,
    pub blood_pressure: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index).post(submit))
        .route("/health", get(health))
        .with_state(state)
}

async fn index() -> Result<Html<String>, ServerError> {
    Ok(Html(render_form()?))
}

async fn submit(
    State(state): State<AppState>,
    Form(form): Form<PredictionForm>,
) -> Result<Html<String>, ServerError> {
    predict_page(&state, form).map(Html)
}

fn predict_page(state: &AppState, form: PredictionForm) -> Result<String, ServerError> {
    let name = form
        .name
        .ok_or(InputError::MissingField { field: "name" })?;
    let _span = info_span!("predict", name = %redact_value(&name)).entered();
    let features = FeatureRecord::from_form_fields(
        form.insulin.as_deref(),
        form.glucose.as_deref(),
        form.blood_pressure.as_deref(),
    )?;
    debug!(
        glucose = %redact_value(&features.glucose.to_string()),
        insulin = %redact_value(&features.insulin.to_string()),
        blood_pressure = %redact_value(&features.blood_pressure.to_string()),
        "parsed measurements"
    );
    let predictions = make_predictions(state.registry(), &features)?;
    debug!(models = predictions.len(), "predictions ready");
    Ok(render_results(&name, &predictions)?)
}

async fn health() -> &'static str {
    "ok"
}
