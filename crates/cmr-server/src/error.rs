use std::io;

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use cmr_model::{InferenceError, InputError};
use tracing::{error, warn};

use crate::views::render_error;

/// Failures surfaced to a browser.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error("prediction failed: {0}")]
    Inference(#[from] InferenceError),
    #[error("failed to render page: {0}")]
    Render(#[from] io::Error),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::Input(_) => StatusCode::BAD_REQUEST,
            ServerError::Inference(_) | ServerError::Render(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (heading, message) = match &self {
            ServerError::Input(err) => {
                warn!(error = %err, "rejected form submission");
                ("Invalid input", err.to_string())
            }
            ServerError::Inference(_) | ServerError::Render(_) => {
                error!(error = %self, "request failed");
                (
                    "Prediction failed",
                    "The prediction could not be computed.".to_string(),
                )
            }
        };
        match render_error(heading, &message) {
            Ok(page) => (status, Html(page)).into_response(),
            Err(_) => (status, message).into_response(),
        }
    }
}
