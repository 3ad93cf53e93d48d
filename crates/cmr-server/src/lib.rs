//! Web form and supporting pieces for cardiometabolic risk predictions.

pub mod error;
pub mod logging;
pub mod routes;
pub mod views;

pub use error::ServerError;
pub use routes::{AppState, PredictionForm, router};
