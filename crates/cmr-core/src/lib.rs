pub mod aggregate;

pub use aggregate::{make_predictions, predict_scaled};
