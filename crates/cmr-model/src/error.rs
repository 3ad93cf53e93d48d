use thiserror::Error;

/// A form submission that cannot be turned into a [`crate::FeatureRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("missing form field `{field}`")]
    MissingField { field: &'static str },
    #[error("form field `{field}` is not a number")]
    NotNumeric { field: &'static str },
    #[error("form field `{field}` must be a finite number")]
    NotFinite { field: &'static str },
}

/// A fitted classifier that failed while predicting.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InferenceError {
    #[error("{model}: expected {expected} features, got {actual}")]
    FeatureCount {
        model: String,
        expected: usize,
        actual: usize,
    },
    #[error("{model}: decision value is not finite")]
    NonFinite { model: String },
    #[error("{model}: no class label at index {index}")]
    MissingClass { model: String, index: usize },
    #[error("{model}: tree {tree} has no leaf reachable from node {node}")]
    MalformedTree {
        model: String,
        tree: usize,
        node: usize,
    },
}

pub type Result<T> = std::result::Result<T, InferenceError>;
