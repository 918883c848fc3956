use crate::listener::Diagnostic;
use thiserror::Error;

/// Failures raised by engine configuration or evaluation.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("invalid engine configuration: {0}")]
    Config(String),
    #[error("engine rejected feature '{feature}': {message}")]
    Feature { feature: String, message: String },
    #[error("{0}")]
    Diagnostic(Diagnostic),
    #[error("evaluation failed: {0}")]
    Evaluation(String),
}
