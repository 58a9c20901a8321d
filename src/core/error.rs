//! Error types for batch testing

use miette::Diagnostic;
use thiserror::Error;

use crate::yaml::YamlError;

/// Everything that can stop a batch run.
///
/// A component measuring out of tolerance is not an error; it is reported as
/// FAIL in the analysis.
#[derive(Debug, Error, Diagnostic)]
pub enum BenchError {
    #[error("Invalid configuration: {message}")]
    #[diagnostic(
        code(cbench::configuration),
        help("Tolerances are fractions in [0, 1) and values must be finite numbers")
    )]
    Configuration { message: String },

    #[error("Cannot analyze an empty batch")]
    #[diagnostic(
        code(cbench::empty_batch),
        help("Add at least one component to the batch")
    )]
    EmptyBatch,

    #[error("Testing component {index} ({kind}) exceeded the {timeout_ms} ms timeout")]
    #[diagnostic(
        code(cbench::timeout),
        help("Raise --timeout or lower --delay-max")
    )]
    Timeout {
        index: usize,
        kind: String,
        timeout_ms: u64,
    },

    #[error("Test task failed: {0}")]
    #[diagnostic(code(cbench::task))]
    Task(#[from] tokio::task::JoinError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Yaml(#[from] YamlError),

    #[error("Failed to serialize report: {0}")]
    #[diagnostic(code(cbench::serialize))]
    Serialize(String),
}

impl BenchError {
    pub fn configuration(message: impl Into<String>) -> Self {
        BenchError::Configuration {
            message: message.into(),
        }
    }
}
