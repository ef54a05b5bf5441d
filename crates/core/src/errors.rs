//! Core error types for metric construction, registration and exposition.

use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Metric or label names violate the exposition format rules.
    #[error("Invalid metric descriptor '{name}': {reason}")]
    InvalidDescriptor { name: String, reason: String },

    /// A sample carried a different number of label values than its
    /// descriptor declares label names.
    #[error("Inconsistent cardinality for '{name}': expected {expected} label values, got {actual}")]
    InconsistentCardinality {
        name: String,
        expected: usize,
        actual: usize,
    },

    /// A collector declared a metric name that is already registered.
    #[error("Descriptor '{0}' is already registered")]
    AlreadyRegistered(String),

    /// Gathered families could not be rendered in the text format.
    #[error("Failed to encode metrics: {0}")]
    Encode(String),
}

impl From<prometheus::Error> for Error {
    fn from(err: prometheus::Error) -> Self {
        Error::Encode(err.to_string())
    }
}
