use thiserror::Error;

/// Errors that abort report generation for a batch.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReportError {
    /// The product store could not resolve a line's product number and the
    /// configured policy aborts the batch.
    #[error("product lookup failed for invoice {invoice}, line {line}: {source}")]
    Lookup {
        invoice: u32,
        line: u32,
        #[source]
        source: LookupError,
    },

    /// Builder encountered missing configuration.
    #[error("builder error: {0}")]
    Builder(String),

    /// One or more input records failed validation.
    #[error("malformed input: {}", join_errors(.0))]
    MalformedInput(Vec<ValidationError>),
}

/// Failure reported by a [`ProductResolver`](super::ProductResolver).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum LookupError {
    /// No product is stored under this number.
    #[error("product {0} not found")]
    NotFound(String),

    /// The store could not be reached or returned garbage.
    #[error("product store unavailable: {0}")]
    Unavailable(String),
}

/// Errors loading a [`ReportConfig`](super::ReportConfig) or a product catalog.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[cfg(feature = "json")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A single validation error with field path and message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dot-separated path to the invalid field (e.g. "invoice[151].lines[2].quantity").
    pub field: String,
    /// Human-readable error description.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
