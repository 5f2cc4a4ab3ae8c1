//! Error types for wind power forecasting.

use thiserror::Error;

use crate::time::DateParseError;

/// Result type alias using ForecastError.
pub type ForecastResult<T> = Result<T, ForecastError>;

/// An input record does not match the observation schema.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    #[error("missing required field '{field}'")]
    MissingField { field: &'static str },

    #[error("wrong data type for '{field}': found {found} but needs {expected}")]
    WrongKind {
        field: &'static str,
        found: String,
        expected: &'static str,
    },

    #[error("expected a record object, found {found}")]
    NotARecord { found: String },

    #[error("batch contains no records")]
    EmptyBatch,

    #[error("record {index}: {source}")]
    InBatch {
        index: usize,
        #[source]
        source: Box<SchemaError>,
    },
}

impl SchemaError {
    /// Name of the offending field, if the error concerns one.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            SchemaError::MissingField { field } | SchemaError::WrongKind { field, .. } => {
                Some(field)
            }
            SchemaError::InBatch { source, .. } => source.field(),
            SchemaError::NotARecord { .. } | SchemaError::EmptyBatch => None,
        }
    }

    /// Attach the position of the failing record within a batch.
    pub fn in_batch(self, index: usize) -> Self {
        SchemaError::InBatch {
            index,
            source: Box::new(self),
        }
    }
}

/// Primary error type for forecast operations.
#[derive(Debug, Error)]
pub enum ForecastError {
    // === Request Errors ===
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("parse error: {0}")]
    Parse(#[from] DateParseError),

    // === Construction Errors ===
    #[error("configuration error: {0}")]
    Config(String),

    #[error("failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("invalid artifact {path}: {message}")]
    Artifact { path: String, message: String },

    // === Inference Errors ===
    #[error("feature mismatch: expected {expected} columns, got {got}")]
    FeatureMismatch { expected: usize, got: usize },

    #[error("pipeline stage '{stage}' cannot accept {got}")]
    StageMismatch { stage: String, got: &'static str },
}

impl ForecastError {
    /// Create a Config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a Fetch error.
    pub fn fetch(url: impl Into<String>, msg: impl ToString) -> Self {
        Self::Fetch {
            url: url.into(),
            message: msg.to_string(),
        }
    }

    /// Create an Artifact error.
    pub fn artifact(path: impl AsRef<std::path::Path>, msg: impl ToString) -> Self {
        Self::Artifact {
            path: path.as_ref().display().to_string(),
            message: msg.to_string(),
        }
    }

    /// True for errors caused by the caller's payload rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(self, ForecastError::Schema(_) | ForecastError::Parse(_))
    }

    /// Short machine-readable code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            ForecastError::Schema(_) => "SchemaError",
            ForecastError::Parse(_) => "ParseError",
            ForecastError::Config(_) => "ConfigError",
            ForecastError::Fetch { .. } => "FetchError",
            ForecastError::Artifact { .. } => "ArtifactError",
            ForecastError::FeatureMismatch { .. } => "FeatureMismatch",
            ForecastError::StageMismatch { .. } => "StageMismatch",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        if self.is_client_error() {
            400
        } else {
            500
        }
    }
}

impl From<serde_json::Error> for ForecastError {
    fn from(err: serde_json::Error) -> Self {
        ForecastError::Config(format!("JSON error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_field() {
        let err = SchemaError::MissingField { field: "hors" };
        assert_eq!(err.field(), Some("hors"));

        let err = SchemaError::WrongKind {
            field: "u",
            found: "\"abc\"".to_string(),
            expected: "real number",
        }
        .in_batch(3);
        assert_eq!(err.field(), Some("u"));
        assert!(err.to_string().starts_with("record 3:"));

        assert_eq!(SchemaError::EmptyBatch.field(), None);
    }

    #[test]
    fn test_status_codes() {
        let schema: ForecastError = SchemaError::EmptyBatch.into();
        assert_eq!(schema.http_status_code(), 400);
        assert_eq!(schema.error_code(), "SchemaError");

        let parse: ForecastError = DateParseError::InvalidFormat("x".into()).into();
        assert_eq!(parse.http_status_code(), 400);

        assert_eq!(ForecastError::config("bad").http_status_code(), 500);
        assert_eq!(
            ForecastError::fetch("http://host/model", "timeout").error_code(),
            "FetchError"
        );
    }
}
