//! Error types for the estimation pipeline

use serde::Serialize;
use std::fmt;

/// A single rejected field in a submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Submission rejected before any computation ran.
/// The only error a submission caller ever sees.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid submission ({})", summarize(.errors))]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    /// Whether a given field was rejected
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    pub fn fields(&self) -> Vec<&'static str> {
        self.errors.iter().map(|e| e.field).collect()
    }
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Geocoding lookup failures. Absorbed by the resolver, never surfaced.
#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("geocoding request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("geocoding service returned HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("malformed geocoding response: {0}")]
    Decode(String),

    #[error("no geocoding match for '{0}'")]
    NoMatch(String),

    #[error("geocoding lookup timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("geocoding disabled")]
    Disabled,
}
