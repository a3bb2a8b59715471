//! Domain-specific error types for the EDID generator.
//!
//! All fallible operations return `Result<T, EdidError>`.
//! No panics on invalid input — every error is typed and recoverable.

use thiserror::Error;

use crate::validate::ValidationErrors;

/// The canonical error type for the EDID generator.
#[derive(Debug, Error)]
pub enum EdidError {
    // ── Parameter Errors ─────────────────────────────────────────
    /// The parameter record failed validation; generation is blocked
    /// until every field error is corrected.
    #[error("invalid parameters: {0}")]
    Validation(ValidationErrors),

    /// A numeric value did not map to any known enum variant.
    #[error("unknown {type_name} discriminant: {value}")]
    UnknownVariant { type_name: &'static str, value: u64 },

    /// A field name did not map to any known timing field.
    #[error("unknown timing field: {0}")]
    UnknownField(String),

    /// A preset id did not match any catalog entry.
    #[error("unknown preset: {0}")]
    UnknownPreset(String),

    // ── Encoder Errors ───────────────────────────────────────────
    /// The encoder produced a block of unexpected length. Defensive
    /// check only — cannot occur for validated input.
    #[error("invalid EDID data generated: {actual} bytes (expected 128 or 256)")]
    InvalidBlockLength { actual: usize },

    // ── Boundary Errors ──────────────────────────────────────────
    /// A parameter or patch file could not be parsed as JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The filesystem layer reported an error.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Catch-all for errors that do not fit another variant.
    #[error("{0}")]
    Other(String),
}

// ── Convenient From implementations ──────────────────────────────

impl From<String> for EdidError {
    fn from(s: String) -> Self {
        EdidError::Other(s)
    }
}

impl From<&str> for EdidError {
    fn from(s: &str) -> Self {
        EdidError::Other(s.to_string())
    }
}
