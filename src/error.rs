//! Error types for baby-records

use crate::types::RecordGroup;
use thiserror::Error;

/// Errors raised while resolving, converting or formatting records
#[derive(Debug, Error)]
pub enum TaxonomyError {
    #[error("Unknown record type: {0}")]
    UnknownRecordType(String),

    #[error("Attributes do not match the {group} shape: {message}")]
    AttributeShape { group: RecordGroup, message: String },

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Date parse error: {0}")]
    DateParse(String),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse input: {0}")]
    Parse(String),
}

impl TaxonomyError {
    /// Stable machine-readable code, shared by the CLI and the C ABI
    pub fn code(&self) -> &'static str {
        match self {
            TaxonomyError::UnknownRecordType(_) => "UNKNOWN_RECORD_TYPE",
            TaxonomyError::AttributeShape { .. } => "ATTRIBUTE_SHAPE",
            TaxonomyError::MissingField(_) => "MISSING_FIELD",
            TaxonomyError::DateParse(_) => "DATE_PARSE_ERROR",
            TaxonomyError::Json(_) => "JSON_ERROR",
            TaxonomyError::Parse(_) => "PARSE_ERROR",
        }
    }
}
