//! Error types for histogram requests.

use std::collections::BTreeMap;

/// Key used for request-wide problems that cannot be pinned to a single
/// parameter.
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

/// Field-keyed map of human-readable validation messages. Keys are request
/// parameter names; `BTreeMap` keeps the serialized order stable.
pub type ErrorMap = BTreeMap<String, String>;

/// Errors produced while validating and planning a histogram request.
///
/// All of these are detected before any grouped-count query is issued.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HistogramError {
    /// Request parameters failed validation; reported to the caller as a
    /// field-keyed message map.
    #[error("invalid histogram request: {0:?}")]
    Validation(ErrorMap),

    /// The referenced contest does not exist.
    #[error("Contest with id {0} does not exist.")]
    ContestNotFound(String),

    /// The requested record kind is not one of the supported kinds.
    #[error("{0} is not a supported record kind.")]
    UnknownRecordKind(String),
}

impl HistogramError {
    /// A validation error with a single message keyed by parameter name.
    pub fn field(name: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = ErrorMap::new();
        errors.insert(name.into(), message.into());
        Self::Validation(errors)
    }

    /// A validation error keyed by [`NON_FIELD_ERRORS`].
    pub fn non_field(message: impl Into<String>) -> Self {
        Self::field(NON_FIELD_ERRORS, message)
    }

    /// The field-keyed message map for this error.
    pub fn errors(&self) -> ErrorMap {
        match self {
            Self::Validation(errors) => errors.clone(),
            Self::ContestNotFound(_) => {
                let mut errors = ErrorMap::new();
                errors.insert("contest_id".to_string(), self.to_string());
                errors
            }
            Self::UnknownRecordKind(_) => {
                let mut errors = ErrorMap::new();
                errors.insert(NON_FIELD_ERRORS.to_string(), self.to_string());
                errors
            }
        }
    }
}
