use crate::types::SourceSpan;
use thiserror::Error;

/// Blocking failure of a requested operation.
///
/// Author mistakes are reported as [`crate::Problem`]s instead; a `VzError`
/// means the operation itself could not produce a result (malformed XML,
/// an export of an unresolved tree, a missing required attribute, I/O).
#[derive(Debug, Error, Clone, PartialEq)]
#[error("{code}: {message}")]
pub struct VzError {
    pub code: String,
    pub message: String,
    pub span: Option<SourceSpan>,
}

impl VzError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            span: None,
        }
    }

    pub fn with_span(
        code: impl Into<String>,
        message: impl Into<String>,
        span: SourceSpan,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            span: Some(span),
        }
    }
}
