// ============================================================
// Error Types
// ============================================================
// Every failure the preparation pipelines can produce.
//
// The core pipelines (alignment, batching, padding) return
// PrepError directly. File-facing layers (infra, application)
// wrap it in anyhow with the offending path attached, so a
// caller can still recover the typed error with
// `err.downcast_ref::<PrepError>()`.
//
// None of these are retryable: the input is either well formed
// or it is not.

use thiserror::Error;

/// Failures raised while parsing embeddings or shaping batches.
#[derive(Debug, Error)]
pub enum PrepError {
    /// The embedding header did not hold exactly two integers
    #[error("malformed embedding header: {message}")]
    Format { message: String },

    /// The byte stream ended inside a word or a vector
    #[error("embedding stream ended early while reading {context}")]
    TruncatedInput { context: String },

    /// Parallel inputs disagree on their length
    #[error("shape mismatch: {message}")]
    ShapeMismatch { message: String },

    /// An internal postcondition failed; the result must not be used
    #[error("postcondition violated: {message}")]
    AssertionViolation { message: String },

    /// The same word was given two ids
    #[error("duplicate vocabulary word '{0}'")]
    DuplicateWord(String),

    /// Adding the index offset pushed a token id past u32::MAX
    #[error("token id {id} overflows when offset by {offset}")]
    IdOverflow { id: u32, offset: u32 },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PrepError {
    pub(crate) fn format(message: impl Into<String>) -> Self {
        Self::Format { message: message.into() }
    }

    pub(crate) fn truncated(context: impl Into<String>) -> Self {
        Self::TruncatedInput { context: context.into() }
    }

    pub(crate) fn shape(message: impl Into<String>) -> Self {
        Self::ShapeMismatch { message: message.into() }
    }
}

/// Crate-wide result alias for the core pipelines.
pub type Result<T> = std::result::Result<T, PrepError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_problem() {
        let err = PrepError::format("expected 2 fields, found 3");
        assert_eq!(
            err.to_string(),
            "malformed embedding header: expected 2 fields, found 3"
        );

        let err = PrepError::IdOverflow { id: u32::MAX, offset: 3 };
        assert!(err.to_string().contains("offset by 3"));
    }

    #[test]
    fn test_io_errors_convert() {
        let io  = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let err = PrepError::from(io);
        assert!(matches!(err, PrepError::Io(_)));
    }
}
