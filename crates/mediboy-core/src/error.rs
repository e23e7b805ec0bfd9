use thiserror::Error;

/// Errors that can occur during mediboy core operations.
///
/// Extraction itself never fails: an unmatched rule simply leaves its
/// attribute out of the bag. Only building a rule table and reconciling a
/// directory batch can go wrong.
#[derive(Debug, Error)]
pub enum MediboyError {
    /// A rule pattern failed to compile (should not happen with the standard table).
    #[error("regex compilation error: {0}")]
    RegexError(#[from] regex::Error),

    /// The siblings of a directory did not agree on a usable title or category.
    ///
    /// This is a skippable condition: callers log it and move on to the next
    /// directory.
    #[error("no title/category consensus for {parent:?}")]
    NoConsensus {
        /// The parent directory name that was skipped.
        parent: String,
    },

    /// A `parent/child` input line is missing one of its two parts.
    #[error("malformed line, expected `parent/child`: {line:?}")]
    MalformedLine {
        /// The offending line.
        line: String,
    },
}

/// Result type alias for mediboy operations.
pub type Result<T> = std::result::Result<T, MediboyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let err = MediboyError::NoConsensus {
            parent: "Some Show".into(),
        };
        assert_eq!(err.to_string(), "no title/category consensus for \"Some Show\"");

        let err = MediboyError::MalformedLine {
            line: "no-separator".into(),
        };
        assert!(err.to_string().contains("no-separator"));
    }

    #[test]
    fn regex_errors_convert() {
        let err: MediboyError = regex::Regex::new("(unclosed").unwrap_err().into();
        assert!(matches!(err, MediboyError::RegexError(_)));
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MediboyError>();
    }
}
