//! Error types raised while compiling step patterns.

use thiserror::Error;

/// Errors surfaced while converting step patterns into regular expressions.
///
/// # Examples
/// ```
/// use pepino_patterns::{PatternError, compile_step_pattern};
///
/// let result = compile_step_pattern("^(unclosed$");
/// assert!(matches!(result, Err(PatternError::Regex { .. })));
/// ```
#[derive(Debug, Error)]
pub enum PatternError {
    /// The pattern source is not a valid regular expression.
    #[error("invalid step pattern `{pattern}`: {source}")]
    Regex {
        /// Pattern source as supplied at registration.
        pattern: String,
        /// Underlying compilation failure.
        #[source]
        source: regex::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_the_offending_pattern() {
        let err = PatternError::Regex {
            pattern: "a(".into(),
            source: regex::Error::Syntax("unclosed group".into()),
        };
        assert_eq!(err.to_string(), "invalid step pattern `a(`: unclosed group");
    }
}
