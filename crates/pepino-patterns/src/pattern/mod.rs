//! Compilation of step patterns into whole-line regular expressions.

pub(crate) mod lexer;

use regex::Regex;

use crate::errors::PatternError;

/// Compile a step pattern so that it only matches an entire step line.
///
/// Patterns are conventionally written as `^...$`, but the anchors are not
/// required: the source is wrapped in a non-capturing group anchored at both
/// ends, so `"(\d+) apples"` never matches `"12 apples and pears"`. Capture
/// group numbering is unaffected.
///
/// # Errors
///
/// Returns [`PatternError::Regex`] when the source is not a valid regular
/// expression.
///
/// # Examples
///
/// ```
/// use pepino_patterns::compile_step_pattern;
///
/// let re = compile_step_pattern(r"(\d+) apples").expect("valid pattern");
/// assert!(re.is_match("12 apples"));
/// assert!(!re.is_match("12 apples and pears"));
/// ```
pub fn compile_step_pattern(source: &str) -> Result<Regex, PatternError> {
    Regex::new(&format!("^(?:{source})$")).map_err(|err| PatternError::Regex {
        pattern: source.to_string(),
        source: err,
    })
}
