//! Regex capture helpers used when dispatching step callbacks.

use regex::Regex;

/// Extract the capture groups when `text` matches `re`, returning `None`
/// otherwise.
///
/// Capture group 0 (the full match) is ignored so only user-defined groups
/// contribute to the result. Optional groups that do not participate yield
/// empty strings to keep positional alignment with the callback parameters.
///
/// # Examples
/// ```
/// # use pepino_patterns::{compile_step_pattern, extract_captured_values};
/// let regex = compile_step_pattern(r"^(\d+)-(\w+)$")
///     .expect("example ensures fallible call succeeds");
/// let values = extract_captured_values(&regex, "42-answer")
///     .expect("example ensures fallible call succeeds");
/// assert_eq!(values, vec!["42".to_string(), "answer".to_string()]);
/// assert!(extract_captured_values(&regex, "nope").is_none());
/// ```
#[must_use]
pub fn extract_captured_values(re: &Regex, text: &str) -> Option<Vec<String>> {
    let caps = re.captures(text)?;
    let values = caps
        .iter()
        .skip(1)
        .map(|capture| capture.map_or_else(String::new, |m| m.as_str().to_string()))
        .collect();
    Some(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile_step_pattern;

    #[expect(clippy::expect_used, reason = "tests require descriptive panic messages")]
    fn compiled(source: &str) -> Regex {
        compile_step_pattern(source).expect("test pattern must compile")
    }

    #[test]
    fn returns_none_when_pattern_does_not_match() {
        assert!(extract_captured_values(&compiled(r"^(\d+)$"), "nope").is_none());
    }

    #[test]
    fn collects_captures_in_order() {
        let regex = compiled(r"^(\d+) plus (\d+) is (\w+)$");
        assert_eq!(
            extract_captured_values(&regex, "12 plus 7 is nineteen"),
            Some(vec![
                String::from("12"),
                String::from("7"),
                String::from("nineteen"),
            ])
        );
    }

    #[test]
    fn supports_empty_optional_groups() {
        let regex = compiled(r"^(a)?(b)?$");
        assert_eq!(
            extract_captured_values(&regex, "a"),
            Some(vec![String::from("a"), String::new()])
        );
    }

    #[test]
    fn pattern_without_groups_yields_no_values() {
        let regex = compiled("^the light is green$");
        assert_eq!(
            extract_captured_values(&regex, "the light is green"),
            Some(Vec::new())
        );
    }
}
