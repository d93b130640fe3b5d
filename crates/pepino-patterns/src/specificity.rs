//! Pattern specificity calculation for disambiguation.
//!
//! When several step patterns match the same step text, the registry picks
//! the one with the highest score. The score is a pure function of the
//! pattern source: literal text counts most, anchors and character classes
//! count a little, and broad escapes such as `\w` barely count at all.

use std::fmt;

use crate::pattern::lexer::lex_pattern;

/// Specificity score for a step pattern.
///
/// | construct | score |
/// |---|---|
/// | `\d` | 2 |
/// | `\w` | 1 |
/// | `^` or `$` | 3 |
/// | `[...]` | bytes inside the brackets, minimum 1 |
/// | ASCII letter or digit | 4 |
/// | anything else | 0 |
///
/// # Examples
///
/// ```
/// use pepino_patterns::Specificity;
///
/// let specific = Specificity::calculate(r"^I have 3 apples$");
/// let generic = Specificity::calculate(r"^I have (\d+) apples$");
/// assert!(specific > generic);
/// assert_eq!(Specificity::calculate(r"^\d+ items$").value(), 28);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Specificity(usize);

impl Specificity {
    /// Calculate the specificity score for a pattern string.
    #[must_use]
    pub fn calculate(pattern: &str) -> Self {
        Self(lex_pattern(pattern).into_iter().map(|token| token.weight()).sum())
    }

    /// Raw score value.
    #[must_use]
    pub const fn value(self) -> usize {
        self.0
    }
}

impl fmt::Display for Specificity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
