//! Step keywords.
//!
//! The lexer recognises these words only at the start of a line; the same
//! enum is stored on step definitions and reported to step hooks.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Keyword introducing a step line, kept exactly as written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKeyword {
    /// `Given`
    Given,
    /// `When`
    When,
    /// `Then`
    Then,
    /// `And`
    And,
    /// `But`
    But,
}

impl StepKeyword {
    /// Every keyword, in the order they are usually written.
    pub const ALL: [Self; 5] = [Self::Given, Self::When, Self::Then, Self::And, Self::But];

    /// Canonical spelling.
    ///
    /// ```
    /// use pepino_patterns::StepKeyword;
    ///
    /// assert_eq!(StepKeyword::But.as_str(), "But");
    /// ```
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Given => "Given",
            Self::When => "When",
            Self::Then => "Then",
            Self::And => "And",
            Self::But => "But",
        }
    }

    /// Whether the keyword continues the previous step rather than opening a
    /// new phase.
    #[must_use]
    pub const fn is_conjunction(self) -> bool {
        matches!(self, Self::And | Self::But)
    }
}

impl fmt::Display for StepKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A word that is not one of the five step keywords.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("`{word}` is not a step keyword (expected Given, When, Then, And or But)")]
pub struct StepKeywordParseError {
    word: String,
}

impl StepKeywordParseError {
    /// The rejected word, trimmed.
    #[must_use]
    pub fn word(&self) -> &str {
        &self.word
    }
}

impl FromStr for StepKeyword {
    type Err = StepKeywordParseError;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let word = value.trim();
        Self::ALL
            .into_iter()
            .find(|keyword| word.eq_ignore_ascii_case(keyword.as_str()))
            .ok_or_else(|| StepKeywordParseError {
                word: word.to_owned(),
            })
    }
}
