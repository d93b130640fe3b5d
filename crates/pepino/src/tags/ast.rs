//! Parsed tag expressions and their evaluation.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::lexer::tokenize;
use super::parser::Parser;

/// A parsed tag filter.
///
/// # Examples
///
/// ```
/// use pepino::TagExpression;
///
/// let filter: TagExpression = "@smoke and not @wip".parse().expect("valid expression");
/// assert!(filter.evaluate(["@smoke", "@api"]));
/// assert!(!filter.evaluate(["@smoke", "@wip"]));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagExpression {
    root: Expr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Expr {
    Tag(String),
    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
}

/// A malformed tag expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid tag expression at byte {offset}: {reason}")]
pub struct TagExprError {
    offset: usize,
    reason: String,
}

impl TagExprError {
    pub(super) fn new(offset: usize, reason: impl Into<String>) -> Self {
        Self {
            offset,
            reason: reason.into(),
        }
    }

    /// Byte offset of the offending input.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// What was wrong at that offset.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl TagExpression {
    /// Parse `input` into an expression.
    ///
    /// # Errors
    ///
    /// Returns [`TagExprError`] locating the first lexical or grammatical
    /// problem.
    pub fn parse(input: &str) -> Result<Self, TagExprError> {
        let tokens = tokenize(input)?;
        let root = Parser::new(&tokens, input.len()).parse()?;
        Ok(Self { root })
    }

    /// Whether the expression holds for `tags` (each including its `@`).
    pub fn evaluate<'a, I>(&self, tags: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        let set: HashSet<&str> = tags.into_iter().collect();
        self.root.holds(&set)
    }

    /// Evaluate against the union of two tag lists, typically a feature's
    /// and a scenario's.
    #[must_use]
    pub fn matches(&self, inherited: &[String], own: &[String]) -> bool {
        self.evaluate(inherited.iter().chain(own).map(String::as_str))
    }
}

impl FromStr for TagExpression {
    type Err = TagExprError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for TagExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.root.fmt(f)
    }
}

impl Expr {
    fn holds(&self, tags: &HashSet<&str>) -> bool {
        match self {
            Self::Tag(tag) => tags.contains(tag.as_str()),
            Self::Not(inner) => !inner.holds(tags),
            Self::And(lhs, rhs) => lhs.holds(tags) && rhs.holds(tags),
            Self::Or(lhs, rhs) => lhs.holds(tags) || rhs.holds(tags),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tag(tag) => f.write_str(tag),
            Self::Not(inner) => write!(f, "not {inner}"),
            Self::And(lhs, rhs) => write!(f, "({lhs} and {rhs})"),
            Self::Or(lhs, rhs) => write!(f, "({lhs} or {rhs})"),
        }
    }
}
