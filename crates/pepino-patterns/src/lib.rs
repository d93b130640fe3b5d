//! Step-pattern utilities shared by the pepino engine and its tooling.
//!
//! Step definitions are registered with regular expressions. This crate
//! compiles those expressions so that they only accept a whole step line,
//! extracts the positional captures handed to step callbacks and scores
//! patterns so that the most specific definition wins when several match.

mod capture;
mod errors;
mod keyword;
mod pattern;
mod specificity;

pub use capture::extract_captured_values;
pub use errors::PatternError;
pub use keyword::{StepKeyword, StepKeywordParseError};
pub use pattern::compile_step_pattern;
pub use specificity::Specificity;
