//! Tag expressions for selecting which scenarios run.
//!
//! An expression combines `@tag` atoms with `not`, `and` and `or` (in
//! decreasing binding strength, keywords case-insensitive) and parentheses:
//! `@smoke and not (@wip or @slow)`. A scenario is selected when the
//! expression holds for the union of its own tags and its feature's tags.

mod ast;
mod lexer;
mod parser;

pub use ast::{TagExprError, TagExpression};

#[cfg(test)]
mod tests;
