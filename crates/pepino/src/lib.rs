//! Gherkin behaviour-driven test engine.
//!
//! `pepino` reads feature text, builds a typed statement tree and runs it
//! against step definitions registered as ordinary Rust closures:
//!
//! - [`lexer`] turns text into [`Token`]s and [`parser`] builds the
//!   [`FeatureStatement`] tree.
//! - [`StepRegistry`] matches step text against regular expressions, picks
//!   the most specific definition and converts captures into typed
//!   arguments, optionally borrowing a shared context from [`Contexts`].
//! - [`HookRegistry`] holds one callback per lifecycle point.
//! - [`Runner`] walks a feature, expanding scenario outlines, and
//!   [`Engine`] owns everything a harness needs.
//!
//! ```
//! use pepino::{Engine, ExitStatus};
//!
//! #[derive(Default)]
//! struct Calculator {
//!     total: i64,
//! }
//!
//! let mut engine = Engine::new();
//! let steps = engine.steps_mut();
//! steps
//!     .given(r"^a calculator$", || {})
//!     .expect("valid pattern");
//! steps
//!     .register_with_context(pepino::StepKeyword::When, r"^I add (-?\d+)$", |c: &mut Calculator, n: i64| {
//!         c.total += n;
//!     })
//!     .expect("valid pattern");
//! steps
//!     .register_with_context(pepino::StepKeyword::Then, r"^the total is (-?\d+)$", |c: &mut Calculator, n: i64| {
//!         if c.total == n { Ok(()) } else { Err(format!("total is {}", c.total)) }
//!     })
//!     .expect("valid pattern");
//!
//! let feature = "\
//! Feature: Adding
//!   Scenario Outline: Sum
//!     Given a calculator
//!     When I add <a>
//!     And I add <b>
//!     Then the total is <sum>
//!     Examples:
//!       | a | b | sum |
//!       | 1 | 2 | 3   |
//! ";
//! assert_eq!(engine.run_source(feature), ExitStatus::Success);
//! ```

pub mod ast;
pub mod cli;
pub mod config;
mod context;
mod engine;
mod error;
mod hooks;
pub mod lexer;
pub mod logging;
mod panic;
pub mod parser;
mod registry;
pub mod runner;
mod tags;
pub mod token;
mod types;

pub use ast::{
    BackgroundStatement, ExamplesStatement, FeatureStatement, ScenarioOutlineStatement,
    ScenarioStatement, Statement, StepStatement,
};
pub use config::{ConfigError, LogLevel, RunnerConfig};
pub use context::Contexts;
pub use engine::{Engine, gather_features};
pub use error::{EngineError, ExitStatus, StepError};
pub use hooks::{HookError, HookPoint, HookRegistry};
pub use lexer::tokenize;
pub use panic::panic_message;
pub use parser::{ParseError, parse_source};
pub use pepino_patterns::{PatternError, Specificity, StepKeyword, StepKeywordParseError};
pub use registry::{
    ContextStepHandler, DispatchError, FromCapture, IntoStepOutcome, StepDefinition, StepHandler,
    StepRegistry,
};
pub use runner::Runner;
pub use tags::{TagExprError, TagExpression};
pub use token::{Literal, Token, TokenKind};
pub use types::{FeatureInfo, ScenarioInfo, StepInfo};
