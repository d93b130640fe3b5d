//! Error taxonomy for step execution and feature runs.

use std::path::PathBuf;
use std::process::ExitCode;

use thiserror::Error;

use crate::hooks::HookError;
use crate::parser::ParseError;

/// Failure while resolving or running a single step.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StepError {
    /// No registered pattern matches the whole step text.
    #[error("No matching step found for: {text}")]
    NoMatch {
        /// Step text after the keyword.
        text: String,
    },
    /// The pattern captured a different number of groups than the callback
    /// declares.
    #[error(
        "step `{text}` matched `{pattern}`, whose callback takes {expected} argument(s) but {actual} were captured"
    )]
    ArgumentCountMismatch {
        /// Step text after the keyword.
        text: String,
        /// Source of the winning pattern.
        pattern: String,
        /// Non-context parameters declared by the callback.
        expected: usize,
        /// Capture groups produced by the pattern.
        actual: usize,
    },
    /// A captured value could not be converted to the declared type.
    #[error("step `{text}`: cannot convert argument {index} `{value}` to `{target}`: {reason}")]
    Conversion {
        /// Step text after the keyword.
        text: String,
        /// Source of the winning pattern.
        pattern: String,
        /// Zero-based argument position.
        index: usize,
        /// Captured substring.
        value: String,
        /// Declared parameter type.
        target: &'static str,
        /// Parser message.
        reason: String,
    },
    /// The callback reported a failure or panicked.
    #[error("step `{text}` failed: {message}")]
    Failed {
        /// Step text after the keyword.
        text: String,
        /// Error or panic message.
        message: String,
    },
}

/// Any error that aborts a feature run.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The feature text is malformed.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// A step could not be resolved or failed.
    #[error(transparent)]
    Step(#[from] StepError),
    /// A lifecycle hook failed or panicked.
    #[error(transparent)]
    Hook(#[from] HookError),
    /// A `<placeholder>` reached step execution without a value.
    #[error("unbound placeholder `<{name}>` in step `{step}`")]
    UnboundPlaceholder {
        /// Placeholder name.
        name: String,
        /// Step as written in the feature.
        step: String,
    },
    /// A scenario outline has no `Examples` table.
    #[error("Scenario Outline `{outline}` has no Examples")]
    MissingExamples {
        /// Outline name.
        outline: String,
    },
    /// No feature file was found under the given paths.
    #[error("no feature files found in {}", display_paths(.paths))]
    NoFeatureFiles {
        /// Paths that were searched.
        paths: Vec<PathBuf>,
    },
    /// A feature file or directory could not be read.
    #[error("failed to read `{}`", .path.display())]
    Io {
        /// Offending path.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|path| format!("`{}`", path.display()))
        .collect::<Vec<_>>()
        .join(", ")
}

impl EngineError {
    /// Process status this error maps to.
    #[must_use]
    pub fn exit_status(&self) -> ExitStatus {
        match self {
            Self::Parse(ParseError::MissingFeature) | Self::NoFeatureFiles { .. } => {
                ExitStatus::NoFeature
            }
            Self::Step(StepError::Failed { .. }) | Self::Hook(HookError::Failed { .. }) => {
                ExitStatus::TestFailed
            }
            _ => ExitStatus::Crashed,
        }
    }
}

/// Outcome of a run, mapped onto a process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExitStatus {
    /// Every step passed.
    Success,
    /// Nothing to run: the input held no feature.
    NoFeature,
    /// The engine hit a configuration, parse or dispatch error.
    Crashed,
    /// A step or hook callback failed.
    TestFailed,
}

impl ExitStatus {
    /// Numeric process exit code.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::NoFeature => 1,
            Self::Crashed => 2,
            Self::TestFailed => 42,
        }
    }

    /// Whether the run passed.
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        Self::from(status.code())
    }
}

impl<E: Into<EngineError>> From<Result<(), E>> for ExitStatus {
    fn from(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => Self::Success,
            Err(err) => {
                let err = err.into();
                log::error!("{err}");
                err.exit_status()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::HookPoint;
    use crate::token::{Token, TokenKind};
    use rstest::rstest;

    fn failed() -> EngineError {
        EngineError::Step(StepError::Failed {
            text: "the total is 3".into(),
            message: "expected 3, got 4".into(),
        })
    }

    #[rstest]
    #[case(EngineError::Parse(ParseError::MissingFeature), ExitStatus::NoFeature)]
    #[case(EngineError::NoFeatureFiles { paths: vec![] }, ExitStatus::NoFeature)]
    #[case(failed(), ExitStatus::TestFailed)]
    #[case(
        EngineError::Step(StepError::NoMatch { text: "x".into() }),
        ExitStatus::Crashed
    )]
    #[case(
        EngineError::Parse(ParseError::unexpected("bad", &Token::new(TokenKind::Eol, "\n", 1))),
        ExitStatus::Crashed
    )]
    #[case(
        EngineError::Hook(HookError::Failed { point: HookPoint::After, message: "dirty".into() }),
        ExitStatus::TestFailed
    )]
    #[case(
        EngineError::Hook(HookError::AlreadyRegistered(HookPoint::Before)),
        ExitStatus::Crashed
    )]
    #[case(
        EngineError::MissingExamples { outline: "o".into() },
        ExitStatus::Crashed
    )]
    #[case(
        EngineError::UnboundPlaceholder { name: "x".into(), step: "Given <x>".into() },
        ExitStatus::Crashed
    )]
    fn maps_errors_to_exit_status(#[case] error: EngineError, #[case] expected: ExitStatus) {
        assert_eq!(error.exit_status(), expected);
    }

    #[rstest]
    #[case(ExitStatus::Success, 0)]
    #[case(ExitStatus::NoFeature, 1)]
    #[case(ExitStatus::Crashed, 2)]
    #[case(ExitStatus::TestFailed, 42)]
    fn exit_codes_are_stable(#[case] status: ExitStatus, #[case] code: u8) {
        assert_eq!(status.code(), code);
    }

    #[test]
    fn converts_results_into_status() {
        assert_eq!(ExitStatus::from(Ok::<(), EngineError>(())), ExitStatus::Success);
        assert_eq!(ExitStatus::from(Err::<(), _>(failed())), ExitStatus::TestFailed);
    }

    #[test]
    fn no_match_message_contains_the_text_verbatim() {
        let err = StepError::NoMatch {
            text: r#"a user "bob" exists"#.into(),
        };
        assert_eq!(err.to_string(), r#"No matching step found for: a user "bob" exists"#);
    }

    #[test]
    fn unbound_placeholder_names_the_step() {
        let err = EngineError::UnboundPlaceholder {
            name: "user".into(),
            step: "Given <user> logs in".into(),
        };
        assert_eq!(
            err.to_string(),
            "unbound placeholder `<user>` in step `Given <user> logs in`"
        );
    }

    #[test]
    fn no_feature_files_lists_paths() {
        let err = EngineError::NoFeatureFiles {
            paths: vec![PathBuf::from("a"), PathBuf::from("b/c")],
        };
        assert_eq!(err.to_string(), "no feature files found in `a`, `b/c`");
    }
}
