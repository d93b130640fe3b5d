//! Command-line entry point for harness-less test binaries.
//!
//! A test target declared with `harness = false` registers its steps and
//! hooks on an [`Engine`] and hands it to [`run_main`]:
//!
//! ```no_run
//! use std::process::ExitCode;
//!
//! fn main() -> ExitCode {
//!     let mut engine = pepino::Engine::new();
//!     engine.steps_mut().given(r"^a step$", || {}).expect("valid pattern");
//!     pepino::cli::run_main(engine)
//! }
//! ```

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use crate::config::{LogLevel, RunnerConfig};
use crate::engine::Engine;
use crate::error::ExitStatus;
use crate::logging::init_logging;
use crate::tags::TagExpression;

/// Run Gherkin feature files against the registered step definitions.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// Only run scenarios matching this tag expression, e.g. `@smoke and not @wip`.
    #[arg(long)]
    pub tags: Option<TagExpression>,
    /// Log level (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<LogLevel>,
    /// Feature files or directories to search for `*.feature`.
    #[arg(default_value = "tests/features")]
    pub paths: Vec<PathBuf>,
}

/// Parse the process arguments and run `engine` over the selected features.
#[must_use]
pub fn run_main(engine: Engine) -> ExitCode {
    run_with_args(engine, std::env::args_os()).into()
}

/// Like [`run_main`], with explicit arguments (the first is the program
/// name).
#[must_use]
pub fn run_with_args<I, T>(mut engine: Engine, args: I) -> ExitStatus
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args = match Args::try_parse_from(args) {
        Ok(args) => args,
        Err(err) => {
            // Help and version requests end here too.
            let status = if err.use_stderr() {
                ExitStatus::Crashed
            } else {
                ExitStatus::Success
            };
            if let Err(print_err) = err.print() {
                log::error!("failed to print usage: {print_err}");
            }
            return status;
        }
    };

    let config = match RunnerConfig::from_env() {
        Ok(config) => config.apply_overrides(args.log_level, args.tags),
        Err(err) => {
            init_logging(&RunnerConfig::default());
            tracing::error!(error = %err, "invalid configuration");
            return ExitStatus::Crashed;
        }
    };
    init_logging(&config);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        steps = engine.steps().len(),
        "starting pepino"
    );

    engine.set_config(config);
    let status = engine.run_paths(&args.paths);
    tracing::info!(code = status.code(), "finished");
    status
}
