//! Command line diagnostics for pepino feature files.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use eyre::{Result, WrapErr};
use pepino::logging::init_logging;
use pepino::{LogLevel, RunnerConfig, gather_features};
use pepino_cli::{load_feature, summarise, tokens_json, write_expansion, write_tree};

/// Inspect feature files without running them.
#[derive(Parser)]
#[command(name = "pepino", author, version, about)]
struct Cli {
    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    log_level: Option<LogLevel>,
    #[command(subcommand)]
    command: Commands,
}

/// Supported diagnostic commands.
#[derive(Subcommand)]
enum Commands {
    /// Parse feature files and report their structure.
    Check {
        /// Print every node instead of a one-line summary.
        #[arg(long)]
        tree: bool,
        /// Feature files or directories.
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Dump the lexer output of a feature file as JSON.
    Tokens {
        /// Feature file.
        path: PathBuf,
    },
    /// Print the concrete steps every scenario runs, outlines expanded.
    Expand {
        /// Feature file.
        path: PathBuf,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = RunnerConfig::from_env()?.apply_overrides(cli.log_level, None);
    init_logging(&config);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting pepino");

    let mut stdout = io::stdout().lock();
    match cli.command {
        Commands::Check { tree, paths } => handle_check(&mut stdout, &paths, tree),
        Commands::Tokens { path } => {
            let source = std::fs::read_to_string(&path)
                .wrap_err_with(|| format!("failed to read {}", path.display()))?;
            writeln!(stdout, "{}", tokens_json(&source)?)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Expand { path } => {
            let feature = load_feature(&path)?;
            write_expansion(&mut stdout, &feature)
                .wrap_err_with(|| format!("failed to expand {}", path.display()))?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Parse every feature under `paths`, reporting each file.
///
/// Exits with status 1 when any file fails to parse.
fn handle_check(out: &mut dyn Write, paths: &[PathBuf], tree: bool) -> Result<ExitCode> {
    let files = gather_features(paths)?;
    if files.is_empty() {
        eyre::bail!("no feature files found");
    }
    let mut failures = 0_usize;
    for file in &files {
        match load_feature(file) {
            Ok(feature) if tree => {
                writeln!(out, "{}:", file.display())?;
                write_tree(out, &feature)?;
            }
            Ok(feature) => writeln!(out, "{}: {}", file.display(), summarise(&feature))?,
            Err(err) => {
                failures += 1;
                writeln!(out, "{}: error: {err:#}", file.display())?;
            }
        }
    }
    tracing::info!(files = files.len(), failures, "check finished");
    Ok(if failures == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
