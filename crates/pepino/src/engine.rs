//! The engine object owning every registry of a test harness.
//!
//! An [`Engine`] is created once at harness start-up, populated with step
//! definitions and hooks, and then asked to run feature text, files or
//! directories. Hooks and contexts can be reset between test cases.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::ast::FeatureStatement;
use crate::config::RunnerConfig;
use crate::context::Contexts;
use crate::error::{EngineError, ExitStatus};
use crate::hooks::HookRegistry;
use crate::parser::parse_source;
use crate::registry::StepRegistry;
use crate::runner::Runner;

/// Registries, shared contexts and configuration for feature runs.
///
/// # Examples
///
/// ```
/// use pepino::{Engine, ExitStatus};
///
/// let mut engine = Engine::new();
/// engine.steps_mut().given(r"^a step$", || {}).expect("valid pattern");
///
/// let status = engine.run_source("Feature: Demo\n  Scenario: One\n    Given a step\n");
/// assert_eq!(status, ExitStatus::Success);
/// assert_eq!(engine.run_source("no feature here"), ExitStatus::NoFeature);
/// ```
#[derive(Debug, Default)]
pub struct Engine {
    steps: StepRegistry,
    hooks: HookRegistry,
    contexts: Contexts,
    config: RunnerConfig,
}

impl Engine {
    /// Create an engine with empty registries and default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with the given configuration.
    #[must_use]
    pub fn with_config(config: RunnerConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Step definitions.
    #[must_use]
    pub fn steps(&self) -> &StepRegistry {
        &self.steps
    }

    /// Step definitions, for registration.
    pub fn steps_mut(&mut self) -> &mut StepRegistry {
        &mut self.steps
    }

    /// Hook slots.
    #[must_use]
    pub fn hooks(&self) -> &HookRegistry {
        &self.hooks
    }

    /// Hook slots, for registration.
    pub fn hooks_mut(&mut self) -> &mut HookRegistry {
        &mut self.hooks
    }

    /// Shared context instances.
    #[must_use]
    pub fn contexts(&self) -> &Contexts {
        &self.contexts
    }

    /// Shared context instances, for inspection or reset.
    pub fn contexts_mut(&mut self) -> &mut Contexts {
        &mut self.contexts
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Replace the configuration.
    pub fn set_config(&mut self, config: RunnerConfig) {
        self.config = config;
    }

    /// Empty every hook slot.
    pub fn clear_hooks(&mut self) {
        self.hooks.clear_hooks();
    }

    /// Run an already parsed feature.
    ///
    /// # Errors
    ///
    /// Returns the first [`EngineError`] raised during the run.
    pub fn run_feature(&mut self, feature: &FeatureStatement) -> Result<(), EngineError> {
        Runner::new(&self.steps, &mut self.hooks, &mut self.contexts)
            .with_tag_filter(self.config.tags.as_ref())
            .run_feature(feature)
    }

    /// Parse and run feature text.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Parse`] for malformed text, otherwise the
    /// first error raised during the run.
    pub fn try_run_source(&mut self, source: &str) -> Result<(), EngineError> {
        let feature = parse_source(source)?;
        self.run_feature(&feature)
    }

    /// Parse and run feature text, reporting the outcome as an exit status.
    pub fn run_source(&mut self, source: &str) -> ExitStatus {
        self.try_run_source(source).into()
    }

    /// Read, parse and run one feature file.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Io`] if the file cannot be read, otherwise as
    /// [`try_run_source`](Self::try_run_source).
    pub fn try_run_file(&mut self, path: &Path) -> Result<(), EngineError> {
        log::info!("running {}", path.display());
        let source = fs::read_to_string(path).map_err(|source| EngineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.try_run_source(&source)
    }

    /// Run one feature file, reporting the outcome as an exit status.
    pub fn run_file(&mut self, path: &Path) -> ExitStatus {
        self.try_run_file(path).into()
    }

    /// Run every feature file under `paths`, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NoFeatureFiles`] when nothing was found, or the
    /// first error raised while reading or running a file.
    pub fn try_run_paths(&mut self, paths: &[PathBuf]) -> Result<(), EngineError> {
        let files = gather_features(paths)?;
        if files.is_empty() {
            return Err(EngineError::NoFeatureFiles {
                paths: paths.to_vec(),
            });
        }
        for file in &files {
            self.try_run_file(file)?;
        }
        Ok(())
    }

    /// Run every feature file under `paths`, reporting an exit status.
    pub fn run_paths(&mut self, paths: &[PathBuf]) -> ExitStatus {
        self.try_run_paths(paths).into()
    }
}

/// Collect `.feature` files from files and directories, sorted by path.
///
/// Explicit file arguments are kept whatever their extension; directories
/// are walked recursively for `*.feature`.
///
/// # Errors
///
/// Returns [`EngineError::Io`] when a path or directory entry cannot be read.
pub fn gather_features(paths: &[PathBuf]) -> Result<Vec<PathBuf>, EngineError> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_file() {
            files.push(path.clone());
            continue;
        }
        for entry in WalkDir::new(path) {
            let entry = entry.map_err(|err| EngineError::Io {
                path: err.path().unwrap_or(path.as_path()).to_path_buf(),
                source: err.into(),
            })?;
            if entry.file_type().is_file() && is_feature_file(entry.path()) {
                files.push(entry.into_path());
            }
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}

fn is_feature_file(path: &Path) -> bool {
    path.extension() == Some(OsStr::new("feature"))
}
