//! Executes a parsed feature against the step and hook registries.
//!
//! A run fires `BeforeAll`, then each scenario followed by each scenario
//! outline (both wrapped in `Before`/`After`, with the background steps
//! first), then `AfterAll`. Every step is wrapped in `BeforeStep` and
//! `AfterStep`. The first error aborts the run; the hooks that would close
//! the failed work are not called.

use std::collections::HashMap;

use crate::ast::{
    ExamplesStatement, FeatureStatement, ScenarioOutlineStatement, ScenarioStatement, Statement,
    StepStatement,
};
use crate::context::Contexts;
use crate::error::EngineError;
use crate::hooks::HookRegistry;
use crate::registry::StepRegistry;
use crate::tags::TagExpression;
use crate::types::{FeatureInfo, ScenarioInfo, StepInfo};

/// Column name to cell value for one Examples row.
pub type Bindings<'a> = HashMap<&'a str, &'a str>;

/// Borrowing driver for one or more feature runs.
#[derive(Debug)]
pub struct Runner<'e> {
    steps: &'e StepRegistry,
    hooks: &'e mut HookRegistry,
    contexts: &'e mut Contexts,
    tags: Option<&'e TagExpression>,
}

impl<'e> Runner<'e> {
    /// Create a runner over the given registries.
    pub fn new(
        steps: &'e StepRegistry,
        hooks: &'e mut HookRegistry,
        contexts: &'e mut Contexts,
    ) -> Self {
        Self {
            steps,
            hooks,
            contexts,
            tags: None,
        }
    }

    /// Only run scenarios whose tags satisfy `tags`.
    #[must_use]
    pub fn with_tag_filter(mut self, tags: Option<&'e TagExpression>) -> Self {
        self.tags = tags;
        self
    }

    /// Run every scenario and outline of `feature`.
    ///
    /// # Errors
    ///
    /// Returns the first [`EngineError`] raised by a step, a hook, a missing
    /// `Examples` table or an unbound placeholder.
    pub fn run_feature(&mut self, feature: &FeatureStatement) -> Result<(), EngineError> {
        let info = FeatureInfo::from(feature);
        log::info!("Feature: {}", feature.name);
        self.hooks.execute_before_all(&info)?;

        let background = feature
            .background
            .as_ref()
            .map_or(&[][..], |background| background.steps.as_slice());
        for child in feature.children() {
            match child {
                Statement::Scenario(scenario) => {
                    if self.selected(feature, &scenario.tags, &scenario.name) {
                        self.run_scenario(background, scenario)?;
                    }
                }
                Statement::ScenarioOutline(outline) => {
                    if self.selected(feature, &outline.tags, &outline.name) {
                        self.run_outline(background, outline)?;
                    }
                }
                Statement::Feature(_)
                | Statement::Background(_)
                | Statement::Examples(_)
                | Statement::Step(_) => {}
            }
        }

        self.hooks.execute_after_all(&info)?;
        Ok(())
    }

    fn selected(&self, feature: &FeatureStatement, tags: &[String], name: &str) -> bool {
        let Some(filter) = self.tags else {
            return true;
        };
        let keep = filter.matches(&feature.tags, tags);
        if !keep {
            log::warn!("skipping `{name}`: tags do not match `{filter}`");
        }
        keep
    }

    fn run_scenario(
        &mut self,
        background: &[StepStatement],
        scenario: &ScenarioStatement,
    ) -> Result<(), EngineError> {
        let info = ScenarioInfo::from(scenario);
        self.hooks.execute_before(&info)?;
        for step in background.iter().chain(&scenario.steps) {
            self.run_step(step, None)?;
        }
        self.hooks.execute_after(&info)?;
        Ok(())
    }

    fn run_outline(
        &mut self,
        background: &[StepStatement],
        outline: &ScenarioOutlineStatement,
    ) -> Result<(), EngineError> {
        let info = ScenarioInfo::from(outline);
        self.hooks.execute_before(&info)?;
        for step in background {
            self.run_step(step, None)?;
        }
        let Some(examples) = &outline.examples else {
            return Err(EngineError::MissingExamples {
                outline: outline.name.clone(),
            });
        };
        for bindings in example_bindings(examples) {
            for step in &outline.steps {
                self.run_step(step, Some(&bindings))?;
            }
        }
        self.hooks.execute_after(&info)?;
        Ok(())
    }

    fn run_step(
        &mut self,
        step: &StepStatement,
        bindings: Option<&Bindings<'_>>,
    ) -> Result<(), EngineError> {
        let info = StepInfo {
            keyword: step.keyword,
            text: render_step(step, bindings)?,
        };
        self.hooks.execute_before_step(&info)?;
        self.steps.execute(&info.text, self.contexts)?;
        self.hooks.execute_after_step(&info)?;
        Ok(())
    }
}

/// One header-to-cell map per well-formed row, in row order.
///
/// Rows whose width differs from the header row are skipped with a warning.
pub fn example_bindings(examples: &ExamplesStatement) -> Vec<Bindings<'_>> {
    let width = examples.headers.len();
    examples
        .rows
        .iter()
        .enumerate()
        .filter_map(|(index, row)| {
            if row.len() == width {
                Some(
                    examples
                        .headers
                        .iter()
                        .map(String::as_str)
                        .zip(row.iter().map(String::as_str))
                        .collect(),
                )
            } else {
                log::warn!(
                    "skipping Examples row {}: {} cell(s) for {width} header(s)",
                    index + 1,
                    row.len()
                );
                None
            }
        })
        .collect()
}

/// Build the literal text handed to the step registry.
///
/// Token texts are joined with single spaces; placeholders are replaced by
/// their bound value.
///
/// # Errors
///
/// Returns [`EngineError::UnboundPlaceholder`] when a placeholder has no
/// binding, including every placeholder outside an outline.
pub fn render_step(
    step: &StepStatement,
    bindings: Option<&Bindings<'_>>,
) -> Result<String, EngineError> {
    let mut parts = Vec::with_capacity(step.text.len());
    for token in &step.text {
        let Some(name) = token.placeholder_name() else {
            parts.push(token.text.as_str());
            continue;
        };
        let Some(value) = bindings.and_then(|map| map.get(name).copied()) else {
            return Err(EngineError::UnboundPlaceholder {
                name: name.to_string(),
                step: step.source_text(),
            });
        };
        parts.push(value);
    }
    Ok(parts.join(" "))
}

#[cfg(test)]
mod tests;
