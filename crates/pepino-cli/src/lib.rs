//! Report builders behind the `pepino` diagnostic command.
//!
//! Reports are written to any [`Write`] sink so the binary can target stdout
//! and tests can capture the bytes.

use std::fs;
use std::io::Write;
use std::path::Path;

use eyre::{Result, WrapErr};
use pepino::runner::{Bindings, example_bindings, render_step};
use pepino::{EngineError, FeatureStatement, Statement, StepStatement, parse_source, tokenize};

/// Read and parse one feature file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid feature.
pub fn load_feature(path: &Path) -> Result<FeatureStatement> {
    let source = fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read {}", path.display()))?;
    parse_source(&source).wrap_err_with(|| format!("failed to parse {}", path.display()))
}

/// One-line summary of a parsed feature.
#[must_use]
pub fn summarise(feature: &FeatureStatement) -> String {
    let steps: usize = feature
        .walk()
        .iter()
        .filter(|node| matches!(node, Statement::Step(_)))
        .count();
    format!(
        "Feature: {} ({} scenario(s), {} outline(s), {steps} step(s))",
        feature.name,
        feature.scenarios.len(),
        feature.scenario_outlines.len(),
    )
}

/// Write an indented outline of every node in the feature.
///
/// # Errors
///
/// Returns an error if writing to `writer` fails.
pub fn write_tree(writer: &mut dyn Write, feature: &FeatureStatement) -> Result<()> {
    for node in feature.walk() {
        let indent = "  ".repeat(node.depth());
        let label = match node {
            Statement::Feature(feature) => format!("Feature: {}", feature.name),
            Statement::Background(_) => "Background".to_string(),
            Statement::Scenario(scenario) => {
                with_tags(&format!("Scenario: {}", scenario.name), &scenario.tags)
            }
            Statement::ScenarioOutline(outline) => {
                with_tags(&format!("Scenario Outline: {}", outline.name), &outline.tags)
            }
            Statement::Examples(examples) => format!(
                "Examples: {} column(s), {} row(s)",
                examples.headers.len(),
                examples.rows.len()
            ),
            Statement::Step(step) => step.source_text(),
        };
        writeln!(writer, "{indent}{label}")
            .wrap_err_with(|| format!("failed to write tree node `{label}`"))?;
    }
    Ok(())
}

fn with_tags(label: &str, tags: &[String]) -> String {
    if tags.is_empty() {
        label.to_string()
    } else {
        format!("{label} [{}]", tags.join(" "))
    }
}

/// Lexer output for `source` as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if serialisation fails.
pub fn tokens_json(source: &str) -> Result<String> {
    serde_json::to_string_pretty(&tokenize(source)).wrap_err("failed to serialise tokens")
}

/// Write every concrete step each scenario runs, with outlines expanded per
/// row.
///
/// # Errors
///
/// Returns an error for an outline without `Examples`, a placeholder that no
/// column binds, or a failed write.
pub fn write_expansion(writer: &mut dyn Write, feature: &FeatureStatement) -> Result<()> {
    let background = feature
        .background
        .as_ref()
        .map_or(&[][..], |background| background.steps.as_slice());
    for child in feature.children() {
        match child {
            Statement::Scenario(scenario) => {
                writeln!(writer, "Scenario: {}", scenario.name)
                    .wrap_err_with(|| format!("failed to write scenario `{}`", scenario.name))?;
                write_steps(writer, background.iter().chain(&scenario.steps), None)?;
            }
            Statement::ScenarioOutline(outline) => {
                let Some(examples) = &outline.examples else {
                    return Err(EngineError::MissingExamples {
                        outline: outline.name.clone(),
                    }
                    .into());
                };
                for (index, bindings) in example_bindings(examples).iter().enumerate() {
                    writeln!(writer, "Scenario Outline: {} #{}", outline.name, index + 1)
                        .wrap_err_with(|| format!("failed to write outline `{}`", outline.name))?;
                    write_steps(writer, background.iter().chain(&outline.steps), Some(bindings))?;
                }
            }
            Statement::Feature(_)
            | Statement::Background(_)
            | Statement::Examples(_)
            | Statement::Step(_) => {}
        }
    }
    Ok(())
}

fn write_steps<'a>(
    writer: &mut dyn Write,
    steps: impl Iterator<Item = &'a StepStatement>,
    bindings: Option<&Bindings<'_>>,
) -> Result<()> {
    for step in steps {
        let text = render_step(step, bindings)?;
        writeln!(writer, "  {} {text}", step.keyword)
            .wrap_err_with(|| format!("failed to write step `{text}`"))?;
    }
    Ok(())
}
