//! Statement tree produced by the [`parser`](crate::parser).
//!
//! The tree is plain data owned by a [`FeatureStatement`]. [`Statement`] is a
//! closed, borrowed view over the six node kinds, used wherever code needs to
//! treat nodes uniformly.

use pepino_patterns::StepKeyword;

use crate::token::{Token, TokenKind};

/// A parsed feature file.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "diagnostics", derive(serde::Serialize))]
pub struct FeatureStatement {
    /// Feature name.
    pub name: String,
    /// Tags preceding the `Feature` line, with their leading `@`.
    pub tags: Vec<String>,
    /// Steps prefixed to every scenario and outline.
    pub background: Option<BackgroundStatement>,
    /// Scenarios in source order.
    pub scenarios: Vec<ScenarioStatement>,
    /// Scenario outlines in source order.
    pub scenario_outlines: Vec<ScenarioOutlineStatement>,
}

/// The `Background` block of a feature.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "diagnostics", derive(serde::Serialize))]
pub struct BackgroundStatement {
    /// Background steps.
    pub steps: Vec<StepStatement>,
}

/// A concrete scenario.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "diagnostics", derive(serde::Serialize))]
pub struct ScenarioStatement {
    /// Scenario name.
    pub name: String,
    /// Tags attached to the scenario.
    pub tags: Vec<String>,
    /// Scenario steps.
    pub steps: Vec<StepStatement>,
}

/// A scenario template expanded once per examples row.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "diagnostics", derive(serde::Serialize))]
pub struct ScenarioOutlineStatement {
    /// Outline name.
    pub name: String,
    /// Tags attached to the outline.
    pub tags: Vec<String>,
    /// Template steps, possibly containing placeholders.
    pub steps: Vec<StepStatement>,
    /// Examples table. Running an outline without one is an error.
    pub examples: Option<ExamplesStatement>,
}

/// An `Examples` table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "diagnostics", derive(serde::Serialize))]
pub struct ExamplesStatement {
    /// Column names from the first row.
    pub headers: Vec<String>,
    /// Data rows in source order, including rows whose width is wrong.
    pub rows: Vec<Vec<String>>,
}

impl ExamplesStatement {
    /// Rows whose width matches the header row.
    pub fn valid_rows(&self) -> impl Iterator<Item = &[String]> {
        self.rows
            .iter()
            .filter(|row| row.len() == self.headers.len())
            .map(Vec::as_slice)
    }
}

/// One `Given`/`When`/`Then`/`And`/`But` line.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "diagnostics", derive(serde::Serialize))]
pub struct StepStatement {
    /// Keyword as written.
    #[cfg_attr(feature = "diagnostics", serde(serialize_with = "serialize_keyword"))]
    pub keyword: StepKeyword,
    /// Tokens after the keyword, with `<name>` folded into placeholder tokens.
    pub text: Vec<Token>,
    /// Source line of the keyword.
    pub line: usize,
}

impl StepStatement {
    /// Names of the placeholders used by this step, in order of appearance.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.text.iter().filter_map(Token::placeholder_name)
    }

    /// Whether the step can only run after outline substitution.
    #[must_use]
    pub fn has_placeholders(&self) -> bool {
        self.text.iter().any(|token| token.kind == TokenKind::Placeholder)
    }

    /// Source-like rendering: keyword followed by the token texts.
    #[must_use]
    pub fn source_text(&self) -> String {
        std::iter::once(self.keyword.as_str())
            .chain(self.text.iter().map(|token| token.text.as_str()))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(feature = "diagnostics")]
fn serialize_keyword<S: serde::Serializer>(
    keyword: &StepKeyword,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(keyword.as_str())
}

/// Borrowed view over any statement node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Statement<'a> {
    /// A feature.
    Feature(&'a FeatureStatement),
    /// A background block.
    Background(&'a BackgroundStatement),
    /// A scenario.
    Scenario(&'a ScenarioStatement),
    /// A scenario outline.
    ScenarioOutline(&'a ScenarioOutlineStatement),
    /// An examples table.
    Examples(&'a ExamplesStatement),
    /// A step.
    Step(&'a StepStatement),
}

impl Statement<'_> {
    /// Keyword-style name of the node kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Feature(_) => "Feature",
            Self::Background(_) => "Background",
            Self::Scenario(_) => "Scenario",
            Self::ScenarioOutline(_) => "Scenario Outline",
            Self::Examples(_) => "Examples",
            Self::Step(_) => "Step",
        }
    }

    /// Nesting depth of the node kind below the feature.
    #[must_use]
    pub const fn depth(&self) -> usize {
        match self {
            Self::Feature(_) => 0,
            Self::Background(_) | Self::Scenario(_) | Self::ScenarioOutline(_) => 1,
            Self::Examples(_) | Self::Step(_) => 2,
        }
    }
}

impl FeatureStatement {
    /// Runnable children in execution order: scenarios, then outlines.
    pub fn children(&self) -> impl Iterator<Item = Statement<'_>> {
        self.scenarios
            .iter()
            .map(Statement::Scenario)
            .chain(self.scenario_outlines.iter().map(Statement::ScenarioOutline))
    }

    /// Every node, depth first, in execution order.
    #[must_use]
    pub fn walk(&self) -> Vec<Statement<'_>> {
        let mut nodes = vec![Statement::Feature(self)];
        if let Some(background) = &self.background {
            nodes.push(Statement::Background(background));
            nodes.extend(background.steps.iter().map(Statement::Step));
        }
        for child in self.children() {
            nodes.push(child);
            match child {
                Statement::Scenario(scenario) => {
                    nodes.extend(scenario.steps.iter().map(Statement::Step));
                }
                Statement::ScenarioOutline(outline) => {
                    nodes.extend(outline.steps.iter().map(Statement::Step));
                    nodes.extend(outline.examples.iter().map(Statement::Examples));
                }
                Statement::Feature(_)
                | Statement::Background(_)
                | Statement::Examples(_)
                | Statement::Step(_) => {}
            }
        }
        nodes
    }

    /// Number of scenarios and outlines.
    #[must_use]
    pub fn scenario_count(&self) -> usize {
        self.scenarios.len() + self.scenario_outlines.len()
    }
}
