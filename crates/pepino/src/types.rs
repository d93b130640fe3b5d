//! Lightweight descriptions of the items hooks observe.

use std::fmt;

use pepino_patterns::StepKeyword;

use crate::ast::{FeatureStatement, ScenarioOutlineStatement, ScenarioStatement};

/// Feature passed to `BeforeAll` and `AfterAll` hooks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureInfo {
    /// Feature title.
    pub name: String,
    /// Tags declared on the feature, including the `@`.
    pub tags: Vec<String>,
}

impl From<&FeatureStatement> for FeatureInfo {
    fn from(feature: &FeatureStatement) -> Self {
        Self {
            name: feature.name.clone(),
            tags: feature.tags.clone(),
        }
    }
}

/// Scenario passed to `Before` and `After` hooks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioInfo {
    /// Scenario or outline title.
    pub name: String,
    /// Tags declared on the scenario itself.
    pub tags: Vec<String>,
}

impl From<&ScenarioStatement> for ScenarioInfo {
    fn from(scenario: &ScenarioStatement) -> Self {
        Self {
            name: scenario.name.clone(),
            tags: scenario.tags.clone(),
        }
    }
}

impl From<&ScenarioOutlineStatement> for ScenarioInfo {
    fn from(outline: &ScenarioOutlineStatement) -> Self {
        Self {
            name: outline.name.clone(),
            tags: outline.tags.clone(),
        }
    }
}

/// Step passed to `BeforeStep` and `AfterStep` hooks.
///
/// `text` is the literal handed to the step registry, with outline
/// placeholders already substituted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepInfo {
    /// Keyword as written in the feature.
    pub keyword: StepKeyword,
    /// Step text without the keyword.
    pub text: String,
}

impl fmt::Display for StepInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.keyword, self.text)
    }
}
