//! Unit tests for feature execution order and outline expansion.
#![expect(clippy::expect_used, reason = "tests require descriptive panic messages")]

use std::cell::RefCell;
use std::rc::Rc;

use pepino_patterns::StepKeyword;
use rstest::rstest;

use super::*;
use crate::error::{ExitStatus, StepError};
use crate::hooks::{HookError, HookPoint};
use crate::parser::parse_source;

type Journal = Rc<RefCell<Vec<String>>>;

struct Harness {
    steps: StepRegistry,
    hooks: HookRegistry,
    contexts: Contexts,
    journal: Journal,
}

impl Harness {
    /// Registers a catch-all step and records every hook and step call.
    fn new() -> Self {
        let journal: Journal = Rc::default();
        let mut steps = StepRegistry::new();
        let sink = Rc::clone(&journal);
        steps
            .given(r"^(.*)$", move |text: String| {
                sink.borrow_mut().push(format!("step {text}"));
            })
            .expect("valid pattern");

        let mut hooks = HookRegistry::new();
        let sink = Rc::clone(&journal);
        hooks
            .register_before_all(move |f| sink.borrow_mut().push(format!("BeforeAll {}", f.name)))
            .expect("empty slot");
        let sink = Rc::clone(&journal);
        hooks
            .register_after_all(move |f| sink.borrow_mut().push(format!("AfterAll {}", f.name)))
            .expect("empty slot");
        let sink = Rc::clone(&journal);
        hooks
            .register_before(move |s| sink.borrow_mut().push(format!("Before {}", s.name)))
            .expect("empty slot");
        let sink = Rc::clone(&journal);
        hooks
            .register_after(move |s| sink.borrow_mut().push(format!("After {}", s.name)))
            .expect("empty slot");
        let sink = Rc::clone(&journal);
        hooks
            .register_before_step(move |s| sink.borrow_mut().push(format!("BeforeStep {s}")))
            .expect("empty slot");
        let sink = Rc::clone(&journal);
        hooks
            .register_after_step(move |s| sink.borrow_mut().push(format!("AfterStep {s}")))
            .expect("empty slot");

        Self {
            steps,
            hooks,
            contexts: Contexts::new(),
            journal,
        }
    }

    fn run(&mut self, source: &str, tags: Option<&TagExpression>) -> Result<(), EngineError> {
        let feature = parse_source(source).expect("feature should parse");
        Runner::new(&self.steps, &mut self.hooks, &mut self.contexts)
            .with_tag_filter(tags)
            .run_feature(&feature)
    }

    fn journal(&self) -> Vec<String> {
        self.journal.borrow().clone()
    }
}

#[rstest]
fn hooks_wrap_background_and_scenario_steps() {
    let mut harness = Harness::new();
    let source = "\
Feature: Ordering
  Background:
    Given a fresh start
  Scenario: Only
    When something happens
    Then it is observed
";
    assert!(harness.run(source, None).is_ok());
    assert_eq!(
        harness.journal(),
        [
            "BeforeAll Ordering",
            "Before Only",
            "BeforeStep Given a fresh start",
            "step a fresh start",
            "AfterStep Given a fresh start",
            "BeforeStep When something happens",
            "step something happens",
            "AfterStep When something happens",
            "BeforeStep Then it is observed",
            "step it is observed",
            "AfterStep Then it is observed",
            "After Only",
            "AfterAll Ordering",
        ]
    );
}

fn reject_bad_scenarios(scenario: &ScenarioInfo) {
    assert_ne!(scenario.name, "Bad", "scenario `Bad` must not finish");
}

#[rstest]
fn panicking_after_hook_fails_the_run() {
    let mut harness = Harness::new();
    harness.hooks.clear_hooks();
    harness
        .hooks
        .register_after(reject_bad_scenarios)
        .expect("empty slot");
    let source = "Feature: F\n  Scenario: Bad\n    Given a step\n  Scenario: Later\n    Given another\n";

    let err = harness.run(source, None).expect_err("the After hook panics");
    assert!(matches!(
        &err,
        EngineError::Hook(HookError::Failed { point: HookPoint::After, message })
            if message.contains("scenario `Bad` must not finish")
    ));
    assert_eq!(err.exit_status(), ExitStatus::TestFailed);
    assert_eq!(harness.journal(), ["step a step"]);
}

#[rstest]
fn failing_before_step_hook_skips_the_step() {
    let mut harness = Harness::new();
    harness.hooks.clear_hooks();
    harness
        .hooks
        .register_before_step(|step: &StepInfo| {
            if step.text == "forbidden" {
                Err("not on this stage")
            } else {
                Ok(())
            }
        })
        .expect("empty slot");
    let source = "Feature: F\n  Scenario: S\n    Given allowed\n    Given forbidden\n";

    let err = harness.run(source, None).expect_err("the BeforeStep hook fails");
    assert_eq!(
        err.to_string(),
        "BeforeStep hook failed: not on this stage"
    );
    assert_eq!(harness.journal(), ["step allowed"]);
}

#[rstest]
fn outline_runs_once_per_row_in_order() {
    let mut harness = Harness::new();
    let source = "\
Feature: Sums
  Scenario Outline: Add
    Given <x> plus <y>
    Examples:
      | x | y |
      | 1 | 2 |
      | 3 | 4 |
";
    assert!(harness.run(source, None).is_ok());
    let steps: Vec<String> = harness
        .journal()
        .into_iter()
        .filter(|entry| entry.starts_with("step "))
        .collect();
    assert_eq!(steps, ["step 1 plus 2", "step 3 plus 4"]);
}

#[rstest]
fn mismatched_rows_are_skipped() {
    let mut harness = Harness::new();
    let source = "\
Feature: Sums
  Scenario Outline: Add
    Given <x> plus <y>
    Examples:
      | x | y |
      | 1 | 2 |
      | 9 |
      | 3 | 4 |
";
    assert!(harness.run(source, None).is_ok());
    let steps: Vec<String> = harness
        .journal()
        .into_iter()
        .filter(|entry| entry.starts_with("step "))
        .collect();
    assert_eq!(steps, ["step 1 plus 2", "step 3 plus 4"]);
}

#[rstest]
fn placeholder_outside_outline_is_unbound() {
    let mut harness = Harness::new();
    let source = "\
Feature: Broken
  Scenario: Plain
    Given a user <name>
";
    let Err(err) = harness.run(source, None) else {
        panic!("unbound placeholder should fail");
    };
    assert!(matches!(
        &err,
        EngineError::UnboundPlaceholder { name, step } if name == "name" && step == "Given a user <name>"
    ));
    assert!(!harness.journal().iter().any(|e| e.starts_with("After ")));
}

#[rstest]
fn placeholder_missing_from_headers_is_unbound() {
    let mut harness = Harness::new();
    let source = "\
Feature: Broken
  Scenario Outline: Outline
    Given <x> and <z>
    Examples:
      | x |
      | 1 |
";
    assert!(matches!(
        harness.run(source, None),
        Err(EngineError::UnboundPlaceholder { ref name, .. }) if name == "z"
    ));
}

#[rstest]
fn outline_without_examples_fails() {
    let mut harness = Harness::new();
    let source = "\
Feature: Broken
  Scenario Outline: Empty
    Given <x>
";
    assert!(matches!(
        harness.run(source, None),
        Err(EngineError::MissingExamples { ref outline }) if outline == "Empty"
    ));
}

#[rstest]
fn step_failure_stops_the_run() {
    let mut harness = Harness::new();
    harness
        .steps
        .given(r"^it fails$", || Err::<(), _>("nope"))
        .expect("valid pattern");
    let source = "\
Feature: Failing
  Scenario: First
    Given it fails
    Then never reached
  Scenario: Second
    Given never reached either
";
    let Err(EngineError::Step(StepError::Failed { text, message })) = harness.run(source, None)
    else {
        panic!("step failure should surface");
    };
    assert_eq!((text.as_str(), message.as_str()), ("it fails", "nope"));
    let journal = harness.journal();
    assert!(!journal.iter().any(|e| e.contains("never reached")));
    assert!(!journal.iter().any(|e| e.starts_with("AfterAll")));
}

#[rstest]
fn tag_filter_skips_unmatched_scenarios() {
    let mut harness = Harness::new();
    let filter = TagExpression::parse("@fast").expect("valid expression");
    let source = "\
Feature: Filtered
  @fast
  Scenario: Quick
    Given quick work
  @slow
  Scenario: Lengthy
    Given slow work
";
    assert!(harness.run(source, Some(&filter)).is_ok());
    let journal = harness.journal();
    assert!(journal.contains(&"step quick work".to_string()));
    assert!(!journal.iter().any(|e| e.contains("Lengthy") || e.contains("slow work")));
    assert!(journal.contains(&"AfterAll Filtered".to_string()));
}

#[rstest]
fn feature_tags_are_inherited_by_the_filter() {
    let mut harness = Harness::new();
    let filter = TagExpression::parse("@api and @smoke").expect("valid expression");
    let source = "\
@api
Feature: Inherited
  @smoke
  Scenario: Selected
    Given selected work
";
    assert!(harness.run(source, Some(&filter)).is_ok());
    assert!(harness.journal().contains(&"step selected work".to_string()));
}

#[rstest]
fn render_joins_tokens_and_substitutes() {
    let feature = parse_source(
        "Feature: F\n  Scenario Outline: O\n    Given I   have <n> apples\n    Examples:\n      | n |\n      | 5 |\n",
    )
    .expect("feature should parse");
    let step = feature
        .scenario_outlines
        .first()
        .and_then(|outline| outline.steps.first())
        .expect("outline step");
    let bindings: Bindings<'_> = [("n", "5")].into_iter().collect();
    assert_eq!(
        render_step(step, Some(&bindings)).expect("bound"),
        "I have 5 apples"
    );
    assert_eq!(step.keyword, StepKeyword::Given);
}

#[rstest]
fn example_bindings_map_headers_to_cells() {
    let examples = ExamplesStatement {
        headers: vec!["a".into(), "b".into()],
        rows: vec![vec!["1".into(), "2".into()], vec!["x".into()]],
    };
    let rows = example_bindings(&examples);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows.first().and_then(|row| row.get("b")), Some(&"2"));
}
