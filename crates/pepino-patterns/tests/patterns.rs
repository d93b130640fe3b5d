//! Public API checks for pattern compilation, capture and scoring.
#![expect(clippy::expect_used, reason = "tests use descriptive failures")]

use pepino_patterns::{Specificity, StepKeyword, compile_step_pattern, extract_captured_values};

#[test]
fn compiles_and_extracts_arguments() {
    let regex = compile_step_pattern(r#"^a user "(\w+)" with (\d+) credits$"#)
        .expect("pattern should compile");
    let captures = extract_captured_values(&regex, r#"a user "alice" with 30 credits"#)
        .expect("expected captures for test step");
    assert_eq!(captures, vec!["alice".to_string(), "30".to_string()]);
}

#[test]
fn substring_matches_are_rejected() {
    let regex = compile_step_pattern(r"(\d+) credits").expect("pattern should compile");
    assert!(extract_captured_values(&regex, "with 30 credits").is_none());
}

#[test]
fn ranks_overlapping_patterns() {
    let mut patterns = [
        r"^(.*)$",
        r"^the total is (\d+)$",
        r"^the total is 10$",
        r"^the (\w+) is (\d+)$",
    ];
    patterns.sort_by_key(|p| std::cmp::Reverse(Specificity::calculate(p)));
    assert_eq!(
        patterns,
        [
            r"^the total is 10$",
            r"^the total is (\d+)$",
            r"^the (\w+) is (\d+)$",
            r"^(.*)$",
        ]
    );
}

#[test]
fn keywords_round_trip_through_text() {
    for keyword in StepKeyword::ALL {
        assert_eq!(
            keyword.as_str().parse::<StepKeyword>().expect("canonical name parses"),
            keyword
        );
    }
}
