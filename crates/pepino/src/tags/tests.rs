//! Parsing, precedence and error reporting for tag expressions.

use rstest::rstest;

use super::TagExpression;

fn parse(input: &str) -> TagExpression {
    TagExpression::parse(input).unwrap_or_else(|err| panic!("parse `{input}`: {err}"))
}

#[rstest]
#[case("@fast", &["@fast"], true)]
#[case("@fast", &["@slow"], false)]
#[case("@smoke-tests", &["@smoke-tests"], true)]
#[case("@123", &["@123"], true)]
#[case("not @wip", &[], true)]
#[case("@a or @b and @c", &["@a"], true)]
#[case("@a or @b and @c", &["@b", "@c"], true)]
#[case("@a or @b and @c", &["@b"], false)]
#[case("not (@a or @b)", &["@a"], false)]
#[case("not (@a or @b)", &["@c"], true)]
#[case("@a Or nOt @b", &["@c"], true)]
#[case("@a AND @b", &["@a"], false)]
fn evaluates_expressions(#[case] input: &str, #[case] tags: &[&str], #[case] expected: bool) {
    assert_eq!(parse(input).evaluate(tags.iter().copied()), expected);
}

#[rstest]
fn matches_feature_and_scenario_tags_together() {
    let expr = parse("@api and @smoke");
    let feature = vec!["@api".to_string()];
    let scenario = vec!["@smoke".to_string()];
    assert!(expr.matches(&feature, &scenario));
    assert!(!expr.matches(&feature, &[]));
}

#[rstest]
#[case("@a and", 6, "expected tag or '(' after 'and'")]
#[case("@a && @b", 3, "unexpected character '&'")]
#[case("", 0, "expected tag or '('")]
#[case("@", 1, "expected tag name after '@'")]
#[case("(@a or @b", 0, "missing ')'")]
#[case("@a @b", 3, "unexpected tag `@b`")]
#[case("@a xor @b", 3, "unexpected identifier 'xor'")]
#[case("@a or ) ", 6, "expected tag or '(' after 'or'")]
fn reports_parse_errors(#[case] input: &str, #[case] offset: usize, #[case] reason: &str) {
    let Err(err) = TagExpression::parse(input) else {
        panic!("expected `{input}` to be rejected");
    };
    assert_eq!(err.offset(), offset);
    assert_eq!(err.reason(), reason);
    assert_eq!(
        err.to_string(),
        format!("invalid tag expression at byte {offset}: {reason}")
    );
}

#[rstest]
fn displays_with_explicit_grouping() {
    assert_eq!(
        parse("@a or @b and not @c").to_string(),
        "(@a or (@b and not @c))"
    );
}

#[rstest]
fn parses_via_from_str() {
    let parsed: Result<TagExpression, _> = "@x".parse();
    assert_eq!(parsed, Ok(parse("@x")));
}
