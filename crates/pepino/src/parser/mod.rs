//! Recursive-descent parser building a [`FeatureStatement`] from tokens.
//!
//! The grammar is line anchored:
//!
//! ```text
//! feature    := Tag* 'Feature' ':' text EOL (background? (scenario|outline)*)
//! background := 'Background' ':' EOL step*
//! scenario   := Tag* 'Scenario' ':' text EOL step*
//! outline    := Tag* 'ScenarioOutline' ':' text EOL step* examples?
//! examples   := 'Examples' ':' EOL tableRow+
//! step       := stepKeyword stepText EOL
//! stepText   := (literalWord | '<' word '>')*
//! tableRow   := '|' cell ('|' cell)* '|' EOL
//! ```
//!
//! Lines that do not start a known construct between feature children are
//! skipped with a warning. Free-form description lines right after a header
//! are skipped silently.

mod error;

pub use error::ParseError;

use std::collections::HashSet;

use crate::ast::{
    BackgroundStatement, ExamplesStatement, FeatureStatement, ScenarioOutlineStatement,
    ScenarioStatement, StepStatement,
};
use crate::lexer::tokenize;
use crate::token::{Token, TokenKind};

/// Lex and parse feature text in one go.
///
/// # Errors
///
/// Returns [`ParseError`] when the text violates the feature grammar.
///
/// # Examples
///
/// ```
/// let feature = pepino::parser::parse_source(
///     "Feature: Cart\n  Scenario: Empty\n    Given an empty cart\n",
/// )
/// .expect("valid feature");
/// assert_eq!(feature.name, "Cart");
/// assert_eq!(feature.scenarios.len(), 1);
/// ```
pub fn parse_source(source: &str) -> Result<FeatureStatement, ParseError> {
    parse_feature(tokenize(source))
}

/// Parse a token stream produced by [`tokenize`].
///
/// # Errors
///
/// Returns [`ParseError::MissingFeature`] when no feature is present and
/// [`ParseError::Unexpected`] for any other structural violation.
pub fn parse_feature(tokens: Vec<Token>) -> Result<FeatureStatement, ParseError> {
    Parser::new(tokens).parse_feature()
}

/// Cursor over a token stream.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    eof: Token,
}

impl Parser {
    /// Create a parser over `tokens`. A missing trailing end-of-file token
    /// is tolerated.
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        let line = tokens.last().map_or(1, |token| token.line);
        Self {
            tokens,
            pos: 0,
            eof: Token::new(TokenKind::EndOfFile, "", line),
        }
    }

    /// Parse a complete feature.
    ///
    /// # Errors
    ///
    /// See [`parse_feature`].
    pub fn parse_feature(&mut self) -> Result<FeatureStatement, ParseError> {
        if !self.tokens.iter().any(|token| token.kind == TokenKind::Feature) {
            return Err(ParseError::MissingFeature);
        }
        let tags = self.parse_tags();
        if self.peek().kind != TokenKind::Feature {
            return Err(self.error("expected `Feature` keyword"));
        }
        self.advance();
        self.expect(TokenKind::Colon, "expected ':' after `Feature`")?;
        let name_token = self.peek().clone();
        let name = self.parse_text_line("feature name")?;
        if name.is_empty() {
            return Err(ParseError::unexpected("missing feature name", &name_token));
        }
        self.skip_description();

        let mut feature = FeatureStatement {
            name,
            tags,
            ..FeatureStatement::default()
        };
        self.parse_children(&mut feature)?;
        Ok(feature)
    }

    fn parse_children(&mut self, feature: &mut FeatureStatement) -> Result<(), ParseError> {
        let mut pending_tags = Vec::new();
        loop {
            let token = self.peek();
            match token.kind {
                TokenKind::EndOfFile => break,
                TokenKind::Eol => self.advance(),
                TokenKind::Tag => pending_tags.extend(self.parse_tags()),
                TokenKind::Background => {
                    if feature.background.is_some() {
                        return Err(self.error("a feature may only have one `Background`"));
                    }
                    feature.background = Some(self.parse_background()?);
                }
                TokenKind::Scenario => {
                    let tags = std::mem::take(&mut pending_tags);
                    feature.scenarios.push(self.parse_scenario(tags)?);
                }
                TokenKind::ScenarioOutline => {
                    let tags = std::mem::take(&mut pending_tags);
                    feature.scenario_outlines.push(self.parse_outline(tags)?);
                }
                _ => {
                    log::warn!(
                        "line {}: skipping unexpected {}",
                        token.line,
                        token.describe()
                    );
                    self.skip_line();
                }
            }
        }
        if !pending_tags.is_empty() {
            log::debug!("dangling tags {} at end of feature", pending_tags.join(" "));
        }
        Ok(())
    }

    fn parse_background(&mut self) -> Result<BackgroundStatement, ParseError> {
        self.advance();
        self.expect(TokenKind::Colon, "expected ':' after `Background`")?;
        self.parse_text_line("background name")?;
        self.skip_description();
        Ok(BackgroundStatement {
            steps: self.parse_steps()?,
        })
    }

    fn parse_scenario(&mut self, tags: Vec<String>) -> Result<ScenarioStatement, ParseError> {
        self.advance();
        self.expect(TokenKind::Colon, "expected ':' after `Scenario`")?;
        let name = self.parse_text_line("scenario name")?;
        self.skip_description();
        Ok(ScenarioStatement {
            name,
            tags,
            steps: self.parse_steps()?,
        })
    }

    fn parse_outline(&mut self, tags: Vec<String>) -> Result<ScenarioOutlineStatement, ParseError> {
        self.advance();
        self.expect(TokenKind::Colon, "expected ':' after `Scenario Outline`")?;
        let name = self.parse_text_line("outline name")?;
        self.skip_description();
        let steps = self.parse_steps()?;
        self.skip_blank_lines();
        let examples = if self.check(TokenKind::Examples) {
            Some(self.parse_examples()?)
        } else {
            None
        };
        Ok(ScenarioOutlineStatement {
            name,
            tags,
            steps,
            examples,
        })
    }

    fn parse_examples(&mut self) -> Result<ExamplesStatement, ParseError> {
        self.advance();
        self.expect(TokenKind::Colon, "expected ':' after `Examples`")?;
        self.parse_text_line("examples name")?;
        self.skip_blank_lines();
        if !self.check(TokenKind::Pipe) {
            return Err(self.error("expected an examples table row starting with '|'"));
        }

        let header_token = self.peek().clone();
        let headers = self.parse_table_row()?;
        let mut seen = HashSet::new();
        if let Some(duplicate) = headers.iter().find(|header| !seen.insert(header.as_str())) {
            return Err(ParseError::unexpected(
                format!("duplicate examples header `{duplicate}`"),
                &header_token,
            ));
        }

        let mut rows = Vec::new();
        loop {
            self.skip_blank_lines();
            if !self.check(TokenKind::Pipe) {
                break;
            }
            let line = self.peek().line;
            let row = self.parse_table_row()?;
            if row.len() != headers.len() {
                log::warn!(
                    "line {line}: examples row has {} cell(s) but the header has {}",
                    row.len(),
                    headers.len()
                );
            }
            rows.push(row);
        }
        Ok(ExamplesStatement { headers, rows })
    }

    fn parse_table_row(&mut self) -> Result<Vec<String>, ParseError> {
        self.expect(TokenKind::Pipe, "expected '|' at the start of a table row")?;
        let mut cells = Vec::new();
        let mut words: Vec<String> = Vec::new();
        loop {
            let token = self.peek();
            match token.kind {
                TokenKind::Pipe => {
                    self.advance();
                    cells.push(words.join(" "));
                    words.clear();
                    if self.at_line_end() {
                        break;
                    }
                }
                TokenKind::Eol | TokenKind::EndOfFile => {
                    return Err(self.error("expected '|' to close the table row"));
                }
                TokenKind::Error => return Err(self.error("unexpected input in table cell")),
                _ => {
                    words.push(token.text.clone());
                    self.advance();
                }
            }
        }
        self.consume_eol();
        Ok(cells)
    }

    fn parse_steps(&mut self) -> Result<Vec<StepStatement>, ParseError> {
        let mut steps = Vec::new();
        loop {
            self.skip_blank_lines();
            if self.peek().kind.step_keyword().is_none() {
                break;
            }
            let step = self.parse_step()?;
            if steps.is_empty() && step.keyword.is_conjunction() {
                log::warn!(
                    "line {}: `{}` opens a step block with nothing to continue",
                    step.line,
                    step.keyword
                );
            }
            steps.push(step);
        }
        Ok(steps)
    }

    /// Parse one step line.
    ///
    /// # Errors
    ///
    /// Fails when the current token is not a step keyword or the step text
    /// contains a malformed placeholder.
    pub fn parse_step(&mut self) -> Result<StepStatement, ParseError> {
        let head = self.peek();
        let Some(keyword) = head.kind.step_keyword() else {
            return Err(self.error("expected a step keyword (Given, When, Then, And, But)"));
        };
        let line = head.line;
        self.advance();

        let mut text = Vec::new();
        while !self.at_line_end() {
            let token = self.peek();
            match token.kind {
                TokenKind::LeftAngle => text.push(self.parse_placeholder()?),
                TokenKind::Error => return Err(self.error("unexpected input in step text")),
                _ => {
                    text.push(token.clone());
                    self.advance();
                }
            }
        }
        self.consume_eol();
        Ok(StepStatement {
            keyword,
            text,
            line,
        })
    }

    fn parse_placeholder(&mut self) -> Result<Token, ParseError> {
        let line = self.peek().line;
        self.advance();
        let name = self.peek();
        if !matches!(
            name.kind,
            TokenKind::Identifier | TokenKind::StringLiteral | TokenKind::Number
        ) {
            return Err(self.error("expected a placeholder name after '<'"));
        }
        let placeholder = Token::placeholder(&name.text, line);
        self.advance();
        self.expect(TokenKind::RightAngle, "expected '>' to close the placeholder")?;
        Ok(placeholder)
    }

    /// Collect the rest of the line as single-space separated text.
    fn parse_text_line(&mut self, what: &str) -> Result<String, ParseError> {
        let mut words = Vec::new();
        while !self.at_line_end() {
            let token = self.peek();
            if token.kind == TokenKind::Error {
                return Err(self.error(format!("unexpected input in {what}")));
            }
            words.push(token.text.clone());
            self.advance();
        }
        self.consume_eol();
        Ok(words.join(" "))
    }

    fn parse_tags(&mut self) -> Vec<String> {
        let mut tags = Vec::new();
        loop {
            match self.peek().kind {
                TokenKind::Tag => {
                    tags.push(self.peek().text.clone());
                    self.advance();
                }
                TokenKind::Eol => self.advance(),
                _ => break,
            }
        }
        tags
    }

    fn skip_description(&mut self) {
        loop {
            let token = self.peek();
            let kind = token.kind;
            if kind == TokenKind::Eol {
                self.advance();
                continue;
            }
            if kind == TokenKind::EndOfFile
                || kind == TokenKind::Tag
                || kind == TokenKind::Pipe
                || kind.is_block_keyword()
                || kind.step_keyword().is_some()
            {
                break;
            }
            log::debug!("line {}: skipping description line", token.line);
            self.skip_line();
        }
    }

    fn skip_blank_lines(&mut self) {
        while self.check(TokenKind::Eol) {
            self.advance();
        }
    }

    fn skip_line(&mut self) {
        while !self.at_line_end() {
            self.advance();
        }
        self.consume_eol();
    }

    fn consume_eol(&mut self) {
        if self.check(TokenKind::Eol) {
            self.advance();
        }
    }

    fn at_line_end(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Eol | TokenKind::EndOfFile)
    }

    fn peek(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&self.eof)
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    fn expect(&mut self, kind: TokenKind, message: &str) -> Result<(), ParseError> {
        if self.check(kind) {
            self.advance();
            Ok(())
        } else {
            Err(self.error(message))
        }
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::unexpected(message, self.peek())
    }
}
