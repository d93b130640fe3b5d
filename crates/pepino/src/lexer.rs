//! Lexer turning feature text into a flat token stream.
//!
//! Lexing is line oriented. Keywords are only recognised as the first token
//! of a line, so `Given I click Given` yields one keyword followed by plain
//! words. The lexer never fails: anything it cannot classify becomes a
//! [`TokenKind::Error`] token that the parser rejects only if it has to use
//! it.

use std::iter::Peekable;
use std::str::CharIndices;

use crate::token::{Literal, Token, TokenKind};

/// Marker discarding the remainder of a line.
const COMMENT_MARKER: &str = "!--";

/// Tokenise `source`, always ending with [`TokenKind::EndOfFile`].
///
/// # Examples
///
/// ```
/// use pepino::lexer::tokenize;
/// use pepino::token::TokenKind;
///
/// let kinds: Vec<_> = tokenize("Feature: Cart\n")
///     .into_iter()
///     .map(|token| token.kind)
///     .collect();
/// assert_eq!(
///     kinds,
///     [TokenKind::Feature, TokenKind::Colon, TokenKind::Identifier, TokenKind::Eol, TokenKind::EndOfFile]
/// );
/// ```
#[must_use]
pub fn tokenize(source: &str) -> Vec<Token> {
    Lexer::new(source).tokenize()
}

/// Single-pass scanner over feature text.
pub struct Lexer<'a> {
    source: &'a str,
    chars: Peekable<CharIndices<'a>>,
    line: usize,
    line_has_token: bool,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    /// Create a lexer positioned at the start of `source`.
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            line: 1,
            line_has_token: false,
            tokens: Vec::new(),
        }
    }

    /// Consume the input and return every token.
    #[must_use]
    pub fn tokenize(mut self) -> Vec<Token> {
        while let Some(&(start, ch)) = self.chars.peek() {
            match ch {
                '\n' => {
                    self.chars.next();
                    self.push(Token::new(TokenKind::Eol, "\n", self.line));
                    self.line += 1;
                    self.line_has_token = false;
                }
                '#' if !self.line_has_token => self.skip_line(),
                '!' if starts_comment(self.source, start) => self.skip_line(),
                c if c.is_whitespace() => {
                    self.chars.next();
                }
                ':' => self.punctuation(TokenKind::Colon, ":"),
                '|' => self.punctuation(TokenKind::Pipe, "|"),
                '<' => self.punctuation(TokenKind::LeftAngle, "<"),
                '>' => self.punctuation(TokenKind::RightAngle, ">"),
                '@' => self.lex_tag(start),
                c if c.is_control() => {
                    self.chars.next();
                    log::warn!("line {}: unrecognised character {c:?}", self.line);
                    self.push(Token::new(TokenKind::Error, c.to_string(), self.line));
                }
                _ => self.lex_word(start),
            }
        }
        self.push(Token::new(TokenKind::EndOfFile, "", self.line));
        self.tokens
    }

    fn push(&mut self, token: Token) {
        log::debug!(
            "lexed {:?} {:?} on line {}",
            token.kind,
            token.text,
            token.line
        );
        if token.kind != TokenKind::Eol {
            self.line_has_token = true;
        }
        self.tokens.push(token);
    }

    fn offset(&mut self) -> usize {
        self.chars.peek().map_or(self.source.len(), |&(i, _)| i)
    }

    fn skip_line(&mut self) {
        while self.chars.next_if(|&(_, c)| c != '\n').is_some() {}
    }

    fn punctuation(&mut self, kind: TokenKind, text: &str) {
        self.chars.next();
        self.push(Token::new(kind, text, self.line));
    }

    fn lex_tag(&mut self, start: usize) {
        self.chars.next();
        let source = self.source;
        while self
            .chars
            .next_if(|&(i, c)| !c.is_whitespace() && !c.is_control() && !starts_comment(source, i))
            .is_some()
        {}
        let end = self.offset();
        let text = self.source.get(start..end).unwrap_or_default();
        let token = if text.len() > 1 {
            Token::new(TokenKind::Tag, text, self.line).with_literal(Literal::Text(text.to_string()))
        } else {
            Token::new(TokenKind::StringLiteral, text, self.line)
                .with_literal(Literal::Text(text.to_string()))
        };
        self.push(token);
    }

    fn lex_word(&mut self, start: usize) {
        let source = self.source;
        while self
            .chars
            .next_if(|&(i, c)| !is_word_boundary(c) && !starts_comment(source, i))
            .is_some()
        {}
        let end = self.offset();
        let word = self.source.get(start..end).unwrap_or_default();

        if !self.line_has_token
            && let Some(kind) = TokenKind::keyword(word)
        {
            if kind == TokenKind::Scenario && self.fold_outline() {
                self.push(Token::new(TokenKind::ScenarioOutline, "Scenario Outline", self.line));
            } else {
                self.push(Token::new(kind, word, self.line));
            }
            return;
        }
        let token = classify_word(word, self.line);
        self.push(token);
    }

    /// Consume a following `Outline` on the same line, if present.
    fn fold_outline(&mut self) -> bool {
        let mut probe = self.chars.clone();
        while probe.next_if(|&(_, c)| c == ' ' || c == '\t').is_some() {}
        let Some(&(start, _)) = probe.peek() else {
            return false;
        };
        let mut end = start;
        while let Some((i, c)) = probe.next_if(|&(_, c)| !is_word_boundary(c)) {
            end = i + c.len_utf8();
        }
        if self.source.get(start..end) == Some("Outline") {
            self.chars = probe;
            true
        } else {
            false
        }
    }
}

fn starts_comment(source: &str, at: usize) -> bool {
    source
        .get(at..)
        .is_some_and(|rest| rest.starts_with(COMMENT_MARKER))
}

fn is_word_boundary(c: char) -> bool {
    c.is_whitespace() || c.is_control() || matches!(c, ':' | '|' | '<' | '>')
}

fn classify_word(word: &str, line: usize) -> Token {
    if is_number(word)
        && let Ok(value) = word.parse::<f64>()
    {
        return Token::new(TokenKind::Number, word, line).with_literal(Literal::Number(value));
    }
    let kind = if is_identifier(word) {
        TokenKind::Identifier
    } else {
        TokenKind::StringLiteral
    };
    Token::new(kind, word, line).with_literal(Literal::Text(word.to_string()))
}

fn is_number(word: &str) -> bool {
    let digits = word.strip_prefix('-').unwrap_or(word);
    let (integer, fraction) = digits
        .split_once('.')
        .map_or((digits, None), |(integer, fraction)| (integer, Some(fraction)));
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    all_digits(integer) && fraction.is_none_or(all_digits)
}

fn is_identifier(word: &str) -> bool {
    let mut chars = word.chars();
    chars
        .next()
        .is_some_and(|first| first.is_alphabetic() || first == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}
