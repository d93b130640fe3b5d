//! Splits a tag expression into tags, keywords and parentheses.

use super::ast::TagExprError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Lexeme {
    Tag(String),
    And,
    Or,
    Not,
    Open,
    Close,
}

impl Lexeme {
    pub(super) fn describe(&self) -> String {
        match self {
            Self::Tag(tag) => format!("tag `{tag}`"),
            Self::And => "`and`".into(),
            Self::Or => "`or`".into(),
            Self::Not => "`not`".into(),
            Self::Open => "'('".into(),
            Self::Close => "')'".into(),
        }
    }
}

/// A lexeme and the byte offset it starts at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Spanned {
    pub(super) lexeme: Lexeme,
    pub(super) offset: usize,
}

/// Tokenise the whole input up front.
pub(super) fn tokenize(input: &str) -> Result<Vec<Spanned>, TagExprError> {
    let mut out = Vec::new();
    let mut chars = input.char_indices().peekable();
    while let Some((offset, ch)) = chars.next() {
        let lexeme = match ch {
            c if c.is_whitespace() => continue,
            '(' => Lexeme::Open,
            ')' => Lexeme::Close,
            '@' => {
                let mut tag = String::from('@');
                while let Some(&(_, next)) = chars.peek() {
                    if !is_tag_char(next) {
                        break;
                    }
                    tag.push(next);
                    chars.next();
                }
                if tag.len() == 1 {
                    return Err(TagExprError::new(offset + 1, "expected tag name after '@'"));
                }
                Lexeme::Tag(tag)
            }
            c if c.is_ascii_alphabetic() => {
                let mut word = String::from(c);
                while let Some(&(_, next)) = chars.peek() {
                    if !next.is_ascii_alphabetic() {
                        break;
                    }
                    word.push(next);
                    chars.next();
                }
                keyword(&word).ok_or_else(|| {
                    TagExprError::new(offset, format!("unexpected identifier '{word}'"))
                })?
            }
            other => {
                return Err(TagExprError::new(
                    offset,
                    format!("unexpected character '{other}'"),
                ));
            }
        };
        out.push(Spanned { lexeme, offset });
    }
    Ok(out)
}

fn keyword(word: &str) -> Option<Lexeme> {
    match word.to_ascii_lowercase().as_str() {
        "and" => Some(Lexeme::And),
        "or" => Some(Lexeme::Or),
        "not" => Some(Lexeme::Not),
        _ => None,
    }
}

fn is_tag_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | '.')
}
