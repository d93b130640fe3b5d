//! Byte-level scanner splitting a pattern source into scoring tokens.
//!
//! The scanner deliberately does not understand full regex syntax. It
//! recognises only the constructs that influence specificity and treats
//! everything else as an unscored character.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Token {
    /// `\d`
    DigitClass,
    /// `\w`
    WordClass,
    /// `^` or `$`
    Anchor,
    /// `[...]` with the number of bytes between the brackets.
    CharClass { len: usize },
    /// ASCII letter or digit.
    Literal(u8),
    /// Anything else, including an unterminated `[`.
    Other(u8),
}

impl Token {
    /// Score contributed by this token.
    pub(crate) fn weight(self) -> usize {
        match self {
            Self::DigitClass => 2,
            Self::WordClass => 1,
            Self::Anchor => 3,
            Self::CharClass { len } => len.max(1),
            Self::Literal(_) => 4,
            Self::Other(_) => 0,
        }
    }
}

pub(crate) fn lex_pattern(pattern: &str) -> Vec<Token> {
    let bytes = pattern.as_bytes();
    let mut tokens = Vec::with_capacity(bytes.len());
    let mut pos = 0;

    while let Some(&b) = bytes.get(pos) {
        let (token, width) = match b {
            b'\\' if bytes.get(pos + 1) == Some(&b'd') => (Token::DigitClass, 2),
            b'\\' if bytes.get(pos + 1) == Some(&b'w') => (Token::WordClass, 2),
            b'^' | b'$' => (Token::Anchor, 1),
            b'[' => closing_bracket(bytes, pos + 1)
                .map_or((Token::Other(b), 1), |len| (Token::CharClass { len }, len + 2)),
            _ if b.is_ascii_alphanumeric() => (Token::Literal(b), 1),
            _ => (Token::Other(b), 1),
        };
        tokens.push(token);
        pos += width;
    }

    tokens
}

/// Distance from `start` to the next `]`, if any.
fn closing_bracket(bytes: &[u8], start: usize) -> Option<usize> {
    bytes.get(start..)?.iter().position(|&c| c == b']')
}
