//! Errors raised while building the statement tree.

use thiserror::Error;

use crate::token::Token;

/// Structural grammar violation. Parsing stops at the first one.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// The input contains no `Feature` keyword at all.
    #[error("no `Feature:` found in the document")]
    MissingFeature,
    /// A token did not fit the grammar at this position.
    #[error("line {line}: {message}, found {found}", line = .token.line, found = .token.describe())]
    Unexpected {
        /// What the parser expected.
        message: String,
        /// The offending token.
        token: Token,
    },
}

impl ParseError {
    pub(crate) fn unexpected(message: impl Into<String>, token: &Token) -> Self {
        Self::Unexpected {
            message: message.into(),
            token: token.clone(),
        }
    }

    /// The offending token, if any.
    #[must_use]
    pub fn token(&self) -> Option<&Token> {
        match self {
            Self::MissingFeature => None,
            Self::Unexpected { token, .. } => Some(token),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind;

    #[test]
    fn unexpected_error_names_line_and_token() {
        let token = Token::new(TokenKind::Identifier, "Cart", 4);
        let err = ParseError::unexpected("expected ':' after `Feature`", &token);
        assert_eq!(
            err.to_string(),
            "line 4: expected ':' after `Feature`, found identifier `Cart`"
        );
        assert_eq!(err.token(), Some(&token));
    }

    #[test]
    fn missing_feature_has_no_token() {
        assert_eq!(ParseError::MissingFeature.token(), None);
        assert_eq!(
            ParseError::MissingFeature.to_string(),
            "no `Feature:` found in the document"
        );
    }
}
