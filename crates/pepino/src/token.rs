//! Lexical units produced by the [`lexer`](crate::lexer).

use std::fmt;

use pepino_patterns::StepKeyword;

/// Kind of a lexical token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "diagnostics", derive(serde::Serialize))]
pub enum TokenKind {
    /// `Feature` at the start of a line.
    Feature,
    /// `Background` at the start of a line.
    Background,
    /// `Scenario` at the start of a line.
    Scenario,
    /// `ScenarioOutline`, or `Scenario Outline`, at the start of a line.
    ScenarioOutline,
    /// `Examples` at the start of a line.
    Examples,
    /// `Given` at the start of a line.
    Given,
    /// `When` at the start of a line.
    When,
    /// `Then` at the start of a line.
    Then,
    /// `And` at the start of a line.
    And,
    /// `But` at the start of a line.
    But,
    /// `:`
    Colon,
    /// `|`, the table cell delimiter.
    Pipe,
    /// `<`, opening a placeholder name.
    LeftAngle,
    /// `>`, closing a placeholder name.
    RightAngle,
    /// `<name>` assembled by the parser inside step text.
    Placeholder,
    /// `@tag`, including the leading `@`.
    Tag,
    /// A word that is not a valid identifier, such as `"quoted"` or `3rd`.
    StringLiteral,
    /// A word made of letters, digits and underscores, not starting with a digit.
    Identifier,
    /// A purely numeric word.
    Number,
    /// End of a line.
    Eol,
    /// End of input. Always the last token.
    EndOfFile,
    /// Input the lexer could not classify, such as a stray control character.
    Error,
}

impl TokenKind {
    /// Map a word at the start of a line onto its keyword kind.
    #[must_use]
    pub fn keyword(word: &str) -> Option<Self> {
        let kind = match word {
            "Feature" => Self::Feature,
            "Background" => Self::Background,
            "Scenario" => Self::Scenario,
            "ScenarioOutline" => Self::ScenarioOutline,
            "Examples" => Self::Examples,
            "Given" => Self::Given,
            "When" => Self::When,
            "Then" => Self::Then,
            "And" => Self::And,
            "But" => Self::But,
            _ => return None,
        };
        Some(kind)
    }

    /// The step keyword this kind introduces, if any.
    #[must_use]
    pub const fn step_keyword(self) -> Option<StepKeyword> {
        match self {
            Self::Given => Some(StepKeyword::Given),
            Self::When => Some(StepKeyword::When),
            Self::Then => Some(StepKeyword::Then),
            Self::And => Some(StepKeyword::And),
            Self::But => Some(StepKeyword::But),
            _ => None,
        }
    }

    /// Whether this kind starts a feature-level block.
    #[must_use]
    pub const fn is_block_keyword(self) -> bool {
        matches!(
            self,
            Self::Feature | Self::Background | Self::Scenario | Self::ScenarioOutline | Self::Examples
        )
    }

    /// Human-readable name used in diagnostics.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Feature => "`Feature`",
            Self::Background => "`Background`",
            Self::Scenario => "`Scenario`",
            Self::ScenarioOutline => "`Scenario Outline`",
            Self::Examples => "`Examples`",
            Self::Given => "`Given`",
            Self::When => "`When`",
            Self::Then => "`Then`",
            Self::And => "`And`",
            Self::But => "`But`",
            Self::Colon => "':'",
            Self::Pipe => "'|'",
            Self::LeftAngle => "'<'",
            Self::RightAngle => "'>'",
            Self::Placeholder => "placeholder",
            Self::Tag => "tag",
            Self::StringLiteral => "text",
            Self::Identifier => "identifier",
            Self::Number => "number",
            Self::Eol => "end of line",
            Self::EndOfFile => "end of file",
            Self::Error => "unrecognised input",
        }
    }
}

/// Literal value carried by textual and numeric tokens.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "diagnostics", derive(serde::Serialize))]
pub enum Literal {
    /// Value of a [`TokenKind::Number`] token.
    Number(f64),
    /// Text of a word, tag or placeholder name.
    Text(String),
}

/// A lexical token with its source line (1-based).
///
/// `text` always holds the source spelling, so step text can be rebuilt by
/// joining the token texts of a line.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "diagnostics", derive(serde::Serialize))]
pub struct Token {
    /// Token category.
    pub kind: TokenKind,
    /// Parsed literal value for words, numbers, tags and placeholders.
    pub literal: Option<Literal>,
    /// Source spelling.
    pub text: String,
    /// Line on which the token starts.
    pub line: usize,
}

impl Token {
    /// Create a token without a literal value.
    #[must_use]
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            literal: None,
            text: text.into(),
            line,
        }
    }

    /// Attach a literal value.
    #[must_use]
    pub fn with_literal(mut self, literal: Literal) -> Self {
        self.literal = Some(literal);
        self
    }

    /// Build the placeholder token for `<name>`.
    #[must_use]
    pub fn placeholder(name: &str, line: usize) -> Self {
        Self::new(TokenKind::Placeholder, format!("<{name}>"), line)
            .with_literal(Literal::Text(name.to_string()))
    }

    /// Placeholder name when this is a [`TokenKind::Placeholder`] token.
    #[must_use]
    pub fn placeholder_name(&self) -> Option<&str> {
        match (&self.kind, &self.literal) {
            (TokenKind::Placeholder, Some(Literal::Text(name))) => Some(name),
            _ => None,
        }
    }

    /// Describe the token for a diagnostic message.
    #[must_use]
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Error => format!("unrecognised input {:?}", self.text),
            TokenKind::Placeholder
            | TokenKind::Tag
            | TokenKind::StringLiteral
            | TokenKind::Identifier
            | TokenKind::Number => format!("{} `{}`", self.kind.describe(), self.text),
            kind => kind.describe().to_string(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
