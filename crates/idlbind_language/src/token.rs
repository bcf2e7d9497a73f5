//! Token types for interface definition source.
//!
//! Tokens are the output of the lexer and input to the parser. Keywords are
//! not distinguished here: IDL keywords are contextual (`attribute` and
//! `required` are valid argument names), so the parser inspects identifier
//! text instead.

use crate::span::Span;

/// A token from lexical analysis.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    /// The type and value of this token.
    pub kind: TokenKind,
    /// Source location of this token.
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns true if this token is the identifier `word`.
    #[must_use]
    pub fn is_word(&self, word: &str) -> bool {
        matches!(&self.kind, TokenKind::Ident(s) if s == word)
    }
}

/// Token types for interface definition source.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    // Delimiters
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `<`
    LAngle,
    /// `>`
    RAngle,

    // Punctuation
    /// `;`
    Semicolon,
    /// `:`
    Colon,
    /// `,`
    Comma,
    /// `=`
    Equals,
    /// `?`
    Question,
    /// `...`
    Ellipsis,
    /// `-` not followed by a digit (as in `-Infinity`)
    Minus,
    /// `*`
    Star,

    // Literals
    /// Identifier or keyword, raw text
    Ident(String),
    /// Integer literal (decimal, hex, or octal)
    Integer(i128),
    /// Decimal literal like `0.5` or `1e3`
    Decimal(f64),
    /// String literal, quotes removed
    String(String),

    // Meta
    /// Comment text (including delimiters)
    Comment(String),
    /// End of input
    Eof,
    /// Lexer error
    Error(String),
}

impl TokenKind {
    /// Returns true if this token kind should be ignored during parsing.
    #[must_use]
    pub const fn is_trivia(&self) -> bool {
        matches!(self, Self::Comment(_))
    }

    /// Returns a human-readable name for this token kind.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::LParen => "'('",
            Self::RParen => "')'",
            Self::LBracket => "'['",
            Self::RBracket => "']'",
            Self::LBrace => "'{'",
            Self::RBrace => "'}'",
            Self::LAngle => "'<'",
            Self::RAngle => "'>'",
            Self::Semicolon => "';'",
            Self::Colon => "':'",
            Self::Comma => "','",
            Self::Equals => "'='",
            Self::Question => "'?'",
            Self::Ellipsis => "'...'",
            Self::Minus => "'-'",
            Self::Star => "'*'",
            Self::Ident(_) => "identifier",
            Self::Integer(_) => "integer",
            Self::Decimal(_) => "decimal",
            Self::String(_) => "string",
            Self::Comment(_) => "comment",
            Self::Eof => "end of input",
            Self::Error(_) => "error",
        }
    }
}

/// Words that begin a top-level definition.
///
/// Error recovery stops in front of these.
pub const DEFINITION_KEYWORDS: &[&str] = &[
    "interface",
    "partial",
    "dictionary",
    "enum",
    "typedef",
    "callback",
    "namespace",
];
