//! Lexer for interface definition source.
//!
//! The lexer converts source text into a stream of tokens.

use crate::span::{SourceId, Span};
use crate::token::{Token, TokenKind};

/// Lexer for interface definition source.
///
/// The lexer iterates through source text and produces tokens.
pub struct Lexer<'src> {
    /// Source text being tokenized.
    source: &'src str,
    /// Remaining source text.
    rest: &'src str,
    /// Which registered source this text is.
    source_id: SourceId,
    /// Current byte offset in source.
    position: usize,
    /// Current line number (1-based).
    line: u32,
    /// Current column number (1-based).
    column: u32,
}

impl<'src> Lexer<'src> {
    /// Creates a new lexer for the given source.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self::with_source_id(source, SourceId::ANONYMOUS)
    }

    /// Creates a lexer whose spans point into the registered source `id`.
    #[must_use]
    pub fn with_source_id(source: &'src str, id: SourceId) -> Self {
        Self {
            source,
            rest: source,
            source_id: id,
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Returns the next token from the source.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let start = self.position;
        let start_line = self.line;
        let start_column = self.column;

        let Some(c) = self.peek_char() else {
            return Token::new(
                TokenKind::Eof,
                Span::new(start, start, start_line, start_column).in_source(self.source_id),
            );
        };

        let kind = match c {
            '(' => self.single(TokenKind::LParen),
            ')' => self.single(TokenKind::RParen),
            '[' => self.single(TokenKind::LBracket),
            ']' => self.single(TokenKind::RBracket),
            '{' => self.single(TokenKind::LBrace),
            '}' => self.single(TokenKind::RBrace),
            '<' => self.single(TokenKind::LAngle),
            '>' => self.single(TokenKind::RAngle),
            ';' => self.single(TokenKind::Semicolon),
            ':' => self.single(TokenKind::Colon),
            ',' => self.single(TokenKind::Comma),
            '=' => self.single(TokenKind::Equals),
            '?' => self.single(TokenKind::Question),
            '*' => self.single(TokenKind::Star),
            '/' => self.scan_comment(),
            '"' => self.scan_string(),
            '.' => {
                if self.rest.starts_with("...") {
                    self.advance();
                    self.advance();
                    self.advance();
                    TokenKind::Ellipsis
                } else if self.peek_char_n(1).is_some_and(|c| c.is_ascii_digit()) {
                    self.scan_number()
                } else {
                    self.advance();
                    TokenKind::Error("unexpected character: .".into())
                }
            }
            '-' => {
                if self
                    .peek_char_n(1)
                    .is_some_and(|c| c.is_ascii_digit() || c == '.')
                {
                    self.scan_number()
                } else {
                    self.single(TokenKind::Minus)
                }
            }
            c if c.is_ascii_digit() => self.scan_number(),
            c if is_identifier_start(c) => self.scan_identifier(),
            c => {
                self.advance();
                TokenKind::Error(format!("unexpected character: {c}"))
            }
        };

        Token::new(
            kind,
            Span::new(start, self.position, start_line, start_column).in_source(self.source_id),
        )
    }

    /// Tokenizes all source and returns a vector of tokens.
    ///
    /// Comments are included in the output.
    #[must_use]
    pub fn tokenize_all(source: &str) -> Vec<Token> {
        Lexer::new(source).collect_tokens()
    }

    /// Consumes the lexer, returning every remaining token through `Eof`.
    #[must_use]
    pub fn collect_tokens(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.advance();
        kind
    }

    /// Peeks at the next character without consuming it.
    fn peek_char(&self) -> Option<char> {
        self.rest.chars().next()
    }

    /// Peeks `n` characters past the next one.
    fn peek_char_n(&self, n: usize) -> Option<char> {
        self.rest.chars().nth(n)
    }

    /// Advances past the next character.
    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            let len = c.len_utf8();
            self.rest = &self.rest[len..];
            self.position += len;
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    /// Skips whitespace characters.
    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek_char() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Scans `// line` and `/* block */` comments.
    fn scan_comment(&mut self) -> TokenKind {
        let start = self.position;
        match self.peek_char_n(1) {
            Some('/') => {
                while let Some(c) = self.peek_char() {
                    if c == '\n' {
                        break;
                    }
                    self.advance();
                }
            }
            Some('*') => {
                self.advance();
                self.advance();
                loop {
                    if self.rest.starts_with("*/") {
                        self.advance();
                        self.advance();
                        break;
                    }
                    if self.rest.is_empty() {
                        return TokenKind::Error("unterminated block comment".into());
                    }
                    self.advance();
                }
            }
            _ => {
                self.advance();
                return TokenKind::Error("unexpected character: /".into());
            }
        }
        TokenKind::Comment(self.source[start..self.position].to_string())
    }

    /// Scans a string literal. IDL strings have no escape sequences.
    fn scan_string(&mut self) -> TokenKind {
        self.advance(); // consume opening '"'
        let start = self.position;
        loop {
            match self.peek_char() {
                Some('"') => {
                    let text = self.source[start..self.position].to_string();
                    self.advance();
                    return TokenKind::String(text);
                }
                Some(_) => self.advance(),
                None => return TokenKind::Error("unterminated string literal".into()),
            }
        }
    }

    /// Scans an integer (decimal, `0x` hex, or leading-zero octal) or a decimal.
    fn scan_number(&mut self) -> TokenKind {
        let negative = self.peek_char() == Some('-');
        if negative {
            self.advance();
        }

        if self.peek_char() == Some('0') && matches!(self.peek_char_n(1), Some('x' | 'X')) {
            self.advance();
            self.advance();
            let digits_start = self.position;
            while self.peek_char().is_some_and(|c| c.is_ascii_hexdigit()) {
                self.advance();
            }
            let digits = &self.source[digits_start..self.position];
            return match i128::from_str_radix(digits, 16) {
                Ok(n) => TokenKind::Integer(if negative { -n } else { n }),
                Err(e) => TokenKind::Error(format!("invalid hex integer: {e}")),
            };
        }

        let digits_start = self.position;
        let mut is_decimal = false;

        while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
        if self.peek_char() == Some('.') && !self.rest.starts_with("...") {
            is_decimal = true;
            self.advance();
            while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }
        if matches!(self.peek_char(), Some('e' | 'E')) {
            let exponent_digit = match self.peek_char_n(1) {
                Some('+' | '-') => self.peek_char_n(2),
                other => other,
            };
            if exponent_digit.is_some_and(|c| c.is_ascii_digit()) {
                is_decimal = true;
                self.advance();
                if matches!(self.peek_char(), Some('+' | '-')) {
                    self.advance();
                }
                while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
                    self.advance();
                }
            }
        }

        let digits = &self.source[digits_start..self.position];

        if is_decimal {
            return match digits.parse::<f64>() {
                Ok(n) => TokenKind::Decimal(if negative { -n } else { n }),
                Err(e) => TokenKind::Error(format!("invalid decimal: {e}")),
            };
        }

        let parsed = if digits.len() > 1 && digits.starts_with('0') {
            i128::from_str_radix(&digits[1..], 8)
        } else {
            digits.parse::<i128>()
        };
        match parsed {
            Ok(n) => TokenKind::Integer(if negative { -n } else { n }),
            Err(e) => TokenKind::Error(format!("invalid integer: {e}")),
        }
    }

    /// Scans an identifier or keyword.
    fn scan_identifier(&mut self) -> TokenKind {
        let start = self.position;
        while let Some(c) = self.peek_char() {
            if is_identifier_char(c) {
                self.advance();
            } else {
                break;
            }
        }
        TokenKind::Ident(self.source[start..self.position].to_string())
    }
}

/// Returns true if `c` can start an identifier.
fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// Returns true if `c` can appear in an identifier (not at start).
fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}
