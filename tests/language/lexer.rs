//! Lexer integration tests
//!
//! Tests tokenization of realistic declaration headers.

use idlbind_language::{Lexer, TokenKind};

fn kinds(source: &str) -> Vec<TokenKind> {
    Lexer::tokenize_all(source)
        .into_iter()
        .map(|t| t.kind)
        .filter(|k| !k.is_trivia())
        .collect()
}

fn ident(s: &str) -> TokenKind {
    TokenKind::Ident(s.to_string())
}

#[test]
fn extended_attribute_header() {
    assert_eq!(
        kinds("[Exposed=(Window,Worker)] interface Event {"),
        vec![
            TokenKind::LBracket,
            ident("Exposed"),
            TokenKind::Equals,
            TokenKind::LParen,
            ident("Window"),
            TokenKind::Comma,
            ident("Worker"),
            TokenKind::RParen,
            TokenKind::RBracket,
            ident("interface"),
            ident("Event"),
            TokenKind::LBrace,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn generic_and_variadic_tokens() {
    assert_eq!(
        kinds("undefined f(sequence<long>? a, any... rest);"),
        vec![
            ident("undefined"),
            ident("f"),
            TokenKind::LParen,
            ident("sequence"),
            TokenKind::LAngle,
            ident("long"),
            TokenKind::RAngle,
            TokenKind::Question,
            ident("a"),
            TokenKind::Comma,
            ident("any"),
            TokenKind::Ellipsis,
            ident("rest"),
            TokenKind::RParen,
            TokenKind::Semicolon,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn comments_are_trivia() {
    let tokens = Lexer::tokenize_all("// Node\n/* legacy */ const short X = 0x10;");
    assert!(tokens[0].kind.is_trivia());
    assert!(tokens[1].kind.is_trivia());
    assert!(tokens.iter().any(|t| t.kind == TokenKind::Integer(16)));
}

#[test]
fn spans_track_lines() {
    let tokens = Lexer::tokenize_all("interface A {\n  attribute long x;\n};");
    let attribute = tokens.iter().find(|t| t.is_word("attribute")).unwrap();
    assert_eq!((attribute.span.line, attribute.span.column), (2, 3));
}
