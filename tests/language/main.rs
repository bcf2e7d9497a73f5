//! Integration tests for Layer 1: Language
//!
//! Tests for the lexer and the recovering parser.

mod lexer;
mod parser;
