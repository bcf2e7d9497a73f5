//! Lexer, declaration AST, and parser for interface definitions.
//!
//! This crate provides:
//! - [`Lexer`] - Tokenization of IDL source
//! - [`Parser`] - Parsing tokens into [`Definition`]s with per-declaration recovery
//! - [`SourceMap`] - Named source texts that spans point back into

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod span;
pub mod token;


pub use ast::{
    Attribute, CallbackFunction, CallbackInterface, CollectionDecl, CollectionKind, Constant,
    Declaration, DeclarationKind, Definition, Dictionary, DictionaryMember, Enum, EnumValue,
    ExtendedAttribute, ExtendedAttributeValue, ExtendedAttributes, Includes, Interface,
    InterfaceMixin, Literal, Member, MemberKind, Operation, Parameter, Special, TypeRef, Typedef,
};
pub use lexer::Lexer;
pub use parser::{ParseOutput, Parser, parse, parse_file};
pub use span::{SourceFile, SourceId, SourceMap, Span};
pub use token::{Token, TokenKind};
