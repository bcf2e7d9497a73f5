//! Parser for interface definition source.
//!
//! The parser converts a stream of tokens into [`Definition`]s. It never
//! stops at the first problem: a malformed declaration is recorded as a
//! syntax error, skipped, and parsing resumes at the next top-level boundary.

use idlbind_foundation::{Error, ErrorContext, ErrorKind, Primitive, Result};
use tracing::{debug, trace};

use crate::ast::{
    Attribute, CallbackFunction, CallbackInterface, CollectionDecl, CollectionKind, Constant,
    Declaration, Definition, Dictionary, DictionaryMember, Enum, EnumValue, ExtendedAttribute,
    ExtendedAttributeValue, ExtendedAttributes, Includes, Interface, InterfaceMixin, Literal,
    Member, Operation, Parameter, Special, TypeRef, Typedef,
};
use crate::lexer::Lexer;
use crate::span::{SourceId, SourceMap, Span};
use crate::token::{DEFINITION_KEYWORDS, Token, TokenKind};

/// The result of parsing one source text.
#[derive(Clone, Debug, Default)]
pub struct ParseOutput {
    /// Successfully parsed definitions, in source order.
    pub definitions: Vec<Definition>,
    /// Syntax errors for the declarations that were skipped.
    pub errors: Vec<Error>,
}

impl ParseOutput {
    /// Returns true if no syntax errors were recorded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Iterates the named declarations.
    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.definitions.iter().filter_map(|d| match d {
            Definition::Declaration(decl) => Some(decl),
            Definition::Includes(_) => None,
        })
    }

    /// Iterates the `includes` statements.
    pub fn includes(&self) -> impl Iterator<Item = &Includes> {
        self.definitions.iter().filter_map(|d| match d {
            Definition::Includes(inc) => Some(inc),
            Definition::Declaration(_) => None,
        })
    }
}

/// What kind of body a member list belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BodyKind {
    Interface,
    Mixin,
    CallbackInterface,
}

impl BodyKind {
    const fn describe(self) -> &'static str {
        match self {
            Self::Interface => "interfaces",
            Self::Mixin => "interface mixins",
            Self::CallbackInterface => "callback interfaces",
        }
    }
}

enum BodyItem {
    Member(Member),
    Collection(CollectionDecl),
}

/// Parser for interface definition source.
pub struct Parser {
    /// Tokens with trivia removed; always ends with `Eof`.
    tokens: Vec<Token>,
    /// Index of the current token.
    pos: usize,
    /// Display name of the source, for error context.
    source_name: String,
    /// Current depth of nested types and extended attributes.
    nesting: usize,
}

/// Deepest nesting of types and extended attribute arguments accepted.
const MAX_NESTING: usize = 64;

impl Parser {
    /// Creates a parser for anonymous source text.
    #[must_use]
    pub fn new(source: &str) -> Self {
        Self::with_source(source, SourceId::ANONYMOUS, "<input>")
    }

    /// Creates a parser whose spans and errors point at a named source.
    #[must_use]
    pub fn with_source(source: &str, id: SourceId, name: impl Into<String>) -> Self {
        let tokens = Lexer::with_source_id(source, id)
            .collect_tokens()
            .into_iter()
            .filter(|t| !t.kind.is_trivia())
            .collect();
        Self {
            tokens,
            pos: 0,
            source_name: name.into(),
            nesting: 0,
        }
    }

    /// Parses every definition in the source.
    ///
    /// Syntax errors never abort the parse; they are collected in
    /// [`ParseOutput::errors`].
    #[must_use]
    pub fn parse_all(mut self) -> ParseOutput {
        let mut output = ParseOutput::default();

        while !self.at_eof() {
            let start = self.pos;
            self.nesting = 0;
            match self.parse_definition() {
                Ok(definition) => {
                    trace!(definition = ?definition_label(&definition), "parsed definition");
                    output.definitions.push(definition);
                }
                Err(err) => {
                    debug!(error = %err, "skipping malformed declaration");
                    output.errors.push(err);
                    self.recover(start);
                }
            }
        }

        debug!(
            source = %self.source_name,
            definitions = output.definitions.len(),
            errors = output.errors.len(),
            "parsed source"
        );
        output
    }

    // =========================================================================
    // Definitions
    // =========================================================================

    fn parse_definition(&mut self) -> Result<Definition> {
        let start = self.current().span;
        let attributes = self.parse_extended_attributes()?;
        let word = self.current_word().map(str::to_owned);

        let declaration = match word.as_deref() {
            Some("interface") => {
                self.advance();
                if self.eat_word("mixin") {
                    self.parse_mixin(attributes, start, false)?
                } else {
                    self.parse_interface(attributes, start, false)?
                }
            }
            Some("partial") => {
                self.advance();
                if self.eat_word("interface") {
                    if self.eat_word("mixin") {
                        self.parse_mixin(attributes, start, true)?
                    } else {
                        self.parse_interface(attributes, start, true)?
                    }
                } else if self.eat_word("dictionary") {
                    self.parse_dictionary(attributes, start, true)?
                } else {
                    return Err(self.unexpected("'interface' or 'dictionary' after 'partial'"));
                }
            }
            Some("dictionary") => {
                self.advance();
                self.parse_dictionary(attributes, start, false)?
            }
            Some("enum") => {
                self.advance();
                self.parse_enum(attributes, start)?
            }
            Some("typedef") => {
                self.advance();
                self.parse_typedef(attributes, start)?
            }
            Some("callback") => {
                self.advance();
                if self.eat_word("interface") {
                    self.parse_callback_interface(attributes, start)?
                } else {
                    self.parse_callback_function(attributes, start)?
                }
            }
            Some("namespace") => {
                return Err(self.error("namespace declarations are not supported"));
            }
            Some(_) if self.word_at(1) == Some("includes") => {
                return self.parse_includes(start).map(Definition::Includes);
            }
            _ => return Err(self.unexpected("a definition")),
        };

        Ok(Definition::Declaration(declaration))
    }

    fn parse_interface(
        &mut self,
        attributes: ExtendedAttributes,
        start: Span,
        partial: bool,
    ) -> Result<Declaration> {
        let (name, _) = self.expect_identifier("interface name")?;
        let frame = format!("in interface {name}");

        let parent = if self.check(&TokenKind::Colon) {
            if partial {
                return Err(self.error("partial interfaces cannot declare a parent"));
            }
            self.advance();
            Some(self.expect_identifier("parent interface name")?.0)
        } else {
            None
        };

        let (members, collection) = self
            .parse_body(BodyKind::Interface)
            .map_err(|e| e.in_frame(frame.clone()))?;
        let end = self.expect_terminator().map_err(|e| e.in_frame(frame))?;

        Ok(Declaration::Interface(Interface {
            name,
            parent,
            members,
            mixins: Vec::new(),
            collection,
            partial,
            attributes,
            span: start.to(end),
        }))
    }

    fn parse_mixin(
        &mut self,
        attributes: ExtendedAttributes,
        start: Span,
        partial: bool,
    ) -> Result<Declaration> {
        let (name, _) = self.expect_identifier("mixin name")?;
        let frame = format!("in interface mixin {name}");
        let (members, _) = self
            .parse_body(BodyKind::Mixin)
            .map_err(|e| e.in_frame(frame.clone()))?;
        let end = self.expect_terminator().map_err(|e| e.in_frame(frame))?;

        Ok(Declaration::InterfaceMixin(InterfaceMixin {
            name,
            members,
            partial,
            attributes,
            span: start.to(end),
        }))
    }

    fn parse_callback_interface(
        &mut self,
        attributes: ExtendedAttributes,
        start: Span,
    ) -> Result<Declaration> {
        let (name, _) = self.expect_identifier("callback interface name")?;
        let frame = format!("in callback interface {name}");
        let (members, _) = self
            .parse_body(BodyKind::CallbackInterface)
            .map_err(|e| e.in_frame(frame.clone()))?;
        let end = self.expect_terminator().map_err(|e| e.in_frame(frame))?;

        Ok(Declaration::CallbackInterface(CallbackInterface {
            name,
            members,
            attributes,
            span: start.to(end),
        }))
    }

    fn parse_callback_function(
        &mut self,
        attributes: ExtendedAttributes,
        start: Span,
    ) -> Result<Declaration> {
        let (name, _) = self.expect_identifier("callback name")?;
        self.expect(&TokenKind::Equals)?;
        let (return_type, _) = self.parse_type_with_attributes()?;
        let arguments = self.parse_arguments()?;
        let end = self.expect(&TokenKind::Semicolon)?;

        Ok(Declaration::CallbackFunction(CallbackFunction {
            name,
            return_type,
            arguments,
            attributes,
            span: start.to(end),
        }))
    }

    fn parse_dictionary(
        &mut self,
        attributes: ExtendedAttributes,
        start: Span,
        partial: bool,
    ) -> Result<Declaration> {
        let (name, _) = self.expect_identifier("dictionary name")?;
        let frame = format!("in dictionary {name}");

        let parent = if self.check(&TokenKind::Colon) {
            if partial {
                return Err(self.error("partial dictionaries cannot declare a parent"));
            }
            self.advance();
            Some(self.expect_identifier("parent dictionary name")?.0)
        } else {
            None
        };

        self.expect(&TokenKind::LBrace)?;
        let mut members = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            if self.at_eof() {
                return Err(self.unexpected("'}'").in_frame(frame));
            }
            members.push(
                self.parse_dictionary_member()
                    .map_err(|e| e.in_frame(frame.clone()))?,
            );
        }
        self.advance();
        let end = self.expect_terminator().map_err(|e| e.in_frame(frame))?;

        Ok(Declaration::Dictionary(Dictionary {
            name,
            parent,
            members,
            partial,
            attributes,
            span: start.to(end),
        }))
    }

    fn parse_dictionary_member(&mut self) -> Result<DictionaryMember> {
        let start = self.current().span;
        let mut attributes = self.parse_extended_attributes()?;
        let required = self.eat_word("required");
        let (ty, type_attributes) = self.parse_type_with_attributes()?;
        attributes.extend(type_attributes);
        let (name, _) = self.expect_identifier("dictionary member name")?;
        let default = if self.eat(&TokenKind::Equals) {
            Some(self.parse_literal()?)
        } else {
            None
        };
        let end = self.expect(&TokenKind::Semicolon)?;

        Ok(DictionaryMember {
            name,
            ty,
            required,
            default,
            attributes,
            span: start.to(end),
        })
    }

    fn parse_enum(&mut self, attributes: ExtendedAttributes, start: Span) -> Result<Declaration> {
        let (name, _) = self.expect_identifier("enum name")?;
        self.expect(&TokenKind::LBrace)?;

        let mut values = Vec::new();
        while let TokenKind::String(value) = &self.current().kind {
            values.push(EnumValue {
                value: value.clone(),
                span: self.current().span,
            });
            self.advance();
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }

        if !self.check(&TokenKind::RBrace) {
            return Err(self
                .unexpected("a string or '}'")
                .in_frame(format!("in enum {name}")));
        }
        self.advance();
        let end = self.expect_terminator()?;

        Ok(Declaration::Enum(Enum {
            name,
            values,
            attributes,
            span: start.to(end),
        }))
    }

    fn parse_typedef(
        &mut self,
        mut attributes: ExtendedAttributes,
        start: Span,
    ) -> Result<Declaration> {
        let (ty, type_attributes) = self.parse_type_with_attributes()?;
        attributes.extend(type_attributes);
        let (name, _) = self.expect_identifier("typedef name")?;
        let end = self.expect(&TokenKind::Semicolon)?;

        Ok(Declaration::Typedef(Typedef {
            name,
            ty,
            attributes,
            span: start.to(end),
        }))
    }

    fn parse_includes(&mut self, start: Span) -> Result<Includes> {
        let (target, _) = self.expect_identifier("interface name")?;
        self.expect_word("includes")?;
        let (mixin, _) = self.expect_identifier("mixin name")?;
        let end = self.expect(&TokenKind::Semicolon)?;

        Ok(Includes {
            target,
            mixin,
            span: start.to(end),
        })
    }

    // =========================================================================
    // Members
    // =========================================================================

    fn parse_body(&mut self, kind: BodyKind) -> Result<(Vec<Member>, Option<CollectionDecl>)> {
        self.expect(&TokenKind::LBrace)?;

        let mut members = Vec::new();
        let mut collection: Option<CollectionDecl> = None;

        while !self.check(&TokenKind::RBrace) {
            if self.at_eof() {
                return Err(self.unexpected("'}'"));
            }
            match self.parse_member(kind)? {
                BodyItem::Member(member) => members.push(member),
                BodyItem::Collection(decl) => {
                    if collection.is_some() {
                        return Err(self.error_at(
                            decl.span,
                            "only one iterable, maplike or setlike declaration is allowed",
                        ));
                    }
                    collection = Some(decl);
                }
            }
        }
        self.advance();

        Ok((members, collection))
    }

    fn parse_member(&mut self, kind: BodyKind) -> Result<BodyItem> {
        let start = self.current().span;
        let attributes = self.parse_extended_attributes()?;
        let word = self.current_word().map(str::to_owned);

        let member = match word.as_deref() {
            Some("const") => Member::Constant(self.parse_constant(attributes, start)?),
            Some("constructor") => {
                self.require_body(kind, BodyKind::Interface, "constructors")?;
                Member::Operation(self.parse_constructor(attributes, start)?)
            }
            Some("stringifier") => {
                self.forbid_body(kind, BodyKind::CallbackInterface, "stringifiers")?;
                self.advance();
                if self.check(&TokenKind::Semicolon) {
                    let end = self.current().span;
                    self.advance();
                    Member::Operation(Operation {
                        name: None,
                        special: Some(Special::Stringifier),
                        return_type: TypeRef::Primitive(Primitive::DomString),
                        arguments: Vec::new(),
                        is_static: false,
                        attributes,
                        span: start.to(end),
                    })
                } else if self.at_attribute() {
                    let mut attribute = self.parse_attribute(attributes, start)?;
                    attribute.stringifier = true;
                    Member::Attribute(attribute)
                } else {
                    Member::Operation(self.parse_operation(
                        attributes,
                        start,
                        Some(Special::Stringifier),
                        false,
                    )?)
                }
            }
            Some("static") => {
                self.require_body(kind, BodyKind::Interface, "static members")?;
                self.advance();
                if self.at_attribute() {
                    let mut attribute = self.parse_attribute(attributes, start)?;
                    attribute.is_static = true;
                    Member::Attribute(attribute)
                } else {
                    Member::Operation(self.parse_operation(attributes, start, None, true)?)
                }
            }
            Some(special @ ("getter" | "setter" | "deleter")) => {
                self.require_body(kind, BodyKind::Interface, "special operations")?;
                let special = match special {
                    "getter" => Special::Getter,
                    "setter" => Special::Setter,
                    _ => Special::Deleter,
                };
                self.advance();
                Member::Operation(self.parse_operation(attributes, start, Some(special), false)?)
            }
            _ if self.at_collection() => {
                self.require_body(kind, BodyKind::Interface, "collection declarations")?;
                return Ok(BodyItem::Collection(self.parse_collection(start)?));
            }
            Some("inherit" | "readonly" | "attribute") => {
                self.forbid_body(kind, BodyKind::CallbackInterface, "attributes")?;
                if kind == BodyKind::Mixin && self.current_is_word("inherit") {
                    return Err(self.error("interface mixins cannot declare inherited attributes"));
                }
                Member::Attribute(self.parse_attribute(attributes, start)?)
            }
            _ => Member::Operation(self.parse_operation(attributes, start, None, false)?),
        };

        Ok(BodyItem::Member(member))
    }

    fn parse_constant(&mut self, attributes: ExtendedAttributes, start: Span) -> Result<Constant> {
        self.expect_word("const")?;
        let ty = self.parse_type()?;
        let (name, _) = self.expect_identifier("constant name")?;
        self.expect(&TokenKind::Equals)?;
        let value = self.parse_literal()?;
        let end = self.expect(&TokenKind::Semicolon)?;

        Ok(Constant {
            name,
            ty,
            value,
            attributes,
            span: start.to(end),
        })
    }

    fn parse_constructor(
        &mut self,
        attributes: ExtendedAttributes,
        start: Span,
    ) -> Result<Operation> {
        self.expect_word("constructor")?;
        let arguments = self.parse_arguments()?;
        let end = self.expect(&TokenKind::Semicolon)?;

        Ok(Operation {
            name: None,
            special: Some(Special::Constructor),
            return_type: TypeRef::Primitive(Primitive::Undefined),
            arguments,
            is_static: false,
            attributes,
            span: start.to(end),
        })
    }

    fn parse_attribute(
        &mut self,
        mut attributes: ExtendedAttributes,
        start: Span,
    ) -> Result<Attribute> {
        let inherit = self.eat_word("inherit");
        let readonly = self.eat_word("readonly");
        self.expect_word("attribute")?;
        let (ty, type_attributes) = self.parse_type_with_attributes()?;
        attributes.extend(type_attributes);
        let (name, _) = self.expect_identifier("attribute name")?;
        let end = self.expect(&TokenKind::Semicolon)?;

        Ok(Attribute {
            name,
            ty,
            readonly,
            is_static: false,
            inherit,
            stringifier: false,
            attributes,
            span: start.to(end),
        })
    }

    fn parse_operation(
        &mut self,
        mut attributes: ExtendedAttributes,
        start: Span,
        special: Option<Special>,
        is_static: bool,
    ) -> Result<Operation> {
        let (return_type, type_attributes) = self.parse_type_with_attributes()?;
        attributes.extend(type_attributes);

        let name = if let TokenKind::Ident(raw) = &self.current().kind {
            let name = unescape(raw).to_string();
            self.advance();
            Some(name)
        } else {
            None
        };
        if name.is_none() && special.is_none() {
            return Err(self.unexpected("operation name"));
        }

        let arguments = self.parse_arguments()?;
        let end = self.expect(&TokenKind::Semicolon)?;

        Ok(Operation {
            name,
            special,
            return_type,
            arguments,
            is_static,
            attributes,
            span: start.to(end),
        })
    }

    fn parse_collection(&mut self, start: Span) -> Result<CollectionDecl> {
        let is_async = self.eat_word("async");
        let readonly = self.eat_word("readonly");
        let word = self.current_word().map(str::to_owned);

        let (kind, key, value) = match word.as_deref() {
            Some("iterable") => {
                if readonly {
                    return Err(self.error("iterable declarations cannot be readonly"));
                }
                self.advance();
                self.expect(&TokenKind::LAngle)?;
                let first = self.parse_type_with_attributes()?.0;
                let second = if self.eat(&TokenKind::Comma) {
                    Some(self.parse_type_with_attributes()?.0)
                } else {
                    None
                };
                self.expect(&TokenKind::RAngle)?;
                if is_async && self.check(&TokenKind::LParen) {
                    self.parse_arguments()?;
                }
                match second {
                    Some(value) => (CollectionKind::Iterable, Some(first), value),
                    None => (CollectionKind::Iterable, None, first),
                }
            }
            Some("maplike") => {
                self.advance();
                self.expect(&TokenKind::LAngle)?;
                let key = self.parse_type_with_attributes()?.0;
                self.expect(&TokenKind::Comma)?;
                let value = self.parse_type_with_attributes()?.0;
                self.expect(&TokenKind::RAngle)?;
                (CollectionKind::Maplike, Some(key), value)
            }
            Some("setlike") => {
                self.advance();
                self.expect(&TokenKind::LAngle)?;
                let value = self.parse_type_with_attributes()?.0;
                self.expect(&TokenKind::RAngle)?;
                (CollectionKind::Setlike, None, value)
            }
            _ => return Err(self.unexpected("'iterable', 'maplike' or 'setlike'")),
        };

        if is_async && kind != CollectionKind::Iterable {
            return Err(self.error_at(start, "only iterable declarations can be async"));
        }
        let end = self.expect(&TokenKind::Semicolon)?;

        Ok(CollectionDecl {
            kind,
            key,
            value,
            readonly,
            is_async,
            span: start.to(end),
        })
    }

    fn parse_arguments(&mut self) -> Result<Vec<Parameter>> {
        self.expect(&TokenKind::LParen)?;
        let mut arguments = Vec::new();

        if self.eat(&TokenKind::RParen) {
            return Ok(arguments);
        }
        loop {
            arguments.push(self.parse_argument()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RParen)?;

        Ok(arguments)
    }

    fn parse_argument(&mut self) -> Result<Parameter> {
        let start = self.current().span;
        let mut attributes = self.parse_extended_attributes()?;
        let optional = self.eat_word("optional");
        let (ty, type_attributes) = self.parse_type_with_attributes()?;
        attributes.extend(type_attributes);
        let variadic = self.eat(&TokenKind::Ellipsis);
        let (name, name_span) = self.expect_identifier("argument name")?;
        let default = if self.eat(&TokenKind::Equals) {
            Some(self.parse_literal()?)
        } else {
            None
        };

        Ok(Parameter {
            name,
            ty,
            optional,
            default,
            variadic,
            attributes,
            span: start.to(name_span),
        })
    }

    // =========================================================================
    // Extended Attributes
    // =========================================================================

    fn parse_extended_attributes(&mut self) -> Result<ExtendedAttributes> {
        let mut list = ExtendedAttributes::new();

        while self.eat(&TokenKind::LBracket) {
            loop {
                list.0.push(self.parse_extended_attribute()?);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
            self.expect(&TokenKind::RBracket)?;
        }

        Ok(list)
    }

    fn parse_extended_attribute(&mut self) -> Result<ExtendedAttribute> {
        self.descend()?;
        let attribute = self.parse_extended_attribute_inner()?;
        self.nesting -= 1;
        Ok(attribute)
    }

    fn parse_extended_attribute_inner(&mut self) -> Result<ExtendedAttribute> {
        let TokenKind::Ident(name) = &self.current().kind else {
            return Err(self.unexpected("extended attribute name"));
        };
        let name = name.clone();
        let start = self.current().span;
        self.advance();

        let value = if self.eat(&TokenKind::Equals) {
            let current = self.current().kind.clone();
            match current {
                TokenKind::Ident(id) => {
                    self.advance();
                    if self.check(&TokenKind::LParen) {
                        ExtendedAttributeValue::NamedArgumentList {
                            name: id,
                            arguments: self.parse_arguments()?,
                        }
                    } else {
                        ExtendedAttributeValue::Identifier(id)
                    }
                }
                TokenKind::LParen => {
                    self.advance();
                    let mut ids = Vec::new();
                    loop {
                        match &self.current().kind {
                            TokenKind::Ident(id) | TokenKind::String(id) => ids.push(id.clone()),
                            _ => return Err(self.unexpected("identifier")),
                        }
                        self.advance();
                        if !self.eat(&TokenKind::Comma) {
                            break;
                        }
                    }
                    self.expect(&TokenKind::RParen)?;
                    ExtendedAttributeValue::IdentifierList(ids)
                }
                TokenKind::String(s) => {
                    self.advance();
                    ExtendedAttributeValue::String(s)
                }
                TokenKind::Integer(n) => {
                    self.advance();
                    ExtendedAttributeValue::Integer(n)
                }
                TokenKind::Decimal(n) => {
                    self.advance();
                    ExtendedAttributeValue::Decimal(n)
                }
                TokenKind::Star => {
                    self.advance();
                    ExtendedAttributeValue::Wildcard
                }
                _ => return Err(self.unexpected("extended attribute value")),
            }
        } else if self.check(&TokenKind::LParen) {
            ExtendedAttributeValue::ArgumentList(self.parse_arguments()?)
        } else {
            ExtendedAttributeValue::None
        };

        Ok(ExtendedAttribute {
            name,
            value,
            span: start.to(self.previous_span()),
        })
    }

    // =========================================================================
    // Types and Literals
    // =========================================================================

    /// Parses a type and the extended attributes written in front of it.
    fn parse_type_with_attributes(&mut self) -> Result<(TypeRef, ExtendedAttributes)> {
        let attributes = self.parse_extended_attributes()?;
        let ty = self.parse_type()?;
        Ok((ty, attributes))
    }

    fn parse_type(&mut self) -> Result<TypeRef> {
        self.descend()?;
        let ty = self.parse_type_inner()?;
        self.nesting -= 1;
        Ok(ty)
    }

    fn parse_type_inner(&mut self) -> Result<TypeRef> {
        let ty = if self.check(&TokenKind::LParen) {
            self.parse_union()?
        } else {
            self.parse_single_type()?
        };

        if self.eat(&TokenKind::Question) {
            Ok(ty.nullable())
        } else {
            Ok(ty)
        }
    }

    fn parse_union(&mut self) -> Result<TypeRef> {
        let start = self.expect(&TokenKind::LParen)?;
        let mut members = vec![self.parse_type_with_attributes()?.0];
        while self.eat_word("or") {
            members.push(self.parse_type_with_attributes()?.0);
        }
        if members.len() < 2 {
            return Err(self.error_at(start, "a union type needs at least two members"));
        }
        self.expect(&TokenKind::RParen)?;
        Ok(TypeRef::Union(members))
    }

    fn parse_single_type(&mut self) -> Result<TypeRef> {
        if let Some(primitive) = self.parse_primitive()? {
            return Ok(TypeRef::Primitive(primitive));
        }

        let word = self.current_word().map(str::to_owned);
        match word.as_deref() {
            Some(wrapper @ ("sequence" | "FrozenArray" | "ObservableArray" | "Promise")) => {
                let wrapper = wrapper.to_string();
                self.advance();
                self.expect(&TokenKind::LAngle)?;
                let inner = Box::new(self.parse_type_with_attributes()?.0);
                self.expect(&TokenKind::RAngle)?;
                Ok(match wrapper.as_str() {
                    "sequence" => TypeRef::Sequence(inner),
                    "FrozenArray" => TypeRef::FrozenArray(inner),
                    "ObservableArray" => TypeRef::ObservableArray(inner),
                    _ => TypeRef::Promise(inner),
                })
            }
            Some("record") => {
                self.advance();
                self.expect(&TokenKind::LAngle)?;
                let key = self.parse_type_with_attributes()?.0;
                self.expect(&TokenKind::Comma)?;
                let value = self.parse_type_with_attributes()?.0;
                self.expect(&TokenKind::RAngle)?;
                Ok(TypeRef::Record(Box::new(key), Box::new(value)))
            }
            Some(name) => {
                let name = unescape(name).to_string();
                self.advance();
                Ok(TypeRef::Named(name))
            }
            None => Err(self.unexpected("type")),
        }
    }

    /// Parses a built-in type name, including the multi-word ones.
    fn parse_primitive(&mut self) -> Result<Option<Primitive>> {
        let Some(word) = self.current_word().map(str::to_owned) else {
            return Ok(None);
        };

        let spelling = match word.as_str() {
            "unsigned" => {
                self.advance();
                match self.current_word() {
                    Some("short") => {
                        self.advance();
                        "unsigned short"
                    }
                    Some("long") => {
                        self.advance();
                        if self.eat_word("long") {
                            "unsigned long long"
                        } else {
                            "unsigned long"
                        }
                    }
                    _ => return Err(self.unexpected("'short' or 'long' after 'unsigned'")),
                }
            }
            "unrestricted" => {
                self.advance();
                match self.current_word() {
                    Some("float") => {
                        self.advance();
                        "unrestricted float"
                    }
                    Some("double") => {
                        self.advance();
                        "unrestricted double"
                    }
                    _ => return Err(self.unexpected("'float' or 'double' after 'unrestricted'")),
                }
            }
            "long" => {
                self.advance();
                if self.eat_word("long") {
                    "long long"
                } else {
                    "long"
                }
            }
            other => match Primitive::from_name(other) {
                Some(primitive) => {
                    self.advance();
                    return Ok(Some(primitive));
                }
                None => return Ok(None),
            },
        };

        Ok(Primitive::from_name(spelling))
    }

    fn parse_literal(&mut self) -> Result<Literal> {
        let current = self.current().kind.clone();
        let literal = match current {
            TokenKind::Ident(word) => match word.as_str() {
                "true" => Literal::Boolean(true),
                "false" => Literal::Boolean(false),
                "null" => Literal::Null,
                "undefined" => Literal::Undefined,
                "Infinity" => Literal::Decimal(f64::INFINITY),
                "NaN" => Literal::Decimal(f64::NAN),
                _ => return Err(self.unexpected("literal value")),
            },
            TokenKind::Minus => {
                self.advance();
                if self.current_is_word("Infinity") {
                    Literal::Decimal(f64::NEG_INFINITY)
                } else {
                    return Err(self.unexpected("'Infinity' after '-'"));
                }
            }
            TokenKind::Integer(n) => Literal::Integer(n),
            TokenKind::Decimal(n) => Literal::Decimal(n),
            TokenKind::String(s) => Literal::String(s),
            TokenKind::LBracket => {
                self.advance();
                if !self.check(&TokenKind::RBracket) {
                    return Err(self.unexpected("']'"));
                }
                Literal::EmptySequence
            }
            TokenKind::LBrace => {
                self.advance();
                if !self.check(&TokenKind::RBrace) {
                    return Err(self.unexpected("'}'"));
                }
                Literal::EmptyDictionary
            }
            _ => return Err(self.unexpected("literal value")),
        };
        self.advance();
        Ok(literal)
    }

    // =========================================================================
    // Recovery
    // =========================================================================

    /// Skips the declaration that started at token index `start`.
    ///
    /// Stops after the first `;` at brace depth zero or below, or in front
    /// of a definition keyword (or the extended attributes introducing one)
    /// that follows a `;` or `}`. Always consumes at least one token.
    fn recover(&mut self, start: usize) {
        let mut depth: i32 = 0;
        let mut i = start;

        loop {
            let Some(token) = self.tokens.get(i) else {
                self.pos = self.tokens.len().saturating_sub(1);
                return;
            };
            if token.kind == TokenKind::Eof {
                self.pos = i;
                return;
            }
            if i > start && self.starts_definition(i) {
                self.pos = i;
                return;
            }
            match token.kind {
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => depth -= 1,
                TokenKind::Semicolon if depth <= 0 => {
                    self.pos = i + 1;
                    return;
                }
                _ => {}
            }
            i += 1;
        }
    }

    /// Returns true if a new top-level definition plausibly begins at `i`.
    fn starts_definition(&self, i: usize) -> bool {
        let after_boundary = i
            .checked_sub(1)
            .and_then(|p| self.tokens.get(p))
            .is_some_and(|t| matches!(t.kind, TokenKind::Semicolon | TokenKind::RBrace));
        if !after_boundary {
            return false;
        }

        let keyword_at = |j: usize| {
            self.tokens.get(j).is_some_and(|t| {
                matches!(&t.kind, TokenKind::Ident(w) if DEFINITION_KEYWORDS.contains(&w.as_str()))
            })
        };

        match self.tokens.get(i).map(|t| &t.kind) {
            Some(TokenKind::LBracket) => {
                let mut nesting = 0usize;
                for (j, token) in self.tokens.iter().enumerate().skip(i) {
                    match token.kind {
                        TokenKind::LBracket => nesting += 1,
                        TokenKind::RBracket => {
                            nesting = nesting.saturating_sub(1);
                            if nesting == 0 {
                                return keyword_at(j + 1);
                            }
                        }
                        TokenKind::Semicolon | TokenKind::Eof => return false,
                        _ => {}
                    }
                }
                false
            }
            Some(_) => keyword_at(i),
            None => false,
        }
    }

    // =========================================================================
    // Token Helpers
    // =========================================================================

    fn descend(&mut self) -> Result<()> {
        if self.nesting >= MAX_NESTING {
            return Err(self.error("nesting is too deep"));
        }
        self.nesting += 1;
        Ok(())
    }

    fn current(&self) -> &Token {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[self.pos.min(last)]
    }

    fn previous_span(&self) -> Span {
        self.pos
            .checked_sub(1)
            .and_then(|p| self.tokens.get(p))
            .map_or_else(|| self.current().span, |t| t.span)
    }

    fn at_eof(&self) -> bool {
        self.current().kind == TokenKind::Eof
    }

    fn advance(&mut self) {
        if !self.at_eof() {
            self.pos += 1;
        }
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.current().kind) == std::mem::discriminant(kind)
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Expects the current token to be of a specific kind, then advances.
    fn expect(&mut self, kind: &TokenKind) -> Result<Span> {
        if self.check(kind) {
            let span = self.current().span;
            self.advance();
            Ok(span)
        } else {
            Err(self.unexpected(kind.name()))
        }
    }

    /// Expects the `;` that closes a braced declaration.
    fn expect_terminator(&mut self) -> Result<Span> {
        if self.check(&TokenKind::Semicolon) {
            return self.expect(&TokenKind::Semicolon);
        }
        Err(self.error_at(self.previous_span(), "missing ';' after '}'"))
    }

    fn current_word(&self) -> Option<&str> {
        match &self.current().kind {
            TokenKind::Ident(word) => Some(word),
            _ => None,
        }
    }

    fn word_at(&self, offset: usize) -> Option<&str> {
        match self.tokens.get(self.pos + offset).map(|t| &t.kind) {
            Some(TokenKind::Ident(word)) => Some(word),
            _ => None,
        }
    }

    fn current_is_word(&self, word: &str) -> bool {
        self.current().is_word(word)
    }

    fn eat_word(&mut self, word: &str) -> bool {
        if self.current_is_word(word) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_word(&mut self, word: &str) -> Result<()> {
        if self.eat_word(word) {
            Ok(())
        } else {
            Err(self.unexpected(&format!("'{word}'")))
        }
    }

    /// Expects an identifier, removing one leading escape underscore.
    fn expect_identifier(&mut self, what: &str) -> Result<(String, Span)> {
        match &self.current().kind {
            TokenKind::Ident(raw) => {
                let name = unescape(raw).to_string();
                let span = self.current().span;
                self.advance();
                Ok((name, span))
            }
            _ => Err(self.unexpected(what)),
        }
    }

    fn at_attribute(&self) -> bool {
        matches!(self.current_word(), Some("readonly" | "attribute" | "inherit"))
            && !self.at_collection()
    }

    fn at_collection(&self) -> bool {
        match self.current_word() {
            Some("iterable" | "maplike" | "setlike") => true,
            Some("async") => self.word_at(1) == Some("iterable"),
            Some("readonly") => matches!(self.word_at(1), Some("maplike" | "setlike")),
            _ => false,
        }
    }

    fn require_body(&self, actual: BodyKind, required: BodyKind, what: &str) -> Result<()> {
        if actual == required {
            Ok(())
        } else {
            Err(self.error(&format!("{what} are not allowed in {}", actual.describe())))
        }
    }

    fn forbid_body(&self, actual: BodyKind, forbidden: BodyKind, what: &str) -> Result<()> {
        if actual == forbidden {
            Err(self.error(&format!("{what} are not allowed in {}", actual.describe())))
        } else {
            Ok(())
        }
    }

    // =========================================================================
    // Errors
    // =========================================================================

    /// Creates a syntax error at the current position.
    fn error(&self, message: &str) -> Error {
        self.error_at(self.current().span, message)
    }

    /// Creates a syntax error at a specific span.
    fn error_at(&self, span: Span, message: &str) -> Error {
        Error::new(ErrorKind::Syntax {
            message: message.to_string(),
            line: span.line,
            column: span.column,
        })
        .with_context(
            ErrorContext::new()
                .with_source(self.source_name.clone())
                .with_position(span.line, span.column),
        )
    }

    /// Creates an "expected X, found Y" error, surfacing lexer errors as-is.
    fn unexpected(&self, expected: &str) -> Error {
        match &self.current().kind {
            TokenKind::Error(message) => self.error(message),
            TokenKind::Ident(word) => {
                self.error(&format!("expected {expected}, found identifier `{word}`"))
            }
            kind => self.error(&format!("expected {expected}, found {}", kind.name())),
        }
    }
}

/// Strips the single leading underscore that escapes keyword-like names.
fn unescape(name: &str) -> &str {
    name.strip_prefix('_').unwrap_or(name)
}

fn definition_label(definition: &Definition) -> String {
    match definition {
        Definition::Declaration(decl) => format!("{} {}", decl.kind(), decl.name()),
        Definition::Includes(inc) => format!("{} includes {}", inc.target, inc.mixin),
    }
}

/// Parses anonymous source text.
#[must_use]
pub fn parse(source: &str) -> ParseOutput {
    Parser::new(source).parse_all()
}

/// Parses a registered source file.
///
/// # Errors
/// Returns an error if `id` is not registered in `sources`.
pub fn parse_file(sources: &SourceMap, id: SourceId) -> Result<ParseOutput> {
    let file = sources
        .get(id)
        .ok_or_else(|| Error::new(ErrorKind::Internal(format!("unknown source id {}", id.0))))?;
    Ok(Parser::with_source(&file.text, id, file.name.to_string()).parse_all())
}
