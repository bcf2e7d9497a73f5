//! Declaration records produced by the parser.
//!
//! These are plain data: nothing here resolves names or checks types.
//! Extended attributes are kept verbatim for later stages to interpret.

use std::fmt;

use idlbind_foundation::Primitive;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::span::Span;

// =============================================================================
// Extended Attributes
// =============================================================================

/// The argument part of an extended attribute.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", content = "value"))]
pub enum ExtendedAttributeValue {
    /// `[Name]`
    None,
    /// `[Name=Identifier]`
    Identifier(String),
    /// `[Name=(A, B)]`
    IdentifierList(Vec<String>),
    /// `[Name="text"]`
    String(String),
    /// `[Name=42]`
    Integer(i128),
    /// `[Name=0.5]`
    Decimal(f64),
    /// `[Name=*]`
    Wildcard,
    /// `[Name(arguments)]`
    ArgumentList(Vec<Parameter>),
    /// `[Name=Identifier(arguments)]`
    NamedArgumentList {
        /// The identifier before the parenthesis.
        name: String,
        /// The parsed arguments.
        arguments: Vec<Parameter>,
    },
}

impl ExtendedAttributeValue {
    /// Returns the identifiers this value names, if it is an identifier form.
    #[must_use]
    pub fn identifiers(&self) -> Vec<&str> {
        match self {
            Self::Identifier(id) => vec![id.as_str()],
            Self::IdentifierList(ids) => ids.iter().map(String::as_str).collect(),
            _ => Vec::new(),
        }
    }
}

/// One bracketed annotation, e.g. `[CEReactions]` or `[Exposed=Window]`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExtendedAttribute {
    /// Attribute name.
    pub name: String,
    /// Attribute argument, if any.
    pub value: ExtendedAttributeValue,
    /// Source span.
    pub span: Span,
}

impl ExtendedAttribute {
    /// Creates an argument-less extended attribute.
    #[must_use]
    pub fn flag(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            value: ExtendedAttributeValue::None,
            span,
        }
    }
}

/// An ordered list of extended attributes with lookup by name.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ExtendedAttributes(pub Vec<ExtendedAttribute>);

impl ExtendedAttributes {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the first attribute with the given name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ExtendedAttribute> {
        self.0.iter().find(|a| a.name == name)
    }

    /// Returns every attribute with the given name, in source order.
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a ExtendedAttribute> {
        self.0.iter().filter(move |a| a.name == name)
    }

    /// Returns true if an attribute with this name is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Appends attributes from another list.
    pub fn extend(&mut self, other: ExtendedAttributes) {
        self.0.extend(other.0);
    }

    /// Iterates attributes in source order.
    pub fn iter(&self) -> std::slice::Iter<'_, ExtendedAttribute> {
        self.0.iter()
    }

    /// Returns true if the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the names listed by `[Exposed=...]`, if present.
    #[must_use]
    pub fn exposure(&self) -> Vec<String> {
        self.get("Exposed")
            .map(|a| match &a.value {
                ExtendedAttributeValue::Wildcard => vec!["*".to_string()],
                other => other.identifiers().into_iter().map(String::from).collect(),
            })
            .unwrap_or_default()
    }
}

impl<'a> IntoIterator for &'a ExtendedAttributes {
    type Item = &'a ExtendedAttribute;
    type IntoIter = std::slice::Iter<'a, ExtendedAttribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// =============================================================================
// Types and Literals
// =============================================================================

/// A type as written in source, before name resolution.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TypeRef {
    /// A built-in type.
    Primitive(Primitive),
    /// A name to be resolved through the symbol table.
    Named(String),
    /// `T?`
    Nullable(Box<TypeRef>),
    /// `sequence<T>`
    Sequence(Box<TypeRef>),
    /// `FrozenArray<T>`
    FrozenArray(Box<TypeRef>),
    /// `ObservableArray<T>`
    ObservableArray(Box<TypeRef>),
    /// `Promise<T>`
    Promise(Box<TypeRef>),
    /// `record<K, V>`
    Record(Box<TypeRef>, Box<TypeRef>),
    /// `(A or B or ...)`
    Union(Vec<TypeRef>),
}

impl TypeRef {
    /// Creates a named type reference.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// Wraps this type as nullable.
    #[must_use]
    pub fn nullable(self) -> Self {
        Self::Nullable(Box::new(self))
    }

    /// Returns true if the outermost wrapper is `?`.
    #[must_use]
    pub const fn is_nullable(&self) -> bool {
        matches!(self, Self::Nullable(_))
    }

    /// Returns the type without its nullable wrapper.
    #[must_use]
    pub fn strip_nullable(&self) -> &TypeRef {
        match self {
            Self::Nullable(inner) => inner,
            other => other,
        }
    }

    /// Collects every name this type references, in source order.
    #[must_use]
    pub fn referenced_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_names(&mut names);
        names
    }

    fn collect_names<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Self::Primitive(_) => {}
            Self::Named(name) => out.push(name),
            Self::Nullable(inner)
            | Self::Sequence(inner)
            | Self::FrozenArray(inner)
            | Self::ObservableArray(inner)
            | Self::Promise(inner) => inner.collect_names(out),
            Self::Record(key, value) => {
                key.collect_names(out);
                value.collect_names(out);
            }
            Self::Union(members) => {
                for member in members {
                    member.collect_names(out);
                }
            }
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(p) => write!(f, "{p}"),
            Self::Named(name) => write!(f, "{name}"),
            Self::Nullable(inner) => write!(f, "{inner}?"),
            Self::Sequence(inner) => write!(f, "sequence<{inner}>"),
            Self::FrozenArray(inner) => write!(f, "FrozenArray<{inner}>"),
            Self::ObservableArray(inner) => write!(f, "ObservableArray<{inner}>"),
            Self::Promise(inner) => write!(f, "Promise<{inner}>"),
            Self::Record(key, value) => write!(f, "record<{key}, {value}>"),
            Self::Union(members) => {
                write!(f, "(")?;
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        write!(f, " or ")?;
                    }
                    write!(f, "{member}")?;
                }
                write!(f, ")")
            }
        }
    }
}

/// A literal used as a constant value or a default.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", content = "value"))]
pub enum Literal {
    /// `true` / `false`
    Boolean(bool),
    /// Integer literal.
    Integer(i128),
    /// Decimal literal, `Infinity`, `-Infinity` or `NaN`.
    Decimal(f64),
    /// String literal.
    String(String),
    /// `null`
    Null,
    /// `undefined`
    Undefined,
    /// `[]`
    EmptySequence,
    /// `{}`
    EmptyDictionary,
}

impl Literal {
    /// Returns a short description of the literal's kind.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Boolean(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Decimal(_) => "decimal",
            Self::String(_) => "string",
            Self::Null => "null",
            Self::Undefined => "undefined",
            Self::EmptySequence => "[]",
            Self::EmptyDictionary => "{}",
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Decimal(n) if n.is_nan() => write!(f, "NaN"),
            Self::Decimal(n) if n.is_infinite() && *n > 0.0 => write!(f, "Infinity"),
            Self::Decimal(n) if n.is_infinite() => write!(f, "-Infinity"),
            Self::Decimal(n) => write!(f, "{n:?}"),
            Self::String(s) => write!(f, "\"{s}\""),
            Self::Null => write!(f, "null"),
            Self::Undefined => write!(f, "undefined"),
            Self::EmptySequence => write!(f, "[]"),
            Self::EmptyDictionary => write!(f, "{{}}"),
        }
    }
}

// =============================================================================
// Members
// =============================================================================

/// A parameter of an operation, constructor, or callback.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// Declared type.
    pub ty: TypeRef,
    /// Declared with `optional`.
    pub optional: bool,
    /// Default value, only valid when optional.
    pub default: Option<Literal>,
    /// Declared with `...`.
    pub variadic: bool,
    /// Extended attributes on the parameter or its type.
    pub attributes: ExtendedAttributes,
    /// Source span.
    pub span: Span,
}

impl Parameter {
    /// Creates a required parameter.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: TypeRef, span: Span) -> Self {
        Self {
            name: name.into(),
            ty,
            optional: false,
            default: None,
            variadic: false,
            attributes: ExtendedAttributes::new(),
            span,
        }
    }
}

/// An attribute member, e.g. `[CEReactions] attribute DOMString id;`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Attribute {
    /// Attribute name.
    pub name: String,
    /// Declared type.
    pub ty: TypeRef,
    /// Declared `readonly`.
    pub readonly: bool,
    /// Declared `static`.
    pub is_static: bool,
    /// Declared `inherit`.
    pub inherit: bool,
    /// Declared `stringifier`.
    pub stringifier: bool,
    /// Extended attributes on the member or its type.
    pub attributes: ExtendedAttributes,
    /// Source span.
    pub span: Span,
}

impl Attribute {
    /// Returns true if the declared type is nullable.
    #[must_use]
    pub const fn nullable(&self) -> bool {
        self.ty.is_nullable()
    }

    /// Returns true if marked `[CEReactions]`.
    #[must_use]
    pub fn ce_reactions(&self) -> bool {
        self.attributes.contains("CEReactions")
    }
}

/// The special role an operation plays, if any.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Special {
    /// `constructor(...)`
    Constructor,
    /// `getter`
    Getter,
    /// `setter`
    Setter,
    /// `deleter`
    Deleter,
    /// `stringifier`
    Stringifier,
}

impl Special {
    /// Returns the keyword spelling.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Constructor => "constructor",
            Self::Getter => "getter",
            Self::Setter => "setter",
            Self::Deleter => "deleter",
            Self::Stringifier => "stringifier",
        }
    }
}

/// An operation member, including constructors and special operations.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Operation {
    /// Operation name; `None` for unnamed special operations.
    pub name: Option<String>,
    /// Special role, if any.
    pub special: Option<Special>,
    /// Return type. Constructors return `undefined`.
    pub return_type: TypeRef,
    /// Parameters in declaration order.
    pub arguments: Vec<Parameter>,
    /// Declared `static`.
    pub is_static: bool,
    /// Extended attributes.
    pub attributes: ExtendedAttributes,
    /// Source span.
    pub span: Span,
}

impl Operation {
    /// Returns the name used for lookup and collision checks.
    ///
    /// Unnamed special operations use their keyword.
    #[must_use]
    pub fn display_name(&self) -> &str {
        match (&self.name, self.special) {
            (Some(name), _) => name,
            (None, Some(special)) => special.keyword(),
            (None, None) => "",
        }
    }

    /// Returns true for `constructor(...)`.
    #[must_use]
    pub fn is_constructor(&self) -> bool {
        self.special == Some(Special::Constructor)
    }

    /// Returns true if marked `[NewObject]`.
    #[must_use]
    pub fn new_object(&self) -> bool {
        self.attributes.contains("NewObject")
    }

    /// Returns true if marked `[CEReactions]`.
    #[must_use]
    pub fn ce_reactions(&self) -> bool {
        self.attributes.contains("CEReactions")
    }

    /// Returns the parameter types, used to tell overloads apart.
    #[must_use]
    pub fn signature(&self) -> Vec<TypeRef> {
        self.arguments.iter().map(|a| a.ty.clone()).collect()
    }
}

/// A constant member, e.g. `const unsigned short ELEMENT_NODE = 1;`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Constant {
    /// Constant name.
    pub name: String,
    /// Declared type.
    pub ty: TypeRef,
    /// Constant value.
    pub value: Literal,
    /// Extended attributes.
    pub attributes: ExtendedAttributes,
    /// Source span.
    pub span: Span,
}

/// The broad category of a member.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MemberKind {
    /// An attribute.
    Attribute,
    /// An operation.
    Operation,
    /// A constant.
    Constant,
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attribute => write!(f, "attribute"),
            Self::Operation => write!(f, "operation"),
            Self::Constant => write!(f, "constant"),
        }
    }
}

/// A member of an interface, mixin, or callback interface.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Member {
    /// An attribute.
    Attribute(Attribute),
    /// An operation.
    Operation(Operation),
    /// A constant.
    Constant(Constant),
}

impl Member {
    /// Returns the member name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Attribute(a) => &a.name,
            Self::Operation(o) => o.display_name(),
            Self::Constant(c) => &c.name,
        }
    }

    /// Returns the member category.
    #[must_use]
    pub const fn kind(&self) -> MemberKind {
        match self {
            Self::Attribute(_) => MemberKind::Attribute,
            Self::Operation(_) => MemberKind::Operation,
            Self::Constant(_) => MemberKind::Constant,
        }
    }

    /// Returns true for static attributes and operations.
    #[must_use]
    pub const fn is_static(&self) -> bool {
        match self {
            Self::Attribute(a) => a.is_static,
            Self::Operation(o) => o.is_static,
            Self::Constant(_) => false,
        }
    }

    /// Returns the member's extended attributes.
    #[must_use]
    pub const fn attributes(&self) -> &ExtendedAttributes {
        match self {
            Self::Attribute(a) => &a.attributes,
            Self::Operation(o) => &o.attributes,
            Self::Constant(c) => &c.attributes,
        }
    }

    /// Returns the member's extended attributes for editing.
    pub const fn attributes_mut(&mut self) -> &mut ExtendedAttributes {
        match self {
            Self::Attribute(a) => &mut a.attributes,
            Self::Operation(o) => &mut o.attributes,
            Self::Constant(c) => &mut c.attributes,
        }
    }

    /// Returns the source span.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Attribute(a) => a.span,
            Self::Operation(o) => o.span,
            Self::Constant(c) => c.span,
        }
    }

    /// Returns the operation if this member is one.
    #[must_use]
    pub const fn as_operation(&self) -> Option<&Operation> {
        match self {
            Self::Operation(o) => Some(o),
            _ => None,
        }
    }

    /// Returns a short description like `attribute id` for messages.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Operation(o) if o.is_constructor() => "constructor".to_string(),
            other => format!("{} {}", other.kind(), other.name()),
        }
    }
}

/// An `iterable`, `maplike`, or `setlike` declaration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CollectionDecl {
    /// Which kind of collection.
    pub kind: CollectionKind,
    /// Key type for pair iterables and maplikes.
    pub key: Option<TypeRef>,
    /// Value type.
    pub value: TypeRef,
    /// Declared `readonly` (maplike/setlike only).
    pub readonly: bool,
    /// Declared `async` (iterable only).
    pub is_async: bool,
    /// Source span.
    pub span: Span,
}

/// The kind of collection an interface declares.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CollectionKind {
    /// `iterable<...>`
    Iterable,
    /// `maplike<K, V>`
    Maplike,
    /// `setlike<T>`
    Setlike,
}

// =============================================================================
// Declarations
// =============================================================================

/// `interface Name : Parent { ... };`
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Interface {
    /// Interface name.
    pub name: String,
    /// Parent interface, single inheritance only.
    pub parent: Option<String>,
    /// Members in declaration order.
    pub members: Vec<Member>,
    /// Mixins applied through `includes` statements, in application order.
    pub mixins: Vec<String>,
    /// Collection declaration, if any.
    pub collection: Option<CollectionDecl>,
    /// Declared `partial`.
    pub partial: bool,
    /// Extended attributes.
    pub attributes: ExtendedAttributes,
    /// Source span.
    pub span: Span,
}

impl Interface {
    /// Creates an empty interface.
    #[must_use]
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            parent: None,
            members: Vec::new(),
            mixins: Vec::new(),
            collection: None,
            partial: false,
            attributes: ExtendedAttributes::new(),
            span,
        }
    }

    /// Returns the globals this interface is exposed in.
    #[must_use]
    pub fn exposure(&self) -> Vec<String> {
        self.attributes.exposure()
    }

    /// Returns the names of `[LegacyFactoryFunction=Name(...)]` functions.
    #[must_use]
    pub fn legacy_factory_functions(&self) -> Vec<&str> {
        self.attributes
            .get_all("LegacyFactoryFunction")
            .filter_map(|a| match &a.value {
                ExtendedAttributeValue::NamedArgumentList { name, .. } => Some(name.as_str()),
                ExtendedAttributeValue::Identifier(name) => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Returns true if any member is a constructor.
    #[must_use]
    pub fn has_constructor(&self) -> bool {
        self.members
            .iter()
            .any(|m| m.as_operation().is_some_and(Operation::is_constructor))
    }
}

/// `interface mixin Name { ... };`
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InterfaceMixin {
    /// Mixin name.
    pub name: String,
    /// Members in declaration order.
    pub members: Vec<Member>,
    /// Declared `partial`.
    pub partial: bool,
    /// Extended attributes.
    pub attributes: ExtendedAttributes,
    /// Source span.
    pub span: Span,
}

/// `callback interface Name { ... };`
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CallbackInterface {
    /// Callback interface name.
    pub name: String,
    /// Members in declaration order.
    pub members: Vec<Member>,
    /// Extended attributes.
    pub attributes: ExtendedAttributes,
    /// Source span.
    pub span: Span,
}

/// `callback Name = ReturnType (arguments);`
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CallbackFunction {
    /// Callback name.
    pub name: String,
    /// Return type.
    pub return_type: TypeRef,
    /// Parameters.
    pub arguments: Vec<Parameter>,
    /// Extended attributes.
    pub attributes: ExtendedAttributes,
    /// Source span.
    pub span: Span,
}

/// A member of a dictionary.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DictionaryMember {
    /// Member name.
    pub name: String,
    /// Declared type.
    pub ty: TypeRef,
    /// Declared `required`.
    pub required: bool,
    /// Default value.
    pub default: Option<Literal>,
    /// Extended attributes.
    pub attributes: ExtendedAttributes,
    /// Source span.
    pub span: Span,
}

/// `dictionary Name : Parent { ... };`
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Dictionary {
    /// Dictionary name.
    pub name: String,
    /// Parent dictionary.
    pub parent: Option<String>,
    /// Members in declaration order.
    pub members: Vec<DictionaryMember>,
    /// Declared `partial`.
    pub partial: bool,
    /// Extended attributes.
    pub attributes: ExtendedAttributes,
    /// Source span.
    pub span: Span,
}

/// One value of an enum.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EnumValue {
    /// The string value.
    pub value: String,
    /// Source span.
    pub span: Span,
}

/// `enum Name { "a", "b" };`
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Enum {
    /// Enum name.
    pub name: String,
    /// Values in declaration order.
    pub values: Vec<EnumValue>,
    /// Extended attributes.
    pub attributes: ExtendedAttributes,
    /// Source span.
    pub span: Span,
}

impl Enum {
    /// Returns true if `value` is one of this enum's values.
    #[must_use]
    pub fn has_value(&self, value: &str) -> bool {
        self.values.iter().any(|v| v.value == value)
    }
}

/// `typedef Type Name;`
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Typedef {
    /// New name.
    pub name: String,
    /// Aliased type.
    pub ty: TypeRef,
    /// Extended attributes.
    pub attributes: ExtendedAttributes,
    /// Source span.
    pub span: Span,
}

/// `Target includes Mixin;`
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Includes {
    /// The interface receiving members.
    pub target: String,
    /// The mixin providing them.
    pub mixin: String,
    /// Source span.
    pub span: Span,
}

/// The kind of a named declaration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DeclarationKind {
    /// `interface`
    Interface,
    /// `interface mixin`
    InterfaceMixin,
    /// `callback interface`
    CallbackInterface,
    /// `callback`
    CallbackFunction,
    /// `dictionary`
    Dictionary,
    /// `enum`
    Enum,
    /// `typedef`
    Typedef,
}

impl DeclarationKind {
    /// Returns true if a name of this kind may be used as a type.
    #[must_use]
    pub const fn is_type(self) -> bool {
        !matches!(self, Self::InterfaceMixin)
    }
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Interface => "interface",
            Self::InterfaceMixin => "interface mixin",
            Self::CallbackInterface => "callback interface",
            Self::CallbackFunction => "callback",
            Self::Dictionary => "dictionary",
            Self::Enum => "enum",
            Self::Typedef => "typedef",
        };
        f.write_str(s)
    }
}

/// A named schema unit.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Declaration {
    /// An interface.
    Interface(Interface),
    /// An interface mixin.
    InterfaceMixin(InterfaceMixin),
    /// A callback interface.
    CallbackInterface(CallbackInterface),
    /// A callback function.
    CallbackFunction(CallbackFunction),
    /// A dictionary.
    Dictionary(Dictionary),
    /// An enum.
    Enum(Enum),
    /// A typedef.
    Typedef(Typedef),
}

impl Declaration {
    /// Returns the declared name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Interface(d) => &d.name,
            Self::InterfaceMixin(d) => &d.name,
            Self::CallbackInterface(d) => &d.name,
            Self::CallbackFunction(d) => &d.name,
            Self::Dictionary(d) => &d.name,
            Self::Enum(d) => &d.name,
            Self::Typedef(d) => &d.name,
        }
    }

    /// Returns the declaration kind.
    #[must_use]
    pub const fn kind(&self) -> DeclarationKind {
        match self {
            Self::Interface(_) => DeclarationKind::Interface,
            Self::InterfaceMixin(_) => DeclarationKind::InterfaceMixin,
            Self::CallbackInterface(_) => DeclarationKind::CallbackInterface,
            Self::CallbackFunction(_) => DeclarationKind::CallbackFunction,
            Self::Dictionary(_) => DeclarationKind::Dictionary,
            Self::Enum(_) => DeclarationKind::Enum,
            Self::Typedef(_) => DeclarationKind::Typedef,
        }
    }

    /// Returns true for `partial` fragments.
    #[must_use]
    pub const fn is_partial(&self) -> bool {
        match self {
            Self::Interface(d) => d.partial,
            Self::InterfaceMixin(d) => d.partial,
            Self::Dictionary(d) => d.partial,
            _ => false,
        }
    }

    /// Returns the declaration's extended attributes.
    #[must_use]
    pub const fn attributes(&self) -> &ExtendedAttributes {
        match self {
            Self::Interface(d) => &d.attributes,
            Self::InterfaceMixin(d) => &d.attributes,
            Self::CallbackInterface(d) => &d.attributes,
            Self::CallbackFunction(d) => &d.attributes,
            Self::Dictionary(d) => &d.attributes,
            Self::Enum(d) => &d.attributes,
            Self::Typedef(d) => &d.attributes,
        }
    }

    /// Returns the source span.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Interface(d) => d.span,
            Self::InterfaceMixin(d) => d.span,
            Self::CallbackInterface(d) => d.span,
            Self::CallbackFunction(d) => d.span,
            Self::Dictionary(d) => d.span,
            Self::Enum(d) => d.span,
            Self::Typedef(d) => d.span,
        }
    }

    /// Returns the interface if this is one.
    #[must_use]
    pub const fn as_interface(&self) -> Option<&Interface> {
        match self {
            Self::Interface(i) => Some(i),
            _ => None,
        }
    }

    /// Returns the dictionary if this is one.
    #[must_use]
    pub const fn as_dictionary(&self) -> Option<&Dictionary> {
        match self {
            Self::Dictionary(d) => Some(d),
            _ => None,
        }
    }

    /// Returns the enum if this is one.
    #[must_use]
    pub const fn as_enum(&self) -> Option<&Enum> {
        match self {
            Self::Enum(e) => Some(e),
            _ => None,
        }
    }

    /// Returns the mixin if this is one.
    #[must_use]
    pub const fn as_mixin(&self) -> Option<&InterfaceMixin> {
        match self {
            Self::InterfaceMixin(m) => Some(m),
            _ => None,
        }
    }

    /// Returns the declaration's members, for kinds that have them.
    #[must_use]
    pub fn members(&self) -> &[Member] {
        match self {
            Self::Interface(d) => &d.members,
            Self::InterfaceMixin(d) => &d.members,
            Self::CallbackInterface(d) => &d.members,
            _ => &[],
        }
    }
}

/// A top-level item in a source file.
#[derive(Clone, Debug, PartialEq)]
pub enum Definition {
    /// A named declaration.
    Declaration(Declaration),
    /// An `includes` statement.
    Includes(Includes),
}
