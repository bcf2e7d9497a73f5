//! Recognized extended attributes and where they may appear.

use std::fmt;

use idlbind_language::{ExtendedAttribute, ExtendedAttributeValue};

/// The kind of construct an extended attribute is attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Target {
    /// An interface.
    Interface,
    /// An interface mixin.
    InterfaceMixin,
    /// A callback interface.
    CallbackInterface,
    /// A callback function.
    CallbackFunction,
    /// A dictionary.
    Dictionary,
    /// An enum.
    Enum,
    /// A typedef.
    Typedef,
    /// A writable attribute.
    Attribute,
    /// A readonly attribute.
    ReadonlyAttribute,
    /// A regular or static operation.
    Operation,
    /// A getter, setter, deleter, or stringifier.
    SpecialOperation,
    /// A constructor.
    Constructor,
    /// A constant.
    Constant,
    /// An operation or callback parameter.
    Parameter,
    /// A dictionary member.
    DictionaryMember,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Interface => "interface",
            Self::InterfaceMixin => "interface mixin",
            Self::CallbackInterface => "callback interface",
            Self::CallbackFunction => "callback",
            Self::Dictionary => "dictionary",
            Self::Enum => "enum",
            Self::Typedef => "typedef",
            Self::Attribute => "attribute",
            Self::ReadonlyAttribute => "readonly attribute",
            Self::Operation => "operation",
            Self::SpecialOperation => "special operation",
            Self::Constructor => "constructor",
            Self::Constant => "constant",
            Self::Parameter => "parameter",
            Self::DictionaryMember => "dictionary member",
        };
        f.write_str(s)
    }
}

/// The syntactic form of an extended attribute's argument.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Shape {
    /// `[X]`
    None,
    /// `[X=Y]`
    Identifier,
    /// `[X=(Y, Z)]`
    IdentifierList,
    /// `[X="y"]`
    String,
    /// `[X=1]` or `[X=1.5]`
    Number,
    /// `[X=*]`
    Wildcard,
    /// `[X(args)]`
    ArgumentList,
    /// `[X=Y(args)]`
    NamedArgumentList,
}

impl Shape {
    /// Returns the shape of `value`.
    #[must_use]
    pub const fn of(value: &ExtendedAttributeValue) -> Self {
        match value {
            ExtendedAttributeValue::None => Self::None,
            ExtendedAttributeValue::Identifier(_) => Self::Identifier,
            ExtendedAttributeValue::IdentifierList(_) => Self::IdentifierList,
            ExtendedAttributeValue::String(_) => Self::String,
            ExtendedAttributeValue::Integer(_) | ExtendedAttributeValue::Decimal(_) => {
                Self::Number
            }
            ExtendedAttributeValue::Wildcard => Self::Wildcard,
            ExtendedAttributeValue::ArgumentList(_) => Self::ArgumentList,
            ExtendedAttributeValue::NamedArgumentList { .. } => Self::NamedArgumentList,
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::None => "no argument",
            Self::Identifier => "an identifier",
            Self::IdentifierList => "an identifier list",
            Self::String => "a string",
            Self::Number => "a number",
            Self::Wildcard => "`*`",
            Self::ArgumentList => "an argument list",
            Self::NamedArgumentList => "a named argument list",
        };
        f.write_str(s)
    }
}

/// Where a recognized attribute may appear and what argument it takes.
#[derive(Clone, Copy, Debug)]
pub struct AttributeRule {
    /// Attribute name.
    pub name: &'static str,
    /// Constructs it may be attached to. Empty means any.
    pub targets: &'static [Target],
    /// Accepted argument shapes.
    pub shapes: &'static [Shape],
}

impl AttributeRule {
    /// Returns true if the rule allows `target`.
    #[must_use]
    pub fn allows(&self, target: Target) -> bool {
        self.targets.is_empty() || self.targets.contains(&target)
    }

    /// Returns true if the rule accepts the argument shape of `value`.
    #[must_use]
    pub fn accepts(&self, value: &ExtendedAttributeValue) -> bool {
        self.shapes.contains(&Shape::of(value))
    }

    /// Describes the accepted shapes, e.g. "an identifier or an identifier list".
    #[must_use]
    pub fn expected_shapes(&self) -> String {
        self.shapes
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" or ")
    }
}

use Shape as S;
use Target as T;

const FLAG: &[Shape] = &[S::None];
const ATTRIBUTES: &[Target] = &[T::Attribute, T::ReadonlyAttribute];
const TYPED_SLOTS: &[Target] = &[T::Attribute, T::Parameter, T::DictionaryMember];
const EXPOSABLE: &[Target] = &[
    T::Interface,
    T::InterfaceMixin,
    T::CallbackInterface,
    T::Attribute,
    T::ReadonlyAttribute,
    T::Operation,
    T::Constructor,
    T::Constant,
];

/// Every recognized extended attribute.
pub const RULES: &[AttributeRule] = &[
    AttributeRule {
        name: "CEReactions",
        targets: &[T::Operation, T::SpecialOperation, T::Attribute],
        shapes: FLAG,
    },
    AttributeRule {
        name: "NewObject",
        targets: &[T::Operation],
        shapes: FLAG,
    },
    AttributeRule {
        name: "HTMLConstructor",
        targets: &[T::Constructor],
        shapes: FLAG,
    },
    AttributeRule {
        name: "LegacyFactoryFunction",
        targets: &[T::Interface],
        shapes: &[S::NamedArgumentList, S::Identifier],
    },
    AttributeRule {
        name: "Exposed",
        targets: EXPOSABLE,
        shapes: &[S::Identifier, S::IdentifierList, S::Wildcard],
    },
    AttributeRule {
        name: "Global",
        targets: &[T::Interface],
        shapes: &[S::Identifier, S::IdentifierList],
    },
    AttributeRule {
        name: "LegacyUnenumerableNamedProperties",
        targets: &[T::Interface],
        shapes: FLAG,
    },
    AttributeRule {
        name: "LegacyOverrideBuiltIns",
        targets: &[T::Interface],
        shapes: FLAG,
    },
    AttributeRule {
        name: "SameObject",
        targets: &[T::ReadonlyAttribute],
        shapes: FLAG,
    },
    AttributeRule {
        name: "PutForwards",
        targets: &[T::ReadonlyAttribute],
        shapes: &[S::Identifier],
    },
    AttributeRule {
        name: "Replaceable",
        targets: &[T::ReadonlyAttribute],
        shapes: FLAG,
    },
    AttributeRule {
        name: "Reflect",
        targets: ATTRIBUTES,
        shapes: &[S::None, S::Identifier, S::String],
    },
    AttributeRule {
        name: "Unscopable",
        targets: &[T::Attribute, T::ReadonlyAttribute, T::Operation],
        shapes: FLAG,
    },
    AttributeRule {
        name: "LegacyUnforgeable",
        targets: &[T::Attribute, T::ReadonlyAttribute, T::Operation],
        shapes: FLAG,
    },
    AttributeRule {
        name: "SecureContext",
        targets: &[],
        shapes: FLAG,
    },
    AttributeRule {
        name: "CrossOriginIsolated",
        targets: &[],
        shapes: FLAG,
    },
    AttributeRule {
        name: "Default",
        targets: &[T::Operation],
        shapes: FLAG,
    },
    AttributeRule {
        name: "Clamp",
        targets: TYPED_SLOTS,
        shapes: FLAG,
    },
    AttributeRule {
        name: "EnforceRange",
        targets: TYPED_SLOTS,
        shapes: FLAG,
    },
    AttributeRule {
        name: "LegacyNullToEmptyString",
        targets: TYPED_SLOTS,
        shapes: FLAG,
    },
    AttributeRule {
        name: "AllowShared",
        targets: TYPED_SLOTS,
        shapes: FLAG,
    },
    AttributeRule {
        name: "LegacyWindowAlias",
        targets: &[T::Interface],
        shapes: &[S::Identifier, S::IdentifierList],
    },
    AttributeRule {
        name: "LegacyNoInterfaceObject",
        targets: &[T::Interface],
        shapes: FLAG,
    },
    AttributeRule {
        name: "LegacyLenientThis",
        targets: ATTRIBUTES,
        shapes: FLAG,
    },
    AttributeRule {
        name: "LegacyLenientSetter",
        targets: &[T::ReadonlyAttribute],
        shapes: FLAG,
    },
    AttributeRule {
        name: "LegacyTreatNonObjectAsNull",
        targets: &[T::CallbackFunction],
        shapes: FLAG,
    },
    AttributeRule {
        name: "Serializable",
        targets: &[T::Interface],
        shapes: FLAG,
    },
    AttributeRule {
        name: "Transferable",
        targets: &[T::Interface],
        shapes: FLAG,
    },
];

/// Looks up the rule for `name`.
#[must_use]
pub fn rule(name: &str) -> Option<&'static AttributeRule> {
    RULES.iter().find(|r| r.name == name)
}

/// Why an extended attribute was rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rejection {
    /// Not in the table.
    Unknown,
    /// Recognized, but not allowed on this target.
    Target,
    /// Recognized, but the argument has the wrong form.
    Shape(String),
}

impl Rejection {
    /// Returns a human-readable reason.
    #[must_use]
    pub fn reason(&self, target: Target) -> String {
        match self {
            Self::Unknown => "unrecognized extended attribute".to_string(),
            Self::Target => format!("not applicable to {target}"),
            Self::Shape(expected) => format!("expected {expected}"),
        }
    }
}

/// Checks one attribute against the table.
///
/// # Errors
/// Returns why the attribute is not acceptable on `target`.
pub fn check(attribute: &ExtendedAttribute, target: Target) -> Result<(), Rejection> {
    let rule = rule(&attribute.name).ok_or(Rejection::Unknown)?;
    if !rule.allows(target) {
        return Err(Rejection::Target);
    }
    if !rule.accepts(&attribute.value) {
        return Err(Rejection::Shape(rule.expected_shapes()));
    }
    Ok(())
}
