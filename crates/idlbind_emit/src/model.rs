//! The binding model handed to code generators.
//!
//! Everything here is plain, read-only data. Types are always
//! [`ResolvedType`]s: named types carry their declaration kind and
//! typedefs are already expanded.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use idlbind_engine::ResolvedType;
use idlbind_language::{CollectionKind, ExtendedAttributes, Literal, Special};

// =============================================================================
// Model
// =============================================================================

/// The complete, generator-agnostic output of a run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BindingModel {
    pub(crate) interfaces: Vec<InterfaceBinding>,
    pub(crate) dictionaries: Vec<DictionaryBinding>,
    pub(crate) enums: Vec<EnumBinding>,
    pub(crate) callback_interfaces: Vec<CallbackInterfaceBinding>,
    pub(crate) callbacks: Vec<CallbackBinding>,
}

impl BindingModel {
    /// Returns the interfaces in declaration order.
    #[must_use]
    pub fn interfaces(&self) -> &[InterfaceBinding] {
        &self.interfaces
    }

    /// Looks up an interface by name.
    #[must_use]
    pub fn interface(&self, name: &str) -> Option<&InterfaceBinding> {
        self.interfaces.iter().find(|i| i.name == name)
    }

    /// Returns the dictionaries.
    #[must_use]
    pub fn dictionaries(&self) -> &[DictionaryBinding] {
        &self.dictionaries
    }

    /// Looks up a dictionary by name.
    #[must_use]
    pub fn dictionary(&self, name: &str) -> Option<&DictionaryBinding> {
        self.dictionaries.iter().find(|d| d.name == name)
    }

    /// Returns the enums.
    #[must_use]
    pub fn enums(&self) -> &[EnumBinding] {
        &self.enums
    }

    /// Looks up an enum by name.
    #[must_use]
    pub fn enumeration(&self, name: &str) -> Option<&EnumBinding> {
        self.enums.iter().find(|e| e.name == name)
    }

    /// Returns the callback interfaces.
    #[must_use]
    pub fn callback_interfaces(&self) -> &[CallbackInterfaceBinding] {
        &self.callback_interfaces
    }

    /// Returns the callback functions.
    #[must_use]
    pub fn callbacks(&self) -> &[CallbackBinding] {
        &self.callbacks
    }

    /// Returns the total number of top-level bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.interfaces.len()
            + self.dictionaries.len()
            + self.enums.len()
            + self.callback_interfaces.len()
            + self.callbacks.len()
    }

    /// Returns true if the model has no bindings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// =============================================================================
// Interfaces
// =============================================================================

/// One interface, flattened.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InterfaceBinding {
    /// Interface name.
    pub name: String,
    /// Direct parent.
    pub parent: Option<String>,
    /// Every interface in the chain, root first, ending with this one.
    pub ancestry: Vec<String>,
    /// Inheritance depth (0 for a root interface).
    pub depth: usize,
    /// Effective members, constructors excluded, in stable order.
    pub members: Vec<MemberBinding>,
    /// Global names from `[Exposed]`; `*` means every global.
    pub exposure: Vec<String>,
    /// Legacy factory functions such as `Image`.
    pub legacy_factory_functions: Vec<FactoryBinding>,
    /// Constructor overloads.
    pub constructors: Vec<ConstructorBinding>,
    /// `iterable`, `maplike`, or `setlike` declaration.
    pub collection: Option<CollectionBinding>,
    /// Extended attributes of the interface itself.
    pub extended_attributes: ExtendedAttributes,
}

impl InterfaceBinding {
    /// Returns true if the interface declares at least one constructor.
    #[must_use]
    pub fn has_constructor(&self) -> bool {
        !self.constructors.is_empty()
    }

    /// Returns the member named `name`, first occurrence.
    #[must_use]
    pub fn member(&self, name: &str) -> Option<&MemberBinding> {
        self.members.iter().find(|m| m.name == name)
    }

    /// Iterates the overloads of an operation.
    pub fn overloads<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a MemberBinding> {
        self.members
            .iter()
            .filter(move |m| m.name == name && matches!(m.detail, MemberDetail::Operation { .. }))
    }

    /// Returns the members that entered at this interface's own level,
    /// its mixins included.
    pub fn own_members(&self) -> impl Iterator<Item = &MemberBinding> {
        self.members.iter().filter(|m| m.depth == self.depth)
    }
}

/// One effective member of an interface or callback interface.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MemberBinding {
    /// Member name (the special keyword for unnamed specials).
    pub name: String,
    /// Kind-specific details.
    pub detail: MemberDetail,
    /// The interface or mixin that declares it.
    pub origin: String,
    /// True if `origin` is a mixin.
    pub from_mixin: bool,
    /// Inheritance depth of the interface it entered through.
    pub depth: usize,
    /// True for static attributes and operations.
    pub is_static: bool,
    /// `[CEReactions]`
    pub ce_reactions: bool,
    /// `[NewObject]`
    pub new_object: bool,
    /// Member-level `[Exposed]` globals, empty when inherited from the owner.
    pub exposure: Vec<String>,
    /// Every extended attribute on the member.
    pub extended_attributes: ExtendedAttributes,
}

impl MemberBinding {
    /// Returns the member kind as a short word.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self.detail {
            MemberDetail::Attribute { .. } => "attribute",
            MemberDetail::Operation { .. } => "operation",
            MemberDetail::Constant { .. } => "constant",
        }
    }
}

/// What distinguishes attributes, operations, and constants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberDetail {
    /// An attribute.
    Attribute {
        /// Attribute type.
        ty: ResolvedType,
        /// True for `readonly`.
        readonly: bool,
        /// True if the type is nullable.
        nullable: bool,
        /// True for `inherit`.
        inherit: bool,
        /// True for `stringifier attribute`.
        stringifier: bool,
    },
    /// A regular, static, or special operation.
    Operation {
        /// Getter, setter, deleter, or stringifier.
        special: Option<Special>,
        /// Return type.
        return_type: ResolvedType,
        /// Arguments in order.
        arguments: Vec<ArgumentBinding>,
    },
    /// A constant.
    Constant {
        /// Constant type.
        ty: ResolvedType,
        /// Constant value.
        value: Literal,
    },
}

/// An operation, constructor, or callback argument.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArgumentBinding {
    /// Argument name.
    pub name: String,
    /// Argument type.
    pub ty: ResolvedType,
    /// True for `optional`.
    pub optional: bool,
    /// Default value.
    pub default: Option<Literal>,
    /// True for `T... name`.
    pub variadic: bool,
    /// Extended attributes on the argument or its type.
    pub extended_attributes: ExtendedAttributes,
}

/// One constructor overload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConstructorBinding {
    /// Arguments in order.
    pub arguments: Vec<ArgumentBinding>,
    /// `[HTMLConstructor]`
    pub html_constructor: bool,
    /// Every extended attribute on the constructor.
    pub extended_attributes: ExtendedAttributes,
}

/// A `[LegacyFactoryFunction]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FactoryBinding {
    /// Global function name.
    pub name: String,
    /// Arguments in order.
    pub arguments: Vec<ArgumentBinding>,
}

/// An `iterable`, `maplike`, or `setlike` declaration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CollectionBinding {
    /// Collection kind.
    pub kind: CollectionKind,
    /// Key type.
    pub key: Option<ResolvedType>,
    /// Value type.
    pub value: ResolvedType,
    /// True for `readonly` maplikes and setlikes.
    pub readonly: bool,
    /// True for `async iterable`.
    pub is_async: bool,
}

// =============================================================================
// Other Declarations
// =============================================================================

/// A dictionary, flattened.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DictionaryBinding {
    /// Dictionary name.
    pub name: String,
    /// Direct parent.
    pub parent: Option<String>,
    /// Members root to leaf, sorted by name within each level.
    pub members: Vec<DictionaryMemberBinding>,
}

/// One dictionary member.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DictionaryMemberBinding {
    /// Member name.
    pub name: String,
    /// Member type.
    pub ty: ResolvedType,
    /// True for `required`.
    pub required: bool,
    /// Default value.
    pub default: Option<Literal>,
    /// Declaring dictionary.
    pub origin: String,
    /// Inheritance depth of `origin`.
    pub depth: usize,
}

/// A callback interface.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CallbackInterfaceBinding {
    /// Name.
    pub name: String,
    /// Members in declaration order.
    pub members: Vec<MemberBinding>,
}

/// A callback function.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CallbackBinding {
    /// Name.
    pub name: String,
    /// Return type.
    pub return_type: ResolvedType,
    /// Arguments in order.
    pub arguments: Vec<ArgumentBinding>,
}

// =============================================================================
// Enums
// =============================================================================

/// One enum value and its integral index.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumValueBinding {
    /// The string value.
    pub value: String,
    /// Zero-based position in declaration order.
    pub index: usize,
}

/// An enum with constant-time value lookup.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(from = "EnumRecord", into = "EnumRecord")]
pub struct EnumBinding {
    name: String,
    values: Vec<EnumValueBinding>,
    lookup: HashMap<String, usize>,
}

impl EnumBinding {
    /// Creates an enum binding from values in declaration order.
    #[must_use]
    pub fn new(name: impl Into<String>, values: impl IntoIterator<Item = String>) -> Self {
        let values: Vec<EnumValueBinding> = values
            .into_iter()
            .enumerate()
            .map(|(index, value)| EnumValueBinding { value, index })
            .collect();
        let lookup = values
            .iter()
            .map(|v| (v.value.clone(), v.index))
            .collect();
        Self {
            name: name.into(),
            values,
            lookup,
        }
    }

    /// Returns the enum name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the values in declaration order.
    #[must_use]
    pub fn values(&self) -> &[EnumValueBinding] {
        &self.values
    }

    /// Returns the index of `value`.
    #[must_use]
    pub fn index_of(&self, value: &str) -> Option<usize> {
        self.lookup.get(value).copied()
    }

    /// Returns the value at `index`.
    #[must_use]
    pub fn value_at(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(|v| v.value.as_str())
    }

    /// Returns the number of values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the enum has no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl PartialEq for EnumBinding {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.values == other.values
    }
}

/// Serialized form of [`EnumBinding`]; the lookup table is rebuilt on load.
#[derive(Clone, Serialize, Deserialize)]
struct EnumRecord {
    name: String,
    values: Vec<EnumValueBinding>,
}

impl From<EnumRecord> for EnumBinding {
    fn from(record: EnumRecord) -> Self {
        Self::new(record.name, record.values.into_iter().map(|v| v.value))
    }
}

impl From<EnumBinding> for EnumRecord {
    fn from(binding: EnumBinding) -> Self {
        Self {
            name: binding.name,
            values: binding.values,
        }
    }
}
