//! Type references resolved against the symbol table.

use std::fmt;

use idlbind_foundation::{Error, Primitive, Result};
use idlbind_language::{Declaration, DeclarationKind, TypeRef};
use idlbind_registry::SymbolTable;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A type with every name bound to a declaration and typedefs expanded.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum ResolvedType {
    /// A built-in type.
    Primitive {
        /// The primitive.
        primitive: Primitive,
    },
    /// A declared interface, callback, dictionary, or enum.
    Named {
        /// Declaration name.
        name: String,
        /// What the name refers to. Never a typedef or mixin.
        kind: DeclarationKind,
    },
    /// `T?`
    Nullable {
        /// The non-null type.
        inner: Box<ResolvedType>,
    },
    /// `sequence<T>`
    Sequence {
        /// Element type.
        inner: Box<ResolvedType>,
    },
    /// `FrozenArray<T>`
    FrozenArray {
        /// Element type.
        inner: Box<ResolvedType>,
    },
    /// `ObservableArray<T>`
    ObservableArray {
        /// Element type.
        inner: Box<ResolvedType>,
    },
    /// `Promise<T>`
    Promise {
        /// Resolution type.
        inner: Box<ResolvedType>,
    },
    /// `record<K, V>`
    Record {
        /// Key type.
        key: Box<ResolvedType>,
        /// Value type.
        value: Box<ResolvedType>,
    },
    /// `(A or B ...)`
    Union {
        /// Member types in source order.
        members: Vec<ResolvedType>,
    },
}

impl ResolvedType {
    /// Wraps a primitive.
    #[must_use]
    pub const fn primitive(primitive: Primitive) -> Self {
        Self::Primitive { primitive }
    }

    /// Makes this type nullable. Already-nullable types are unchanged.
    #[must_use]
    pub fn nullable(self) -> Self {
        if self.is_nullable() {
            self
        } else {
            Self::Nullable {
                inner: Box::new(self),
            }
        }
    }

    /// Returns true for `T?`.
    #[must_use]
    pub const fn is_nullable(&self) -> bool {
        matches!(self, Self::Nullable { .. })
    }

    /// Returns the type without its outer `?`.
    #[must_use]
    pub fn non_null(&self) -> &ResolvedType {
        match self {
            Self::Nullable { inner } => inner,
            other => other,
        }
    }

    /// Returns the primitive, if this is one.
    #[must_use]
    pub const fn as_primitive(&self) -> Option<Primitive> {
        match self {
            Self::Primitive { primitive } => Some(*primitive),
            _ => None,
        }
    }

    /// Returns the declaration kind of a named type.
    #[must_use]
    pub const fn named_kind(&self) -> Option<DeclarationKind> {
        match self {
            Self::Named { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Returns true if this type, or a union member, satisfies `predicate`.
    ///
    /// The outer `?` is ignored.
    pub fn any_member(&self, predicate: &impl Fn(&ResolvedType) -> bool) -> bool {
        match self.non_null() {
            Self::Union { members } => members.iter().any(|m| m.any_member(predicate)),
            other => predicate(other),
        }
    }

    /// Returns true if values of this type are platform objects or promises.
    #[must_use]
    pub fn is_object_like(&self) -> bool {
        self.any_member(&|t| {
            matches!(
                t,
                Self::Named {
                    kind: DeclarationKind::Interface,
                    ..
                } | Self::Promise { .. }
                    | Self::Primitive {
                        primitive: Primitive::Object
                    }
            )
        })
    }

    /// Converts back to a source-level type reference.
    #[must_use]
    pub fn to_type_ref(&self) -> TypeRef {
        match self {
            Self::Primitive { primitive } => TypeRef::Primitive(*primitive),
            Self::Named { name, .. } => TypeRef::Named(name.clone()),
            Self::Nullable { inner } => TypeRef::Nullable(Box::new(inner.to_type_ref())),
            Self::Sequence { inner } => TypeRef::Sequence(Box::new(inner.to_type_ref())),
            Self::FrozenArray { inner } => TypeRef::FrozenArray(Box::new(inner.to_type_ref())),
            Self::ObservableArray { inner } => {
                TypeRef::ObservableArray(Box::new(inner.to_type_ref()))
            }
            Self::Promise { inner } => TypeRef::Promise(Box::new(inner.to_type_ref())),
            Self::Record { key, value } => {
                TypeRef::Record(Box::new(key.to_type_ref()), Box::new(value.to_type_ref()))
            }
            Self::Union { members } => {
                TypeRef::Union(members.iter().map(ResolvedType::to_type_ref).collect())
            }
        }
    }
}

impl fmt::Display for ResolvedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive { primitive } => write!(f, "{primitive}"),
            Self::Named { name, .. } => write!(f, "{name}"),
            Self::Nullable { inner } => write!(f, "{inner}?"),
            Self::Sequence { inner } => write!(f, "sequence<{inner}>"),
            Self::FrozenArray { inner } => write!(f, "FrozenArray<{inner}>"),
            Self::ObservableArray { inner } => write!(f, "ObservableArray<{inner}>"),
            Self::Promise { inner } => write!(f, "Promise<{inner}>"),
            Self::Record { key, value } => write!(f, "record<{key}, {value}>"),
            Self::Union { members } => {
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

// =============================================================================
// Resolution
// =============================================================================

/// Binds [`TypeRef`]s to declarations.
#[derive(Clone, Copy, Debug)]
pub struct TypeResolver<'t> {
    table: &'t SymbolTable,
}

impl<'t> TypeResolver<'t> {
    /// Creates a resolver over `table`.
    #[must_use]
    pub const fn new(table: &'t SymbolTable) -> Self {
        Self { table }
    }

    /// Resolves `ty`, written on `member` of `owner`.
    ///
    /// # Errors
    /// Returns `UnresolvedType` for an unknown name, `KindMismatch` for a
    /// mixin used as a type, and `CyclicTypedef` for a typedef that expands
    /// to itself.
    pub fn resolve(&self, ty: &TypeRef, owner: &str, member: &str) -> Result<ResolvedType> {
        let mut expanding = Vec::new();
        self.resolve_in(ty, owner, member, &mut expanding)
    }

    fn resolve_in(
        &self,
        ty: &TypeRef,
        owner: &str,
        member: &str,
        expanding: &mut Vec<String>,
    ) -> Result<ResolvedType> {
        Ok(match ty {
            TypeRef::Primitive(p) => ResolvedType::primitive(*p),
            TypeRef::Named(name) => return self.resolve_name(name, owner, member, expanding),
            TypeRef::Nullable(inner) => self.resolve_in(inner, owner, member, expanding)?.nullable(),
            TypeRef::Sequence(inner) => ResolvedType::Sequence {
                inner: self.boxed(inner, owner, member, expanding)?,
            },
            TypeRef::FrozenArray(inner) => ResolvedType::FrozenArray {
                inner: self.boxed(inner, owner, member, expanding)?,
            },
            TypeRef::ObservableArray(inner) => ResolvedType::ObservableArray {
                inner: self.boxed(inner, owner, member, expanding)?,
            },
            TypeRef::Promise(inner) => ResolvedType::Promise {
                inner: self.boxed(inner, owner, member, expanding)?,
            },
            TypeRef::Record(key, value) => ResolvedType::Record {
                key: self.boxed(key, owner, member, expanding)?,
                value: self.boxed(value, owner, member, expanding)?,
            },
            TypeRef::Union(members) => ResolvedType::Union {
                members: members
                    .iter()
                    .map(|m| self.resolve_in(m, owner, member, expanding))
                    .collect::<Result<_>>()?,
            },
        })
    }

    fn boxed(
        &self,
        ty: &TypeRef,
        owner: &str,
        member: &str,
        expanding: &mut Vec<String>,
    ) -> Result<Box<ResolvedType>> {
        self.resolve_in(ty, owner, member, expanding).map(Box::new)
    }

    fn resolve_name(
        &self,
        name: &str,
        owner: &str,
        member: &str,
        expanding: &mut Vec<String>,
    ) -> Result<ResolvedType> {
        let Some(decl) = self.table.get(name) else {
            return Err(Error::unresolved_type(name, member, owner));
        };

        match decl {
            Declaration::Typedef(typedef) => {
                if expanding.iter().any(|n| n == name) {
                    let mut chain = expanding.clone();
                    chain.push(name.to_string());
                    return Err(Error::cyclic_typedef(chain));
                }
                expanding.push(name.to_string());
                let resolved = self.resolve_in(&typedef.ty, owner, member, expanding);
                expanding.pop();
                resolved
            }
            Declaration::InterfaceMixin(_) => Err(Error::kind_mismatch(
                name,
                "type",
                DeclarationKind::InterfaceMixin.to_string(),
            )),
            other => Ok(ResolvedType::Named {
                name: name.to_string(),
                kind: other.kind(),
            }),
        }
    }
}
