//! Inheritance and mixin resolution.
//!
//! Flattening walks an interface's parent chain with a visited set, then
//! concatenates members root to leaf. At each level the included mixins'
//! members come first, then the interface's own. A later member replaces
//! an earlier one with the same shadow key in place; a later member of a
//! different kind with the same name and static-ness replaces the whole
//! earlier group.

use std::collections::{HashMap, HashSet};
use std::fmt;

use tracing::{debug, trace};

use idlbind_foundation::{Error, Result};
use idlbind_language::{
    Declaration, DeclarationKind, DictionaryMember, Interface, Member, MemberKind, Operation,
    TypeRef,
};
use idlbind_registry::SymbolTable;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// =============================================================================
// Policy
// =============================================================================

/// The order in which an interface's mixins contribute members.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MixinOrder {
    /// The order of the `includes` statements.
    #[default]
    Declaration,
    /// Mixin names sorted lexicographically.
    Alphabetical,
}

impl fmt::Display for MixinOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Declaration => write!(f, "declaration"),
            Self::Alphabetical => write!(f, "alphabetical"),
        }
    }
}

/// What happens when a mixin member collides with an inherited one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MixinCollision {
    /// The inherited member stays; the mixin member is dropped.
    #[default]
    KeepInherited,
    /// The mixin member shadows the inherited one like any later member.
    Shadow,
    /// The collision is a `DuplicateMember` error.
    Reject,
}

impl fmt::Display for MixinCollision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KeepInherited => write!(f, "keep-inherited"),
            Self::Shadow => write!(f, "shadow"),
            Self::Reject => write!(f, "reject"),
        }
    }
}

/// Tunable resolution behavior.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ResolverPolicy {
    /// Mixin application order.
    pub mixin_order: MixinOrder,
    /// Mixin versus inherited member collisions.
    pub mixin_collision: MixinCollision,
}

impl ResolverPolicy {
    /// Sets the mixin order.
    #[must_use]
    pub const fn with_mixin_order(mut self, order: MixinOrder) -> Self {
        self.mixin_order = order;
        self
    }

    /// Sets the collision behavior.
    #[must_use]
    pub const fn with_mixin_collision(mut self, collision: MixinCollision) -> Self {
        self.mixin_collision = collision;
        self
    }
}

// =============================================================================
// Flattened Output
// =============================================================================

/// A member in an interface's effective member list.
#[derive(Clone, Debug, PartialEq)]
pub struct FlattenedMember {
    /// The member as declared.
    pub member: Member,
    /// The interface or mixin that declares it.
    pub origin: String,
    /// True if `origin` is a mixin.
    pub from_mixin: bool,
    /// Inheritance depth of the interface it entered through (0 = root).
    pub depth: usize,
}

impl FlattenedMember {
    /// Returns the member name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.member.name()
    }
}

/// An interface with inheritance and mixins resolved.
#[derive(Clone, Debug, PartialEq)]
pub struct FlattenedInterface {
    /// Interface name.
    pub name: String,
    /// Every interface in the chain, root first, ending with this one.
    pub ancestry: Vec<String>,
    /// Effective members in stable order.
    pub members: Vec<FlattenedMember>,
}

impl FlattenedInterface {
    /// Returns the inheritance depth (0 for a root interface).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.ancestry.len().saturating_sub(1)
    }

    /// Returns the direct parent, if any.
    #[must_use]
    pub fn parent(&self) -> Option<&str> {
        self.ancestry
            .len()
            .checked_sub(2)
            .and_then(|i| self.ancestry.get(i))
            .map(String::as_str)
    }

    /// Returns the member names in order.
    #[must_use]
    pub fn member_names(&self) -> Vec<&str> {
        self.members.iter().map(FlattenedMember::name).collect()
    }

    /// Iterates this interface's own constructors.
    pub fn constructors(&self) -> impl Iterator<Item = &Operation> {
        self.members
            .iter()
            .filter_map(|m| m.member.as_operation())
            .filter(|op| op.is_constructor())
    }
}

/// A dictionary member with its origin.
#[derive(Clone, Debug, PartialEq)]
pub struct FlattenedDictionaryMember {
    /// The member as declared.
    pub member: DictionaryMember,
    /// The dictionary that declares it.
    pub origin: String,
    /// Inheritance depth of `origin` (0 = root).
    pub depth: usize,
}

/// A dictionary with inheritance resolved.
#[derive(Clone, Debug, PartialEq)]
pub struct FlattenedDictionary {
    /// Dictionary name.
    pub name: String,
    /// Every dictionary in the chain, root first, ending with this one.
    pub ancestry: Vec<String>,
    /// Members root to leaf, sorted by name within each level.
    pub members: Vec<FlattenedDictionaryMember>,
}

/// The result of resolving every interface and dictionary.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Resolution {
    /// Flattened interfaces in symbol-table order.
    pub interfaces: Vec<FlattenedInterface>,
    /// Flattened dictionaries in symbol-table order.
    pub dictionaries: Vec<FlattenedDictionary>,
}

// =============================================================================
// Resolver
// =============================================================================

/// Flattens interfaces and dictionaries registered in a [`SymbolTable`].
#[derive(Clone, Copy, Debug)]
pub struct Resolver<'t> {
    table: &'t SymbolTable,
    policy: ResolverPolicy,
}

impl<'t> Resolver<'t> {
    /// Creates a resolver with the default policy.
    #[must_use]
    pub fn new(table: &'t SymbolTable) -> Self {
        Self::with_policy(table, ResolverPolicy::default())
    }

    /// Creates a resolver with an explicit policy.
    #[must_use]
    pub const fn with_policy(table: &'t SymbolTable, policy: ResolverPolicy) -> Self {
        Self { table, policy }
    }

    /// Returns the policy in use.
    #[must_use]
    pub const fn policy(&self) -> ResolverPolicy {
        self.policy
    }

    /// Flattens the interface `name`.
    ///
    /// # Errors
    /// Returns `UnknownSymbol` for a missing interface, parent or mixin,
    /// `KindMismatch` when one of those names another kind of declaration,
    /// `CyclicInheritance` when the parent chain revisits a name, and
    /// `DuplicateMember` under [`MixinCollision::Reject`].
    pub fn flatten(&self, name: &str) -> Result<FlattenedInterface> {
        let chain = self.walk_chain(name, DeclarationKind::Interface)?;
        let leaf_depth = chain.len().saturating_sub(1);

        let mut list = ShadowList::default();
        for (depth, decl) in chain.iter().rev().enumerate() {
            let Declaration::Interface(interface) = decl else {
                continue;
            };

            for mixin_name in self.ordered_mixins(interface) {
                let mixin = self.resolve_mixin(&interface.name, &mixin_name)?;
                for member in mixin {
                    let entry = FlattenedMember {
                        member: member.clone(),
                        origin: mixin_name.clone(),
                        from_mixin: true,
                        depth,
                    };
                    list.insert(entry, self.policy.mixin_collision)
                        .map_err(|e| e.in_frame(format!("in interface {name}")))?;
                }
            }

            for member in &interface.members {
                let inherited_constructor = depth < leaf_depth
                    && member.as_operation().is_some_and(Operation::is_constructor);
                if inherited_constructor {
                    continue;
                }
                let entry = FlattenedMember {
                    member: member.clone(),
                    origin: interface.name.clone(),
                    from_mixin: false,
                    depth,
                };
                list.insert(entry, MixinCollision::Shadow)?;
            }
        }

        let ancestry: Vec<String> = chain.iter().rev().map(|d| d.name().to_string()).collect();
        let members = list.finish();
        trace!(interface = name, depth = leaf_depth, members = members.len(), "flattened");

        Ok(FlattenedInterface {
            name: name.to_string(),
            ancestry,
            members,
        })
    }

    /// Flattens the dictionary `name`.
    ///
    /// # Errors
    /// Returns the same chain errors as [`Resolver::flatten`], and
    /// `DuplicateMember` when a member name repeats across the chain.
    pub fn flatten_dictionary(&self, name: &str) -> Result<FlattenedDictionary> {
        let chain = self.walk_chain(name, DeclarationKind::Dictionary)?;

        let mut members = Vec::new();
        let mut seen: HashMap<String, String> = HashMap::new();
        for (depth, decl) in chain.iter().rev().enumerate() {
            let Declaration::Dictionary(dictionary) = decl else {
                continue;
            };
            let mut level: Vec<&DictionaryMember> = dictionary.members.iter().collect();
            level.sort_by(|a, b| a.name.cmp(&b.name));

            for member in level {
                if let Some(first) = seen.insert(member.name.clone(), dictionary.name.clone()) {
                    return Err(Error::duplicate_member(name, &member.name)
                        .with_context(self.table.locate(member.span))
                        .in_frame(format!("already declared in dictionary {first}")));
                }
                members.push(FlattenedDictionaryMember {
                    member: member.clone(),
                    origin: dictionary.name.clone(),
                    depth,
                });
            }
        }

        Ok(FlattenedDictionary {
            name: name.to_string(),
            ancestry: chain.iter().rev().map(|d| d.name().to_string()).collect(),
            members,
        })
    }

    /// Checks every `includes` statement, then flattens every interface and
    /// dictionary in symbol-table order.
    ///
    /// # Errors
    /// Returns the first error encountered.
    pub fn resolve_all(&self) -> Result<Resolution> {
        self.check_includes()?;

        let mut resolution = Resolution::default();
        for decl in self.table.iter() {
            match decl.kind() {
                DeclarationKind::Interface => resolution.interfaces.push(self.flatten(decl.name())?),
                DeclarationKind::Dictionary => {
                    resolution
                        .dictionaries
                        .push(self.flatten_dictionary(decl.name())?);
                }
                _ => {}
            }
        }

        debug!(
            interfaces = resolution.interfaces.len(),
            dictionaries = resolution.dictionaries.len(),
            "resolved inheritance"
        );
        Ok(resolution)
    }

    /// Checks that every `includes` statement names an interface and a mixin.
    ///
    /// # Errors
    /// Returns `UnknownSymbol` or `KindMismatch` located at the statement.
    pub fn check_includes(&self) -> Result<()> {
        for statement in self.table.includes() {
            let frame = format!("in `{} includes {}`", statement.target, statement.mixin);
            let locate = |err: Error| {
                err.with_context(self.table.locate(statement.span))
                    .in_frame(frame.clone())
            };
            self.expect_kind(&statement.target, DeclarationKind::Interface)
                .map_err(locate)?;
            self.expect_kind(&statement.mixin, DeclarationKind::InterfaceMixin)
                .map_err(locate)?;
        }
        Ok(())
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    /// Returns the chain from `name` up to its root, leaf first.
    fn walk_chain(&self, name: &str, kind: DeclarationKind) -> Result<Vec<&'t Declaration>> {
        let mut chain: Vec<&'t Declaration> = Vec::new();
        let mut visited: HashSet<String> = HashSet::new();
        let mut names: Vec<String> = Vec::new();
        let mut current = name.to_string();

        loop {
            if !visited.insert(current.clone()) {
                names.push(current);
                let err = Error::cyclic_inheritance(names);
                return Err(match chain.last() {
                    Some(child) => err.with_context(self.table.locate(child.span())),
                    None => err,
                });
            }

            let decl = match self.expect_kind(&current, kind) {
                Ok(decl) => decl,
                Err(err) => {
                    return Err(match chain.last() {
                        Some(child) => err
                            .with_context(self.table.locate(child.span()))
                            .in_frame(format!("parent of {} {}", child.kind(), child.name())),
                        None => err,
                    });
                }
            };
            if decl.is_partial() {
                return Err(Error::unknown_symbol(&current)
                    .with_context(self.table.locate(decl.span()))
                    .in_frame(format!("only partial definitions of `{current}` exist")));
            }

            names.push(current);
            chain.push(decl);

            let parent = match decl {
                Declaration::Interface(i) => i.parent.clone(),
                Declaration::Dictionary(d) => d.parent.clone(),
                _ => None,
            };
            match parent {
                Some(parent) => current = parent,
                None => break,
            }
        }

        Ok(chain)
    }

    fn expect_kind(&self, name: &str, kind: DeclarationKind) -> Result<&'t Declaration> {
        let decl = self.table.resolve(name)?;
        if decl.kind() == kind {
            Ok(decl)
        } else {
            Err(Error::kind_mismatch(
                name,
                kind.to_string(),
                decl.kind().to_string(),
            ))
        }
    }

    fn ordered_mixins(&self, interface: &Interface) -> Vec<String> {
        let mut mixins = interface.mixins.clone();
        if self.policy.mixin_order == MixinOrder::Alphabetical {
            mixins.sort();
        }
        mixins
    }

    fn resolve_mixin(&self, target: &str, mixin: &str) -> Result<&'t [Member]> {
        let decl = self
            .expect_kind(mixin, DeclarationKind::InterfaceMixin)
            .map_err(|e| e.in_frame(format!("in `{target} includes {mixin}`")))?;
        if decl.is_partial() {
            return Err(Error::unknown_symbol(mixin)
                .with_context(self.table.locate(decl.span()))
                .in_frame(format!("only partial definitions of `{mixin}` exist")));
        }
        Ok(decl.members())
    }
}

// =============================================================================
// Shadowing
// =============================================================================

/// Identifies members that replace each other.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct ShadowKey {
    kind: MemberKind,
    name: String,
    is_static: bool,
    signature: Vec<TypeRef>,
}

impl ShadowKey {
    fn of(member: &Member) -> Self {
        Self {
            kind: member.kind(),
            name: member.name().to_string(),
            is_static: member.is_static(),
            signature: member.as_operation().map(Operation::signature).unwrap_or_default(),
        }
    }
}

/// Members sharing a name and static-ness.
#[derive(Debug)]
struct Group {
    kind: MemberKind,
    slots: Vec<usize>,
}

/// An ordered member list with in-place replacement.
#[derive(Debug, Default)]
struct ShadowList {
    slots: Vec<Option<FlattenedMember>>,
    keys: HashMap<ShadowKey, usize>,
    groups: HashMap<(String, bool), Group>,
}

impl ShadowList {
    fn insert(&mut self, entry: FlattenedMember, collision: MixinCollision) -> Result<()> {
        let key = ShadowKey::of(&entry.member);
        let group_key = (key.name.clone(), key.is_static);

        let conflict: Vec<usize> = match self.groups.get(&group_key) {
            Some(group) if group.kind != key.kind => group.slots.clone(),
            Some(_) => self.keys.get(&key).copied().into_iter().collect(),
            None => Vec::new(),
        };

        if conflict.is_empty() {
            let slot = self.slots.len();
            self.slots.push(Some(entry));
            self.keys.insert(key.clone(), slot);
            self.groups
                .entry(group_key)
                .or_insert_with(|| Group {
                    kind: key.kind,
                    slots: Vec::new(),
                })
                .slots
                .push(slot);
            return Ok(());
        }

        let inherited = conflict.iter().any(|&slot| {
            self.slots[slot]
                .as_ref()
                .is_some_and(|existing| existing.depth < entry.depth)
        });
        if entry.from_mixin && inherited {
            match collision {
                MixinCollision::KeepInherited => return Ok(()),
                MixinCollision::Reject => {
                    return Err(Error::duplicate_member(&entry.origin, entry.name()).in_frame(
                        format!("mixin {} collides with an inherited member", entry.origin),
                    ));
                }
                MixinCollision::Shadow => {}
            }
        }

        let first = conflict.iter().copied().min().unwrap_or(self.slots.len());
        for &slot in &conflict {
            if let Some(old) = self.slots[slot].take() {
                self.keys.remove(&ShadowKey::of(&old.member));
            }
        }
        self.slots[first] = Some(entry);
        self.keys.insert(key.clone(), first);

        let group = self.groups.entry(group_key).or_insert_with(|| Group {
            kind: key.kind,
            slots: Vec::new(),
        });
        if group.kind == key.kind {
            group.slots.retain(|s| !conflict.contains(s) || *s == first);
            if !group.slots.contains(&first) {
                group.slots.push(first);
            }
        } else {
            group.kind = key.kind;
            group.slots = vec![first];
        }
        Ok(())
    }

    fn finish(self) -> Vec<FlattenedMember> {
        self.slots.into_iter().flatten().collect()
    }
}

// =============================================================================
// Convenience
// =============================================================================

/// Flattens `name` with the default policy.
///
/// # Errors
/// See [`Resolver::flatten`].
pub fn flatten(table: &SymbolTable, name: &str) -> Result<FlattenedInterface> {
    Resolver::new(table).flatten(name)
}

/// Flattens the dictionary `name`.
///
/// # Errors
/// See [`Resolver::flatten_dictionary`].
pub fn flatten_dictionary(table: &SymbolTable, name: &str) -> Result<FlattenedDictionary> {
    Resolver::new(table).flatten_dictionary(name)
}

/// Flattens everything with the default policy.
///
/// # Errors
/// See [`Resolver::resolve_all`].
pub fn resolve_all(table: &SymbolTable) -> Result<Resolution> {
    Resolver::new(table).resolve_all()
}
