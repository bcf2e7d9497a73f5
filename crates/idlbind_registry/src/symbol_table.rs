//! The symbol table: one namespace for every declared name.
//!
//! Registration is two-phase. Fragments are collected per name in
//! registration order and never modified; the declaration that
//! [`SymbolTable::resolve`] returns is the fold of those fragments.

use std::collections::HashSet;

use im::{HashMap, Vector};
use tracing::trace;

use idlbind_foundation::{Error, ErrorContext, Result};
use idlbind_language::{
    Declaration, DeclarationKind, Definition, Includes, Interface, Member, SourceMap, Span,
};

// =============================================================================
// SymbolTable
// =============================================================================

/// Registry of declarations, `includes` statements, and their sources.
///
/// Cloning is cheap: the maps are persistent, so a table holding a shared
/// prelude can be forked per run.
#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    /// Fragments per name, in registration order.
    fragments: HashMap<String, Vector<Declaration>>,
    /// The merged declaration per name.
    merged: HashMap<String, Declaration>,
    /// Names in first-registration order.
    order: Vector<String>,
    /// `includes` statements in declaration order.
    includes: Vector<Includes>,
    /// Source texts that spans point into.
    sources: SourceMap,
}

impl SymbolTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty table whose errors are located in `sources`.
    #[must_use]
    pub fn with_sources(sources: SourceMap) -> Self {
        Self {
            sources,
            ..Self::default()
        }
    }

    /// Returns the source map.
    #[must_use]
    pub fn sources(&self) -> &SourceMap {
        &self.sources
    }

    /// Returns the source map for registering more files.
    pub fn sources_mut(&mut self) -> &mut SourceMap {
        &mut self.sources
    }

    /// Builds an error context pointing at `span`.
    #[must_use]
    pub fn locate(&self, span: Span) -> ErrorContext {
        ErrorContext::new()
            .with_source(self.sources.name(span.source))
            .with_position(span.line, span.column)
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Files a declaration under its name.
    ///
    /// # Errors
    /// Returns `InvalidEnum` for an empty enum or one with repeated values,
    /// and `DuplicateDeclaration` when the name is taken by a different kind
    /// of declaration or by a definition that cannot be merged with this one.
    /// The table is unchanged on error.
    pub fn register(&mut self, declaration: Declaration) -> Result<()> {
        let name = declaration.name().to_string();
        let span = declaration.span();

        if let Declaration::Enum(e) = &declaration {
            validate_enum(e).map_err(|err| err.with_context(self.locate(span)))?;
        }

        if let Some(existing) = self.merged.get(&name) {
            check_mergeable(existing, &declaration).map_err(|err| {
                let context = self.locate(span);
                let first = self
                    .fragments
                    .get(&name)
                    .and_then(|f| f.front())
                    .map(Declaration::span);
                match first {
                    Some(first) => err.with_context(context.with_frame(format!(
                        "first declared at {}:{}:{}",
                        self.sources.name(first.source),
                        first.line,
                        first.column
                    ))),
                    None => err.with_context(context),
                }
            })?;
        } else {
            self.order.push_back(name.clone());
        }

        trace!(
            name = %name,
            kind = %declaration.kind(),
            partial = declaration.is_partial(),
            "registered declaration"
        );
        self.fragments
            .entry(name.clone())
            .or_default()
            .push_back(declaration);
        self.remerge(&name);
        Ok(())
    }

    /// Records a `target includes mixin;` statement.
    ///
    /// Either name may still be undeclared; the resolver reports missing
    /// or mismatched names.
    ///
    /// # Errors
    /// Returns `DuplicateDeclaration` if the same statement was already
    /// recorded.
    pub fn register_includes(
        &mut self,
        target: impl Into<String>,
        mixin: impl Into<String>,
        span: Span,
    ) -> Result<()> {
        let statement = Includes {
            target: target.into(),
            mixin: mixin.into(),
            span,
        };

        if self
            .includes
            .iter()
            .any(|i| i.target == statement.target && i.mixin == statement.mixin)
        {
            return Err(Error::duplicate_declaration(
                format!("{} includes {}", statement.target, statement.mixin),
                "statement repeated",
            )
            .with_context(self.locate(span)));
        }

        trace!(target = %statement.target, mixin = %statement.mixin, "registered includes");
        let target = statement.target.clone();
        self.includes.push_back(statement);
        if self.merged.contains_key(&target) {
            self.remerge(&target);
        }
        Ok(())
    }

    /// Registers every definition from a parse, stopping at the first error.
    ///
    /// # Errors
    /// Returns the first registration error.
    pub fn register_definitions(
        &mut self,
        definitions: impl IntoIterator<Item = Definition>,
    ) -> Result<()> {
        for definition in definitions {
            match definition {
                Definition::Declaration(decl) => self.register(decl)?,
                Definition::Includes(inc) => {
                    self.register_includes(inc.target, inc.mixin, inc.span)?;
                }
            }
        }
        Ok(())
    }

    /// Recomputes the merged declaration for `name` from its fragments.
    fn remerge(&mut self, name: &str) {
        let Some(fragments) = self.fragments.get(name) else {
            return;
        };
        let Some(mut merged) = fold_fragments(fragments) else {
            return;
        };
        if let Declaration::Interface(interface) = &mut merged {
            interface.mixins = self.mixins_of(name).map(str::to_string).collect();
        }
        self.merged.insert(name.to_string(), merged);
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// Returns the merged declaration for `name`.
    ///
    /// # Errors
    /// Returns `UnknownSymbol` if nothing is registered under `name`.
    pub fn resolve(&self, name: &str) -> Result<&Declaration> {
        self.merged
            .get(name)
            .ok_or_else(|| Error::unknown_symbol(name))
    }

    /// Returns the merged declaration for `name`, if any.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Declaration> {
        self.merged.get(name)
    }

    /// Returns true if `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.merged.contains_key(name)
    }

    /// Returns the kind registered under `name`.
    #[must_use]
    pub fn kind_of(&self, name: &str) -> Option<DeclarationKind> {
        self.get(name).map(Declaration::kind)
    }

    /// Returns the interface registered under `name`.
    ///
    /// # Errors
    /// Returns `UnknownSymbol` if the name is missing and `KindMismatch` if
    /// it names something other than an interface.
    pub fn resolve_interface(&self, name: &str) -> Result<&Interface> {
        match self.resolve(name)? {
            Declaration::Interface(interface) => Ok(interface),
            other => Err(Error::kind_mismatch(
                name,
                DeclarationKind::Interface.to_string(),
                other.kind().to_string(),
            )
            .with_context(self.locate(other.span()))),
        }
    }

    /// Iterates the fragments registered for `name`, in registration order.
    pub fn fragments(&self, name: &str) -> impl Iterator<Item = &Declaration> {
        self.fragments.get(name).into_iter().flat_map(|f| f.iter())
    }

    /// Returns the span of every fragment of `name`.
    #[must_use]
    pub fn fragment_spans(&self, name: &str) -> Vec<Span> {
        self.fragments(name).map(Declaration::span).collect()
    }

    /// Iterates merged declarations in first-registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Declaration> {
        self.order.iter().filter_map(|name| self.merged.get(name))
    }

    /// Iterates merged interfaces in first-registration order.
    pub fn interfaces(&self) -> impl Iterator<Item = &Interface> {
        self.iter().filter_map(Declaration::as_interface)
    }

    /// Iterates every `includes` statement in declaration order.
    pub fn includes(&self) -> impl Iterator<Item = &Includes> {
        self.includes.iter()
    }

    /// Iterates the mixins `target` includes, in declaration order.
    pub fn mixins_of<'a>(&'a self, target: &'a str) -> impl Iterator<Item = &'a str> {
        self.includes
            .iter()
            .filter(move |i| i.target == target)
            .map(|i| i.mixin.as_str())
    }

    /// Returns the number of registered names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

// =============================================================================
// Merging
// =============================================================================

fn validate_enum(e: &idlbind_language::Enum) -> Result<()> {
    if e.values.is_empty() {
        return Err(Error::invalid_enum(&e.name, "enum has no values"));
    }
    let mut seen = HashSet::new();
    for value in &e.values {
        if !seen.insert(value.value.as_str()) {
            return Err(Error::invalid_enum(
                &e.name,
                format!("duplicate value \"{}\"", value.value),
            ));
        }
    }
    Ok(())
}

/// Checks whether `incoming` may be folded into `existing`.
fn check_mergeable(existing: &Declaration, incoming: &Declaration) -> Result<()> {
    let name = incoming.name();

    if existing.kind() != incoming.kind() {
        return Err(Error::duplicate_declaration(
            name,
            format!(
                "already declared as {}, redeclared as {}",
                existing.kind(),
                incoming.kind()
            ),
        ));
    }

    match (existing, incoming) {
        (Declaration::Interface(_), Declaration::Interface(_))
        | (Declaration::InterfaceMixin(_), Declaration::InterfaceMixin(_)) => {
            let both_primary = !incoming.is_partial() && !existing.is_partial();
            if let (Declaration::Interface(a), Declaration::Interface(b)) = (existing, incoming) {
                if both_primary {
                    check_parents(name, a.parent.as_deref(), b.parent.as_deref())?;
                }
            }
            check_disjoint(name, existing.members(), incoming.members())
        }
        (Declaration::Dictionary(a), Declaration::Dictionary(b)) => {
            if !a.partial && !b.partial {
                check_parents(name, a.parent.as_deref(), b.parent.as_deref())?;
            }
            let taken: HashSet<&str> = a.members.iter().map(|m| m.name.as_str()).collect();
            match b.members.iter().find(|m| taken.contains(m.name.as_str())) {
                Some(m) => Err(Error::duplicate_declaration(
                    name,
                    format!("member `{}` declared twice", m.name),
                )),
                None => Ok(()),
            }
        }
        _ => Err(Error::duplicate_declaration(
            name,
            format!("{} cannot be redeclared", existing.kind()),
        )),
    }
}

/// Fragments may share a name only to add operation overloads with new
/// signatures.
fn check_disjoint(name: &str, existing: &[Member], incoming: &[Member]) -> Result<()> {
    let collides = |a: &Member, b: &Member| {
        a.name() == b.name()
            && a.is_static() == b.is_static()
            && match (a.as_operation(), b.as_operation()) {
                (Some(x), Some(y)) => x.signature() == y.signature(),
                _ => true,
            }
    };
    match incoming
        .iter()
        .find(|m| existing.iter().any(|e| collides(e, m)))
    {
        Some(m) => Err(Error::duplicate_declaration(
            name,
            format!("member `{}` declared twice", m.name()),
        )),
        None => Ok(()),
    }
}

fn check_parents(name: &str, existing: Option<&str>, incoming: Option<&str>) -> Result<()> {
    if existing == incoming {
        return Ok(());
    }
    Err(Error::duplicate_declaration(
        name,
        format!(
            "conflicting parents {} and {}",
            describe_parent(existing),
            describe_parent(incoming)
        ),
    ))
}

fn describe_parent(parent: Option<&str>) -> String {
    parent.map_or_else(|| "(none)".to_string(), |p| format!("`{p}`"))
}

/// Extended attributes a partial fragment hands down to its members.
const FRAGMENT_SCOPED: &[&str] = &["Exposed", "SecureContext"];

/// Returns a fragment's members, with the fragment's scoped attributes
/// copied onto members that do not set their own.
fn fragment_members(fragment: &Declaration) -> Vec<Member> {
    let scoped: Vec<_> = if fragment.is_partial() {
        fragment
            .attributes()
            .iter()
            .filter(|a| FRAGMENT_SCOPED.contains(&a.name.as_str()))
            .cloned()
            .collect()
    } else {
        Vec::new()
    };

    let mut members = fragment.members().to_vec();
    for member in &mut members {
        for attribute in &scoped {
            if !member.attributes().contains(&attribute.name) {
                member.attributes_mut().0.push(attribute.clone());
            }
        }
    }
    members
}

/// Folds fragments into one declaration.
///
/// The first non-partial fragment supplies the parent, extended attributes
/// and span; member lists are concatenated in registration order. A
/// partial fragment's `[Exposed]` and `[SecureContext]` move onto the
/// members it declares. A name with only partial fragments stays marked
/// partial.
fn fold_fragments(fragments: &Vector<Declaration>) -> Option<Declaration> {
    let primary = fragments
        .iter()
        .find(|f| !f.is_partial())
        .or_else(|| fragments.front())?;

    let mut merged = primary.clone();
    match &mut merged {
        Declaration::Interface(target) => {
            target.members = fragments
                .iter()
                .filter(|f| f.as_interface().is_some())
                .flat_map(fragment_members)
                .collect();
            if target.collection.is_none() {
                target.collection = fragments
                    .iter()
                    .filter_map(Declaration::as_interface)
                    .find_map(|i| i.collection.clone());
            }
        }
        Declaration::InterfaceMixin(target) => {
            target.members = fragments
                .iter()
                .filter(|f| f.as_mixin().is_some())
                .flat_map(fragment_members)
                .collect();
        }
        Declaration::Dictionary(target) => {
            target.members = fragments
                .iter()
                .filter_map(Declaration::as_dictionary)
                .flat_map(|d| d.members.iter().cloned())
                .collect();
        }
        _ => {}
    }
    Some(merged)
}
