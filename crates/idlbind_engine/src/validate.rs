//! Type and signature validation.
//!
//! The validator runs after the symbol table is complete. It resolves every
//! type reference, checks extended attributes against the rule table,
//! checks parameter lists and default values, and rejects duplicate members.
//! The first fatal error aborts; unknown extended attributes are collected
//! as warnings unless the validator is strict.

use std::collections::{HashMap, HashSet};

use tracing::{debug, trace};

use idlbind_foundation::{Diagnostics, Error, Primitive, Result};
use idlbind_language::{
    CallbackFunction, CollectionDecl, CollectionKind, Declaration, DeclarationKind, Dictionary,
    ExtendedAttributeValue, ExtendedAttributes, Interface, Literal, Member, MemberKind, Operation,
    Parameter, Span, Special,
};
use idlbind_registry::SymbolTable;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::attributes::{self, Rejection, Target};
use crate::resolve::{
    FlattenedDictionary, FlattenedInterface, FlattenedMember, Resolution, Resolver, ResolverPolicy,
};
use crate::types::{ResolvedType, TypeResolver};

// =============================================================================
// Options
// =============================================================================

/// Validator settings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ValidatorOptions {
    /// Treat unknown extended attributes as errors.
    pub strict: bool,
    /// Inheritance and mixin resolution policy.
    pub policy: ResolverPolicy,
}

impl ValidatorOptions {
    /// Options that reject unknown extended attributes.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Self::default()
        }
    }

    /// Sets strict mode.
    #[must_use]
    pub const fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Sets the resolution policy.
    #[must_use]
    pub const fn with_policy(mut self, policy: ResolverPolicy) -> Self {
        self.policy = policy;
        self
    }
}

// =============================================================================
// Validated Model
// =============================================================================

/// A parameter with its type resolved.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedParameter {
    /// Parameter name.
    pub name: String,
    /// Resolved type.
    pub ty: ResolvedType,
    /// True for `optional` parameters.
    pub optional: bool,
    /// Default value, if any.
    pub default: Option<Literal>,
    /// True for `T... name`.
    pub variadic: bool,
    /// Extended attributes on the parameter or its type.
    pub attributes: ExtendedAttributes,
}

/// The resolved types of a member.
#[derive(Clone, Debug, PartialEq)]
pub enum ResolvedSignature {
    /// An attribute's type.
    Attribute {
        /// Attribute type.
        ty: ResolvedType,
    },
    /// An operation's return and parameter types.
    Operation {
        /// Return type.
        return_type: ResolvedType,
        /// Parameters in order.
        arguments: Vec<ResolvedParameter>,
    },
    /// A constant's type and value.
    Constant {
        /// Constant type.
        ty: ResolvedType,
        /// Constant value.
        value: Literal,
    },
}

/// A member of a validated interface or callback interface.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidatedMember {
    /// The member as declared.
    pub member: Member,
    /// The interface or mixin that declares it.
    pub origin: String,
    /// True if `origin` is a mixin.
    pub from_mixin: bool,
    /// Inheritance depth of the interface it entered through (0 = root).
    pub depth: usize,
    /// Resolved types.
    pub signature: ResolvedSignature,
}

impl ValidatedMember {
    /// Returns the member name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.member.name()
    }
}

/// An `iterable`, `maplike`, or `setlike` declaration with resolved types.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedCollection {
    /// Collection kind.
    pub kind: CollectionKind,
    /// Key type for pair iterables and maplikes.
    pub key: Option<ResolvedType>,
    /// Value type.
    pub value: ResolvedType,
    /// True for `readonly maplike` and `readonly setlike`.
    pub readonly: bool,
    /// True for `async iterable`.
    pub is_async: bool,
}

/// A `[LegacyFactoryFunction]` with resolved parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidatedFactory {
    /// The global function name, e.g. `Image`.
    pub name: String,
    /// Parameters in order.
    pub arguments: Vec<ResolvedParameter>,
}

/// An interface with members flattened and types resolved.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidatedInterface {
    /// Interface name.
    pub name: String,
    /// Every interface in the chain, root first, ending with this one.
    pub ancestry: Vec<String>,
    /// Effective members in stable order.
    pub members: Vec<ValidatedMember>,
    /// Extended attributes of the merged declaration.
    pub attributes: ExtendedAttributes,
    /// Collection declaration, if any.
    pub collection: Option<ResolvedCollection>,
    /// Legacy factory functions.
    pub factories: Vec<ValidatedFactory>,
    /// Location of the primary definition.
    pub span: Span,
}

impl ValidatedInterface {
    /// Returns the direct parent, if any.
    #[must_use]
    pub fn parent(&self) -> Option<&str> {
        self.ancestry
            .len()
            .checked_sub(2)
            .and_then(|i| self.ancestry.get(i))
            .map(String::as_str)
    }

    /// Returns the inheritance depth.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.ancestry.len().saturating_sub(1)
    }
}

/// A dictionary member with its type resolved.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidatedDictionaryMember {
    /// Member name.
    pub name: String,
    /// Resolved type.
    pub ty: ResolvedType,
    /// True for `required` members.
    pub required: bool,
    /// Default value, if any.
    pub default: Option<Literal>,
    /// The dictionary that declares it.
    pub origin: String,
    /// Inheritance depth of `origin`.
    pub depth: usize,
}

/// A dictionary with inheritance flattened.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidatedDictionary {
    /// Dictionary name.
    pub name: String,
    /// Every dictionary in the chain, root first.
    pub ancestry: Vec<String>,
    /// Members root to leaf, sorted by name within each level.
    pub members: Vec<ValidatedDictionaryMember>,
}

/// An enum.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatedEnum {
    /// Enum name.
    pub name: String,
    /// Values in declaration order.
    pub values: Vec<String>,
}

/// A callback interface.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidatedCallbackInterface {
    /// Name.
    pub name: String,
    /// Members in declaration order.
    pub members: Vec<ValidatedMember>,
}

/// A callback function.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidatedCallback {
    /// Name.
    pub name: String,
    /// Return type.
    pub return_type: ResolvedType,
    /// Parameters in order.
    pub arguments: Vec<ResolvedParameter>,
}

/// A typedef and its expansion.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidatedTypedef {
    /// Name.
    pub name: String,
    /// The fully expanded type.
    pub ty: ResolvedType,
}

/// Everything the emitter needs, in symbol-table order.
#[derive(Clone, Debug, Default)]
pub struct ValidatedModel {
    interfaces: Vec<ValidatedInterface>,
    dictionaries: Vec<ValidatedDictionary>,
    enums: Vec<ValidatedEnum>,
    callback_interfaces: Vec<ValidatedCallbackInterface>,
    callbacks: Vec<ValidatedCallback>,
    typedefs: Vec<ValidatedTypedef>,
    diagnostics: Diagnostics,
}

impl ValidatedModel {
    /// Returns the interfaces.
    #[must_use]
    pub fn interfaces(&self) -> &[ValidatedInterface] {
        &self.interfaces
    }

    /// Looks up an interface by name.
    #[must_use]
    pub fn interface(&self, name: &str) -> Option<&ValidatedInterface> {
        self.interfaces.iter().find(|i| i.name == name)
    }

    /// Returns the dictionaries.
    #[must_use]
    pub fn dictionaries(&self) -> &[ValidatedDictionary] {
        &self.dictionaries
    }

    /// Returns the enums.
    #[must_use]
    pub fn enums(&self) -> &[ValidatedEnum] {
        &self.enums
    }

    /// Returns the callback interfaces.
    #[must_use]
    pub fn callback_interfaces(&self) -> &[ValidatedCallbackInterface] {
        &self.callback_interfaces
    }

    /// Returns the callback functions.
    #[must_use]
    pub fn callbacks(&self) -> &[ValidatedCallback] {
        &self.callbacks
    }

    /// Returns the typedefs.
    #[must_use]
    pub fn typedefs(&self) -> &[ValidatedTypedef] {
        &self.typedefs
    }

    /// Returns warnings collected during validation.
    #[must_use]
    pub const fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }
}

// =============================================================================
// Validator
// =============================================================================

/// Checks a complete symbol table and builds a [`ValidatedModel`].
#[derive(Clone, Copy, Debug)]
pub struct Validator<'t> {
    table: &'t SymbolTable,
    options: ValidatorOptions,
    types: TypeResolver<'t>,
}

impl<'t> Validator<'t> {
    /// Creates a validator with default options.
    #[must_use]
    pub fn new(table: &'t SymbolTable) -> Self {
        Self::with_options(table, ValidatorOptions::default())
    }

    /// Creates a validator with explicit options.
    #[must_use]
    pub const fn with_options(table: &'t SymbolTable, options: ValidatorOptions) -> Self {
        Self {
            table,
            options,
            types: TypeResolver::new(table),
        }
    }

    /// Validates every declaration and builds the model.
    ///
    /// # Errors
    /// Returns the first fatal error.
    pub fn validate(&self) -> Result<ValidatedModel> {
        let mut diagnostics = Diagnostics::new();

        self.check_primaries()?;
        let resolution = Resolver::with_policy(self.table, self.options.policy).resolve_all()?;

        for decl in self.table.iter() {
            trace!(kind = %decl.kind(), name = decl.name(), "validating");
            self.check_fragments(decl, &mut diagnostics)
                .and_then(|()| self.check_declaration(decl, &mut diagnostics))
                .map_err(|e| e.in_frame(format!("in {} {}", decl.kind(), decl.name())))?;
        }

        let model = self.build(resolution, diagnostics)?;
        debug!(
            interfaces = model.interfaces.len(),
            dictionaries = model.dictionaries.len(),
            enums = model.enums.len(),
            warnings = model.diagnostics.len(),
            "validated"
        );
        Ok(model)
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    fn check_primaries(&self) -> Result<()> {
        match self.table.iter().find(|d| d.is_partial()) {
            Some(orphan) => Err(Error::unknown_symbol(orphan.name())
                .with_context(self.table.locate(orphan.span()))
                .in_frame(format!(
                    "only partial definitions of `{}` exist",
                    orphan.name()
                ))),
            None => Ok(()),
        }
    }

    /// Checks the attributes of fragments other than the one the merged
    /// declaration took its own attributes from.
    fn check_fragments(&self, decl: &Declaration, diagnostics: &mut Diagnostics) -> Result<()> {
        let target = match decl.kind() {
            DeclarationKind::Interface => Target::Interface,
            DeclarationKind::InterfaceMixin => Target::InterfaceMixin,
            DeclarationKind::Dictionary => Target::Dictionary,
            _ => return Ok(()),
        };
        for fragment in self.table.fragments(decl.name()) {
            if fragment.span() != decl.span() {
                self.check_attributes(fragment.attributes(), target, decl.name(), diagnostics)?;
            }
        }
        Ok(())
    }

    fn check_declaration(&self, decl: &Declaration, diagnostics: &mut Diagnostics) -> Result<()> {
        match decl {
            Declaration::Interface(interface) => self.check_interface(interface, diagnostics),
            Declaration::InterfaceMixin(mixin) => {
                self.check_attributes(
                    &mixin.attributes,
                    Target::InterfaceMixin,
                    &mixin.name,
                    diagnostics,
                )?;
                self.check_members(&mixin.name, &mixin.members, diagnostics)
            }
            Declaration::CallbackInterface(callback) => {
                self.check_attributes(
                    &callback.attributes,
                    Target::CallbackInterface,
                    &callback.name,
                    diagnostics,
                )?;
                self.check_members(&callback.name, &callback.members, diagnostics)
            }
            Declaration::CallbackFunction(callback) => self.check_callback(callback, diagnostics),
            Declaration::Dictionary(dictionary) => self.check_dictionary(dictionary, diagnostics),
            Declaration::Enum(e) => {
                self.check_attributes(&e.attributes, Target::Enum, &e.name, diagnostics)
            }
            Declaration::Typedef(typedef) => {
                self.check_attributes(
                    &typedef.attributes,
                    Target::Typedef,
                    &typedef.name,
                    diagnostics,
                )?;
                self.types
                    .resolve(&typedef.ty, &typedef.name, "typedef")
                    .map_err(|e| self.locate(e, typedef.span))?;
                Ok(())
            }
        }
    }

    fn check_interface(&self, interface: &Interface, diagnostics: &mut Diagnostics) -> Result<()> {
        let name = &interface.name;
        self.check_attributes(&interface.attributes, Target::Interface, name, diagnostics)?;

        for factory in interface.attributes.get_all("LegacyFactoryFunction") {
            if let ExtendedAttributeValue::NamedArgumentList {
                name: function,
                arguments,
            } = &factory.value
            {
                self.check_parameters(name, function, arguments, diagnostics)?;
            }
        }

        if let Some(collection) = &interface.collection {
            self.resolve_collection(name, collection)
                .map_err(|e| self.locate(e, collection.span))?;
        }

        self.check_members(name, &interface.members, diagnostics)
    }

    fn check_callback(
        &self,
        callback: &CallbackFunction,
        diagnostics: &mut Diagnostics,
    ) -> Result<()> {
        let name = &callback.name;
        self.check_attributes(
            &callback.attributes,
            Target::CallbackFunction,
            name,
            diagnostics,
        )?;
        self.types
            .resolve(&callback.return_type, name, name)
            .map_err(|e| self.locate(e, callback.span))?;
        self.check_parameters(name, name, &callback.arguments, diagnostics)
    }

    fn check_dictionary(
        &self,
        dictionary: &Dictionary,
        diagnostics: &mut Diagnostics,
    ) -> Result<()> {
        let owner = &dictionary.name;
        self.check_attributes(
            &dictionary.attributes,
            Target::Dictionary,
            owner,
            diagnostics,
        )?;

        for member in &dictionary.members {
            let what = format!("{owner}.{}", member.name);
            let located = |e: Error| {
                self.locate(e, member.span)
                    .in_frame(format!("in member {}", member.name))
            };

            self.check_attributes(
                &member.attributes,
                Target::DictionaryMember,
                &what,
                diagnostics,
            )?;
            let ty = self
                .types
                .resolve(&member.ty, owner, &member.name)
                .map_err(located)?;
            self.check_typed_slot(&member.attributes, Target::DictionaryMember, &ty, &what)
                .map_err(located)?;

            match (&member.default, member.required) {
                (Some(default), true) => {
                    return Err(located(Error::invalid_default(
                        format!("dictionary member {what}"),
                        "no default on a required member",
                        default.to_string(),
                    )));
                }
                (Some(default), false) => self
                    .check_literal(default, &ty, &format!("dictionary member {what}"))
                    .map_err(located)?,
                (None, _) => {}
            }
        }
        Ok(())
    }

    // =========================================================================
    // Members
    // =========================================================================

    fn check_members(
        &self,
        owner: &str,
        members: &[Member],
        diagnostics: &mut Diagnostics,
    ) -> Result<()> {
        for member in members {
            self.check_member(owner, member, diagnostics).map_err(|e| {
                self.locate(e, member.span())
                    .in_frame(format!("in {}", member.describe()))
            })?;
        }
        self.check_duplicates(owner, members)
    }

    fn check_member(
        &self,
        owner: &str,
        member: &Member,
        diagnostics: &mut Diagnostics,
    ) -> Result<()> {
        let what = format!("{owner}.{}", member.name());
        match member {
            Member::Attribute(attribute) => {
                let target = if attribute.readonly {
                    Target::ReadonlyAttribute
                } else {
                    Target::Attribute
                };
                self.check_attributes(&attribute.attributes, target, &what, diagnostics)?;
                let ty = self.types.resolve(&attribute.ty, owner, &attribute.name)?;
                self.check_typed_slot(&attribute.attributes, target, &ty, &what)
            }
            Member::Operation(operation) => self.check_operation(owner, operation, diagnostics),
            Member::Constant(constant) => {
                self.check_attributes(&constant.attributes, Target::Constant, &what, diagnostics)?;
                let ty = self.types.resolve(&constant.ty, owner, &constant.name)?;
                self.check_literal(&constant.value, &ty, &format!("constant {what}"))
            }
        }
    }

    fn check_operation(
        &self,
        owner: &str,
        operation: &Operation,
        diagnostics: &mut Diagnostics,
    ) -> Result<()> {
        let name = operation.display_name();
        let what = format!("{owner}.{name}");
        let target = match operation.special {
            Some(Special::Constructor) => Target::Constructor,
            Some(_) => Target::SpecialOperation,
            None => Target::Operation,
        };

        self.check_attributes(&operation.attributes, target, &what, diagnostics)?;
        let return_type = self.types.resolve(&operation.return_type, owner, name)?;

        if let Some(new_object) = operation.attributes.get("NewObject") {
            if !return_type.is_object_like() {
                return Err(self.locate(
                    Error::invalid_extended_attribute(
                        "NewObject",
                        format!("{target} {what}"),
                        format!("return type {return_type} is not an object type"),
                    ),
                    new_object.span,
                ));
            }
        }

        self.check_parameters(owner, name, &operation.arguments, diagnostics)
    }

    fn check_parameters(
        &self,
        owner: &str,
        operation: &str,
        parameters: &[Parameter],
        diagnostics: &mut Diagnostics,
    ) -> Result<()> {
        let mut seen = HashSet::new();
        let mut optional_without_default: Option<&str> = None;
        let last = parameters.len().saturating_sub(1);

        for (i, parameter) in parameters.iter().enumerate() {
            let located = |e: Error| self.locate(e, parameter.span);

            let problem = if !seen.insert(parameter.name.as_str()) {
                Some("parameter name repeated".to_string())
            } else if parameter.variadic && i != last {
                Some("variadic parameter must be last".to_string())
            } else if parameter.variadic && parameter.optional {
                Some("variadic parameter cannot be optional".to_string())
            } else if parameter.default.is_some() && !parameter.optional {
                Some("only optional parameters may have a default".to_string())
            } else if !parameter.optional && !parameter.variadic {
                optional_without_default.map(|previous| {
                    format!("required parameter follows optional `{previous}` with no default")
                })
            } else {
                None
            };
            if let Some(reason) = problem {
                return Err(located(Error::invalid_parameter(
                    operation,
                    &parameter.name,
                    reason,
                )));
            }
            if parameter.optional && parameter.default.is_none() {
                optional_without_default = Some(parameter.name.as_str());
            }

            let what = format!("{owner}.{operation}({})", parameter.name);
            self.check_attributes(&parameter.attributes, Target::Parameter, &what, diagnostics)?;
            let ty = self
                .types
                .resolve(&parameter.ty, owner, operation)
                .map_err(located)?;
            self.check_typed_slot(&parameter.attributes, Target::Parameter, &ty, &what)
                .map_err(located)?;
            if let Some(default) = &parameter.default {
                self.check_literal(default, &ty, &format!("parameter {what}"))
                    .map_err(located)?;
            }
        }
        Ok(())
    }

    /// Members sharing a name and static-ness must all be operations with
    /// distinct signatures.
    fn check_duplicates(&self, owner: &str, members: &[Member]) -> Result<()> {
        let mut groups: HashMap<(&str, bool), Vec<&Member>> = HashMap::new();

        for member in members {
            let group = groups
                .entry((member.name(), member.is_static()))
                .or_default();

            let clash = group.iter().find(|previous| {
                previous.kind() != member.kind()
                    || member.kind() != MemberKind::Operation
                    || previous.as_operation().map(Operation::signature)
                        == member.as_operation().map(Operation::signature)
            });
            if let Some(previous) = clash {
                return Err(Error::duplicate_member(owner, member.name())
                    .with_context(self.table.locate(member.span()))
                    .in_frame(format!(
                        "first declared {}",
                        self.table.locate(previous.span())
                    )));
            }
            group.push(member);
        }
        Ok(())
    }

    // =========================================================================
    // Extended Attributes
    // =========================================================================

    fn check_attributes(
        &self,
        attributes: &ExtendedAttributes,
        target: Target,
        what: &str,
        diagnostics: &mut Diagnostics,
    ) -> Result<()> {
        for attribute in attributes.iter() {
            let Err(rejection) = attributes::check(attribute, target) else {
                continue;
            };
            let err = Error::invalid_extended_attribute(
                &attribute.name,
                format!("{target} {what}"),
                rejection.reason(target),
            )
            .with_context(self.table.locate(attribute.span));

            if rejection == Rejection::Unknown && !self.options.strict {
                debug!(attribute = %attribute.name, target = what, "unrecognized extended attribute");
                diagnostics.warning(err);
            } else {
                return Err(err);
            }
        }
        Ok(())
    }

    /// Checks attributes that constrain the annotated type.
    fn check_typed_slot(
        &self,
        attributes: &ExtendedAttributes,
        target: Target,
        ty: &ResolvedType,
        what: &str,
    ) -> Result<()> {
        let invalid = |name: &str, span: Span, reason: String| {
            Err(
                Error::invalid_extended_attribute(name, format!("{target} {what}"), reason)
                    .with_context(self.table.locate(span)),
            )
        };

        let clamp = attributes.get("Clamp");
        let enforce = attributes.get("EnforceRange");
        if let (Some(_), Some(enforce)) = (clamp, enforce) {
            return invalid(
                "EnforceRange",
                enforce.span,
                "cannot be combined with [Clamp]".to_string(),
            );
        }

        let primitive = ty.non_null().as_primitive();
        for attribute in [clamp, enforce].into_iter().flatten() {
            if !primitive.is_some_and(Primitive::is_integer) {
                return invalid(
                    &attribute.name,
                    attribute.span,
                    format!("requires an integer type, found {ty}"),
                );
            }
        }

        if let Some(attribute) = attributes.get("LegacyNullToEmptyString") {
            if primitive != Some(Primitive::DomString) {
                return invalid(
                    &attribute.name,
                    attribute.span,
                    format!("requires DOMString, found {ty}"),
                );
            }
        }
        Ok(())
    }

    // =========================================================================
    // Literals
    // =========================================================================

    fn check_literal(&self, literal: &Literal, ty: &ResolvedType, target: &str) -> Result<()> {
        if self.literal_matches(literal, ty) {
            return Ok(());
        }
        let expected = match ty.non_null() {
            ResolvedType::Named {
                name,
                kind: DeclarationKind::Enum,
            } => format!("a value of enum {name}"),
            _ => ty.to_string(),
        };
        Err(Error::invalid_default(target, expected, literal.to_string()))
    }

    fn literal_matches(&self, literal: &Literal, ty: &ResolvedType) -> bool {
        match ty {
            ResolvedType::Nullable { inner } => {
                matches!(literal, Literal::Null) || self.literal_matches(literal, inner)
            }
            ResolvedType::Union { members } => {
                members.iter().any(|m| self.literal_matches(literal, m))
            }
            ResolvedType::Primitive { primitive } => primitive_accepts(*primitive, literal),
            ResolvedType::Named { name, kind } => match (kind, literal) {
                (DeclarationKind::Enum, Literal::String(value)) => self
                    .table
                    .get(name)
                    .and_then(Declaration::as_enum)
                    .is_some_and(|e| e.has_value(value)),
                (DeclarationKind::Dictionary, Literal::EmptyDictionary) => true,
                _ => false,
            },
            ResolvedType::Sequence { .. }
            | ResolvedType::FrozenArray { .. }
            | ResolvedType::ObservableArray { .. } => matches!(literal, Literal::EmptySequence),
            ResolvedType::Promise { .. } | ResolvedType::Record { .. } => false,
        }
    }

    // =========================================================================
    // Building
    // =========================================================================

    fn build(&self, resolution: Resolution, diagnostics: Diagnostics) -> Result<ValidatedModel> {
        let mut interfaces: HashMap<String, FlattenedInterface> = resolution
            .interfaces
            .into_iter()
            .map(|i| (i.name.clone(), i))
            .collect();
        let mut dictionaries: HashMap<String, FlattenedDictionary> = resolution
            .dictionaries
            .into_iter()
            .map(|d| (d.name.clone(), d))
            .collect();

        let mut model = ValidatedModel {
            diagnostics,
            ..ValidatedModel::default()
        };

        for decl in self.table.iter() {
            match decl {
                Declaration::Interface(interface) => {
                    if let Some(flat) = interfaces.remove(&interface.name) {
                        model.interfaces.push(self.build_interface(interface, flat)?);
                    }
                }
                Declaration::Dictionary(dictionary) => {
                    if let Some(flat) = dictionaries.remove(&dictionary.name) {
                        model.dictionaries.push(self.build_dictionary(flat)?);
                    }
                }
                Declaration::Enum(e) => model.enums.push(ValidatedEnum {
                    name: e.name.clone(),
                    values: e.values.iter().map(|v| v.value.clone()).collect(),
                }),
                Declaration::CallbackInterface(callback) => {
                    let members = callback
                        .members
                        .iter()
                        .map(|member| {
                            self.build_member(FlattenedMember {
                                member: member.clone(),
                                origin: callback.name.clone(),
                                from_mixin: false,
                                depth: 0,
                            })
                        })
                        .collect::<Result<_>>()?;
                    model.callback_interfaces.push(ValidatedCallbackInterface {
                        name: callback.name.clone(),
                        members,
                    });
                }
                Declaration::CallbackFunction(callback) => {
                    let name = &callback.name;
                    model.callbacks.push(ValidatedCallback {
                        name: name.clone(),
                        return_type: self.types.resolve(&callback.return_type, name, name)?,
                        arguments: self.resolve_parameters(name, name, &callback.arguments)?,
                    });
                }
                Declaration::Typedef(typedef) => model.typedefs.push(ValidatedTypedef {
                    name: typedef.name.clone(),
                    ty: self.types.resolve(&typedef.ty, &typedef.name, "typedef")?,
                }),
                Declaration::InterfaceMixin(_) => {}
            }
        }

        Ok(model)
    }

    fn build_interface(
        &self,
        interface: &Interface,
        flat: FlattenedInterface,
    ) -> Result<ValidatedInterface> {
        let name = &interface.name;

        let mut factories = Vec::new();
        for factory in interface.attributes.get_all("LegacyFactoryFunction") {
            match &factory.value {
                ExtendedAttributeValue::NamedArgumentList {
                    name: function,
                    arguments,
                } => factories.push(ValidatedFactory {
                    name: function.clone(),
                    arguments: self.resolve_parameters(name, function, arguments)?,
                }),
                ExtendedAttributeValue::Identifier(function) => factories.push(ValidatedFactory {
                    name: function.clone(),
                    arguments: Vec::new(),
                }),
                _ => {}
            }
        }

        let collection = interface
            .collection
            .as_ref()
            .map(|c| self.resolve_collection(name, c))
            .transpose()?;

        let members = flat
            .members
            .into_iter()
            .map(|m| self.build_member(m))
            .collect::<Result<_>>()?;

        Ok(ValidatedInterface {
            name: name.clone(),
            ancestry: flat.ancestry,
            members,
            attributes: interface.attributes.clone(),
            collection,
            factories,
            span: interface.span,
        })
    }

    fn build_dictionary(&self, flat: FlattenedDictionary) -> Result<ValidatedDictionary> {
        let members = flat
            .members
            .into_iter()
            .map(|m| -> Result<ValidatedDictionaryMember> {
                Ok(ValidatedDictionaryMember {
                    ty: self.types.resolve(&m.member.ty, &m.origin, &m.member.name)?,
                    name: m.member.name,
                    required: m.member.required,
                    default: m.member.default,
                    origin: m.origin,
                    depth: m.depth,
                })
            })
            .collect::<Result<_>>()?;

        Ok(ValidatedDictionary {
            name: flat.name,
            ancestry: flat.ancestry,
            members,
        })
    }

    fn build_member(&self, flat: FlattenedMember) -> Result<ValidatedMember> {
        let owner = flat.origin.as_str();
        let signature = match &flat.member {
            Member::Attribute(attribute) => ResolvedSignature::Attribute {
                ty: self.types.resolve(&attribute.ty, owner, &attribute.name)?,
            },
            Member::Operation(operation) => {
                let name = operation.display_name();
                ResolvedSignature::Operation {
                    return_type: self.types.resolve(&operation.return_type, owner, name)?,
                    arguments: self.resolve_parameters(owner, name, &operation.arguments)?,
                }
            }
            Member::Constant(constant) => ResolvedSignature::Constant {
                ty: self.types.resolve(&constant.ty, owner, &constant.name)?,
                value: constant.value.clone(),
            },
        };

        Ok(ValidatedMember {
            member: flat.member,
            origin: flat.origin,
            from_mixin: flat.from_mixin,
            depth: flat.depth,
            signature,
        })
    }

    fn resolve_parameters(
        &self,
        owner: &str,
        operation: &str,
        parameters: &[Parameter],
    ) -> Result<Vec<ResolvedParameter>> {
        parameters
            .iter()
            .map(|p| -> Result<ResolvedParameter> {
                Ok(ResolvedParameter {
                    name: p.name.clone(),
                    ty: self.types.resolve(&p.ty, owner, operation)?,
                    optional: p.optional,
                    default: p.default.clone(),
                    variadic: p.variadic,
                    attributes: p.attributes.clone(),
                })
            })
            .collect()
    }

    fn resolve_collection(
        &self,
        owner: &str,
        collection: &CollectionDecl,
    ) -> Result<ResolvedCollection> {
        let member = match collection.kind {
            CollectionKind::Iterable => "iterable",
            CollectionKind::Maplike => "maplike",
            CollectionKind::Setlike => "setlike",
        };
        Ok(ResolvedCollection {
            kind: collection.kind,
            key: collection
                .key
                .as_ref()
                .map(|k| self.types.resolve(k, owner, member))
                .transpose()?,
            value: self.types.resolve(&collection.value, owner, member)?,
            readonly: collection.readonly,
            is_async: collection.is_async,
        })
    }

    /// Attaches a position unless the error already carries one.
    fn locate(&self, err: Error, span: Span) -> Error {
        if err.context.is_some() {
            err
        } else {
            err.with_context(self.table.locate(span))
        }
    }
}

fn primitive_accepts(primitive: Primitive, literal: &Literal) -> bool {
    if primitive == Primitive::Any {
        return true;
    }
    match literal {
        Literal::Boolean(_) => primitive == Primitive::Boolean,
        Literal::Integer(n) => {
            primitive == Primitive::BigInt
                || primitive.is_float()
                || primitive
                    .integer_range()
                    .is_some_and(|(lo, hi)| (lo..=hi).contains(n))
        }
        Literal::Decimal(x) => primitive.is_float() && (x.is_finite() || primitive.is_unrestricted()),
        Literal::String(_) => primitive.is_string(),
        Literal::Undefined => primitive == Primitive::Undefined,
        Literal::Null | Literal::EmptySequence | Literal::EmptyDictionary => false,
    }
}

/// Validates `table` with default options.
///
/// # Errors
/// Returns the first fatal error.
pub fn validate(table: &SymbolTable) -> Result<ValidatedModel> {
    Validator::new(table).validate()
}
