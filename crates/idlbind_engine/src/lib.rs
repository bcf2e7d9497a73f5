//! Inheritance, mixin, and type resolution for interface definitions.
//!
//! This crate provides:
//! - [`Resolver`] - Parent-chain flattening with mixin application and shadowing
//! - [`TypeResolver`] - Binding type references to declarations, expanding typedefs
//! - [`Validator`] - Extended attribute, parameter, and default value checks
//!   producing a [`ValidatedModel`]

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod attributes;
pub mod resolve;
pub mod types;
pub mod validate;


pub use attributes::{AttributeRule, Target};
pub use resolve::{
    FlattenedDictionary, FlattenedDictionaryMember, FlattenedInterface, FlattenedMember,
    MixinCollision, MixinOrder, Resolution, Resolver, ResolverPolicy, flatten,
    flatten_dictionary, resolve_all,
};
pub use types::{ResolvedType, TypeResolver};
pub use validate::{
    ResolvedCollection, ResolvedParameter, ResolvedSignature, ValidatedCallback,
    ValidatedCallbackInterface, ValidatedDictionary, ValidatedDictionaryMember, ValidatedEnum,
    ValidatedFactory, ValidatedInterface, ValidatedMember, ValidatedModel, ValidatedTypedef,
    Validator, ValidatorOptions, validate,
};
