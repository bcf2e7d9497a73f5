//! The binding model produced from validated interface definitions.
//!
//! This crate provides:
//! - [`BindingModel`] - Serializable, generator-agnostic description of every binding
//! - [`emit`] - Conversion from a [`ValidatedModel`](idlbind_engine::ValidatedModel)
//! - [`render_idl`] - Rendering a model back to definition text

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod emit;
pub mod model;
pub mod render;

pub use emit::emit;
pub use model::{
    ArgumentBinding, BindingModel, CallbackBinding, CallbackInterfaceBinding, CollectionBinding,
    ConstructorBinding, DictionaryBinding, DictionaryMemberBinding, EnumBinding,
    EnumValueBinding, FactoryBinding, InterfaceBinding, MemberBinding, MemberDetail,
};
pub use render::render_idl;
