//! idlbind - Interface definition registry and binding-model generator
//!
//! This crate re-exports all layers of the idlbind system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 4: idlbind_runtime    — Pipeline, configuration, output writers, CLI
//! Layer 3: idlbind_emit       — Binding model, emission, definition rendering
//! Layer 2: idlbind_engine     — Inheritance flattening, mixins, validation
//! Layer 1: idlbind_registry   — Symbol table, partial-definition merging
//!          idlbind_language   — Lexer, AST, recovering parser
//! Layer 0: idlbind_foundation — Core types (Error, Diagnostics, Primitive)
//! ```

pub use idlbind_emit as emit;
pub use idlbind_engine as engine;
pub use idlbind_foundation as foundation;
pub use idlbind_language as language;
pub use idlbind_registry as registry;
pub use idlbind_runtime as runtime;
