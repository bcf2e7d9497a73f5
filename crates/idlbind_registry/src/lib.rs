//! Symbol table for idlbind.
//!
//! Every interface, mixin, dictionary, enum, callback and typedef shares one
//! namespace. Partial definitions are merged on registration.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod symbol_table;

pub use symbol_table::SymbolTable;
