//! Core error types, diagnostics, and primitive types for idlbind.
//!
//! This crate provides:
//! - [`Error`] - Rich error types with context
//! - [`Diagnostics`] - Collected non-fatal problems for batch reporting
//! - [`Primitive`] - The built-in types every declaration set can use

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod diagnostics;
pub mod error;
pub mod types;

pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use error::{Error, ErrorContext, ErrorKind, Result};
pub use types::Primitive;
