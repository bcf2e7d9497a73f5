//! Integration tests for Layer 0: Foundation
//!
//! Tests for errors, diagnostics, and primitive types.

mod diagnostics;
mod errors;
mod primitives;
