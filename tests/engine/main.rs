//! Integration tests for Layer 2: Engine
//!
//! Tests for inheritance flattening, mixins, type resolution, and validation.

mod flatten;
mod validation;
