//! Integration tests for Layer 1: Registry
//!
//! Tests for partial merging across files and symbol lookup.

mod lookup;
mod partials;
