//! Integration tests for Layer 3: Emit
//!
//! Tests for the binding model and rendering it back to definitions.

mod model;
mod round_trip;
