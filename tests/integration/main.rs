//! End-to-end tests through the runtime pipeline.
//!
//! Run with: `cargo test --test integration`

mod files;
mod pipeline;
mod properties;
