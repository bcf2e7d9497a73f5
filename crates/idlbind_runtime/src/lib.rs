//! Pipeline, configuration, output, and CLI support for idlbind.
//!
//! This crate provides:
//! - [`Pipeline`] - One run from source files to a [`BindingModel`](idlbind_emit::BindingModel)
//! - [`GeneratorConfig`] - Run settings with presets and TOML loading
//! - Model writers for JSON, `MessagePack`, and rendered definitions
//! - [`init_tracing`] - Log output for the `idlbind` binary

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod logging;
pub mod output;
pub mod pipeline;

pub use config::{GeneratorConfig, OutputFormat};
pub use logging::init_tracing;
pub use output::{from_bytes, load_from_file, save_to_file, to_bytes, write_model};
pub use pipeline::{Pipeline, RunOutput, RunReport};
