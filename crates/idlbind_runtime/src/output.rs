//! Writing and reading binding models.
//!
//! JSON and `MessagePack` output can be read back; rendered definition
//! text is for people and for re-parsing.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use idlbind_emit::{BindingModel, render_idl};
use idlbind_foundation::{Error, ErrorKind, Result};

use crate::config::OutputFormat;

fn serialization(message: impl ToString) -> Error {
    Error::new(ErrorKind::Serialization(message.to_string()))
}

/// Encodes a model in the given format.
///
/// `MessagePack` uses named serialization to preserve field names.
///
/// # Errors
/// Returns a `Serialization` error if encoding fails.
pub fn to_bytes(model: &BindingModel, format: OutputFormat) -> Result<Vec<u8>> {
    match format {
        OutputFormat::Json => serde_json::to_vec_pretty(model).map_err(serialization),
        OutputFormat::Msgpack => rmp_serde::to_vec_named(model).map_err(serialization),
        OutputFormat::Idl => Ok(render_idl(model).into_bytes()),
    }
}

/// Decodes a model previously written with [`to_bytes`].
///
/// # Errors
/// Returns a `Serialization` error if decoding fails or the format is
/// [`OutputFormat::Idl`], which must be parsed instead.
pub fn from_bytes(bytes: &[u8], format: OutputFormat) -> Result<BindingModel> {
    match format {
        OutputFormat::Json => serde_json::from_slice(bytes).map_err(serialization),
        OutputFormat::Msgpack => rmp_serde::from_slice(bytes).map_err(serialization),
        OutputFormat::Idl => Err(serialization(
            "rendered definitions must be parsed, not decoded",
        )),
    }
}

/// Writes a model to any writer, flushing before returning.
///
/// # Errors
/// Returns a `Serialization` error if encoding fails or an `Io` error if
/// writing fails.
pub fn write_model<W: Write>(model: &BindingModel, format: OutputFormat, writer: W) -> Result<()> {
    let bytes = to_bytes(model, format)?;
    let mut writer = BufWriter::new(writer);
    writer
        .write_all(&bytes)
        .map_err(|e| Error::io(format!("failed to write output: {e}")))?;
    writer
        .flush()
        .map_err(|e| Error::io(format!("failed to flush output: {e}")))
}

/// Saves a model to a file, replacing any existing contents.
///
/// # Errors
/// Returns an error if the file cannot be created or written to,
/// or if serialization fails.
pub fn save_to_file<P: AsRef<Path>>(
    model: &BindingModel,
    format: OutputFormat,
    path: P,
) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)
        .map_err(|e| Error::io(format!("failed to create file '{}': {e}", path.display())))?;
    write_model(model, format, file)
        .map_err(|e| e.in_frame(format!("writing '{}'", path.display())))
}

/// Loads a model from a JSON or `MessagePack` file.
///
/// # Errors
/// Returns an error if the file cannot be read or decoded.
pub fn load_from_file<P: AsRef<Path>>(path: P, format: OutputFormat) -> Result<BindingModel> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)
        .map_err(|e| Error::io(format!("failed to read file '{}': {e}", path.display())))?;
    from_bytes(&bytes, format)
}
