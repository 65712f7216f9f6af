//! Registry serialization and deserialization using `MessagePack`.
//!
//! The registry is first flattened into a [`Snapshot`] (dice list plus
//! collections list, members by name), which is what actually goes on disk.
//! Loading decodes the snapshot and rebuilds the registry in two phases.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use dicebag_foundation::{Error, ErrorContext, Result};
use dicebag_storage::{Registry, Snapshot};

/// Serializes a registry to bytes using `MessagePack` format.
///
/// Uses named serialization to preserve struct field names.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_bytes(registry: &Registry) -> Result<Vec<u8>> {
    rmp_serde::to_vec_named(&registry.snapshot()).map_err(|e| Error::serialization(e.to_string()))
}

/// Decodes a snapshot from `MessagePack` bytes without rebuilding it.
///
/// # Errors
///
/// Returns an error if the bytes are not a valid snapshot.
pub fn snapshot_from_bytes(bytes: &[u8]) -> Result<Snapshot> {
    rmp_serde::from_slice(bytes).map_err(|e| Error::serialization(e.to_string()))
}

/// Deserializes a registry from `MessagePack` bytes.
///
/// # Errors
///
/// Returns an error if decoding fails or the snapshot can't be rebuilt
/// (for example a `DanglingReference`).
pub fn from_bytes(bytes: &[u8]) -> Result<Registry> {
    Registry::from_snapshot(snapshot_from_bytes(bytes)?)
}

fn io_error(action: &str, path: &Path, e: &std::io::Error) -> Error {
    Error::io(format!("failed to {action} file: {e}"))
        .with_context(ErrorContext::new().with_path(path.display().to_string()))
}

/// Saves a registry to a file using `MessagePack` format.
///
/// Creates the file if it doesn't exist, or overwrites it if it does.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written to,
/// or if serialization fails.
pub fn save_to_file<P: AsRef<Path>>(registry: &Registry, path: P) -> Result<()> {
    let path = path.as_ref();
    let bytes = to_bytes(registry)?;

    let file = File::create(path).map_err(|e| io_error("create", path, &e))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(&bytes)
        .map_err(|e| io_error("write", path, &e))?;
    writer.flush().map_err(|e| io_error("flush", path, &e))?;

    Ok(())
}

/// Loads a registry from a `MessagePack` file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or if deserialization fails.
pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Registry> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| io_error("open", path, &e))?;

    let mut reader = BufReader::new(file);
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| io_error("read", path, &e))?;

    from_bytes(&bytes).map_err(|e| {
        if e.context.is_some() {
            e
        } else {
            e.with_context(ErrorContext::new().with_path(path.display().to_string()))
        }
    })
}
