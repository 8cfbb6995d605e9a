//! File I/O primitives with consistent error handling.

use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

/// Read file contents with standardized error handling.
///
/// Wraps `fs::read_to_string` with consistent `Error::internal_io` formatting.
pub fn read_file(path: &Path, operation: &str) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| Error::internal_io(e.to_string(), Some(operation.to_string())))
}

/// Write content to file with standardized error handling.
pub fn write_file(path: &Path, content: &str, operation: &str) -> Result<()> {
    fs::write(path, content)
        .map_err(|e| Error::internal_io(e.to_string(), Some(operation.to_string())))
}

pub fn create_dir_all(path: &Path, operation: &str) -> Result<()> {
    fs::create_dir_all(path)
        .map_err(|e| Error::internal_io(e.to_string(), Some(operation.to_string())))
}

/// Copy a single file, creating the destination's parent directories.
pub fn copy_file(src: &Path, dest: &Path, operation: &str) -> Result<()> {
    if let Some(parent) = dest.parent() {
        create_dir_all(parent, operation)?;
    }
    fs::copy(src, dest)
        .map(|_| ())
        .map_err(|e| Error::internal_io(e.to_string(), Some(operation.to_string())))
}

/// Recursively copy a directory tree verbatim.
pub fn copy_dir_recursive(src: &Path, dest: &Path, operation: &str) -> Result<()> {
    create_dir_all(dest, operation)?;

    for entry in sorted_entries(src, operation)? {
        let target = dest.join(entry.file_name());
        let path = entry.path();
        if path.is_dir() {
            copy_dir_recursive(&path, &target, operation)?;
        } else {
            copy_file(&path, &target, operation)?;
        }
    }

    Ok(())
}

/// Remove a directory tree and recreate it empty.
pub fn purge_dir(path: &Path, operation: &str) -> Result<()> {
    remove_dir_if_exists(path, operation)?;
    create_dir_all(path, operation)
}

pub fn remove_dir_if_exists(path: &Path, operation: &str) -> Result<()> {
    if path.exists() {
        fs::remove_dir_all(path)
            .map_err(|e| Error::internal_io(e.to_string(), Some(operation.to_string())))?;
    }
    Ok(())
}

/// Directory entries sorted by file name. Traversal-order-dependent output
/// (copies, archive entries) must be stable across runs and platforms.
pub fn sorted_entries(path: &Path, operation: &str) -> Result<Vec<fs::DirEntry>> {
    let mut entries: Vec<fs::DirEntry> = fs::read_dir(path)
        .map_err(|e| Error::internal_io(e.to_string(), Some(operation.to_string())))?
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(|e| Error::internal_io(e.to_string(), Some(operation.to_string())))?;

    entries.sort_by_key(|e| e.file_name());
    Ok(entries)
}
