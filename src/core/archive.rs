//! Archive creation and content checksums.
//!
//! The archiver is an injected interface so the pipeline can be exercised in
//! tests without producing real archives. The default implementation writes
//! zip files with deterministic entry ordering and fixed metadata: two clean
//! builds of the same input are byte-identical.

use sha2::{Digest, Sha256};
use std::fmt::Write as _;
use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::utils::io;

pub trait Archiver {
    /// Verify the archiver can run at all. Checked before any build output is
    /// produced; failure aborts the whole run.
    fn ensure_available(&self) -> Result<()>;

    /// Compress `package_root` into `dest`, with entry paths relative to the
    /// package root.
    fn archive(&self, package_root: &Path, dest: &Path) -> Result<()>;
}

/// Zip archiver with reproducible output.
pub struct ZipArchiver;

impl Archiver for ZipArchiver {
    fn ensure_available(&self) -> Result<()> {
        // Compression is in-process; no external tool to probe.
        Ok(())
    }

    fn archive(&self, package_root: &Path, dest: &Path) -> Result<()> {
        let file = fs::File::create(dest)
            .map_err(|e| Error::archive_write_failed(dest.display().to_string(), e.to_string()))?;
        let mut zip = zip::ZipWriter::new(file);

        // Zero the modification time so archive bytes depend only on content.
        let options = zip::write::FileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated)
            .last_modified_time(zip::DateTime::default())
            .unix_permissions(0o644);

        let mut entries = Vec::new();
        collect_entries(package_root, package_root, &mut entries)?;
        entries.sort();

        for entry in entries {
            match entry {
                ArchiveEntry::Dir(name) => {
                    zip.add_directory(name, options).map_err(|e| {
                        Error::archive_write_failed(dest.display().to_string(), e.to_string())
                    })?;
                }
                ArchiveEntry::File(name, path) => {
                    zip.start_file(name, options).map_err(|e| {
                        Error::archive_write_failed(dest.display().to_string(), e.to_string())
                    })?;
                    let bytes = fs::read(&path).map_err(|e| {
                        Error::internal_io(e.to_string(), Some("read package file".to_string()))
                    })?;
                    zip.write_all(&bytes).map_err(|e| {
                        Error::archive_write_failed(dest.display().to_string(), e.to_string())
                    })?;
                }
            }
        }

        zip.finish()
            .map(|_| ())
            .map_err(|e| Error::archive_write_failed(dest.display().to_string(), e.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum ArchiveEntry {
    Dir(String),
    File(String, PathBuf),
}

fn collect_entries(root: &Path, dir: &Path, entries: &mut Vec<ArchiveEntry>) -> Result<()> {
    for entry in io::sorted_entries(dir, "list package tree")? {
        let path = entry.path();
        let relative = path
            .strip_prefix(root)
            .map_err(|e| Error::internal_unexpected(e.to_string()))?
            .to_string_lossy()
            .replace('\\', "/");

        if path.is_dir() {
            entries.push(ArchiveEntry::Dir(format!("{}/", relative)));
            collect_entries(root, &path, entries)?;
        } else {
            entries.push(ArchiveEntry::File(relative, path));
        }
    }
    Ok(())
}

/// Compute the artifact's SHA-256 and persist it as a `.sha256` sidecar in
/// `sha256sum` format (`<hex>  <file name>`).
pub fn write_checksum(artifact: &Path) -> Result<PathBuf> {
    let bytes = fs::read(artifact)
        .map_err(|e| Error::internal_io(e.to_string(), Some("read artifact".to_string())))?;

    let digest = Sha256::digest(&bytes);
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest {
        let _ = write!(hex, "{:02x}", byte);
    }

    let file_name = artifact
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let checksum_path = PathBuf::from(format!("{}.sha256", artifact.display()));
    io::write_file(
        &checksum_path,
        &format!("{}  {}\n", hex, file_name),
        "write checksum",
    )?;

    Ok(checksum_path)
}
