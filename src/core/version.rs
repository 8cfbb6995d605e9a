//! Release version validation.

use regex::Regex;

use crate::error::{Error, Result};

const VERSION_PATTERN: &str = r"^v\d+\.\d+\.\d+$";

/// Validate a release version string against `vMAJOR.MINOR.PATCH`.
///
/// The version keys artifact file names, so a malformed value is a fatal
/// configuration error raised before any output is produced.
pub fn validate_release_version(version: &str) -> Result<()> {
    let re = Regex::new(VERSION_PATTERN)
        .map_err(|e| Error::internal_unexpected(format!("Invalid version pattern: {}", e)))?;

    if re.is_match(version.trim()) {
        Ok(())
    } else {
        Err(Error::config_invalid_version(version))
    }
}
