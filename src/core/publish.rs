//! Release hand-off types and the publisher seam.
//!
//! Publishing is an external collaborator: the pipeline produces finished
//! artifacts and hands them over through this narrow interface. Nothing in
//! this crate performs network calls.

use serde::Serialize;

use crate::error::Result;

/// A finished, immutable artifact: one archive plus its checksum sidecar.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseArtifact {
    pub agent: String,
    pub variant: String,
    pub file_name: String,
    pub path: String,
    pub checksum_path: String,
}

/// Everything a publisher needs to upload one release.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseRequest {
    pub tag: String,
    pub title: String,
    pub notes: String,
    pub artifacts: Vec<ReleaseArtifact>,
}

pub trait ReleasePublisher {
    /// Whether a release already exists for the given version tag.
    fn release_exists(&self, tag: &str) -> Result<bool>;

    /// Upload the finished artifacts under the request's title.
    fn publish(&self, request: &ReleaseRequest) -> Result<()>;
}
