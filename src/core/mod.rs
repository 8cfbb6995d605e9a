// Public modules
pub mod archive;
pub mod error;
pub mod package;
pub mod pipeline;
pub mod publish;
pub mod registry;
pub mod render;
pub mod template;
pub mod version;

// Re-export common types for convenience
pub use error::{Error, ErrorCode, Result};
pub use pipeline::{BuildContext, BuildRequest, BuildRun};
pub use publish::{ReleaseArtifact, ReleasePublisher, ReleaseRequest};
