use thiserror::Error;

use crate::model::RequirementClass;

/// Fatal failures of a single sandbox resolution.
///
/// Not-found outcomes are never errors; they drive the fall-through pipeline instead.
#[derive(Debug, Error)]
pub enum SandboxError {
    #[error("malformed {class} parameter requirements: {source}")]
    MalformedRequirements {
        class: RequirementClass,
        #[source]
        source: serde_json::Error,
    },

    #[error("example store failure: {0:#}")]
    Store(#[from] anyhow::Error),
}

pub type SandboxResult<T> = std::result::Result<T, SandboxError>;
