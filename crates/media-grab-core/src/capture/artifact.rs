use crate::{CoreResult, capture::ContainerFormat};

/// One finished recording, ready to be offered to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// File name to offer the artifact under.
    pub file_name: String,
    /// Container the bytes are encoded in.
    pub container_format: ContainerFormat,
    /// Concatenated chunks in arrival order.
    pub bytes: Vec<u8>,
}

impl Artifact {
    /// Assembled size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Hands a finished artifact to the host environment.
///
/// Called exactly once per completed cycle. The artifact is moved in, so any
/// resource backing it is released when the call returns.
pub trait DownloadTrigger: Send + Sync {
    /// Offers `artifact` to the user.
    fn trigger(&self, artifact: Artifact) -> CoreResult<()>;
}
