use crate::config::default_output_dir;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where finished recordings are written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Directory artifacts are saved into.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}
