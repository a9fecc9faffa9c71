//! Filesystem download trigger.
//!
//! Saves each finished artifact into a directory the way a browser saves a
//! download: never overwriting, adding ` (1)`, ` (2)`, ... to clashing names.

use crate::HostResult;

use std::{
    fs,
    io::{self, Write},
    panic::Location,
    path::{Path, PathBuf},
    sync::Mutex,
};

use error_location::ErrorLocation;
use media_grab_core::{Artifact, CaptureError, CoreResult, DownloadTrigger};
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

/// Writes artifacts into a download directory.
#[derive(Debug)]
pub struct FileDownloader {
    output_dir: PathBuf,
    /// Serializes name selection and the final rename across worker threads.
    naming: Mutex<()>,
}

impl FileDownloader {
    /// Create a downloader, creating `output_dir` if missing.
    #[track_caller]
    #[instrument]
    pub fn new(output_dir: &Path) -> HostResult<Self> {
        fs::create_dir_all(output_dir)?;

        info!(output_dir = ?output_dir, "FileDownloader initialized");

        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            naming: Mutex::new(()),
        })
    }

    /// Directory artifacts are written to.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// First free path for `file_name`: `name.ext`, `name (1).ext`, ...
    fn unique_path(&self, file_name: &str) -> PathBuf {
        let candidate = self.output_dir.join(file_name);
        if !candidate.exists() {
            return candidate;
        }

        let name = Path::new(file_name);
        let stem = name
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = name.extension().map(|e| e.to_string_lossy().into_owned());

        (1u32..)
            .map(|n| match &extension {
                Some(ext) => self.output_dir.join(format!("{stem} ({n}).{ext}")),
                None => self.output_dir.join(format!("{stem} ({n})")),
            })
            .find(|path| !path.exists())
            .unwrap_or(candidate)
    }

    fn write(&self, file_name: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        let temp_path = self
            .output_dir
            .join(format!(".{file_name}.{}.part", Uuid::new_v4()));

        let mut temp_file = fs::File::create(&temp_path)?;
        temp_file.write_all(bytes)?;
        temp_file.sync_all()?;
        drop(temp_file);

        // Recover from lock poison; the guard protects no data.
        let _guard = self.naming.lock().unwrap_or_else(|e| {
            error!("Download naming lock poisoned, recovering: {}", e);
            e.into_inner()
        });

        let final_path = self.unique_path(file_name);
        if let Err(e) = fs::rename(&temp_path, &final_path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e);
        }

        Ok(final_path)
    }
}

impl DownloadTrigger for FileDownloader {
    #[track_caller]
    #[instrument(skip(self, artifact), fields(file_name = %artifact.file_name, artifact_len = artifact.len()))]
    fn trigger(&self, artifact: Artifact) -> CoreResult<()> {
        // Only the final path component is honoured.
        let file_name = Path::new(&artifact.file_name)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .filter(|name| !name.is_empty())
            .ok_or_else(|| CaptureError::DownloadFailed {
                file_name: artifact.file_name.clone(),
                reason: "artifact has no usable file name".to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let path = self
            .write(&file_name, &artifact.bytes)
            .map_err(|e| CaptureError::DownloadFailed {
                file_name: file_name.clone(),
                reason: e.to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?;

        drop(artifact);
        debug!("Artifact buffer released");

        info!(path = ?path, "Artifact saved");

        Ok(())
    }
}
