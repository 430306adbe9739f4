use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use grab_logging::grab_debug;
use mediagrab_core::MediaType;
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::client::HttpClient;
use crate::filename::media_filename;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Where resolved media ends up. Injected so extraction and saving can be
/// exercised without a real filesystem target.
pub trait MediaSink: Send + Sync {
    fn save_bytes(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf, SinkError>;
    /// Degraded path: record the remote URL instead of its bytes.
    fn save_link(&self, filename: &str, url: &str) -> Result<PathBuf, SinkError>;
}

/// Ensure output directory exists; create if missing.
pub fn ensure_output_dir(dir: &Path) -> Result<(), SinkError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| SinkError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(SinkError::OutputDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| SinkError::OutputDir(e.to_string()))?;
    }
    // Basic writability probe: try creating a temp file.
    NamedTempFile::new_in(dir).map_err(|e| SinkError::OutputDir(e.to_string()))?;
    Ok(())
}

/// Sink writing into a directory. Media bytes land atomically (temp file,
/// then rename); links become `[InternetShortcut]` `.url` files a desktop
/// can open in a browser.
pub struct DirSink {
    dir: PathBuf,
}

impl DirSink {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn write_atomic(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf, SinkError> {
        ensure_output_dir(&self.dir)?;

        let target = self.dir.join(filename);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(bytes)?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        // Replace existing file if present to keep determinism.
        if target.exists() {
            fs::remove_file(&target)?;
        }
        tmp.persist(&target).map_err(|e| SinkError::Io(e.error))?;
        Ok(target)
    }
}

impl MediaSink for DirSink {
    fn save_bytes(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf, SinkError> {
        self.write_atomic(filename, bytes)
    }

    fn save_link(&self, filename: &str, url: &str) -> Result<PathBuf, SinkError> {
        let shortcut = format!("[InternetShortcut]\r\nURL={url}\r\n");
        self.write_atomic(filename, shortcut.as_bytes())
    }
}

/// Outcome of a save: either the bytes landed locally, or the fetch faulted
/// and only a link to the remote was recorded (accepted degraded behavior,
/// not an error).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved(PathBuf),
    LinkedOnly(PathBuf),
}

impl SaveOutcome {
    pub fn path(&self) -> &Path {
        match self {
            SaveOutcome::Saved(path) | SaveOutcome::LinkedOnly(path) => path,
        }
    }
}

/// Fetches a resolved media URL and hands the bytes to a sink.
pub struct MediaSaver<S: MediaSink> {
    client: HttpClient,
    sink: S,
}

impl<S: MediaSink> MediaSaver<S> {
    pub fn new(client: HttpClient, sink: S) -> Self {
        Self { client, sink }
    }

    /// Saves `media_url` under a deterministic name whose extension follows
    /// `media_type`. Fetch faults are not errors: the saver falls back to
    /// recording the direct link, exactly once. Only sink faults surface.
    pub async fn save(
        &self,
        media_url: &str,
        stem: &str,
        media_type: MediaType,
    ) -> Result<SaveOutcome, SinkError> {
        match self.client.get_bytes(media_url).await {
            Ok(bytes) => {
                let filename = media_filename(Some(stem), media_url, media_type.extension());
                Ok(SaveOutcome::Saved(self.sink.save_bytes(&filename, &bytes)?))
            }
            Err(err) => {
                grab_debug!("fetch of {media_url} failed ({err}); recording direct link");
                let filename = media_filename(Some(stem), media_url, "url");
                Ok(SaveOutcome::LinkedOnly(
                    self.sink.save_link(&filename, media_url)?,
                ))
            }
        }
    }
}
