//! Download sinks: where exported payloads are delivered.

use std::fs;
use std::path::{Path, PathBuf};

use crate::spec::ExportError;

/// Receives one finished export payload.
pub trait DownloadSink {
    fn save(&mut self, bytes: &[u8], file_name: &str, mime_type: &str) -> Result<(), ExportError>;
}

/// Writes each payload as `<dir_out>/<file_name>`, replacing existing files.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir_out: PathBuf,
}

impl DirectorySink {
    pub fn new(dir_out: impl Into<PathBuf>) -> Self {
        Self {
            dir_out: dir_out.into(),
        }
    }

    pub fn dir_out(&self) -> &Path {
        &self.dir_out
    }
}

impl DownloadSink for DirectorySink {
    fn save(&mut self, bytes: &[u8], file_name: &str, _mime_type: &str) -> Result<(), ExportError> {
        let derive_err = |e: std::io::Error| ExportError::Sink {
            file_name: file_name.to_string(),
            message: e.to_string(),
        };
        // Plain names only; a path would escape the output directory.
        if Path::new(file_name).file_name().and_then(|s| s.to_str()) != Some(file_name) {
            return Err(ExportError::Sink {
                file_name: file_name.to_string(),
                message: "file name must not contain path components".to_string(),
            });
        }
        fs::create_dir_all(&self.dir_out).map_err(derive_err)?;
        let path_out = self.dir_out.join(file_name);
        fs::write(&path_out, bytes).map_err(derive_err)?;
        tracing::debug!(path = %path_out.display(), n_bytes = bytes.len(), "saved export");
        Ok(())
    }
}

/// One payload captured by [`MemorySink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecSavedFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Keeps payloads in memory, in delivery order.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub files: Vec<SpecSavedFile>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recently saved payload.
    pub fn last(&self) -> Option<&SpecSavedFile> {
        self.files.last()
    }
}

impl DownloadSink for MemorySink {
    fn save(&mut self, bytes: &[u8], file_name: &str, mime_type: &str) -> Result<(), ExportError> {
        self.files.push(SpecSavedFile {
            file_name: file_name.to_string(),
            mime_type: mime_type.to_string(),
            bytes: bytes.to_vec(),
        });
        Ok(())
    }
}
