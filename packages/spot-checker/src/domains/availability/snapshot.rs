use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::common::CheckError;

/// Last-seen extracted content, kept in a single plain-text file
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored snapshot. `None` means this is the first run.
    pub async fn load(&self) -> Result<Option<String>, CheckError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No snapshot on disk");
                Ok(None)
            }
            Err(source) => Err(self.io_error(source)),
        }
    }

    /// Replace the stored snapshot.
    ///
    /// Writes a sibling temp file and renames it over the target.
    pub async fn store(&self, content: &str) -> Result<(), CheckError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(e))?;
        }

        let tmp_path = self.tmp_path();
        tokio::fs::write(&tmp_path, content)
            .await
            .map_err(|e| self.io_error(e))?;
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|e| self.io_error(e))?;

        debug!(path = %self.path.display(), bytes = content.len(), "Snapshot stored");
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }

    fn io_error(&self, source: std::io::Error) -> CheckError {
        CheckError::SnapshotIo {
            path: self.path.clone(),
            source,
        }
    }
}
