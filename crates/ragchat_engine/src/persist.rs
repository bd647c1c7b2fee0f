use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("target has no parent directory: {0}")]
    NoParent(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Replaces one file atomically: content goes to a sibling temp file which
/// is then renamed over the target, so readers never see a partial write.
#[derive(Debug, Clone)]
pub struct AtomicFileWriter {
    target: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(target: impl Into<PathBuf>) -> Self {
        Self {
            target: target.into(),
        }
    }

    pub fn write(&self, content: &str) -> Result<(), PersistError> {
        let dir = self.parent_dir()?;
        fs::create_dir_all(&dir)?;

        let mut tmp = NamedTempFile::new_in(&dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;
        tmp.persist(&self.target)
            .map_err(|e| PersistError::Io(e.error))?;
        Ok(())
    }

    fn parent_dir(&self) -> Result<PathBuf, PersistError> {
        match self.target.parent() {
            Some(parent) if parent.as_os_str().is_empty() => Ok(PathBuf::from(".")),
            Some(parent) => Ok(parent.to_path_buf()),
            None => Err(PersistError::NoParent(self.target.display().to_string())),
        }
    }
}
