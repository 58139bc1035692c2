//! Where the chat REPL keeps its history.

use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Session directory for one CLI run. An explicit directory persists; the
/// default is a fresh temp directory removed when this value is dropped.
#[derive(Debug)]
pub struct SessionDir {
    path: PathBuf,
    _scratch: Option<TempDir>,
}

impl SessionDir {
    pub fn resolve(explicit: Option<PathBuf>) -> io::Result<Self> {
        if let Some(path) = explicit {
            return Ok(Self { path, _scratch: None });
        }
        let scratch = tempfile::Builder::new().prefix("portfolio-session-").tempdir()?;
        Ok(Self { path: scratch.path().to_path_buf(), _scratch: Some(scratch) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
