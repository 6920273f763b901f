//! Identifier file holding the worker's process id
//!
//! On disk the file is plain text with a single integer, so shell tooling
//! (`kill $(cat worker.pid)`) keeps working. In code it is a typed
//! [`PidRecord`]; the creation time is taken from the file's mtime.

use chrono::{DateTime, Utc};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::errors::{SharedError, SharedResult};

/// Persisted identity of a daemonized worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PidRecord {
    pub pid: u32,
    pub created_at: Option<DateTime<Utc>>,
}

impl PidRecord {
    pub fn new(pid: u32) -> Self {
        Self {
            pid,
            created_at: Some(Utc::now()),
        }
    }
}

/// Narrow read/write/remove access to the identifier file
#[derive(Debug, Clone)]
pub struct PidFile {
    path: PathBuf,
}

impl PidFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the record; `Ok(None)` when no file exists
    pub async fn read(&self) -> SharedResult<Option<PidRecord>> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let pid = content
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|pid| *pid > 0)
            .ok_or_else(|| SharedError::MalformedPidFile {
                path: self.path.clone(),
                content: content.clone(),
            })?;

        let created_at = fs::metadata(&self.path)
            .await
            .and_then(|meta| meta.modified())
            .ok()
            .map(DateTime::<Utc>::from);

        Ok(Some(PidRecord { pid, created_at }))
    }

    /// Persist a record, replacing any previous one
    pub async fn write(&self, record: &PidRecord) -> SharedResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        fs::write(&self.path, format!("{}\n", record.pid)).await?;
        Ok(())
    }

    /// Remove the file; returns whether a file was actually removed
    pub async fn remove(&self) -> SharedResult<bool> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
