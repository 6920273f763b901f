//! Worker log inspection
//!
//! Reads only the trailing [`LOG_TAIL_LINES`] lines by seeking backwards from
//! the end of the file in fixed-size chunks, so the cost stays bounded no
//! matter how large the log grows.

use async_trait::async_trait;
use std::io::{ErrorKind, SeekFrom};
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use shared::{component_warn, ComponentId};

use crate::traits::LogInspector;
use crate::types::{LogSnapshot, LOG_TAIL_LINES, MAX_RECENT_ERRORS};

/// Keywords marking a line as an error (matched case-insensitively)
pub const ERROR_KEYWORDS: [&str; 3] = ["error", "exception", "failed"];

const CHUNK_SIZE: u64 = 8 * 1024;

/// Upper bound on bytes read from the end of the file
const MAX_TAIL_BYTES: u64 = 4 * 1024 * 1024;

/// Inspector reading log files from disk
#[derive(Debug, Clone)]
pub struct FileLogInspector {
    tail_lines: usize,
}

impl FileLogInspector {
    pub fn new() -> Self {
        Self {
            tail_lines: LOG_TAIL_LINES,
        }
    }

    /// Whether a line mentions one of the error keywords
    pub fn is_error_line(line: &str) -> bool {
        let lower = line.to_lowercase();
        ERROR_KEYWORDS.iter().any(|keyword| lower.contains(keyword))
    }

    /// Last `count` error lines of `lines`, in their original order
    pub fn recent_errors(lines: &[String], count: usize) -> Vec<String> {
        let matches: Vec<&String> = lines.iter().filter(|line| Self::is_error_line(line)).collect();
        let skip = matches.len().saturating_sub(count);
        matches.into_iter().skip(skip).cloned().collect()
    }

    /// Read the last `count` lines of `file` without reading the whole file
    pub async fn read_tail(file: &mut File, len: u64, count: usize) -> std::io::Result<Vec<String>> {
        if count == 0 || len == 0 {
            return Ok(Vec::new());
        }

        let mut buf: Vec<u8> = Vec::new();
        let mut pos = len;

        // `count` newlines before the final line guarantee `count` complete
        // lines; a trailing newline terminates the last line and does not count.
        loop {
            let read_size = CHUNK_SIZE.min(pos);
            pos -= read_size;

            let mut chunk = vec![0u8; read_size as usize];
            file.seek(SeekFrom::Start(pos)).await?;
            file.read_exact(&mut chunk).await?;
            chunk.extend_from_slice(&buf);
            buf = chunk;

            let content = buf.strip_suffix(b"\n").unwrap_or(&buf);
            let newlines = content.iter().filter(|b| **b == b'\n').count();
            if pos == 0 || newlines >= count || len - pos >= MAX_TAIL_BYTES {
                break;
            }
        }

        let text = String::from_utf8_lossy(&buf);
        let lines: Vec<String> = text
            .lines()
            .map(|line| line.trim_end_matches('\r').to_string())
            .collect();

        // When we stopped mid-file the first line may be partial
        let complete = if pos > 0 { &lines[1.min(lines.len())..] } else { &lines[..] };
        let skip = complete.len().saturating_sub(count);
        Ok(complete[skip..].to_vec())
    }
}

impl Default for FileLogInspector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LogInspector for FileLogInspector {
    async fn inspect(&self, path: &Path) -> LogSnapshot {
        let mut file = match File::open(path).await {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return LogSnapshot::missing(),
            Err(e) => {
                component_warn!(ComponentId::current(), "⚠️ Cannot open log {}: {}", path.display(), e);
                return LogSnapshot {
                    exists: path.exists(),
                    ..LogSnapshot::default()
                };
            }
        };

        let size = match file.metadata().await {
            Ok(meta) => meta.len(),
            Err(e) => {
                component_warn!(ComponentId::current(), "⚠️ Cannot stat log {}: {}", path.display(), e);
                return LogSnapshot {
                    exists: true,
                    ..LogSnapshot::default()
                };
            }
        };

        let lines = match Self::read_tail(&mut file, size, self.tail_lines).await {
            Ok(lines) => lines,
            Err(e) => {
                component_warn!(ComponentId::current(), "⚠️ Cannot read log {}: {}", path.display(), e);
                Vec::new()
            }
        };

        LogSnapshot {
            exists: true,
            size_bytes: Some(size),
            recent_errors: Self::recent_errors(&lines, MAX_RECENT_ERRORS),
            last_line: lines.last().cloned(),
        }
    }
}
