//! Worker `.env` configuration file
//!
//! The worker reads its settings from a line-oriented `KEY=VALUE` file. The
//! template shipped with the worker contains example values (placeholder
//! tokens); a file that still contains one of them was never filled in.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::errors::{SharedError, SharedResult};

/// Settings the worker cannot run without
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequiredField {
    CoordinatorWsUrl,
    ApiKey,
    SolanaPrivateKey,
}

impl RequiredField {
    pub const ALL: [RequiredField; 3] = [
        RequiredField::CoordinatorWsUrl,
        RequiredField::ApiKey,
        RequiredField::SolanaPrivateKey,
    ];

    /// Environment key of the field
    pub fn key(&self) -> &'static str {
        match self {
            RequiredField::CoordinatorWsUrl => "COORDINATOR_WS_URL",
            RequiredField::ApiKey => "API_KEY",
            RequiredField::SolanaPrivateKey => "SOLANA_PRIVATE_KEY",
        }
    }

    /// Example token shipped in the template for this field
    pub fn placeholder(&self) -> &'static str {
        match self {
            RequiredField::CoordinatorWsUrl => "your-coordinator",
            RequiredField::ApiKey => "your-api-key",
            RequiredField::SolanaPrivateKey => "your-solana-private-key",
        }
    }
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Split a raw `KEY=VALUE` line, honouring an optional `export ` prefix
fn assignment(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if line.starts_with('#') {
        return None;
    }
    let line = line.strip_prefix("export ").map(str::trim_start).unwrap_or(line);
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key, value.trim()))
}

/// Parsed view of a worker `.env` file
#[derive(Debug, Clone)]
pub struct EnvFile {
    path: PathBuf,
    raw: String,
    entries: BTreeMap<String, String>,
}

impl EnvFile {
    /// Load and parse the file; `Ok(None)` when it does not exist
    ///
    /// Lines the parser rejects are skipped for [`EnvFile::get`] but still
    /// count as present keys for [`EnvFile::is_configured`].
    pub async fn load(path: impl AsRef<Path>) -> SharedResult<Option<EnvFile>> {
        let path = path.as_ref();
        let raw = match tokio::fs::read_to_string(path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let entries = dotenvy::from_path_iter(path)
            .map_err(|e| SharedError::EnvFileError {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
            .filter_map(Result::ok)
            .collect();

        Ok(Some(EnvFile {
            path: path.to_path_buf(),
            raw,
            entries,
        }))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Raw text after `=` on the last line assigning `key`
    fn raw_value(&self, key: &str) -> Option<&str> {
        self.raw
            .lines()
            .filter_map(assignment)
            .filter(|(k, _)| *k == key)
            .map(|(_, value)| value)
            .last()
    }

    /// Whether the file still contains the field's template token anywhere
    pub fn contains_placeholder(&self, field: RequiredField) -> bool {
        self.raw.contains(field.placeholder())
    }

    /// Key line present with a non-empty value and no placeholder left in the file
    pub fn is_configured(&self, field: RequiredField) -> bool {
        let has_value = self.raw_value(field.key()).is_some_and(|value| {
            !value
                .trim_matches(|c: char| c == '"' || c == '\'')
                .trim()
                .is_empty()
        });
        has_value && !self.contains_placeholder(field)
    }
}
