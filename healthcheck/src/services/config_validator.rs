//! `.env` completeness validation

use async_trait::async_trait;
use std::path::Path;
use shared::{component_warn, ComponentId, EnvFile, RequiredField};

use crate::traits::ConfigValidator;
use crate::types::{ConfigStatus, FieldStatus};

/// Validator reading the worker's `.env` from disk
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvFileValidator;

impl EnvFileValidator {
    pub fn new() -> Self {
        Self
    }

    /// Status of every required field in a loaded file
    pub fn status_of(env: &EnvFile) -> ConfigStatus {
        ConfigStatus {
            present: true,
            fields: RequiredField::ALL
                .iter()
                .map(|field| {
                    let status = FieldStatus {
                        configured: env.is_configured(*field),
                    };
                    (*field, status)
                })
                .collect(),
        }
    }
}

#[async_trait]
impl ConfigValidator for EnvFileValidator {
    async fn validate(&self, path: &Path) -> ConfigStatus {
        match EnvFile::load(path).await {
            Ok(Some(env)) => Self::status_of(&env),
            Ok(None) => ConfigStatus::absent(),
            Err(e) => {
                // Exists but unreadable: report present, nothing configured
                component_warn!(ComponentId::current(), "⚠️ Cannot read {}: {}", path.display(), e);
                ConfigStatus {
                    present: true,
                    ..ConfigStatus::absent()
                }
            }
        }
    }
}
