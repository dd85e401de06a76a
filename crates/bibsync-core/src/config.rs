//! Configuration for a sync run
//!
//! Credentials come from the environment; paths and client tuning have
//! defaults that the command line can override.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Environment variable holding the Notion integration token
pub const TOKEN_VAR: &str = "NOTION_TOKEN";

/// Environment variable holding the target database id
pub const DATABASE_VAR: &str = "DATABASE_IDENTIFIER";

pub const DEFAULT_BIB_PATH: &str = "references.bib";
pub const DEFAULT_SNAPSHOT_PATH: &str = "archive.bin";
pub const DEFAULT_API_BASE: &str = "https://api.notion.com/v1";
pub const DEFAULT_NOTION_VERSION: &str = "2022-06-28";

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// BibTeX file to read
    pub bib_path: PathBuf,
    /// Snapshot of the last synced field values
    pub snapshot_path: PathBuf,
    /// Remote client settings
    pub notion: NotionConfig,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            bib_path: PathBuf::from(DEFAULT_BIB_PATH),
            snapshot_path: PathBuf::from(DEFAULT_SNAPSHOT_PATH),
            notion: NotionConfig::default(),
        }
    }
}

impl SyncConfig {
    /// Build a configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration using `lookup` to resolve variables
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = required(&lookup, TOKEN_VAR)?;
        let database_id = required(&lookup, DATABASE_VAR)?;

        Ok(Self {
            notion: NotionConfig {
                token,
                database_id,
                ..NotionConfig::default()
            },
            ..Self::default()
        })
    }
}

fn required<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or(ConfigError::MissingVar(key))
}

/// Settings for the Notion client
#[derive(Clone, Serialize, Deserialize)]
pub struct NotionConfig {
    /// Bearer token
    #[serde(skip_serializing, default)]
    pub token: String,
    /// Target database
    pub database_id: String,
    /// API root, without trailing slash
    pub api_base: String,
    /// Value of the `Notion-Version` header
    pub notion_version: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for NotionConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            database_id: String::new(),
            api_base: DEFAULT_API_BASE.to_string(),
            notion_version: DEFAULT_NOTION_VERSION.to_string(),
            timeout_secs: 30,
        }
    }
}

// Keep the token out of logs.
impl std::fmt::Debug for NotionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotionConfig")
            .field("token", &"<redacted>")
            .field("database_id", &self.database_id)
            .field("api_base", &self.api_base)
            .field("notion_version", &self.notion_version)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
