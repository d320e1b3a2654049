use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::ConfigError;
use crate::ingest::ReferenceLocation;

pub const DEFAULT_UPLOAD_FOLDER: &str = "uploads";
pub const DEFAULT_MAX_CONTENT_LENGTH: u64 = 16 * 1024 * 1024;
pub const DEFAULT_ID_COLUMN: &str = "product_id";

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct UploadConfig {
    pub folder: String,
    pub max_content_length: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            folder: DEFAULT_UPLOAD_FOLDER.into(),
            max_content_length: DEFAULT_MAX_CONTENT_LENGTH,
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct ReferenceConfig {
    pub checklist_url: Option<String>, // path or http(s) URL of the checklist CSV
    pub id_column: String,
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self {
            checklist_url: None,
            id_column: DEFAULT_ID_COLUMN.into(),
        }
    }
}

impl ReferenceConfig {
    /// The checklist location; required only by runs that load the checklist.
    pub fn location(&self) -> Result<ReferenceLocation, ConfigError> {
        match self.checklist_url.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => Ok(ReferenceLocation::parse(s)),
            _ => Err(ConfigError::MissingField {
                field: "CHECKLIST_URL",
            }),
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub upload: UploadConfig,
    #[serde(default)]
    pub reference: ReferenceConfig,
}

impl AppConfig {
    /// Build from environment-style key/values (`UPLOAD_FOLDER`, `MAX_CONTENT_LENGTH`, `CHECKLIST_URL`).
    /// Process environment wins over `env_map`; unset keys fall back to defaults.
    pub fn from_env_map(env_map: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let lookup = |key: &str| std::env::var(key).ok().or_else(|| env_map.get(key).cloned());
        let mut cfg = Self::default();
        if let Some(folder) = lookup("UPLOAD_FOLDER") {
            cfg.upload.folder = folder;
        }
        if let Some(raw) = lookup("MAX_CONTENT_LENGTH") {
            cfg.upload.max_content_length =
                raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                    field: "MAX_CONTENT_LENGTH",
                    reason: format!("'{}' is not a byte count", raw),
                })?;
        }
        cfg.reference.checklist_url = lookup("CHECKLIST_URL").filter(|s| !s.trim().is_empty());
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.upload.folder.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "upload.folder",
            });
        }
        if self.upload.max_content_length == 0 {
            return Err(ConfigError::InvalidValue {
                field: "upload.max_content_length",
                reason: "must be > 0".into(),
            });
        }
        if self.reference.id_column.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "reference.id_column",
            });
        }
        if let Some(url) = &self.reference.checklist_url {
            if let Some((scheme, _)) = url.trim().split_once("://") {
                let scheme = scheme.to_ascii_lowercase();
                if scheme != "http" && scheme != "https" {
                    return Err(ConfigError::InvalidValue {
                        field: "reference.checklist_url",
                        reason: format!("unsupported scheme: {}", scheme),
                    });
                }
            }
        }
        Ok(())
    }
}
