//! Configuration file
//!
//! ```toml
//! [render]
//! title = "SPARK Process Checklist"
//!
//! [[obligations]]
//! category = "assumption"
//! relation = "traces"
//! ```

use cpt_render::RenderConfig;
use cpt_trace::Obligation;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors reading the configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("cannot read configuration {path}: {source}")]
    Io {
        /// Configuration path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// File is not valid configuration
    #[error("invalid configuration {path}: {source}")]
    Parse {
        /// Configuration path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: toml::de::Error,
    },
}

/// Whole configuration of an invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HandbookConfig {
    /// Rendering settings
    pub render: RenderConfig,
    /// Completeness obligations checked on every run
    pub obligations: Vec<Obligation>,
}

impl Default for HandbookConfig {
    fn default() -> Self {
        Self {
            render: RenderConfig::default(),
            obligations: vec![Obligation::default()],
        }
    }
}

impl HandbookConfig {
    /// Read a TOML configuration file
    ///
    /// # Errors
    /// Fails if the file cannot be read or holds unknown keys.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), "configuration loaded");
        Ok(config)
    }
}
