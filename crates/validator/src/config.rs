//! Settings loading and vault path resolution.
//!
//! Settings are persisted as a JSON file in the vault (the same shape the
//! validator's predecessors stored), with camelCase keys:
//!
//! ```json
//! {
//!   "templates": [
//!     { "name": "Book", "templatePath": "templates/Book.md", "targetFolder": "books" }
//!   ],
//!   "attachments": {
//!     "sourceFolder": "resources",
//!     "destFolder": "resources/notes",
//!     "templatePath": "templates/Resource.md",
//!     "extension": "pdf"
//!   }
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Default settings file name, relative to the vault root.
pub const DEFAULT_SETTINGS_FILE: &str = ".vault-validator.json";

/// Environment variable naming the vault root when no flag is given.
pub const VAULT_PATH_ENV: &str = "VAULT_PATH";

/// One template/folder pair for metadata reconciliation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TemplateConfig {
    /// Display name used for selection and log messages
    pub name: String,
    /// Vault-relative path to the template document
    pub template_path: String,
    /// Vault-relative folder whose documents are reconciled
    pub target_folder: String,
}

impl TemplateConfig {
    /// Both paths must be set before the pair can run.
    pub fn is_configured(&self) -> bool {
        !self.template_path.is_empty() && !self.target_folder.is_empty()
    }
}

/// Attachment synchronization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AttachmentSettings {
    /// Vault-relative folder holding attachment files
    pub source_folder: String,
    /// Vault-relative folder holding wrapper documents
    pub dest_folder: String,
    /// Vault-relative path to the wrapper template document
    pub template_path: String,
    /// Attachment file extension, without the dot
    pub extension: String,
}

impl Default for AttachmentSettings {
    fn default() -> Self {
        Self {
            source_folder: String::new(),
            dest_folder: String::new(),
            template_path: String::new(),
            extension: "pdf".to_string(),
        }
    }
}

impl AttachmentSettings {
    /// All three paths must be set before synchronization can run.
    pub fn is_configured(&self) -> bool {
        !self.source_folder.is_empty()
            && !self.dest_folder.is_empty()
            && !self.template_path.is_empty()
    }
}

/// Persisted validator settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub templates: Vec<TemplateConfig>,
    pub attachments: AttachmentSettings,
}

impl Settings {
    /// Load settings from a JSON file.
    ///
    /// A missing file yields the defaults (no template pairs, attachments
    /// unconfigured), matching first-run behavior.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Resolve the vault root from a CLI flag or the environment.
pub fn resolve_vault_path(flag: Option<&str>) -> Result<PathBuf, ConfigError> {
    let raw = match flag {
        Some(value) => value.to_string(),
        None => std::env::var(VAULT_PATH_ENV).map_err(|_| ConfigError::MissingVaultPath)?,
    };
    Ok(expand_tilde(&raw))
}

/// Expand ~ or ~/ prefix to the user's home directory.
fn expand_tilde(path: &str) -> PathBuf {
    if path == "~" {
        dirs::home_dir().unwrap_or_else(|| PathBuf::from("~"))
    } else if let Some(rest) = path.strip_prefix("~/") {
        dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(path))
    } else {
        PathBuf::from(path)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no vault path given (pass --vault or set {})", VAULT_PATH_ENV)]
    MissingVaultPath,
    #[error("failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
