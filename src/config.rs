use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, error, info};
use serde::{Deserialize, Serialize};

use crate::{validate_date_format, DiaryError, Result, DEFAULT_DATE_FORMAT, DEFAULT_EXPORT_FILE};

const CONFIG_FILE: &str = "config.json";

/// Application configuration settings.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Directory holding the stored notes and display flag
    pub data_dir: PathBuf,

    /// Where `export` writes when no output path is given
    pub export_file: PathBuf,

    /// chrono format string for note creation dates
    pub date_format: String,

    /// Report empty-text and unknown-id rejections instead of ignoring them
    pub strict_validation: bool,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = project_dirs()
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from(".diarynotes"));

        Self {
            data_dir,
            export_file: PathBuf::from(DEFAULT_EXPORT_FILE),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            strict_validation: false,
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "diarynotes")
}

impl Config {
    /// Platform config file location, e.g. `~/.config/diarynotes/config.json`
    pub fn default_path() -> Result<PathBuf> {
        project_dirs()
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
            .ok_or_else(|| DiaryError::ConfigError {
                message: "Could not determine a home directory for the config file".to_string(),
            })
    }

    /// Loads the config at `path`; a missing file gives the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&raw).map_err(|e| {
            error!("Malformed config {}: {}", path.display(), e);
            DiaryError::ConfigError {
                message: format!("{}: {}", path.display(), e),
            }
        })?;
        config.validate()?;

        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|_| DiaryError::DirectoryError {
                    path: parent.to_path_buf(),
                })?;
            }
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        info!("Saved config to {}", path.display());
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        validate_date_format(&self.date_format)
    }
}
