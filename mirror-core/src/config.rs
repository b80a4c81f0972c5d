//! Install-type step configuration.
//!
//! Loaded from a TOML file. The camelCase keys used by older installer
//! configurations are accepted as aliases.

use crate::errors::ConfigError;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_MIRRORLIST_DIR: &str = "/etc/pacman.d";
pub const DEFAULT_MIRRORLIST_FILE: &str = "mirrorlist";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InstallTypeConfig {
    /// Mirror-list document offered to the user.
    #[serde(alias = "mirrorListSourcePath")]
    pub mirror_list_source_path: PathBuf,

    /// Initial value of the "update mirror list on target" flag.
    #[serde(alias = "updateMirrorList")]
    pub update_mirror_list: bool,

    /// Directory of the mirror list on the target system.
    #[serde(alias = "mirrorlistDir")]
    pub mirrorlist_dir: PathBuf,

    #[serde(alias = "mirrorlistFile")]
    pub mirrorlist_file: String,
}

impl Default for InstallTypeConfig {
    fn default() -> Self {
        Self {
            mirror_list_source_path: Path::new(DEFAULT_MIRRORLIST_DIR).join(DEFAULT_MIRRORLIST_FILE),
            update_mirror_list: false,
            mirrorlist_dir: PathBuf::from(DEFAULT_MIRRORLIST_DIR),
            mirrorlist_file: DEFAULT_MIRRORLIST_FILE.to_string(),
        }
    }
}

impl InstallTypeConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(content).context("Failed to parse install-type config")?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.mirror_list_source_path.as_os_str().is_empty() {
            return Err(ConfigError::EmptySourcePath);
        }
        if self.mirrorlist_file.is_empty() {
            return Err(ConfigError::EmptyFileName);
        }
        if self.mirrorlist_file.contains('/') {
            return Err(ConfigError::FileNameHasSeparator(
                self.mirrorlist_file.clone(),
            ));
        }
        Ok(())
    }

    /// Target mirror-list directory resolved under `root`.
    ///
    /// The configured directory is absolute on the target system, so its
    /// leading `/` is dropped before joining.
    pub fn target_dir_under(&self, root: &Path) -> PathBuf {
        let relative = self
            .mirrorlist_dir
            .strip_prefix("/")
            .unwrap_or(&self.mirrorlist_dir);
        root.join(relative)
    }
}
