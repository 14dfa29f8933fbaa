//! Locating and loading stackwatch.toml.

use std::path::{Path, PathBuf};

use super::{Settings, parser};

/// File name looked up in the project and user config directories.
pub const SETTINGS_FILE_NAME: &str = "stackwatch.toml";

#[derive(Debug, Clone)]
pub struct SettingsStore {
    candidates: Vec<PathBuf>,
    explicit: bool,
}

impl SettingsStore {
    /// Look in the working directory, then the user config directory.
    pub fn from_default_paths() -> anyhow::Result<Self> {
        let project_root = std::env::current_dir()?;
        let global_dir = dirs::config_dir().map(|dir| dir.join("stackwatch"));
        Ok(Self::from_paths(project_root, global_dir))
    }

    pub fn from_paths(project_root: PathBuf, global_dir: Option<PathBuf>) -> Self {
        let mut candidates = vec![project_root.join(SETTINGS_FILE_NAME)];
        if let Some(dir) = global_dir {
            candidates.push(dir.join(SETTINGS_FILE_NAME));
        }
        Self {
            candidates,
            explicit: false,
        }
    }

    /// Use exactly this file. It must exist.
    pub fn from_file(path: PathBuf) -> Self {
        Self {
            candidates: vec![path],
            explicit: true,
        }
    }

    /// First settings file that exists, if any.
    pub fn settings_path(&self) -> Option<&Path> {
        self.candidates
            .iter()
            .find(|path| path.exists())
            .map(PathBuf::as_path)
    }

    pub fn load(&self) -> anyhow::Result<Settings> {
        match self.settings_path() {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading settings");
                parser::parse_settings_toml(path)
            }
            None if self.explicit => {
                let path = self.candidates.first().map(|p| p.display().to_string());
                anyhow::bail!(
                    "Settings file not found: {}",
                    path.unwrap_or_default()
                )
            }
            None => Ok(Settings::new()),
        }
    }
}
