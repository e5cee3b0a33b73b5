//! Configuration file loading

use super::schema::AppShellConfig;
use crate::error::{Error, Result, ResultExt};
use std::path::{Path, PathBuf};

/// File names probed, in order, when no explicit path is given
pub const CONFIG_CANDIDATES: [&str; 3] = ["appshell.toml", ".appshell.toml", ".config/appshell.toml"];

/// Configuration wrapper
#[derive(Debug, Clone)]
pub struct Config {
    /// Parsed schema, or defaults
    pub schema: AppShellConfig,
    /// File the schema was read from, if any
    pub path: Option<PathBuf>,
    /// Root that relative artifact paths are resolved against
    pub project_dir: PathBuf,
}

impl Config {
    /// Load configuration from an explicit path, a discovered file, or defaults
    ///
    /// An explicit path that does not exist is an error; a project without
    /// any config file falls back to defaults.
    pub fn load(path: Option<&Path>, project_dir: &Path) -> Result<Self> {
        let config_path = match path {
            Some(p) => {
                let p = if p.is_relative() { project_dir.join(p) } else { p.to_path_buf() };
                if !p.is_file() {
                    return Err(Error::config_not_found(&p));
                }
                Some(p)
            }
            None => find_config_file(project_dir),
        };

        let schema = match &config_path {
            Some(p) => load_config_file(p)?,
            None => {
                tracing::debug!(project_dir = %project_dir.display(), "No config file found, using defaults");
                AppShellConfig::default()
            }
        };

        Ok(Self {
            schema,
            path: config_path,
            project_dir: project_dir.to_path_buf(),
        })
    }

    /// Defaults only (no file)
    #[must_use]
    pub fn with_defaults(project_dir: &Path) -> Self {
        Self {
            schema: AppShellConfig::default(),
            path: None,
            project_dir: project_dir.to_path_buf(),
        }
    }

    /// Resolve a configured path against the project directory
    #[must_use]
    pub fn resolve(&self, relative: &Path) -> PathBuf {
        if relative.is_absolute() {
            relative.to_path_buf()
        } else {
            self.project_dir.join(relative)
        }
    }

    /// Write the default configuration to `path`
    pub fn write_default(path: &Path, force: bool) -> Result<()> {
        if path.exists() && !force {
            return Err(Error::file_exists(path));
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, AppShellConfig::default().to_toml()?)?;
        Ok(())
    }
}

/// Find a configuration file in the standard locations under `project_dir`
#[must_use]
pub fn find_config_file(project_dir: &Path) -> Option<PathBuf> {
    CONFIG_CANDIDATES
        .iter()
        .map(|candidate| project_dir.join(candidate))
        .find(|candidate| candidate.is_file())
}

fn load_config_file(path: &Path) -> Result<AppShellConfig> {
    tracing::debug!(path = %path.display(), "Loading config file");

    let content = std::fs::read_to_string(path)
        .map_err(Error::from)
        .context(format!("Failed to read config file {}", path.display()))?;

    AppShellConfig::from_toml(&content)
        .context(format!("In config file {}", path.display()))
        .with_suggestion("Fix the file, or regenerate it with `appshell-android init --force`")
}
