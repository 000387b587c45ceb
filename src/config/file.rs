//! Configuration file loading
//!
//! Handles loading configuration from TOML files.

use crate::config::Config;
use crate::error::ConfigError;

use std::path::{Path, PathBuf};

/// Configuration file handler
pub struct ConfigFile;

impl ConfigFile {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound(path.display().to_string()))?;

        Self::parse(&content)
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Config, ConfigError> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Load the first readable config from the default locations
    ///
    /// A file that exists but fails to parse is reported and the next
    /// location tried.
    pub fn load_default() -> Option<Config> {
        for path in Self::default_paths() {
            if !path.exists() {
                continue;
            }
            match Self::load(&path) {
                Ok(config) => {
                    log::info!("Loaded config from {}", path.display());
                    return Some(config);
                }
                Err(e) => log::warn!("Ignoring {}: {}", path.display(), e),
            }
        }
        None
    }

    /// Get default configuration file paths, most general first
    pub fn default_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("/etc/axemon/config.toml")];

        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("axemon").join("config.toml"));
        }

        paths.push(PathBuf::from("axemon.toml"));
        paths.push(PathBuf::from(".axemon.toml"));

        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_paths_not_empty() {
        let paths = ConfigFile::default_paths();
        assert_eq!(paths[0], PathBuf::from("/etc/axemon/config.toml"));
        assert!(paths.contains(&PathBuf::from("axemon.toml")));
    }

    #[test]
    fn test_load_missing_file() {
        let result = ConfigFile::load("/nonexistent/path/config.toml");
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("axemon.toml");
        std::fs::write(
            &path,
            "[server]\nport = 8080\n[restart]\nenabled = false\n",
        )
        .unwrap();

        let config = ConfigFile::load(&path).unwrap();
        assert_eq!(config.server.port, 8080);
        assert!(!config.restart.enabled);
        assert_eq!(config.server.bind, "0.0.0.0");
    }

    #[test]
    fn test_invalid_toml() {
        let result = ConfigFile::parse("[server\nport = 1");
        assert!(matches!(result, Err(ConfigError::TomlError(_))));
    }
}
