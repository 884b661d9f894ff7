// Config module for provisioning settings and shared path utilities

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants;
use crate::download::ChecksumVerifier;
use crate::error::{ProvisionError, Result};

pub const DIR_ENV: &str = "SPIGOT_PROVISION_DIR";
pub const CACHE_ENV: &str = "SPIGOT_CACHE_DIR";

pub fn config_dir() -> PathBuf {
    PathBuf::from(std::env::var(DIR_ENV).unwrap_or_else(|_| ".".to_string()))
}

pub fn config_path(dir: &Path) -> PathBuf {
    dir.join(constants::CONFIG_FILE)
}

pub fn lockfile_path(dir: &Path) -> PathBuf {
    dir.join(constants::LOCKFILE_FILE)
}

/// Settings read from `provision.toml`; every field has a default
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProvisionConfig {
    /// Cache root; relative paths are taken from the config directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<PathBuf>,
    pub repository: String,
    pub max_concurrency: usize,
    /// Unpack the server jar out of the bundler jar after downloading
    pub extract_bundle: bool,
    /// Check the download against `checksum`
    pub verify_checksum: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
    pub configuration: String,
}

impl Default for ProvisionConfig {
    fn default() -> Self {
        Self {
            cache_dir: None,
            repository: constants::DEFAULT_REPOSITORY.to_string(),
            max_concurrency: constants::DEFAULT_MAX_CONCURRENCY,
            extract_bundle: false,
            // Upstream hashes currently mismatch the served jars
            verify_checksum: false,
            checksum: None,
            configuration: constants::DEFAULT_CONFIGURATION.to_string(),
        }
    }
}

impl ProvisionConfig {
    /// Load `provision.toml` from `dir`, falling back to defaults when absent
    pub fn load(dir: &Path) -> Result<Self> {
        let path = config_path(dir);
        if !path.exists() {
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(&path).map_err(|e| ProvisionError::io(&path, e))?;
        let config: Self = toml::from_str(&text).map_err(|e| ProvisionError::Config {
            path: path.clone(),
            message: e.to_string(),
        })?;
        config.validate(&path)?;
        Ok(config)
    }

    pub fn save(&self, dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir).map_err(|e| ProvisionError::io(dir, e))?;
        let path = config_path(dir);
        let text = toml::to_string_pretty(self).map_err(|e| ProvisionError::Config {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, text).map_err(|e| ProvisionError::io(&path, e))
    }

    fn validate(&self, path: &Path) -> Result<()> {
        let invalid = |message: String| ProvisionError::Config {
            path: path.to_path_buf(),
            message,
        };

        if self.max_concurrency == 0 {
            return Err(invalid("max_concurrency must be at least 1".to_string()));
        }
        if !self.repository.starts_with("http://") && !self.repository.starts_with("https://") {
            return Err(invalid(format!(
                "repository '{}' must be an http(s) URL",
                self.repository
            )));
        }
        if self.configuration.is_empty() {
            return Err(invalid("configuration cannot be empty".to_string()));
        }
        match &self.checksum {
            Some(checksum) => {
                ChecksumVerifier::parse(checksum).map_err(invalid)?;
            }
            None if self.verify_checksum => {
                return Err(invalid(
                    "verify_checksum = true requires a checksum".to_string(),
                ));
            }
            None => {}
        }
        Ok(())
    }

    /// Cache root: `SPIGOT_CACHE_DIR`, then `cache_dir`, then `<dir>/.cache`
    pub fn cache_root(&self, dir: &Path) -> PathBuf {
        if let Ok(env_dir) = std::env::var(CACHE_ENV)
            && !env_dir.is_empty()
        {
            return PathBuf::from(env_dir);
        }

        match &self.cache_dir {
            Some(cache) if cache.is_absolute() => cache.clone(),
            Some(cache) => dir.join(cache),
            None => dir.join(constants::DEFAULT_CACHE_DIR),
        }
    }

    /// The verifier to attach to downloads, if verification is switched on
    pub fn verifier(&self) -> Option<ChecksumVerifier> {
        if !self.verify_checksum {
            return None;
        }
        self.checksum
            .as_deref()
            .and_then(|c| ChecksumVerifier::parse(c).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let config = ProvisionConfig::load(temp.path()).unwrap();
        assert_eq!(config, ProvisionConfig::default());
        assert_eq!(config.max_concurrency, 2);
        assert!(!config.extract_bundle);
        assert!(!config.verify_checksum);
        assert_eq!(config.configuration, "named");
    }

    #[test]
    fn test_save_then_load() {
        let temp = TempDir::new().unwrap();
        let config = ProvisionConfig {
            cache_dir: Some(PathBuf::from("cache")),
            extract_bundle: true,
            ..Default::default()
        };
        config.save(temp.path()).unwrap();

        let loaded = ProvisionConfig::load(temp.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp = TempDir::new().unwrap();
        std::fs::write(config_path(temp.path()), "max_concurrency = 4\n").unwrap();

        let config = ProvisionConfig::load(temp.path()).unwrap();
        assert_eq!(config.max_concurrency, 4);
        assert_eq!(config.repository, constants::DEFAULT_REPOSITORY);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let temp = TempDir::new().unwrap();
        for body in [
            "max_concurrency = 0\n",
            "repository = \"ftp://example.com\"\n",
            "checksum = \"md5:abc\"\n",
            "verify_checksum = true\n",
            "unknown_key = true\n",
        ] {
            std::fs::write(config_path(temp.path()), body).unwrap();
            let err = ProvisionConfig::load(temp.path()).unwrap_err();
            assert!(
                matches!(err, ProvisionError::Config { .. }),
                "expected Config error for {:?}, got {:?}",
                body,
                err
            );
        }
    }

    #[test]
    fn test_verify_without_checksum_names_the_problem() {
        let temp = TempDir::new().unwrap();
        std::fs::write(config_path(temp.path()), "verify_checksum = true\n").unwrap();

        let err = ProvisionConfig::load(temp.path()).unwrap_err();
        assert!(err.to_string().contains("requires a checksum"), "got {}", err);
    }

    #[test]
    fn test_verifier_only_when_enabled() {
        let mut config = ProvisionConfig {
            checksum: Some("sha256:abcd".to_string()),
            ..Default::default()
        };
        assert!(config.verifier().is_none());

        config.verify_checksum = true;
        assert!(config.verifier().is_some());
    }

    #[test]
    fn test_relative_cache_dir_is_under_config_dir() {
        let config = ProvisionConfig {
            cache_dir: Some(PathBuf::from("cache")),
            ..Default::default()
        };
        if std::env::var(CACHE_ENV).is_err() {
            assert_eq!(
                config.cache_root(Path::new("/srv/build")),
                PathBuf::from("/srv/build/cache")
            );
        }
    }
}
