// Dependency registration for provisioned server jars

use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::constants;
use crate::error::{ProvisionError, Result};
use crate::version::VersionToken;

/// Maven coordinate of the remapped Spigot server artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyCoordinate {
    pub group: String,
    pub name: String,
    pub version: String,
    pub classifier: Option<String>,
}

impl DependencyCoordinate {
    pub fn spigot(token: &VersionToken) -> Self {
        Self {
            group: "org.spigotmc".to_string(),
            name: "spigot".to_string(),
            version: token.raw().to_string(),
            classifier: Some(constants::REMAPPED_CLASSIFIER.to_string()),
        }
    }
}

impl fmt::Display for DependencyCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.name, self.version)?;
        if let Some(classifier) = &self.classifier {
            write!(f, ":{}", classifier)?;
        }
        Ok(())
    }
}

/// Host-side hook that adds a resolved artifact to a named configuration.
///
/// Registration has no failure path; implementations absorb their own errors.
pub trait DependencyRegistrar {
    fn register(&mut self, coordinate: &str, configuration: &str, artifact: &Path);
}

impl<F> DependencyRegistrar for F
where
    F: FnMut(&str, &str, &Path),
{
    fn register(&mut self, coordinate: &str, configuration: &str, artifact: &Path) {
        self(coordinate, configuration, artifact)
    }
}

/// Lockfile recording which artifact each configuration resolved to
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RegistrationLock {
    #[serde(default)]
    pub dependency: Vec<LockedDependency>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockedDependency {
    pub configuration: String,
    pub coordinate: String,
    pub file: String,
}

impl RegistrationLock {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| ProvisionError::io(path, e))?;
        toml::from_str(&text).map_err(|e| ProvisionError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent()
            && !dir.as_os_str().is_empty()
        {
            std::fs::create_dir_all(dir).map_err(|e| ProvisionError::io(dir, e))?;
        }
        let text = toml::to_string_pretty(self).map_err(|e| ProvisionError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        std::fs::write(path, text).map_err(|e| ProvisionError::io(path, e))
    }

    /// Insert or replace the entry for the dependency's configuration
    pub fn upsert(&mut self, dependency: LockedDependency) {
        self.dependency
            .retain(|d| d.configuration != dependency.configuration);
        self.dependency.push(dependency);
        self.sort_by_configuration();
    }

    pub fn sort_by_configuration(&mut self) {
        self.dependency
            .sort_by(|a, b| a.configuration.cmp(&b.configuration));
    }
}

/// Registrar that persists registrations into `provision.lock`
pub struct LockfileRegistrar {
    path: PathBuf,
    errors: Vec<ProvisionError>,
}

impl LockfileRegistrar {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            errors: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Errors absorbed while writing the lockfile
    pub fn errors(&self) -> &[ProvisionError] {
        &self.errors
    }

    fn record(&self, dependency: LockedDependency) -> Result<()> {
        let mut lock = if self.path.exists() {
            RegistrationLock::load(&self.path)?
        } else {
            RegistrationLock::default()
        };
        lock.upsert(dependency);
        lock.save(&self.path)
    }
}

impl DependencyRegistrar for LockfileRegistrar {
    fn register(&mut self, coordinate: &str, configuration: &str, artifact: &Path) {
        let dependency = LockedDependency {
            configuration: configuration.to_string(),
            coordinate: coordinate.to_string(),
            file: artifact.display().to_string(),
        };

        match self.record(dependency) {
            Ok(()) => debug!(
                "Registered {} for configuration '{}' in {}",
                coordinate,
                configuration,
                self.path.display()
            ),
            Err(e) => {
                log::warn!("Could not record registration of {}: {}", coordinate, e);
                self.errors.push(e);
            }
        }
    }
}
