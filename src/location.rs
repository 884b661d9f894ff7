// Location module for deriving download URLs and cache paths

use std::ffi::OsStr;
use std::fs;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;

use crate::constants;
use crate::error::{ProvisionError, Result};
use crate::version::VersionToken;

/// Where a version's server jar comes from and where it lands on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedLocation {
    pub remote_url: String,
    pub working_dir: PathBuf,
    pub bundled_jar: PathBuf,
    pub extracted_jar: PathBuf,
}

impl ResolvedLocation {
    /// Resolve against the default CodeMC repository.
    pub fn resolve(token: &VersionToken, cache_root: &Path) -> Result<Self> {
        Self::resolve_with_repository(token, cache_root, constants::DEFAULT_REPOSITORY)
    }

    /// Resolve the URL and paths for `token`, creating the working directory.
    ///
    /// The working directory is `<cache_root>/spigot/<raw version>`; creation is
    /// idempotent. The cache root itself must already exist, and the raw version
    /// must be a single plain path component.
    pub fn resolve_with_repository(
        token: &VersionToken,
        cache_root: &Path,
        repository: &str,
    ) -> Result<Self> {
        if !is_single_component(token.raw()) {
            return Err(ProvisionError::UnsafeVersionPath {
                raw: token.raw().to_string(),
            });
        }

        let location = Self::compute(token, cache_root, repository);

        if !cache_root.is_dir() {
            return Err(ProvisionError::io(
                cache_root,
                std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "cache root does not exist",
                ),
            ));
        }

        fs::create_dir_all(&location.working_dir)
            .map_err(|e| ProvisionError::io(&location.working_dir, e))?;

        Ok(location)
    }

    /// Pure computation of the location, without touching the filesystem
    pub fn compute(token: &VersionToken, cache_root: &Path, repository: &str) -> Self {
        let working_dir = working_dir(cache_root, token);

        Self {
            remote_url: remote_url(repository, token),
            bundled_jar: working_dir.join(constants::BUNDLED_SERVER_JAR),
            extracted_jar: working_dir.join(constants::EXTRACTED_SERVER_JAR),
            working_dir,
        }
    }
}

/// True when `raw` names exactly one normal path component and nothing else.
///
/// Rejects absolute paths, `.`/`..`, separators and trailing separators, which
/// `Path::components` would otherwise normalize away.
fn is_single_component(raw: &str) -> bool {
    let mut components = Path::new(raw).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(name)), None) => name == OsStr::new(raw),
        _ => false,
    }
}

/// Per-version cache directory, keyed by the raw version string
pub fn working_dir(cache_root: &Path, token: &VersionToken) -> PathBuf {
    cache_root
        .join(constants::SPIGOT_CACHE_SUBDIR)
        .join(token.raw())
}

/// Build the artifact URL:
/// `<repository>/org/spigotmc/spigot/<snapshot>/spigot-<raw>-remapped-mojang.jar`
pub fn remote_url(repository: &str, token: &VersionToken) -> String {
    format!(
        "{}/{}/{}/spigot-{}-{}.jar",
        repository.trim_end_matches('/'),
        constants::SPIGOT_GROUP_PATH,
        token.snapshot_version(),
        token.raw(),
        constants::REMAPPED_CLASSIFIER
    )
}
