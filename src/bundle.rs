// Bundle module for Minecraft server bundler jars
//
// A bundler jar carries the real server jar(s) under META-INF/versions/ and
// lists them in META-INF/versions.list, one `<sha256>\t<id>\t<path>` per line.

use log::{debug, info};
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;

use crate::error::{ProvisionError, Result};

const VERSIONS_LIST: &str = "META-INF/versions.list";
const LIBRARIES_LIST: &str = "META-INF/libraries.list";
const MAIN_CLASS: &str = "META-INF/main-class";
const VERSIONS_DIR: &str = "META-INF/versions";

/// One line of a bundler list file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleEntry {
    pub hash: String,
    pub id: String,
    pub path: String,
}

/// Parsed manifest of a bundler jar
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BundleMetadata {
    pub versions: Vec<BundleEntry>,
    pub libraries: Vec<BundleEntry>,
    pub main_class: Option<String>,
}

impl BundleEntry {
    /// Archive path of a `versions.list` entry's nested jar
    pub fn version_path(&self) -> String {
        format!("{}/{}", VERSIONS_DIR, self.path)
    }

    /// Copy the nested server jar out of `jar` into `dest`, replacing any existing file
    pub fn unpack_version(&self, jar: &Path, dest: &Path) -> Result<()> {
        let file = File::open(jar).map_err(|e| ProvisionError::io(jar, e))?;
        let mut archive =
            zip::ZipArchive::new(file).map_err(|e| ProvisionError::archive(jar, e))?;

        let entry_path = self.version_path();
        let mut entry = match archive.by_name(&entry_path) {
            Ok(entry) => entry,
            Err(zip::result::ZipError::FileNotFound) => {
                return Err(ProvisionError::BundleEntryNotFound { path: entry_path });
            }
            Err(e) => return Err(ProvisionError::archive(jar, e)),
        };

        let mut out = File::create(dest).map_err(|e| ProvisionError::io(dest, e))?;
        let written = io::copy(&mut entry, &mut out).map_err(|e| ProvisionError::io(dest, e))?;

        debug!("Unpacked {} ({} bytes) to {}", entry_path, written, dest.display());
        Ok(())
    }
}

impl BundleMetadata {
    /// Read bundle metadata from a jar.
    ///
    /// Returns `None` when the jar has no `META-INF/versions.list`, i.e. it is
    /// a plain server jar rather than a bundler.
    pub fn from_jar(jar: &Path) -> Result<Option<Self>> {
        let file = File::open(jar).map_err(|e| ProvisionError::io(jar, e))?;
        let mut archive =
            zip::ZipArchive::new(file).map_err(|e| ProvisionError::archive(jar, e))?;

        let versions = match read_entry(&mut archive, jar, VERSIONS_LIST)? {
            Some(text) => parse_list(jar, VERSIONS_LIST, &text)?,
            None => return Ok(None),
        };

        let libraries = match read_entry(&mut archive, jar, LIBRARIES_LIST)? {
            Some(text) => parse_list(jar, LIBRARIES_LIST, &text)?,
            None => Vec::new(),
        };

        let main_class = read_entry(&mut archive, jar, MAIN_CLASS)?
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Ok(Some(Self {
            versions,
            libraries,
            main_class,
        }))
    }
}

fn read_entry(
    archive: &mut zip::ZipArchive<File>,
    jar: &Path,
    name: &str,
) -> Result<Option<String>> {
    let mut entry = match archive.by_name(name) {
        Ok(entry) => entry,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(ProvisionError::archive(jar, e)),
    };

    let mut contents = String::new();
    entry
        .read_to_string(&mut contents)
        .map_err(|e| ProvisionError::archive(jar, format!("{}: {}", name, e)))?;
    Ok(Some(contents))
}

fn parse_list(jar: &Path, name: &str, text: &str) -> Result<Vec<BundleEntry>> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() != 3 {
                return Err(ProvisionError::archive(
                    jar,
                    format!("malformed line in {}: '{}'", name, line),
                ));
            }
            Ok(BundleEntry {
                hash: fields[0].to_string(),
                id: fields[1].to_string(),
                path: fields[2].to_string(),
            })
        })
        .collect()
}

/// Extract the single bundled server jar described by `metadata` into `dest`.
///
/// Fails when no metadata is available or when the bundle does not list
/// exactly one version.
pub fn extract(bundle: &Path, metadata: Option<&BundleMetadata>, dest: &Path) -> Result<()> {
    let metadata = metadata.ok_or_else(|| {
        ProvisionError::Precondition(
            "Cannot extract server jar from a jar without bundle metadata".to_string(),
        )
    })?;

    info!("Extracting Spigot jar from bootstrap {}", bundle.display());

    if metadata.versions.len() != 1 {
        return Err(ProvisionError::UnsupportedBundle {
            count: metadata.versions.len(),
        });
    }

    if let Some(parent) = dest.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| ProvisionError::io(parent, e))?;
    }

    metadata.versions[0].unpack_version(bundle, dest)
}
