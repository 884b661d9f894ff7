// Cache command for listing provisioned versions

use serde::Serialize;
use spigot_provision::config::{self, ProvisionConfig};
use spigot_provision::{VersionToken, constants, ui};
use std::fs;
use std::path::Path;

#[derive(Debug, Serialize)]
struct CachedVersion {
    version: String,
    valid: bool,
    bundled: Option<u64>,
    extracted: Option<u64>,
    partial: bool,
}

#[derive(Debug, Serialize)]
struct CacheOutput {
    schema_version: u32,
    cache_root: String,
    versions: Vec<CachedVersion>,
}

pub fn list_cache(json: bool) -> anyhow::Result<i32> {
    let dir = config::config_dir();
    let config = ProvisionConfig::load(&dir)?;
    let cache_root = config.cache_root(&dir);

    let versions = scan(&cache_root.join(constants::SPIGOT_CACHE_SUBDIR))?;

    if json {
        let output = CacheOutput {
            schema_version: constants::SCHEMA_VERSION,
            cache_root: cache_root.display().to_string(),
            versions,
        };
        ui::plain(&serde_json::to_string_pretty(&output)?);
        return Ok(0);
    }

    if versions.is_empty() {
        ui::dim(&format!("No cached versions in {}", cache_root.display()));
        return Ok(0);
    }

    for v in &versions {
        let mut details = Vec::new();
        if let Some(size) = v.bundled {
            details.push(format!("bundled {} bytes", size));
        }
        if let Some(size) = v.extracted {
            details.push(format!("extracted {} bytes", size));
        }
        if v.partial {
            details.push("partial download".to_string());
        }
        if details.is_empty() {
            details.push("empty".to_string());
        }

        if !v.valid {
            ui::warning(&format!("{} (not a valid version directory)", v.version));
        } else if v.bundled.is_some() {
            ui::success(&format!("{} {}", v.version, details.join(", ")));
        } else {
            ui::status("~", &format!("{} {}", v.version, details.join(", ")));
        }
    }

    Ok(0)
}

fn scan(spigot_dir: &Path) -> anyhow::Result<Vec<CachedVersion>> {
    if !spigot_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut versions = Vec::new();
    for entry in fs::read_dir(spigot_dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }

        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        let size_of = |file: &str| fs::metadata(path.join(file)).ok().map(|m| m.len());
        let part_name = format!("{}.part", constants::BUNDLED_SERVER_JAR);

        versions.push(CachedVersion {
            version: name.to_string(),
            valid: VersionToken::parse(name).is_ok(),
            bundled: size_of(constants::BUNDLED_SERVER_JAR),
            extracted: size_of(constants::EXTRACTED_SERVER_JAR),
            partial: path.join(part_name).exists(),
        });
    }

    versions.sort_by(|a, b| a.version.cmp(&b.version));
    Ok(versions)
}
