// Resolve command for printing where a version's jar comes from and goes

use serde::Serialize;
use spigot_provision::config::{self, ProvisionConfig};
use spigot_provision::{ResolvedLocation, VersionToken, ui};

#[derive(Debug, Serialize)]
struct ResolveOutput<'a> {
    version: &'a VersionToken,
    snapshot_version: String,
    location: &'a ResolvedLocation,
}

pub fn resolve(version: &str, json: bool) -> anyhow::Result<i32> {
    let dir = config::config_dir();
    let config = ProvisionConfig::load(&dir)?;
    let cache_root = config.cache_root(&dir);
    std::fs::create_dir_all(&cache_root)?;

    let token = VersionToken::parse(version)?;
    let location =
        ResolvedLocation::resolve_with_repository(&token, &cache_root, &config.repository)?;

    if json {
        let output = ResolveOutput {
            version: &token,
            snapshot_version: token.snapshot_version(),
            location: &location,
        };
        ui::plain(&serde_json::to_string_pretty(&output)?);
        return Ok(0);
    }

    print_location(&token, &location);
    Ok(0)
}

fn print_location(token: &VersionToken, location: &ResolvedLocation) {
    ui::status("minecraft", token.minecraft_version());
    ui::status("api      ", token.api_version());
    ui::status("snapshot ", &token.snapshot_version());
    ui::status("url      ", &location.remote_url);
    ui::status("directory", &location.working_dir.display().to_string());
    ui::status("bundled  ", &location.bundled_jar.display().to_string());
    ui::status("extracted", &location.extracted_jar.display().to_string());
}
