// Provide command running the full provisioning pipeline

use log::debug;
use spigot_provision::config::{self, ProvisionConfig};
use spigot_provision::download::progress::TerminalProgress;
use spigot_provision::{LockfileRegistrar, SpigotProvider, ui};
use std::path::PathBuf;
use std::sync::Arc;

pub async fn provide(
    version: &str,
    cache_dir: Option<PathBuf>,
    extract: bool,
    force: bool,
) -> anyhow::Result<i32> {
    let dir = config::config_dir();
    let config = ProvisionConfig::load(&dir)?;
    let cache_root = cache_dir.unwrap_or_else(|| config.cache_root(&dir));

    // The cache root belongs to the caller; the provider only creates directories inside it
    std::fs::create_dir_all(&cache_root)?;
    debug!("Using cache root {}", cache_root.display());

    let mut provider = SpigotProvider::from_config(&config, &cache_root)
        .extract_bundle(config.extract_bundle || extract)
        .force_download(force)
        .progress(Arc::new(TerminalProgress::new("Spigot official mapped server")));

    let mut registrar = LockfileRegistrar::new(config::lockfile_path(&dir));

    let report = provider.provide(version, &mut registrar).await?;

    for e in registrar.errors() {
        ui::warning(&format!("Registration not recorded: {}", e));
    }

    if !report.downloaded {
        ui::dim(&format!(
            "Using cached {}",
            report.location.bundled_jar.display()
        ));
    }
    ui::success(&format!(
        "Provided {} {}",
        report.coordinate,
        report.artifact.display()
    ));
    Ok(0)
}
