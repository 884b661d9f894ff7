// Init command for writing a default provision.toml

use spigot_provision::config::{self, ProvisionConfig};
use spigot_provision::constants;
use spigot_provision::download::ChecksumVerifier;
use spigot_provision::ui;

pub fn init(extract: bool, checksum: Option<String>) -> anyhow::Result<i32> {
    let dir = config::config_dir();

    // Check if config already exists
    if config::config_path(&dir).exists() {
        ui::dim("Configuration detected. Skipping initialization.");
        return Ok(0);
    }

    if let Some(checksum) = &checksum {
        ChecksumVerifier::parse(checksum).map_err(|e| anyhow::anyhow!(e))?;
    }

    let config = ProvisionConfig {
        extract_bundle: extract,
        verify_checksum: checksum.is_some(),
        checksum,
        ..Default::default()
    };
    config.save(&dir)?;

    ui::success(&format!("Initialized {}", constants::CONFIG_FILE));
    Ok(0)
}
