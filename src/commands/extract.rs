// Extract command for unpacking the server jar out of a bundler jar

use spigot_provision::{BundleMetadata, bundle, ui};
use std::path::Path;

pub fn extract(bundle_path: &Path, dest: &Path) -> anyhow::Result<i32> {
    let metadata = BundleMetadata::from_jar(bundle_path)?;
    bundle::extract(bundle_path, metadata.as_ref(), dest)?;

    ui::success(&format!("Extracted {}", dest.display()));
    Ok(0)
}
