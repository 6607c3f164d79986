use std::path::Path;

use anyhow::{anyhow, Context, Result};
use tracing::debug;

use crate::config::BuildConfig;

/// Config files looked up in the build root, in priority order.
pub const CONFIG_FILE_NAMES: [&str; 3] = ["appimage.json", "appimage.yaml", "appimage.yml"];

/// Load a build config from a JSON or YAML file (chosen by extension).
pub fn load_build_config(path: &Path) -> Result<BuildConfig> {
    let body = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read build config at {}", path.display()))?;
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
    let config: BuildConfig = match ext {
        "json" => serde_json::from_str(&body).context("Failed to parse build config JSON")?,
        "yaml" | "yml" => {
            serde_yaml::from_str(&body).context("Failed to parse build config YAML")?
        }
        other => {
            return Err(anyhow!(
                "Unsupported build config format '{}' ({}); use .json, .yaml or .yml",
                other,
                path.display()
            ))
        }
    };
    config.validate()?;
    Ok(config)
}

/// Use the first config file present in `root`, or the built-in defaults.
pub fn discover_build_config(root: &Path) -> Result<BuildConfig> {
    match CONFIG_FILE_NAMES.iter().map(|name| root.join(name)).find(|p| p.is_file()) {
        Some(path) => {
            debug!("Using build config {}", path.display());
            load_build_config(&path)
        }
        None => {
            debug!("No build config in {}; using defaults", root.display());
            Ok(BuildConfig::default())
        }
    }
}
