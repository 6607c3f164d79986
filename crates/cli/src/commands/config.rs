use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use appdir_core::config::CONFIG_FILE_NAMES;
use appdir_core::{BuildConfig, BuildContext};
use serde::Serialize;

use crate::canonicalize_or_current;

#[derive(Serialize)]
pub struct ConfigSnapshot {
    pub root: String,
    pub config: BuildConfig,
    pub artifact: String,
    pub layout: ConfigSnapshotLayout,
}

#[derive(Serialize)]
pub struct ConfigSnapshotLayout {
    pub app_dir: String,
    pub frozen_binary: String,
    pub launcher: String,
    pub desktop_files: Vec<String>,
    pub packager: String,
    pub packager_cached: bool,
}

/// Print the resolved config and the paths a build would use.
pub fn show_config_command(root: &str, config: Option<&str>) -> Result<()> {
    let root_path = canonicalize_or_current(root)?;
    let ctx = BuildContext::from_root(&root_path, config.map(Path::new))
        .context("Failed to resolve build config")?;
    let layout = &ctx.layout;

    let snapshot = ConfigSnapshot {
        root: layout.root.display().to_string(),
        artifact: ctx.config.artifact_name(),
        layout: ConfigSnapshotLayout {
            app_dir: layout.relative_display(&layout.app_dir),
            frozen_binary: layout.relative_display(&layout.frozen_binary),
            launcher: layout.relative_display(&layout.launcher_path),
            desktop_files: vec![
                layout.relative_display(&layout.desktop_share_path),
                layout.relative_display(&layout.desktop_root_path),
            ],
            packager: layout.relative_display(&layout.packager_path),
            packager_cached: layout.packager_path.is_file(),
        },
        config: ctx.config.clone(),
    };
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

/// Write the default config to `<root>/appimage.json`.
pub fn init_config_command(root: &str, force: bool) -> Result<()> {
    let root_path = canonicalize_or_current(root)?;
    let path = root_path.join(CONFIG_FILE_NAMES[0]);
    if path.exists() && !force {
        return Err(anyhow!(
            "Build config already exists at {} (use --force to overwrite)",
            path.display()
        ));
    }

    fs::create_dir_all(&root_path)
        .with_context(|| format!("Failed to create {}", root_path.display()))?;
    let json = serde_json::to_string_pretty(&BuildConfig::default())?;
    fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Wrote default build config to {}", path.display());
    Ok(())
}
