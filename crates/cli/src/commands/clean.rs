use std::path::Path;

use anyhow::{Context, Result};
use appdir_core::services::steps;
use appdir_core::BuildContext;

use crate::canonicalize_or_current;

/// Remove the artifacts of a previous build without starting a new one.
pub fn clean_command(root: &str, config: Option<&str>) -> Result<()> {
    let root_path = canonicalize_or_current(root)?;
    let ctx = BuildContext::from_root(&root_path, config.map(Path::new))
        .context("Failed to resolve build config")?;

    let removed = steps::clean(&ctx.layout)?;
    if removed.is_empty() {
        println!("Nothing to remove in {}", ctx.layout.root.display());
        return Ok(());
    }

    println!("Removed ({}):", removed.len());
    for path in removed {
        println!("  - {}", ctx.layout.relative_display(&path));
    }
    Ok(())
}
