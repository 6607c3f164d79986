use std::fs;

use tracing::debug;

use crate::config::{BuildConfig, BuildLayout};
use crate::services::pipeline::{BuildError, BuildResult};
use crate::util::{copy_dir_all, copy_file, set_executable};

/// Create the AppDir tree and copy the frozen binary, icon and icon assets in.
pub fn stage(_config: &BuildConfig, layout: &BuildLayout) -> BuildResult<()> {
    for dir in [&layout.app_bin_dir, &layout.app_applications_dir] {
        fs::create_dir_all(dir)
            .map_err(|e| BuildError::io(format!("Failed to create {}", dir.display()), e))?;
    }

    if !layout.frozen_binary.is_file() {
        return Err(BuildError::FreezerOutputMissing(layout.frozen_binary.clone()));
    }
    copy_file(&layout.frozen_binary, &layout.staged_binary)?;
    set_executable(&layout.staged_binary)?;

    copy_file(&layout.icon, &layout.staged_icon)?;

    let copied = copy_dir_all(&layout.icons_dir, &layout.staged_icons_dir)?;
    debug!(
        "Staged {} icon assets into {}",
        copied,
        layout.relative_display(&layout.staged_icons_dir)
    );
    Ok(())
}
