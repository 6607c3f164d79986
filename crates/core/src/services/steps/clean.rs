use std::fs;
use std::path::PathBuf;

use tracing::debug;

use crate::config::BuildLayout;
use crate::services::pipeline::{BuildError, BuildResult};
use crate::util::remove_path_if_exists;

/// Remove everything a previous run may have left behind.
///
/// Deletes the freezer's work and output directories, the AppDir, the final
/// artifact, the build report, an interrupted packager download and any
/// `*.spec` files the freezer wrote into the root. Paths that do not exist are
/// skipped, so running this twice is a no-op the second time. Returns the paths that were actually removed.
pub fn clean(layout: &BuildLayout) -> BuildResult<Vec<PathBuf>> {
    let mut targets: Vec<PathBuf> =
        layout.transient_dirs().iter().map(|p| p.to_path_buf()).collect();
    targets.push(layout.artifact_path.clone());
    targets.push(layout.report_path.clone());
    targets.push(layout.packager_download_path.clone());
    targets.extend(stray_spec_files(layout)?);

    let mut removed = Vec::new();
    for target in targets {
        if remove_path_if_exists(&target)? {
            debug!("Removed {}", target.display());
            removed.push(target);
        }
    }
    Ok(removed)
}

fn stray_spec_files(layout: &BuildLayout) -> BuildResult<Vec<PathBuf>> {
    let entries = match fs::read_dir(&layout.root) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(BuildError::io(format!("Failed to read {}", layout.root.display()), e))
        }
    };

    let mut specs = Vec::new();
    for entry in entries {
        let entry = entry
            .map_err(|e| BuildError::io(format!("Failed to read {}", layout.root.display()), e))?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) == Some("spec") && path.is_file() {
            specs.push(path);
        }
    }
    specs.sort();
    Ok(specs)
}
