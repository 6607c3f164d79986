use std::fs;
use std::path::PathBuf;
use std::process::Command;

use tracing::{debug, info, warn};

use crate::config::{BuildConfig, BuildLayout};
use crate::services::fetch::Fetcher;
use crate::services::pipeline::{BuildError, BuildResult};
use crate::util::{remove_path_if_exists, run_tool, set_executable, sha256_file};

const TOOL: &str = "packaging utility";

/// Make sure the packaging utility is cached in the build root and executable.
///
/// The cache is keyed purely by file name: if the file exists it is used as-is
/// and no download happens. Otherwise it is fetched into a `.part` file and
/// renamed into place, so a failed download never leaves a file under the
/// cached name. Returns whether a download happened.
pub fn acquire_packager(
    config: &BuildConfig,
    layout: &BuildLayout,
    fetcher: &dyn Fetcher,
) -> BuildResult<bool> {
    if layout.packager_path.is_file() {
        debug!("Packaging utility cached at {}", layout.packager_path.display());
        set_executable(&layout.packager_path)?;
        return Ok(false);
    }

    let url = &config.tools.packager_url;
    info!("Fetching packaging utility from {}", url);
    let partial = &layout.packager_download_path;
    if let Err(err) = fetcher.fetch(url, partial) {
        if let Err(cleanup) = remove_path_if_exists(partial) {
            warn!("Failed to remove partial download {}: {}", partial.display(), cleanup);
        }
        return Err(err);
    }
    fs::rename(partial, &layout.packager_path).map_err(|e| {
        BuildError::io(
            format!("Failed to move download into {}", layout.packager_path.display()),
            e,
        )
    })?;
    set_executable(&layout.packager_path)?;
    Ok(true)
}

/// Turn the AppDir into the final artifact.
///
/// If the packaging utility fails, whatever it wrote under the artifact name is
/// removed so a failed build never leaves an artifact behind.
pub fn package(config: &BuildConfig, layout: &BuildLayout) -> BuildResult<()> {
    if !layout.packager_path.is_file() {
        return Err(BuildError::ToolNotFound {
            tool: TOOL,
            program: layout.packager_path.display().to_string(),
        });
    }

    let mut command = Command::new(&layout.packager_path);
    command
        .arg(&layout.app_dir)
        .arg(&layout.artifact_path)
        .env("ARCH", &config.arch)
        .current_dir(&layout.root);

    if let Err(err) = run_tool(TOOL, &mut command) {
        if let Err(cleanup) = remove_path_if_exists(&layout.artifact_path) {
            warn!(
                "Failed to remove partial artifact {}: {}",
                layout.artifact_path.display(),
                cleanup
            );
        }
        return Err(err);
    }
    Ok(())
}

/// Facts about an artifact that passed verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedArtifact {
    pub path: PathBuf,
    pub size_bytes: u64,
    pub sha256: String,
}

/// The artifact's presence on disk is the sole success criterion.
pub fn verify(layout: &BuildLayout) -> BuildResult<VerifiedArtifact> {
    let metadata = match fs::metadata(&layout.artifact_path) {
        Ok(m) if m.is_file() => m,
        _ => return Err(BuildError::ArtifactMissing(layout.artifact_path.clone())),
    };
    Ok(VerifiedArtifact {
        path: layout.artifact_path.clone(),
        size_bytes: metadata.len(),
        sha256: sha256_file(&layout.artifact_path)?,
    })
}
