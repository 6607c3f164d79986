use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use appdir_core::services::pipeline::{BuildError, EXIT_STEP_FAILED};

pub mod commands;

/// Canonicalize the root path if possible, falling back to the given string
/// relative to the current working directory.
pub fn canonicalize_or_current(root: &str) -> Result<PathBuf> {
    let path = Path::new(root);
    if path == Path::new(".") {
        Ok(env::current_dir().context("Failed to get current directory")?)
    } else {
        match path.canonicalize() {
            Ok(p) => Ok(p),
            Err(_) => {
                let cwd = env::current_dir().context("Failed to get current directory")?;
                Ok(cwd.join(path))
            }
        }
    }
}

/// Map a command failure to the process exit status.
///
/// Build failures carry their own status; anything else (bad flags, unreadable
/// config) counts as an aborted step.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<BuildError>())
        .map(BuildError::exit_code)
        .unwrap_or(EXIT_STEP_FAILED)
}
