//! Filesystem and process helpers shared by the build steps.

use std::env;
use std::fs;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::Command;

use sha2::{Digest, Sha256};
use tracing::debug;
use walkdir::WalkDir;

use crate::services::pipeline::{BuildError, BuildResult};

/// Remove a file or directory tree. Returns `Ok(false)` if nothing was there.
pub fn remove_path_if_exists(path: &Path) -> BuildResult<bool> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => {
            return Err(BuildError::io(format!("Failed to inspect {}", path.display()), e))
        }
    };
    let result =
        if metadata.is_dir() { fs::remove_dir_all(path) } else { fs::remove_file(path) };
    match result {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(BuildError::io(format!("Failed to remove {}", path.display()), e)),
    }
}

/// Copy a single file, creating the destination's parent directory.
pub fn copy_file(src: &Path, dest: &Path) -> BuildResult<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| BuildError::io(format!("Failed to create {}", parent.display()), e))?;
    }
    fs::copy(src, dest).map_err(|e| {
        BuildError::io(format!("Failed to copy {} to {}", src.display(), dest.display()), e)
    })?;
    Ok(())
}

/// Recursively copy `src` into `dest`, preserving the directory structure.
pub fn copy_dir_all(src: &Path, dest: &Path) -> BuildResult<u64> {
    let mut copied = 0;
    for entry in WalkDir::new(src).follow_links(true) {
        let entry = entry.map_err(|e| {
            let context = format!("Failed to walk {}", src.display());
            BuildError::io(context, e.into())
        })?;
        let rel = entry.path().strip_prefix(src).unwrap_or(entry.path());
        let target = dest.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
                .map_err(|e| BuildError::io(format!("Failed to create {}", target.display()), e))?;
        } else {
            copy_file(entry.path(), &target)?;
            copied += 1;
        }
    }
    Ok(copied)
}

/// Add execute permission for owner, group and others.
#[cfg(unix)]
pub fn set_executable(path: &Path) -> BuildResult<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = fs::metadata(path)
        .map_err(|e| BuildError::io(format!("Failed to stat {}", path.display()), e))?;
    let mut permissions = metadata.permissions();
    permissions.set_mode(permissions.mode() | 0o755);
    fs::set_permissions(path, permissions)
        .map_err(|e| BuildError::io(format!("Failed to mark {} executable", path.display()), e))
}

#[cfg(not(unix))]
pub fn set_executable(_path: &Path) -> BuildResult<()> {
    Ok(())
}

/// Whether any execute bit is set on `path`.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(path).map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0).unwrap_or(false)
}

#[cfg(not(unix))]
pub fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Compute the SHA-256 hash of a file and return it as a hex string.
pub fn sha256_file(path: &Path) -> BuildResult<String> {
    let file = fs::File::open(path)
        .map_err(|e| BuildError::io(format!("Failed to open {} for hashing", path.display()), e))?;
    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];

    loop {
        let n = reader
            .read(&mut buf)
            .map_err(|e| BuildError::io(format!("Failed to read {}", path.display()), e))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Resolve a tool given either as a path or as a bare name looked up on `PATH`.
pub fn resolve_program(program: &str, root: &Path) -> Option<PathBuf> {
    let as_path = Path::new(program);
    if as_path.components().count() > 1 || as_path.is_absolute() {
        let candidate =
            if as_path.is_absolute() { as_path.to_path_buf() } else { root.join(as_path) };
        return candidate.is_file().then_some(candidate);
    }
    find_in_path(program)
}

fn find_in_path(executable: &str) -> Option<PathBuf> {
    env::var_os("PATH").and_then(|paths| {
        env::split_paths(&paths).find_map(|p| {
            let candidate = p.join(executable);
            if candidate.is_file() {
                Some(candidate)
            } else {
                None
            }
        })
    })
}

/// Run an external tool to completion; a non-zero exit is an error.
///
/// Output is inherited so the tool's own diagnostics reach the user.
pub fn run_tool(tool: &'static str, command: &mut Command) -> BuildResult<()> {
    let program = PathBuf::from(command.get_program());
    debug!("Running {}: {:?}", tool, command);
    let status = command
        .status()
        .map_err(|source| BuildError::ToolSpawn { tool, path: program, source })?;
    if !status.success() {
        return Err(BuildError::ToolFailed { tool, status });
    }
    Ok(())
}
