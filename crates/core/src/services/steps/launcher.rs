use std::fs;

use crate::config::{BuildConfig, BuildLayout};
use crate::services::pipeline::{BuildError, BuildResult};
use crate::util::set_executable;

/// POSIX shell entry point placed at the AppDir root as `AppRun`.
///
/// At run time it resolves its own real directory (following symlinks), puts
/// the bundled `usr/bin` first on `PATH` and replaces itself with the frozen
/// binary, forwarding every argument unchanged.
pub fn render_launcher(config: &BuildConfig) -> String {
    format!(
        "#!/bin/sh\n\
         HERE=\"$(dirname \"$(readlink -f \"$0\")\")\"\n\
         export PATH=\"$HERE/usr/bin:$PATH\"\n\
         exec \"$HERE/usr/bin/{binary}\" \"$@\"\n",
        binary = config.binary_name
    )
}

/// Write `AppRun` and mark it executable.
pub fn write_launcher(config: &BuildConfig, layout: &BuildLayout) -> BuildResult<()> {
    fs::create_dir_all(&layout.app_dir)
        .map_err(|e| BuildError::io(format!("Failed to create {}", layout.app_dir.display()), e))?;
    fs::write(&layout.launcher_path, render_launcher(config)).map_err(|e| {
        BuildError::io(format!("Failed to write {}", layout.launcher_path.display()), e)
    })?;
    set_executable(&layout.launcher_path)
}
