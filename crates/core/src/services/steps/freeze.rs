use std::ffi::OsString;
use std::path::Path;
use std::process::Command;

use tracing::debug;

use crate::config::{BuildConfig, BuildLayout};
use crate::services::pipeline::{BuildError, BuildResult};
use crate::util::{resolve_program, run_tool};

const TOOL: &str = "freezer";

/// Bundle the main script into one windowed executable under `dist/`.
pub fn freeze(config: &BuildConfig, layout: &BuildLayout) -> BuildResult<()> {
    require_input("main script", &layout.main_script, false)?;
    require_input("icon", &layout.icon, false)?;
    require_input("icons directory", &layout.icons_dir, true)?;

    let freezer = resolve_program(&config.tools.freezer, &layout.root).ok_or_else(|| {
        BuildError::ToolNotFound { tool: TOOL, program: config.tools.freezer.clone() }
    })?;
    debug!("Using freezer at {}", freezer.display());

    let mut command = Command::new(&freezer);
    command.args(freezer_args(config, layout)).current_dir(&layout.root);
    run_tool(TOOL, &mut command)?;

    if !layout.frozen_binary.is_file() {
        return Err(BuildError::FreezerOutputMissing(layout.frozen_binary.clone()));
    }
    Ok(())
}

/// Arguments passed to the freezer: single file, GUI mode, icon attached and
/// the data mappings embedded.
pub fn freezer_args(config: &BuildConfig, layout: &BuildLayout) -> Vec<OsString> {
    let mut args: Vec<OsString> = ["--noconfirm", "--clean", "--onefile", "--windowed"]
        .into_iter()
        .map(OsString::from)
        .collect();
    args.push("--name".into());
    args.push(config.binary_name.clone().into());
    args.push("--icon".into());
    args.push(config.icon.clone().into());
    for mapping in config.data_mappings() {
        args.push("--add-data".into());
        args.push(mapping.as_arg().into());
    }
    args.push("--distpath".into());
    args.push(layout.dist_dir.clone().into_os_string());
    args.push("--workpath".into());
    args.push(layout.build_dir.clone().into_os_string());
    args.push("--specpath".into());
    args.push(layout.root.clone().into_os_string());
    args.push(config.main_script.clone().into());
    args
}

fn require_input(what: &'static str, path: &Path, dir: bool) -> BuildResult<()> {
    let present = if dir { path.is_dir() } else { path.is_file() };
    if present {
        Ok(())
    } else {
        Err(BuildError::MissingInput { what, path: path.to_path_buf() })
    }
}
