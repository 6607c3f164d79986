use std::fs;
use std::path::Path;

use crate::config::{BuildConfig, BuildLayout};
use crate::services::pipeline::{BuildError, BuildResult};
use crate::util::copy_file;

/// Render the freedesktop `[Desktop Entry]` record for the application.
///
/// `Exec` always names the launcher stub so the packaging utility and desktop
/// integration start the app through `AppRun`.
pub fn render_desktop_entry(config: &BuildConfig) -> String {
    let mut body = String::from("[Desktop Entry]\n");
    body.push_str(&format!("Name={}\n", config.app_name));
    body.push_str(&format!("Comment={}\n", config.comment));
    body.push_str("Exec=AppRun\n");
    body.push_str(&format!("Icon={}\n", config.icon_stem()));
    body.push_str("Terminal=false\n");
    body.push_str("Type=Application\n");
    body.push_str(&format!("Categories={}\n", join_list(&config.categories)));
    if !config.mime_types.is_empty() {
        body.push_str(&format!("MimeType={}\n", join_list(&config.mime_types)));
    }
    body
}

/// Write the descriptor under `usr/share/applications` and at the AppDir root.
///
/// The root copy is made from the first file, then both are compared byte for
/// byte.
pub fn describe(config: &BuildConfig, layout: &BuildLayout) -> BuildResult<()> {
    let body = render_desktop_entry(config);
    if let Some(parent) = layout.desktop_share_path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| BuildError::io(format!("Failed to create {}", parent.display()), e))?;
    }
    fs::write(&layout.desktop_share_path, &body).map_err(|e| {
        BuildError::io(format!("Failed to write {}", layout.desktop_share_path.display()), e)
    })?;
    copy_file(&layout.desktop_share_path, &layout.desktop_root_path)?;

    if read(&layout.desktop_share_path)? != read(&layout.desktop_root_path)? {
        return Err(BuildError::DescriptorMismatch(
            layout.desktop_share_path.clone(),
            layout.desktop_root_path.clone(),
        ));
    }
    Ok(())
}

/// Desktop entry lists are `;`-separated with a trailing `;`.
fn join_list(items: &[String]) -> String {
    items.iter().map(|item| format!("{item};")).collect()
}

fn read(path: &Path) -> BuildResult<Vec<u8>> {
    fs::read(path).map_err(|e| BuildError::io(format!("Failed to read {}", path.display()), e))
}
