use std::path::{Path, PathBuf};

use crate::config::BuildConfig;

/// Logical layout of a build on disk.
///
/// This is derived from a chosen root path and a config. It does *not* perform
/// any IO itself; the pipeline steps create and remove what it names.
#[derive(Debug, Clone)]
pub struct BuildLayout {
    /// Root directory of the build (inputs live here, the artifact lands here).
    pub root: PathBuf,
    /// Entry script handed to the freezer.
    pub main_script: PathBuf,
    /// Icon image in the root.
    pub icon: PathBuf,
    /// Icon assets directory in the root.
    pub icons_dir: PathBuf,
    /// Freezer work directory (build).
    pub build_dir: PathBuf,
    /// Freezer output directory (dist).
    pub dist_dir: PathBuf,
    /// Binary produced by the freezer.
    pub frozen_binary: PathBuf,
    /// Staging directory consumed by the packaging utility (AppDir).
    pub app_dir: PathBuf,
    /// AppDir/usr/bin.
    pub app_bin_dir: PathBuf,
    /// AppDir/usr/share/applications.
    pub app_applications_dir: PathBuf,
    /// Staged copy of the frozen binary.
    pub staged_binary: PathBuf,
    /// Staged copy of the icon assets directory (next to the binary).
    pub staged_icons_dir: PathBuf,
    /// Staged copy of the icon at the AppDir root.
    pub staged_icon: PathBuf,
    /// Descriptor under the standard share path.
    pub desktop_share_path: PathBuf,
    /// Descriptor at the AppDir root.
    pub desktop_root_path: PathBuf,
    /// Launcher stub (AppDir/AppRun).
    pub launcher_path: PathBuf,
    /// Locally cached packaging utility.
    pub packager_path: PathBuf,
    /// In-flight download of the packaging utility (`<packager_file>.part`).
    pub packager_download_path: PathBuf,
    /// Final distributable.
    pub artifact_path: PathBuf,
    /// JSON summary written after a verified build.
    pub report_path: PathBuf,
}

impl BuildLayout {
    /// Compute the layout for a build rooted at `root`.
    ///
    /// A relative root is resolved against the current directory, since the
    /// external tools run with the root as their working directory. This does
    /// *not* otherwise touch the filesystem.
    pub fn new(root: impl AsRef<Path>, config: &BuildConfig) -> Self {
        let root = absolute_root(root.as_ref());
        let build_dir = root.join("build");
        let dist_dir = root.join("dist");
        let frozen_binary = dist_dir.join(&config.binary_name);
        let app_dir = root.join("AppDir");
        let app_bin_dir = app_dir.join("usr").join("bin");
        let app_applications_dir = app_dir.join("usr").join("share").join("applications");
        let desktop_file = format!("{}.desktop", config.desktop_id);

        Self {
            main_script: root.join(&config.main_script),
            icon: root.join(&config.icon),
            icons_dir: root.join(&config.icons_dir),
            build_dir,
            dist_dir,
            frozen_binary,
            staged_binary: app_bin_dir.join(&config.binary_name),
            staged_icons_dir: app_bin_dir.join(&config.icons_dir),
            staged_icon: app_dir.join(file_name_or(&config.icon)),
            desktop_share_path: app_applications_dir.join(&desktop_file),
            desktop_root_path: app_dir.join(&desktop_file),
            launcher_path: app_dir.join("AppRun"),
            packager_path: root.join(&config.tools.packager_file),
            packager_download_path: root.join(format!("{}.part", config.tools.packager_file)),
            artifact_path: root.join(config.artifact_name()),
            report_path: root.join("build-report.json"),
            app_bin_dir,
            app_applications_dir,
            app_dir,
            root,
        }
    }

    /// Directories removed wholesale by the clean step.
    pub fn transient_dirs(&self) -> [&Path; 3] {
        [self.build_dir.as_path(), self.dist_dir.as_path(), self.app_dir.as_path()]
    }

    /// Express `path` relative to the root when possible (for display).
    pub fn relative_display(&self, path: &Path) -> String {
        match path.strip_prefix(&self.root) {
            Ok(rel) => rel.to_string_lossy().to_string(),
            Err(_) => path.to_string_lossy().to_string(),
        }
    }
}

fn absolute_root(root: &Path) -> PathBuf {
    if root.is_absolute() {
        return root.to_path_buf();
    }
    std::path::absolute(root).unwrap_or_else(|_| root.to_path_buf())
}

/// The icon may be given as a relative path; only its file name is staged.
fn file_name_or(path: &str) -> &str {
    Path::new(path).file_name().and_then(|n| n.to_str()).unwrap_or(path)
}
