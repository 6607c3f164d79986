//! Build configuration and on-disk layout.
//!
//! This module defines:
//! - `BuildConfig`: the immutable set of names and tool locations a build uses.
//! - `ToolConfig`: where the freezer and the packaging utility come from.
//! - `DataMapping`: one `--add-data` resource embedded into the frozen binary.
//! - `BuildLayout`: computed paths for every artifact of a build.
//! - `BuildContext`: layout plus config for a given root.

mod context;
mod layout;
mod util;

pub use context::BuildContext;
pub use layout::BuildLayout;
pub use util::{discover_build_config, load_build_config, CONFIG_FILE_NAMES};

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::services::pipeline::BuildError;

/// Upstream location of the latest continuous appimagetool release.
pub const DEFAULT_PACKAGER_URL: &str =
    "https://github.com/AppImage/appimagetool/releases/download/continuous/appimagetool-x86_64.AppImage";

/// One resource embedded alongside the frozen binary (`source:destination`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataMapping {
    /// Path relative to the build root.
    pub source: String,
    /// Destination inside the frozen bundle (`.` for its top level).
    pub destination: String,
}

impl DataMapping {
    pub fn new(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self { source: source.into(), destination: destination.into() }
    }

    /// Render as the freezer's `--add-data` argument.
    pub fn as_arg(&self) -> String {
        format!("{}:{}", self.source, self.destination)
    }
}

/// External tools consumed by the build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Freezer executable; a bare name is looked up on `PATH`.
    pub freezer: String,
    /// File name of the cached packaging utility in the build root.
    pub packager_file: String,
    /// Where to fetch the packaging utility from when it is not cached.
    pub packager_url: String,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            freezer: "pyinstaller".to_string(),
            packager_file: "appimagetool-x86_64.AppImage".to_string(),
            packager_url: DEFAULT_PACKAGER_URL.to_string(),
        }
    }
}

/// Serializable configuration describing one AppImage build.
///
/// Constructed once before the first step and passed by reference to every
/// step afterwards. Optionally read from `appimage.json` (or `.yaml`) in the
/// build root; missing fields fall back to the defaults below.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Display name; also the artifact file name prefix.
    pub app_name: String,
    /// File name of the frozen binary and the launcher's exec target.
    pub binary_name: String,
    /// Entry script handed to the freezer.
    pub main_script: String,
    /// Icon image embedded in the binary and placed at the AppDir root.
    pub icon: String,
    /// Directory of auxiliary icon assets.
    pub icons_dir: String,
    /// Desktop identifier; the descriptor is written as `<desktop_id>.desktop`.
    pub desktop_id: String,
    pub comment: String,
    pub categories: Vec<String>,
    pub mime_types: Vec<String>,
    /// Target architecture, used for the artifact suffix and `ARCH`.
    pub arch: String,
    /// Additional resources embedded after the icon and icons directory.
    pub extra_data: Vec<DataMapping>,
    pub tools: ToolConfig,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            app_name: "BlackOutPDF".to_string(),
            binary_name: "BlackOutPDF".to_string(),
            main_script: "BOPDF.py".to_string(),
            icon: "logo.png".to_string(),
            icons_dir: "icons".to_string(),
            desktop_id: "blackoutpdf".to_string(),
            comment: "Redact, annotate and export PDF documents".to_string(),
            categories: vec!["Utility".to_string(), "Office".to_string()],
            mime_types: vec!["application/pdf".to_string()],
            arch: "x86_64".to_string(),
            extra_data: Vec::new(),
            tools: ToolConfig::default(),
        }
    }
}

impl BuildConfig {
    /// File name of the final distributable, e.g. `BlackOutPDF-x86_64.AppImage`.
    pub fn artifact_name(&self) -> String {
        format!("{}-{}.AppImage", self.app_name, self.arch)
    }

    /// Icon reference for the desktop descriptor (file name without extension).
    pub fn icon_stem(&self) -> &str {
        Path::new(&self.icon).file_stem().and_then(|s| s.to_str()).unwrap_or(&self.icon)
    }

    /// Resources embedded next to the frozen binary, in freezer argument order.
    pub fn data_mappings(&self) -> Vec<DataMapping> {
        let mut mappings = vec![
            DataMapping::new(&self.icons_dir, &self.icons_dir),
            DataMapping::new(&self.icon, "."),
        ];
        mappings.extend(self.extra_data.iter().cloned());
        mappings
    }

    /// Reject configurations that would produce unusable paths.
    pub fn validate(&self) -> Result<(), BuildError> {
        let required = [
            ("app_name", &self.app_name),
            ("binary_name", &self.binary_name),
            ("main_script", &self.main_script),
            ("icon", &self.icon),
            ("icons_dir", &self.icons_dir),
            ("desktop_id", &self.desktop_id),
            ("arch", &self.arch),
            ("tools.freezer", &self.tools.freezer),
            ("tools.packager_file", &self.tools.packager_file),
            ("tools.packager_url", &self.tools.packager_url),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(BuildError::InvalidConfig(format!("{field} must not be empty")));
            }
        }

        let plain_names = [
            ("app_name", &self.app_name),
            ("binary_name", &self.binary_name),
            ("desktop_id", &self.desktop_id),
            ("arch", &self.arch),
            ("tools.packager_file", &self.tools.packager_file),
        ];
        for (field, value) in plain_names {
            if value.contains('/') || value.contains('\\') {
                return Err(BuildError::InvalidConfig(format!(
                    "{field} must be a plain file name, got '{value}'"
                )));
            }
        }

        if let Some(bad) = self.extra_data.iter().find(|m| m.source.trim().is_empty()) {
            return Err(BuildError::InvalidConfig(format!(
                "extra_data entry with destination '{}' has an empty source",
                bad.destination
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_blackoutpdf_conventions() {
        let config = BuildConfig::default();
        assert_eq!(config.artifact_name(), "BlackOutPDF-x86_64.AppImage");
        assert_eq!(config.icon_stem(), "logo");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn data_mappings_embed_icons_dir_and_icon_first() {
        let mut config = BuildConfig::default();
        config.extra_data.push(DataMapping::new("locale", "locale"));
        let args: Vec<String> = config.data_mappings().iter().map(DataMapping::as_arg).collect();
        assert_eq!(args, vec!["icons:icons", "logo.png:.", "locale:locale"]);
    }

    #[test]
    fn icon_stem_keeps_names_without_extension() {
        let config = BuildConfig { icon: "logo".into(), ..BuildConfig::default() };
        assert_eq!(config.icon_stem(), "logo");
        let hidden = BuildConfig { icon: ".icon".into(), ..BuildConfig::default() };
        assert_eq!(hidden.icon_stem(), ".icon");
    }

    #[test]
    fn validate_rejects_separators_in_names() {
        let config = BuildConfig { app_name: "../escape".into(), ..BuildConfig::default() };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("app_name"));
    }

    #[test]
    fn validate_rejects_empty_fields() {
        let mut config = BuildConfig::default();
        config.tools.freezer = "  ".into();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("tools.freezer"));
    }
}
