use std::path::Path;

use anyhow::Result;

use crate::config::{discover_build_config, load_build_config, BuildConfig, BuildLayout};

/// Convenience wrapper bundling the resolved config and its layout.
#[derive(Debug, Clone)]
pub struct BuildContext {
    pub config: BuildConfig,
    pub layout: BuildLayout,
}

impl BuildContext {
    /// Resolve the config (explicit file, else discovered in `root`) and compute the layout.
    pub fn from_root(root: impl AsRef<Path>, config_path: Option<&Path>) -> Result<Self> {
        let root = root.as_ref();
        let config = match config_path {
            Some(path) => load_build_config(path)?,
            None => discover_build_config(root)?,
        };
        Ok(Self::with_config(root, config))
    }

    pub fn with_config(root: impl AsRef<Path>, config: BuildConfig) -> Self {
        let layout = BuildLayout::new(root, &config);
        Self { config, layout }
    }
}
