use std::path::Path;

use anyhow::{Context, Result};
use appdir_core::{Assembler, BuildContext, BuildReport, Fetcher, HttpFetcher};

use crate::canonicalize_or_current;

/// Run the full build in `root` using the HTTP fetcher.
pub fn build_command(root: &str, config: Option<&str>, json: bool) -> Result<BuildReport> {
    build_with_fetcher(root, config, json, &HttpFetcher)
}

/// Run the full build with an explicit fetcher.
pub fn build_with_fetcher(
    root: &str,
    config: Option<&str>,
    json: bool,
    fetcher: &dyn Fetcher,
) -> Result<BuildReport> {
    let root_path = canonicalize_or_current(root)?;
    let ctx = BuildContext::from_root(&root_path, config.map(Path::new))
        .context("Failed to resolve build config")?;

    let assembler = Assembler::new(&ctx.config, &ctx.layout, fetcher);
    let report = assembler.run_observed(|step| {
        if !json {
            println!("==> {}", step.describe());
        }
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        if report.packager_fetched {
            println!("Downloaded {}", ctx.config.tools.packager_file);
        }
        println!("Success: {} created", report.artifact);
        println!("  Path: {}", report.artifact_path);
        println!("  Size: {} bytes", report.size_bytes);
        println!("  SHA-256: {}", report.sha256);
    }

    Ok(report)
}
