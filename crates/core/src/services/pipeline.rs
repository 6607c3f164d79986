use std::fmt;
use std::path::PathBuf;
use std::process::ExitStatus;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{BuildConfig, BuildLayout};
use crate::services::fetch::Fetcher;
use crate::services::steps;

/// Exit status for a build aborted by a failing step.
pub const EXIT_STEP_FAILED: i32 = 1;
/// Exit status when every step succeeded but the artifact is not on disk.
pub const EXIT_ARTIFACT_MISSING: i32 = 2;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Invalid build config: {0}")]
    InvalidConfig(String),
    #[error("Missing build input {what} at {path}")]
    MissingInput { what: &'static str, path: PathBuf },
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{tool} not found (looked for '{program}')")]
    ToolNotFound { tool: &'static str, program: String },
    #[error("Failed to spawn {tool} at {path}: {source}")]
    ToolSpawn {
        tool: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{tool} exited with {status}")]
    ToolFailed { tool: &'static str, status: ExitStatus },
    #[error("Freezer reported success but produced no binary at {0}")]
    FreezerOutputMissing(PathBuf),
    #[error("Failed to fetch packaging utility from {url}: {reason}")]
    Fetch { url: String, reason: String },
    #[error("Desktop descriptors differ: {0} vs {1}")]
    DescriptorMismatch(PathBuf, PathBuf),
    #[error("Packaging finished but no artifact exists at {0}")]
    ArtifactMissing(PathBuf),
}

impl BuildError {
    /// Wrap an IO error with a human-readable description of what was attempted.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        BuildError::Io { context: context.into(), source }
    }

    /// Process exit status for this failure.
    ///
    /// A missing artifact is reported distinctly from an aborted step.
    pub fn exit_code(&self) -> i32 {
        match self {
            BuildError::ArtifactMissing(_) => EXIT_ARTIFACT_MISSING,
            _ => EXIT_STEP_FAILED,
        }
    }
}

/// Convenience result type for build operations.
pub type BuildResult<T> = Result<T, BuildError>;

/// The phases of a build, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Clean,
    Freeze,
    Stage,
    Describe,
    Launcher,
    AcquirePackager,
    Package,
    Verify,
}

impl Step {
    pub const ALL: [Step; 8] = [
        Step::Clean,
        Step::Freeze,
        Step::Stage,
        Step::Describe,
        Step::Launcher,
        Step::AcquirePackager,
        Step::Package,
        Step::Verify,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Step::Clean => "clean",
            Step::Freeze => "freeze",
            Step::Stage => "stage",
            Step::Describe => "describe",
            Step::Launcher => "launcher",
            Step::AcquirePackager => "acquire_packager",
            Step::Package => "package",
            Step::Verify => "verify",
        }
    }

    /// One-line narration shown to the user when the step starts.
    pub fn describe(&self) -> &'static str {
        match self {
            Step::Clean => "Cleaning previous build artifacts",
            Step::Freeze => "Freezing application into a single binary",
            Step::Stage => "Staging AppDir",
            Step::Describe => "Writing desktop descriptor",
            Step::Launcher => "Writing AppRun launcher",
            Step::AcquirePackager => "Checking packaging utility",
            Step::Package => "Packaging AppImage",
            Step::Verify => "Verifying artifact",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summary of a verified build, persisted as `build-report.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildReport {
    pub app_name: String,
    pub artifact: String,
    pub artifact_path: String,
    pub size_bytes: u64,
    pub sha256: String,
    pub packager_fetched: bool,
    pub removed: Vec<String>,
    pub started_at: String,
    pub finished_at: String,
}

/// Runs the build steps in order, stopping at the first failure.
pub struct Assembler<'a> {
    config: &'a BuildConfig,
    layout: &'a BuildLayout,
    fetcher: &'a dyn Fetcher,
}

impl<'a> Assembler<'a> {
    pub fn new(config: &'a BuildConfig, layout: &'a BuildLayout, fetcher: &'a dyn Fetcher) -> Self {
        Self { config, layout, fetcher }
    }

    pub fn run(&self) -> BuildResult<BuildReport> {
        self.run_observed(|_| {})
    }

    /// Run every step, calling `on_step` as each one starts.
    pub fn run_observed(&self, mut on_step: impl FnMut(Step)) -> BuildResult<BuildReport> {
        self.config.validate()?;
        let started_at = Utc::now().to_rfc3339();
        let (config, layout) = (self.config, self.layout);

        let mut enter = |step: Step| {
            info!(step = step.as_str(), "{}", step.describe());
            on_step(step);
        };

        enter(Step::Clean);
        let removed = steps::clean(layout)?;

        enter(Step::Freeze);
        steps::freeze(config, layout)?;

        enter(Step::Stage);
        steps::stage(config, layout)?;

        enter(Step::Describe);
        steps::describe(config, layout)?;

        enter(Step::Launcher);
        steps::write_launcher(config, layout)?;

        enter(Step::AcquirePackager);
        let packager_fetched = steps::acquire_packager(config, layout, self.fetcher)?;

        enter(Step::Package);
        steps::package(config, layout)?;

        enter(Step::Verify);
        let verified = steps::verify(layout)?;

        let report = BuildReport {
            app_name: config.app_name.clone(),
            artifact: config.artifact_name(),
            artifact_path: layout.artifact_path.display().to_string(),
            size_bytes: verified.size_bytes,
            sha256: verified.sha256,
            packager_fetched,
            removed: removed.iter().map(|p| layout.relative_display(p)).collect(),
            started_at,
            finished_at: Utc::now().to_rfc3339(),
        };
        // The artifact is verified at this point; a report that cannot be
        // written does not turn the build into a failure.
        match write_report(layout, &report) {
            Ok(()) => debug!("Wrote build report to {}", layout.report_path.display()),
            Err(err) => warn!("Build report not written: {}", err),
        }
        Ok(report)
    }
}

fn write_report(layout: &BuildLayout, report: &BuildReport) -> BuildResult<()> {
    let json = serde_json::to_string_pretty(report)
        .map_err(|e| BuildError::io("Failed to serialize build report", e.into()))?;
    std::fs::write(&layout.report_path, json).map_err(|e| {
        BuildError::io(format!("Failed to write {}", layout.report_path.display()), e)
    })
}
