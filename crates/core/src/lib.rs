//! appdir-core
//!
//! Core library that turns the BlackOutPDF sources into a single AppImage.
//!
//! A build is a strictly sequential pipeline: clean, freeze, stage, describe,
//! write the launcher, acquire the packaging utility, package, verify. Each
//! step returns a `BuildError` on failure and the pipeline stops at the first
//! one; the CLI maps that error to an exit status.
//!
//! The freezer, the packaging utility and the network are external
//! collaborators. They are reached through `std::process::Command` and the
//! `Fetcher` trait so tests can replace them with stubs.

pub mod config;
pub mod services;
pub mod util;

pub use config::{BuildConfig, BuildContext, BuildLayout};
pub use services::fetch::{Fetcher, HttpFetcher};
pub use services::pipeline::{Assembler, BuildError, BuildReport, BuildResult, Step};

/// Returns the library version as encoded at compile time.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
