//! The individual build steps, each runnable on its own.
//!
//! Every step takes the immutable `BuildConfig` and `BuildLayout` and either
//! completes or returns the first `BuildError` it hits. Nothing is retried.

mod clean;
mod describe;
mod freeze;
mod launcher;
mod package;
mod stage;

pub use clean::clean;
pub use describe::{describe, render_desktop_entry};
pub use freeze::{freeze, freezer_args};
pub use launcher::{render_launcher, write_launcher};
pub use package::{acquire_packager, package, verify, VerifiedArtifact};
pub use stage::stage;
