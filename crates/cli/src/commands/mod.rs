pub mod build;
pub mod clean;
pub mod config;

pub use build::*;
pub use clean::*;
pub use config::*;
