use std::fs;
use std::path::Path;
use std::time::Duration;

use tracing::debug;

use crate::services::pipeline::{BuildError, BuildResult};

const DOWNLOAD_TIMEOUT_SECS: u64 = 300;
const CONNECT_TIMEOUT_SECS: u64 = 30;
const USER_AGENT_STRING: &str = concat!("appimage-assembler/", env!("CARGO_PKG_VERSION"));

/// Downloads a single file. Implemented over HTTP in production and by
/// recording fakes in tests.
pub trait Fetcher {
    /// Write the body found at `url` to `dest`, replacing any existing file.
    fn fetch(&self, url: &str, dest: &Path) -> BuildResult<()>;
}

/// Blocking HTTP fetcher; quiet, follows redirects, fails on non-2xx.
#[derive(Debug, Default)]
pub struct HttpFetcher;

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str, dest: &Path) -> BuildResult<()> {
        let fail = |reason: String| BuildError::Fetch { url: url.to_string(), reason };

        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT_STRING)
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(DOWNLOAD_TIMEOUT_SECS))
            .build()
            .map_err(|e| fail(format!("failed to build HTTP client: {e}")))?;

        debug!("Downloading {} -> {}", url, dest.display());
        let mut response = client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| fail(e.to_string()))?;

        let mut file = fs::File::create(dest)
            .map_err(|e| BuildError::io(format!("Failed to create {}", dest.display()), e))?;
        let written = response.copy_to(&mut file).map_err(|e| fail(e.to_string()))?;
        debug!("Downloaded {} bytes from {}", written, url);
        Ok(())
    }
}
