#![cfg(unix)]

mod common;

use std::fs;

use appdir_core::services::steps::acquire_packager;
use appdir_core::{BuildConfig, BuildError, BuildLayout};
use common::RecordingFetcher;
use tempfile::tempdir;

#[test]
fn cached_packager_is_not_fetched_again() {
    let temp = tempdir().unwrap();
    let config = BuildConfig::default();
    let layout = BuildLayout::new(temp.path(), &config);
    fs::write(&layout.packager_path, "cached tool").unwrap();
    let fetcher = RecordingFetcher::serving("fresh tool");

    let fetched = acquire_packager(&config, &layout, &fetcher).unwrap();

    assert!(!fetched);
    assert_eq!(fetcher.call_count(), 0);
    assert_eq!(fs::read_to_string(&layout.packager_path).unwrap(), "cached tool");
    // A cached copy without execute bits is fixed up.
    assert_eq!(common::mode(&layout.packager_path) & 0o111, 0o111);
}

#[test]
fn missing_packager_is_fetched_once_and_made_executable() {
    let temp = tempdir().unwrap();
    let mut config = BuildConfig::default();
    config.tools.packager_url = "https://mirror.example/appimagetool".into();
    let layout = BuildLayout::new(temp.path(), &config);
    let fetcher = RecordingFetcher::serving("#!/bin/sh\nexit 0\n");

    assert!(acquire_packager(&config, &layout, &fetcher).unwrap());
    assert!(!acquire_packager(&config, &layout, &fetcher).unwrap());

    let calls = fetcher.calls.borrow();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "https://mirror.example/appimagetool");
    assert_ne!(calls[0].1, layout.packager_path, "download goes to a temporary name first");
    assert_eq!(fs::read_to_string(&layout.packager_path).unwrap(), "#!/bin/sh\nexit 0\n");
    assert_eq!(common::mode(&layout.packager_path) & 0o111, 0o111);
}

#[test]
fn failed_fetch_leaves_no_packager_behind() {
    let temp = tempdir().unwrap();
    let config = BuildConfig::default();
    let layout = BuildLayout::new(temp.path(), &config);
    let fetcher = RecordingFetcher::failing();

    let err = acquire_packager(&config, &layout, &fetcher).unwrap_err();

    assert!(matches!(err, BuildError::Fetch { .. }), "unexpected error: {err:?}");
    assert_eq!(err.exit_code(), 1);
    assert!(!layout.packager_path.exists());
    let leftovers: Vec<_> = fs::read_dir(temp.path()).unwrap().collect();
    assert!(leftovers.is_empty(), "partial download left behind: {leftovers:?}");
}
