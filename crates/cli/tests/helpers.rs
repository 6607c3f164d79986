use std::path::Path;

use appimage_assembler::{canonicalize_or_current, exit_code_for};
use appdir_core::BuildError;
use tempfile::tempdir;

#[test]
fn canonicalize_or_current_returns_cwd_for_dot() {
    let result = canonicalize_or_current(".").expect("canonicalize");
    assert_eq!(result, std::env::current_dir().expect("cwd"));
}

#[test]
fn canonicalize_or_current_resolves_existing_path() {
    let tmp = tempdir().expect("tempdir");
    let subdir = tmp.path().join("nested");
    std::fs::create_dir_all(&subdir).expect("create nested");

    let result = canonicalize_or_current(subdir.to_str().unwrap()).expect("canonicalize nested");
    assert_eq!(result, subdir.canonicalize().expect("canonicalize subdir"));
}

#[test]
fn canonicalize_or_current_joins_missing_relative_path() {
    let result = canonicalize_or_current("does/not/exist").expect("join");
    assert!(result.is_absolute());
    assert!(result.ends_with(Path::new("does/not/exist")));
}

#[test]
fn exit_code_distinguishes_missing_artifact() {
    let missing = anyhow::Error::new(BuildError::ArtifactMissing("x.AppImage".into()));
    assert_eq!(exit_code_for(&missing), 2);

    let aborted = anyhow::Error::new(BuildError::InvalidConfig("bad".into()))
        .context("Failed to resolve build config");
    assert_eq!(exit_code_for(&aborted), 1);

    assert_eq!(exit_code_for(&anyhow::anyhow!("plain failure")), 1);
}
