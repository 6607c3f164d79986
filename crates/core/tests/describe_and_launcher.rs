#![cfg(unix)]

mod common;

use std::fs;
use std::process::Command;

use appdir_core::services::steps::{describe, render_desktop_entry, write_launcher};
use appdir_core::{BuildConfig, BuildLayout};
use tempfile::tempdir;

#[test]
fn descriptor_copies_are_byte_identical() {
    let temp = tempdir().unwrap();
    let config = BuildConfig {
        app_name: "Caviardage Ünicode".into(),
        comment: "Outil de caviardage".into(),
        ..BuildConfig::default()
    };
    let layout = BuildLayout::new(temp.path(), &config);

    describe(&config, &layout).unwrap();

    let share = fs::read(&layout.desktop_share_path).unwrap();
    let root = fs::read(&layout.desktop_root_path).unwrap();
    assert_eq!(share, root);
    assert_eq!(share, render_desktop_entry(&config).into_bytes());
    assert!(layout.desktop_share_path.ends_with("usr/share/applications/blackoutpdf.desktop"));
}

#[test]
fn describe_overwrites_stale_descriptors() {
    let temp = tempdir().unwrap();
    let config = BuildConfig::default();
    let layout = BuildLayout::new(temp.path(), &config);
    fs::create_dir_all(&layout.app_applications_dir).unwrap();
    fs::write(&layout.desktop_root_path, "[Desktop Entry]\nName=Old\n").unwrap();

    describe(&config, &layout).unwrap();

    let body = fs::read_to_string(&layout.desktop_root_path).unwrap();
    assert!(body.contains("Name=BlackOutPDF\n"));
    assert!(!body.contains("Name=Old"));
}

#[test]
fn launcher_is_executable_for_everyone() {
    let temp = tempdir().unwrap();
    let config = BuildConfig::default();
    let layout = BuildLayout::new(temp.path(), &config);

    write_launcher(&config, &layout).unwrap();

    assert_eq!(common::mode(&layout.launcher_path) & 0o111, 0o111);
    assert!(appdir_core::util::is_executable(&layout.launcher_path));
}

#[cfg(target_os = "linux")]
#[test]
fn launcher_follows_symlinks_and_forwards_arguments() {
    let temp = tempdir().unwrap();
    let config = BuildConfig::default();
    let layout = BuildLayout::new(temp.path().join("root"), &config);
    let out = temp.path().join("invocation.txt");

    // Fake frozen binary: report the args it got and whether usr/bin leads PATH.
    common::write_script(
        &layout.staged_binary,
        &format!(
            "#!/bin/sh\nprintf '%s|' \"$@\" > '{out}'\ncase \"$PATH\" in \"$(dirname \"$0\")\"*) echo first >> '{out}' ;; esac\n",
            out = out.display()
        ),
    );
    write_launcher(&config, &layout).unwrap();

    let link = temp.path().join("blackoutpdf");
    std::os::unix::fs::symlink(&layout.launcher_path, &link).unwrap();

    let status = Command::new(&link).args(["a b", "--flag", ""]).status().unwrap();
    assert!(status.success());

    let recorded = fs::read_to_string(&out).unwrap();
    assert_eq!(recorded, "a b|--flag||first\n");
}
