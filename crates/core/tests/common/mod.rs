#![allow(dead_code)]

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use appdir_core::{BuildConfig, BuildError, BuildResult, Fetcher};

/// Freezer stand-in: records its arguments, writes `<distpath>/<name>` and a
/// stray `<name>.spec` in the working directory.
pub const FREEZER_OK: &str = r#"#!/bin/sh
printf '%s\n' "$@" > freezer-args.txt
dist=""
name=""
while [ $# -gt 0 ]; do
  case "$1" in
    --distpath) dist="$2"; shift 2 ;;
    --name) name="$2"; shift 2 ;;
    *) shift ;;
  esac
done
mkdir -p "$dist" || exit 1
printf 'frozen-binary' > "$dist/$name"
chmod +x "$dist/$name"
touch "$name.spec"
"#;

pub const FREEZER_FAIL: &str = "#!/bin/sh\necho 'freezer exploded' >&2\nexit 7\n";

/// Packager stand-in that checks the AppDir entry points before writing the artifact.
pub const PACKAGER_OK: &str = r#"#!/bin/sh
[ -x "$1/AppRun" ] || exit 3
[ -f "$1/blackoutpdf.desktop" ] || exit 4
[ -f "$1/logo.png" ] || exit 5
printf 'appimage-for-%s' "$ARCH" > "$2"
"#;

/// Writes the artifact, then occupies the report path with a directory.
pub const PACKAGER_BLOCKS_REPORT: &str = r#"#!/bin/sh
printf 'appimage-for-%s' "$ARCH" > "$2"
mkdir -p build-report.json
"#;

/// Leaves a partial artifact behind and fails.
pub const PACKAGER_FAIL: &str = "#!/bin/sh\nprintf 'partial' > \"$2\"\nexit 1\n";

/// Claims success without producing anything.
pub const PACKAGER_SILENT: &str = "#!/bin/sh\nexit 0\n";

/// Write the application sources a build expects in its root.
pub fn write_sources(root: &Path) {
    fs::write(root.join("BOPDF.py"), "print('BlackOutPDF')\n").unwrap();
    fs::write(root.join("logo.png"), [0x89, b'P', b'N', b'G', 0, 1, 2, 3]).unwrap();
    fs::create_dir_all(root.join("icons/extra")).unwrap();
    fs::write(root.join("icons/folder.svg"), "<svg id=\"folder\"/>").unwrap();
    fs::write(root.join("icons/lock.svg"), "<svg id=\"lock\"/>").unwrap();
    fs::write(root.join("icons/extra/moon.svg"), "<svg id=\"moon\"/>").unwrap();
}

/// Write an executable shell script.
pub fn write_script(path: &Path, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, body).unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
    path.to_path_buf()
}

/// Default config pointing at a stub freezer.
pub fn config_with_freezer(freezer: &Path) -> BuildConfig {
    let mut config = BuildConfig::default();
    config.tools.freezer = freezer.to_string_lossy().to_string();
    config
}

pub fn mode(path: &Path) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(path).unwrap().permissions().mode() & 0o777
}

/// Fetcher that records every call and serves a fixed body, or fails.
#[derive(Default)]
pub struct RecordingFetcher {
    pub calls: RefCell<Vec<(String, PathBuf)>>,
    pub body: Option<Vec<u8>>,
}

impl RecordingFetcher {
    pub fn serving(body: &str) -> Self {
        Self { calls: RefCell::default(), body: Some(body.as_bytes().to_vec()) }
    }

    pub fn failing() -> Self {
        Self::default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl Fetcher for RecordingFetcher {
    fn fetch(&self, url: &str, dest: &Path) -> BuildResult<()> {
        self.calls.borrow_mut().push((url.to_string(), dest.to_path_buf()));
        match &self.body {
            Some(body) => {
                fs::write(dest, body).map_err(|e| BuildError::io("fake fetch write", e))
            }
            None => {
                // Simulate a download that died midway.
                let _ = fs::write(dest, b"trunc");
                Err(BuildError::Fetch { url: url.to_string(), reason: "connection reset".into() })
            }
        }
    }
}
