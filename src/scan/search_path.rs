//! Python-named directories on the executable search path.

use serde::Serialize;
use std::collections::HashSet;
use std::env;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument, warn};

/// Folder name of a Python installation's script launchers.
pub const SCRIPTS_DIR: &str = "Scripts";

/// Interpreter executable looked for in non-`Scripts` directories.
pub const PYTHON_EXE: &str = "python.exe";

/// Prefix of the pip launchers in a `Scripts` directory.
pub const PIP_PREFIX: &str = "pip";

/// A search-path directory that looks like it belongs to Python.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathEntry {
    /// Directory as written in the search path.
    pub directory: PathBuf,
    /// Whether the directory exists on disk.
    pub exists: bool,
}

fn has_pip_launcher(dir: &Path) -> bool {
    match fs::read_dir(dir) {
        Ok(entries) => entries.filter_map(|e| e.ok()).any(|e| {
            e.file_name().to_string_lossy().starts_with(PIP_PREFIX) && e.path().is_file()
        }),
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "Cannot list Scripts directory");
            false
        }
    }
}

/// Scans a PATH-style value for Python directories.
///
/// `search_path` is split with the platform separator. Only segments that
/// contain `python` (any case) are considered:
///
/// - a missing directory is reported with `exists == false`;
/// - a directory named `Scripts` is reported when it holds a `pip*` file;
/// - any other directory is reported when `python.exe` is directly inside.
///
/// The result is deduplicated with [`dedup_by_final_segment`].
#[instrument(skip(search_path))]
pub fn scan_path(search_path: &OsStr) -> Vec<PathEntry> {
    let mut found = Vec::new();

    for directory in env::split_paths(search_path) {
        if !directory.to_string_lossy().to_lowercase().contains("python") {
            continue;
        }

        if !directory.exists() {
            debug!(dir = %directory.display(), "Search path entry does not exist");
            found.push(PathEntry {
                directory,
                exists: false,
            });
            continue;
        }

        let present = if directory.file_name() == Some(OsStr::new(SCRIPTS_DIR)) {
            // Every launcher names the same parent, which dedup collapses to one.
            has_pip_launcher(&directory)
        } else {
            directory.join(PYTHON_EXE).is_file()
        };

        if present {
            found.push(PathEntry {
                directory,
                exists: true,
            });
        }
    }

    dedup_by_final_segment(found)
}

/// Keeps the first entry for every final path component name.
///
/// Later entries with the same last component are dropped even when their
/// full paths or existence differ, so a second `...\Scripts` never shows.
pub fn dedup_by_final_segment(entries: Vec<PathEntry>) -> Vec<PathEntry> {
    let mut seen: HashSet<OsString> = HashSet::new();
    entries
        .into_iter()
        .filter(|entry| {
            let name = entry
                .directory
                .file_name()
                .map(OsStr::to_os_string)
                .unwrap_or_default();
            seen.insert(name)
        })
        .collect()
}
