//! Inputs of a run, gathered from the environment.
//!
//! The tool takes no arguments and reads no configuration files; every
//! ambient input is captured here once so scans can be driven from tests
//! without touching the process environment.

use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

/// Default JSON export written next to the working directory.
pub const DEFAULT_EXPORT_FILE: &str = "pywin-inventory.json";

/// Fallback when `%ProgramFiles%` is not set.
pub const DEFAULT_PROGRAM_FILES: &str = r"C:\Program Files";

/// Settings for one inventory run.
#[derive(Debug, Clone, Default)]
pub struct ScanConfig {
    /// PATH-style search list to inspect.
    pub search_path: OsString,
    /// Store apps directory; `None` skips the Store channel.
    pub windows_apps_dir: Option<PathBuf>,
    /// Where to write the JSON export; `None` disables it.
    pub export_path: Option<PathBuf>,
    /// Emit ANSI colors on the console.
    pub color: bool,
}

impl ScanConfig {
    /// A configuration that only scans `search_path`.
    pub fn new(search_path: impl Into<OsString>) -> Self {
        Self {
            search_path: search_path.into(),
            ..Self::default()
        }
    }

    /// Sets the Store apps directory.
    pub fn with_windows_apps_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.windows_apps_dir = Some(dir.into());
        self
    }

    /// Sets the JSON export path.
    pub fn with_export_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.export_path = Some(path.into());
        self
    }

    /// Reads `PATH`, `ProgramFiles` and `NO_COLOR`.
    ///
    /// The Store channel is only configured on Windows.
    pub fn from_env() -> Self {
        Self {
            search_path: env::var_os("PATH").unwrap_or_default(),
            windows_apps_dir: cfg!(windows).then(|| windows_apps_dir(env::var_os("ProgramFiles"))),
            export_path: Some(PathBuf::from(DEFAULT_EXPORT_FILE)),
            color: env::var_os("NO_COLOR").is_none(),
        }
    }
}

/// `<ProgramFiles>\WindowsApps`.
pub fn windows_apps_dir(program_files: Option<OsString>) -> PathBuf {
    PathBuf::from(program_files.unwrap_or_else(|| DEFAULT_PROGRAM_FILES.into())).join("WindowsApps")
}
