//! Error types for inventory scans.
//!
//! Only kernel-contract violations are fatal to a whole run (see
//! [`InventoryError::is_fatal`]); everything else is scoped to the view or
//! channel that hit it.

use crate::view::RegistryView;
use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for inventory operations.
pub type Result<T> = std::result::Result<T, InventoryError>;

/// Which half of the two-phase key name query failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryPhase {
    /// Zero-length probe for the required buffer size.
    Probe,
    /// Second call that fills the sized buffer.
    Fetch,
}

impl fmt::Display for QueryPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryPhase::Probe => f.write_str("probe"),
            QueryPhase::Fetch => f.write_str("fetch"),
        }
    }
}

/// Errors that can occur while collecting the inventory.
#[derive(Error, Debug)]
pub enum InventoryError {
    /// Filesystem I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A registry call failed for a reason other than "not found".
    #[error("Registry error at {path}: {source}")]
    Registry {
        /// Key or value being accessed.
        path: String,
        /// Underlying OS error.
        source: io::Error,
    },

    /// `NtQueryKey` returned a status outside the expected protocol.
    #[error("Key name query ({phase}) returned unexpected status {status:#010x}")]
    Resolution {
        /// Phase that failed.
        phase: QueryPhase,
        /// Raw NTSTATUS.
        status: i32,
    },

    /// The `KEY_NAME_INFORMATION` buffer could not be decoded.
    #[error("Invalid key name information: {0}")]
    InvalidKeyName(String),

    /// Kernel object path under neither `MACHINE` nor `USER`.
    #[error("Cannot parse object name: {0:?}")]
    UnrecognizedPath(String),

    /// Scan root key absent for this view.
    #[error("{path} not present in {view} view")]
    MissingRoot {
        /// View that was opened.
        view: RegistryView,
        /// Root key path relative to the hive.
        path: String,
    },

    /// The Store apps directory needs elevation.
    #[error("Permission denied reading {}", path.display())]
    PermissionDenied {
        /// Directory that could not be listed.
        path: PathBuf,
    },

    /// AppX manifest was not well-formed XML.
    #[error("Malformed manifest: {0}")]
    Manifest(String),

    /// Report export could not be serialized.
    #[error("Export error: {0}")]
    Export(#[from] serde_json::Error),
}

impl InventoryError {
    /// Creates a resolution error for an unexpected NTSTATUS.
    pub fn resolution(phase: QueryPhase, status: i32) -> Self {
        Self::Resolution { phase, status }
    }

    /// Creates a registry error with the key path for context.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use pywin_inventory::error::InventoryError;
    /// let err = InventoryError::registry(
    ///     r"SOFTWARE\Python",
    ///     std::io::Error::from(std::io::ErrorKind::Other),
    /// );
    /// assert!(!err.is_fatal());
    /// ```
    pub fn registry(path: impl Into<String>, source: io::Error) -> Self {
        Self::Registry {
            path: path.into(),
            source,
        }
    }

    /// Creates a missing-root error.
    pub fn missing_root(view: RegistryView, path: &str) -> Self {
        Self::MissingRoot {
            view,
            path: path.to_string(),
        }
    }

    /// True for kernel API contract violations that must end the run.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Resolution { .. } | Self::InvalidKeyName(_) | Self::UnrecognizedPath(_)
        )
    }
}
