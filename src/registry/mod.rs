//! Registry access behind a narrow trait.
//!
//! Scanners are written against [`RegistryAccessor`] and [`RegistryKey`] so
//! they can walk either the live registry ([`windows::WinRegistry`], Windows
//! only) or an in-memory tree ([`memory::MemoryRegistry`]).
//!
//! Absence is a first-class result: a missing subkey or value comes back as
//! `Ok(None)`, never as an error the caller has to catch.

use crate::error::Result;
use crate::view::RegistryView;

pub mod memory;
#[cfg(windows)]
pub mod windows;

pub use memory::{MemoryKey, MemoryRegistry};
#[cfg(windows)]
pub use self::windows::WinRegistry;

/// Uninstall records root, relative to the hive.
pub const UNINSTALL_ROOT: &str = r"SOFTWARE\Microsoft\Windows\CurrentVersion\Uninstall";

/// PEP 514 registration root, relative to the hive.
pub const PEP514_ROOT: &str = r"SOFTWARE\Python";

/// Opens root keys for a given view.
pub trait RegistryAccessor {
    /// Open key type; closing happens on `Drop`.
    type Key: RegistryKey;

    /// Opens `path` beneath the view's hive with `KEY_READ` plus the view's
    /// WOW64 flag. Returns `Ok(None)` when the key does not exist.
    fn open_root(&self, view: RegistryView, path: &str) -> Result<Option<Self::Key>>;
}

/// An open registry key.
pub trait RegistryKey: Sized {
    /// Names of the immediate subkeys, in the registry's enumeration order.
    fn subkey_names(&self) -> Result<Vec<String>>;

    /// Opens an immediate subkey; `Ok(None)` when it does not exist.
    fn open_subkey(&self, name: &str) -> Result<Option<Self>>;

    /// Reads a string value; `""` names the default value. Absent values and
    /// values of a non-string type are `Ok(None)`.
    fn read_string(&self, name: &str) -> Result<Option<String>>;

    /// Kernel object path of this key (`\REGISTRY\...`).
    fn kernel_path(&self) -> Result<String>;
}
