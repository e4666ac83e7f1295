//! # Python on Windows Inventory
//!
//! Finds the Python interpreters a Windows machine knows about and explains
//! where each one was found. Machines collect overlapping, stale and
//! half-removed installations; this crate lists them side by side so the
//! leftovers stand out.
//!
//! ## Discovery channels
//!
//! - **Uninstall records**: `SOFTWARE\Microsoft\Windows\CurrentVersion\Uninstall`
//!   entries whose `Publisher` is exactly `Python Software Foundation`
//! - **PEP 514**: tags under `SOFTWARE\Python\PythonCore`
//! - **Store packages**: `PythonSoftwareFoundation*` folders in
//!   `%ProgramFiles%\WindowsApps` (requires elevation)
//! - **PATH**: Python-named directories holding `python.exe` or pip launchers
//!
//! The registry channels are scanned for the per-user hive and for both
//! WOW64 views of the machine hive.
//!
//! ## Registry paths
//!
//! Each registry record is reported by its canonical location, taken from
//! the kernel rather than from the path used to open it, so a 32-bit view
//! shows up as `WOW6432Node` and per-user keys resolve through their SID:
//!
//! ```text
//! open handle
//!   -> NtQueryKey(KeyNameInformation)   \REGISTRY\USER\S-1-5-21-...\SOFTWARE\Python\PythonCore\3.12
//!   -> to_friendly_path                 HKEY_USERS\S-1-5-21-...\SOFTWARE\Python\PythonCore\3.12
//!   -> normalize_to_current_user        HKEY_CURRENT_USER\SOFTWARE\Python\PythonCore\3.12
//! ```
//!
//! ## Examples
//!
//! ```rust
//! use pywin_inventory::registry::{MemoryKey, MemoryRegistry};
//! use pywin_inventory::scan::scan_pep514;
//! use pywin_inventory::view::RegistryView;
//!
//! # fn main() -> pywin_inventory::Result<()> {
//! let registry = MemoryRegistry::new().with_view(
//!     RegistryView::current_user(),
//!     r"\REGISTRY\USER\S-1-5-21-1000",
//!     MemoryKey::new().with_subkey(
//!         "SOFTWARE",
//!         MemoryKey::new().with_subkey(
//!             "Python",
//!             MemoryKey::new().with_subkey(
//!                 "PythonCore",
//!                 MemoryKey::new().with_subkey(
//!                     "3.12",
//!                     MemoryKey::new().with_value("DisplayName", "Python 3.12 (64-bit)"),
//!                 ),
//!             ),
//!         ),
//!     ),
//! );
//!
//! for entry in scan_pep514(&registry, RegistryView::current_user())? {
//!     let entry = entry?;
//!     assert_eq!(entry.registry_path, r"HKEY_CURRENT_USER\SOFTWARE\Python\PythonCore\3.12");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! On Windows, swap the in-memory registry for `registry::WinRegistry`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod inventory;
pub mod kernel;
pub mod path;
pub mod registry;
pub mod report;
pub mod scan;
pub mod utils;
pub mod view;

pub use config::ScanConfig;
pub use error::{InventoryError, QueryPhase, Result};
pub use inventory::{collect, Inventory, StoreSection, ViewSection};
pub use kernel::{resolve_kernel_path, KeyNameQuery};
pub use path::{normalize_to_current_user, to_friendly_path};
pub use registry::{RegistryAccessor, RegistryKey};
pub use scan::{PathEntry, Pep514Entry, StorePackageEntry, UninstallEntry};
pub use view::{Bitness, Hive, RegistryView};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
