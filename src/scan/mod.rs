//! Discovery channels.
//!
//! Registry scanners return lazy iterators that can be restarted by calling
//! the scan function again; the PATH scan is materialized up front because
//! deduplication needs the whole list.

pub mod pep514;
pub mod search_path;
pub mod store;
pub mod uninstall;

pub use pep514::{scan_pep514, Pep514Entries, Pep514Entry};
pub use search_path::{dedup_by_final_segment, scan_path, PathEntry};
pub use store::{parse_manifest, scan_store_packages, StorePackageEntry, StorePackages};
pub use uninstall::{scan_uninstall_entries, UninstallEntries, UninstallEntry};
