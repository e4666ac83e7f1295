//! Uninstall records published by the Python Software Foundation.

use crate::error::{InventoryError, Result};
use crate::path::display_path;
use crate::registry::{RegistryAccessor, RegistryKey, UNINSTALL_ROOT};
use crate::view::RegistryView;
use serde::Serialize;
use tracing::{debug, instrument, trace};

/// Publisher string the python.org installers write. Compared exactly.
pub const PSF_PUBLISHER: &str = "Python Software Foundation";

/// An uninstall record written by a python.org installer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UninstallEntry {
    /// `DisplayName` value.
    pub display_name: Option<String>,
    /// `InstallSource` value.
    pub install_source: Option<String>,
    /// Registry path of the record, `HKEY_USERS\<SID>` folded into `HKEY_CURRENT_USER`.
    pub registry_path: String,
}

/// Lazily yields the PSF uninstall records of one view.
///
/// Subkey names are captured when the scan starts; each record is opened,
/// read and closed as the iterator advances.
pub struct UninstallEntries<K> {
    root: K,
    names: std::vec::IntoIter<String>,
}

/// Starts a scan of the uninstall records visible through `view`.
///
/// # Errors
///
/// Returns [`InventoryError::MissingRoot`] when the view has no uninstall
/// root; callers decide whether that view is expected to be absent.
#[instrument(skip(accessor), fields(view = %view))]
pub fn scan_uninstall_entries<A: RegistryAccessor>(
    accessor: &A,
    view: RegistryView,
) -> Result<UninstallEntries<A::Key>> {
    let root = accessor
        .open_root(view, UNINSTALL_ROOT)?
        .ok_or_else(|| InventoryError::missing_root(view, UNINSTALL_ROOT))?;
    let names = root.subkey_names()?;
    debug!(count = names.len(), "Enumerating uninstall records");

    Ok(UninstallEntries {
        root,
        names: names.into_iter(),
    })
}

fn read_entry<K: RegistryKey>(root: &K, name: &str) -> Result<Option<UninstallEntry>> {
    let Some(app) = root.open_subkey(name)? else {
        trace!(name, "Uninstall record disappeared during scan");
        return Ok(None);
    };

    let publisher = app.read_string("Publisher")?;
    let display_name = app.read_string("DisplayName")?;
    let install_source = app.read_string("InstallSource")?;

    if publisher.as_deref() != Some(PSF_PUBLISHER) {
        return Ok(None);
    }

    let registry_path = display_path(&app.kernel_path()?)?;
    debug!(name, path = %registry_path, "Found PSF uninstall record");

    Ok(Some(UninstallEntry {
        display_name,
        install_source,
        registry_path,
    }))
}

impl<K: RegistryKey> Iterator for UninstallEntries<K> {
    type Item = Result<UninstallEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(name) = self.names.next() {
            match read_entry(&self.root, &name) {
                Ok(Some(entry)) => return Some(Ok(entry)),
                Ok(None) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
        None
    }
}
