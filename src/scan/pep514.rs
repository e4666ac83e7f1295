//! PEP 514 interpreter registrations under `SOFTWARE\Python\PythonCore`.

use crate::error::{InventoryError, Result};
use crate::path::display_path;
use crate::registry::{RegistryAccessor, RegistryKey, PEP514_ROOT};
use crate::view::RegistryView;
use serde::Serialize;
use tracing::{debug, instrument, trace};

/// Company key used by the python.org distribution.
pub const PYTHON_CORE: &str = "PythonCore";

/// Subkey holding the installation directory as its default value.
pub const INSTALL_PATH_KEY: &str = "InstallPath";

/// A `PythonCore\<tag>` registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pep514Entry {
    /// `DisplayName` value of the tag key.
    pub display_name: Option<String>,
    /// Default value of `InstallPath`; empty when the subkey is absent.
    pub install_path: String,
    /// Registry path of the tag key.
    pub registry_path: String,
}

/// Lazily yields the `PythonCore` tags of one view.
pub struct Pep514Entries<K> {
    company: Option<K>,
    tags: std::vec::IntoIter<String>,
}

/// Starts a scan of the PEP 514 registrations visible through `view`.
///
/// Other companies under `SOFTWARE\Python` are ignored.
///
/// # Errors
///
/// Returns [`InventoryError::MissingRoot`] when `SOFTWARE\Python` does not
/// exist in the view, which is common and should be handled per view.
#[instrument(skip(accessor), fields(view = %view))]
pub fn scan_pep514<A: RegistryAccessor>(
    accessor: &A,
    view: RegistryView,
) -> Result<Pep514Entries<A::Key>> {
    let root = accessor
        .open_root(view, PEP514_ROOT)?
        .ok_or_else(|| InventoryError::missing_root(view, PEP514_ROOT))?;

    let mut company = None;
    for name in root.subkey_names()? {
        if name != PYTHON_CORE {
            trace!(company = %name, "Skipping company");
            continue;
        }
        company = root.open_subkey(&name)?;
    }

    let tags = match &company {
        Some(key) => key.subkey_names()?,
        None => Vec::new(),
    };
    debug!(count = tags.len(), "Enumerating PythonCore tags");

    Ok(Pep514Entries {
        company,
        tags: tags.into_iter(),
    })
}

fn read_install_path<K: RegistryKey>(tag: &K) -> Result<String> {
    match tag.open_subkey(INSTALL_PATH_KEY)? {
        Some(key) => Ok(key.read_string("")?.unwrap_or_default()),
        None => Ok(String::new()),
    }
}

fn read_entry<K: RegistryKey>(company: &K, name: &str) -> Result<Option<Pep514Entry>> {
    let Some(tag) = company.open_subkey(name)? else {
        trace!(tag = name, "Tag disappeared during scan");
        return Ok(None);
    };

    let display_name = tag.read_string("DisplayName")?;
    let install_path = read_install_path(&tag)?;
    let registry_path = display_path(&tag.kernel_path()?)?;
    debug!(tag = name, path = %registry_path, "Found PythonCore tag");

    Ok(Some(Pep514Entry {
        display_name,
        install_path,
        registry_path,
    }))
}

impl<K: RegistryKey> Iterator for Pep514Entries<K> {
    type Item = Result<Pep514Entry>;

    fn next(&mut self) -> Option<Self::Item> {
        let company = self.company.as_ref()?;
        while let Some(name) = self.tags.next() {
            match read_entry(company, &name) {
                Ok(Some(entry)) => return Some(Ok(entry)),
                Ok(None) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
        None
    }
}
