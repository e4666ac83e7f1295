//! Runs every discovery channel and gathers the results for rendering.
//!
//! Failures are scoped: a view whose root key is missing, or a Store
//! directory the process may not list, becomes a single warning on that
//! section while the rest of the report carries on. Only kernel contract
//! violations ([`InventoryError::is_fatal`]) abort the run.

use crate::config::ScanConfig;
use crate::error::{InventoryError, Result};
use crate::registry::RegistryAccessor;
use crate::scan::{
    scan_path, scan_pep514, scan_store_packages, scan_uninstall_entries, PathEntry, Pep514Entry,
    StorePackageEntry, UninstallEntry,
};
use crate::view::RegistryView;
use serde::Serialize;
use tracing::{info, instrument, warn};

/// Entries found through one registry view.
#[derive(Debug, Clone, Serialize)]
pub struct ViewSection<T> {
    /// View scanned.
    pub view: RegistryView,
    /// Entries in registry enumeration order.
    pub entries: Vec<T>,
    /// Why the view ended early, if it did.
    pub warning: Option<String>,
}

impl<T> ViewSection<T> {
    fn new(view: RegistryView) -> Self {
        Self {
            view,
            entries: Vec::new(),
            warning: None,
        }
    }
}

/// Result of the Store channel.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StoreSection {
    /// Packages found.
    pub packages: Vec<StorePackageEntry>,
    /// Why the channel produced nothing, if it failed.
    pub warning: Option<String>,
}

/// Everything one run discovered.
#[derive(Debug, Clone, Serialize)]
pub struct Inventory {
    /// RFC 3339 timestamp of the run.
    pub generated_at: String,
    /// Uninstall records per view.
    pub uninstall: Vec<ViewSection<UninstallEntry>>,
    /// PEP 514 registrations per view.
    pub pep514: Vec<ViewSection<Pep514Entry>>,
    /// Store packages.
    pub store: StoreSection,
    /// PATH directories.
    pub path: Vec<PathEntry>,
}

impl Inventory {
    /// Number of discovered records across all channels.
    pub fn total_entries(&self) -> usize {
        self.uninstall.iter().map(|s| s.entries.len()).sum::<usize>()
            + self.pep514.iter().map(|s| s.entries.len()).sum::<usize>()
            + self.store.packages.len()
            + self.path.len()
    }
}

fn absorb<T>(mut section: ViewSection<T>, err: InventoryError) -> Result<ViewSection<T>> {
    if err.is_fatal() {
        return Err(err);
    }
    warn!(view = %section.view, error = %err, "View scan ended early");
    section.warning = Some(err.to_string());
    Ok(section)
}

fn collect_view<T, I>(view: RegistryView, scan: Result<I>) -> Result<ViewSection<T>>
where
    I: Iterator<Item = Result<T>>,
{
    let mut section = ViewSection::new(view);
    let entries = match scan {
        Ok(entries) => entries,
        Err(e) => return absorb(section, e),
    };

    for entry in entries {
        match entry {
            Ok(entry) => section.entries.push(entry),
            Err(e) => return absorb(section, e),
        }
    }
    Ok(section)
}

/// Runs the Store channel; never fails the run.
pub fn collect_store(config: &ScanConfig) -> StoreSection {
    let Some(dir) = &config.windows_apps_dir else {
        return StoreSection {
            packages: Vec::new(),
            warning: Some("Store package scan is only available on Windows".to_string()),
        };
    };

    store_section(scan_store_packages(dir))
}

/// Turns the outcome of a Store scan into its report section.
pub fn store_section<I>(scan: Result<I>) -> StoreSection
where
    I: IntoIterator<Item = StorePackageEntry>,
{
    match scan {
        Ok(packages) => StoreSection {
            packages: packages.into_iter().collect(),
            warning: None,
        },
        Err(e) => {
            warn!(error = %e, "Store package scan failed");
            let warning = match e {
                InventoryError::PermissionDenied { .. } => {
                    format!("{}; run as administrator to list Store packages", e)
                }
                _ => e.to_string(),
            };
            StoreSection {
                packages: Vec::new(),
                warning: Some(warning),
            }
        }
    }
}

/// Collects the full inventory.
///
/// # Errors
///
/// Only fatal errors are returned; see the module documentation.
#[instrument(skip_all)]
pub fn collect<A: RegistryAccessor>(accessor: &A, config: &ScanConfig) -> Result<Inventory> {
    let views = RegistryView::standard();

    let uninstall = views
        .iter()
        .map(|&view| collect_view(view, scan_uninstall_entries(accessor, view)))
        .collect::<Result<Vec<_>>>()?;

    let pep514 = views
        .iter()
        .map(|&view| collect_view(view, scan_pep514(accessor, view)))
        .collect::<Result<Vec<_>>>()?;

    let store = collect_store(config);
    let path = scan_path(&config.search_path);

    let inventory = Inventory {
        generated_at: chrono::Local::now().to_rfc3339(),
        uninstall,
        pep514,
        store,
        path,
    };
    info!(entries = inventory.total_entries(), "Inventory collected");
    Ok(inventory)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn package() -> StorePackageEntry {
        StorePackageEntry {
            display_name: "Python 3.12".to_string(),
            package_identifier: "PythonSoftwareFoundation.Python.3.12".to_string(),
            package_version: "3.12.2032.0".to_string(),
        }
    }

    #[test]
    fn test_store_section_permission_denied() {
        let scan: Result<Vec<StorePackageEntry>> = Err(InventoryError::PermissionDenied {
            path: PathBuf::from(r"C:\Program Files\WindowsApps"),
        });

        let section = store_section(scan);

        assert!(section.packages.is_empty());
        let warning = section.warning.unwrap();
        assert!(warning.contains("run as administrator"));
        assert!(warning.contains("WindowsApps"));
    }

    #[test]
    fn test_store_section_other_error_has_no_hint() {
        let scan: Result<Vec<StorePackageEntry>> =
            Err(std::io::Error::from(std::io::ErrorKind::NotFound).into());

        let warning = store_section(scan).warning.unwrap();
        assert!(!warning.contains("administrator"));
    }

    #[test]
    fn test_store_section_success() {
        let section = store_section(Ok(vec![package()]));
        assert_eq!(section.packages, vec![package()]);
        assert!(section.warning.is_none());
    }
}
