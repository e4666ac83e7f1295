//! Microsoft Store (AppX) packages published by the Python Software Foundation.
//!
//! Each package folder under `%ProgramFiles%\WindowsApps` carries an
//! `AppxManifest.xml`. The fields used here live in the foundation
//! namespace:
//!
//! ```text
//! <Package xmlns="http://schemas.microsoft.com/appx/manifest/foundation/windows10">
//!   <Identity Name="PythonSoftwareFoundation.Python.3.12" Version="3.12.2032.0" .../>
//!   <Properties>
//!     <DisplayName>Python 3.12</DisplayName>
//!   </Properties>
//! </Package>
//! ```

use crate::error::{InventoryError, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument, warn};

/// Folder-name prefix of PSF packages.
pub const PSF_PACKAGE_PREFIX: &str = "PythonSoftwareFoundation";

/// Manifest file inside each package folder.
pub const MANIFEST_FILE: &str = "AppxManifest.xml";

/// AppX foundation namespace.
pub const FOUNDATION_NS: &[u8] = b"http://schemas.microsoft.com/appx/manifest/foundation/windows10";

/// A Store-installed Python package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorePackageEntry {
    /// `Properties/DisplayName` text.
    pub display_name: String,
    /// `Identity/@Name`.
    pub package_identifier: String,
    /// `Identity/@Version`.
    pub package_version: String,
}

/// Lazily yields the PSF packages found in a WindowsApps directory.
pub struct StorePackages {
    entries: fs::ReadDir,
}

/// Maps a failure to list `dir` onto the error taxonomy.
pub fn classify_read_dir_error(dir: &Path, err: io::Error) -> InventoryError {
    if err.kind() == io::ErrorKind::PermissionDenied {
        InventoryError::PermissionDenied {
            path: dir.to_path_buf(),
        }
    } else {
        InventoryError::Io(err)
    }
}

/// Starts a scan of the Store packages installed in `dir`.
///
/// # Errors
///
/// Listing `WindowsApps` needs elevation; without it this returns
/// [`InventoryError::PermissionDenied`].
#[instrument(fields(dir = %dir.display()))]
pub fn scan_store_packages(dir: &Path) -> Result<StorePackages> {
    let entries = fs::read_dir(dir).map_err(|e| classify_read_dir_error(dir, e))?;
    Ok(StorePackages { entries })
}

impl Iterator for StorePackages {
    type Item = StorePackageEntry;

    fn next(&mut self) -> Option<Self::Item> {
        for entry in self.entries.by_ref() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "Failed to read package directory entry");
                    continue;
                }
            };

            if !entry.file_name().to_string_lossy().starts_with(PSF_PACKAGE_PREFIX) {
                continue;
            }

            let manifest: PathBuf = entry.path().join(MANIFEST_FILE);
            let xml = match fs::read_to_string(&manifest) {
                Ok(xml) => xml,
                Err(e) => {
                    warn!(manifest = %manifest.display(), error = %e, "Unreadable manifest");
                    continue;
                }
            };

            match parse_manifest(&xml) {
                Ok(Some(package)) => {
                    debug!(package = %package.package_identifier, "Found Store package");
                    return Some(package);
                }
                Ok(None) => {
                    debug!(manifest = %manifest.display(), "Manifest lacks identity or display name");
                }
                Err(e) => {
                    warn!(manifest = %manifest.display(), error = %e, "Skipping manifest");
                }
            }
        }
        None
    }
}

fn is_foundation(ns: &ResolveResult) -> bool {
    matches!(ns, ResolveResult::Bound(Namespace(n)) if *n == FOUNDATION_NS)
}

fn attribute(element: &BytesStart, name: &str) -> Result<Option<String>> {
    let attr = element
        .try_get_attribute(name)
        .map_err(|e| InventoryError::Manifest(e.to_string()))?;

    attr.map(|a| {
        a.unescape_value()
            .map(|v| v.into_owned())
            .map_err(|e| InventoryError::Manifest(e.to_string()))
    })
    .transpose()
}

fn identity(element: &BytesStart) -> Result<Option<(String, String)>> {
    Ok(attribute(element, "Name")?.zip(attribute(element, "Version")?))
}

/// Extracts the package entry from an AppX manifest.
///
/// Returns `Ok(None)` when the manifest has no `Identity` element or no
/// `Properties/DisplayName` text.
///
/// # Errors
///
/// Returns [`InventoryError::Manifest`] for XML that is not well-formed.
pub fn parse_manifest(xml: &str) -> Result<Option<StorePackageEntry>> {
    let mut reader = NsReader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut in_properties = false;
    let mut in_display_name = false;
    let mut display_name: Option<String> = None;
    let mut ident: Option<(String, String)> = None;

    loop {
        match reader.read_resolved_event() {
            Ok((ns, Event::Start(e))) if is_foundation(&ns) => match e.local_name().as_ref() {
                b"Properties" => in_properties = true,
                b"DisplayName" if in_properties => in_display_name = true,
                b"Identity" => ident = identity(&e)?,
                _ => {}
            },
            Ok((ns, Event::Empty(e))) if is_foundation(&ns) => {
                if e.local_name().as_ref() == b"Identity" {
                    ident = identity(&e)?;
                }
            }
            Ok((ns, Event::End(e))) if is_foundation(&ns) => match e.local_name().as_ref() {
                b"Properties" => in_properties = false,
                b"DisplayName" => in_display_name = false,
                _ => {}
            },
            Ok((_, Event::Text(t))) if in_display_name => {
                let text = t
                    .unescape()
                    .map_err(|e| InventoryError::Manifest(e.to_string()))?;
                display_name = Some(text.into_owned());
            }
            Ok((_, Event::Eof)) => break,
            Err(e) => return Err(InventoryError::Manifest(e.to_string())),
            _ => {}
        }
    }

    Ok(display_name.zip(ident).map(|(display_name, (id, version))| StorePackageEntry {
        display_name,
        package_identifier: id,
        package_version: version,
    }))
}
