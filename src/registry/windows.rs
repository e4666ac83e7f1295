//! Live registry backend built on `winreg`.

use super::{RegistryAccessor, RegistryKey};
use crate::error::{InventoryError, Result};
use crate::kernel::resolve_kernel_path;
use crate::view::{Hive, RegistryView};
use std::io;
use tracing::{debug, trace};
use winreg::enums::{HKEY_CURRENT_USER, HKEY_LOCAL_MACHINE, KEY_READ};
use winreg::RegKey;

/// The registry of the running machine.
#[derive(Debug, Default, Clone, Copy)]
pub struct WinRegistry;

impl WinRegistry {
    /// Creates an accessor for the live registry.
    pub fn new() -> Self {
        Self
    }
}

/// A key opened through `winreg`, closed when dropped.
pub struct WinKey {
    key: RegKey,
    /// Path used to open the key, for error context only.
    path: String,
}

fn not_found(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::NotFound
}

impl RegistryAccessor for WinRegistry {
    type Key = WinKey;

    fn open_root(&self, view: RegistryView, path: &str) -> Result<Option<WinKey>> {
        let hive = match view.hive {
            Hive::CurrentUser => RegKey::predef(HKEY_CURRENT_USER),
            Hive::LocalMachine => RegKey::predef(HKEY_LOCAL_MACHINE),
        };

        match hive.open_subkey_with_flags(path, KEY_READ | view.wow64_flag()) {
            Ok(key) => {
                debug!(view = %view, path, "Opened root key");
                Ok(Some(WinKey {
                    key,
                    path: path.to_string(),
                }))
            }
            Err(e) if not_found(&e) => Ok(None),
            Err(e) => Err(InventoryError::registry(path, e)),
        }
    }
}

impl RegistryKey for WinKey {
    fn subkey_names(&self) -> Result<Vec<String>> {
        self.key
            .enum_keys()
            .collect::<io::Result<Vec<_>>>()
            .map_err(|e| InventoryError::registry(&self.path, e))
    }

    fn open_subkey(&self, name: &str) -> Result<Option<Self>> {
        let path = format!("{}\\{}", self.path, name);
        match self.key.open_subkey(name) {
            Ok(key) => Ok(Some(WinKey { key, path })),
            Err(e) if not_found(&e) => Ok(None),
            Err(e) => Err(InventoryError::registry(path, e)),
        }
    }

    fn read_string(&self, name: &str) -> Result<Option<String>> {
        match self.key.get_value::<String, _>(name) {
            Ok(value) => Ok(Some(value)),
            Err(e) if not_found(&e) => Ok(None),
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                trace!(key = %self.path, value = name, "Ignoring non-string value");
                Ok(None)
            }
            Err(e) => Err(InventoryError::registry(format!("{}\\{}", self.path, name), e)),
        }
    }

    fn kernel_path(&self) -> Result<String> {
        resolve_kernel_path(&self.key)
    }
}
