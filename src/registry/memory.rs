//! In-memory registry backend.
//!
//! Mirrors the live backend's contract closely enough to drive the scanners
//! off a real machine: subkeys keep insertion order (standing in for the
//! registry's native order), lookups are ASCII case-insensitive, and every
//! opened key knows its kernel object path.

use super::{RegistryAccessor, RegistryKey};
use crate::error::Result;
use crate::view::RegistryView;
use std::rc::Rc;

/// A key in an in-memory tree.
#[derive(Debug, Clone, Default)]
pub struct MemoryKey {
    values: Vec<(String, String)>,
    subkeys: Vec<(String, Rc<MemoryKey>)>,
}

impl MemoryKey {
    /// An empty key.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a string value; `""` sets the default value.
    pub fn with_value(mut self, name: &str, data: &str) -> Self {
        self.values.push((name.to_string(), data.to_string()));
        self
    }

    /// Adds a subkey.
    pub fn with_subkey(mut self, name: &str, key: MemoryKey) -> Self {
        self.subkeys.push((name.to_string(), Rc::new(key)));
        self
    }

    fn child(&self, name: &str) -> Option<(&str, &Rc<MemoryKey>)> {
        self.subkeys
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(n, k)| (n.as_str(), k))
    }
}

/// Handle to an opened [`MemoryKey`].
#[derive(Debug, Clone)]
pub struct MemoryHandle {
    node: Rc<MemoryKey>,
    kernel_path: String,
}

impl RegistryKey for MemoryHandle {
    fn subkey_names(&self) -> Result<Vec<String>> {
        Ok(self.node.subkeys.iter().map(|(n, _)| n.clone()).collect())
    }

    fn open_subkey(&self, name: &str) -> Result<Option<Self>> {
        // kernel names keep the stored casing, not the caller's
        Ok(self.node.child(name).map(|(stored, node)| MemoryHandle {
            node: Rc::clone(node),
            kernel_path: format!("{}\\{}", self.kernel_path, stored),
        }))
    }

    fn read_string(&self, name: &str) -> Result<Option<String>> {
        Ok(self
            .node
            .values
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.clone()))
    }

    fn kernel_path(&self) -> Result<String> {
        Ok(self.kernel_path.clone())
    }
}

/// A registry made of one in-memory tree per view.
///
/// # Examples
///
/// ```rust
/// use pywin_inventory::registry::{MemoryKey, MemoryRegistry, RegistryAccessor, RegistryKey};
/// use pywin_inventory::view::RegistryView;
///
/// let registry = MemoryRegistry::new().with_view(
///     RegistryView::current_user(),
///     r"\REGISTRY\USER\S-1-5-21-1000",
///     MemoryKey::new().with_subkey("SOFTWARE", MemoryKey::new()),
/// );
/// let key = registry
///     .open_root(RegistryView::current_user(), "SOFTWARE")
///     .unwrap()
///     .unwrap();
/// assert_eq!(key.kernel_path().unwrap(), r"\REGISTRY\USER\S-1-5-21-1000\SOFTWARE");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryRegistry {
    views: Vec<(RegistryView, String, Rc<MemoryKey>)>,
}

impl MemoryRegistry {
    /// An empty registry; every root is missing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the hive root for `view` along with its kernel path
    /// (for example `\REGISTRY\MACHINE`).
    pub fn with_view(mut self, view: RegistryView, kernel_root: &str, root: MemoryKey) -> Self {
        self.views
            .push((view, kernel_root.trim_end_matches('\\').to_string(), Rc::new(root)));
        self
    }
}

impl RegistryAccessor for MemoryRegistry {
    type Key = MemoryHandle;

    fn open_root(&self, view: RegistryView, path: &str) -> Result<Option<MemoryHandle>> {
        let Some((_, kernel_root, root)) = self.views.iter().find(|(v, _, _)| *v == view) else {
            return Ok(None);
        };

        let mut handle = MemoryHandle {
            node: Rc::clone(root),
            kernel_path: kernel_root.clone(),
        };
        for segment in path.split('\\').filter(|s| !s.is_empty()) {
            match handle.open_subkey(segment)? {
                Some(next) => handle = next,
                None => return Ok(None),
            }
        }
        Ok(Some(handle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::Bitness;

    fn registry() -> MemoryRegistry {
        MemoryRegistry::new().with_view(
            RegistryView::local_machine(Bitness::Bits64),
            r"\REGISTRY\MACHINE\",
            MemoryKey::new().with_subkey(
                "SOFTWARE",
                MemoryKey::new()
                    .with_subkey("Zeta", MemoryKey::new())
                    .with_subkey("Alpha", MemoryKey::new().with_value("", "default"))
                    .with_value("Name", "value"),
            ),
        )
    }

    #[test]
    fn test_open_root_walks_path() {
        let key = registry()
            .open_root(RegistryView::local_machine(Bitness::Bits64), r"software\alpha")
            .unwrap()
            .unwrap();
        assert_eq!(key.kernel_path().unwrap(), r"\REGISTRY\MACHINE\SOFTWARE\Alpha");
        assert_eq!(key.read_string("").unwrap().as_deref(), Some("default"));
    }

    #[test]
    fn test_missing_view_and_path() {
        let registry = registry();
        assert!(registry
            .open_root(RegistryView::local_machine(Bitness::Bits32), "SOFTWARE")
            .unwrap()
            .is_none());
        assert!(registry
            .open_root(RegistryView::local_machine(Bitness::Bits64), r"SOFTWARE\Missing")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_insertion_order_and_absent_values() {
        let key = registry()
            .open_root(RegistryView::local_machine(Bitness::Bits64), "SOFTWARE")
            .unwrap()
            .unwrap();
        assert_eq!(key.subkey_names().unwrap(), ["Zeta", "Alpha"]);
        assert_eq!(key.read_string("NAME").unwrap().as_deref(), Some("value"));
        assert_eq!(key.read_string("Other").unwrap(), None);
    }
}
