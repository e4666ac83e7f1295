//! Registry views: which hive is opened and through which WOW64 redirection layer.

use serde::Serialize;
use std::fmt;

/// `KEY_WOW64_64KEY` access flag.
pub const KEY_WOW64_64KEY: u32 = 0x0100;

/// `KEY_WOW64_32KEY` access flag.
pub const KEY_WOW64_32KEY: u32 = 0x0200;

/// Top-level hive a scan starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Hive {
    /// `HKEY_CURRENT_USER`.
    CurrentUser,
    /// `HKEY_LOCAL_MACHINE`.
    LocalMachine,
}

/// WOW64 registry view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Bitness {
    /// 32-bit view (`WOW6432Node` on 64-bit Windows).
    Bits32,
    /// 64-bit view.
    Bits64,
    /// Whatever the process would see without a WOW64 flag.
    Native,
}

/// A hive plus the bitness used to open keys beneath it.
///
/// Bitness only matters for [`Hive::LocalMachine`]; the per-user hive is
/// shared between both views, so [`RegistryView::current_user`] always
/// carries [`Bitness::Native`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RegistryView {
    /// Hive the view is rooted at.
    pub hive: Hive,
    /// Redirection layer.
    pub bitness: Bitness,
}

impl RegistryView {
    /// The per-user hive.
    pub const fn current_user() -> Self {
        Self {
            hive: Hive::CurrentUser,
            bitness: Bitness::Native,
        }
    }

    /// The machine hive through the given view.
    pub const fn local_machine(bitness: Bitness) -> Self {
        Self {
            hive: Hive::LocalMachine,
            bitness,
        }
    }

    /// Views scanned for every registry channel, in report order.
    pub const fn standard() -> [RegistryView; 3] {
        [
            Self::current_user(),
            Self::local_machine(Bitness::Bits32),
            Self::local_machine(Bitness::Bits64),
        ]
    }

    /// WOW64 access flag OR-ed into `KEY_READ` when opening the root key.
    pub fn wow64_flag(&self) -> u32 {
        match (self.hive, self.bitness) {
            (Hive::CurrentUser, _) => 0,
            (Hive::LocalMachine, Bitness::Bits32) => KEY_WOW64_32KEY,
            (Hive::LocalMachine, Bitness::Bits64) => KEY_WOW64_64KEY,
            (Hive::LocalMachine, Bitness::Native) => 0,
        }
    }

    /// Short label used in the report.
    pub fn label(&self) -> &'static str {
        match (self.hive, self.bitness) {
            (Hive::CurrentUser, _) => "User",
            (Hive::LocalMachine, Bitness::Bits32) => "Machine (x86)",
            (Hive::LocalMachine, Bitness::Bits64) => "Machine (x64)",
            (Hive::LocalMachine, Bitness::Native) => "Machine",
        }
    }
}

impl fmt::Display for RegistryView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
