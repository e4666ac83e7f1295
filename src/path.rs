//! Conversion from kernel object paths to user-facing registry paths.

use crate::error::{InventoryError, Result};

/// Hive marker for machine-wide keys.
pub const HKEY_LOCAL_MACHINE: &str = "HKEY_LOCAL_MACHINE";

/// Hive marker for per-SID user keys.
pub const HKEY_USERS: &str = "HKEY_USERS";

/// Hive marker for the current process user's keys.
pub const HKEY_CURRENT_USER: &str = "HKEY_CURRENT_USER";

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('\\').filter(|s| !s.is_empty())
}

/// Converts `\REGISTRY\MACHINE\...` or `\REGISTRY\USER\<SID>\...` into the
/// `HKEY_LOCAL_MACHINE\...` / `HKEY_USERS\<SID>\...` form.
///
/// # Errors
///
/// Returns [`InventoryError::UnrecognizedPath`] when the second segment is
/// neither `MACHINE` nor `USER`.
///
/// # Examples
///
/// ```rust
/// use pywin_inventory::path::to_friendly_path;
///
/// let path = to_friendly_path(r"\REGISTRY\MACHINE\SOFTWARE\Python").unwrap();
/// assert_eq!(path, r"HKEY_LOCAL_MACHINE\SOFTWARE\Python");
/// ```
pub fn to_friendly_path(kernel_path: &str) -> Result<String> {
    let parts: Vec<&str> = segments(kernel_path).collect();

    let hive = match parts.get(1).copied() {
        Some("MACHINE") => HKEY_LOCAL_MACHINE,
        Some("USER") => HKEY_USERS,
        _ => return Err(InventoryError::UnrecognizedPath(kernel_path.to_string())),
    };

    Ok(std::iter::once(hive)
        .chain(parts[2..].iter().copied())
        .collect::<Vec<_>>()
        .join("\\"))
}

/// Rewrites `HKEY_USERS\<SID>\...` to `HKEY_CURRENT_USER\...`.
///
/// Paths under any other hive are returned unchanged, which makes the
/// function idempotent.
///
/// Known limitation: the SID segment is assumed to belong to the user
/// running this process and is not checked. Do not feed it paths from
/// another user's hive.
pub fn normalize_to_current_user(friendly_path: &str) -> String {
    let mut parts = segments(friendly_path);

    if parts.next() != Some(HKEY_USERS) {
        return friendly_path.to_string();
    }

    // skip the SID
    parts.next();

    std::iter::once(HKEY_CURRENT_USER)
        .chain(parts)
        .collect::<Vec<_>>()
        .join("\\")
}

/// Full conversion applied to every scanned key: kernel path to friendly
/// path, then per-user SIDs folded into `HKEY_CURRENT_USER`.
pub fn display_path(kernel_path: &str) -> Result<String> {
    to_friendly_path(kernel_path).map(|p| normalize_to_current_user(&p))
}
