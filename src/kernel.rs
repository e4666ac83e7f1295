//! Kernel object-name resolution for open registry keys.
//!
//! An open key handle knows the canonical path the kernel uses for it,
//! independent of the WOW64 view it was opened through. `NtQueryKey` with
//! the `KeyNameInformation` class returns that path, but only through a
//! two-phase "probe then fetch" protocol:
//!
//! ```text
//! probe:  NtQueryKey(h, KeyNameInformation, NULL, 0, &len)   -> STATUS_BUFFER_TOO_SMALL
//! fetch:  NtQueryKey(h, KeyNameInformation, buf, len + 2, &len) -> STATUS_SUCCESS
//!
//! buf:    [NameLength: u32 LE][Name: UTF-16LE ...][0x0000]
//! ```
//!
//! The two extra bytes allocated for the fetch stay zeroed and terminate
//! the name. All raw-pointer work is confined to the [`KeyNameQuery`]
//! implementation for `winreg::RegKey`; [`resolve_kernel_path`] only sees
//! byte slices and status codes.

use crate::error::{InventoryError, QueryPhase, Result};
use crate::utils::{read_u32_le, read_utf16_string};
use tracing::{debug, trace};

/// `KEY_INFORMATION_CLASS::KeyNameInformation`.
pub const KEY_NAME_INFORMATION_CLASS: u32 = 3;

/// `STATUS_SUCCESS`.
pub const STATUS_SUCCESS: i32 = 0;

/// `STATUS_BUFFER_TOO_SMALL`.
pub const STATUS_BUFFER_TOO_SMALL: i32 = 0xC000_0023_u32 as i32;

/// Size of the `NameLength` field at the start of `KEY_NAME_INFORMATION`.
const NAME_LENGTH_FIELD: usize = 4;

/// Extra bytes allocated past the reported length; they hold the terminator.
const TERMINATOR_PADDING: u32 = 2;

/// One `KeyNameInformation` query against an open key.
pub trait KeyNameQuery {
    /// Fills `buffer` (which may be empty) and stores the size the kernel
    /// needs, or wrote, in `result_length`. Returns the raw NTSTATUS.
    fn query_key_name(&self, buffer: &mut [u8], result_length: &mut u32) -> i32;
}

/// Resolves the kernel object path (`\REGISTRY\...`) of an open key.
///
/// # Errors
///
/// Returns [`InventoryError::Resolution`] when either phase reports a status
/// other than the expected one; there is no retry. Returns
/// [`InventoryError::InvalidKeyName`] if the filled buffer is inconsistent.
pub fn resolve_kernel_path<Q: KeyNameQuery + ?Sized>(key: &Q) -> Result<String> {
    let mut required = 0u32;
    let status = key.query_key_name(&mut [], &mut required);
    if status != STATUS_BUFFER_TOO_SMALL {
        return Err(InventoryError::resolution(QueryPhase::Probe, status));
    }
    trace!(required, "Probed key name length");

    let buffer_len = required
        .checked_add(TERMINATOR_PADDING)
        .ok_or_else(|| InventoryError::InvalidKeyName(format!("length {} overflows", required)))?;
    let mut buffer = vec![0u8; buffer_len as usize];

    let status = key.query_key_name(&mut buffer, &mut required);
    if status != STATUS_SUCCESS {
        return Err(InventoryError::resolution(QueryPhase::Fetch, status));
    }

    let path = decode_key_name_information(&buffer)?;
    debug!(path = %path, "Resolved kernel path");
    Ok(path)
}

/// Decodes a filled `KEY_NAME_INFORMATION` buffer into the key name.
///
/// The `NameLength` header is checked against the buffer; the name itself
/// is decoded from the bytes after it with trailing terminators stripped.
pub fn decode_key_name_information(buffer: &[u8]) -> Result<String> {
    let name_length = read_u32_le(buffer, 0)? as usize;
    let available = buffer.len() - NAME_LENGTH_FIELD;

    if name_length > available {
        return Err(InventoryError::InvalidKeyName(format!(
            "name length {} exceeds {} available bytes",
            name_length, available
        )));
    }

    read_utf16_string(&buffer[NAME_LENGTH_FIELD..NAME_LENGTH_FIELD + name_length])
}

#[cfg(windows)]
mod ffi {
    use std::ffi::c_void;
    use windows_sys::Win32::Foundation::{HANDLE, NTSTATUS};

    #[link(name = "ntdll")]
    extern "system" {
        pub fn NtQueryKey(
            key_handle: HANDLE,
            key_information_class: u32,
            key_information: *mut c_void,
            length: u32,
            result_length: *mut u32,
        ) -> NTSTATUS;
    }
}

#[cfg(windows)]
impl KeyNameQuery for winreg::RegKey {
    fn query_key_name(&self, buffer: &mut [u8], result_length: &mut u32) -> i32 {
        let info = if buffer.is_empty() {
            std::ptr::null_mut()
        } else {
            buffer.as_mut_ptr().cast()
        };
        let length = u32::try_from(buffer.len()).unwrap_or(u32::MAX);

        // SAFETY: the handle stays open for the lifetime of `self`, `info`
        // is either null with `length == 0` or points at `length` writable
        // bytes, and `result_length` is a valid exclusive reference.
        unsafe {
            ffi::NtQueryKey(
                self.raw_handle() as windows_sys::Win32::Foundation::HANDLE,
                KEY_NAME_INFORMATION_CLASS,
                info,
                length,
                result_length,
            )
        }
    }
}
