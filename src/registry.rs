//! Registry accessor - direct calls into the Win32 registry API.
//!
//! Every function encodes its arguments with [`crate::codec`], makes one OS
//! call (two for variable-length reads) and decodes the result. Handles passed
//! in are borrowed and never closed here.

use crate::codec;
use crate::error::{RegistryError, Result};
use crate::types::{Access, Disposition, KeyOptions, ValueType};
use std::ffi::c_void;
use tracing::{debug, warn};
use windows::core::PCWSTR;
use windows::Win32::Foundation::{ERROR_SUCCESS, WIN32_ERROR};
use windows::Win32::Security::SECURITY_ATTRIBUTES;
use windows::Win32::System::Registry::{
    RegCloseKey, RegCreateKeyExW, RegDeleteKeyValueW, RegDeleteKeyW, RegDeleteTreeW, RegGetValueW,
    RegSetKeyValueW, HKEY, REG_CREATE_KEY_DISPOSITION, REG_OPEN_CREATE_OPTIONS, REG_ROUTINE_FLAGS,
    REG_SAM_FLAGS,
};

// =============================================================================
// Key handles
// =============================================================================

/// Anything that refers to an open registry key.
pub trait AsRawKey {
    fn as_raw_key(&self) -> HKEY;
}

impl AsRawKey for HKEY {
    fn as_raw_key(&self) -> HKEY {
        *self
    }
}

impl AsRawKey for winreg::RegKey {
    fn as_raw_key(&self) -> HKEY {
        HKEY(self.raw_handle() as *mut c_void)
    }
}

impl<T: AsRawKey + ?Sized> AsRawKey for &T {
    fn as_raw_key(&self) -> HKEY {
        (**self).as_raw_key()
    }
}

/// A key handle opened by [`create_key`], closed when dropped.
#[derive(Debug)]
pub struct OwnedKey(HKEY);

// Registry handles are not tied to the thread that opened them.
unsafe impl Send for OwnedKey {}
unsafe impl Sync for OwnedKey {}

impl OwnedKey {
    /// Take ownership of an open handle.
    ///
    /// # Safety
    ///
    /// `hkey` must be an open key handle that nothing else will close.
    #[must_use]
    pub const unsafe fn from_raw(hkey: HKEY) -> Self {
        Self(hkey)
    }

    #[must_use]
    pub const fn as_raw(&self) -> HKEY {
        self.0
    }

    /// Release the handle without closing it. The caller must close it.
    #[must_use]
    pub fn into_raw(self) -> HKEY {
        let hkey = self.0;
        std::mem::forget(self);
        hkey
    }
}

impl AsRawKey for OwnedKey {
    fn as_raw_key(&self) -> HKEY {
        self.0
    }
}

impl Drop for OwnedKey {
    fn drop(&mut self) {
        if !self.0.0.is_null() {
            unsafe {
                let _ = RegCloseKey(self.0);
            }
        }
    }
}

// =============================================================================
// Argument marshalling
// =============================================================================

/// A subkey, value or class name; empty names go to the OS as null pointers.
struct WideName(Option<Vec<u16>>);

impl WideName {
    fn new(name: &str) -> Result<Self> {
        codec::encode_optional(name).map(Self)
    }

    fn as_pcwstr(&self) -> PCWSTR {
        self.0
            .as_ref()
            .map_or(PCWSTR::null(), |wide| PCWSTR(wide.as_ptr()))
    }
}

fn describe(subkey: &str, value_name: &str) -> String {
    let value_name = if value_name.is_empty() {
        "(default)"
    } else {
        value_name
    };
    format!("{subkey}\\{value_name}")
}

fn check(status: WIN32_ERROR, path: &str, expected: Option<ValueType>) -> Result {
    if status == ERROR_SUCCESS {
        return Ok(());
    }
    let err = RegistryError::from_status(status.0, path, expected);
    if !err.is_not_found() {
        warn!(path, code = status.0, "registry call failed");
    }
    Err(err)
}

// =============================================================================
// Keys
// =============================================================================

/// Open `subkey` under `root`, creating it if it does not exist.
///
/// An empty `subkey` opens a new handle to `root` itself; it is passed as an
/// empty string because `RegCreateKeyExW` does not accept a null subkey. An
/// empty `class` is passed as a null pointer.
///
/// # Errors
///
/// Returns [`RegistryError::Encoding`] if a name contains a NUL, otherwise the
/// OS status of `RegCreateKeyExW`.
pub fn create_key(
    root: impl AsRawKey,
    subkey: &str,
    class: &str,
    options: KeyOptions,
    access: Access,
    security: Option<&SECURITY_ATTRIBUTES>,
) -> Result<(OwnedKey, Disposition)> {
    let subkey_w = codec::encode_str(subkey)?;
    let class_w = WideName::new(class)?;

    let mut hkey = HKEY::default();
    let mut disposition = REG_CREATE_KEY_DISPOSITION::default();

    debug!(subkey, options = options.bits(), access = access.bits(), "RegCreateKeyExW");
    let status = unsafe {
        RegCreateKeyExW(
            root.as_raw_key(),
            PCWSTR(subkey_w.as_ptr()),
            None,
            class_w.as_pcwstr(),
            REG_OPEN_CREATE_OPTIONS(options.bits()),
            REG_SAM_FLAGS(access.bits()),
            security.map(std::ptr::from_ref),
            &raw mut hkey,
            Some(&raw mut disposition),
        )
    };
    check(status, subkey, None)?;

    let key = unsafe { OwnedKey::from_raw(hkey) };
    // The OS only reports the two documented dispositions.
    let disposition =
        Disposition::from_raw(disposition.0).unwrap_or(Disposition::OpenedExistingKey);
    Ok((key, disposition))
}

/// Delete `subkey` under `root`. The key must have no subkeys.
///
/// An empty `subkey` is rejected: the OS would delete `root` itself.
///
/// # Errors
///
/// [`RegistryError::Encoding`] if `subkey` is empty or contains a NUL,
/// [`RegistryError::NotFound`] if the key does not exist; other OS errors as
/// reported by `RegDeleteKeyW`.
pub fn delete_key(root: impl AsRawKey, subkey: &str) -> Result {
    if subkey.is_empty() {
        return Err(RegistryError::encoding(subkey, "empty subkey would delete the key itself"));
    }
    let subkey_w = codec::encode_str(subkey)?;

    debug!(subkey, "RegDeleteKeyW");
    let status = unsafe { RegDeleteKeyW(root.as_raw_key(), PCWSTR(subkey_w.as_ptr())) };
    check(status, subkey, None)
}

/// Delete one named value. An empty `value_name` deletes the default value.
///
/// # Errors
///
/// [`RegistryError::NotFound`] if the key or value does not exist.
pub fn delete_key_value(root: impl AsRawKey, subkey: &str, value_name: &str) -> Result {
    let subkey_w = WideName::new(subkey)?;
    let value_w = WideName::new(value_name)?;

    debug!(subkey, value = value_name, "RegDeleteKeyValueW");
    let status = unsafe {
        RegDeleteKeyValueW(root.as_raw_key(), subkey_w.as_pcwstr(), value_w.as_pcwstr())
    };
    check(status, &describe(subkey, value_name), None)
}

/// Recursively delete `subkey` with all its subkeys and values.
///
/// An empty `subkey` deletes everything below `root` but keeps `root`. The
/// deletion is not transactional: on failure part of the tree may already be
/// gone.
///
/// # Errors
///
/// [`RegistryError::NotFound`] if the key does not exist; other OS errors as
/// reported by `RegDeleteTreeW`.
pub fn delete_tree(root: impl AsRawKey, subkey: &str) -> Result {
    let subkey_w = WideName::new(subkey)?;

    debug!(subkey, "RegDeleteTreeW");
    let status = unsafe { RegDeleteTreeW(root.as_raw_key(), subkey_w.as_pcwstr()) };
    check(status, subkey, None)
}

// =============================================================================
// Reads
// =============================================================================

/// Fetch a variable-length value: probe its size, allocate, then read it.
fn query_sized(
    root: HKEY,
    subkey: &str,
    value_name: &str,
    ty: ValueType,
) -> Result<Vec<u16>> {
    let subkey_w = WideName::new(subkey)?;
    let value_w = WideName::new(value_name)?;
    let path = describe(subkey, value_name);
    let flags = REG_ROUTINE_FLAGS(ty.restrict_flag());

    let mut byte_len = 0u32;
    let status = unsafe {
        RegGetValueW(
            root,
            subkey_w.as_pcwstr(),
            value_w.as_pcwstr(),
            flags,
            None,
            None,
            Some(&raw mut byte_len),
        )
    };
    check(status, &path, Some(ty))?;

    let mut buf = vec![0u16; codec::byte_len_to_units(byte_len)];
    if buf.is_empty() {
        return Ok(buf);
    }

    let mut byte_len = codec::units_byte_len(&buf)?;
    let status = unsafe {
        RegGetValueW(
            root,
            subkey_w.as_pcwstr(),
            value_w.as_pcwstr(),
            flags,
            None,
            Some(buf.as_mut_ptr().cast::<c_void>()),
            Some(&raw mut byte_len),
        )
    };
    check(status, &path, Some(ty))?;

    buf.truncate(codec::byte_len_to_units(byte_len));
    debug!(path = %path, ty = ty.as_str(), bytes = byte_len, "read registry value");
    Ok(buf)
}

/// Read a `REG_SZ` value.
///
/// # Errors
///
/// [`RegistryError::NotFound`] if the key or value does not exist,
/// [`RegistryError::TypeMismatch`] if the value is not a `REG_SZ`.
pub fn get_value_string(root: impl AsRawKey, subkey: &str, value_name: &str) -> Result<String> {
    let buf = query_sized(root.as_raw_key(), subkey, value_name, ValueType::String)?;
    Ok(codec::decode_sz(&buf))
}

/// Read a `REG_MULTI_SZ` value, keeping the stored order.
///
/// # Errors
///
/// [`RegistryError::NotFound`] if the key or value does not exist,
/// [`RegistryError::TypeMismatch`] if the value is not a `REG_MULTI_SZ`.
pub fn get_value_multi_string(
    root: impl AsRawKey,
    subkey: &str,
    value_name: &str,
) -> Result<Vec<String>> {
    let buf = query_sized(root.as_raw_key(), subkey, value_name, ValueType::MultiString)?;
    Ok(codec::decode_multi_sz(&buf))
}

/// Read a `REG_DWORD` value.
///
/// # Errors
///
/// [`RegistryError::NotFound`] if the key or value does not exist,
/// [`RegistryError::TypeMismatch`] if the value is not a `REG_DWORD`.
pub fn get_value_u32(root: impl AsRawKey, subkey: &str, value_name: &str) -> Result<u32> {
    let subkey_w = WideName::new(subkey)?;
    let value_w = WideName::new(value_name)?;
    let path = describe(subkey, value_name);

    let mut bytes = [0u8; codec::DWORD_SIZE];
    let mut byte_len = codec::DWORD_SIZE as u32;
    let status = unsafe {
        RegGetValueW(
            root.as_raw_key(),
            subkey_w.as_pcwstr(),
            value_w.as_pcwstr(),
            REG_ROUTINE_FLAGS(ValueType::Dword.restrict_flag()),
            None,
            Some(bytes.as_mut_ptr().cast::<c_void>()),
            Some(&raw mut byte_len),
        )
    };
    check(status, &path, Some(ValueType::Dword))?;

    debug!(path = %path, ty = ValueType::Dword.as_str(), "read registry value");
    Ok(codec::dword_from_bytes(bytes))
}

// =============================================================================
// Writes
// =============================================================================

fn set_value(
    root: HKEY,
    subkey: &str,
    value_name: &str,
    ty: ValueType,
    data: *const c_void,
    byte_len: u32,
) -> Result {
    let subkey_w = WideName::new(subkey)?;
    let value_w = WideName::new(value_name)?;
    let path = describe(subkey, value_name);

    debug!(path = %path, ty = ty.as_str(), bytes = byte_len, "RegSetKeyValueW");
    let status = unsafe {
        RegSetKeyValueW(
            root,
            subkey_w.as_pcwstr(),
            value_w.as_pcwstr(),
            ty.raw(),
            Some(data),
            byte_len,
        )
    };
    check(status, &path, None)
}

/// Write `value` as a `REG_SZ`, creating `subkey` if needed.
///
/// # Errors
///
/// [`RegistryError::Encoding`] if `value` or a name contains a NUL; OS errors
/// from `RegSetKeyValueW` otherwise.
pub fn set_key_value_string(
    root: impl AsRawKey,
    subkey: &str,
    value_name: &str,
    value: &str,
) -> Result {
    let buf = codec::encode_str(value)?;
    let byte_len = codec::sz_byte_len(buf.len() - 1)?;
    set_value(
        root.as_raw_key(),
        subkey,
        value_name,
        ValueType::String,
        buf.as_ptr().cast(),
        byte_len,
    )
}

/// Write `values` as a `REG_MULTI_SZ`, creating `subkey` if needed.
///
/// Nothing is written if any element fails validation.
///
/// # Errors
///
/// [`RegistryError::Encoding`] if an element is empty or contains a NUL; OS
/// errors from `RegSetKeyValueW` otherwise.
pub fn set_key_value_multi_string<S: AsRef<str>>(
    root: impl AsRawKey,
    subkey: &str,
    value_name: &str,
    values: &[S],
) -> Result {
    let buf = codec::encode_multi_sz(values)?;
    let byte_len = codec::units_byte_len(&buf)?;
    set_value(
        root.as_raw_key(),
        subkey,
        value_name,
        ValueType::MultiString,
        buf.as_ptr().cast(),
        byte_len,
    )
}

/// Write `value` as a `REG_DWORD`, creating `subkey` if needed.
///
/// # Errors
///
/// OS errors from `RegSetKeyValueW`.
pub fn set_key_value_u32(root: impl AsRawKey, subkey: &str, value_name: &str, value: u32) -> Result {
    let bytes = codec::dword_to_bytes(value);
    set_value(
        root.as_raw_key(),
        subkey,
        value_name,
        ValueType::Dword,
        bytes.as_ptr().cast(),
        codec::DWORD_SIZE as u32,
    )
}
