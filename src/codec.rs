//! Conversions between Rust values and the registry's on-wire layouts.
//!
//! Every buffer handed to or received from the OS goes through here, so the
//! width and terminator arithmetic lives in one place:
//!
//! - `REG_SZ`: UTF-16 code units followed by one NUL.
//! - `REG_MULTI_SZ`: each string NUL-terminated, then one more NUL ending the
//!   list. The empty list is a lone double NUL.
//! - `REG_DWORD`: four bytes in native byte order.

use crate::error::{RegistryError, Result};

/// Size in bytes of a `REG_DWORD` value.
pub const DWORD_SIZE: usize = 4;

const UNIT_SIZE: usize = 2;
const NUL: u16 = 0;

/// Encode `s` as NUL-terminated UTF-16.
///
/// # Errors
///
/// Returns [`RegistryError::Encoding`] if `s` contains a NUL character, which
/// the OS would read as the end of the string.
pub fn encode_str(s: &str) -> Result<Vec<u16>> {
    if s.contains('\0') {
        return Err(RegistryError::encoding(s, "embedded NUL character"));
    }
    Ok(s.encode_utf16().chain(Some(NUL)).collect())
}

/// Encode a name that the OS accepts as either a string or a null pointer.
///
/// An empty `s` yields `None`, which callers pass as a null pointer.
///
/// # Errors
///
/// Same as [`encode_str`].
pub fn encode_optional(s: &str) -> Result<Option<Vec<u16>>> {
    if s.is_empty() {
        Ok(None)
    } else {
        encode_str(s).map(Some)
    }
}

/// Encode a list of strings as a `REG_MULTI_SZ` buffer.
///
/// Validation happens before any allocation for the output.
///
/// # Errors
///
/// Returns [`RegistryError::Encoding`] if any element contains a NUL or is
/// empty. An empty element would be written as a double NUL and read back as
/// the end of the list.
pub fn encode_multi_sz<S: AsRef<str>>(values: &[S]) -> Result<Vec<u16>> {
    for value in values {
        let value = value.as_ref();
        if value.contains('\0') {
            return Err(RegistryError::encoding(value, "embedded NUL character"));
        }
        if value.is_empty() {
            return Err(RegistryError::encoding(value, "empty string in a multi-string list"));
        }
    }

    let mut buf = Vec::with_capacity(values.iter().map(|v| v.as_ref().len() + 1).sum::<usize>() + 1);
    for value in values {
        buf.extend(value.as_ref().encode_utf16());
        buf.push(NUL);
    }
    buf.push(NUL);
    if values.is_empty() {
        buf.push(NUL);
    }
    Ok(buf)
}

/// Decode a `REG_SZ` buffer, stopping at the first NUL.
///
/// Unpaired surrogates are replaced with U+FFFD.
#[must_use]
pub fn decode_sz(buf: &[u16]) -> String {
    let end = buf.iter().position(|&u| u == NUL).unwrap_or(buf.len());
    String::from_utf16_lossy(&buf[..end])
}

/// Decode a `REG_MULTI_SZ` buffer into its ordered list of strings.
///
/// The list ends at the first pair of consecutive NUL code units. A surrogate
/// is never zero, so the scan cannot split a surrogate pair in well-formed
/// UTF-16. Buffers missing the final terminator are accepted.
#[must_use]
pub fn decode_multi_sz(buf: &[u16]) -> Vec<String> {
    let end = buf
        .windows(2)
        .position(|pair| *pair == [NUL, NUL])
        .unwrap_or_else(|| match buf.last() {
            Some(&NUL) => buf.len() - 1,
            _ => buf.len(),
        });

    let list = &buf[..end];
    if list.is_empty() {
        return Vec::new();
    }
    list.split(|&u| u == NUL)
        .map(String::from_utf16_lossy)
        .collect()
}

/// Byte length of a buffer of UTF-16 code units, as the OS expects it.
///
/// # Errors
///
/// Returns [`RegistryError::Encoding`] if the length does not fit in a `u32`.
pub fn units_byte_len(buf: &[u16]) -> Result<u32> {
    buf.len()
        .checked_mul(UNIT_SIZE)
        .and_then(|bytes| u32::try_from(bytes).ok())
        .ok_or_else(|| RegistryError::encoding("<buffer>", "value larger than 4 GiB"))
}

/// Byte length of a `REG_SZ` holding `units` code units plus its terminator.
///
/// # Errors
///
/// Returns [`RegistryError::Encoding`] if the length does not fit in a `u32`.
pub fn sz_byte_len(units: usize) -> Result<u32> {
    units
        .checked_add(1)
        .and_then(|n| n.checked_mul(UNIT_SIZE))
        .and_then(|bytes| u32::try_from(bytes).ok())
        .ok_or_else(|| RegistryError::encoding("<buffer>", "value larger than 4 GiB"))
}

/// Number of code units needed to hold `bytes` bytes, rounding an odd byte
/// count up.
#[must_use]
pub const fn byte_len_to_units(bytes: u32) -> usize {
    (bytes as usize).div_ceil(UNIT_SIZE)
}

#[must_use]
pub const fn dword_to_bytes(value: u32) -> [u8; DWORD_SIZE] {
    value.to_ne_bytes()
}

#[must_use]
pub const fn dword_from_bytes(bytes: [u8; DWORD_SIZE]) -> u32 {
    u32::from_ne_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn units(s: &str) -> Vec<u16> {
        s.encode_utf16().collect()
    }

    #[test]
    fn encode_str_appends_terminator() {
        assert_eq!(encode_str("ab").unwrap(), vec![0x61, 0x62, 0]);
        assert_eq!(encode_str("").unwrap(), vec![0]);
    }

    #[test]
    fn encode_str_rejects_nul() {
        let err = encode_str("a\0b").unwrap_err();
        assert!(matches!(err, RegistryError::Encoding { .. }));
    }

    #[test]
    fn encode_optional_maps_empty_to_none() {
        assert_eq!(encode_optional("").unwrap(), None);
        assert_eq!(encode_optional("x").unwrap(), Some(vec![0x78, 0]));
        assert!(encode_optional("x\0").is_err());
    }

    #[test]
    fn multi_sz_layout() {
        let buf = encode_multi_sz(&["ja-JP", "en-US"]).unwrap();
        let mut expected = units("ja-JP");
        expected.push(0);
        expected.extend(units("en-US"));
        expected.extend([0, 0]);
        assert_eq!(buf, expected);
    }

    #[test]
    fn multi_sz_empty_list_is_double_nul() {
        let empty: [&str; 0] = [];
        assert_eq!(encode_multi_sz(&empty).unwrap(), vec![0, 0]);
        assert_eq!(decode_multi_sz(&[0, 0]), Vec::<String>::new());
    }

    #[test]
    fn multi_sz_rejects_nul_and_empty_elements() {
        let err = encode_multi_sz(&["ok", "bad\0value"]).unwrap_err();
        assert_eq!(
            err,
            RegistryError::Encoding {
                input: "bad\0value".into(),
                reason: "embedded NUL character",
            }
        );
        assert!(encode_multi_sz(&["a", "", "b"]).is_err());
    }

    #[test]
    fn decode_multi_sz_stops_at_double_nul() {
        let mut buf = units("a");
        buf.push(0);
        buf.extend(units("bc"));
        buf.extend([0, 0]);
        // Trailing garbage after the list terminator is ignored.
        buf.extend(units("zz"));
        assert_eq!(decode_multi_sz(&buf), vec!["a", "bc"]);
    }

    #[test]
    fn decode_multi_sz_tolerates_missing_terminator() {
        let mut buf = units("one");
        buf.push(0);
        buf.extend(units("two"));
        assert_eq!(decode_multi_sz(&buf), vec!["one", "two"]);
        buf.push(0);
        assert_eq!(decode_multi_sz(&buf), vec!["one", "two"]);
        assert!(decode_multi_sz(&[]).is_empty());
        assert!(decode_multi_sz(&[0]).is_empty());
    }

    #[test]
    fn decode_multi_sz_keeps_surrogate_pairs() {
        let buf = encode_multi_sz(&["\u{1F600}", "日本語"]).unwrap();
        assert_eq!(decode_multi_sz(&buf), vec!["\u{1F600}", "日本語"]);
    }

    #[test]
    fn decode_sz_trims_terminator() {
        let buf = encode_str("Control Panel").unwrap();
        assert_eq!(decode_sz(&buf), "Control Panel");
        assert_eq!(decode_sz(&units("no terminator")), "no terminator");
        assert_eq!(decode_sz(&[0x61, 0, 0x62, 0]), "a");
    }

    #[test]
    fn byte_lengths() {
        let buf = encode_str("abc").unwrap();
        assert_eq!(units_byte_len(&buf).unwrap(), 8);
        assert_eq!(sz_byte_len(3).unwrap(), 8);
        assert_eq!(sz_byte_len(0).unwrap(), 2);
        assert!(sz_byte_len(usize::MAX).is_err());

        let multi = encode_multi_sz(&["ja-JP"]).unwrap();
        assert_eq!(units_byte_len(&multi).unwrap(), 14);
    }

    #[test]
    fn byte_len_rounds_up_to_units() {
        assert_eq!(byte_len_to_units(0), 0);
        assert_eq!(byte_len_to_units(2), 1);
        assert_eq!(byte_len_to_units(7), 4);
    }

    #[test]
    fn dword_native_order() {
        let bytes = dword_to_bytes(0x1234_FEFE);
        assert_eq!(bytes, 0x1234_FEFEu32.to_ne_bytes());
        assert_eq!(dword_from_bytes(bytes), 0x1234_FEFE);
    }
}
