//! Typed wrappers for the registry's tags, flags and dispositions.

use std::fmt;
use std::ops::BitOr;

/// Win32 constants, taken from the `windows` bindings where they exist.
#[cfg(windows)]
mod raw {
    use windows::Win32::System::Registry as reg;

    pub const REG_SZ: u32 = reg::REG_SZ.0;
    pub const REG_DWORD: u32 = reg::REG_DWORD.0;
    pub const REG_MULTI_SZ: u32 = reg::REG_MULTI_SZ.0;

    pub const RRF_RT_REG_SZ: u32 = reg::RRF_RT_REG_SZ.0;
    pub const RRF_RT_REG_DWORD: u32 = reg::RRF_RT_REG_DWORD.0;
    pub const RRF_RT_REG_MULTI_SZ: u32 = reg::RRF_RT_REG_MULTI_SZ.0;

    pub const REG_CREATED_NEW_KEY: u32 = reg::REG_CREATED_NEW_KEY.0;
    pub const REG_OPENED_EXISTING_KEY: u32 = reg::REG_OPENED_EXISTING_KEY.0;

    pub const REG_OPTION_NON_VOLATILE: u32 = reg::REG_OPTION_NON_VOLATILE.0;
    pub const REG_OPTION_VOLATILE: u32 = reg::REG_OPTION_VOLATILE.0;
    pub const REG_OPTION_CREATE_LINK: u32 = reg::REG_OPTION_CREATE_LINK.0;
    pub const REG_OPTION_BACKUP_RESTORE: u32 = reg::REG_OPTION_BACKUP_RESTORE.0;
    pub const REG_OPTION_OPEN_LINK: u32 = reg::REG_OPTION_OPEN_LINK.0;

    pub const KEY_QUERY_VALUE: u32 = reg::KEY_QUERY_VALUE.0;
    pub const KEY_SET_VALUE: u32 = reg::KEY_SET_VALUE.0;
    pub const KEY_CREATE_SUB_KEY: u32 = reg::KEY_CREATE_SUB_KEY.0;
    pub const KEY_ENUMERATE_SUB_KEYS: u32 = reg::KEY_ENUMERATE_SUB_KEYS.0;
    pub const KEY_NOTIFY: u32 = reg::KEY_NOTIFY.0;
    pub const KEY_WOW64_64KEY: u32 = reg::KEY_WOW64_64KEY.0;
    pub const KEY_WOW64_32KEY: u32 = reg::KEY_WOW64_32KEY.0;
    pub const KEY_READ: u32 = reg::KEY_READ.0;
    pub const KEY_WRITE: u32 = reg::KEY_WRITE.0;
    pub const KEY_ALL_ACCESS: u32 = reg::KEY_ALL_ACCESS.0;
}

/// The same values as published in `winreg.h`, so the codec builds off Windows.
#[cfg(not(windows))]
mod raw {
    pub const REG_SZ: u32 = 1;
    pub const REG_DWORD: u32 = 4;
    pub const REG_MULTI_SZ: u32 = 7;

    pub const RRF_RT_REG_SZ: u32 = 0x0000_0002;
    pub const RRF_RT_REG_DWORD: u32 = 0x0000_0010;
    pub const RRF_RT_REG_MULTI_SZ: u32 = 0x0000_0020;

    pub const REG_CREATED_NEW_KEY: u32 = 1;
    pub const REG_OPENED_EXISTING_KEY: u32 = 2;

    pub const REG_OPTION_NON_VOLATILE: u32 = 0x0000_0000;
    pub const REG_OPTION_VOLATILE: u32 = 0x0000_0001;
    pub const REG_OPTION_CREATE_LINK: u32 = 0x0000_0002;
    pub const REG_OPTION_BACKUP_RESTORE: u32 = 0x0000_0004;
    pub const REG_OPTION_OPEN_LINK: u32 = 0x0000_0008;

    pub const KEY_QUERY_VALUE: u32 = 0x0001;
    pub const KEY_SET_VALUE: u32 = 0x0002;
    pub const KEY_CREATE_SUB_KEY: u32 = 0x0004;
    pub const KEY_ENUMERATE_SUB_KEYS: u32 = 0x0008;
    pub const KEY_NOTIFY: u32 = 0x0010;
    pub const KEY_WOW64_64KEY: u32 = 0x0100;
    pub const KEY_WOW64_32KEY: u32 = 0x0200;
    pub const KEY_READ: u32 = 0x0002_0019;
    pub const KEY_WRITE: u32 = 0x0002_0006;
    pub const KEY_ALL_ACCESS: u32 = 0x000F_003F;
}

// =============================================================================
// Value types
// =============================================================================

/// The value types this crate can read and write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// `REG_SZ`
    String,
    /// `REG_MULTI_SZ`
    MultiString,
    /// `REG_DWORD`
    Dword,
}

impl ValueType {
    /// Raw `REG_*` type tag stored alongside the value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        match self {
            Self::String => raw::REG_SZ,
            Self::Dword => raw::REG_DWORD,
            Self::MultiString => raw::REG_MULTI_SZ,
        }
    }

    /// `RRF_RT_*` flag restricting `RegGetValueW` to this type.
    #[must_use]
    pub const fn restrict_flag(self) -> u32 {
        match self {
            Self::String => raw::RRF_RT_REG_SZ,
            Self::Dword => raw::RRF_RT_REG_DWORD,
            Self::MultiString => raw::RRF_RT_REG_MULTI_SZ,
        }
    }

    #[must_use]
    pub const fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            raw::REG_SZ => Some(Self::String),
            raw::REG_DWORD => Some(Self::Dword),
            raw::REG_MULTI_SZ => Some(Self::MultiString),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::String => "REG_SZ",
            Self::MultiString => "REG_MULTI_SZ",
            Self::Dword => "REG_DWORD",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Key creation
// =============================================================================

/// Whether `create_key` made a new key or opened one that already existed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    CreatedNewKey,
    OpenedExistingKey,
}

impl Disposition {
    #[must_use]
    pub const fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            raw::REG_CREATED_NEW_KEY => Some(Self::CreatedNewKey),
            raw::REG_OPENED_EXISTING_KEY => Some(Self::OpenedExistingKey),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_new(&self) -> bool {
        matches!(self, Self::CreatedNewKey)
    }
}

/// `REG_OPTION_*` flags for `create_key`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyOptions(u32);

impl KeyOptions {
    pub const NON_VOLATILE: Self = Self(raw::REG_OPTION_NON_VOLATILE);
    pub const VOLATILE: Self = Self(raw::REG_OPTION_VOLATILE);
    pub const CREATE_LINK: Self = Self(raw::REG_OPTION_CREATE_LINK);
    pub const BACKUP_RESTORE: Self = Self(raw::REG_OPTION_BACKUP_RESTORE);
    pub const OPEN_LINK: Self = Self(raw::REG_OPTION_OPEN_LINK);

    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for KeyOptions {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// `KEY_*` access rights requested for a key handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Access(u32);

impl Access {
    pub const QUERY_VALUE: Self = Self(raw::KEY_QUERY_VALUE);
    pub const SET_VALUE: Self = Self(raw::KEY_SET_VALUE);
    pub const CREATE_SUB_KEY: Self = Self(raw::KEY_CREATE_SUB_KEY);
    pub const ENUMERATE_SUB_KEYS: Self = Self(raw::KEY_ENUMERATE_SUB_KEYS);
    pub const NOTIFY: Self = Self(raw::KEY_NOTIFY);
    pub const WOW64_64KEY: Self = Self(raw::KEY_WOW64_64KEY);
    pub const WOW64_32KEY: Self = Self(raw::KEY_WOW64_32KEY);
    pub const READ: Self = Self(raw::KEY_READ);
    pub const WRITE: Self = Self(raw::KEY_WRITE);
    pub const ALL_ACCESS: Self = Self(raw::KEY_ALL_ACCESS);

    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for Access {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}
