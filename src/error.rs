use crate::types::ValueType;
use thiserror::Error;

pub type Result<T = (), E = RegistryError> = std::result::Result<T, E>;

/// `ERROR_FILE_NOT_FOUND`
pub const ERROR_FILE_NOT_FOUND: u32 = 2;
/// `ERROR_PATH_NOT_FOUND`
pub const ERROR_PATH_NOT_FOUND: u32 = 3;
/// `ERROR_UNSUPPORTED_TYPE`, returned by `RegGetValueW` when the stored type
/// is excluded by the `RRF_RT_*` restriction flags.
pub const ERROR_UNSUPPORTED_TYPE: u32 = 1630;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Cannot encode {input:?}: {reason}")]
    Encoding { input: String, reason: &'static str },

    #[error("Registry key or value not found: {target}")]
    NotFound { target: String, code: u32 },

    #[error("Registry value {target} is not of type {expected}")]
    TypeMismatch { target: String, expected: ValueType },

    #[error("Registry call failed for {target}: {message} (code {code})")]
    Os {
        target: String,
        code: u32,
        message: String,
    },
}

impl RegistryError {
    /// Map a Win32 status code returned by a registry call.
    ///
    /// `expected` is the type a typed getter asked for; without it a type
    /// mismatch status is reported as a plain OS error.
    pub fn from_status(code: u32, target: impl Into<String>, expected: Option<ValueType>) -> Self {
        let target = target.into();
        match (code, expected) {
            (ERROR_FILE_NOT_FOUND | ERROR_PATH_NOT_FOUND, _) => Self::NotFound { target, code },
            (ERROR_UNSUPPORTED_TYPE, Some(expected)) => Self::TypeMismatch { target, expected },
            _ => Self::Os {
                target,
                code,
                message: system_message(code),
            },
        }
    }

    pub(crate) fn encoding(input: &str, reason: &'static str) -> Self {
        Self::Encoding {
            input: input.to_string(),
            reason,
        }
    }

    /// The Win32 status code behind this error, if it came from the OS.
    #[must_use]
    pub const fn code(&self) -> Option<u32> {
        match self {
            Self::Encoding { .. } => None,
            Self::NotFound { code, .. } | Self::Os { code, .. } => Some(*code),
            Self::TypeMismatch { .. } => Some(ERROR_UNSUPPORTED_TYPE),
        }
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

fn system_message(code: u32) -> String {
    #[cfg(windows)]
    {
        windows::core::HRESULT::from_win32(code).message()
    }

    #[cfg(not(windows))]
    {
        format!("system error {code}")
    }
}
