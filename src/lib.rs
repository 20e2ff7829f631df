//! Typed access to Windows Registry string, multi-string and DWORD values.
//!
//! [`codec`] converts between Rust values and the registry's UTF-16 and DWORD
//! layouts and builds on every platform. [`registry`] makes the OS calls and is
//! only available on Windows.

pub mod codec;
pub mod error;
#[cfg(windows)]
pub mod registry;
pub mod types;

#[cfg(windows)]
pub use crate::registry::{
    create_key, delete_key, delete_key_value, delete_tree, get_value_multi_string,
    get_value_string, get_value_u32, set_key_value_multi_string, set_key_value_string,
    set_key_value_u32, AsRawKey, OwnedKey,
};

pub use crate::error::{RegistryError, Result};

pub use crate::types::{Access, Disposition, KeyOptions, ValueType};

pub mod prelude {
    pub use crate::error::{RegistryError, Result};
    #[cfg(windows)]
    pub use crate::registry::{
        create_key, delete_key, delete_key_value, delete_tree, get_value_multi_string,
        get_value_string, get_value_u32, set_key_value_multi_string, set_key_value_string,
        set_key_value_u32, AsRawKey, OwnedKey,
    };
    pub use crate::types::{Access, Disposition, KeyOptions, ValueType};
}
