use alloc::string::String;

use thiserror::Error;

use crate::name::TypeKey;

/// An error that occurs when querying a [`TypeRegistry`](super::TypeRegistry).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum RegistryError {
    #[error("type `{0}` was not found in the registry")]
    NotRegistered(TypeKey),
    #[error("Rust type `{0}` has not been registered")]
    UnregisteredRustType(&'static str),
    #[error("`{0}` is not a record type and cannot carry a custom descriptor map")]
    NotARecord(TypeKey),
}

/// An error returned by a [`ValueFormatter`](super::ValueFormatter).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct FormatError {
    message: String,
}

impl FormatError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// An error returned by a custom descriptor map.
///
/// The registry logs it and falls back to the next map or to the default
/// descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CustomMapError {
    message: String,
}

impl CustomMapError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
