use alloc::string::String;

use thiserror::Error;

/// An error that occurs when parsing a qualified type name or a module
/// display name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum NameError {
    /// The input was empty or contained only whitespace.
    #[error("type name is empty")]
    Empty,
    /// The input has a module part but no type (or module) name before it.
    #[error("`{0}` has no leading name")]
    MissingName(String),
    /// A `[[` opened a generic argument that is never closed by `]]`.
    #[error("generic argument in `{0}` is not closed with `]]`")]
    UnclosedGeneric(String),
}
