use alloc::string::String;

use thiserror::Error;

use super::ValueKind;
use crate::name::TypeKey;

/// An error that occurs when converting or assigning a [`Value`](super::Value).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ValueError {
    #[error("expected a `{expected}` value, found `{found}`")]
    Mismatch {
        expected: &'static str,
        found: ValueKind,
    },
    #[error("`{variant}` is not a variant of enum `{ty}`")]
    UnknownVariant { ty: TypeKey, variant: String },
    #[error("expected {expected} constructor argument(s), found {found}")]
    Arity { expected: usize, found: usize },
    #[error("record does not have the type `{0}` its descriptor was built for")]
    RecordMismatch(TypeKey),
    #[error("member `{0}` has no setter")]
    ReadOnly(String),
}
