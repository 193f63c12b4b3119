use alloc::borrow::Cow;
use alloc::string::String;

use gx_reflect::graph::ObjectId;
use gx_reflect::name::{NameError, TypeKey};
use gx_reflect::registry::{FormatError, RegistryError};
use gx_reflect::value::ValueError;
use thiserror::Error;

/// An error that occurs while writing a document.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EncodeError {
    #[error("cannot serialize a null root value")]
    NullRoot,
    #[error("object {0:?} is not part of the graph")]
    DanglingObject(ObjectId),
    #[error("object {id:?} does not hold the record its type `{ty}` describes")]
    RecordMismatch { id: ObjectId, ty: TypeKey },
    #[error("formatter `{0}` is not registered")]
    UnknownFormatter(TypeKey),
    #[error("formatter `{formatter}` failed on member `{member}`")]
    Format {
        formatter: TypeKey,
        member: String,
        #[source]
        source: FormatError,
    },
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("failed to write document: {0}")]
    Write(String),
}

/// An error that occurs while reading a document.
///
/// Errors about a specific element carry its `path` from the root, e.g.
/// `root/member[Shapes]/item[2]`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DecodeError {
    #[error("failed to parse document: {0}")]
    Xml(String),
    #[error("malformed document at `{path}`: {reason}")]
    Structural {
        path: String,
        reason: Cow<'static, str>,
    },
    #[error("invalid type name `{name}`")]
    TypeName {
        name: String,
        #[source]
        source: NameError,
    },
    #[error("type `{name}` is not registered, a plugin module may be missing")]
    UnknownType { name: String },
    #[error("type id {id} at `{path}` is not declared in the type table")]
    UndeclaredType { path: String, id: u32 },
    #[error("constructor arguments at `{path}` are not contiguous, expected index {expected} but found {found}")]
    ConstructorArgumentGap {
        path: String,
        expected: usize,
        found: usize,
    },
    #[error("no constructor of `{ty}` accepts the {arity} argument(s) at `{path}`")]
    NoMatchingConstructor {
        path: String,
        ty: TypeKey,
        arity: usize,
    },
    #[error("reference {reference} at `{path}` does not point to an object defined before it")]
    UnresolvedReference { path: String, reference: u32 },
    #[error("`{text}` at `{path}` is not a valid `{ty}`")]
    InvalidScalar {
        path: String,
        ty: TypeKey,
        text: String,
    },
    #[error("invalid value at `{path}`")]
    Value {
        path: String,
        #[source]
        source: ValueError,
    },
    #[error("formatter `{formatter}` failed at `{path}`")]
    Format {
        path: String,
        formatter: TypeKey,
        #[source]
        source: FormatError,
    },
    #[error("target object holds a `{found}` but the document describes a `{expected}`")]
    TargetMismatch { expected: TypeKey, found: TypeKey },
    #[error(transparent)]
    Registry(#[from] RegistryError),
}
