//! Keys of the types every registry knows without registration.
//!
//! All of them belong to [`CORE_MODULE`].

use super::{ModuleIdentity, TypeKey};

/// The module that owns the builtin types.
pub const CORE_MODULE: ModuleIdentity = ModuleIdentity::from_static("gx_core", "0.1.0.0");

pub const BOOL: TypeKey = TypeKey::from_static("bool");
pub const CHAR: TypeKey = TypeKey::from_static("char");
pub const I8: TypeKey = TypeKey::from_static("i8");
pub const I16: TypeKey = TypeKey::from_static("i16");
pub const I32: TypeKey = TypeKey::from_static("i32");
pub const I64: TypeKey = TypeKey::from_static("i64");
pub const U8: TypeKey = TypeKey::from_static("u8");
pub const U16: TypeKey = TypeKey::from_static("u16");
pub const U32: TypeKey = TypeKey::from_static("u32");
pub const U64: TypeKey = TypeKey::from_static("u64");
pub const F32: TypeKey = TypeKey::from_static("f32");
pub const F64: TypeKey = TypeKey::from_static("f64");
pub const STRING: TypeKey = TypeKey::from_static("string");
pub const DATE_TIME: TypeKey = TypeKey::from_static("datetime");
pub const COLOR: TypeKey = TypeKey::from_static("color");
pub const POINT: TypeKey = TypeKey::from_static("pointf");

/// Growable sequence; the element type is written as a generic argument.
pub const LIST: TypeKey = TypeKey::from_static("list");
/// Fixed-length sequence; the element type is written as a generic argument.
pub const ARRAY: TypeKey = TypeKey::from_static("array");
/// Key/value collection. Entries carry their own types.
pub const MAP: TypeKey = TypeKey::from_static("map");
/// Untyped slot. Also marks null list items and constructor arguments.
pub const OBJECT: TypeKey = TypeKey::from_static("object");
