use alloc::borrow::Cow;
use alloc::string::String;
use core::fmt;

use chrono::NaiveDateTime;

use super::{Color, PointF};
use crate::graph::ObjectId;
use crate::name::{TypeKey, builtin};

/// A single persisted value.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    /// Absence of a value.
    #[default]
    Null,
    Bool(bool),
    Char(char),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    String(String),
    Enum(EnumValue),
    DateTime(NaiveDateTime),
    Color(Color),
    Point(PointF),
    /// A record or collection stored in the graph.
    Object(ObjectId),
}

/// The variant of a [`Value`], used in error messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Char,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    String,
    Enum,
    DateTime,
    Color,
    Point,
    Object,
}

impl ValueKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Char => "char",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::String => "string",
            Self::Enum => "enum",
            Self::DateTime => "datetime",
            Self::Color => "color",
            Self::Point => "pointf",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Value {
    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[inline]
    pub const fn as_object(&self) -> Option<ObjectId> {
        match self {
            Self::Object(id) => Some(*id),
            _ => None,
        }
    }

    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::Bool(_) => ValueKind::Bool,
            Self::Char(_) => ValueKind::Char,
            Self::I8(_) => ValueKind::I8,
            Self::I16(_) => ValueKind::I16,
            Self::I32(_) => ValueKind::I32,
            Self::I64(_) => ValueKind::I64,
            Self::U8(_) => ValueKind::U8,
            Self::U16(_) => ValueKind::U16,
            Self::U32(_) => ValueKind::U32,
            Self::U64(_) => ValueKind::U64,
            Self::F32(_) => ValueKind::F32,
            Self::F64(_) => ValueKind::F64,
            Self::String(_) => ValueKind::String,
            Self::Enum(_) => ValueKind::Enum,
            Self::DateTime(_) => ValueKind::DateTime,
            Self::Color(_) => ValueKind::Color,
            Self::Point(_) => ValueKind::Point,
            Self::Object(_) => ValueKind::Object,
        }
    }

    /// The type key of an inline value.
    ///
    /// Returns `None` for [`Value::Null`] and [`Value::Object`]; the type of
    /// an object is stored in the graph.
    pub fn inline_type(&self) -> Option<TypeKey> {
        Some(match self {
            Self::Null | Self::Object(_) => return None,
            Self::Bool(_) => builtin::BOOL,
            Self::Char(_) => builtin::CHAR,
            Self::I8(_) => builtin::I8,
            Self::I16(_) => builtin::I16,
            Self::I32(_) => builtin::I32,
            Self::I64(_) => builtin::I64,
            Self::U8(_) => builtin::U8,
            Self::U16(_) => builtin::U16,
            Self::U32(_) => builtin::U32,
            Self::U64(_) => builtin::U64,
            Self::F32(_) => builtin::F32,
            Self::F64(_) => builtin::F64,
            Self::String(_) => builtin::STRING,
            Self::Enum(value) => value.ty().clone(),
            Self::DateTime(_) => builtin::DATE_TIME,
            Self::Color(_) => builtin::COLOR,
            Self::Point(_) => builtin::POINT,
        })
    }
}

/// A named variant of a registered enum type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EnumValue {
    ty: TypeKey,
    variant: Cow<'static, str>,
}

impl EnumValue {
    pub fn new(ty: TypeKey, variant: impl Into<Cow<'static, str>>) -> Self {
        Self {
            ty,
            variant: variant.into(),
        }
    }

    #[inline]
    pub fn ty(&self) -> &TypeKey {
        &self.ty
    }

    #[inline]
    pub fn variant(&self) -> &str {
        &self.variant
    }
}
