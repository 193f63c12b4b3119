use crate::descriptor::{PrimitiveKind, TypeShape};
use crate::name::{TypeKey, builtin};

pub(super) const BUILTINS: &[(TypeKey, TypeShape)] = &[
    (builtin::BOOL, TypeShape::Primitive(PrimitiveKind::Bool)),
    (builtin::CHAR, TypeShape::Primitive(PrimitiveKind::Char)),
    (builtin::I8, TypeShape::Primitive(PrimitiveKind::I8)),
    (builtin::I16, TypeShape::Primitive(PrimitiveKind::I16)),
    (builtin::I32, TypeShape::Primitive(PrimitiveKind::I32)),
    (builtin::I64, TypeShape::Primitive(PrimitiveKind::I64)),
    (builtin::U8, TypeShape::Primitive(PrimitiveKind::U8)),
    (builtin::U16, TypeShape::Primitive(PrimitiveKind::U16)),
    (builtin::U32, TypeShape::Primitive(PrimitiveKind::U32)),
    (builtin::U64, TypeShape::Primitive(PrimitiveKind::U64)),
    (builtin::F32, TypeShape::Primitive(PrimitiveKind::F32)),
    (builtin::F64, TypeShape::Primitive(PrimitiveKind::F64)),
    (builtin::STRING, TypeShape::String),
    (builtin::DATE_TIME, TypeShape::DateTime),
    (builtin::COLOR, TypeShape::Color),
    (builtin::POINT, TypeShape::Point),
    (builtin::LIST, TypeShape::List),
    (builtin::ARRAY, TypeShape::Array),
    (builtin::MAP, TypeShape::Map),
    (builtin::OBJECT, TypeShape::Any),
];
