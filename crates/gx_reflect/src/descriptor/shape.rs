/// Scalar types with a fixed textual encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
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
}

/// How values of a type are laid out in a document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypeShape {
    Primitive(PrimitiveKind),
    String,
    /// An enum with the listed variant names.
    Enum(&'static [&'static str]),
    DateTime,
    Color,
    Point,
    List,
    Array,
    Map,
    /// A registered type with members.
    Record,
    /// A custom value formatter; never the type of a value itself.
    Formatter,
    /// The untyped slot, only ever holding null.
    Any,
}

impl TypeShape {
    /// Returns `true` for shapes stored in the object graph.
    #[inline]
    pub const fn is_object(self) -> bool {
        matches!(self, Self::List | Self::Array | Self::Map | Self::Record)
    }
}
