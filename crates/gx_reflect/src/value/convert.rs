use alloc::string::String;

use chrono::NaiveDateTime;

use super::{Color, EnumValue, PointF, Value, ValueError};
use crate::graph::ObjectId;

/// Converts a Rust value into a [`Value`].
pub trait IntoValue {
    fn into_value(self) -> Value;
}

/// Converts a [`Value`] back into a Rust value.
///
/// [`accepts`](FromValue::accepts) is a cheap check used to pick a
/// constructor overload before any conversion happens.
pub trait FromValue: Sized {
    fn accepts(value: &Value) -> bool;

    fn from_value(value: Value) -> Result<Self, ValueError>;
}

macro_rules! impl_value_variant {
    ($($ty:ty => $variant:ident),* $(,)?) => {$(
        impl IntoValue for $ty {
            #[inline]
            fn into_value(self) -> Value {
                Value::$variant(self)
            }
        }

        impl FromValue for $ty {
            #[inline]
            fn accepts(value: &Value) -> bool {
                matches!(value, Value::$variant(_))
            }

            fn from_value(value: Value) -> Result<Self, ValueError> {
                match value {
                    Value::$variant(inner) => Ok(inner),
                    other => Err(ValueError::Mismatch {
                        expected: stringify!($ty),
                        found: other.kind(),
                    }),
                }
            }
        }
    )*};
}

impl_value_variant! {
    bool => Bool,
    char => Char,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    String => String,
    EnumValue => Enum,
    NaiveDateTime => DateTime,
    Color => Color,
    PointF => Point,
    ObjectId => Object,
}

impl IntoValue for &str {
    #[inline]
    fn into_value(self) -> Value {
        Value::String(String::from(self))
    }
}

/// `None` maps to [`Value::Null`].
impl<T: IntoValue> IntoValue for Option<T> {
    #[inline]
    fn into_value(self) -> Value {
        self.map_or(Value::Null, IntoValue::into_value)
    }
}

impl<T: FromValue> FromValue for Option<T> {
    #[inline]
    fn accepts(value: &Value) -> bool {
        value.is_null() || T::accepts(value)
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl IntoValue for Value {
    #[inline(always)]
    fn into_value(self) -> Value {
        self
    }
}

impl FromValue for Value {
    #[inline(always)]
    fn accepts(_: &Value) -> bool {
        true
    }

    #[inline(always)]
    fn from_value(value: Value) -> Result<Self, ValueError> {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ValueKind;

    #[test]
    fn primitives() {
        assert_eq!(7_i32.into_value(), Value::I32(7));
        assert_eq!(i32::from_value(Value::I32(7)), Ok(7));
        assert!(!i32::accepts(&Value::I64(7)));
        assert_eq!(
            i32::from_value(Value::I64(7)),
            Err(ValueError::Mismatch {
                expected: "i32",
                found: ValueKind::I64
            })
        );
        assert_eq!("abc".into_value(), Value::String(String::from("abc")));
    }

    #[test]
    fn options_map_to_null() {
        assert_eq!(None::<u8>.into_value(), Value::Null);
        assert_eq!(Option::<u8>::from_value(Value::Null), Ok(None));
        assert_eq!(Option::<u8>::from_value(Value::U8(3)), Ok(Some(3)));
        assert!(Option::<u8>::accepts(&Value::Null));
        assert!(!Option::<u8>::accepts(&Value::Bool(true)));
    }
}
