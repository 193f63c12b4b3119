use alloc::string::String;
use core::any::Any;

use super::FormatError;
use crate::descriptor::DescriptorBuilder;
use crate::name::{ModuleIdentity, TypeKey};
use crate::value::{EnumValue, Value, ValueError, ValueKind};

/// A record type that can be written to and read from documents.
///
/// Usually derived with [`#[derive(Persist)]`](crate::derive::Persist).
pub trait Persist: Any + Send + Sync + Sized {
    /// Logical type name, unique within the registry.
    const TYPE_NAME: &'static str;
    /// The module the type belongs to.
    const MODULE: ModuleIdentity;

    /// Declares members and constructors.
    fn describe(desc: &mut DescriptorBuilder<Self>);
}

/// An enum written by variant name.
///
/// Usually derived with [`#[derive(PersistEnum)]`](crate::derive::PersistEnum).
pub trait PersistEnum: Copy + Send + Sync + 'static {
    const TYPE_NAME: &'static str;
    const MODULE: ModuleIdentity;
    const VARIANTS: &'static [&'static str];

    fn variant_name(&self) -> &'static str;

    fn from_variant(name: &str) -> Option<Self>;

    fn to_enum_value(&self) -> EnumValue {
        EnumValue::new(TypeKey::from_static(Self::TYPE_NAME), self.variant_name())
    }

    fn from_enum_value(value: &EnumValue) -> Result<Self, ValueError> {
        if value.ty().as_str() != Self::TYPE_NAME {
            return Err(ValueError::Mismatch {
                expected: Self::TYPE_NAME,
                found: ValueKind::Enum,
            });
        }
        Self::from_variant(value.variant()).ok_or_else(|| ValueError::UnknownVariant {
            ty: value.ty().clone(),
            variant: value.variant().into(),
        })
    }
}

/// Converts values to and from a custom textual form.
pub trait ValueFormatter: Send + Sync + 'static {
    fn format(&self, value: &Value) -> Result<String, FormatError>;

    fn parse(&self, text: &str) -> Result<Value, FormatError>;
}

/// A formatter that can be registered and referenced by type name.
pub trait PersistFormatter: ValueFormatter + Default {
    const TYPE_NAME: &'static str;
    const MODULE: ModuleIdentity;
}
