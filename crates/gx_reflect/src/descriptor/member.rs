use alloc::borrow::Cow;
use alloc::string::String;
use alloc::sync::Arc;
use core::any::Any;
use core::fmt;

use crate::name::TypeKey;
use crate::value::{Value, ValueError};

pub(crate) type Getter = Arc<dyn Fn(&dyn Any) -> Option<Value> + Send + Sync>;
pub(crate) type Setter = Arc<dyn Fn(&mut dyn Any, Value) -> Result<(), ValueError> + Send + Sync>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Field,
    Property,
}

/// Non-public members are written before public ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Visibility {
    Private,
    Public,
}

/// A persisted field or property.
#[derive(Clone)]
pub struct MemberDescriptor {
    pub(crate) name: Cow<'static, str>,
    pub(crate) declared_name: &'static str,
    pub(crate) declaring_type: TypeKey,
    pub(crate) kind: MemberKind,
    pub(crate) visibility: Visibility,
    pub(crate) ctor_arg: Option<usize>,
    pub(crate) formatter: Option<TypeKey>,
    pub(crate) getter: Getter,
    pub(crate) setter: Option<Setter>,
    pub(crate) accepts: fn(&Value) -> bool,
    pub(crate) value_type: &'static str,
    /// Inheritance level, `0` for the most basic type. `None` until the
    /// builder resolves it.
    pub(crate) depth: Option<usize>,
}

impl MemberDescriptor {
    /// The logical name written to documents.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The Rust name the member was declared with.
    #[inline]
    pub fn declared_name(&self) -> &'static str {
        self.declared_name
    }

    /// The type that declared the member; differs from the described type
    /// for inherited members.
    #[inline]
    pub fn declaring_type(&self) -> &TypeKey {
        &self.declaring_type
    }

    #[inline]
    pub fn kind(&self) -> MemberKind {
        self.kind
    }

    #[inline]
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Position of the member in the constructor argument list.
    #[inline]
    pub fn constructor_argument(&self) -> Option<usize> {
        self.ctor_arg
    }

    /// Key of the custom formatter attached to the member.
    #[inline]
    pub fn formatter(&self) -> Option<&TypeKey> {
        self.formatter.as_ref()
    }

    #[inline]
    pub fn is_writable(&self) -> bool {
        self.setter.is_some()
    }

    /// Reads the member from `record`.
    ///
    /// Returns `None` if `record` is not of the declaring type.
    pub fn get(&self, record: &dyn Any) -> Option<Value> {
        (self.getter)(record)
    }

    /// Checks that `value` can be assigned to the member without touching a
    /// record.
    ///
    /// A value that passes the check is only rejected by [`set`](Self::set)
    /// when the record has the wrong type.
    pub fn check(&self, value: &Value) -> Result<(), ValueError> {
        if self.setter.is_none() {
            return Err(ValueError::ReadOnly(String::from(&*self.name)));
        }
        if (self.accepts)(value) {
            Ok(())
        } else {
            Err(ValueError::Mismatch {
                expected: self.value_type,
                found: value.kind(),
            })
        }
    }

    /// Assigns `value` to the member of `record`.
    pub fn set(&self, record: &mut dyn Any, value: Value) -> Result<(), ValueError> {
        match &self.setter {
            Some(setter) => setter(record, value),
            None => Err(ValueError::ReadOnly(String::from(&*self.name))),
        }
    }
}

impl fmt::Debug for MemberDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberDescriptor")
            .field("name", &self.name)
            .field("declared_name", &self.declared_name)
            .field("declaring_type", &self.declaring_type)
            .field("kind", &self.kind)
            .field("visibility", &self.visibility)
            .field("ctor_arg", &self.ctor_arg)
            .field("formatter", &self.formatter)
            .field("value_type", &self.value_type)
            .field("writable", &self.is_writable())
            .finish_non_exhaustive()
    }
}
