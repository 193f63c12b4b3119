use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;

use crate::value::{FromValue, Value, ValueError};

/// A tuple of constructor parameters.
///
/// Implemented for tuples of up to eight [`FromValue`] types; `()` is the
/// parameterless constructor.
pub trait CtorArgs: Sized + 'static {
    const ARITY: usize;

    /// Returns `true` if every value is accepted by the parameter at the same
    /// position.
    fn accepts(values: &[Value]) -> bool;

    fn from_values(values: Vec<Value>) -> Result<Self, ValueError>;
}

macro_rules! impl_ctor_args {
    ($len:literal $(, $name:ident : $idx:tt)*) => {
        impl<$($name: FromValue + 'static),*> CtorArgs for ($($name,)*) {
            const ARITY: usize = $len;

            #[allow(unused_variables, reason = "unused by the empty tuple")]
            fn accepts(values: &[Value]) -> bool {
                values.len() == $len $(&& $name::accepts(&values[$idx]))*
            }

            #[allow(unused_mut, unused_variables, reason = "unused by the empty tuple")]
            fn from_values(values: Vec<Value>) -> Result<Self, ValueError> {
                if values.len() != $len {
                    return Err(ValueError::Arity { expected: $len, found: values.len() });
                }
                let mut values = values.into_iter();
                Ok(($($name::from_value(values.next().unwrap_or_default())?,)*))
            }
        }
    };
}

impl_ctor_args!(0);
impl_ctor_args!(1, A: 0);
impl_ctor_args!(2, A: 0, B: 1);
impl_ctor_args!(3, A: 0, B: 1, C: 2);
impl_ctor_args!(4, A: 0, B: 1, C: 2, D: 3);
impl_ctor_args!(5, A: 0, B: 1, C: 2, D: 3, E: 4);
impl_ctor_args!(6, A: 0, B: 1, C: 2, D: 3, E: 4, F: 5);
impl_ctor_args!(7, A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6);
impl_ctor_args!(8, A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7);

type Build = Arc<dyn Fn(Vec<Value>) -> Result<Box<dyn Any + Send + Sync>, ValueError> + Send + Sync>;

/// One constructor overload of a record type.
#[derive(Clone)]
pub struct Constructor {
    arity: usize,
    accepts: fn(&[Value]) -> bool,
    build: Build,
}

impl Constructor {
    pub(crate) fn new<A, T, F>(func: F) -> Self
    where
        A: CtorArgs,
        T: Any + Send + Sync,
        F: Fn(A) -> T + Send + Sync + 'static,
    {
        Self {
            arity: A::ARITY,
            accepts: A::accepts,
            build: Arc::new(move |values| {
                let args = A::from_values(values)?;
                Ok(Box::new(func(args)) as Box<dyn Any + Send + Sync>)
            }),
        }
    }

    #[inline]
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Returns `true` if this overload can be called with `args`.
    #[inline]
    pub fn accepts(&self, args: &[Value]) -> bool {
        args.len() == self.arity && (self.accepts)(args)
    }

    pub fn invoke(&self, args: Vec<Value>) -> Result<Box<dyn Any + Send + Sync>, ValueError> {
        (self.build)(args)
    }
}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constructor")
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::String;
    use alloc::vec;

    #[test]
    fn tuple_arguments() {
        assert_eq!(<(i32, String)>::ARITY, 2);
        assert!(<(i32, String)>::accepts(&[Value::I32(1), Value::String(String::new())]));
        assert!(!<(i32, String)>::accepts(&[Value::I32(1)]));
        assert!(!<(i32, String)>::accepts(&[Value::I64(1), Value::String(String::new())]));

        let (a, b) =
            <(i32, Option<String>)>::from_values(vec![Value::I32(4), Value::Null]).unwrap();
        assert_eq!((a, b), (4, None));
        assert_eq!(
            <()>::from_values(vec![Value::Null]),
            Err(ValueError::Arity { expected: 0, found: 1 })
        );
    }

    #[test]
    fn constructor_builds_boxed_record() {
        let ctor = Constructor::new(|(x, y): (i32, i32)| x * y);
        assert_eq!(ctor.arity(), 2);
        assert!(ctor.accepts(&[Value::I32(3), Value::I32(5)]));
        let built = ctor.invoke(vec![Value::I32(3), Value::I32(5)]).unwrap();
        assert_eq!(built.downcast_ref::<i32>(), Some(&15));
    }
}
