/// Submits types for [`TypeRegistry::auto_register`].
///
/// Plain types are registered as records. Prefix a type with `enum` or
/// `formatter` to register it through
/// [`register_enum`](crate::registry::TypeRegistry::register_enum) or
/// [`register_formatter`](crate::registry::TypeRegistry::register_formatter).
///
/// Expands to nothing without the `auto_register` feature.
///
/// ```ignore
/// gx_reflect::impl_auto_register!(Layer, enum LineStyle, formatter UpperCase);
/// ```
///
/// [`TypeRegistry::auto_register`]: crate::registry::TypeRegistry::auto_register
#[cfg(feature = "auto_register")]
#[macro_export]
macro_rules! impl_auto_register {
    (@submit $method:ident $ty:ty) => {
        const _: () = {
            use $crate::__macro_exports::auto_register as __auto;
            __auto::inventory::submit! {
                __auto::AutoRegistration::new(|registry| {
                    registry.$method::<$ty>();
                })
            }
        };
    };
    () => {};
    (enum $ty:ty $(, $($rest:tt)*)?) => {
        $crate::impl_auto_register!(@submit register_enum $ty);
        $($crate::impl_auto_register!($($rest)*);)?
    };
    (formatter $ty:ty $(, $($rest:tt)*)?) => {
        $crate::impl_auto_register!(@submit register_formatter $ty);
        $($crate::impl_auto_register!($($rest)*);)?
    };
    ($ty:ty $(, $($rest:tt)*)?) => {
        $crate::impl_auto_register!(@submit register $ty);
        $($crate::impl_auto_register!($($rest)*);)?
    };
}

#[cfg(not(feature = "auto_register"))]
#[macro_export]
macro_rules! impl_auto_register {
    ($($tt:tt)*) => {};
}
