use alloc::borrow::Cow;
use alloc::string::String;
use core::borrow::Borrow;
use core::fmt;

/// The logical name of a persisted type.
///
/// Keys compare by text only; the owning module is a property of the
/// registration, not of the key.
///
/// # Examples
///
/// ```
/// use gx_reflect::name::TypeKey;
///
/// const LAYER: TypeKey = TypeKey::from_static("demo.Layer");
///
/// assert_eq!(LAYER, TypeKey::new(String::from("demo.Layer")));
/// assert_eq!(LAYER.as_str(), "demo.Layer");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeKey(Cow<'static, str>);

impl TypeKey {
    /// Creates a key from a static string, usable in constants.
    #[inline(always)]
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// Creates a key from a borrowed or owned string.
    #[inline]
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    #[inline(always)]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for TypeKey {
    #[inline(always)]
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TypeKey {
    #[inline(always)]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for TypeKey {
    #[inline]
    fn from(value: &'static str) -> Self {
        Self::from_static(value)
    }
}

impl From<String> for TypeKey {
    #[inline]
    fn from(value: String) -> Self {
        Self(Cow::Owned(value))
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}
