use alloc::borrow::Cow;
use alloc::string::{String, ToString};
use core::fmt;
use core::str::FromStr;

use super::{NameError, QualifiedTypeName, TypeKey};

/// The identity of a module that owns persisted types.
///
/// Mirrors the module part of a qualified type name:
/// `demo, Version=1.2.0.0, Culture=neutral, PublicKeyToken=null`.
/// A missing public-key token is written as `null`.
///
/// # Examples
///
/// ```
/// use gx_reflect::name::ModuleIdentity;
///
/// const DEMO: ModuleIdentity = ModuleIdentity::from_static("demo", "1.2.0.0");
///
/// assert_eq!(
///     DEMO.to_string(),
///     "demo, Version=1.2.0.0, Culture=neutral, PublicKeyToken=null",
/// );
///
/// let parsed: ModuleIdentity = "demo, Version=1.2.0.0, Culture=neutral, PublicKeyToken=null"
///     .parse()
///     .unwrap();
/// assert_eq!(parsed, DEMO);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ModuleIdentity {
    name: Cow<'static, str>,
    version: Option<Cow<'static, str>>,
    culture: Option<Cow<'static, str>>,
    public_key_token: Option<Cow<'static, str>>,
}

impl ModuleIdentity {
    /// Creates a culture-neutral identity without a public-key token.
    pub const fn from_static(name: &'static str, version: &'static str) -> Self {
        Self {
            name: Cow::Borrowed(name),
            version: Some(Cow::Borrowed(version)),
            culture: Some(Cow::Borrowed("neutral")),
            public_key_token: None,
        }
    }

    /// Creates an identity that only carries a name.
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            version: None,
            culture: None,
            public_key_token: None,
        }
    }

    pub fn with_version(mut self, version: impl Into<Cow<'static, str>>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_culture(mut self, culture: impl Into<Cow<'static, str>>) -> Self {
        self.culture = Some(culture.into());
        self
    }

    /// Sets the public-key token. `null` is treated as no token.
    pub fn with_public_key_token(mut self, token: impl Into<Cow<'static, str>>) -> Self {
        let token = token.into();
        self.public_key_token = (!token.eq_ignore_ascii_case("null")).then_some(token);
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    #[inline]
    pub fn culture(&self) -> Option<&str> {
        self.culture.as_deref()
    }

    #[inline]
    pub fn public_key_token(&self) -> Option<&str> {
        self.public_key_token.as_deref()
    }

    /// Builds the qualified name of `key` inside this module.
    pub fn qualify(&self, key: &TypeKey) -> QualifiedTypeName {
        QualifiedTypeName::new(key.as_str()).with_module(self)
    }

    /// Returns `true` if `name` may refer to a type of this module.
    ///
    /// The module name must match. A name without a version is partial and
    /// matches on the module name alone. Otherwise version and public-key
    /// token must match; the culture is only compared when both sides carry one.
    pub fn matches(&self, name: &QualifiedTypeName) -> bool {
        let Some(assembly) = name.assembly() else {
            return true;
        };
        if assembly != self.name() {
            return false;
        }
        let Some(version) = name.version() else {
            return true;
        };
        if self.version().is_some_and(|ours| ours != version) {
            return false;
        }
        if let (Some(ours), Some(theirs)) = (self.culture(), name.culture())
            && !ours.eq_ignore_ascii_case(theirs)
        {
            return false;
        }
        self.public_key_token() == name.public_key_token()
    }
}

impl fmt::Display for ModuleIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if let Some(version) = &self.version {
            write!(f, ", Version={version}")?;
        }
        if let Some(culture) = &self.culture {
            write!(f, ", Culture={culture}")?;
        }
        write!(f, ", PublicKeyToken={}", self.public_key_token().unwrap_or("null"))
    }
}

impl FromStr for ModuleIdentity {
    type Err = NameError;

    /// Parses a module display name, `Name, Version=.., Culture=.., PublicKeyToken=..`.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let text = text.trim();
        if text.is_empty() {
            return Err(NameError::Empty);
        }
        let mut tokens = text.split(',').map(str::trim);
        let name = tokens.next().unwrap_or_default();
        if name.is_empty() {
            return Err(NameError::MissingName(text.to_string()));
        }

        let mut module = Self::named(String::from(name));
        for token in tokens {
            if let Some(version) = token.strip_prefix("Version=") {
                module = module.with_version(String::from(version));
            } else if let Some(culture) = token.strip_prefix("Culture=") {
                module = module.with_culture(String::from(culture));
            } else if let Some(token) = token.strip_prefix("PublicKeyToken=") {
                module = module.with_public_key_token(String::from(token));
            }
        }
        Ok(module)
    }
}
