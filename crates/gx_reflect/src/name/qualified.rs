use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::string::{String, ToString};
use core::fmt;
use core::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{ModuleIdentity, NameError};

/// A type name paired with the identity of its owning module.
///
/// The textual form is a comma-separated list: the type name, then the module
/// name, then optional `Version=`, `Culture=` and `PublicKeyToken=` tokens.
/// Unknown tokens are ignored on parse and dropped on format.
///
/// One generic argument may be embedded as `[[...]]`. The bracketed text is
/// itself a qualified name and parses recursively; the outer name is the text
/// with that span removed. Only the outermost `[[` and the last `]]` are
/// considered, so names with several generic arguments are not supported.
///
/// # Examples
///
/// ```
/// use gx_reflect::name::QualifiedTypeName;
///
/// let text = "list[[demo.Layer, demo, Version=1.0.0.0, Culture=neutral, PublicKeyToken=null]], \
///             gx_core, Version=0.1.0.0, Culture=neutral, PublicKeyToken=null";
/// let name: QualifiedTypeName = text.parse().unwrap();
///
/// assert_eq!(name.type_name(), "list");
/// assert_eq!(name.assembly(), Some("gx_core"));
/// assert_eq!(name.enclosed().unwrap().type_name(), "demo.Layer");
/// assert_eq!(name.to_string(), text);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct QualifiedTypeName {
    type_name: String,
    assembly: Option<String>,
    version: Option<String>,
    culture: Option<String>,
    public_key_token: Option<String>,
    enclosed: Option<Enclosed>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct Enclosed {
    /// Byte offset into `type_name` where `[[...]]` is re-inserted.
    at: usize,
    name: Box<QualifiedTypeName>,
}

impl QualifiedTypeName {
    /// Creates a name without module information.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            ..Self::default()
        }
    }

    /// Parses the textual form.
    ///
    /// # Errors
    ///
    /// - [`NameError::Empty`] if `text` is blank.
    /// - [`NameError::MissingName`] if the leading type name is blank.
    /// - [`NameError::UnclosedGeneric`] if a `[[` has no matching `]]`.
    pub fn parse(text: &str) -> Result<Self, NameError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(NameError::Empty);
        }

        let (outer, enclosed) = match text.find("[[") {
            Some(open) => {
                let close = text
                    .rfind("]]")
                    .filter(|close| *close > open)
                    .ok_or_else(|| NameError::UnclosedGeneric(text.to_string()))?;
                let inner = Self::parse(&text[open + 2..close])?;
                let mut outer = String::with_capacity(text.len() - (close + 2 - open));
                outer.push_str(&text[..open]);
                outer.push_str(&text[close + 2..]);
                (Cow::Owned(outer), Some((open, inner)))
            }
            None => (Cow::Borrowed(text), None),
        };

        let mut tokens = outer.split(',').map(str::trim);
        let type_name = tokens.next().unwrap_or_default();
        if type_name.is_empty() {
            return Err(NameError::MissingName(text.to_string()));
        }

        let mut name = Self::new(type_name);
        name.assembly = tokens.next().filter(|t| !t.is_empty()).map(String::from);
        for token in tokens {
            if let Some(version) = token.strip_prefix("Version=") {
                name.version = Some(String::from(version));
            } else if let Some(culture) = token.strip_prefix("Culture=") {
                name.culture = Some(String::from(culture));
            } else if let Some(token) = token.strip_prefix("PublicKeyToken=") {
                name.public_key_token =
                    (!token.eq_ignore_ascii_case("null")).then(|| String::from(token));
            }
        }

        if let Some((at, inner)) = enclosed {
            name.enclosed = Some(Enclosed {
                at: at.min(name.type_name.len()),
                name: Box::new(inner),
            });
        }
        Ok(name)
    }

    /// Sets the module part from `module`, replacing any previous one.
    pub fn with_module(mut self, module: &ModuleIdentity) -> Self {
        self.assembly = Some(String::from(module.name()));
        self.version = module.version().map(String::from);
        self.culture = module.culture().map(String::from);
        self.public_key_token = module.public_key_token().map(String::from);
        self
    }

    /// Embeds `argument` as the generic argument, right after the type name.
    pub fn with_enclosed(mut self, argument: QualifiedTypeName) -> Self {
        self.enclosed = Some(Enclosed {
            at: self.type_name.len(),
            name: Box::new(argument),
        });
        self
    }

    #[inline]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The module name, if the name is qualified.
    #[inline]
    pub fn assembly(&self) -> Option<&str> {
        self.assembly.as_deref()
    }

    #[inline]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    #[inline]
    pub fn culture(&self) -> Option<&str> {
        self.culture.as_deref()
    }

    /// The public-key token; `None` when absent or `null`.
    #[inline]
    pub fn public_key_token(&self) -> Option<&str> {
        self.public_key_token.as_deref()
    }

    #[inline]
    pub fn enclosed(&self) -> Option<&QualifiedTypeName> {
        self.enclosed.as_ref().map(|e| &*e.name)
    }

    #[inline]
    pub fn enclosed_mut(&mut self) -> Option<&mut QualifiedTypeName> {
        self.enclosed.as_mut().map(|e| &mut *e.name)
    }

    /// Overwrites version and public-key token with those of `module`.
    ///
    /// The culture is left untouched. Returns `true` if anything changed.
    pub fn apply_module(&mut self, module: &ModuleIdentity) -> bool {
        let version = module.version().map(String::from);
        let token = module.public_key_token().map(String::from);
        let changed = self.version != version || self.public_key_token != token;
        self.version = version;
        self.public_key_token = token;
        changed
    }

    /// The module identity named by this type name, if it is qualified.
    pub fn module(&self) -> Option<ModuleIdentity> {
        let mut module = ModuleIdentity::named(self.assembly.clone()?);
        if let Some(version) = &self.version {
            module = module.with_version(version.clone());
        }
        if let Some(culture) = &self.culture {
            module = module.with_culture(culture.clone());
        }
        if let Some(token) = &self.public_key_token {
            module = module.with_public_key_token(token.clone());
        }
        Some(module)
    }
}

impl fmt::Display for QualifiedTypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.enclosed {
            Some(Enclosed { at, name }) => {
                let (head, tail) = self.type_name.split_at(*at);
                write!(f, "{head}[[{name}]]{tail}")?;
            }
            None => f.write_str(&self.type_name)?,
        }

        let Some(assembly) = &self.assembly else {
            return Ok(());
        };
        write!(f, ", {assembly}")?;
        if let Some(version) = &self.version {
            write!(f, ", Version={version}")?;
        }
        if let Some(culture) = &self.culture {
            write!(f, ", Culture={culture}")?;
        }
        write!(f, ", PublicKeyToken={}", self.public_key_token().unwrap_or("null"))
    }
}

impl FromStr for QualifiedTypeName {
    type Err = NameError;

    #[inline]
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::parse(text)
    }
}

impl Serialize for QualifiedTypeName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for QualifiedTypeName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = <Cow<'de, str>>::deserialize(deserializer)?;
        Self::parse(&text).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    const FULL: &str = "demo.Layer, demo, Version=1.2.0.0, Culture=neutral, PublicKeyToken=b77a5c561934e089";

    #[test]
    fn parse_full_name() {
        let name = QualifiedTypeName::parse(FULL).unwrap();
        assert_eq!(name.type_name(), "demo.Layer");
        assert_eq!(name.assembly(), Some("demo"));
        assert_eq!(name.version(), Some("1.2.0.0"));
        assert_eq!(name.culture(), Some("neutral"));
        assert_eq!(name.public_key_token(), Some("b77a5c561934e089"));
        assert!(name.enclosed().is_none());
        assert_eq!(name.to_string(), FULL);
    }

    #[test]
    fn whitespace_and_unknown_tokens() {
        let name = QualifiedTypeName::parse(
            "  demo.Layer ,demo,  Custom=1, Version=2.0.0.0 ,PublicKeyToken=null ",
        )
        .unwrap();
        assert_eq!(name.type_name(), "demo.Layer");
        assert_eq!(name.version(), Some("2.0.0.0"));
        assert_eq!(name.culture(), None);
        assert_eq!(name.public_key_token(), None);
        assert_eq!(
            name.to_string(),
            "demo.Layer, demo, Version=2.0.0.0, PublicKeyToken=null"
        );
    }

    #[test]
    fn bare_type_name() {
        let name = QualifiedTypeName::parse("demo.Layer").unwrap();
        assert_eq!(name.assembly(), None);
        assert_eq!(name.to_string(), "demo.Layer");
    }

    #[test]
    fn enclosed_in_the_middle() {
        let text = "Outer`1[[Inner, inner, Version=1.0.0.0, Culture=neutral, PublicKeyToken=null]]+Nested, outer, Version=3.0.0.0, Culture=neutral, PublicKeyToken=null";
        let name = QualifiedTypeName::parse(text).unwrap();
        assert_eq!(name.type_name(), "Outer`1+Nested");
        assert_eq!(name.enclosed().unwrap().type_name(), "Inner");
        assert_eq!(name.enclosed().unwrap().assembly(), Some("inner"));
        assert_eq!(name.to_string(), text);
    }

    #[test]
    fn apply_module_keeps_culture() {
        let mut name = QualifiedTypeName::parse(
            "demo.Layer, demo, Version=1.0.0.0, Culture=de-DE, PublicKeyToken=null",
        )
        .unwrap();
        let module = ModuleIdentity::from_static("demo", "2.0.0.0").with_public_key_token("abc");
        assert!(name.apply_module(&module));
        assert_eq!(
            name.to_string(),
            "demo.Layer, demo, Version=2.0.0.0, Culture=de-DE, PublicKeyToken=abc"
        );
        assert!(!name.apply_module(&module));
    }

    #[test]
    fn malformed_names() {
        assert_eq!(QualifiedTypeName::parse("   "), Err(NameError::Empty));
        assert!(matches!(
            QualifiedTypeName::parse("list[[Inner, inner"),
            Err(NameError::UnclosedGeneric(_))
        ));
        assert!(matches!(
            QualifiedTypeName::parse(", demo"),
            Err(NameError::MissingName(_))
        ));
    }

    #[test]
    fn serde_as_string() {
        let name = QualifiedTypeName::parse(FULL).unwrap();
        let text = ron::to_string(&name).unwrap();
        assert_eq!(text, ron::to_string(FULL).unwrap());
        let back: QualifiedTypeName = ron::from_str(&text).unwrap();
        assert_eq!(back, name);
    }
}
