use gx_reflect::resolver::ResolverConfig;
use serde::{Deserialize, Serialize};

/// How type names from a document are matched against the registry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VersionPolicy {
    /// Module name, version and public-key token must match.
    Exact,
    /// Like `Exact`, but a name that does not resolve is repaired against the
    /// installed module and tried once more.
    #[default]
    Repair,
    /// Like `Repair`, then fall back to the type name alone.
    IgnoreVersion,
}

/// Settings of the [`Encoder`](crate::Encoder) and [`Decoder`](crate::Decoder).
///
/// # Examples
///
/// ```
/// use gx_xml::{CodecConfig, VersionPolicy};
///
/// let config: CodecConfig = ron::from_str("(indent: None, version_policy: Exact)").unwrap();
/// assert_eq!(config.indent, None);
/// assert!(config.declaration);
/// assert_eq!(config.version_policy, VersionPolicy::Exact);
/// assert_eq!(config.resolver.extension, "dll");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Spaces per nesting level; `None` writes everything on one line.
    pub indent: Option<u8>,
    /// Write the `<?xml ...?>` declaration.
    pub declaration: bool,
    pub version_policy: VersionPolicy,
    pub resolver: ResolverConfig,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            indent: Some(2),
            declaration: true,
            version_policy: VersionPolicy::default(),
            resolver: ResolverConfig::default(),
        }
    }
}
