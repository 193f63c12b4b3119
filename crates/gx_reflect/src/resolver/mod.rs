//! Repairs stale module versions in qualified type names.
//!
//! Documents carry the module version that was current when they were
//! written. When a plugin module has been upgraded since, the type name no
//! longer resolves exactly. The [`TypeNameResolver`] finds the installed
//! module, either among the modules already known to the registry or by
//! probing module files on disk, and patches version and public-key token.

mod config;
mod error;
mod probe;
mod search;

pub use config::ResolverConfig;
pub use error::ProbeError;
pub use probe::{ModuleProbe, StampProbe};

use alloc::string::{String, ToString};
use std::path::PathBuf;
use std::sync::{PoisonError, RwLock};

use gx_utils::hash::HashMap;

use crate::name::{ModuleIdentity, QualifiedTypeName};
use crate::registry::TypeRegistry;

// -----------------------------------------------------------------------------
// LoadedModules

/// Modules available without touching the file system.
pub trait LoadedModules {
    fn loaded_module(&self, name: &str) -> Option<ModuleIdentity>;
}

/// Nothing is loaded.
impl LoadedModules for () {
    #[inline(always)]
    fn loaded_module(&self, _: &str) -> Option<ModuleIdentity> {
        None
    }
}

impl LoadedModules for TypeRegistry {
    #[inline]
    fn loaded_module(&self, name: &str) -> Option<ModuleIdentity> {
        self.module(name).cloned()
    }
}

// -----------------------------------------------------------------------------
// TypeNameResolver

/// Locates installed modules and repairs qualified names against them.
///
/// Module files are named `<module>.<extension>` and searched under each
/// configured root: the root itself, then its subdirectories (shallowest
/// first), then its ancestors. The first file found is probed; the result is
/// cached by module name, including failures to find one.
///
/// # Examples
///
/// ```
/// use gx_reflect::name::ModuleIdentity;
/// use gx_reflect::resolver::{ResolverConfig, TypeNameResolver};
///
/// let resolver = TypeNameResolver::new(ResolverConfig::default());
/// resolver.preload(ModuleIdentity::from_static("shapes", "2.1.0.0"));
///
/// let repaired = resolver.repair(
///     "shapes.Circle, shapes, Version=1.0.0.0, Culture=neutral, PublicKeyToken=null",
/// );
/// assert_eq!(
///     repaired,
///     "shapes.Circle, shapes, Version=2.1.0.0, Culture=neutral, PublicKeyToken=null",
/// );
///
/// // Unknown modules and malformed names come back unchanged.
/// assert_eq!(resolver.repair("x.Y, nowhere, Version=1.0"), "x.Y, nowhere, Version=1.0");
/// assert_eq!(resolver.repair("[[broken"), "[[broken");
/// ```
pub struct TypeNameResolver {
    config: ResolverConfig,
    probe: Box<dyn ModuleProbe>,
    cache: RwLock<HashMap<String, Option<ModuleIdentity>>>,
}

impl TypeNameResolver {
    /// Creates a resolver that reads module stamps with [`StampProbe`].
    pub fn new(config: ResolverConfig) -> Self {
        Self::with_probe(config, StampProbe)
    }

    pub fn with_probe(config: ResolverConfig, probe: impl ModuleProbe + 'static) -> Self {
        Self {
            config,
            probe: Box::new(probe),
            cache: RwLock::new(HashMap::default()),
        }
    }

    #[inline]
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Makes `module` known without probing.
    pub fn preload(&self, module: ModuleIdentity) {
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        cache.insert(String::from(module.name()), Some(module));
    }

    /// Forgets every cached lookup.
    pub fn clear_cache(&self) {
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Repairs a qualified name given as text.
    ///
    /// Returns the input unchanged if it does not parse or no installed
    /// module is found.
    pub fn repair(&self, stale: &str) -> String {
        match QualifiedTypeName::parse(stale) {
            Ok(mut name) => {
                if self.repair_name(&mut name, &()) {
                    name.to_string()
                } else {
                    String::from(stale)
                }
            }
            Err(e) => {
                log::debug!("not repairing `{stale}`: {e}");
                String::from(stale)
            }
        }
    }

    /// Repairs `name` and its generic argument in place.
    ///
    /// Modules from `loaded` take precedence over the file system. On a hit,
    /// version and public-key token are overwritten; the culture is kept.
    /// Returns `true` if anything changed.
    pub fn repair_name(&self, name: &mut QualifiedTypeName, loaded: &dyn LoadedModules) -> bool {
        let mut changed = false;
        if let Some(argument) = name.enclosed_mut() {
            changed |= self.repair_name(argument, loaded);
        }
        if let Some(assembly) = name.assembly() {
            let found = loaded
                .loaded_module(assembly)
                .or_else(|| self.locate(assembly));
            if let Some(module) = found {
                changed |= name.apply_module(&module);
            }
        }
        changed
    }

    /// Finds the installed identity of the module `name`.
    pub fn locate(&self, name: &str) -> Option<ModuleIdentity> {
        {
            let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(cached) = cache.get(name) {
                return cached.clone();
            }
        }

        let roots = self.search_roots();
        let file_name = alloc::format!("{name}.{}", self.config.extension);
        let found = search::find_module_file(&roots, &file_name).and_then(|path| {
            match self.probe.probe(&path) {
                Ok(module) if module.name() == name => Some(module),
                Ok(module) => {
                    log::warn!("`{}` identifies as `{module}`, expected module `{name}`", path.display());
                    None
                }
                Err(e) => {
                    log::warn!("failed to probe module `{name}`: {e}");
                    None
                }
            }
        });
        if found.is_none() {
            log::debug!("module `{name}` was not found under {roots:?}");
        }

        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        cache.entry(String::from(name)).or_insert(found).clone()
    }

    fn search_roots(&self) -> Vec<PathBuf> {
        if !self.config.search_roots.is_empty() {
            return self.config.search_roots.clone();
        }
        let mut roots = Vec::with_capacity(2);
        if let Ok(current) = std::env::current_dir() {
            roots.push(current);
        }
        if let Some(dir) = std::env::current_exe().ok().and_then(|exe| exe.parent().map(PathBuf::from))
            && !roots.contains(&dir)
        {
            roots.push(dir);
        }
        roots
    }
}

impl core::fmt::Debug for TypeNameResolver {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TypeNameResolver")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
