use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;
use std::sync::OnceLock;

use super::{CustomMapError, ValueFormatter};
use crate::descriptor::{TypeDescriptor, TypeShape};
use crate::name::{ModuleIdentity, QualifiedTypeName, TypeKey};

pub(crate) type CustomMap = Arc<dyn Fn() -> Result<TypeDescriptor, CustomMapError> + Send + Sync>;

#[derive(Clone)]
pub(crate) enum RegistrationKind {
    Builtin(TypeShape),
    Record(fn() -> TypeDescriptor),
    Enum(&'static [&'static str]),
    Formatter(Arc<dyn ValueFormatter>),
}

/// A type known to the [`TypeRegistry`](super::TypeRegistry).
///
/// The descriptor is built on first use and cached.
pub struct Registration {
    key: TypeKey,
    module: ModuleIdentity,
    kind: RegistrationKind,
    custom_maps: Vec<CustomMap>,
    descriptor: OnceLock<TypeDescriptor>,
}

impl Registration {
    pub(crate) fn new(key: TypeKey, module: ModuleIdentity, kind: RegistrationKind) -> Self {
        Self {
            key,
            module,
            kind,
            custom_maps: Vec::new(),
            descriptor: OnceLock::new(),
        }
    }

    #[inline]
    pub fn key(&self) -> &TypeKey {
        &self.key
    }

    #[inline]
    pub fn module(&self) -> &ModuleIdentity {
        &self.module
    }

    /// The name written to the type table of a document.
    pub fn qualified_name(&self) -> QualifiedTypeName {
        self.module.qualify(&self.key)
    }

    pub fn shape(&self) -> TypeShape {
        match &self.kind {
            RegistrationKind::Builtin(shape) => *shape,
            RegistrationKind::Record(_) => TypeShape::Record,
            RegistrationKind::Enum(variants) => TypeShape::Enum(*variants),
            RegistrationKind::Formatter(_) => TypeShape::Formatter,
        }
    }

    /// The formatter instance, for formatter registrations.
    pub fn formatter(&self) -> Option<&dyn ValueFormatter> {
        match &self.kind {
            RegistrationKind::Formatter(formatter) => Some(&**formatter),
            _ => None,
        }
    }

    pub(crate) fn is_record(&self) -> bool {
        matches!(self.kind, RegistrationKind::Record(_))
    }

    /// Adds a custom map and drops the cached descriptor.
    pub(crate) fn push_custom_map(&mut self, map: CustomMap) {
        self.custom_maps.push(map);
        self.descriptor = OnceLock::new();
    }

    /// Returns the descriptor, building it on first call.
    ///
    /// Custom maps are tried in registration order; the first one that
    /// succeeds wins. A failing map is logged and skipped. Without a working
    /// custom map the default descriptor is used.
    pub fn descriptor(&self) -> &TypeDescriptor {
        self.descriptor.get_or_init(|| self.build_descriptor())
    }

    fn build_descriptor(&self) -> TypeDescriptor {
        for (index, map) in self.custom_maps.iter().enumerate() {
            match map() {
                Ok(descriptor) => return descriptor,
                Err(e) => log::warn!(
                    "custom descriptor map #{index} of `{}` failed, skipping it: {e}",
                    self.key
                ),
            }
        }
        match &self.kind {
            RegistrationKind::Record(describe) => describe(),
            _ => TypeDescriptor::opaque(self.key.clone(), self.shape()),
        }
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("key", &self.key)
            .field("module", &self.module)
            .field("shape", &self.shape())
            .field("custom_maps", &self.custom_maps.len())
            .finish_non_exhaustive()
    }
}

/// The result of resolving a qualified name from a document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedType {
    pub key: TypeKey,
    /// Element type of a list or array.
    pub element: Option<TypeKey>,
}
