use alloc::string::String;
use alloc::sync::Arc;
use core::any::{TypeId, type_name};
use core::fmt;

use gx_utils::TypeIdMap;
use gx_utils::hash::HashMap;

use super::builtin::BUILTINS;
use super::registration::{CustomMap, RegistrationKind};
use super::{
    CustomMapError, Persist, PersistEnum, PersistFormatter, Registration, RegistryError,
    ResolvedType, ValueFormatter,
};
use crate::descriptor::{DescriptorBuilder, TypeDescriptor};
use crate::name::{ModuleIdentity, QualifiedTypeName, TypeKey, builtin};

// -----------------------------------------------------------------------------
// TypeRegistry

/// The store of persisted types.
///
/// Types are keyed by their logical name and, for Rust types, by [`TypeId`].
/// The first registration of a key wins; later ones are ignored. Each type's
/// [`TypeDescriptor`] is built once, on first use.
///
/// The registry also remembers the identity of every module it has seen, so
/// stale module versions in documents can be repaired against it.
///
/// # Example
///
/// ```
/// use gx_reflect::name::QualifiedTypeName;
/// use gx_reflect::registry::TypeRegistry;
///
/// let registry = TypeRegistry::new();
/// let name = registry.qualified_name("i32").unwrap();
/// assert_eq!(
///     name.to_string(),
///     "i32, gx_core, Version=0.1.0.0, Culture=neutral, PublicKeyToken=null",
/// );
///
/// let resolved = registry.resolve_exact(&name).unwrap();
/// assert_eq!(resolved.key.as_str(), "i32");
///
/// let stale: QualifiedTypeName = "i32, gx_core, Version=0.0.9.0, Culture=neutral, PublicKeyToken=null"
///     .parse()
///     .unwrap();
/// assert!(registry.resolve_exact(&stale).is_none());
/// assert!(registry.resolve_logical(&stale).is_some());
/// ```
pub struct TypeRegistry {
    entries: HashMap<TypeKey, Registration>,
    type_ids: TypeIdMap<TypeKey>,
    modules: HashMap<String, ModuleIdentity>,
    #[cfg_attr(not(feature = "auto_register"), expect(dead_code, reason = "set by inventory"))]
    pub(super) auto_registered: bool,
}

impl Default for TypeRegistry {
    /// See [`TypeRegistry::new`] .
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Creates a registry without any types, not even the builtins.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::default(),
            type_ids: TypeIdMap::new(),
            modules: HashMap::default(),
            auto_registered: false,
        }
    }

    /// Creates a registry with the builtin types of [`builtin::CORE_MODULE`].
    pub fn new() -> Self {
        let mut registry = Self::empty();
        for (key, shape) in BUILTINS {
            registry.insert(Registration::new(
                key.clone(),
                builtin::CORE_MODULE,
                RegistrationKind::Builtin(*shape),
            ));
        }
        registry
    }

    fn insert(&mut self, registration: Registration) -> bool {
        if self.entries.contains_key(registration.key()) {
            return false;
        }
        self.register_module(registration.module().clone());
        log::trace!("registered `{}` from `{}`", registration.key(), registration.module());
        self.entries.insert(registration.key().clone(), registration);
        true
    }

    fn insert_rust_type<T: 'static>(&mut self, registration: Registration) -> bool {
        let key = registration.key().clone();
        let inserted = self.insert(registration);
        if inserted {
            self.type_ids.insert_type::<T>(key);
        }
        inserted
    }

    // -----------------------------------------------------------------------------
    // Registration

    /// Registers a record type. Returns `false` if its key was already taken.
    pub fn register<T: Persist>(&mut self) -> bool {
        self.insert_rust_type::<T>(Registration::new(
            TypeKey::from_static(T::TYPE_NAME),
            T::MODULE,
            RegistrationKind::Record(describe_record::<T>),
        ))
    }

    /// Registers an enum type. Returns `false` if its key was already taken.
    pub fn register_enum<E: PersistEnum>(&mut self) -> bool {
        self.insert_rust_type::<E>(Registration::new(
            TypeKey::from_static(E::TYPE_NAME),
            E::MODULE,
            RegistrationKind::Enum(E::VARIANTS),
        ))
    }

    /// Registers a formatter. Returns `false` if its key was already taken.
    pub fn register_formatter<F: PersistFormatter>(&mut self) -> bool {
        self.insert_rust_type::<F>(Registration::new(
            TypeKey::from_static(F::TYPE_NAME),
            F::MODULE,
            RegistrationKind::Formatter(Arc::new(F::default())),
        ))
    }

    /// Adds a custom descriptor map for the record type `T`.
    ///
    /// Custom maps replace the descriptor built by [`Persist::describe`]. They
    /// are tried in registration order; a map returning an error is logged and
    /// skipped. Any cached descriptor of `T` is dropped.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::UnregisteredRustType`] if `T` has not been registered.
    /// - [`RegistryError::NotARecord`] if `T`'s key belongs to a non-record type.
    pub fn register_custom_map<T, F>(&mut self, map: F) -> Result<(), RegistryError>
    where
        T: Persist,
        F: Fn(&mut DescriptorBuilder<T>) -> Result<(), CustomMapError> + Send + Sync + 'static,
    {
        let key = self
            .type_ids
            .get_type::<T>()
            .cloned()
            .ok_or(RegistryError::UnregisteredRustType(type_name::<T>()))?;
        let registration = self
            .entries
            .get_mut(&key)
            .ok_or_else(|| RegistryError::NotRegistered(key.clone()))?;
        if !registration.is_record() {
            return Err(RegistryError::NotARecord(key));
        }

        let map: CustomMap = Arc::new(move || {
            let mut builder = DescriptorBuilder::<T>::new(TypeKey::from_static(T::TYPE_NAME));
            map(&mut builder)?;
            Ok(builder.build())
        });
        registration.push_custom_map(map);
        Ok(())
    }

    /// Records a module identity. The first identity of a module name wins.
    pub fn register_module(&mut self, module: ModuleIdentity) {
        if let Some(known) = self.modules.get(module.name()) {
            if *known != module {
                log::warn!("module `{}` is already known as `{known}`, ignoring `{module}`", module.name());
            }
            return;
        }
        self.modules.insert(String::from(module.name()), module);
    }

    /// Registers every type submitted with `#[persist(auto_register)]` or
    /// [`impl_auto_register!`](crate::impl_auto_register).
    ///
    /// Repeated calls do not insert duplicates.
    ///
    /// Returns `true` if automatic registration works on the current platform.
    /// Always `false` without the `auto_register` feature.
    #[cfg_attr(not(feature = "auto_register"), inline(always))]
    pub fn auto_register(&mut self) -> bool {
        #[cfg(feature = "auto_register")]
        {
            if self.auto_registered {
                return true;
            }
            super::auto_register::register_types(self);
            self.auto_registered
        }
        #[cfg(not(feature = "auto_register"))]
        {
            false
        }
    }

    // -----------------------------------------------------------------------------
    // Queries

    #[inline]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    #[inline]
    pub fn contains_type(&self, type_id: TypeId) -> bool {
        self.type_ids.contains(&type_id)
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<&Registration> {
        self.entries.get(key)
    }

    /// The key a Rust type was registered under.
    #[inline]
    pub fn key_of<T: 'static>(&self) -> Option<&TypeKey> {
        self.type_ids.get_type::<T>()
    }

    /// The descriptor of `key`, built on first use.
    pub fn descriptor_for(&self, key: &str) -> Result<&TypeDescriptor, RegistryError> {
        self.entries
            .get(key)
            .map(Registration::descriptor)
            .ok_or_else(|| RegistryError::NotRegistered(TypeKey::new(String::from(key))))
    }

    /// The descriptor of the Rust type `T`.
    pub fn descriptor_of<T: 'static>(&self) -> Result<&TypeDescriptor, RegistryError> {
        let key = self
            .key_of::<T>()
            .ok_or(RegistryError::UnregisteredRustType(type_name::<T>()))?;
        self.descriptor_for(key.as_str())
    }

    /// The qualified name of `key` as written to documents.
    pub fn qualified_name(&self, key: &str) -> Result<QualifiedTypeName, RegistryError> {
        self.entries
            .get(key)
            .map(Registration::qualified_name)
            .ok_or_else(|| RegistryError::NotRegistered(TypeKey::new(String::from(key))))
    }

    /// The formatter registered under `key`.
    pub fn formatter(&self, key: &str) -> Option<&dyn ValueFormatter> {
        self.entries.get(key)?.formatter()
    }

    #[inline]
    pub fn module(&self, name: &str) -> Option<&ModuleIdentity> {
        self.modules.get(name)
    }

    pub fn modules(&self) -> impl Iterator<Item = &ModuleIdentity> {
        self.modules.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Registration> {
        self.entries.values()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // -----------------------------------------------------------------------------
    // Resolution

    /// Resolves a qualified name whose module part matches the registered
    /// module, see [`ModuleIdentity::matches`]. A generic argument must
    /// resolve as well.
    pub fn resolve_exact(&self, name: &QualifiedTypeName) -> Option<ResolvedType> {
        self.resolve_with(name, &|module, name| module.matches(name))
    }

    /// Resolves a qualified name by type name alone, ignoring the module part.
    pub fn resolve_logical(&self, name: &QualifiedTypeName) -> Option<ResolvedType> {
        self.resolve_with(name, &|_, _| true)
    }

    fn resolve_with(
        &self,
        name: &QualifiedTypeName,
        accept: &dyn Fn(&ModuleIdentity, &QualifiedTypeName) -> bool,
    ) -> Option<ResolvedType> {
        let registration = self.entries.get(name.type_name())?;
        if !accept(registration.module(), name) {
            return None;
        }
        let element = match name.enclosed() {
            Some(argument) => Some(self.resolve_with(argument, accept)?.key),
            None => None,
        };
        Some(ResolvedType {
            key: registration.key().clone(),
            element,
        })
    }
}

fn describe_record<T: Persist>() -> TypeDescriptor {
    let mut builder = DescriptorBuilder::<T>::new(TypeKey::from_static(T::TYPE_NAME));
    T::describe(&mut builder);
    builder.build()
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("types", &self.entries.len())
            .field("modules", &self.modules.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use alloc::vec::Vec;

    use super::*;
    use crate::descriptor::{MemberKind, TypeShape, Visibility};
    use crate::value::{Value, ValueError};

    const DEMO: ModuleIdentity = ModuleIdentity::from_static("demo", "1.0.0.0");

    #[derive(Default)]
    struct Base {
        id: u32,
        label: String,
        secret: i64,
    }

    impl Persist for Base {
        const TYPE_NAME: &'static str = "demo.Base";
        const MODULE: ModuleIdentity = DEMO;

        fn describe(desc: &mut DescriptorBuilder<Self>) {
            desc.default_constructor();
            desc.field("id", |b: &Base| &b.id, |b: &mut Base| &mut b.id);
            desc.field("secret", |b: &Base| &b.secret, |b: &mut Base| &mut b.secret)
                .private();
            desc.field("label", |b: &Base| &b.label, |b: &mut Base| &mut b.label)
                .rename("Label");
        }
    }

    #[derive(Default)]
    struct Derived {
        base: Base,
        label: String,
        hidden: bool,
        cached: u8,
    }

    impl Persist for Derived {
        const TYPE_NAME: &'static str = "demo.Derived";
        const MODULE: ModuleIdentity = DEMO;

        fn describe(desc: &mut DescriptorBuilder<Self>) {
            desc.default_constructor();
            desc.field("label", |d: &Derived| &d.label, |d: &mut Derived| &mut d.label)
                .rename("Label");
            desc.field("hidden", |d: &Derived| &d.hidden, |d: &mut Derived| &mut d.hidden)
                .private();
            desc.readonly_field("cached", |d: &Derived| &d.cached);
            desc.extends(|d: &Derived| &d.base, |d: &mut Derived| &mut d.base);
        }
    }

    #[test]
    fn builtins_are_registered() {
        let registry = TypeRegistry::new();
        assert!(registry.contains("i32"));
        assert!(registry.contains("list"));
        assert_eq!(registry.get("map").unwrap().shape(), TypeShape::Map);
        assert_eq!(
            registry.module("gx_core"),
            Some(&builtin::CORE_MODULE)
        );
        assert!(TypeRegistry::empty().is_empty());
    }

    #[test]
    fn first_registration_wins() {
        let mut registry = TypeRegistry::new();
        assert!(registry.register::<Base>());
        assert!(!registry.register::<Base>());
        assert_eq!(registry.key_of::<Base>().unwrap().as_str(), "demo.Base");
        assert!(registry.contains_type(TypeId::of::<Base>()));
    }

    #[test]
    fn member_order_and_filtering() {
        let mut registry = TypeRegistry::new();
        registry.register::<Derived>();
        let descriptor = registry.descriptor_of::<Derived>().unwrap();

        let members: Vec<_> = descriptor
            .members()
            .iter()
            .map(|m| (m.declared_name(), m.declaring_type().as_str(), m.visibility()))
            .collect();
        assert_eq!(
            members,
            [
                ("secret", "demo.Base", Visibility::Private),
                ("hidden", "demo.Derived", Visibility::Private),
                ("id", "demo.Base", Visibility::Public),
                ("label", "demo.Base", Visibility::Public),
                ("label", "demo.Derived", Visibility::Public),
            ]
        );
        assert!(descriptor.members().iter().all(|m| m.kind() == MemberKind::Field));

        // The most derived member answers for a shared logical name.
        let label = descriptor.member("Label").unwrap();
        assert_eq!(label.declaring_type().as_str(), "demo.Derived");
    }

    #[test]
    fn inherited_members_read_and_write_through_projection() {
        let mut registry = TypeRegistry::new();
        registry.register::<Derived>();
        let descriptor = registry.descriptor_of::<Derived>().unwrap();

        let mut record = Derived::default();
        let id = descriptor.members().iter().find(|m| m.name() == "id").unwrap();
        id.set(&mut record, Value::U32(9)).unwrap();
        assert_eq!(record.base.id, 9);
        assert_eq!(id.get(&record), Some(Value::U32(9)));
        assert_eq!(id.get(&0_u8), None);

        let ctor = descriptor.find_constructor(&[]).unwrap();
        let built = ctor.invoke(Vec::new()).unwrap();
        assert!(built.downcast_ref::<Derived>().is_some());
    }

    #[test]
    fn member_check_matches_setter() {
        let mut registry = TypeRegistry::new();
        registry.register::<Derived>();
        let descriptor = registry.descriptor_of::<Derived>().unwrap();
        let id = descriptor.member("id").unwrap();

        assert_eq!(id.check(&Value::U32(3)), Ok(()));
        let err = id.check(&Value::String("3".into())).unwrap_err();
        assert!(matches!(err, ValueError::Mismatch { expected: "u32", .. }));

        let mut record = Derived::default();
        assert_eq!(id.set(&mut record, Value::String("3".into())), Err(err));
        assert_eq!(record.base.id, 0);

        let mut custom = TypeRegistry::new();
        custom.register::<Derived>();
        custom
            .register_custom_map::<Derived, _>(|desc| {
                desc.readonly_field("cached", |d: &Derived| &d.cached).arg(0);
                Ok(())
            })
            .unwrap();
        let cached = custom.descriptor_of::<Derived>().unwrap().member("cached").unwrap();
        assert!(matches!(cached.check(&Value::U8(1)), Err(ValueError::ReadOnly(_))));
    }

    #[test]
    fn failing_custom_map_falls_back() {
        let mut registry = TypeRegistry::new();
        registry.register::<Base>();
        registry
            .register_custom_map::<Base, _>(|_| Err(CustomMapError::new("not today")))
            .unwrap();
        assert_eq!(registry.descriptor_of::<Base>().unwrap().members().len(), 3);

        registry
            .register_custom_map::<Base, _>(|desc| {
                desc.default_constructor();
                desc.field("id", |b: &Base| &b.id, |b: &mut Base| &mut b.id)
                    .rename("Identifier");
                Ok(())
            })
            .unwrap();
        let descriptor = registry.descriptor_of::<Base>().unwrap();
        assert_eq!(descriptor.members().len(), 1);
        assert_eq!(descriptor.members()[0].name(), "Identifier");
    }

    #[test]
    fn custom_map_requires_registration() {
        let mut registry = TypeRegistry::new();
        let result = registry.register_custom_map::<Base, _>(|_| Ok(()));
        assert!(matches!(result, Err(RegistryError::UnregisteredRustType(_))));
    }

    #[test]
    fn resolves_generic_argument() {
        let mut registry = TypeRegistry::new();
        registry.register::<Base>();

        let list = builtin::CORE_MODULE
            .qualify(&builtin::LIST)
            .with_enclosed(DEMO.qualify(&TypeKey::from_static("demo.Base")));
        let resolved = registry.resolve_exact(&list).unwrap();
        assert_eq!(resolved.key, builtin::LIST);
        assert_eq!(resolved.element, Some(TypeKey::from_static("demo.Base")));

        let stale: QualifiedTypeName = list
            .to_string()
            .replace("Version=1.0.0.0", "Version=0.9.0.0")
            .parse()
            .unwrap();
        assert_eq!(registry.resolve_exact(&stale), None);
        assert_eq!(registry.resolve_logical(&stale), Some(resolved));
    }

    #[test]
    fn conflicting_module_identity_keeps_first() {
        let mut registry = TypeRegistry::new();
        registry.register_module(DEMO);
        registry.register_module(ModuleIdentity::from_static("demo", "2.0.0.0"));
        assert_eq!(registry.module("demo").unwrap().version(), Some("1.0.0.0"));
    }
}
