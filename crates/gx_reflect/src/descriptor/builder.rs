use alloc::borrow::Cow;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::{Any, type_name};
use core::marker::PhantomData;

use super::member::{Getter, Setter};
use super::{Constructor, CtorArgs, MemberDescriptor, MemberKind, TypeDescriptor, Visibility};
use crate::name::TypeKey;
use crate::registry::{Persist, PersistFormatter};
use crate::value::{FromValue, IntoValue, Value, ValueError};

/// Collects the members and constructors of a record type.
///
/// Passed to [`Persist::describe`]. Members are public, writable and not
/// constructor arguments unless configured otherwise through the returned
/// [`MemberBuilder`].
///
/// Members without a setter are dropped when the descriptor is built, unless
/// they are constructor arguments.
///
/// # Examples
///
/// ```
/// use gx_reflect::descriptor::DescriptorBuilder;
/// use gx_reflect::name::ModuleIdentity;
/// use gx_reflect::registry::{Persist, TypeRegistry};
///
/// #[derive(Default)]
/// struct Shape {
///     id: u32,
/// }
///
/// #[derive(Default)]
/// struct Circle {
///     shape: Shape,
///     radius: f64,
/// }
///
/// impl Persist for Shape {
///     const TYPE_NAME: &'static str = "demo.Shape";
///     const MODULE: ModuleIdentity = ModuleIdentity::from_static("demo", "1.0.0.0");
///
///     fn describe(desc: &mut DescriptorBuilder<Self>) {
///         desc.default_constructor();
///         desc.field("id", |s: &Shape| &s.id, |s: &mut Shape| &mut s.id).private();
///     }
/// }
///
/// impl Persist for Circle {
///     const TYPE_NAME: &'static str = "demo.Circle";
///     const MODULE: ModuleIdentity = ModuleIdentity::from_static("demo", "1.0.0.0");
///
///     fn describe(desc: &mut DescriptorBuilder<Self>) {
///         desc.default_constructor();
///         desc.field("radius", |c: &Circle| &c.radius, |c: &mut Circle| &mut c.radius);
///         desc.extends(|c: &Circle| &c.shape, |c: &mut Circle| &mut c.shape);
///     }
/// }
///
/// let mut registry = TypeRegistry::new();
/// registry.register::<Circle>();
///
/// let names: Vec<_> = registry
///     .descriptor_of::<Circle>()
///     .unwrap()
///     .members()
///     .iter()
///     .map(|m| (m.name(), m.declaring_type().as_str()))
///     .collect();
/// assert_eq!(names, [("id", "demo.Shape"), ("radius", "demo.Circle")]);
/// ```
///
/// [`Persist::describe`]: crate::registry::Persist::describe
pub struct DescriptorBuilder<T> {
    key: TypeKey,
    members: Vec<MemberDescriptor>,
    constructors: Vec<Constructor>,
    /// Depth of the members declared by `T` itself.
    own_depth: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Any + Send + Sync> DescriptorBuilder<T> {
    pub fn new(key: TypeKey) -> Self {
        Self {
            key,
            members: Vec::new(),
            constructors: Vec::new(),
            own_depth: 0,
            _marker: PhantomData,
        }
    }

    /// The key the descriptor is built for.
    #[inline]
    pub fn key(&self) -> &TypeKey {
        &self.key
    }

    // -----------------------------------------------------------------------------
    // Members

    fn push(
        &mut self,
        declared_name: &'static str,
        kind: MemberKind,
        getter: Getter,
        setter: Option<Setter>,
        accepts: fn(&Value) -> bool,
        value_type: &'static str,
    ) -> MemberBuilder<'_> {
        self.members.push(MemberDescriptor {
            name: Cow::Borrowed(declared_name),
            declared_name,
            declaring_type: self.key.clone(),
            kind,
            visibility: Visibility::Public,
            ctor_arg: None,
            formatter: None,
            getter,
            setter,
            accepts,
            value_type,
            depth: None,
        });
        let index = self.members.len() - 1;
        MemberBuilder {
            member: &mut self.members[index],
        }
    }

    /// Adds a writable field.
    pub fn field<F>(
        &mut self,
        name: &'static str,
        get: fn(&T) -> &F,
        get_mut: fn(&mut T) -> &mut F,
    ) -> MemberBuilder<'_>
    where
        F: IntoValue + FromValue + Clone + 'static,
    {
        let key = self.key.clone();
        let setter: Setter = Arc::new(move |record: &mut dyn Any, value: Value| {
            let record = record
                .downcast_mut::<T>()
                .ok_or_else(|| ValueError::RecordMismatch(key.clone()))?;
            *get_mut(record) = F::from_value(value)?;
            Ok(())
        });
        self.push(
            name,
            MemberKind::Field,
            field_getter(get),
            Some(setter),
            F::accepts,
            type_name::<F>(),
        )
    }

    /// Adds a field without setter. Kept only if it is a constructor argument.
    pub fn readonly_field<F>(&mut self, name: &'static str, get: fn(&T) -> &F) -> MemberBuilder<'_>
    where
        F: IntoValue + Clone + 'static,
    {
        self.push(
            name,
            MemberKind::Field,
            field_getter(get),
            None,
            reject,
            type_name::<F>(),
        )
    }

    /// Adds a property backed by a getter and a setter.
    pub fn property<F>(
        &mut self,
        name: &'static str,
        get: fn(&T) -> F,
        set: fn(&mut T, F),
    ) -> MemberBuilder<'_>
    where
        F: IntoValue + FromValue + 'static,
    {
        let key = self.key.clone();
        let setter: Setter = Arc::new(move |record: &mut dyn Any, value: Value| {
            let record = record
                .downcast_mut::<T>()
                .ok_or_else(|| ValueError::RecordMismatch(key.clone()))?;
            set(record, F::from_value(value)?);
            Ok(())
        });
        self.push(
            name,
            MemberKind::Property,
            property_getter(get),
            Some(setter),
            F::accepts,
            type_name::<F>(),
        )
    }

    /// Adds a computed property. Kept only if it is a constructor argument.
    pub fn readonly_property<F>(&mut self, name: &'static str, get: fn(&T) -> F) -> MemberBuilder<'_>
    where
        F: IntoValue + 'static,
    {
        self.push(
            name,
            MemberKind::Property,
            property_getter(get),
            None,
            reject,
            type_name::<F>(),
        )
    }

    /// Inherits the members of `B`, reached through a projection of `T`.
    ///
    /// Inherited members keep `B` as their declaring type and are ordered
    /// before the members of `T` within each visibility group.
    pub fn extends<B: Persist>(
        &mut self,
        project: fn(&T) -> &B,
        project_mut: fn(&mut T) -> &mut B,
    ) -> &mut Self {
        let mut base = DescriptorBuilder::<B>::new(TypeKey::from_static(B::TYPE_NAME));
        B::describe(&mut base);
        let depth = base.resolve_depths();

        for mut member in base.members {
            let get = member.getter.clone();
            member.getter = Arc::new(move |record: &dyn Any| {
                let record = record.downcast_ref::<T>()?;
                get(project(record))
            });
            if let Some(set) = member.setter.take() {
                let key = self.key.clone();
                member.setter = Some(Arc::new(move |record: &mut dyn Any, value: Value| {
                    let record = record
                        .downcast_mut::<T>()
                        .ok_or_else(|| ValueError::RecordMismatch(key.clone()))?;
                    set(project_mut(record), value)
                }));
            }
            self.members.push(member);
        }
        self.own_depth = self.own_depth.max(depth + 1);
        self
    }

    // -----------------------------------------------------------------------------
    // Constructors

    /// Adds a constructor overload taking a tuple of arguments.
    ///
    /// The tuple position of each parameter is the index given to
    /// [`MemberBuilder::arg`].
    pub fn constructor<A, F>(&mut self, func: F) -> &mut Self
    where
        A: CtorArgs,
        F: Fn(A) -> T + Send + Sync + 'static,
    {
        self.constructors.push(Constructor::new(func));
        self
    }

    /// Adds the parameterless constructor `T::default()`.
    pub fn default_constructor(&mut self) -> &mut Self
    where
        T: Default,
    {
        self.constructor(|(): ()| T::default())
    }

    // -----------------------------------------------------------------------------
    // Build

    /// Assigns the own depth to members declared by `T` and returns it.
    fn resolve_depths(&mut self) -> usize {
        let own_depth = self.own_depth;
        for member in &mut self.members {
            member.depth.get_or_insert(own_depth);
        }
        own_depth
    }

    /// Orders, deduplicates and filters the members.
    pub fn build(mut self) -> TypeDescriptor {
        self.resolve_depths();
        let Self {
            key,
            mut members,
            constructors,
            ..
        } = self;

        members.sort_by_key(|m| (m.visibility, m.depth));

        let mut seen: Vec<(&'static str, TypeKey, MemberKind)> = Vec::with_capacity(members.len());
        members.retain(|m| {
            let id = (m.declared_name, m.declaring_type.clone(), m.kind);
            if seen.contains(&id) {
                log::debug!("duplicate member `{}` of `{}` ignored", m.declared_name, m.declaring_type);
                return false;
            }
            seen.push(id);
            true
        });

        members.retain(|m| {
            let kept = m.is_writable() || m.ctor_arg.is_some();
            if !kept {
                log::trace!("read-only member `{}` of `{key}` is not persisted", m.name);
            }
            kept
        });

        TypeDescriptor::record(key, members, constructors)
    }
}

fn field_getter<T: Any, F: IntoValue + Clone + 'static>(get: fn(&T) -> &F) -> Getter {
    Arc::new(move |record: &dyn Any| record.downcast_ref::<T>().map(|r| get(r).clone().into_value()))
}

fn property_getter<T: Any, F: IntoValue + 'static>(get: fn(&T) -> F) -> Getter {
    Arc::new(move |record: &dyn Any| record.downcast_ref::<T>().map(|r| get(r).into_value()))
}

fn reject(_: &Value) -> bool {
    false
}

/// Configures the member just added to a [`DescriptorBuilder`].
pub struct MemberBuilder<'a> {
    member: &'a mut MemberDescriptor,
}

impl MemberBuilder<'_> {
    /// Sets the logical name written to documents.
    pub fn rename(self, name: impl Into<Cow<'static, str>>) -> Self {
        self.member.name = name.into();
        self
    }

    /// Marks the member as constructor argument `index`.
    pub fn arg(self, index: usize) -> Self {
        self.member.ctor_arg = Some(index);
        self
    }

    /// Encodes the member through the formatter `F` instead of its type.
    pub fn formatter<F: PersistFormatter>(self) -> Self {
        self.member.formatter = Some(TypeKey::from_static(F::TYPE_NAME));
        self
    }

    pub fn private(self) -> Self {
        self.member.visibility = Visibility::Private;
        self
    }
}
