use super::TypeRegistry;

/// A registration function collected through `inventory`.
///
/// Submitted by `#[persist(auto_register)]` and [`impl_auto_register!`](crate::impl_auto_register).
pub struct AutoRegistration {
    register: fn(&mut TypeRegistry),
}

impl AutoRegistration {
    pub const fn new(register: fn(&mut TypeRegistry)) -> Self {
        Self { register }
    }
}

inventory::collect!(AutoRegistration);

// Always present; proves that collection works on this platform.
inventory::submit! {
    AutoRegistration::new(mark_available)
}

fn mark_available(registry: &mut TypeRegistry) {
    registry.auto_registered = true;
}

pub(super) fn register_types(registry: &mut TypeRegistry) {
    for entry in inventory::iter::<AutoRegistration> {
        (entry.register)(registry);
    }
}
