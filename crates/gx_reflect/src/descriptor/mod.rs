//! Type descriptors.
//!
//! A [`TypeDescriptor`] lists the persisted members of a type in document
//! order and the constructors that can rebuild it. Record descriptors are
//! assembled with a [`DescriptorBuilder`] from [`Persist::describe`].
//!
//! [`Persist::describe`]: crate::registry::Persist::describe

mod builder;
mod constructor;
mod member;
mod shape;
mod type_descriptor;

pub use builder::{DescriptorBuilder, MemberBuilder};
pub use constructor::{Constructor, CtorArgs};
pub use member::{MemberDescriptor, MemberKind, Visibility};
pub use shape::{PrimitiveKind, TypeShape};
pub use type_descriptor::TypeDescriptor;
