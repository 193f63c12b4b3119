//! Registration of persisted types.
//!
//! - [`Persist`]: record types, described through a [`DescriptorBuilder`].
//! - [`PersistEnum`]: enums, written by variant name.
//! - [`PersistFormatter`]: custom text encodings attached to members.
//! - [`TypeRegistry`]: maps type keys and Rust types to registrations and
//!   caches one [`TypeDescriptor`] per type.
//!
//! [`DescriptorBuilder`]: crate::descriptor::DescriptorBuilder
//! [`TypeDescriptor`]: crate::descriptor::TypeDescriptor

mod arc;
mod builtin;
mod error;
mod registration;
mod traits;
mod type_registry;

#[cfg(feature = "auto_register")]
mod auto_register;

pub use arc::TypeRegistryArc;
pub use error::{CustomMapError, FormatError, RegistryError};
pub use registration::{Registration, ResolvedType};
pub use traits::{Persist, PersistEnum, PersistFormatter, ValueFormatter};
pub use type_registry::TypeRegistry;

#[cfg(feature = "auto_register")]
pub use auto_register::AutoRegistration;
