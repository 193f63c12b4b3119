//! Type names.
//!
//! - [`TypeKey`]: the logical name a type is registered under, e.g. `demo.Layer`.
//! - [`ModuleIdentity`]: the module (name, version, culture, public-key token)
//!   that owns a type.
//! - [`QualifiedTypeName`]: the textual pairing of both, as written to documents:
//!   `demo.Layer, demo, Version=1.0.0.0, Culture=neutral, PublicKeyToken=null`.
//!
//! The builtin scalar and collection keys live in [`builtin`].

mod error;
mod key;
mod module;
mod qualified;

pub mod builtin;

pub use error::NameError;
pub use key::TypeKey;
pub use module::ModuleIdentity;
pub use qualified::QualifiedTypeName;
