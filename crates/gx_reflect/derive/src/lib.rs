//! Derive macros of `gx_reflect`:
//!
//! - [`Persist`]
//! - [`PersistEnum`]
#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro lib")]

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

static PERSIST_ATTRIBUTE_NAME: &str = "persist";

// -----------------------------------------------------------------------------
// Modules

mod attributes;
mod path;
mod persist_enum;
mod persist_struct;

// -----------------------------------------------------------------------------
// Macros

/// Implements `Persist` for a struct with named fields.
///
/// Every field is persisted as a public, writable member named after the
/// field, unless configured otherwise. Field types must implement
/// `IntoValue`, `FromValue` and `Clone`; records refer to other records
/// through `ObjectId` (or `Option<ObjectId>`).
///
/// ## Type attributes
///
/// ```rust, ignore
/// #[derive(Persist)]
/// #[persist(type_name = "shapes.Circle", module = "shapes", version = "1.0.0.0", auto_register)]
/// struct Circle { /* ... */ }
/// ```
///
/// - `type_name`: logical name, defaults to the Rust path of the type.
/// - `module`, `version`: the owning module, default to the package name and version.
/// - `auto_register`: submit the type for `TypeRegistry::auto_register`.
///
/// ## Field attributes
///
/// - `name = "..."`: the logical member name.
/// - `arg = N`: the field is constructor argument `N`. Indices must be
///   contiguous from zero. The generated constructor takes the argument
///   fields and fills every other field with `Default::default()`.
/// - `private`: written before public members.
/// - `readonly`: no setter; only persisted as constructor argument.
/// - `formatter = Type`: encode through a registered `PersistFormatter`.
/// - `base`: the field holds the base record; its members are inherited.
/// - `skip`: not persisted, filled with `Default::default()`.
#[proc_macro_derive(Persist, attributes(persist))]
pub fn derive_persist(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);
    persist_struct::impl_persist(&ast)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// Implements `PersistEnum`, `IntoValue` and `FromValue` for an enum of
/// unit variants. The enum must be `Copy`.
///
/// Accepts the same type attributes as [`Persist`]. Variants may be renamed
/// with `#[persist(name = "...")]`.
#[proc_macro_derive(PersistEnum, attributes(persist))]
pub fn derive_persist_enum(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);
    persist_enum::impl_persist_enum(&ast)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
