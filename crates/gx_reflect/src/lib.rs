//! The type system behind `gx` documents.
//!
//! Rust has no runtime reflection, so every persisted type describes itself
//! once, through a builder, and the [`TypeRegistry`] keeps those descriptions
//! for the lifetime of a serialization context.
//!
//! ## Menu
//!
//! - [`name`]: qualified type names (`Type, Module, Version=.., ...`) and module identities.
//! - [`value`]: the [`Value`] model and the [`IntoValue`]/[`FromValue`] conversions.
//! - [`graph`]: the [`ObjectGraph`] arena; objects refer to each other by [`ObjectId`].
//! - [`descriptor`]: [`TypeDescriptor`], [`MemberDescriptor`] and the [`DescriptorBuilder`].
//! - [`registry`]: [`Persist`], [`PersistEnum`], [`PersistFormatter`] and the [`TypeRegistry`].
//! - [`resolver`]: repairs stale module versions in qualified names.
//!
//! ## Example
//!
//! ```
//! use gx_reflect::descriptor::DescriptorBuilder;
//! use gx_reflect::graph::ObjectGraph;
//! use gx_reflect::name::ModuleIdentity;
//! use gx_reflect::registry::{Persist, TypeRegistry};
//!
//! struct Layer {
//!     name: String,
//!     visible: bool,
//! }
//!
//! impl Persist for Layer {
//!     const TYPE_NAME: &'static str = "demo.Layer";
//!     const MODULE: ModuleIdentity = ModuleIdentity::from_static("demo", "1.0.0.0");
//!
//!     fn describe(desc: &mut DescriptorBuilder<Self>) {
//!         desc.constructor(|(name,): (String,)| Layer { name, visible: true });
//!         desc.field("name", |l: &Layer| &l.name, |l: &mut Layer| &mut l.name).rename("Name").arg(0);
//!         desc.field("visible", |l: &Layer| &l.visible, |l: &mut Layer| &mut l.visible).rename("Visible");
//!     }
//! }
//!
//! let mut registry = TypeRegistry::new();
//! registry.register::<Layer>();
//!
//! let descriptor = registry.descriptor_of::<Layer>().unwrap();
//! assert_eq!(descriptor.members().len(), 2);
//! assert_eq!(descriptor.member("Name").unwrap().constructor_argument(), Some(0));
//!
//! let mut graph = ObjectGraph::new();
//! let id = graph.insert(Layer { name: "roads".into(), visible: false });
//! assert_eq!(graph.record::<Layer>(id).unwrap().name, "roads");
//! ```
//!
//! [`Value`]: value::Value
//! [`IntoValue`]: value::IntoValue
//! [`FromValue`]: value::FromValue
//! [`ObjectGraph`]: graph::ObjectGraph
//! [`ObjectId`]: graph::ObjectId
//! [`TypeDescriptor`]: descriptor::TypeDescriptor
//! [`MemberDescriptor`]: descriptor::MemberDescriptor
//! [`DescriptorBuilder`]: descriptor::DescriptorBuilder
//! [`Persist`]: registry::Persist
//! [`PersistEnum`]: registry::PersistEnum
//! [`PersistFormatter`]: registry::PersistFormatter
//! [`TypeRegistry`]: registry::TypeRegistry

// -----------------------------------------------------------------------------
// Extern Self

// Generated code refers to `::gx_reflect`, this alias keeps that path valid
// inside the crate itself (unit tests, doc tests).
extern crate self as gx_reflect;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

pub mod descriptor;
pub mod graph;
pub mod name;
pub mod registry;
pub mod resolver;
pub mod value;

mod macros;

// -----------------------------------------------------------------------------
// Top-Level exports

#[doc(hidden)]
pub mod __macro_exports;

pub use gx_reflect_derive as derive;
