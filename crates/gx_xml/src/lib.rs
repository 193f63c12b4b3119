//! XML documents for `gx` object graphs.
//!
//! A document has one `root` element. Its first child, `types`, maps small
//! integer ids to qualified type names; every other element refers to types
//! by id. Objects reached more than once get an `id` attribute where first
//! written and are referenced afterwards with `ref`, so shared objects and
//! cycles survive a round trip.
//!
//! ```xml
//! <?xml version="1.0" encoding="utf-8"?>
//! <root type="1" id="1">
//!   <types>
//!     <item key="1" value="demo.Node, demo, Version=1.0.0.0, Culture=neutral, PublicKeyToken=null"/>
//!     <item key="2" value="string, gx_core, Version=0.1.0.0, Culture=neutral, PublicKeyToken=null"/>
//!   </types>
//!   <member name="Name" type="2" value="a &amp; b"/>
//!   <member name="Next" ref="1"/>
//! </root>
//! ```
//!
//! [`SerializationContext`] bundles a registry, a resolver and the
//! [`CodecConfig`], and hands out the [`Encoder`] and [`Decoder`].
//!
//! # Example
//!
//! ```
//! use gx_reflect::derive::Persist;
//! use gx_reflect::graph::ObjectId;
//! use gx_reflect::value::Value;
//! use gx_xml::SerializationContext;
//!
//! #[derive(Persist)]
//! #[persist(type_name = "demo.Node", module = "demo", version = "1.0.0.0")]
//! struct Node {
//!     #[persist(name = "Name", arg = 0)]
//!     name: String,
//!     #[persist(name = "Next")]
//!     next: Option<ObjectId>,
//! }
//!
//! let context = SerializationContext::new();
//! context.registry().write().register::<Node>();
//!
//! let mut graph = gx_reflect::graph::ObjectGraph::new();
//! let node = graph.insert(Node { name: "a & b".into(), next: None });
//! graph.record_mut::<Node>(node).unwrap().next = Some(node);
//!
//! let text = context.serialize(&graph, &Value::Object(node)).unwrap();
//! let decoded = context.deserialize(&text).unwrap();
//!
//! let root = decoded.root.as_object().unwrap();
//! let copy = decoded.graph.record::<Node>(root).unwrap();
//! assert_eq!(copy.name, "a & b");
//! assert_eq!(copy.next, Some(root));
//! ```

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod config;
mod context;
mod decoder;
mod encoder;
mod error;
mod scalar;

pub mod escape;
pub mod node;

#[cfg(test)]
mod tests;

// -----------------------------------------------------------------------------
// Top-level exports

pub use config::{CodecConfig, VersionPolicy};
pub use context::SerializationContext;
pub use decoder::{Decoded, Decoder};
pub use encoder::Encoder;
pub use error::{DecodeError, EncodeError};
