//! Reference-preserving XML persistence for object graphs.
//!
//! - [`reflect`]: type names, descriptors, the type registry, the object
//!   graph and the type name resolver.
//! - [`xml`]: the document encoder and decoder.
//! - [`utils`]: hash containers and small helpers shared by both.
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use gx_reflect as reflect;
pub use gx_utils as utils;
pub use gx_xml as xml;
