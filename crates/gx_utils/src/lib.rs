//! Small containers shared by the `gx` crates.
//!
//! - [`hash`]: `hashbrown` containers with a fixed `foldhash` seed.
//! - [`TypeIdMap`]: a map keyed by [`TypeId`](core::any::TypeId).
//! - [`Interner`]: assigns sequential ids to keys in first-seen order.
#![no_std]

// -----------------------------------------------------------------------------
// No STD Support

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod interner;
mod typeid_map;

pub mod hash;

// -----------------------------------------------------------------------------
// Top-level exports

pub use interner::Interner;
pub use typeid_map::TypeIdMap;
