//! The value model.
//!
//! A [`Value`] is either an inline scalar or a reference to an object in an
//! [`ObjectGraph`](crate::graph::ObjectGraph). Typed Rust values move in and
//! out through [`IntoValue`] and [`FromValue`].

mod convert;
mod drawing;
mod error;
mod model;

pub use convert::{FromValue, IntoValue};
pub use drawing::{Color, PointF};
pub use error::ValueError;
pub use model::{EnumValue, Value, ValueKind};
