use alloc::vec::Vec;

use super::{Constructor, MemberDescriptor, TypeShape};
use crate::name::TypeKey;
use crate::value::Value;

/// The persisted layout of a registered type.
///
/// Members are stored in document order: non-public members of each
/// inheritance level from base to derived, then all public members from base
/// to derived.
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    key: TypeKey,
    shape: TypeShape,
    members: Vec<MemberDescriptor>,
    constructors: Vec<Constructor>,
}

impl TypeDescriptor {
    /// A descriptor without members or constructors, for builtins, enums and
    /// formatters.
    pub fn opaque(key: TypeKey, shape: TypeShape) -> Self {
        Self {
            key,
            shape,
            members: Vec::new(),
            constructors: Vec::new(),
        }
    }

    pub(crate) fn record(
        key: TypeKey,
        members: Vec<MemberDescriptor>,
        constructors: Vec<Constructor>,
    ) -> Self {
        Self {
            key,
            shape: TypeShape::Record,
            members,
            constructors,
        }
    }

    #[inline]
    pub fn key(&self) -> &TypeKey {
        &self.key
    }

    #[inline]
    pub fn shape(&self) -> TypeShape {
        self.shape
    }

    #[inline]
    pub fn members(&self) -> &[MemberDescriptor] {
        &self.members
    }

    /// Finds a member by logical name.
    ///
    /// When a derived type declares a member with the same logical name as a
    /// base member, the derived one wins.
    pub fn member(&self, name: &str) -> Option<&MemberDescriptor> {
        self.members.iter().rev().find(|m| m.name() == name)
    }

    /// Members that are passed to a constructor, in any order.
    pub fn constructor_arguments(&self) -> impl Iterator<Item = &MemberDescriptor> {
        self.members.iter().filter(|m| m.constructor_argument().is_some())
    }

    #[inline]
    pub fn constructors(&self) -> &[Constructor] {
        &self.constructors
    }

    /// Picks the first constructor whose arity and parameter types accept `args`.
    pub fn find_constructor(&self, args: &[Value]) -> Option<&Constructor> {
        self.constructors.iter().find(|c| c.accepts(args))
    }
}
