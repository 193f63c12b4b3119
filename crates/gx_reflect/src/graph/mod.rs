//! The object arena.
//!
//! Persisted object graphs may share objects and contain cycles. Objects live
//! in an [`ObjectGraph`] and refer to each other through [`ObjectId`]s carried
//! in [`Value::Object`], so a cycle is just two ids pointing at each other.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;

use slotmap::SlotMap;

use crate::name::{TypeKey, builtin};
use crate::registry::Persist;
use crate::value::Value;

slotmap::new_key_type! {
    /// Handle of an object stored in an [`ObjectGraph`].
    pub struct ObjectId;
}

/// Items of a list or array, with their declared element type.
#[derive(Clone, Debug, PartialEq)]
pub struct Sequence {
    pub element: TypeKey,
    pub items: Vec<Value>,
}

/// The payload of an [`Object`].
pub enum ObjectBody {
    /// A registered record type, stored as its Rust value.
    Record(Box<dyn Any + Send + Sync>),
    List(Sequence),
    Array(Sequence),
    /// Ordered key/value entries.
    Map(Vec<(Value, Value)>),
}

impl fmt::Debug for ObjectBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Record(_) => f.write_str("Record(..)"),
            Self::List(seq) => f.debug_tuple("List").field(seq).finish(),
            Self::Array(seq) => f.debug_tuple("Array").field(seq).finish(),
            Self::Map(entries) => f.debug_tuple("Map").field(entries).finish(),
        }
    }
}

/// An object in the graph: its registered type and its payload.
#[derive(Debug)]
pub struct Object {
    ty: TypeKey,
    body: ObjectBody,
}

impl Object {
    #[inline]
    pub fn ty(&self) -> &TypeKey {
        &self.ty
    }

    #[inline]
    pub fn body(&self) -> &ObjectBody {
        &self.body
    }

    #[inline]
    pub fn body_mut(&mut self) -> &mut ObjectBody {
        &mut self.body
    }
}

/// Arena of records and collections.
///
/// # Examples
///
/// ```
/// use gx_reflect::graph::ObjectGraph;
/// use gx_reflect::name::builtin;
/// use gx_reflect::value::Value;
///
/// let mut graph = ObjectGraph::new();
/// let list = graph.insert_list(builtin::OBJECT, Vec::new());
/// // A list that contains itself.
/// graph.list_mut(list).unwrap().items.push(Value::Object(list));
///
/// assert_eq!(graph.list(list).unwrap().items, [Value::Object(list)]);
/// ```
#[derive(Debug, Default)]
pub struct ObjectGraph {
    objects: SlotMap<ObjectId, Object>,
}

impl ObjectGraph {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a record under its registered type key.
    pub fn insert<T: Persist>(&mut self, record: T) -> ObjectId {
        self.insert_record(TypeKey::from_static(T::TYPE_NAME), Box::new(record))
    }

    pub fn insert_record(&mut self, ty: TypeKey, record: Box<dyn Any + Send + Sync>) -> ObjectId {
        self.insert_object(ty, ObjectBody::Record(record))
    }

    pub fn insert_list(&mut self, element: TypeKey, items: Vec<Value>) -> ObjectId {
        self.insert_object(builtin::LIST, ObjectBody::List(Sequence { element, items }))
    }

    pub fn insert_array(&mut self, element: TypeKey, items: Vec<Value>) -> ObjectId {
        self.insert_object(builtin::ARRAY, ObjectBody::Array(Sequence { element, items }))
    }

    pub fn insert_map(&mut self, entries: Vec<(Value, Value)>) -> ObjectId {
        self.insert_object(builtin::MAP, ObjectBody::Map(entries))
    }

    fn insert_object(&mut self, ty: TypeKey, body: ObjectBody) -> ObjectId {
        self.objects.insert(Object { ty, body })
    }

    #[inline]
    pub fn get(&self, id: ObjectId) -> Option<&Object> {
        self.objects.get(id)
    }

    #[inline]
    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut Object> {
        self.objects.get_mut(id)
    }

    #[inline]
    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(id)
    }

    /// Removes the object at `id`. Values still pointing at it dangle.
    #[inline]
    pub fn remove(&mut self, id: ObjectId) -> Option<Object> {
        self.objects.remove(id)
    }

    /// Borrows the record stored at `id` if it is a `T`.
    pub fn record<T: 'static>(&self, id: ObjectId) -> Option<&T> {
        match &self.objects.get(id)?.body {
            ObjectBody::Record(record) => record.downcast_ref(),
            _ => None,
        }
    }

    pub fn record_mut<T: 'static>(&mut self, id: ObjectId) -> Option<&mut T> {
        match &mut self.objects.get_mut(id)?.body {
            ObjectBody::Record(record) => record.downcast_mut(),
            _ => None,
        }
    }

    /// Borrows the items of a list.
    pub fn list(&self, id: ObjectId) -> Option<&Sequence> {
        match &self.objects.get(id)?.body {
            ObjectBody::List(seq) => Some(seq),
            _ => None,
        }
    }

    pub fn list_mut(&mut self, id: ObjectId) -> Option<&mut Sequence> {
        match &mut self.objects.get_mut(id)?.body {
            ObjectBody::List(seq) => Some(seq),
            _ => None,
        }
    }

    pub fn array(&self, id: ObjectId) -> Option<&Sequence> {
        match &self.objects.get(id)?.body {
            ObjectBody::Array(seq) => Some(seq),
            _ => None,
        }
    }

    pub fn array_mut(&mut self, id: ObjectId) -> Option<&mut Sequence> {
        match &mut self.objects.get_mut(id)?.body {
            ObjectBody::Array(seq) => Some(seq),
            _ => None,
        }
    }

    pub fn map(&self, id: ObjectId) -> Option<&[(Value, Value)]> {
        match &self.objects.get(id)?.body {
            ObjectBody::Map(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn map_mut(&mut self, id: ObjectId) -> Option<&mut Vec<(Value, Value)>> {
        match &mut self.objects.get_mut(id)?.body {
            ObjectBody::Map(entries) => Some(entries),
            _ => None,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &Object)> {
        self.objects.iter()
    }
}
