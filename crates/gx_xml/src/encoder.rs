use alloc::string::{String, ToString};
use alloc::vec::Vec;
use std::sync::{Mutex, PoisonError};

use gx_reflect::descriptor::TypeShape;
use gx_reflect::graph::{Object, ObjectBody, ObjectGraph, ObjectId};
use gx_reflect::name::{QualifiedTypeName, TypeKey, builtin};
use gx_reflect::registry::{TypeRegistry, TypeRegistryArc};
use gx_reflect::value::Value;
use gx_utils::Interner;
use gx_utils::hash::HashMap;

use crate::node::{NodeIndex, NodeKind, NodeTree, SerializedNode};
use crate::{CodecConfig, EncodeError, scalar};

/// Per-call state, reused between calls.
#[derive(Default)]
struct Scratch {
    /// Qualified type names in first-use order; ids start at 1.
    types: Interner<String>,
    /// Node of the first occurrence of every object written so far.
    objects: HashMap<ObjectId, NodeIndex>,
    next_reference: u32,
}

impl Scratch {
    fn reset(&mut self) {
        self.types.clear();
        self.objects.clear();
        self.next_reference = 1;
    }
}

/// Writes object graphs as XML documents.
///
/// An encoder may be shared between threads; calls are serialized through an
/// internal lock that guards the per-call scratch state.
pub struct Encoder {
    registry: TypeRegistryArc,
    config: CodecConfig,
    scratch: Mutex<Scratch>,
}

impl Encoder {
    pub fn new(registry: TypeRegistryArc, config: CodecConfig) -> Self {
        Self {
            registry,
            config,
            scratch: Mutex::new(Scratch::default()),
        }
    }

    #[inline]
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Serializes `root` and everything reachable from it.
    ///
    /// # Errors
    ///
    /// - [`EncodeError::NullRoot`] if `root` is [`Value::Null`].
    /// - [`EncodeError::Registry`] if a reachable type is not registered.
    /// - [`EncodeError::Format`] if a member formatter fails.
    pub fn serialize(&self, graph: &ObjectGraph, root: &Value) -> Result<String, EncodeError> {
        if root.is_null() {
            return Err(EncodeError::NullRoot);
        }

        let mut scratch = self.scratch.lock().unwrap_or_else(PoisonError::into_inner);
        scratch.reset();
        let registry = self.registry.read();

        let mut session = Session {
            registry: &*registry,
            graph,
            scratch: &mut *scratch,
            tree: NodeTree::new(),
        };
        let result = session.encode(root, Slot::new(NodeKind::Root)).map(|_| {
            log::trace!(
                "encoded {} node(s) with {} type(s) and {} shared object(s)",
                session.tree.len(),
                session.scratch.types.len(),
                session.scratch.next_reference - 1,
            );
            let types = session
                .scratch
                .types
                .iter()
                .map(|(id, name)| (id + 1, name.clone()))
                .collect();
            let mut tree = core::mem::take(&mut session.tree);
            tree.set_types(types);
            tree
        });
        scratch.reset();

        result?.to_xml(&self.config)
    }
}

/// Where a value is written.
#[derive(Clone, Copy)]
struct Slot<'a> {
    kind: NodeKind,
    name: Option<&'a str>,
    arg: Option<usize>,
    formatter: Option<&'a TypeKey>,
}

impl<'a> Slot<'a> {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            name: None,
            arg: None,
            formatter: None,
        }
    }

    fn node(&self) -> SerializedNode {
        let mut node = SerializedNode::new(self.kind);
        node.name = self.name.map(String::from);
        node.arg = self.arg;
        node
    }
}

struct Session<'a> {
    registry: &'a TypeRegistry,
    graph: &'a ObjectGraph,
    scratch: &'a mut Scratch,
    tree: NodeTree,
}

impl<'a> Session<'a> {
    fn type_id(&mut self, name: QualifiedTypeName) -> u32 {
        self.scratch.types.intern(name.to_string()) + 1
    }

    fn type_id_of(&mut self, key: &TypeKey) -> Result<u32, EncodeError> {
        let name = self.registry.qualified_name(key.as_str())?;
        Ok(self.type_id(name))
    }

    /// Type id of an object, with the element type of lists and arrays
    /// embedded as generic argument.
    fn object_type_id(&mut self, object: &Object) -> Result<u32, EncodeError> {
        let mut name = self.registry.qualified_name(object.ty().as_str())?;
        if let ObjectBody::List(seq) | ObjectBody::Array(seq) = object.body() {
            name = name.with_enclosed(self.registry.qualified_name(seq.element.as_str())?);
        }
        Ok(self.type_id(name))
    }

    /// Reference id of an object already written at `first`; assigned on
    /// first use.
    fn reference_of(&mut self, first: NodeIndex) -> u32 {
        let node = self.tree.node_mut(first);
        if let Some(id) = node.reference_id {
            return id;
        }
        let id = self.scratch.next_reference;
        self.scratch.next_reference += 1;
        node.reference_id = Some(id);
        id
    }

    fn encode(&mut self, value: &Value, slot: Slot<'_>) -> Result<NodeIndex, EncodeError> {
        let mut node = slot.node();

        if let Value::Object(id) = value
            && let Some(&first) = self.scratch.objects.get(id)
        {
            node.reference = Some(self.reference_of(first));
            return Ok(self.tree.push(node));
        }

        if value.is_null() {
            node.type_id = Some(self.type_id_of(&builtin::OBJECT)?);
            return Ok(self.tree.push(node));
        }

        if let Some(formatter_key) = slot.formatter {
            let registry = self.registry;
            let formatter = registry
                .formatter(formatter_key.as_str())
                .ok_or_else(|| EncodeError::UnknownFormatter(formatter_key.clone()))?;
            let text = formatter.format(value).map_err(|source| EncodeError::Format {
                formatter: formatter_key.clone(),
                member: String::from(slot.name.unwrap_or_default()),
                source,
            })?;
            node.type_id = Some(self.value_type_id(value)?);
            node.formatter_id = Some(self.type_id_of(formatter_key)?);
            node.value = Some(text);
            return Ok(self.tree.push(node));
        }

        match value {
            Value::Object(id) => self.encode_object(*id, node),
            Value::Enum(e) => {
                node.type_id = Some(self.type_id_of(e.ty())?);
                node.value = Some(String::from(e.variant()));
                Ok(self.tree.push(node))
            }
            inline => {
                node.type_id = Some(self.value_type_id(inline)?);
                node.value = scalar::format(inline);
                Ok(self.tree.push(node))
            }
        }
    }

    fn value_type_id(&mut self, value: &Value) -> Result<u32, EncodeError> {
        match value {
            Value::Object(id) => {
                let graph = self.graph;
                let object = graph.get(*id).ok_or(EncodeError::DanglingObject(*id))?;
                self.object_type_id(object)
            }
            other => {
                let key = other.inline_type().unwrap_or(builtin::OBJECT);
                self.type_id_of(&key)
            }
        }
    }

    fn encode_object(&mut self, id: ObjectId, mut node: SerializedNode) -> Result<NodeIndex, EncodeError> {
        let graph = self.graph;
        let registry = self.registry;
        let object = graph.get(id).ok_or(EncodeError::DanglingObject(id))?;

        node.type_id = Some(self.object_type_id(object)?);
        let index = self.tree.push(node);
        self.scratch.objects.insert(id, index);

        match object.body() {
            ObjectBody::List(seq) | ObjectBody::Array(seq) => {
                for item in &seq.items {
                    let child = self.encode(item, Slot::new(NodeKind::Item))?;
                    self.tree.append_child(index, child);
                }
            }
            ObjectBody::Map(entries) => {
                for (key, value) in entries {
                    let entry = self.tree.push(SerializedNode::new(NodeKind::Entry));
                    let key = self.encode(key, Slot::new(NodeKind::Key))?;
                    let value = self.encode(value, Slot::new(NodeKind::Value))?;
                    self.tree.append_child(entry, key);
                    self.tree.append_child(entry, value);
                    self.tree.append_child(index, entry);
                }
            }
            ObjectBody::Record(record) => {
                let descriptor = registry.descriptor_for(object.ty().as_str())?;
                debug_assert_eq!(descriptor.shape(), TypeShape::Record);
                // Constructor arguments first, by index.
                let mut members: Vec<_> = descriptor.members().iter().collect();
                members.sort_by_key(|m| (m.constructor_argument().is_none(), m.constructor_argument()));
                for member in members {
                    let value = member.get(&**record).ok_or_else(|| EncodeError::RecordMismatch {
                        id,
                        ty: object.ty().clone(),
                    })?;
                    if value.is_null() && member.constructor_argument().is_none() {
                        continue;
                    }
                    let slot = Slot {
                        kind: NodeKind::Member,
                        name: Some(member.name()),
                        arg: member.constructor_argument(),
                        formatter: member.formatter(),
                    };
                    let child = self.encode(&value, slot)?;
                    self.tree.append_child(index, child);
                }
            }
        }
        Ok(index)
    }
}
