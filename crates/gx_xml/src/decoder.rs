use alloc::borrow::Cow;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use gx_reflect::descriptor::{TypeDescriptor, TypeShape};
use gx_reflect::graph::{ObjectBody, ObjectGraph, ObjectId};
use gx_reflect::name::{QualifiedTypeName, builtin};
use gx_reflect::registry::{ResolvedType, TypeRegistry, TypeRegistryArc};
use gx_reflect::resolver::TypeNameResolver;
use gx_reflect::value::{EnumValue, FromValue, Value, ValueError};
use gx_utils::hash::HashMap;

use crate::node::{NodeIndex, NodeKind, NodeTree, SerializedNode};
use crate::{CodecConfig, DecodeError, VersionPolicy, scalar};

/// The object graph rebuilt from a document, and its root value.
#[derive(Debug)]
pub struct Decoded {
    pub graph: ObjectGraph,
    pub root: Value,
}

impl Decoded {
    /// Borrows the root record if it is a `T`.
    pub fn root_record<T: 'static>(&self) -> Option<&T> {
        self.graph.record(self.root.as_object()?)
    }
}

/// Reads XML documents back into object graphs.
///
/// A decoder holds no per-call state and may be used from several threads.
pub struct Decoder {
    registry: TypeRegistryArc,
    resolver: Arc<TypeNameResolver>,
    config: CodecConfig,
}

impl Decoder {
    pub fn new(registry: TypeRegistryArc, resolver: Arc<TypeNameResolver>, config: CodecConfig) -> Self {
        Self {
            registry,
            resolver,
            config,
        }
    }

    #[inline]
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Rebuilds the object graph of a document.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::Xml`] or [`DecodeError::Structural`] for malformed documents.
    /// - [`DecodeError::UnknownType`] if a type in the type table cannot be resolved,
    ///   even after repairing its module version.
    /// - [`DecodeError::ConstructorArgumentGap`] if constructor argument indices
    ///   are not contiguous from zero.
    /// - [`DecodeError::UnresolvedReference`] if a `ref` names an unknown object.
    pub fn deserialize(&self, text: &str) -> Result<Decoded, DecodeError> {
        let tree = NodeTree::from_xml(text)?;
        let registry = self.registry.read();
        let mut graph = ObjectGraph::new();

        let root = {
            let mut session = self.session(&registry, &tree, &mut graph)?;
            session.decode_root(None)?
        };
        Ok(Decoded { graph, root })
    }

    /// Deserializes a document and converts its root value.
    pub fn deserialize_as<T: FromValue>(&self, text: &str) -> Result<(ObjectGraph, T), DecodeError> {
        let Decoded { graph, root } = self.deserialize(text)?;
        let value = T::from_value(root).map_err(|source| DecodeError::Value {
            path: String::from(NodeKind::Root.tag()),
            source,
        })?;
        Ok((graph, value))
    }

    /// Populates the existing object `target` from a document.
    ///
    /// The root of the document must describe an object of `target`'s type.
    /// No constructor runs; constructor arguments are assigned like other
    /// writable members. Lists and maps are replaced; an array must have as
    /// many items as the document.
    ///
    /// On error `target` keeps its previous content and the objects created
    /// for the document are removed from `graph` again.
    pub fn deserialize_into(
        &self,
        graph: &mut ObjectGraph,
        target: ObjectId,
        text: &str,
    ) -> Result<(), DecodeError> {
        let tree = NodeTree::from_xml(text)?;
        let registry = self.registry.read();
        let mut session = self.session(&registry, &tree, graph)?;
        match session.decode_root(Some(target)) {
            Ok(_) => Ok(()),
            Err(e) => {
                session.discard();
                Err(e)
            }
        }
    }

    fn session<'a>(
        &self,
        registry: &'a TypeRegistry,
        tree: &'a NodeTree,
        graph: &'a mut ObjectGraph,
    ) -> Result<Session<'a>, DecodeError> {
        let mut types = HashMap::default();
        for (id, text) in tree.types() {
            types.insert(*id, self.resolve_type(registry, text)?);
        }
        Ok(Session {
            registry,
            tree,
            graph,
            types,
            references: HashMap::default(),
            created: Vec::new(),
            path: Vec::new(),
        })
    }

    fn resolve_type(&self, registry: &TypeRegistry, text: &str) -> Result<ResolvedType, DecodeError> {
        let mut name = QualifiedTypeName::parse(text).map_err(|source| DecodeError::TypeName {
            name: String::from(text),
            source,
        })?;
        if let Some(resolved) = registry.resolve_exact(&name) {
            return Ok(resolved);
        }

        let policy = self.config.version_policy;
        if policy != VersionPolicy::Exact {
            if self.resolver.repair_name(&mut name, registry)
                && let Some(resolved) = registry.resolve_exact(&name)
            {
                log::debug!("resolved `{text}` as `{name}`");
                return Ok(resolved);
            }
            if policy == VersionPolicy::IgnoreVersion
                && let Some(resolved) = registry.resolve_logical(&name)
            {
                log::debug!("resolved `{text}` ignoring its module version");
                return Ok(resolved);
            }
        }
        Err(DecodeError::UnknownType {
            name: String::from(text),
        })
    }
}

// -----------------------------------------------------------------------------
// Session

struct Session<'a> {
    registry: &'a TypeRegistry,
    tree: &'a NodeTree,
    graph: &'a mut ObjectGraph,
    types: HashMap<u32, ResolvedType>,
    /// Objects by the `id` they were written with.
    references: HashMap<u32, ObjectId>,
    /// Objects inserted into the graph by this session.
    created: Vec<ObjectId>,
    path: Vec<String>,
}

impl<'a> Session<'a> {
    fn path(&self) -> String {
        self.path.join("/")
    }

    fn structural(&self, reason: impl Into<Cow<'static, str>>) -> DecodeError {
        DecodeError::Structural {
            path: self.path(),
            reason: reason.into(),
        }
    }

    fn value_error(&self, source: ValueError) -> DecodeError {
        DecodeError::Value {
            path: self.path(),
            source,
        }
    }

    /// Removes every object this session inserted.
    fn discard(&mut self) {
        for id in self.created.drain(..) {
            self.graph.remove(id);
        }
    }

    fn decode_root(&mut self, target: Option<ObjectId>) -> Result<Value, DecodeError> {
        let tree = self.tree;
        let root = tree.root().ok_or_else(|| self.structural("document has no root"))?;
        self.path.push(String::from(NodeKind::Root.tag()));

        let value = match target {
            None => self.decode(root)?,
            Some(target) => {
                let node = tree.node(root);
                let ty = self.node_type(node)?;
                let found = self.graph.get(target).map(|o| o.ty().clone());
                if found.as_ref() != Some(&ty.key) {
                    return Err(DecodeError::TargetMismatch {
                        expected: ty.key,
                        found: found.unwrap_or(builtin::OBJECT),
                    });
                }
                self.decode_object(root, &ty, Some(target))?
            }
        };

        self.path.pop();
        Ok(value)
    }

    /// Decodes `child` with `segment` appended to the error path.
    fn decode_child(&mut self, child: NodeIndex, segment: String) -> Result<Value, DecodeError> {
        self.path.push(segment);
        let value = self.decode(child)?;
        self.path.pop();
        Ok(value)
    }

    fn node_type(&self, node: &SerializedNode) -> Result<ResolvedType, DecodeError> {
        let id = node
            .type_id
            .ok_or_else(|| self.structural("missing `type` attribute"))?;
        self.types
            .get(&id)
            .cloned()
            .ok_or_else(|| DecodeError::UndeclaredType {
                path: self.path(),
                id,
            })
    }

    fn required_value<'n>(&self, node: &'n SerializedNode) -> Result<&'n str, DecodeError> {
        node.value
            .as_deref()
            .ok_or_else(|| self.structural("missing `value` attribute"))
    }

    fn decode(&mut self, index: NodeIndex) -> Result<Value, DecodeError> {
        let tree = self.tree;
        let registry = self.registry;
        let node = tree.node(index);

        if let Some(reference) = node.reference {
            return self
                .references
                .get(&reference)
                .map(|id| Value::Object(*id))
                .ok_or_else(|| DecodeError::UnresolvedReference {
                    path: self.path(),
                    reference,
                });
        }

        let ty = self.node_type(node)?;

        if let Some(formatter_id) = node.formatter_id {
            let formatter_key = self
                .types
                .get(&formatter_id)
                .map(|t| t.key.clone())
                .ok_or_else(|| DecodeError::UndeclaredType {
                    path: self.path(),
                    id: formatter_id,
                })?;
            let formatter = registry
                .formatter(formatter_key.as_str())
                .ok_or_else(|| self.structural("`formatter` does not name a formatter type"))?;
            let text = self.required_value(node)?;
            return formatter.parse(text).map_err(|source| DecodeError::Format {
                path: self.path(),
                formatter: formatter_key,
                source,
            });
        }

        let descriptor = registry.descriptor_for(ty.key.as_str())?;
        let invalid = |this: &Self, text: &str| DecodeError::InvalidScalar {
            path: this.path(),
            ty: ty.key.clone(),
            text: String::from(text),
        };

        match descriptor.shape() {
            TypeShape::Primitive(kind) => {
                let text = self.required_value(node)?;
                scalar::parse_primitive(kind, text).ok_or_else(|| invalid(self, text))
            }
            TypeShape::String => Ok(Value::String(String::from(self.required_value(node)?))),
            TypeShape::Enum(variants) => {
                let text = self.required_value(node)?;
                match variants.iter().find(|v| **v == text) {
                    Some(variant) => Ok(Value::Enum(EnumValue::new(ty.key.clone(), *variant))),
                    None => Err(self.value_error(ValueError::UnknownVariant {
                        ty: ty.key.clone(),
                        variant: String::from(text),
                    })),
                }
            }
            TypeShape::DateTime => {
                let text = self.required_value(node)?;
                scalar::parse_date_time(text).ok_or_else(|| invalid(self, text))
            }
            TypeShape::Color => {
                let text = self.required_value(node)?;
                scalar::parse_color(text).ok_or_else(|| invalid(self, text))
            }
            TypeShape::Point => {
                let text = self.required_value(node)?;
                scalar::parse_point(text).ok_or_else(|| invalid(self, text))
            }
            TypeShape::Any => {
                if node.value.is_some() || !node.children.is_empty() {
                    return Err(self.structural("untyped element carries a payload"));
                }
                Ok(Value::Null)
            }
            TypeShape::Formatter => Err(self.structural("a formatter type cannot be a value type")),
            TypeShape::List | TypeShape::Array | TypeShape::Map | TypeShape::Record => {
                self.decode_object(index, &ty, None)
            }
        }
    }

    /// Builds or reuses the object of `index` and fills it.
    ///
    /// The object is registered under its `id` before its content is read, so
    /// references from inside its own subtree resolve. Content is written only
    /// once all of it decoded.
    fn decode_object(
        &mut self,
        index: NodeIndex,
        ty: &ResolvedType,
        existing: Option<ObjectId>,
    ) -> Result<Value, DecodeError> {
        let tree = self.tree;
        let registry = self.registry;
        let node = tree.node(index);
        let descriptor = registry.descriptor_for(ty.key.as_str())?;
        let element = ty.element.clone().unwrap_or(builtin::OBJECT);

        let id = match existing {
            Some(id) => id,
            None => match descriptor.shape() {
                TypeShape::List => self.graph.insert_list(element, Vec::new()),
                TypeShape::Array => {
                    let length = children(tree, node, NodeKind::Item).count();
                    self.graph.insert_array(element, alloc::vec![Value::Null; length])
                }
                TypeShape::Map => self.graph.insert_map(Vec::new()),
                _ => self.construct(node, ty, descriptor)?,
            },
        };
        if existing.is_none() {
            self.created.push(id);
        }
        if let Some(reference_id) = node.reference_id {
            self.references.insert(reference_id, id);
        }

        match descriptor.shape() {
            TypeShape::List => {
                let items = self.decode_items(node)?;
                if let Some(list) = self.graph.list_mut(id) {
                    list.items = items;
                }
            }
            TypeShape::Array => {
                let items = self.decode_items(node)?;
                let length = self.graph.array(id).map_or(0, |array| array.items.len());
                if items.len() != length {
                    return Err(self.structural(alloc::format!(
                        "array of length {length} cannot take {} items",
                        items.len()
                    )));
                }
                if let Some(array) = self.graph.array_mut(id) {
                    array.items = items;
                }
            }
            TypeShape::Map => {
                let entries = self.decode_entries(node)?;
                if let Some(map) = self.graph.map_mut(id) {
                    *map = entries;
                }
            }
            _ => self.populate(node, id, descriptor, existing.is_none())?,
        }
        Ok(Value::Object(id))
    }

    fn construct(
        &mut self,
        node: &SerializedNode,
        ty: &ResolvedType,
        descriptor: &TypeDescriptor,
    ) -> Result<ObjectId, DecodeError> {
        let tree = self.tree;
        let mut args: Vec<(usize, NodeIndex)> = children(tree, node, NodeKind::Member)
            .filter_map(|child| Some((tree.node(child).arg?, child)))
            .collect();
        args.sort_by_key(|(arg, _)| *arg);
        for (expected, (found, _)) in args.iter().enumerate() {
            if *found != expected {
                return Err(DecodeError::ConstructorArgumentGap {
                    path: self.path(),
                    expected,
                    found: *found,
                });
            }
        }

        let mut values = Vec::with_capacity(args.len());
        for (_, child) in args {
            values.push(self.decode_child(child, member_segment(tree.node(child)))?);
        }

        let constructor = descriptor
            .find_constructor(&values)
            .ok_or_else(|| DecodeError::NoMatchingConstructor {
                path: self.path(),
                ty: ty.key.clone(),
                arity: values.len(),
            })?;
        let record = constructor
            .invoke(values)
            .map_err(|source| self.value_error(source))?;
        Ok(self.graph.insert_record(ty.key.clone(), record))
    }

    fn populate(
        &mut self,
        node: &SerializedNode,
        id: ObjectId,
        descriptor: &TypeDescriptor,
        constructed: bool,
    ) -> Result<(), DecodeError> {
        let tree = self.tree;
        let mut assignments = Vec::new();
        for child in children(tree, node, NodeKind::Member) {
            let member_node = tree.node(child);
            if constructed && member_node.arg.is_some() {
                continue;
            }
            let Some(name) = member_node.name.as_deref() else {
                return Err(self.structural("`member` without `name`"));
            };
            let Some(member) = descriptor.member(name) else {
                log::debug!("skipping unknown member `{name}` of `{}` at `{}`", descriptor.key(), self.path());
                continue;
            };
            if !member.is_writable() {
                log::debug!("skipping read-only member `{name}` of `{}`", descriptor.key());
                continue;
            }

            let segment = member_segment(member_node);
            let value = self.decode_child(child, segment.clone())?;
            if let Err(source) = member.check(&value) {
                self.path.push(segment);
                return Err(self.value_error(source));
            }
            assignments.push((member, value, segment));
        }

        let Some(ObjectBody::Record(record)) = self.graph.get_mut(id).map(|o| o.body_mut()) else {
            return Err(self.value_error(ValueError::RecordMismatch(descriptor.key().clone())));
        };
        for (member, value, segment) in assignments {
            if let Err(source) = member.set(&mut **record, value) {
                self.path.push(segment);
                return Err(self.value_error(source));
            }
        }
        Ok(())
    }

    fn decode_items(&mut self, node: &SerializedNode) -> Result<Vec<Value>, DecodeError> {
        let tree = self.tree;
        let items: Vec<NodeIndex> = children(tree, node, NodeKind::Item).collect();
        let mut values = Vec::with_capacity(items.len());
        for (position, child) in items.into_iter().enumerate() {
            values.push(self.decode_child(child, alloc::format!("item[{position}]"))?);
        }
        Ok(values)
    }

    fn decode_entries(&mut self, node: &SerializedNode) -> Result<Vec<(Value, Value)>, DecodeError> {
        let tree = self.tree;
        let entries: Vec<NodeIndex> = children(tree, node, NodeKind::Entry).collect();
        let mut decoded = Vec::with_capacity(entries.len());
        for (position, entry) in entries.into_iter().enumerate() {
            self.path.push(alloc::format!("entry[{position}]"));
            let entry_node = tree.node(entry);
            let key = children(tree, entry_node, NodeKind::Key).next();
            let value = children(tree, entry_node, NodeKind::Value).next();
            let (Some(key), Some(value)) = (key, value) else {
                return Err(self.structural("`entry` needs a `key` and a `value`"));
            };
            let key = self.decode_child(key, String::from(NodeKind::Key.tag()))?;
            let value = self.decode_child(value, String::from(NodeKind::Value.tag()))?;
            decoded.push((key, value));
            self.path.pop();
        }
        Ok(decoded)
    }
}

fn member_segment(node: &SerializedNode) -> String {
    alloc::format!("member[{}]", node.name.as_deref().unwrap_or_default())
}

fn children<'t>(
    tree: &'t NodeTree,
    node: &'t SerializedNode,
    kind: NodeKind,
) -> impl Iterator<Item = NodeIndex> + 't {
    node.children
        .iter()
        .copied()
        .filter(move |child| tree.node(*child).kind == kind)
}
