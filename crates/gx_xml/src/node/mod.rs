//! The intermediate node tree between object graphs and XML text.
//!
//! The encoder builds a [`NodeTree`] and [writes](NodeTree::to_xml) it; the
//! decoder [reads](NodeTree::from_xml) one and walks it. Attribute values in
//! the tree are unescaped.

mod read;
mod write;

use alloc::string::String;
use alloc::vec::Vec;

/// The element a node is written as.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// The document element.
    Root,
    /// A member of a record, with `name` and optionally `arg`.
    Member,
    /// An element of a list or array.
    Item,
    /// An entry of a map, holding one `Key` and one `Value`.
    Entry,
    Key,
    Value,
}

impl NodeKind {
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::Member => "member",
            Self::Item => "item",
            Self::Entry => "entry",
            Self::Key => "key",
            Self::Value => "value",
        }
    }

    pub(crate) fn from_tag(tag: &[u8]) -> Option<Self> {
        Some(match tag {
            b"root" => Self::Root,
            b"member" => Self::Member,
            b"item" => Self::Item,
            b"entry" => Self::Entry,
            b"key" => Self::Key,
            b"value" => Self::Value,
            _ => return None,
        })
    }
}

/// Element name of the type table.
pub(crate) const TYPES_TAG: &str = "types";
/// Element name of a type table entry.
pub(crate) const TYPE_ITEM_TAG: &str = "item";

/// Index of a node within its [`NodeTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeIndex(u32);

impl NodeIndex {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// One element of a document.
#[derive(Clone, Debug, PartialEq)]
pub struct SerializedNode {
    pub kind: NodeKind,
    /// Id in the type table.
    pub type_id: Option<u32>,
    /// Scalar payload.
    pub value: Option<String>,
    /// Set on the first occurrence of a shared object.
    pub reference_id: Option<u32>,
    /// Refers to an object written earlier; no other payload.
    pub reference: Option<u32>,
    /// Id of the formatter type that produced `value`.
    pub formatter_id: Option<u32>,
    /// Logical member name.
    pub name: Option<String>,
    /// Constructor argument index.
    pub arg: Option<usize>,
    pub children: Vec<NodeIndex>,
}

impl SerializedNode {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            type_id: None,
            value: None,
            reference_id: None,
            reference: None,
            formatter_id: None,
            name: None,
            arg: None,
            children: Vec::new(),
        }
    }
}

/// A document as a flat list of nodes. The first node is the root.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeTree {
    nodes: Vec<SerializedNode>,
    types: Vec<(u32, String)>,
}

impl NodeTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node without attaching it to a parent.
    pub fn push(&mut self, node: SerializedNode) -> NodeIndex {
        let index = NodeIndex(self.nodes.len() as u32);
        self.nodes.push(node);
        index
    }

    pub fn append_child(&mut self, parent: NodeIndex, child: NodeIndex) {
        self.nodes[parent.index()].children.push(child);
    }

    #[inline]
    pub fn node(&self, index: NodeIndex) -> &SerializedNode {
        &self.nodes[index.index()]
    }

    #[inline]
    pub fn node_mut(&mut self, index: NodeIndex) -> &mut SerializedNode {
        &mut self.nodes[index.index()]
    }

    /// The root node, if any node was added.
    #[inline]
    pub fn root(&self) -> Option<NodeIndex> {
        (!self.nodes.is_empty()).then_some(NodeIndex(0))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Type table entries: id and qualified type name.
    #[inline]
    pub fn types(&self) -> &[(u32, String)] {
        &self.types
    }

    pub fn set_types(&mut self, types: Vec<(u32, String)>) {
        self.types = types;
    }
}
