use alloc::borrow::Cow;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use quick_xml::Writer;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::name::QName;

use super::{NodeIndex, NodeKind, NodeTree, TYPE_ITEM_TAG, TYPES_TAG};
use crate::CodecConfig;
use crate::EncodeError;
use crate::escape::escape;

type XmlWriter = Writer<Vec<u8>>;

fn write_error(e: impl ToString) -> EncodeError {
    EncodeError::Write(e.to_string())
}

/// Adds an attribute whose value is escaped by [`escape`] only.
fn push_attribute(start: &mut BytesStart<'_>, key: &'static str, value: &str) {
    start.push_attribute(Attribute {
        key: QName(key.as_bytes()),
        value: Cow::Owned(escape(value).into_owned().into_bytes()),
    });
}

impl NodeTree {
    /// Writes the tree as an XML document.
    ///
    /// The type table is written as the first child of the root.
    pub fn to_xml(&self, config: &CodecConfig) -> Result<String, EncodeError> {
        let Some(root) = self.root() else {
            return Err(EncodeError::Write(String::from("empty node tree")));
        };

        let mut writer = match config.indent {
            Some(indent) => Writer::new_with_indent(Vec::new(), b' ', usize::from(indent)),
            None => Writer::new(Vec::new()),
        };
        if config.declaration {
            writer
                .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
                .map_err(write_error)?;
        }
        self.write_node(&mut writer, root)?;

        String::from_utf8(writer.into_inner()).map_err(write_error)
    }

    fn write_node(&self, writer: &mut XmlWriter, index: NodeIndex) -> Result<(), EncodeError> {
        let node = self.node(index);
        let tag = node.kind.tag();
        let is_root = node.kind == NodeKind::Root;

        let mut start = BytesStart::new(tag);
        if let Some(name) = &node.name {
            push_attribute(&mut start, "name", name);
        }
        if let Some(arg) = node.arg {
            push_attribute(&mut start, "arg", &arg.to_string());
        }
        if let Some(type_id) = node.type_id {
            push_attribute(&mut start, "type", &type_id.to_string());
        }
        if let Some(formatter) = node.formatter_id {
            push_attribute(&mut start, "formatter", &formatter.to_string());
        }
        if let Some(id) = node.reference_id {
            push_attribute(&mut start, "id", &id.to_string());
        }
        if let Some(reference) = node.reference {
            push_attribute(&mut start, "ref", &reference.to_string());
        }
        if let Some(value) = &node.value {
            push_attribute(&mut start, "value", value);
        }

        let has_types = is_root && !self.types().is_empty();
        if node.children.is_empty() && !has_types {
            return writer.write_event(Event::Empty(start)).map_err(write_error);
        }

        writer.write_event(Event::Start(start)).map_err(write_error)?;
        if has_types {
            self.write_types(writer)?;
        }
        for child in &node.children {
            self.write_node(writer, *child)?;
        }
        writer
            .write_event(Event::End(BytesEnd::new(tag)))
            .map_err(write_error)
    }

    fn write_types(&self, writer: &mut XmlWriter) -> Result<(), EncodeError> {
        writer
            .write_event(Event::Start(BytesStart::new(TYPES_TAG)))
            .map_err(write_error)?;
        for (id, name) in self.types() {
            let mut item = BytesStart::new(TYPE_ITEM_TAG);
            push_attribute(&mut item, "key", &id.to_string());
            push_attribute(&mut item, "value", name);
            writer.write_event(Event::Empty(item)).map_err(write_error)?;
        }
        writer
            .write_event(Event::End(BytesEnd::new(TYPES_TAG)))
            .map_err(write_error)
    }
}
