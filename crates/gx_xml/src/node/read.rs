use alloc::borrow::Cow;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::str::FromStr;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::{NodeIndex, NodeKind, NodeTree, SerializedNode, TYPE_ITEM_TAG, TYPES_TAG};
use crate::DecodeError;
use crate::escape::unescape;

/// What an open element on the reader stack is.
enum Frame {
    Node(NodeIndex),
    Types,
    /// Elements whose content is ignored.
    Skipped,
}

struct TreeReader {
    tree: NodeTree,
    types: Vec<(u32, String)>,
    stack: Vec<Frame>,
    /// Element names of the open elements, for error paths.
    path: Vec<String>,
}

impl NodeTree {
    /// Parses an XML document.
    ///
    /// Unknown elements are skipped together with their content.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::Xml`] if the text is not well-formed.
    /// - [`DecodeError::Structural`] if the document element is not `root`,
    ///   or an attribute is not of the expected form.
    pub fn from_xml(text: &str) -> Result<Self, DecodeError> {
        let mut reader = Reader::from_str(text);
        reader.config_mut().trim_text(true);

        let mut state = TreeReader {
            tree: NodeTree::new(),
            types: Vec::new(),
            stack: Vec::new(),
            path: Vec::new(),
        };

        loop {
            match reader.read_event().map_err(|e| DecodeError::Xml(e.to_string()))? {
                Event::Start(start) => {
                    let frame = state.open(&start)?;
                    state.path.push(String::from_utf8_lossy(start.name().as_ref()).into_owned());
                    state.stack.push(frame);
                }
                Event::Empty(start) => {
                    state.open(&start)?;
                }
                Event::End(_) => {
                    state.stack.pop();
                    state.path.pop();
                }
                Event::Eof => break,
                _ => {}
            }
        }

        let TreeReader { mut tree, types, .. } = state;
        if tree.is_empty() {
            return Err(DecodeError::Structural {
                path: String::new(),
                reason: Cow::Borrowed("document has no `root` element"),
            });
        }
        tree.set_types(types);
        Ok(tree)
    }
}

impl TreeReader {
    fn structural(&self, tag: &str, reason: impl Into<Cow<'static, str>>) -> DecodeError {
        let mut path = self.path.join("/");
        if !path.is_empty() {
            path.push('/');
        }
        path.push_str(tag);
        DecodeError::Structural {
            path,
            reason: reason.into(),
        }
    }

    fn open(&mut self, start: &BytesStart<'_>) -> Result<Frame, DecodeError> {
        let tag = String::from_utf8_lossy(start.name().as_ref()).into_owned();

        let parent = match self.stack.last() {
            None if self.tree.is_empty() => None,
            None => return Err(self.structural(&tag, "more than one document element")),
            Some(Frame::Skipped) => return Ok(Frame::Skipped),
            Some(Frame::Types) => {
                if tag == TYPE_ITEM_TAG {
                    let attrs = self.attributes(start, &tag)?;
                    let key = attrs.parse::<u32>(self, &tag, "key")?;
                    let value = attrs.get("value");
                    match (key, value) {
                        (Some(key), Some(value)) => self.types.push((key, String::from(value))),
                        _ => return Err(self.structural(&tag, "type entry needs `key` and `value`")),
                    }
                }
                return Ok(Frame::Skipped);
            }
            Some(Frame::Node(parent)) => Some(*parent),
        };

        if parent.is_some_and(|p| self.tree.node(p).kind == NodeKind::Root) && tag == TYPES_TAG {
            return Ok(Frame::Types);
        }

        let Some(kind) = NodeKind::from_tag(tag.as_bytes()) else {
            if parent.is_none() {
                return Err(self.structural(&tag, "document element must be `root`"));
            }
            log::debug!("skipping unknown element `{tag}`");
            return Ok(Frame::Skipped);
        };
        if (kind == NodeKind::Root) != parent.is_none() {
            return Err(self.structural(&tag, "`root` must be the document element"));
        }

        let attrs = self.attributes(start, &tag)?;
        let mut node = SerializedNode::new(kind);
        node.type_id = attrs.parse(self, &tag, "type")?;
        node.value = attrs.get("value").map(String::from);
        node.reference_id = attrs.parse(self, &tag, "id")?;
        node.reference = attrs.parse(self, &tag, "ref")?;
        node.formatter_id = attrs.parse(self, &tag, "formatter")?;
        node.name = attrs.get("name").map(String::from);
        node.arg = attrs.parse(self, &tag, "arg")?;

        let index = self.tree.push(node);
        if let Some(parent) = parent {
            self.tree.append_child(parent, index);
        }
        Ok(Frame::Node(index))
    }

    fn attributes(&self, start: &BytesStart<'_>, tag: &str) -> Result<Attributes, DecodeError> {
        let mut pairs = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| self.structural(tag, e.to_string()))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let raw = core::str::from_utf8(&attr.value)
                .map_err(|e| self.structural(tag, e.to_string()))?;
            pairs.push((key, unescape(raw).into_owned()));
        }
        Ok(Attributes(pairs))
    }
}

/// Unescaped attributes of one element.
struct Attributes(Vec<(String, String)>);

impl Attributes {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    fn parse<T: FromStr>(
        &self,
        reader: &TreeReader,
        tag: &str,
        key: &'static str,
    ) -> Result<Option<T>, DecodeError> {
        self.get(key)
            .map(|text| {
                text.trim().parse().map_err(|_| {
                    reader.structural(tag, alloc::format!("attribute `{key}` is not a number: `{text}`"))
                })
            })
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_nodes_and_type_table() {
        let tree = NodeTree::from_xml(
            r#"<?xml version="1.0"?>
            <root type="1" id="1">
                <types>
                    <item key="1" value="demo.A, demo"/>
                    <item key="2" value="string, gx_core"/>
                </types>
                <member name="Label" type="2" value="x &amp; &lt;y&gt;" arg="0"/>
                <member name="Self" ref="1"/>
                <unknown><member name="Ignored"/></unknown>
            </root>"#,
        )
        .unwrap();

        assert_eq!(
            tree.types(),
            [
                (1, String::from("demo.A, demo")),
                (2, String::from("string, gx_core"))
            ]
        );
        let root = tree.node(tree.root().unwrap());
        assert_eq!(root.kind, NodeKind::Root);
        assert_eq!(root.reference_id, Some(1));
        assert_eq!(root.children.len(), 2);

        let label = tree.node(root.children[0]);
        assert_eq!(label.name.as_deref(), Some("Label"));
        assert_eq!(label.value.as_deref(), Some("x & <y>"));
        assert_eq!(label.arg, Some(0));
        assert_eq!(tree.node(root.children[1]).reference, Some(1));
    }

    #[test]
    fn rejects_foreign_document_element() {
        let err = NodeTree::from_xml("<document/>").unwrap_err();
        assert!(matches!(err, DecodeError::Structural { .. }));
        let err = NodeTree::from_xml("").unwrap_err();
        assert!(matches!(err, DecodeError::Structural { .. }));
    }

    #[test]
    fn rejects_bad_numbers() {
        let err = NodeTree::from_xml(r#"<root><member name="A" type="x"/></root>"#).unwrap_err();
        match err {
            DecodeError::Structural { path, .. } => assert_eq!(path, "root/member"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn rejects_malformed_xml() {
        let err = NodeTree::from_xml("<root><member></root>").unwrap_err();
        assert!(matches!(err, DecodeError::Xml(_)));
    }
}
