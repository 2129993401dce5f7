//! Programmatic document construction
//!
//! ```
//! use dom_snapshot::DocumentBuilder;
//!
//! let mut builder = DocumentBuilder::new();
//! builder
//!     .open("ul", &[])
//!     .open("li", &[])
//!     .text("one")
//!     .close()
//!     .open("li", &[])
//!     .text("two")
//!     .close()
//!     .close();
//! let doc = builder.finish().unwrap();
//! assert_eq!(doc.select("//ul/li[2]").unwrap().len(), 1);
//! ```

use tracing::warn;

use crate::errors::DomError;
use crate::model::{Document, ElementData, Namespace, Node, NodeId, NodeKind};

pub struct DocumentBuilder {
    nodes: Vec<Node>,
    stack: Vec<NodeId>,
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                kind: NodeKind::Document,
                parent: None,
                children: Vec::new(),
            }],
            stack: vec![NodeId(0)],
        }
    }

    /// Open elements, excluding the document node
    pub fn depth(&self) -> usize {
        self.stack.len() - 1
    }

    /// Start an element; following calls add to it until [`Self::close`]
    pub fn open(&mut self, tag: &str, attributes: &[(&str, &str)]) -> &mut Self {
        let owned = attributes
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        self.open_owned(tag, owned)
    }

    pub fn open_owned(&mut self, tag: &str, attributes: Vec<(String, String)>) -> &mut Self {
        let parent = self.current();
        let tag = tag.to_ascii_lowercase();
        let namespace = if tag == "svg" || self.in_svg(parent) {
            Namespace::Svg
        } else {
            Namespace::Html
        };
        let id = self.push(
            parent,
            NodeKind::Element(ElementData {
                tag,
                attributes,
                namespace,
            }),
        );
        self.stack.push(id);
        self
    }

    /// Element with no children
    pub fn leaf(&mut self, tag: &str, attributes: &[(&str, &str)]) -> &mut Self {
        self.open(tag, attributes).close()
    }

    pub fn text(&mut self, text: &str) -> &mut Self {
        if self.depth() == 0 {
            // Text outside the root element has no place in the tree.
            return self;
        }
        let parent = self.current();
        self.push(parent, NodeKind::Text(text.to_string()));
        self
    }

    /// Close the innermost open element; a no-op at document level
    pub fn close(&mut self) -> &mut Self {
        if self.depth() == 0 {
            warn!("close() with no open element ignored");
        } else {
            self.stack.pop();
        }
        self
    }

    pub fn finish(self) -> Result<Document, DomError> {
        if self.depth() > 0 {
            let tag = self
                .stack
                .last()
                .and_then(|id| self.nodes[id.0].as_element())
                .map(|data| data.tag.clone())
                .unwrap_or_default();
            return Err(DomError::markup(0, format!("unclosed element <{}>", tag)));
        }
        Ok(Document::from_nodes(self.nodes))
    }

    fn current(&self) -> NodeId {
        *self.stack.last().unwrap_or(&NodeId(0))
    }

    fn in_svg(&self, id: NodeId) -> bool {
        self.nodes[id.0]
            .as_element()
            .map(|data| data.namespace == Namespace::Svg)
            .unwrap_or(false)
    }

    fn push(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }
}
