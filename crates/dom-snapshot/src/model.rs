use std::collections::HashMap;

use crate::errors::DomError;

/// Arena index of a node. Indices follow document (pre-)order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Namespace {
    Html,
    Svg,
}

#[derive(Clone, Debug)]
pub struct ElementData {
    /// Lowercased tag name
    pub tag: String,
    /// Attributes in source order
    pub attributes: Vec<(String, String)>,
    pub namespace: Namespace,
}

impl ElementData {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Clone, Debug)]
pub enum NodeKind {
    Document,
    Element(ElementData),
    Text(String),
}

#[derive(Clone, Debug)]
pub struct Node {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

impl Node {
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.kind {
            NodeKind::Element(data) => Some(data),
            _ => None,
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self.kind, NodeKind::Element(_))
    }
}

/// Immutable document tree captured from a page or built in code.
#[derive(Clone, Debug)]
pub struct Document {
    nodes: Vec<Node>,
    id_index: HashMap<String, Vec<NodeId>>,
}

impl Document {
    pub(crate) fn from_nodes(nodes: Vec<Node>) -> Self {
        let mut id_index: HashMap<String, Vec<NodeId>> = HashMap::new();
        for (index, node) in nodes.iter().enumerate() {
            if let Some(id) = node.as_element().and_then(|data| data.attribute("id")) {
                if !id.is_empty() {
                    id_index.entry(id.to_string()).or_default().push(NodeId(index));
                }
            }
        }
        Self { nodes, id_index }
    }

    /// The document node itself
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// First element child of the document node (`<html>` for pages)
    pub fn document_element(&self) -> Option<NodeId> {
        self.element_children(self.root()).into_iter().next()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn try_node(&self, id: NodeId) -> Result<&Node, DomError> {
        self.node(id).ok_or(DomError::UnknownNode(id.0))
    }

    pub fn element_data(&self, id: NodeId) -> Option<&ElementData> {
        self.node(id).and_then(Node::as_element)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn element_children(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|child| self.nodes[child.0].is_element())
            .collect()
    }

    /// `id` followed by all its descendants, document order
    pub fn descendants_or_self(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        out
    }

    /// Every element node, document order
    pub fn elements(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.is_element())
            .map(|(index, _)| NodeId(index))
    }

    /// Elements whose `id` attribute equals `id`
    pub fn elements_by_id(&self, id: &str) -> &[NodeId] {
        self.id_index.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Concatenated descendant text
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        for node in self.descendants_or_self(id) {
            if let NodeKind::Text(text) = &self.nodes[node.0].kind {
                out.push_str(text);
            }
        }
        out
    }

    /// Values of the text nodes directly under `id`
    pub fn own_text_nodes(&self, id: NodeId) -> Vec<String> {
        self.children(id)
            .iter()
            .filter_map(|child| match &self.nodes[child.0].kind {
                NodeKind::Text(text) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    /// XPath string-value: the text for text nodes, descendant text otherwise
    pub fn string_value(&self, id: NodeId) -> String {
        match self.node(id).map(|n| &n.kind) {
            Some(NodeKind::Text(text)) => text.clone(),
            Some(_) => self.text_content(id),
            None => String::new(),
        }
    }

    /// Nearest ancestor-or-self element satisfying `pred`
    pub fn closest<F>(&self, id: NodeId, pred: F) -> Option<NodeId>
    where
        F: Fn(&ElementData) -> bool,
    {
        let mut current = Some(id);
        while let Some(node) = current {
            if self.element_data(node).map(&pred).unwrap_or(false) {
                return Some(node);
            }
            current = self.parent(node);
        }
        None
    }
}
