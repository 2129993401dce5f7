//! Locator bindings for snapshot documents

use std::fmt;

use tracing::trace;
use xpath_locator::{ClassValue, DocumentQuery, LocatorElement, LocatorError};

use crate::model::{Document, ElementData, Namespace, NodeId};

/// Borrowed handle to one element of a [`Document`].
#[derive(Clone, Copy)]
pub struct ElementRef<'d> {
    doc: &'d Document,
    id: NodeId,
    data: &'d ElementData,
}

impl<'d> ElementRef<'d> {
    pub fn node_id(&self) -> NodeId {
        self.id
    }

    pub fn document(&self) -> &'d Document {
        self.doc
    }

    pub fn data(&self) -> &'d ElementData {
        self.data
    }

    fn wrap(&self, id: NodeId) -> Option<ElementRef<'d>> {
        self.doc.element(id)
    }

    fn sibling_elements(&self) -> Vec<NodeId> {
        match self.doc.parent(self.id) {
            Some(parent) => self.doc.element_children(parent),
            None => Vec::new(),
        }
    }
}

impl fmt::Debug for ElementRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>#{}", self.data().tag, self.id.index())
    }
}

impl PartialEq for ElementRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.doc, other.doc) && self.id == other.id
    }
}

impl Eq for ElementRef<'_> {}

impl<'d> LocatorElement for ElementRef<'d> {
    fn tag_name(&self) -> String {
        self.data().tag.clone()
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.data().attribute(name).map(str::to_string)
    }

    fn attributes(&self) -> Vec<(String, String)> {
        self.data().attributes.clone()
    }

    fn text_content(&self) -> String {
        self.doc.text_content(self.id)
    }

    fn own_text_nodes(&self) -> Vec<String> {
        self.doc.own_text_nodes(self.id)
    }

    fn parent(&self) -> Option<Self> {
        self.doc
            .parent(self.id)
            .and_then(|parent| self.wrap(parent))
    }

    fn children(&self) -> Vec<Self> {
        self.doc
            .element_children(self.id)
            .into_iter()
            .filter_map(|child| self.wrap(child))
            .collect()
    }

    fn previous_sibling(&self) -> Option<Self> {
        let siblings = self.sibling_elements();
        let index = siblings.iter().position(|id| *id == self.id)?;
        self.wrap(*siblings.get(index.checked_sub(1)?)?)
    }

    fn next_sibling(&self) -> Option<Self> {
        let siblings = self.sibling_elements();
        let index = siblings.iter().position(|id| *id == self.id)?;
        self.wrap(*siblings.get(index + 1)?)
    }

    fn is_same_node(&self, other: &Self) -> bool {
        self == other
    }

    fn class_value(&self) -> Option<ClassValue> {
        let data = self.data();
        let raw = data.attribute("class")?;
        match data.namespace {
            Namespace::Html => Some(ClassValue::Text(raw.to_string())),
            // SVG hosts expose classes as a token list, not a string.
            Namespace::Svg => Some(ClassValue::Tokens(
                raw.split(' ').map(str::to_string).collect(),
            )),
        }
    }
}

impl Document {
    /// Element handle for `id`, `None` for text and document nodes
    pub fn element(&self, id: NodeId) -> Option<ElementRef<'_>> {
        let data = self.element_data(id)?;
        Some(ElementRef { doc: self, id, data })
    }

    /// First element with this `id` attribute
    pub fn element_by_id(&self, id: &str) -> Option<ElementRef<'_>> {
        self.elements_by_id(id)
            .first()
            .and_then(|node| self.element(*node))
    }

    /// Element handles in document order
    pub fn element_refs(&self) -> impl Iterator<Item = ElementRef<'_>> + '_ {
        self.elements().filter_map(move |id| self.element(id))
    }
}

impl DocumentQuery for Document {
    fn count_matches(&self, expression: &str) -> Result<usize, LocatorError> {
        let count = self
            .select(expression)
            .map_err(|e| e.into_locator(expression))?
            .len();
        trace!("count({}) = {}", expression, count);
        Ok(count)
    }

    fn count_by_id(&self, id: &str) -> Result<usize, LocatorError> {
        Ok(self.elements_by_id(id).len())
    }
}
