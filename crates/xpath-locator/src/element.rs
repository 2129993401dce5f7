//! Read-only element accessor surface consumed by the locator

/// Raw class property as the host exposes it.
///
/// HTML elements hand out a plain string; SVG and other non-HTML elements
/// expose an ordered token collection instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassValue {
    /// Space separated class attribute text
    Text(String),

    /// Already tokenised class list
    Tokens(Vec<String>),
}

/// Normalised, whitespace-split class tokens in original order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassList {
    tokens: Vec<String>,
}

impl ClassList {
    /// All tokens in document order
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Tokens accepted by `keep`, original order preserved
    pub fn filtered<F>(&self, keep: F) -> Vec<&str>
    where
        F: Fn(&str) -> bool,
    {
        self.tokens
            .iter()
            .map(String::as_str)
            .filter(|token| keep(*token))
            .collect()
    }
}

impl From<ClassValue> for ClassList {
    fn from(value: ClassValue) -> Self {
        let tokens = match value {
            ClassValue::Text(text) => text.split_whitespace().map(str::to_string).collect(),
            ClassValue::Tokens(items) => items
                .iter()
                .flat_map(|item| item.split_whitespace())
                .map(str::to_string)
                .collect(),
        };
        Self { tokens }
    }
}

impl From<&str> for ClassList {
    fn from(value: &str) -> Self {
        ClassList::from(ClassValue::Text(value.to_string()))
    }
}

/// Element handle the strategies read from.
///
/// Implementations are expected to be cheap handles into a host document
/// (an index plus a borrow, typically). Nothing here mutates the document.
pub trait LocatorElement: Clone {
    /// Tag name in whatever case the host reports it
    fn tag_name(&self) -> String;

    /// Attribute value by name
    fn attribute(&self, name: &str) -> Option<String>;

    /// All attributes as `(name, value)` pairs
    fn attributes(&self) -> Vec<(String, String)>;

    /// Concatenated text of all descendant text nodes
    fn text_content(&self) -> String;

    /// Raw values of the text nodes that are direct children, in order.
    ///
    /// This is what a `text()` step compares against.
    fn own_text_nodes(&self) -> Vec<String>;

    /// Parent element, `None` for the root element
    fn parent(&self) -> Option<Self>;

    /// Element children in document order
    fn children(&self) -> Vec<Self>;

    fn previous_sibling(&self) -> Option<Self>;

    fn next_sibling(&self) -> Option<Self>;

    /// Node identity, not structural equality
    fn is_same_node(&self, other: &Self) -> bool;

    fn id(&self) -> Option<String> {
        self.attribute("id")
    }

    /// Raw class property; hosts with token-list classes override this
    fn class_value(&self) -> Option<ClassValue> {
        self.attribute("class").map(ClassValue::Text)
    }

    /// Class tokens normalised from either [`ClassValue`] shape
    fn class_list(&self) -> ClassList {
        self.class_value().map(ClassList::from).unwrap_or_default()
    }

    /// Lowercased tag used in generated expressions
    fn xpath_tag(&self) -> String {
        self.tag_name().to_ascii_lowercase()
    }

    /// Non-empty `data-*` attributes in attribute order
    fn data_attributes(&self) -> Vec<(String, String)> {
        self.attributes()
            .into_iter()
            .filter(|(name, value)| name.starts_with("data-") && !value.is_empty())
            .collect()
    }

    /// Whether some direct text child equals `text` exactly
    fn has_own_text(&self, text: &str) -> bool {
        self.own_text_nodes().iter().any(|own| own == text)
    }

    /// Children of the parent sharing this element's tag, self included
    fn same_tag_siblings(&self) -> Vec<Self> {
        let Some(parent) = self.parent() else {
            return Vec::new();
        };
        let tag = self.xpath_tag();
        parent
            .children()
            .into_iter()
            .filter(|child| child.xpath_tag() == tag)
            .collect()
    }

    /// 1-based index among [`Self::same_tag_siblings`]
    fn same_tag_position(&self) -> Option<usize> {
        self.same_tag_siblings()
            .iter()
            .position(|sibling| sibling.is_same_node(self))
            .map(|index| index + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_list_from_text_trims_and_splits() {
        let list = ClassList::from(ClassValue::Text("  btn   btn-primary\tlarge ".to_string()));
        assert_eq!(list.tokens(), &["btn", "btn-primary", "large"]);
    }

    #[test]
    fn test_class_list_from_tokens_keeps_order() {
        let list = ClassList::from(ClassValue::Tokens(vec![
            "icon".to_string(),
            " chart-line ".to_string(),
            "".to_string(),
        ]));
        assert_eq!(list.tokens(), &["icon", "chart-line"]);
    }

    #[test]
    fn test_empty_class_text_is_empty_list() {
        assert!(ClassList::from("   ").is_empty());
    }

    #[test]
    fn test_filtered_preserves_order() {
        let list = ClassList::from("a active b");
        assert_eq!(list.filtered(|c| c != "active"), vec!["a", "b"]);
    }
}
