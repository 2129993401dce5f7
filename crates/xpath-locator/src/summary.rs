//! Serializable snapshot of a selected element

use crate::element::{ClassValue, LocatorElement};
use serde::{Deserialize, Serialize};

/// Maximum characters of text kept in a summary
pub const SUMMARY_TEXT_LEN: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeEntry {
    pub name: String,
    pub value: String,
}

/// Element details shown alongside its candidates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementSummary {
    pub tag_name: String,
    pub id: Option<String>,
    /// Class text, token lists joined with single spaces
    pub class_name: Option<String>,
    /// Trimmed text content, truncated to [`SUMMARY_TEXT_LEN`] characters
    pub text: String,
    pub attributes: Vec<AttributeEntry>,
}

impl ElementSummary {
    pub fn capture<E: LocatorElement>(element: &E) -> Self {
        let class_name = element.class_value().map(|value| match value {
            ClassValue::Text(text) => text,
            ClassValue::Tokens(tokens) => tokens.join(" "),
        });
        let text = element
            .text_content()
            .trim()
            .chars()
            .take(SUMMARY_TEXT_LEN)
            .collect();

        Self {
            tag_name: element.xpath_tag(),
            id: element.id().filter(|id| !id.is_empty()),
            class_name,
            text,
            attributes: element
                .attributes()
                .into_iter()
                .map(|(name, value)| AttributeEntry { name, value })
                .collect(),
        }
    }
}
