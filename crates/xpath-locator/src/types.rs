//! Core types for the locator system

use serde::{Deserialize, Serialize};
use std::fmt;

/// Attribute names probed by the single-attribute strategy, in order.
pub const DEFAULT_ATTRIBUTE_NAMES: [&str; 8] = [
    "type",
    "value",
    "href",
    "src",
    "alt",
    "title",
    "placeholder",
    "role",
];

/// Class prefix used by the picker's own injected UI.
pub const DEFAULT_RESERVED_CLASS_PREFIX: &str = "xpath-selector";

/// Class names that only reflect transient interaction state.
pub const DEFAULT_TRANSIENT_CLASSES: [&str; 4] = ["active", "selected", "hover", "focus"];

/// Text at or above this many characters is not used as a locator.
pub const DEFAULT_TEXT_MAX_LEN: usize = 100;

/// Locator strategy enumeration
///
/// Declaration order is priority order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum StrategyKind {
    /// `//*[@id="..."]`
    Id,

    /// `//*[@name="..."]`
    Name,

    /// Conjunction of every non-empty `data-*` attribute
    DataAttributes,

    /// Exact match on the filtered class list
    Class,

    /// `contains(@class, ...)` on the first stable class, unverified
    ContainsClass,

    /// Exact direct text match
    TextContent,

    /// A single well-known attribute
    Attribute(String),

    /// Same-tag sibling index under the parent, unverified
    Position,
}

impl StrategyKind {
    /// Human-facing label, also the serialized form
    pub fn label(&self) -> String {
        match self {
            StrategyKind::Id => "ID".to_string(),
            StrategyKind::Name => "Name".to_string(),
            StrategyKind::DataAttributes => "Data Attributes".to_string(),
            StrategyKind::Class => "Class".to_string(),
            StrategyKind::ContainsClass => "Contains Class".to_string(),
            StrategyKind::TextContent => "Text Content".to_string(),
            StrategyKind::Attribute(name) => format!("Attribute ({})", name),
            StrategyKind::Position => "Position".to_string(),
        }
    }

    /// Rationale shown next to a candidate
    pub fn description(&self) -> String {
        match self {
            StrategyKind::Id => "Based on ID (most stable)".to_string(),
            StrategyKind::Name => "Based on the name attribute".to_string(),
            StrategyKind::DataAttributes => "Based on data attributes".to_string(),
            StrategyKind::Class => "Based on class (may change)".to_string(),
            StrategyKind::ContainsClass => {
                "Contains the primary class (more flexible)".to_string()
            }
            StrategyKind::TextContent => "Based on text content".to_string(),
            StrategyKind::Attribute(name) => format!("Based on the {} attribute", name),
            StrategyKind::Position => "Based on position (may change)".to_string(),
        }
    }

    /// Whether candidates of this kind pass a uniqueness query before emission
    pub fn is_verified(&self) -> bool {
        !matches!(self, StrategyKind::ContainsClass | StrategyKind::Position)
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl From<StrategyKind> for String {
    fn from(kind: StrategyKind) -> Self {
        kind.label()
    }
}

impl TryFrom<String> for StrategyKind {
    type Error = String;

    fn try_from(label: String) -> Result<Self, Self::Error> {
        let kind = match label.as_str() {
            "ID" => StrategyKind::Id,
            "Name" => StrategyKind::Name,
            "Data Attributes" => StrategyKind::DataAttributes,
            "Class" => StrategyKind::Class,
            "Contains Class" => StrategyKind::ContainsClass,
            "Text Content" => StrategyKind::TextContent,
            "Position" => StrategyKind::Position,
            other => {
                let name = other
                    .strip_prefix("Attribute (")
                    .and_then(|rest| rest.strip_suffix(')'))
                    .ok_or_else(|| format!("unknown strategy label: {}", other))?;
                StrategyKind::Attribute(name.to_string())
            }
        };
        Ok(kind)
    }
}

/// One proposed XPath for the target element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Strategy that produced this candidate
    #[serde(rename = "type")]
    pub kind: StrategyKind,

    /// XPath 1.0 expression
    pub xpath: String,

    /// Human readable rationale
    pub description: String,

    /// Whether the expression was checked to match exactly one element
    pub verified: bool,
}

impl Candidate {
    /// Create a candidate with the kind's default description
    pub fn new(kind: StrategyKind, xpath: impl Into<String>) -> Self {
        let description = kind.description();
        let verified = kind.is_verified();
        Self {
            kind,
            xpath: xpath.into(),
            description,
            verified,
        }
    }

    /// Serialized strategy label (`"ID"`, `"Attribute (title)"`, ...)
    pub fn label(&self) -> String {
        self.kind.label()
    }
}

/// Tunables for candidate generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorOptions {
    /// Classes starting with this prefix belong to the picker UI
    pub reserved_class_prefix: String,

    /// Exact class names dropped as interaction state
    pub transient_classes: Vec<String>,

    /// Exclusive upper bound on trimmed text length
    pub text_max_len: usize,

    /// Attributes tried one by one, in order
    pub attribute_names: Vec<String>,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            reserved_class_prefix: DEFAULT_RESERVED_CLASS_PREFIX.to_string(),
            transient_classes: DEFAULT_TRANSIENT_CLASSES
                .iter()
                .map(|c| c.to_string())
                .collect(),
            text_max_len: DEFAULT_TEXT_MAX_LEN,
            attribute_names: DEFAULT_ATTRIBUTE_NAMES
                .iter()
                .map(|a| a.to_string())
                .collect(),
        }
    }
}

impl GeneratorOptions {
    /// Whether the picker's own UI owns this class
    pub fn is_reserved_class(&self, class: &str) -> bool {
        !self.reserved_class_prefix.is_empty() && class.starts_with(&self.reserved_class_prefix)
    }

    /// Classes kept for class-based locators
    pub fn is_stable_class(&self, class: &str) -> bool {
        !class.is_empty()
            && !self.is_reserved_class(class)
            && !self.transient_classes.iter().any(|t| t == class)
    }
}
