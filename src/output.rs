//! Report rendering for the command line

use serde::{Deserialize, Serialize};
use xpath_locator::{Candidate, ElementSummary};

use crate::errors::PickerResult;

/// How reports are printed
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
    Yaml,
}

/// Everything shown for one selected element
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SelectionReport {
    /// `tag#id.class` label
    pub info: String,
    pub element: ElementSummary,
    pub candidates: Vec<Candidate>,
}

/// Result of evaluating an arbitrary expression
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EvalReport {
    pub xpath: String,
    pub count: usize,
    /// `tag#id.class` label of every matched element
    pub matches: Vec<String>,
}

/// Render `value` as JSON or YAML, `None` for [`OutputFormat::Human`]
pub fn render_structured<T: Serialize>(value: &T, format: OutputFormat) -> PickerResult<Option<String>> {
    let rendered = match format {
        OutputFormat::Json => Some(serde_json::to_string_pretty(value)?),
        OutputFormat::Yaml => Some(
            serde_yaml::to_string(value)
                .map_err(|e| crate::errors::PickerError::Serialize(e.to_string()))?,
        ),
        OutputFormat::Human => None,
    };
    Ok(rendered)
}

impl SelectionReport {
    pub fn to_human(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("Element: {}\n", self.info));
        if !self.element.text.is_empty() {
            out.push_str(&format!("Text: {}\n", self.element.text));
        }
        if self.candidates.is_empty() {
            out.push_str("No candidates\n");
            return out;
        }
        out.push_str("Candidates:\n");
        for (index, candidate) in self.candidates.iter().enumerate() {
            let marker = if candidate.verified { "" } else { " (unverified)" };
            out.push_str(&format!(
                "  {}. [{}] {}{}\n",
                index + 1,
                candidate.label(),
                candidate.xpath,
                marker
            ));
        }
        out
    }
}

impl EvalReport {
    pub fn to_human(&self) -> String {
        let mut out = format!("{} match(es) for {}\n", self.count, self.xpath);
        for label in &self.matches {
            out.push_str(&format!("  - {}\n", label));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xpath_locator::StrategyKind;

    fn report() -> SelectionReport {
        SelectionReport {
            info: "li".to_string(),
            element: ElementSummary {
                tag_name: "li".to_string(),
                id: None,
                class_name: None,
                text: String::new(),
                attributes: Vec::new(),
            },
            candidates: vec![Candidate::new(StrategyKind::Position, "//ul/li[2]")],
        }
    }

    #[test]
    fn test_human_marks_unverified() {
        let text = report().to_human();
        assert!(text.contains("1. [Position] //ul/li[2] (unverified)"));
    }

    #[test]
    fn test_human_has_no_structured_form() {
        assert!(render_structured(&report(), OutputFormat::Human)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_json_uses_type_labels() {
        let json = render_structured(&report(), OutputFormat::Json)
            .unwrap()
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["candidates"][0]["type"], "Position");
        assert_eq!(value["candidates"][0]["verified"], false);
    }

    #[test]
    fn test_format_parses_lowercase() {
        let format: OutputFormat = serde_yaml::from_str("yaml").unwrap();
        assert_eq!(format, OutputFormat::Yaml);
    }
}
