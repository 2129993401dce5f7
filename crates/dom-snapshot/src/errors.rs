use thiserror::Error;
use xpath_locator::LocatorError;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomError {
    #[error("markup error at byte {position}: {message}")]
    Markup { position: usize, message: String },
    #[error("xpath syntax error at {position}: {message}")]
    XPathSyntax { position: usize, message: String },
    #[error("unsupported xpath: {0}")]
    UnsupportedXPath(String),
    #[error("unknown node: {0}")]
    UnknownNode(usize),
}

impl DomError {
    pub fn markup(position: usize, message: impl Into<String>) -> Self {
        Self::Markup {
            position,
            message: message.into(),
        }
    }

    pub fn syntax(position: usize, message: impl Into<String>) -> Self {
        Self::XPathSyntax {
            position,
            message: message.into(),
        }
    }

    /// Wrap as a locator query failure for `expression`
    pub fn into_locator(self, expression: &str) -> LocatorError {
        match self {
            DomError::XPathSyntax { .. } | DomError::UnsupportedXPath(_) => {
                LocatorError::InvalidExpression(format!("{}: {}", expression, self))
            }
            other => LocatorError::query_failed(expression, other.to_string()),
        }
    }
}
