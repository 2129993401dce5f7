//! Error types for the locator system

use thiserror::Error;

/// Locator error enumeration
///
/// None of these escape [`crate::CandidateGenerator::generate_candidates`]:
/// the pipeline treats every failure as "strategy does not apply".
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LocatorError {
    /// The document could not evaluate an expression
    #[error("Query failed for '{expression}': {reason}")]
    QueryFailed { expression: String, reason: String },

    /// The expression was rejected before evaluation
    #[error("Invalid XPath expression: {0}")]
    InvalidExpression(String),
}

impl LocatorError {
    /// Build a query failure for an expression
    pub fn query_failed(expression: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::QueryFailed {
            expression: expression.into(),
            reason: reason.into(),
        }
    }

    /// The expression this error concerns, when known
    pub fn expression(&self) -> Option<&str> {
        match self {
            LocatorError::QueryFailed { expression, .. } => Some(expression),
            LocatorError::InvalidExpression(_) => None,
        }
    }
}
