//! XPath 1.0 subset over [`Document`](crate::Document)
//!
//! Supported: absolute location paths (`/`, `//`), name tests and `*`,
//! `text()`, `.` and `..`, predicates built from `@attr`, `@*`, relative
//! paths, string and number literals, `=` `!=` `<` `<=` `>` `>=`, `and`,
//! `or`, parentheses, and the functions `contains`, `starts-with`,
//! `normalize-space`, `string-length`, `count`, `not`, `position`, `last`.
//! A numeric predicate selects by position among the step's matches under
//! each context node.
//!
//! String literals decode `&quot;` to `"`, so expressions produced by
//! [`xpath_locator::escape_xpath_value`] match the values they came from.

mod eval;
mod parser;

pub use eval::Value;

use crate::errors::DomError;

#[derive(Clone, Debug, PartialEq)]
pub enum Axis {
    Child,
    /// Child step reached through `//`
    Descendant,
    SelfNode,
    Parent,
}

#[derive(Clone, Debug, PartialEq)]
pub enum NodeTest {
    /// `*`: any element
    AnyElement,
    /// Element by tag name, ASCII case-insensitive
    Name(String),
    /// `text()`
    Text,
    /// `node()`, also implied by `.` and `..`
    AnyNode,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Step {
    pub axis: Axis,
    pub test: NodeTest,
    pub predicates: Vec<Expr>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Function {
    Contains,
    StartsWith,
    NormalizeSpace,
    StringLength,
    Count,
    Not,
    Position,
    Last,
}

impl Function {
    pub(crate) fn lookup(name: &str) -> Option<Self> {
        let function = match name {
            "contains" => Function::Contains,
            "starts-with" => Function::StartsWith,
            "normalize-space" => Function::NormalizeSpace,
            "string-length" => Function::StringLength,
            "count" => Function::Count,
            "not" => Function::Not,
            "position" => Function::Position,
            "last" => Function::Last,
            _ => return None,
        };
        Some(function)
    }

    /// Accepted argument counts, inclusive
    pub(crate) fn arity(self) -> (usize, usize) {
        match self {
            Function::Contains | Function::StartsWith => (2, 2),
            Function::NormalizeSpace | Function::StringLength => (0, 1),
            Function::Count | Function::Not => (1, 1),
            Function::Position | Function::Last => (0, 0),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Or(Box<Expr>, Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Compare(CmpOp, Box<Expr>, Box<Expr>),
    /// `@name`, or `@*` when `None`
    Attribute(Option<String>),
    /// Relative location path evaluated from the context node
    Path(Vec<Step>),
    Literal(String),
    Number(f64),
    Call(Function, Vec<Expr>),
}

/// Parsed absolute location path
#[derive(Clone, Debug, PartialEq)]
pub struct XPathExpr {
    source: String,
    steps: Vec<Step>,
}

impl XPathExpr {
    pub fn parse(source: &str) -> Result<Self, DomError> {
        let steps = parser::parse_location_path(source)?;
        Ok(Self {
            source: source.to_string(),
            steps,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }
}
