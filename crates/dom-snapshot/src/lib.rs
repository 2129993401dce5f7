//! In-memory DOM snapshots for the XPath picker
//!
//! A [`Document`] is an immutable arena of element and text nodes, loaded
//! from well-formed markup or assembled with [`DocumentBuilder`]. It answers
//! XPath queries through a small 1.0 subset evaluator and plugs into
//! `xpath-locator` via [`ElementRef`] and the `DocumentQuery` impl.

pub mod builder;
pub mod element;
pub mod errors;
pub mod markup;
pub mod model;
pub mod xpath;

pub use builder::DocumentBuilder;
pub use element::ElementRef;
pub use errors::DomError;
pub use model::{Document, ElementData, Namespace, Node, NodeId, NodeKind};
pub use xpath::{Value, XPathExpr};
