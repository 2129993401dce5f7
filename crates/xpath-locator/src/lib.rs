//! Ranked XPath candidate generation
//!
//! Given an element of a live document, this crate derives several XPath
//! expressions that address it, ordered by how stable they are expected to be:
//! - ID and `name` lookups (most stable)
//! - `data-*` attribute conjunctions
//! - Class combinations
//! - Text content
//! - Individual well-known attributes
//! - Sibling position (least stable, unverified)
//!
//! The crate owns no DOM. Hosts plug in through [`LocatorElement`] and
//! [`DocumentQuery`].

pub mod element;
pub mod errors;
pub mod escape;
pub mod generator;
pub mod paths;
pub mod query;
pub mod strategies;
pub mod summary;
pub mod types;

pub use element::*;
pub use errors::*;
pub use escape::*;
pub use generator::*;
pub use paths::*;
pub use query::*;
pub use strategies::*;
pub use summary::*;
pub use types::*;
