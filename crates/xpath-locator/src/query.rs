//! Uniqueness query capability supplied by the host document

use crate::{errors::LocatorError, escape::quoted};

/// Counts matches of an XPath expression against the host document.
///
/// Evaluation may walk the whole tree; callers issue a bounded number of
/// queries per selection.
pub trait DocumentQuery {
    /// Number of nodes `expression` selects from the document root
    fn count_matches(&self, expression: &str) -> Result<usize, LocatorError>;

    /// Number of elements carrying this id
    fn count_by_id(&self, id: &str) -> Result<usize, LocatorError> {
        self.count_matches(&format!("//*[@id={}]", quoted(id)))
    }

    /// Number of elements whose `name` attribute equals `name`
    fn count_by_name(&self, name: &str) -> Result<usize, LocatorError> {
        self.count_matches(&format!("//*[@name={}]", quoted(name)))
    }
}

impl<Q: DocumentQuery + ?Sized> DocumentQuery for &Q {
    fn count_matches(&self, expression: &str) -> Result<usize, LocatorError> {
        (**self).count_matches(expression)
    }

    fn count_by_id(&self, id: &str) -> Result<usize, LocatorError> {
        (**self).count_by_id(id)
    }

    fn count_by_name(&self, name: &str) -> Result<usize, LocatorError> {
        (**self).count_by_name(name)
    }
}

/// Whether `expression` selects exactly one node
pub fn is_unique<Q: DocumentQuery + ?Sized>(
    query: &Q,
    expression: &str,
) -> Result<bool, LocatorError> {
    Ok(query.count_matches(expression)? == 1)
}
