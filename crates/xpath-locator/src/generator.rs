//! Candidate generator with strategy pipeline orchestration

use crate::{
    element::LocatorElement,
    query::DocumentQuery,
    strategies::*,
    types::{Candidate, GeneratorOptions},
};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Runs every strategy against an element and collects ranked candidates.
///
/// The generator holds no per-selection state; calling it twice on an
/// unchanged document yields the same list.
pub struct CandidateGenerator<Q: DocumentQuery> {
    query: Q,
    options: GeneratorOptions,
}

impl<Q: DocumentQuery> CandidateGenerator<Q> {
    /// Create a generator with default options
    pub fn new(query: Q) -> Self {
        Self::with_options(query, GeneratorOptions::default())
    }

    pub fn with_options(query: Q, options: GeneratorOptions) -> Self {
        Self { query, options }
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    pub fn query(&self) -> &Q {
        &self.query
    }

    /// Ranked, deduplicated candidates for `element`.
    ///
    /// A failing strategy contributes nothing; the rest still run.
    pub fn generate_candidates<E: LocatorElement>(&self, element: &E) -> Vec<Candidate> {
        let ctx = StrategyContext::new(&self.query, &self.options);
        let mut candidates = Vec::new();

        for strategy in default_pipeline::<E>() {
            match strategy.propose(element, &ctx) {
                Ok(found) => {
                    debug!("Strategy {} proposed {} candidate(s)", strategy.name(), found.len());
                    candidates.extend(found);
                }
                Err(e) => {
                    warn!("Strategy {} skipped: {}", strategy.name(), e);
                }
            }
        }

        let candidates = dedup_by_xpath(candidates);
        info!(
            "Generated {} candidate(s) for <{}>",
            candidates.len(),
            element.xpath_tag()
        );
        candidates
    }
}

/// Strategies in priority order
pub fn default_pipeline<E: LocatorElement>() -> Vec<Box<dyn Strategy<E>>> {
    vec![
        Box::new(IdStrategy),
        Box::new(NameStrategy),
        Box::new(DataAttributeStrategy),
        Box::new(ClassStrategy),
        Box::new(TextStrategy),
        Box::new(AttributeStrategy),
        Box::new(PositionStrategy),
    ]
}

/// Drop later candidates whose xpath text already appeared
pub fn dedup_by_xpath(candidates: Vec<Candidate>) -> Vec<Candidate> {
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|candidate| seen.insert(candidate.xpath.clone()))
        .collect()
}
