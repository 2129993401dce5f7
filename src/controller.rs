//! Interactive selection state machine
//!
//! Mirrors a picker session on a page: activation starts hover highlighting,
//! a click selects an element and inspects it, arrow-key navigation walks the
//! tree from the current selection, and escape returns to idle. Candidate
//! generation itself stays stateless and runs afresh on every selection.

use dom_snapshot::{Document, ElementRef, NodeId};
use thiserror::Error;
use tracing::{debug, info};
use xpath_locator::{
    absolute_xpath, element_info, Candidate, CandidateGenerator, ElementSummary,
    GeneratorOptions, LocatorElement,
};

/// Id of the picker's own panel; nothing inside it is selectable
pub const PANEL_ID: &str = "xpath-extractor-panel";

/// Id prefix shared by every picker-owned element
pub const PICKER_ID_PREFIX: &str = "xpath-";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PickerState {
    Idle,
    /// Highlighting follows the pointer, nothing selected yet
    Selecting,
    /// An element is selected and its candidates are available
    Inspecting,
}

/// Arrow-key navigation target
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Direction {
    Parent,
    FirstChild,
    PreviousSibling,
    NextSibling,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ControllerError {
    #[error("selection mode is not active")]
    Inactive,

    #[error("no selected or highlighted element to navigate from")]
    NothingToNavigateFrom,

    #[error("no {0:?} element to navigate to")]
    NoDestination(Direction),

    #[error("candidate index {index} out of range ({len} candidates)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("node {0} is not an element")]
    NotAnElement(usize),
}

/// The inspected element with everything derived from it
#[derive(Clone, Debug)]
pub struct Selection {
    pub node: NodeId,
    pub info: String,
    pub summary: ElementSummary,
    pub candidates: Vec<Candidate>,
    pub absolute_xpath: String,
    /// Index into `candidates` picked by [`SelectionController::choose`]
    pub chosen: Option<usize>,
}

pub struct SelectionController<'d> {
    document: &'d Document,
    generator: CandidateGenerator<&'d Document>,
    state: PickerState,
    highlighted: Option<NodeId>,
    selection: Option<Selection>,
}

impl<'d> SelectionController<'d> {
    pub fn new(document: &'d Document) -> Self {
        Self::with_options(document, GeneratorOptions::default())
    }

    pub fn with_options(document: &'d Document, options: GeneratorOptions) -> Self {
        Self {
            document,
            generator: CandidateGenerator::with_options(document, options),
            state: PickerState::Idle,
            highlighted: None,
            selection: None,
        }
    }

    pub fn state(&self) -> PickerState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state != PickerState::Idle
    }

    pub fn highlighted(&self) -> Option<NodeId> {
        self.highlighted
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// Enter selection mode; no-op when already active
    pub fn activate(&mut self) {
        if self.state == PickerState::Idle {
            info!("Selection mode activated");
            self.state = PickerState::Selecting;
        }
    }

    /// Leave selection mode from any state, dropping highlight and selection
    pub fn deactivate(&mut self) {
        if self.state != PickerState::Idle {
            info!("Selection mode deactivated");
        }
        self.state = PickerState::Idle;
        self.highlighted = None;
        self.selection = None;
    }

    /// Pointer moved over `node`. Returns whether the highlight moved.
    pub fn hover(&mut self, node: NodeId) -> bool {
        if !self.is_active() {
            return false;
        }
        match self.document.element(node) {
            Some(element) if !is_picker_owned(&element) => {
                self.highlighted = Some(node);
                true
            }
            _ => false,
        }
    }

    /// Click on `node`. Returns `false` when the click landed on picker UI
    /// and was ignored.
    pub fn select(&mut self, node: NodeId) -> Result<bool, ControllerError> {
        if !self.is_active() {
            return Err(ControllerError::Inactive);
        }
        let document = self.document;
        let element = document
            .element(node)
            .ok_or(ControllerError::NotAnElement(node.index()))?;
        if is_picker_owned(&element) {
            debug!("ignoring click on picker element {:?}", element);
            return Ok(false);
        }

        let candidates = self.generator.generate_candidates(&element);
        let selection = Selection {
            node,
            info: element_info(&element, self.generator.options()),
            summary: ElementSummary::capture(&element),
            absolute_xpath: absolute_xpath(&element),
            candidates,
            chosen: None,
        };
        info!(
            "Selected {} with {} candidate(s)",
            selection.info,
            selection.candidates.len()
        );
        self.selection = Some(selection);
        self.state = PickerState::Inspecting;
        Ok(true)
    }

    /// Move the selection one step through the tree and select the
    /// destination. Starts from the selection, else the highlight.
    pub fn navigate(&mut self, direction: Direction) -> Result<NodeId, ControllerError> {
        if !self.is_active() {
            return Err(ControllerError::Inactive);
        }
        let start = self
            .selection
            .as_ref()
            .map(|s| s.node)
            .or(self.highlighted)
            .ok_or(ControllerError::NothingToNavigateFrom)?;
        let document = self.document;
        let element = document
            .element(start)
            .ok_or(ControllerError::NotAnElement(start.index()))?;

        let destination = match direction {
            Direction::Parent => element
                .parent()
                .filter(|parent| !matches!(parent.xpath_tag().as_str(), "body" | "html")),
            Direction::FirstChild => element
                .children()
                .into_iter()
                .find(|child| !is_picker_owned(child)),
            Direction::PreviousSibling => walk_siblings(element, |e| e.previous_sibling()),
            Direction::NextSibling => walk_siblings(element, |e| e.next_sibling()),
        }
        .ok_or(ControllerError::NoDestination(direction))?;

        let node = destination.node_id();
        self.highlighted = Some(node);
        self.select(node)?;
        Ok(node)
    }

    /// Record candidate `index` of the current selection as the user's pick
    pub fn choose(&mut self, index: usize) -> Result<&Candidate, ControllerError> {
        let selection = self
            .selection
            .as_mut()
            .ok_or(ControllerError::IndexOutOfRange { index, len: 0 })?;
        let len = selection.candidates.len();
        if index >= len {
            return Err(ControllerError::IndexOutOfRange { index, len });
        }
        selection.chosen = Some(index);
        Ok(&selection.candidates[index])
    }
}

fn walk_siblings<'d, F>(start: ElementRef<'d>, step: F) -> Option<ElementRef<'d>>
where
    F: Fn(&ElementRef<'d>) -> Option<ElementRef<'d>>,
{
    let mut current = step(&start);
    while let Some(sibling) = current {
        if !is_picker_owned(&sibling) {
            return Some(sibling);
        }
        current = step(&sibling);
    }
    None
}

/// Elements the picker itself injects into the page
pub fn is_picker_owned(element: &ElementRef<'_>) -> bool {
    if element
        .id()
        .map(|id| id.starts_with(PICKER_ID_PREFIX))
        .unwrap_or(false)
    {
        return true;
    }
    element
        .document()
        .closest(element.node_id(), |data| data.attribute("id") == Some(PANEL_ID))
        .is_some()
}
