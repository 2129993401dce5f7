//! Single-expression path builders
//!
//! Where the generator returns every candidate, these produce one expression:
//! the preferred locator, a readable structural path, or the absolute path.

use crate::{
    element::LocatorElement,
    escape::quoted,
    generator::CandidateGenerator,
    query::{is_unique, DocumentQuery},
    strategies::{
        attribute_xpath, data_attributes_xpath, exact_class_xpath, id_xpath, name_xpath,
        stable_classes, text_xpath, usable_text,
    },
    types::GeneratorOptions,
};
use tracing::debug;

/// Attributes tried by [`best_xpath`], in order (the generator list minus `role`)
const BEST_ATTRIBUTE_NAMES: [&str; 7] = [
    "type",
    "value",
    "href",
    "src",
    "alt",
    "title",
    "placeholder",
];

/// Tags whose text is trusted by [`best_xpath`]
const TEXT_LOCATOR_TAGS: [&str; 4] = ["a", "button", "span", "div"];

/// Text length bound used by [`best_xpath`]
const BEST_TEXT_MAX_LEN: usize = 50;

/// Class prefixes generated by frameworks and scripts, skipped by smart paths
const FRAMEWORK_CLASS_PREFIXES: [&str; 2] = ["ng-", "js-"];

/// The single preferred expression for `element`.
///
/// Tries, in order, a unique id, name, data-attribute conjunction, exact
/// class list, attribute and (for links, buttons and generic containers)
/// short text. Falls back to [`smart_path`], which is always available.
pub fn best_xpath<E, Q>(element: &E, query: &Q, options: &GeneratorOptions) -> String
where
    E: LocatorElement,
    Q: DocumentQuery + ?Sized,
{
    let unique = |expression: &str| match is_unique(query, expression) {
        Ok(found) => found,
        Err(err) => {
            debug!("best_xpath skipped '{}': {}", expression, err);
            false
        }
    };

    if let Some(id) = element.id().filter(|id| !id.is_empty()) {
        if matches!(query.count_by_id(&id), Ok(1)) {
            return id_xpath(&id);
        }
    }

    if let Some(name) = element.attribute("name").filter(|n| !n.is_empty()) {
        if matches!(query.count_by_name(&name), Ok(1)) {
            return name_xpath(&name);
        }
    }

    if let Some(xpath) = data_attributes_xpath(element) {
        if unique(&xpath) {
            return xpath;
        }
    }

    let tag = element.xpath_tag();
    let classes = stable_classes(element, options);
    if let Some(xpath) = exact_class_xpath(element, &classes) {
        if unique(&xpath) {
            return xpath;
        }
    }

    for attr_name in BEST_ATTRIBUTE_NAMES {
        if let Some(value) = element.attribute(attr_name).filter(|v| !v.is_empty()) {
            let xpath = attribute_xpath(&tag, attr_name, &value);
            if unique(&xpath) {
                return xpath;
            }
        }
    }

    if TEXT_LOCATOR_TAGS.contains(&tag.as_str()) {
        if let Some(text) = usable_text(element, BEST_TEXT_MAX_LEN) {
            let xpath = text_xpath(&tag, &text);
            if unique(&xpath) {
                return xpath;
            }
        }
    }

    smart_path(element, options)
}

/// Readable path that prefers stable hooks over positions.
///
/// Each step is `tag[@id=...]`, else `tag[contains(@class,...)]` on the first
/// stable class, else `tag[n]` when needed to disambiguate. The walk stops
/// below `body`, or right after an element with an id or a `form`.
pub fn smart_path<E: LocatorElement>(element: &E, options: &GeneratorOptions) -> String {
    let mut parts = Vec::new();
    let mut current = Some(element.clone());

    while let Some(node) = current {
        let tag = node.xpath_tag();
        if tag == "body" {
            break;
        }

        let id = node.id().filter(|id| !id.is_empty());
        let mut step = tag.clone();
        if let Some(id) = &id {
            step.push_str(&format!("[@id={}]", quoted(id)));
        } else if let Some(class) = smart_path_class(&node, options) {
            step.push_str(&format!("[contains(@class,{})]", quoted(&class)));
        } else if node.same_tag_siblings().len() > 1 {
            if let Some(index) = node.same_tag_position() {
                step.push_str(&format!("[{}]", index));
            }
        }
        parts.push(step);

        if id.is_some() || tag == "form" {
            break;
        }
        current = node.parent();
    }

    parts.reverse();
    format!("//{}", parts.join("/"))
}

fn smart_path_class<E: LocatorElement>(element: &E, options: &GeneratorOptions) -> Option<String> {
    stable_classes(element, options)
        .into_iter()
        .find(|class| {
            !FRAMEWORK_CLASS_PREFIXES
                .iter()
                .any(|prefix| class.starts_with(prefix))
        })
}

/// Fully positional path from the root element, e.g. `/html/body/div[2]/a`.
///
/// Indices appear only where a parent holds several children of that tag.
pub fn absolute_xpath<E: LocatorElement>(element: &E) -> String {
    let mut parts = Vec::new();
    let mut current = Some(element.clone());

    while let Some(node) = current {
        let mut step = node.xpath_tag();
        if node.same_tag_siblings().len() > 1 {
            if let Some(index) = node.same_tag_position() {
                step.push_str(&format!("[{}]", index));
            }
        }
        parts.push(step);
        current = node.parent();
    }

    parts.reverse();
    format!("/{}", parts.join("/"))
}

/// Short `tag#id.class1.class2` label; picker-owned classes are omitted
pub fn element_info<E: LocatorElement>(element: &E, options: &GeneratorOptions) -> String {
    let mut info = element.xpath_tag();
    if let Some(id) = element.id().filter(|id| !id.is_empty()) {
        info.push('#');
        info.push_str(&id);
    }
    let class_list = element.class_list();
    let classes = class_list.filtered(|class| !options.is_reserved_class(class));
    if !classes.is_empty() {
        info.push('.');
        info.push_str(&classes.join("."));
    }
    info
}

impl<Q: DocumentQuery> CandidateGenerator<Q> {
    /// See [`best_xpath`]
    pub fn best_xpath<E: LocatorElement>(&self, element: &E) -> String {
        best_xpath(element, self.query(), self.options())
    }

    /// See [`smart_path`]
    pub fn smart_path<E: LocatorElement>(&self, element: &E) -> String {
        smart_path(element, self.options())
    }
}
