//! Candidate strategies
//!
//! Each strategy reads the element, builds one or more expressions and asks
//! the document whether they are unique. In priority order:
//! 1. ID
//! 2. Name
//! 3. Data attributes
//! 4. Class (exact, then an unverified `contains` variant)
//! 5. Text content
//! 6. Single attributes from a fixed list
//! 7. Sibling position (unverified)

use crate::{
    element::{ClassValue, LocatorElement},
    errors::LocatorError,
    escape::quoted,
    query::{is_unique, DocumentQuery},
    types::{Candidate, GeneratorOptions, StrategyKind},
};
use tracing::{debug, warn};

/// What a strategy may read besides the element itself
pub struct StrategyContext<'a> {
    pub query: &'a dyn DocumentQuery,
    pub options: &'a GeneratorOptions,
}

impl<'a> StrategyContext<'a> {
    pub fn new(query: &'a dyn DocumentQuery, options: &'a GeneratorOptions) -> Self {
        Self { query, options }
    }

    /// Emit a candidate only if `xpath` selects exactly one node
    fn verified(
        &self,
        kind: StrategyKind,
        xpath: String,
    ) -> Result<Option<Candidate>, LocatorError> {
        if is_unique(self.query, &xpath)? {
            Ok(Some(Candidate::new(kind, xpath)))
        } else {
            debug!("{} candidate not unique: {}", kind, xpath);
            Ok(None)
        }
    }
}

/// Strategy trait for candidate derivation
pub trait Strategy<E: LocatorElement> {
    /// Strategy name for logging
    fn name(&self) -> &'static str;

    /// Candidates this strategy can vouch for, possibly none
    fn propose(
        &self,
        element: &E,
        ctx: &StrategyContext<'_>,
    ) -> Result<Vec<Candidate>, LocatorError>;
}

/// `//*[@id="..."]`, checked with an id lookup
pub struct IdStrategy;

impl<E: LocatorElement> Strategy<E> for IdStrategy {
    fn name(&self) -> &'static str {
        "id"
    }

    fn propose(
        &self,
        element: &E,
        ctx: &StrategyContext<'_>,
    ) -> Result<Vec<Candidate>, LocatorError> {
        let Some(id) = element.id().filter(|id| !id.is_empty()) else {
            return Ok(Vec::new());
        };
        if ctx.query.count_by_id(&id)? != 1 {
            debug!("id '{}' is not unique", id);
            return Ok(Vec::new());
        }
        Ok(vec![Candidate::new(StrategyKind::Id, id_xpath(&id))])
    }
}

/// `//*[@name="..."]`, checked with a name lookup
pub struct NameStrategy;

impl<E: LocatorElement> Strategy<E> for NameStrategy {
    fn name(&self) -> &'static str {
        "name"
    }

    fn propose(
        &self,
        element: &E,
        ctx: &StrategyContext<'_>,
    ) -> Result<Vec<Candidate>, LocatorError> {
        let Some(name) = element.attribute("name").filter(|n| !n.is_empty()) else {
            return Ok(Vec::new());
        };
        if ctx.query.count_by_name(&name)? != 1 {
            debug!("name '{}' is not unique", name);
            return Ok(Vec::new());
        }
        Ok(vec![Candidate::new(StrategyKind::Name, name_xpath(&name))])
    }
}

/// Conjunction of every non-empty `data-*` attribute
pub struct DataAttributeStrategy;

impl<E: LocatorElement> Strategy<E> for DataAttributeStrategy {
    fn name(&self) -> &'static str {
        "data-attributes"
    }

    fn propose(
        &self,
        element: &E,
        ctx: &StrategyContext<'_>,
    ) -> Result<Vec<Candidate>, LocatorError> {
        let Some(xpath) = data_attributes_xpath(element) else {
            return Ok(Vec::new());
        };
        Ok(ctx
            .verified(StrategyKind::DataAttributes, xpath)?
            .into_iter()
            .collect())
    }
}

/// Exact filtered class list, followed by a `contains` on the first class
pub struct ClassStrategy;

impl<E: LocatorElement> Strategy<E> for ClassStrategy {
    fn name(&self) -> &'static str {
        "class"
    }

    fn propose(
        &self,
        element: &E,
        ctx: &StrategyContext<'_>,
    ) -> Result<Vec<Candidate>, LocatorError> {
        let classes = stable_classes(element, ctx.options);
        let Some(first) = classes.first() else {
            return Ok(Vec::new());
        };
        let tag = element.xpath_tag();
        let mut candidates = Vec::new();

        // The exact form may fail on its own; the contains form still applies.
        match exact_class_xpath(element, &classes) {
            Some(exact) => match ctx.verified(StrategyKind::Class, exact) {
                Ok(Some(candidate)) => candidates.push(candidate),
                Ok(None) => {}
                Err(err) => warn!("exact class query failed: {}", err),
            },
            None => debug!("class attribute differs from filtered classes"),
        }

        candidates.push(Candidate::new(
            StrategyKind::ContainsClass,
            contains_class_xpath(&tag, first),
        ));
        Ok(candidates)
    }
}

/// `//tag[text()="..."]` for short, non-empty text
pub struct TextStrategy;

impl<E: LocatorElement> Strategy<E> for TextStrategy {
    fn name(&self) -> &'static str {
        "text"
    }

    fn propose(
        &self,
        element: &E,
        ctx: &StrategyContext<'_>,
    ) -> Result<Vec<Candidate>, LocatorError> {
        let Some(text) = usable_text(element, ctx.options.text_max_len) else {
            return Ok(Vec::new());
        };
        let xpath = text_xpath(&element.xpath_tag(), &text);
        Ok(ctx
            .verified(StrategyKind::TextContent, xpath)?
            .into_iter()
            .collect())
    }
}

/// One candidate per configured attribute that is unique on its own
pub struct AttributeStrategy;

impl<E: LocatorElement> Strategy<E> for AttributeStrategy {
    fn name(&self) -> &'static str {
        "attribute"
    }

    fn propose(
        &self,
        element: &E,
        ctx: &StrategyContext<'_>,
    ) -> Result<Vec<Candidate>, LocatorError> {
        let tag = element.xpath_tag();
        let mut candidates = Vec::new();

        for attr_name in &ctx.options.attribute_names {
            let Some(value) = element.attribute(attr_name).filter(|v| !v.is_empty()) else {
                continue;
            };
            let xpath = attribute_xpath(&tag, attr_name, &value);
            match ctx.verified(StrategyKind::Attribute(attr_name.clone()), xpath) {
                Ok(Some(candidate)) => candidates.push(candidate),
                Ok(None) => {}
                Err(err) => warn!("attribute '{}' query failed: {}", attr_name, err),
            }
        }

        Ok(candidates)
    }
}

/// `//parent/tag[n]` when the parent holds several same-tag children
pub struct PositionStrategy;

impl<E: LocatorElement> Strategy<E> for PositionStrategy {
    fn name(&self) -> &'static str {
        "position"
    }

    fn propose(
        &self,
        element: &E,
        _ctx: &StrategyContext<'_>,
    ) -> Result<Vec<Candidate>, LocatorError> {
        Ok(position_xpath(element)
            .map(|xpath| Candidate::new(StrategyKind::Position, xpath))
            .into_iter()
            .collect())
    }
}

/// `//*[@id="..."]`
pub fn id_xpath(id: &str) -> String {
    format!("//*[@id={}]", quoted(id))
}

/// `//*[@name="..."]`
pub fn name_xpath(name: &str) -> String {
    format!("//*[@name={}]", quoted(name))
}

/// `//tag[@attr="..."]`
pub fn attribute_xpath(tag: &str, attr_name: &str, value: &str) -> String {
    format!("//{}[@{}={}]", tag, attr_name, quoted(value))
}

/// `//tag[text()="..."]`
pub fn text_xpath(tag: &str, text: &str) -> String {
    format!("//{}[text()={}]", tag, quoted(text))
}

/// `//tag[contains(@class,"...")]`
pub fn contains_class_xpath(tag: &str, class: &str) -> String {
    format!("//{}[contains(@class,{})]", tag, quoted(class))
}

/// `//tag[@class="..."]` over the filtered classes.
///
/// `None` when filtering changed the class text: the element itself could
/// never match, so a unique hit would be some other element.
pub fn exact_class_xpath<E: LocatorElement>(element: &E, classes: &[String]) -> Option<String> {
    let joined = classes.join(" ");
    let own = match element.class_value()? {
        ClassValue::Text(text) => text,
        ClassValue::Tokens(tokens) => tokens.join(" "),
    };
    if joined.is_empty() || own != joined {
        return None;
    }
    Some(format!("//{}[@class={}]", element.xpath_tag(), quoted(&joined)))
}

/// `//*[@data-a="x" and @data-b="y"]`, `None` without data attributes
pub fn data_attributes_xpath<E: LocatorElement>(element: &E) -> Option<String> {
    let predicates: Vec<String> = element
        .data_attributes()
        .iter()
        .map(|(name, value)| format!("@{}={}", name, quoted(value)))
        .collect();
    if predicates.is_empty() {
        return None;
    }
    Some(format!("//*[{}]", predicates.join(" and ")))
}

/// Same-tag sibling index path, `None` for an only child or the root
pub fn position_xpath<E: LocatorElement>(element: &E) -> Option<String> {
    let parent = element.parent()?;
    let siblings = element.same_tag_siblings();
    if siblings.len() < 2 {
        return None;
    }
    let index = element.same_tag_position()?;
    Some(format!(
        "//{}/{}[{}]",
        parent.xpath_tag(),
        element.xpath_tag(),
        index
    ))
}

/// Class tokens left after dropping picker-owned and transient classes
pub fn stable_classes<E: LocatorElement>(element: &E, options: &GeneratorOptions) -> Vec<String> {
    element
        .class_list()
        .filtered(|class| options.is_stable_class(class))
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Trimmed text content when it is non-empty, shorter than `max_len` and
/// held verbatim by one of the element's own text nodes.
///
/// Length is counted in Unicode scalar values, not UTF-16 units.
/// Text that only lives in descendants is rejected: `text()` would never
/// match this element, so a unique hit would be a different one.
pub fn usable_text<E: LocatorElement>(element: &E, max_len: usize) -> Option<String> {
    let text = element.text_content();
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.chars().count() >= max_len {
        return None;
    }
    if !element.has_own_text(trimmed) {
        debug!("text '{}' is not a direct text node", trimmed);
        return None;
    }
    Some(trimmed.to_string())
}
