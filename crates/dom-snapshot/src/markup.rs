//! Well-formed XHTML/XML loader

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::debug;

use crate::builder::DocumentBuilder;
use crate::errors::DomError;
use crate::model::Document;

impl Document {
    /// Parse well-formed markup into a document.
    ///
    /// Comments, declarations, doctypes and processing instructions are
    /// dropped. Entity references in text and attribute values are decoded.
    pub fn parse_markup(markup: &str) -> Result<Document, DomError> {
        let mut reader = Reader::from_str(markup);
        let mut builder = DocumentBuilder::new();

        loop {
            let position = reader.buffer_position();
            match reader.read_event() {
                Ok(Event::Start(start)) => {
                    let (tag, attributes) = element_parts(&start, position)?;
                    builder.open_owned(&tag, attributes);
                }
                Ok(Event::Empty(start)) => {
                    let (tag, attributes) = element_parts(&start, position)?;
                    builder.open_owned(&tag, attributes).close();
                }
                Ok(Event::End(_)) => {
                    if builder.depth() == 0 {
                        return Err(DomError::markup(position, "unexpected closing tag"));
                    }
                    builder.close();
                }
                Ok(Event::Text(text)) => {
                    let text = text
                        .unescape()
                        .map_err(|e| DomError::markup(position, e.to_string()))?;
                    builder.text(&text);
                }
                Ok(Event::CData(data)) => {
                    let bytes = data.into_inner();
                    builder.text(&String::from_utf8_lossy(&bytes));
                }
                Ok(Event::Eof) => break,
                Ok(other) => debug!("skipping markup event: {:?}", other),
                Err(e) => return Err(DomError::markup(position, e.to_string())),
            }
        }

        builder.finish()
    }
}

fn element_parts(
    start: &BytesStart<'_>,
    position: usize,
) -> Result<(String, Vec<(String, String)>), DomError> {
    let tag = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| DomError::markup(position, e.to_string()))?;
        let name = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| DomError::markup(position, e.to_string()))?
            .into_owned();
        attributes.push((name, value));
    }
    Ok((tag, attributes))
}
