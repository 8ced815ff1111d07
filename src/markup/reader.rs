//! Markup reader built on quick-xml events

use super::Element;
use crate::{Result, bail, parse_error};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::path::Path;
use std::str;

/// Read and parse a markup file into an element tree
///
/// A missing or unreadable file is an I/O error, not a parse error.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Element> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    tracing::debug!("Read {} bytes from {:?}", content.len(), path);
    parse_str(&content)
}

/// Parse markup text into an element tree
pub fn parse_str(input: &str) -> Result<Element> {
    let mut reader = Reader::from_str(input);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let event = reader.read_event().map_err(|e| {
            parse_error!(
                "malformed markup at byte {}: {}",
                reader.buffer_position(),
                e
            )
        })?;

        match event {
            Event::Eof => break,
            Event::Start(e) => {
                stack.push(element_from_start(&e)?);
            }
            Event::Empty(e) => {
                let element = element_from_start(&e)?;
                attach(element, &mut stack, &mut root)?;
            }
            Event::End(_) => match stack.pop() {
                Some(element) => attach(element, &mut stack, &mut root)?,
                None => bail!(
                    "malformed markup at byte {}: unexpected closing tag",
                    reader.buffer_position()
                ),
            },
            // Text, comments, declarations and processing instructions carry no machine data
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        bail!(
            "malformed markup: unexpected end of document, <{}> is not closed",
            open.name()
        );
    }

    root.ok_or_else(|| parse_error!("malformed markup: document has no root element"))
}

fn attach(element: Element, stack: &mut [Element], root: &mut Option<Element>) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.push_child(element);
        return Ok(());
    }

    if root.is_some() {
        bail!(
            "malformed markup: element {} follows the root element",
            element.name()
        );
    }
    *root = Some(element);
    Ok(())
}

fn element_from_start(start: &BytesStart<'_>) -> Result<Element> {
    let name = str::from_utf8(start.name().as_ref())
        .map_err(|e| parse_error!("malformed markup: element name is not UTF-8: {}", e))?
        .to_string();

    let mut element = Element::new(name);
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| {
            parse_error!("malformed markup in <{}>: {}", element.name(), e)
        })?;
        let key = str::from_utf8(attribute.key.as_ref())
            .map_err(|e| parse_error!("malformed markup: attribute name is not UTF-8: {}", e))?
            .to_string();
        let value = attribute.unescape_value()?.into_owned();
        element.push_attribute(key, value);
    }

    Ok(element)
}
