//! Element validator - vocabulary checks before any interpretation

use super::Element;
use crate::{Result, bail};

/// Element names a document may use
pub const VALID_ELEMENTS: &[&str] = &["scxml", "state", "transition", "action"];

/// Attribute names a document may use, on any element
pub const VALID_ATTRIBUTES: &[&str] = &[
    "xmlns", "version", "initial", "base", "debug", "name", "id", "event", "action", "target",
];

/// Check one element's attribute names and its direct children's names
pub fn validate_element(element: &Element) -> Result<()> {
    for (name, _) in element.attributes() {
        if !VALID_ATTRIBUTES.contains(&name.as_str()) {
            bail!("attribute {} is not accepted", name);
        }
    }

    for child in element.children() {
        if !VALID_ELEMENTS.contains(&child.name()) {
            bail!("element {} is not accepted", child.name());
        }
    }

    Ok(())
}

/// Validate an element and every element below it, depth-first in document order
pub fn validate_tree(element: &Element) -> Result<()> {
    validate_element(element)?;
    element.children().iter().try_for_each(validate_tree)
}
