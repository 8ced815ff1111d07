//! Markup module - generic element tree for state machine documents
//!
//! The reader turns raw markup into an [`Element`] tree without interpreting it;
//! the validator checks that a tree only uses the recognised vocabulary.

pub mod reader;
pub mod validator;

pub use reader::{parse_file, parse_str};
pub use validator::{VALID_ATTRIBUTES, VALID_ELEMENTS, validate_element, validate_tree};

/// An element with its attributes (in document order) and child elements
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Element>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push_attribute(name, value);
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn push_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.push((name.into(), value.into()));
    }

    pub fn push_child(&mut self, child: Element) {
        self.children.push(child);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Value of an attribute, or the empty string when it is absent
    pub fn attr(&self, name: &str) -> &str {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
            .unwrap_or("")
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.iter().any(|(key, _)| key == name)
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Direct children with the given element name
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |child| child.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_attribute_reads_empty() {
        let element = Element::new("state").with_attribute("id", "Idle");
        assert_eq!(element.attr("id"), "Idle");
        assert_eq!(element.attr("initial"), "");
        assert!(element.has_attr("id"));
        assert!(!element.has_attr("initial"));
    }

    #[test]
    fn test_children_named() {
        let element = Element::new("state")
            .with_child(Element::new("transition").with_attribute("event", "A"))
            .with_child(Element::new("action"))
            .with_child(Element::new("transition").with_attribute("event", "B"));

        let events: Vec<&str> = element
            .children_named("transition")
            .map(|t| t.attr("event"))
            .collect();
        assert_eq!(events, vec!["A", "B"]);
        assert_eq!(element.children().len(), 3);
    }
}
