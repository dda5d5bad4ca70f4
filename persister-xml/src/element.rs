//! A minimal owned XML element tree.

use indexmap::IndexMap;

use crate::escaping::is_xml_whitespace;

/// Content that can appear inside an XML element - either child elements or text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    /// Text content.
    Text(String),
    /// A child element.
    Element(Element),
}

impl Content {
    /// Returns `Some(&Element)` if this is an element.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Content::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Returns `true` for text made only of whitespace.
    pub(crate) fn is_blank_text(&self) -> bool {
        matches!(self, Content::Text(t) if t.trim_matches(is_xml_whitespace).is_empty())
    }
}

/// An XML element: tag name, attributes in document order, and children.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    /// The element's tag name.
    pub tag: String,

    /// Attributes, in the order they were added or parsed.
    pub attrs: IndexMap<String, String>,

    /// Child content (elements and text).
    pub children: Vec<Content>,
}

impl Element {
    /// Create a new element with just a tag name.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Add an attribute.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Add a child element.
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Content::Element(child));
        self
    }

    /// Add text content.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.push_text(text.into());
        self
    }

    /// Get an attribute value by name.
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(|s| s.as_str())
    }

    /// Iterate over child elements (skipping text nodes).
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|c| c.as_element())
    }

    /// Get the combined text content (concatenated from all text children).
    pub fn text_content(&self) -> String {
        let mut result = String::new();
        for child in &self.children {
            match child {
                Content::Text(t) => result.push_str(t),
                Content::Element(e) => result.push_str(&e.text_content()),
            }
        }
        result
    }

    /// Append a child element and return it for further building.
    pub fn push_element(&mut self, child: Element) -> &mut Element {
        self.children.push(Content::Element(child));
        match self.children.last_mut() {
            Some(Content::Element(e)) => e,
            _ => unreachable!("an element was just pushed"),
        }
    }

    /// Append text, merging with a directly preceding text node.
    pub fn push_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if let Some(Content::Text(last)) = self.children.last_mut() {
            last.push_str(&text);
        } else {
            self.children.push(Content::Text(text));
        }
    }

    /// Mutable access to the child at `idx`, if it is an element.
    pub(crate) fn element_at_mut(&mut self, idx: usize) -> Option<&mut Element> {
        match self.children.get_mut(idx) {
            Some(Content::Element(e)) => Some(e),
            _ => None,
        }
    }

    /// Returns `true` when the children should be laid out one per line:
    /// there is at least one child element and no meaningful text.
    pub(crate) fn is_block(&self) -> bool {
        self.children.iter().any(|c| c.as_element().is_some())
            && self.children.iter().all(|c| c.as_element().is_some() || c.is_blank_text())
    }
}

impl From<Element> for Content {
    fn from(e: Element) -> Self {
        Content::Element(e)
    }
}
