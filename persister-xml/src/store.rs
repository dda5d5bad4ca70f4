//! [`XmlStore`]: a [`Store`] that builds `<node>` elements.

use persister::{Store, ValueKind};

use crate::tracing_macros::trace;
use crate::{Element, XmlError, XmlErrorKind};

pub(crate) const NODE: &str = "node";
pub(crate) const NAME_ATTR: &str = "name";
pub(crate) const ROOT_NAME: &str = "_root_";

/// Tag of the element grouping values of `kind` inside a `<node>`.
pub(crate) const fn group_tag(kind: ValueKind) -> &'static str {
    match kind {
        ValueKind::String => "strings",
        ValueKind::Int => "ints",
        ValueKind::Long => "longs",
        ValueKind::Double => "doubles",
    }
}

/// A [`Store`] scoped to one `<node>` element.
///
/// Values land in per-type grouping elements (`<strings>`, `<ints>`,
/// `<longs>`, `<doubles>`), created on the first value of that type, one
/// child element per key. Child scopes append nested `<node name="...">`
/// elements.
///
/// Grouping elements are filled while the scope is alive and move into the
/// node when it is dropped.
///
/// Obtain the root scope from [`XmlDocument::store`](crate::XmlDocument::store).
#[derive(Debug)]
pub struct XmlStore<'a> {
    element: &'a mut Element,
    /// Each grouping element once created, with the index of the
    /// placeholder reserving its place among the node's children.
    groups: [Option<(usize, Element)>; 4],
}

impl<'a> XmlStore<'a> {
    pub(crate) fn scoped(element: &'a mut Element) -> Self {
        Self {
            element,
            groups: Default::default(),
        }
    }

    fn group(&mut self, kind: ValueKind) -> &mut Element {
        let element = &mut *self.element;
        let (_, group) = self.groups[kind as usize].get_or_insert_with(|| {
            trace!(group = group_tag(kind), "creating group");
            element.push_element(Element::new(group_tag(kind)));
            (element.children.len() - 1, Element::new(group_tag(kind)))
        });
        group
    }

    fn put(&mut self, kind: ValueKind, key: &str, text: String) -> Result<(), XmlError> {
        if !is_xml_name(key) {
            return Err(XmlErrorKind::InvalidName(key.to_owned()).into());
        }
        self.group(kind)
            .push_element(Element::new(key))
            .push_text(text);
        Ok(())
    }
}

impl Drop for XmlStore<'_> {
    fn drop(&mut self) {
        for (idx, group) in self.groups.iter_mut().filter_map(Option::take) {
            if let Some(placeholder) = self.element.element_at_mut(idx) {
                *placeholder = group;
            }
        }
    }
}

impl Store for XmlStore<'_> {
    type Error = XmlError;
    type Child<'b>
        = XmlStore<'b>
    where
        Self: 'b;

    fn put_string(&mut self, key: &str, value: &str) -> Result<(), XmlError> {
        if !is_xml_text(value) {
            return Err(XmlErrorKind::InvalidText(value.to_owned()).into());
        }
        self.put(ValueKind::String, key, value.to_owned())
    }

    fn put_int(&mut self, key: &str, value: i32) -> Result<(), XmlError> {
        self.put(ValueKind::Int, key, value.to_string())
    }

    fn put_long(&mut self, key: &str, value: i64) -> Result<(), XmlError> {
        self.put(ValueKind::Long, key, value.to_string())
    }

    fn put_double(&mut self, key: &str, value: f64) -> Result<(), XmlError> {
        self.put(ValueKind::Double, key, value.to_string())
    }

    fn new_child(&mut self, name: &str) -> Result<Self::Child<'_>, XmlError> {
        if name.is_empty() || !is_xml_text(name) {
            return Err(XmlErrorKind::InvalidText(name.to_owned()).into());
        }
        trace!(name, "new child node");
        let node = self
            .element
            .push_element(Element::new(NODE).with_attr(NAME_ATTR, name));
        Ok(XmlStore::scoped(node))
    }
}

/// Checks that `name` can be used as a tag: an XML 1.0 `Name` without
/// namespace colons.
pub(crate) fn is_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if is_name_start_char(first) => chars.all(is_name_char),
        _ => false,
    }
}

fn is_name_start_char(c: char) -> bool {
    matches!(c,
        'A'..='Z' | '_' | 'a'..='z'
        | '\u{C0}'..='\u{D6}' | '\u{D8}'..='\u{F6}' | '\u{F8}'..='\u{2FF}'
        | '\u{370}'..='\u{37D}' | '\u{37F}'..='\u{1FFF}' | '\u{200C}'..='\u{200D}'
        | '\u{2070}'..='\u{218F}' | '\u{2C00}'..='\u{2FEF}' | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}' | '\u{FDF0}'..='\u{FFFD}' | '\u{10000}'..='\u{EFFFF}'
    )
}

fn is_name_char(c: char) -> bool {
    is_name_start_char(c)
        || matches!(c,
            '-' | '.' | '0'..='9' | '\u{B7}'
            | '\u{300}'..='\u{36F}' | '\u{203F}'..='\u{2040}'
        )
}

/// Checks that every character is allowed in an XML 1.0 document.
pub(crate) fn is_xml_text(text: &str) -> bool {
    text.chars().all(|c| {
        matches!(c, '\t' | '\n' | '\r')
            || (c >= '\u{20}' && c != '\u{FFFE}' && c != '\u{FFFF}')
    })
}
