//! Rebuilds a [`Persister`] from a `<node>` element tree.

use core::str::FromStr;

use persister::{Persister, ValueKind};

use crate::store::{NAME_ATTR, NODE, group_tag};
use crate::tracing_macros::{debug, trace_span};
use crate::{Content, Element, XmlError, XmlErrorKind};

/// Loads the tree rooted at `root`, which must be a `<node>` element.
///
/// The root's own `name` attribute is not required and is ignored.
pub(crate) fn load_root(root: &Element) -> Result<Persister, XmlError> {
    if root.tag != NODE {
        return Err(XmlErrorKind::UnexpectedRoot(root.tag.clone()).into());
    }
    let mut persister = Persister::new();
    load_node(&mut persister, root)?;
    Ok(persister)
}

fn load_node(persister: &mut Persister, node: &Element) -> Result<(), XmlError> {
    trace_span!("load_node", name = node.get_attr(NAME_ATTR).unwrap_or_default());

    for content in &node.children {
        let element = match content {
            Content::Element(element) => element,
            Content::Text(_) if content.is_blank_text() => continue,
            Content::Text(_) => {
                return Err(XmlErrorKind::UnexpectedText {
                    parent: node.tag.clone(),
                }
                .into());
            }
        };

        match element.tag.as_str() {
            NODE => {
                let name = element
                    .get_attr(NAME_ATTR)
                    .filter(|name| !name.is_empty())
                    .ok_or(XmlErrorKind::MissingName)?;
                load_node(persister.new_child(name)?, element)?;
            }
            tag => {
                let kind = ValueKind::ALL
                    .into_iter()
                    .find(|kind| group_tag(*kind) == tag)
                    .ok_or_else(|| XmlErrorKind::UnexpectedElement {
                        tag: tag.to_owned(),
                        parent: node.tag.clone(),
                    })?;
                load_group(persister, element, kind)?;
            }
        }
    }
    Ok(())
}

fn load_group(persister: &mut Persister, group: &Element, kind: ValueKind) -> Result<(), XmlError> {
    debug!(group = %group.tag, "loading values");

    for content in &group.children {
        let entry = match content {
            Content::Element(entry) => entry,
            Content::Text(_) if content.is_blank_text() => continue,
            Content::Text(_) => {
                return Err(XmlErrorKind::UnexpectedText {
                    parent: group.tag.clone(),
                }
                .into());
            }
        };

        let key = entry.tag.as_str();
        let text = value_text(entry)?;
        match kind {
            ValueKind::String => persister.put_string(key, text)?,
            ValueKind::Int => persister.put_int(key, parse_number(key, kind, &text)?)?,
            ValueKind::Long => persister.put_long(key, parse_number(key, kind, &text)?)?,
            ValueKind::Double => persister.put_double(key, parse_number(key, kind, &text)?)?,
        }
    }
    Ok(())
}

/// The text of a value element, which may not contain elements itself.
fn value_text(entry: &Element) -> Result<String, XmlError> {
    if let Some(nested) = entry.child_elements().next() {
        return Err(XmlErrorKind::UnexpectedElement {
            tag: nested.tag.clone(),
            parent: entry.tag.clone(),
        }
        .into());
    }
    Ok(entry.text_content())
}

fn parse_number<T: FromStr>(key: &str, kind: ValueKind, text: &str) -> Result<T, XmlError> {
    text.trim().parse().map_err(|_| {
        XmlErrorKind::InvalidNumber {
            key: key.to_owned(),
            kind,
            text: text.to_owned(),
        }
        .into()
    })
}
