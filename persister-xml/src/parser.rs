//! Reads XML text into an [`Element`] tree using quick-xml.

use std::borrow::Cow;

use quick_xml::Reader;
use quick_xml::escape::resolve_xml_entity;
use quick_xml::events::{BytesStart, Event};

use crate::escaping::is_xml_whitespace;
use crate::tracing_macros::{trace, trace_span};
use crate::{Element, XmlError, XmlErrorKind};

/// Parses a complete document and returns its root element.
///
/// Entity and character references are resolved, CDATA is unwrapped and
/// line breaks in literal text are normalized to `\n`. In an element holding
/// only text, whitespace written literally at either edge is layout and is
/// dropped; whitespace produced by a reference or CDATA is kept. Whitespace
/// between child elements is dropped. Comments, processing instructions, the
/// XML declaration and any DOCTYPE are skipped.
pub(crate) fn parse(input: &[u8]) -> Result<Element, XmlError> {
    trace_span!("parse", input_len = input.len());

    let mut reader = Reader::from_reader(input);
    let mut buf = Vec::new();
    let mut open: Vec<Open> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        buf.clear();
        let event = reader.read_event_into(&mut buf).map_err(|e| {
            XmlErrorKind::Parse(format!("at byte {}: {e}", reader.buffer_position()))
        })?;

        match event {
            Event::Start(ref e) => {
                let element = open_element(e)?;
                trace!(tag = %element.tag, depth = open.len(), "open");
                open.push(Open::new(element));
            }
            Event::Empty(ref e) => {
                let element = open_element(e)?;
                attach(&mut open, &mut root, element)?;
            }
            Event::End(_) => {
                // quick-xml has already checked that the end tag matches
                let element = open
                    .pop()
                    .ok_or_else(|| XmlErrorKind::Parse("unbalanced end tag".into()))?
                    .finish();
                attach(&mut open, &mut root, element)?;
            }
            Event::Text(e) => {
                let text = e.decode().map_err(|e| XmlErrorKind::Parse(e.to_string()))?;
                push_text(&mut open, &normalize_newlines(&text), Origin::Literal)?;
            }
            Event::CData(e) => {
                let text = core::str::from_utf8(e.as_ref())
                    .map_err(|e| XmlErrorKind::Parse(format!("invalid UTF-8 in CDATA: {e}")))?;
                push_text(&mut open, text, Origin::Kept)?;
            }
            Event::GeneralRef(e) => {
                let raw = e.decode().map_err(|e| XmlErrorKind::Parse(e.to_string()))?;
                let resolved = resolve_entity(&raw)?;
                push_text(&mut open, &resolved, Origin::Kept)?;
            }
            Event::Comment(_) | Event::PI(_) | Event::Decl(_) | Event::DocType(_) => {}
            Event::Eof => break,
        }
    }

    if let Some(unclosed) = open.last() {
        return Err(XmlErrorKind::Parse(format!(
            "unexpected end of input: <{}> is never closed",
            unclosed.element.tag
        ))
        .into());
    }
    root.ok_or_else(|| XmlErrorKind::Parse("document has no root element".into()).into())
}

#[derive(Debug, Clone, Copy)]
enum Origin {
    /// Characters written as-is in the document.
    Literal,
    /// Characters from a reference or a CDATA section.
    Kept,
}

/// Text read since the last child element of an open element.
#[derive(Debug, Default)]
struct TextRun {
    text: String,
    /// Byte range spanning every [`Origin::Kept`] piece of `text`.
    kept: Option<(usize, usize)>,
}

impl TextRun {
    fn push(&mut self, text: &str, origin: Origin) {
        let start = self.text.len();
        self.text.push_str(text);
        if let Origin::Kept = origin {
            let end = self.text.len();
            self.kept = Some(match self.kept {
                Some((first, _)) => (first, end),
                None => (start, end),
            });
        }
    }

    /// The text without the literal whitespace at its edges.
    fn into_trimmed(self) -> String {
        let Some((first, last)) = self.kept else {
            return self.text.trim_matches(is_xml_whitespace).to_owned();
        };
        let head = &self.text[..first];
        let start = head.len() - head.trim_start_matches(is_xml_whitespace).len();
        let end = last + self.text[last..].trim_end_matches(is_xml_whitespace).len();
        self.text[start..end].to_owned()
    }
}

/// An element whose end tag has not been read yet.
#[derive(Debug)]
struct Open {
    element: Element,
    run: TextRun,
}

impl Open {
    fn new(element: Element) -> Self {
        Self {
            element,
            run: TextRun::default(),
        }
    }

    /// Moves the pending text run, untouched, into the element.
    fn flush_text(&mut self) {
        let run = core::mem::take(&mut self.run);
        if !run.text.is_empty() {
            self.element.push_text(run.text);
        }
    }

    fn finish(mut self) -> Element {
        if self.element.children.is_empty() {
            let text = core::mem::take(&mut self.run).into_trimmed();
            if !text.is_empty() {
                self.element.push_text(text);
            }
        } else {
            // Indentation between child elements is not content
            self.flush_text();
            self.element.children.retain(|c| !c.is_blank_text());
        }
        self.element
    }
}

fn open_element(start: &BytesStart<'_>) -> Result<Element, XmlError> {
    let name = start.name();
    let tag = core::str::from_utf8(name.as_ref())
        .map_err(|e| XmlErrorKind::Parse(format!("invalid UTF-8 in tag name: {e}")))?;
    let mut element = Element::new(tag);

    for attr in start.attributes() {
        let attr = attr.map_err(|e| XmlErrorKind::Parse(e.to_string()))?;
        let key = core::str::from_utf8(attr.key.as_ref())
            .map_err(|e| XmlErrorKind::Parse(format!("invalid UTF-8 in attribute name: {e}")))?
            .to_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| XmlErrorKind::Parse(e.to_string()))?
            .into_owned();
        element.attrs.insert(key, value);
    }
    Ok(element)
}

/// Adds a finished element to its parent, or makes it the root.
fn attach(open: &mut [Open], root: &mut Option<Element>, element: Element) -> Result<(), XmlError> {
    match open.last_mut() {
        Some(parent) => {
            parent.flush_text();
            parent.element.children.push(element.into());
            Ok(())
        }
        None if root.is_some() => {
            Err(XmlErrorKind::Parse(format!("second root element <{}>", element.tag)).into())
        }
        None => {
            *root = Some(element);
            Ok(())
        }
    }
}

fn push_text(open: &mut [Open], text: &str, origin: Origin) -> Result<(), XmlError> {
    match open.last_mut() {
        Some(current) => {
            current.run.push(text, origin);
            Ok(())
        }
        None if text.trim_matches(is_xml_whitespace).is_empty() => Ok(()),
        None => Err(XmlErrorKind::Parse("text outside the root element".into()).into()),
    }
}

/// Turns `\r\n` and lone `\r` into `\n`.
fn normalize_newlines(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

/// Resolve a general entity reference.
fn resolve_entity(raw: &str) -> Result<String, XmlError> {
    if let Some(resolved) = resolve_xml_entity(raw) {
        return Ok(resolved.into());
    }

    if let Some(rest) = raw.strip_prefix('#') {
        let code = if let Some(hex) = rest.strip_prefix('x').or_else(|| rest.strip_prefix('X')) {
            u32::from_str_radix(hex, 16)
                .map_err(|_| XmlErrorKind::Parse(format!("invalid hex entity: #{rest}")))?
        } else {
            rest.parse::<u32>()
                .map_err(|_| XmlErrorKind::Parse(format!("invalid decimal entity: #{rest}")))?
        };

        let ch = char::from_u32(code)
            .ok_or_else(|| XmlErrorKind::Parse(format!("invalid code point: {code}")))?;
        return Ok(ch.to_string());
    }

    Err(XmlErrorKind::Parse(format!("unknown entity: &{raw};")).into())
}
