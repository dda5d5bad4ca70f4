//! Renders an [`Element`] tree as indented XML text.

use std::borrow::Cow;
use std::io::{self, Write};

use crate::escaping::{EscapingWriter, is_xml_whitespace, write_char_refs};
use crate::{Content, Element};

/// Options for XML output.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Indentation string, repeated once per nesting level (default: two spaces).
    pub indent: Cow<'static, str>,
    /// Whether to start with `<?xml version="1.0" encoding="UTF-8"?>` (default: true).
    pub declaration: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            indent: Cow::Borrowed("  "),
            declaration: true,
        }
    }
}

impl WriteOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the indentation string.
    pub fn indent(mut self, indent: impl Into<Cow<'static, str>>) -> Self {
        self.indent = indent.into();
        self
    }

    /// Enable or disable the XML declaration.
    pub const fn declaration(mut self, declaration: bool) -> Self {
        self.declaration = declaration;
        self
    }
}

/// Writes `root` as a complete document.
///
/// Elements holding child elements get one child per line; elements holding
/// only text are written on a single line, and empty elements are
/// self-closing. Whitespace at the edges of a text-only element is written as
/// character references so that reading the document back keeps it.
pub(crate) fn write_document(
    root: &Element,
    options: &WriteOptions,
    out: &mut dyn Write,
) -> io::Result<()> {
    let mut writer = XmlWriter {
        out,
        options,
        depth: 0,
    };
    if options.declaration {
        writer.out.write_all(b"<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n")?;
    }
    writer.write_element(root)?;
    writer.out.flush()
}

struct XmlWriter<'a> {
    out: &'a mut dyn Write,
    options: &'a WriteOptions,
    /// Current indentation depth
    depth: usize,
}

impl XmlWriter<'_> {
    fn write_element(&mut self, element: &Element) -> io::Result<()> {
        self.write_indent()?;
        self.write_open_tag(element)?;

        if element.children.is_empty() {
            self.out.write_all(b"/>\n")?;
        } else if element.is_block() {
            self.out.write_all(b">\n")?;
            self.depth += 1;
            for child in element.child_elements() {
                self.write_element(child)?;
            }
            self.depth -= 1;
            self.write_indent()?;
            self.write_close_tag(&element.tag)?;
            self.out.write_all(b"\n")?;
        } else if let [Content::Text(text)] = element.children.as_slice() {
            self.out.write_all(b">")?;
            self.write_text_value(text)?;
            self.write_close_tag(&element.tag)?;
            self.out.write_all(b"\n")?;
        } else {
            // Mixed content is written as-is so no whitespace is added to the
            // text.
            self.out.write_all(b">")?;
            for child in &element.children {
                self.write_inline(child)?;
            }
            self.write_close_tag(&element.tag)?;
            self.out.write_all(b"\n")?;
        }
        Ok(())
    }

    fn write_text_value(&mut self, text: &str) -> io::Result<()> {
        let start = text.len() - text.trim_start_matches(is_xml_whitespace).len();
        let end = text.trim_end_matches(is_xml_whitespace).len();
        if start >= end {
            return write_char_refs(self.out, text);
        }
        write_char_refs(self.out, &text[..start])?;
        EscapingWriter::text(self.out).write_all(text[start..end].as_bytes())?;
        write_char_refs(self.out, &text[end..])
    }

    fn write_inline(&mut self, content: &Content) -> io::Result<()> {
        match content {
            Content::Text(text) => EscapingWriter::text(self.out).write_all(text.as_bytes()),
            Content::Element(element) => {
                self.write_open_tag(element)?;
                if element.children.is_empty() {
                    return self.out.write_all(b"/>");
                }
                self.out.write_all(b">")?;
                for child in &element.children {
                    self.write_inline(child)?;
                }
                self.write_close_tag(&element.tag)
            }
        }
    }

    /// Writes `<tag attr="..."` without closing the bracket.
    fn write_open_tag(&mut self, element: &Element) -> io::Result<()> {
        self.out.write_all(b"<")?;
        self.out.write_all(element.tag.as_bytes())?;
        for (name, value) in &element.attrs {
            self.out.write_all(b" ")?;
            self.out.write_all(name.as_bytes())?;
            self.out.write_all(b"=\"")?;
            EscapingWriter::attribute(self.out).write_all(value.as_bytes())?;
            self.out.write_all(b"\"")?;
        }
        Ok(())
    }

    fn write_close_tag(&mut self, tag: &str) -> io::Result<()> {
        self.out.write_all(b"</")?;
        self.out.write_all(tag.as_bytes())?;
        self.out.write_all(b">")
    }

    fn write_indent(&mut self) -> io::Result<()> {
        for _ in 0..self.depth {
            self.out.write_all(self.options.indent.as_bytes())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(root: &Element, options: &WriteOptions) -> String {
        let mut out = Vec::new();
        write_document(root, options, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn nested_elements_are_indented() {
        let root = Element::new("node").with_attr("name", "_root_").with_child(
            Element::new("ints")
                .with_child(Element::new("x").with_text("42"))
                .with_child(Element::new("y").with_text("84")),
        );
        assert_eq!(
            render(&root, &WriteOptions::new().declaration(false)),
            "<node name=\"_root_\">\n  <ints>\n    <x>42</x>\n    <y>84</y>\n  </ints>\n</node>\n"
        );
    }

    #[test]
    fn custom_indent_and_declaration() {
        let root = Element::new("a").with_child(Element::new("b"));
        assert_eq!(
            render(&root, &WriteOptions::new().indent("\t")),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<a>\n\t<b/>\n</a>\n"
        );
    }

    #[test]
    fn text_is_escaped() {
        let root = Element::new("s").with_text("a < b & c\r\nd");
        assert_eq!(
            render(&root, &WriteOptions::new().declaration(false)),
            "<s>a &lt; b &amp; c&#13;\nd</s>\n"
        );
    }

    #[test]
    fn edge_whitespace_becomes_char_refs() {
        let options = WriteOptions::new().declaration(false);
        let root = Element::new("s").with_text("  a  b\t\n");
        assert_eq!(render(&root, &options), "<s>&#32;&#32;a  b&#9;&#10;</s>\n");

        let root = Element::new("s").with_text(" \r");
        assert_eq!(render(&root, &options), "<s>&#32;&#13;</s>\n");
    }

    #[test]
    fn mixed_content_stays_on_one_line() {
        let root = Element::new("p")
            .with_text("Hello ")
            .with_child(Element::new("b").with_text("world"))
            .with_child(Element::new("br"));
        assert_eq!(
            render(&root, &WriteOptions::new().declaration(false)),
            "<p>Hello <b>world</b><br/></p>\n"
        );
    }

    #[test]
    fn attributes_are_escaped() {
        let root = Element::new("node").with_attr("name", "a \"b\"\n");
        assert_eq!(
            render(&root, &WriteOptions::new().declaration(false)),
            "<node name=\"a &quot;b&quot;&#10;\"/>\n"
        );
    }
}
