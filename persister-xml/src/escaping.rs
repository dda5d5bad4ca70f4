//! XML escaping utilities.

use std::io::{self, Write};

/// Wraps a `Write` and escapes XML special characters as bytes pass through.
pub(crate) struct EscapingWriter<'a> {
    inner: &'a mut dyn Write,
    attribute: bool,
}

impl<'a> EscapingWriter<'a> {
    /// Create an escaping writer for text content.
    /// Escapes: `&` `<` `>` and carriage return.
    pub(crate) fn text(inner: &'a mut dyn Write) -> Self {
        Self {
            inner,
            attribute: false,
        }
    }

    /// Create an escaping writer for attribute values.
    /// Escapes: `&` `<` `>` `"` and tab, newline, carriage return, which
    /// attribute-value normalization would otherwise turn into spaces.
    pub(crate) fn attribute(inner: &'a mut dyn Write) -> Self {
        Self {
            inner,
            attribute: true,
        }
    }
}

/// The whitespace characters of XML: space, tab, line feed and carriage return.
pub(crate) const fn is_xml_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

/// Writes every character of `text` as a decimal character reference.
pub(crate) fn write_char_refs(out: &mut dyn Write, text: &str) -> io::Result<()> {
    for c in text.chars() {
        write!(out, "&#{};", u32::from(c))?;
    }
    Ok(())
}

impl Write for EscapingWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        for &b in buf {
            match b {
                b'&' => self.inner.write_all(b"&amp;")?,
                b'<' => self.inner.write_all(b"&lt;")?,
                b'>' => self.inner.write_all(b"&gt;")?,
                b'\r' => self.inner.write_all(b"&#13;")?,
                b'"' if self.attribute => self.inner.write_all(b"&quot;")?,
                b'\t' if self.attribute => self.inner.write_all(b"&#9;")?,
                b'\n' if self.attribute => self.inner.write_all(b"&#10;")?,
                _ => self.inner.write_all(&[b])?,
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(input: &str) -> String {
        let mut buf = Vec::new();
        EscapingWriter::text(&mut buf)
            .write_all(input.as_bytes())
            .unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn attribute(input: &str) -> String {
        let mut buf = Vec::new();
        EscapingWriter::attribute(&mut buf)
            .write_all(input.as_bytes())
            .unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn text_escapes_markup() {
        assert_eq!(text("a & b < c > d"), "a &amp; b &lt; c &gt; d");
    }

    #[test]
    fn text_keeps_quotes_and_newlines() {
        assert_eq!(text("say \"hi\"\n\tbye"), "say \"hi\"\n\tbye");
    }

    #[test]
    fn text_escapes_carriage_return() {
        assert_eq!(text("line\r\nnext"), "line&#13;\nnext");
    }

    #[test]
    fn attribute_escapes_quotes() {
        assert_eq!(attribute("a \"quoted\" b"), "a &quot;quoted&quot; b");
    }

    #[test]
    fn attribute_escapes_whitespace_controls() {
        assert_eq!(attribute("a\tb\nc\rd"), "a&#9;b&#10;c&#13;d");
    }

    #[test]
    fn char_refs() {
        let mut buf = Vec::new();
        write_char_refs(&mut buf, " \t\n\r").unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "&#32;&#9;&#10;&#13;");
        assert!(!is_xml_whitespace('\u{a0}'));
    }

    #[test]
    fn multibyte_passes_through() {
        assert_eq!(text("\u{df} \u{2192} \u{65e5}"), "\u{df} \u{2192} \u{65e5}");
        assert_eq!(attribute("\u{e9}t\u{e9}"), "\u{e9}t\u{e9}");
    }
}
