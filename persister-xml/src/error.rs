//! Error types for XML storing and loading.

use std::{
    error::Error,
    fmt::{self, Display},
};

use persister::{PersisterError, ValueKind};

/// Error raised while writing a persister tree as XML or loading one back.
#[derive(Debug)]
pub struct XmlError {
    kind: XmlErrorKind,
}

impl XmlError {
    /// Returns a reference to the error kind for detailed error inspection.
    pub fn kind(&self) -> &XmlErrorKind {
        &self.kind
    }

    /// Returns `true` if the document parsed but does not describe a
    /// persister tree.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self.kind,
            XmlErrorKind::UnexpectedRoot(_)
                | XmlErrorKind::UnexpectedElement { .. }
                | XmlErrorKind::UnexpectedText { .. }
                | XmlErrorKind::MissingName
                | XmlErrorKind::InvalidNumber { .. }
        )
    }
}

impl Display for XmlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl Error for XmlError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.kind {
            XmlErrorKind::Io(e) => Some(e),
            XmlErrorKind::Persister(e) => Some(e),
            _ => None,
        }
    }
}

impl<K: Into<XmlErrorKind>> From<K> for XmlError {
    fn from(value: K) -> Self {
        XmlError { kind: value.into() }
    }
}

/// Detailed classification of XML errors.
#[derive(Debug)]
#[non_exhaustive]
pub enum XmlErrorKind {
    // Reading errors
    /// The input is not well-formed XML.
    Parse(String),
    /// Reading or writing the underlying file or stream failed.
    Io(std::io::Error),

    // Structural errors
    /// The root element is not `<node>`.
    UnexpectedRoot(String),
    /// An element appeared where it is not allowed.
    UnexpectedElement {
        /// The offending tag.
        tag: String,
        /// The tag of the enclosing element.
        parent: String,
    },
    /// Non-whitespace text appeared directly inside a `<node>` or grouping element.
    UnexpectedText {
        /// The tag of the enclosing element.
        parent: String,
    },
    /// A nested `<node>` has no `name` attribute, or an empty one.
    MissingName,
    /// A numeric value could not be parsed.
    InvalidNumber {
        /// The value's key.
        key: String,
        /// The namespace the value belongs to.
        kind: ValueKind,
        /// The text that failed to parse.
        text: String,
    },

    // Writing errors
    /// A key cannot be used as an XML element name.
    InvalidName(String),
    /// A string value or child name contains characters XML cannot carry.
    InvalidText(String),

    /// The data model rejected a value while loading.
    Persister(PersisterError),
}

impl XmlErrorKind {
    /// Returns an error code for this error kind.
    pub fn code(&self) -> &'static str {
        match self {
            XmlErrorKind::Parse(_) => "persister_xml::parse",
            XmlErrorKind::Io(_) => "persister_xml::io",
            XmlErrorKind::UnexpectedRoot(_) => "persister_xml::unexpected_root",
            XmlErrorKind::UnexpectedElement { .. } => "persister_xml::unexpected_element",
            XmlErrorKind::UnexpectedText { .. } => "persister_xml::unexpected_text",
            XmlErrorKind::MissingName => "persister_xml::missing_name",
            XmlErrorKind::InvalidNumber { .. } => "persister_xml::invalid_number",
            XmlErrorKind::InvalidName(_) => "persister_xml::invalid_name",
            XmlErrorKind::InvalidText(_) => "persister_xml::invalid_text",
            XmlErrorKind::Persister(e) => e.code(),
        }
    }
}

impl Display for XmlErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            XmlErrorKind::Parse(msg) => write!(f, "XML parse error: {msg}"),
            XmlErrorKind::Io(e) => write!(f, "IO error: {e}"),
            XmlErrorKind::UnexpectedRoot(tag) => {
                write!(f, "expected root element <node>, found <{tag}>")
            }
            XmlErrorKind::UnexpectedElement { tag, parent } => {
                write!(f, "unexpected element <{tag}> inside <{parent}>")
            }
            XmlErrorKind::UnexpectedText { parent } => {
                write!(f, "unexpected text content inside <{parent}>")
            }
            XmlErrorKind::MissingName => {
                write!(f, "<node> element without name attribute")
            }
            XmlErrorKind::InvalidNumber { key, kind, text } => {
                write!(f, "invalid {kind} value '{text}' for key '{key}'")
            }
            XmlErrorKind::InvalidName(name) => {
                write!(f, "'{name}' is not a valid XML element name")
            }
            XmlErrorKind::InvalidText(text) => {
                write!(f, "{text:?} contains characters not allowed in XML")
            }
            XmlErrorKind::Persister(e) => write!(f, "{e}"),
        }
    }
}

impl From<std::io::Error> for XmlErrorKind {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<PersisterError> for XmlErrorKind {
    fn from(value: PersisterError) -> Self {
        Self::Persister(value)
    }
}

// ============================================================================
// Diagnostic Implementation
// ============================================================================

impl miette::Diagnostic for XmlError {
    fn code<'a>(&'a self) -> Option<Box<dyn Display + 'a>> {
        Some(Box::new(self.kind.code()))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn Display + 'a>> {
        match &self.kind {
            XmlErrorKind::UnexpectedElement { .. } => Some(Box::new(
                "a <node> may only contain <strings>, <ints>, <longs>, <doubles> and <node> elements",
            )),
            XmlErrorKind::MissingName => {
                Some(Box::new("add a non-empty name=\"...\" attribute to the <node>"))
            }
            XmlErrorKind::InvalidName(_) => Some(Box::new(
                "keys are written as tag names: start with a letter or '_', then use letters, digits, '_', '-' or '.'",
            )),
            _ => None,
        }
    }
}
