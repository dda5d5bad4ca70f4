//! [`XmlDocument`]: an in-memory XML document holding a persister tree.

use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

use persister::{Persister, StoreExt};

use crate::store::{NAME_ATTR, NODE, ROOT_NAME};
use crate::tracing_macros::debug;
use crate::writer::write_document;
use crate::{Element, WriteOptions, XmlError, XmlStore, load, parser};

/// An XML document whose root element is a `<node>`.
///
/// Build one with [`XmlDocument::new`] and fill it through
/// [`store`](XmlDocument::store), or read one with
/// [`parse`](XmlDocument::parse) and friends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
    root: Element,
}

impl Default for XmlDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl XmlDocument {
    /// Creates a document with an empty `<node name="_root_">` root.
    pub fn new() -> Self {
        Self {
            root: Element::new(NODE).with_attr(NAME_ATTR, ROOT_NAME),
        }
    }

    /// Wraps an existing element tree.
    pub fn from_root(root: Element) -> Self {
        Self { root }
    }

    /// Creates a document holding `persister`.
    pub fn from_persister(persister: &Persister) -> Result<Self, XmlError> {
        let mut doc = Self::new();
        doc.store().store(persister)?;
        Ok(doc)
    }

    /// Parses XML bytes.
    pub fn parse(input: &[u8]) -> Result<Self, XmlError> {
        Ok(Self {
            root: parser::parse(input)?,
        })
    }

    /// Parses an XML string.
    pub fn parse_str(input: &str) -> Result<Self, XmlError> {
        Self::parse(input.as_bytes())
    }

    /// Reads a reader to the end and parses its contents.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, XmlError> {
        let mut input = Vec::new();
        reader.read_to_end(&mut input)?;
        Self::parse(&input)
    }

    /// Reads and parses a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, XmlError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "reading XML file");
        Self::parse(&std::fs::read(path)?)
    }

    /// The root element.
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Returns a [`Store`](persister::Store) scoped to the root node.
    ///
    /// Values and children are appended to whatever the root already holds.
    pub fn store(&mut self) -> XmlStore<'_> {
        XmlStore::scoped(&mut self.root)
    }

    /// Rebuilds the persister tree this document describes.
    pub fn to_persister(&self) -> Result<Persister, XmlError> {
        load::load_root(&self.root)
    }

    /// Renders the document as text.
    pub fn render(&self, options: &WriteOptions) -> Result<String, XmlError> {
        let mut out = Vec::new();
        write_document(&self.root, options, &mut out)?;
        String::from_utf8(out).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e).into())
    }

    /// Writes the document to `writer`.
    pub fn write_to<W: Write>(&self, mut writer: W, options: &WriteOptions) -> Result<(), XmlError> {
        write_document(&self.root, options, &mut writer)?;
        Ok(())
    }

    /// Writes the document to a file, replacing any existing content.
    pub fn write_to_file(&self, path: impl AsRef<Path>, options: &WriteOptions) -> Result<(), XmlError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "writing XML file");
        self.write_to(BufWriter::new(File::create(path)?), options)
    }
}
