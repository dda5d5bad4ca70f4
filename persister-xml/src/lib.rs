#![warn(missing_docs)]
#![deny(unsafe_code)]
//! XML store and loader for [`persister`] trees.
//!
//! A tree is written as nested `<node>` elements. Each node groups its
//! values by type under `<strings>`, `<ints>`, `<longs>` and `<doubles>`,
//! one element per key, and lists its children as nested
//! `<node name="...">` elements:
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <node name="_root_">
//!   <strings>
//!     <fruit>apple</fruit>
//!   </strings>
//!   <ints>
//!     <x>42</x>
//!   </ints>
//!   <node name="c">
//!     <doubles>
//!       <w>0.5</w>
//!     </doubles>
//!   </node>
//! </node>
//! ```
//!
//! Loading a written document yields a tree equal to the one written.
//! Whitespace at the edges of a value is written as character references
//! (`&#32;`), since whitespace written literally there is layout and is
//! trimmed when loading.
//!
//! ```
//! use persister::Persister;
//!
//! let mut tree = Persister::new();
//! tree.put_int("x", 42).unwrap();
//! tree.new_child("c").unwrap().put_double("w", 0.5).unwrap();
//!
//! let xml = persister_xml::to_string(&tree).unwrap();
//! let restored = persister_xml::from_str(&xml).unwrap();
//! assert_eq!(restored, tree);
//! ```

mod tracing_macros;

mod document;
mod element;
mod error;
mod escaping;
mod load;
mod parser;
mod store;
mod writer;

use std::io::{Read, Write};
use std::path::Path;

use persister::Persister;

pub use document::XmlDocument;
pub use element::{Content, Element};
pub use error::{XmlError, XmlErrorKind};
pub use store::XmlStore;
pub use writer::WriteOptions;

/// Serialize a tree to an XML string with default options.
pub fn to_string(persister: &Persister) -> Result<String, XmlError> {
    to_string_with_options(persister, &WriteOptions::default())
}

/// Serialize a tree to an XML string with custom options.
pub fn to_string_with_options(
    persister: &Persister,
    options: &WriteOptions,
) -> Result<String, XmlError> {
    XmlDocument::from_persister(persister)?.render(options)
}

/// Serialize a tree as XML into `writer`.
pub fn to_writer<W: Write>(persister: &Persister, writer: W) -> Result<(), XmlError> {
    XmlDocument::from_persister(persister)?.write_to(writer, &WriteOptions::default())
}

/// Serialize a tree as XML into a file, replacing any existing content.
pub fn to_file(persister: &Persister, path: impl AsRef<Path>) -> Result<(), XmlError> {
    XmlDocument::from_persister(persister)?.write_to_file(path, &WriteOptions::default())
}

/// Load a tree from an XML string.
pub fn from_str(input: &str) -> Result<Persister, XmlError> {
    from_slice(input.as_bytes())
}

/// Load a tree from XML bytes.
pub fn from_slice(input: &[u8]) -> Result<Persister, XmlError> {
    XmlDocument::parse(input)?.to_persister()
}

/// Load a tree from a reader, reading it to the end.
pub fn from_reader<R: Read>(reader: R) -> Result<Persister, XmlError> {
    XmlDocument::from_reader(reader)?.to_persister()
}

/// Load a tree from an XML file.
pub fn from_file(path: impl AsRef<Path>) -> Result<Persister, XmlError> {
    XmlDocument::from_file(path)?.to_persister()
}

/// Load a tree from an already parsed document.
pub fn from_document(document: &XmlDocument) -> Result<Persister, XmlError> {
    document.to_persister()
}
