#![warn(missing_docs)]
#![forbid(unsafe_code)]
//! A hierarchical, typed key-value tree meant to be externalized and restored.
//!
//! A [`Persister`] node holds four independent namespaces (strings, ints,
//! longs and doubles) plus any number of named children. Codecs implement
//! [`Store`] and receive the tree through [`Persister::store_in`] or the
//! [`StoreExt::store`] driver.
//!
//! ```
//! use persister::Persister;
//!
//! let mut root = Persister::new();
//! root.put_int("width", 800).unwrap();
//! root.put_string("width", "wide").unwrap();
//! let window = root.new_child("window").unwrap();
//! window.put_double("opacity", 0.75).unwrap();
//!
//! assert_eq!(root.get_int("width").unwrap(), 800);
//! assert_eq!(root.get_string("width").unwrap(), "wide");
//! assert_eq!(root.get_child("window").unwrap().get_double("opacity").unwrap(), 0.75);
//! assert_eq!(root.get_long_or("missing", -1), -1);
//! ```

mod tracing_macros;

mod error;
mod persister;
mod store;
mod value;

pub use error::{ErrorKind, PersisterError};
pub use persister::Persister;
pub use store::{Store, StoreExt, TreeStore};
pub use value::ValueKind;
