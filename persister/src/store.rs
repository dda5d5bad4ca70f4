//! The write-only sink a [`Persister`] externalizes itself into.

use crate::{Persister, PersisterError};

/// A tree-shaped, write-only target for [`Persister::store_in`].
///
/// Each instance is one scope. Values written through it belong to that
/// scope's node, and [`new_child`](Store::new_child) opens a fresh scope for
/// a single child. Sibling scopes never share state, even when they carry the
/// same name.
pub trait Store {
    /// Error raised when the sink cannot accept a value or a child.
    type Error;

    /// The scope returned by [`new_child`](Store::new_child).
    type Child<'a>: Store<Error = Self::Error>
    where
        Self: 'a;

    /// Records a string value in this scope.
    fn put_string(&mut self, key: &str, value: &str) -> Result<(), Self::Error>;

    /// Records an int value in this scope.
    fn put_int(&mut self, key: &str, value: i32) -> Result<(), Self::Error>;

    /// Records a long value in this scope.
    fn put_long(&mut self, key: &str, value: i64) -> Result<(), Self::Error>;

    /// Records a double value in this scope.
    fn put_double(&mut self, key: &str, value: f64) -> Result<(), Self::Error>;

    /// Opens a new scope for a child called `name`.
    fn new_child(&mut self, name: &str) -> Result<Self::Child<'_>, Self::Error>;
}

/// The traversal driver, available on every [`Store`].
///
/// Implemented once for all stores so the traversal itself stays fixed.
pub trait StoreExt: Store {
    /// Writes `persister` and its whole subtree into this store.
    fn store(&mut self, persister: &Persister) -> Result<(), Self::Error>;
}

impl<S: Store> StoreExt for S {
    fn store(&mut self, persister: &Persister) -> Result<(), Self::Error> {
        persister.store_in(self)
    }
}

/// A [`Store`] that rebuilds the traversed tree inside another [`Persister`].
///
/// Storing a tree into an empty target leaves the target equal to the
/// source.
///
/// ```
/// use persister::{Persister, StoreExt, TreeStore};
///
/// let mut source = Persister::new();
/// source.put_int("x", 42).unwrap();
/// source.new_child("c").unwrap().put_string("fruit", "apple").unwrap();
///
/// let mut copy = Persister::new();
/// TreeStore::new(&mut copy).store(&source).unwrap();
/// assert_eq!(copy, source);
/// ```
#[derive(Debug)]
pub struct TreeStore<'p> {
    target: &'p mut Persister,
}

impl<'p> TreeStore<'p> {
    /// Creates a store writing into `target`.
    pub fn new(target: &'p mut Persister) -> Self {
        Self { target }
    }
}

impl Store for TreeStore<'_> {
    type Error = PersisterError;
    type Child<'a>
        = TreeStore<'a>
    where
        Self: 'a;

    fn put_string(&mut self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.target.put_string(key, value)
    }

    fn put_int(&mut self, key: &str, value: i32) -> Result<(), Self::Error> {
        self.target.put_int(key, value)
    }

    fn put_long(&mut self, key: &str, value: i64) -> Result<(), Self::Error> {
        self.target.put_long(key, value)
    }

    fn put_double(&mut self, key: &str, value: f64) -> Result<(), Self::Error> {
        self.target.put_double(key, value)
    }

    fn new_child(&mut self, name: &str) -> Result<Self::Child<'_>, Self::Error> {
        Ok(TreeStore::new(self.target.new_child(name)?))
    }
}
