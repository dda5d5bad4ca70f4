//! The [`Persister`] tree node.

use indexmap::IndexMap;
use indexmap::map::Entry;

use crate::tracing_macros::{debug, trace, trace_span};
use crate::{PersisterError, Store, ValueKind};

/// One node of a persisted tree.
///
/// A node holds four independent typed namespaces (strings, ints, longs and
/// doubles) and a multimap of named children. The namespaces never interfere:
/// `put_int("x", ..)` leaves a string stored under `"x"` untouched.
///
/// Children are owned by their parent. Several children may share a name;
/// they are kept in creation order, and names are kept in order of first
/// use.
///
/// Two nodes are equal when every namespace holds the same key/value pairs
/// (in any order) and every child name maps to equal children in the same
/// order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Persister {
    strings: IndexMap<String, String>,
    ints: IndexMap<String, i32>,
    longs: IndexMap<String, i64>,
    doubles: IndexMap<String, f64>,
    children: IndexMap<String, Vec<Persister>>,
}

fn validate_key(key: &str, kind: ValueKind) -> Result<(), PersisterError> {
    if key.is_empty() || key.contains('\0') {
        return Err(PersisterError::InvalidKey {
            key: key.to_owned(),
            kind,
        });
    }
    Ok(())
}

fn validate_child_name(name: &str) -> Result<(), PersisterError> {
    if name.is_empty() || name.contains('\0') {
        return Err(PersisterError::InvalidChildName {
            name: name.to_owned(),
        });
    }
    Ok(())
}

/// Generates the put/check/get/get_or/iter family for a `Copy` namespace.
macro_rules! numeric_namespace {
    (
        $field:ident, $ty:ty, $kind:expr,
        $put:ident, $check:ident, $get:ident, $get_or:ident, $iter:ident
    ) => {
        #[doc = concat!("Stores a `", stringify!($ty), "` under `key`, replacing any previous value in that namespace.")]
        pub fn $put(&mut self, key: impl Into<String>, value: $ty) -> Result<(), PersisterError> {
            let key = key.into();
            validate_key(&key, $kind)?;
            trace!(key = %key, kind = %$kind, "put");
            self.$field.insert(key, value);
            Ok(())
        }

        #[doc = concat!("Returns the `", stringify!($ty), "` stored under `key`, if any.")]
        pub fn $check(&self, key: &str) -> Option<$ty> {
            self.$field.get(key).copied()
        }

        #[doc = concat!("Returns the `", stringify!($ty), "` stored under `key`, or [`PersisterError::NotFound`].")]
        pub fn $get(&self, key: &str) -> Result<$ty, PersisterError> {
            self.$check(key).ok_or_else(|| PersisterError::NotFound {
                key: key.to_owned(),
                kind: $kind,
            })
        }

        #[doc = concat!("Returns the `", stringify!($ty), "` stored under `key`, or `default`.")]
        pub fn $get_or(&self, key: &str, default: $ty) -> $ty {
            self.$check(key).unwrap_or(default)
        }

        #[doc = concat!("Iterates the `", stringify!($ty), "` namespace in insertion order.")]
        pub fn $iter(&self) -> impl ExactSizeIterator<Item = (&str, $ty)> + '_ {
            self.$field.iter().map(|(k, v)| (k.as_str(), *v))
        }
    };
}

impl Persister {
    /// Creates an empty node.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if no namespace holds a value and there are no children.
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
            && self.ints.is_empty()
            && self.longs.is_empty()
            && self.doubles.is_empty()
            && self.children.is_empty()
    }

    /// Stores a string under `key`, replacing any previous string for that key.
    ///
    /// Fails without mutating anything if the key is empty or either the key
    /// or the value contains a NUL character.
    pub fn put_string(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), PersisterError> {
        let key = key.into();
        validate_key(&key, ValueKind::String)?;
        let value = value.into();
        if value.contains('\0') {
            return Err(PersisterError::InvalidValue { key });
        }
        trace!(key = %key, kind = "string", "put");
        self.strings.insert(key, value);
        Ok(())
    }

    /// Returns the string stored under `key`, if any.
    pub fn check_string(&self, key: &str) -> Option<&str> {
        self.strings.get(key).map(String::as_str)
    }

    /// Returns the string stored under `key`, or [`PersisterError::NotFound`].
    pub fn get_string(&self, key: &str) -> Result<&str, PersisterError> {
        self.check_string(key)
            .ok_or_else(|| PersisterError::NotFound {
                key: key.to_owned(),
                kind: ValueKind::String,
            })
    }

    /// Returns the string stored under `key`, or `default`.
    pub fn get_string_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.check_string(key).unwrap_or(default)
    }

    /// Iterates the string namespace in insertion order.
    pub fn strings(&self) -> impl ExactSizeIterator<Item = (&str, &str)> + '_ {
        self.strings.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    numeric_namespace!(
        ints, i32, ValueKind::Int,
        put_int, check_int, get_int, get_int_or, ints
    );

    numeric_namespace!(
        longs, i64, ValueKind::Long,
        put_long, check_long, get_long, get_long_or, longs
    );

    numeric_namespace!(
        doubles, f64, ValueKind::Double,
        put_double, check_double, get_double, get_double_or, doubles
    );

    /// Creates an empty child registered under `name` and returns it.
    ///
    /// Repeated calls with the same name append further children; they are
    /// returned by [`get_children`](Self::get_children) in creation order.
    pub fn new_child(&mut self, name: impl Into<String>) -> Result<&mut Persister, PersisterError> {
        let name = name.into();
        validate_child_name(&name)?;
        trace!(name = %name, "new child");
        let siblings = match self.children.entry(name) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(Vec::new()),
        };
        siblings.push(Persister::new());
        let idx = siblings.len() - 1;
        Ok(&mut siblings[idx])
    }

    /// Returns the children registered under `name`, in creation order.
    ///
    /// Unknown names yield an empty slice.
    pub fn get_children(&self, name: &str) -> &[Persister] {
        self.children.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Mutable counterpart of [`get_children`](Self::get_children).
    pub fn get_children_mut(&mut self, name: &str) -> &mut [Persister] {
        match self.children.get_mut(name) {
            Some(children) => children.as_mut_slice(),
            None => &mut [],
        }
    }

    /// Returns the only child registered under `name`.
    ///
    /// Fails with [`PersisterError::ChildCount`] when there are zero or
    /// several such children.
    pub fn get_child(&self, name: &str) -> Result<&Persister, PersisterError> {
        match self.get_children(name) {
            [only] => Ok(only),
            others => Err(PersisterError::ChildCount {
                name: name.to_owned(),
                count: others.len(),
            }),
        }
    }

    /// Mutable counterpart of [`get_child`](Self::get_child).
    pub fn get_child_mut(&mut self, name: &str) -> Result<&mut Persister, PersisterError> {
        match self.get_children_mut(name) {
            [only] => Ok(only),
            others => Err(PersisterError::ChildCount {
                name: name.to_owned(),
                count: others.len(),
            }),
        }
    }

    /// Iterates the distinct child names in order of first use.
    pub fn child_names(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.children.keys().map(String::as_str)
    }

    /// Iterates every `(name, child)` pair: names in order of first use, and
    /// children of one name in creation order.
    pub fn children(&self) -> impl Iterator<Item = (&str, &Persister)> + '_ {
        self.children
            .iter()
            .flat_map(|(name, kids)| kids.iter().map(move |kid| (name.as_str(), kid)))
    }

    /// Externalizes this node and its subtree into `store`.
    ///
    /// Values are written namespace by namespace (strings, ints, longs,
    /// doubles), each in insertion order. Children follow, each one written
    /// into a fresh scope obtained from [`Store::new_child`].
    pub fn store_in<S: Store>(&self, store: &mut S) -> Result<(), S::Error> {
        trace_span!("store_in");
        debug!(
            strings = self.strings.len(),
            ints = self.ints.len(),
            longs = self.longs.len(),
            doubles = self.doubles.len(),
            children = self.children.len(),
            "storing node"
        );

        for (key, value) in &self.strings {
            store.put_string(key, value)?;
        }
        for (key, value) in &self.ints {
            store.put_int(key, *value)?;
        }
        for (key, value) in &self.longs {
            store.put_long(key, *value)?;
        }
        for (key, value) in &self.doubles {
            store.put_double(key, *value)?;
        }

        for (name, child) in self.children() {
            let mut scope = store.new_child(name)?;
            child.store_in(&mut scope)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn put_replaces_only_within_namespace() {
        let mut p = Persister::new();
        p.put_int("x", 1).unwrap();
        p.put_string("x", "a").unwrap();
        p.put_int("x", 2).unwrap();
        assert_eq!(p.get_int("x").unwrap(), 2);
        assert_eq!(p.get_string("x").unwrap(), "a");
        assert_eq!(p.ints().len(), 1);
    }

    #[test]
    fn rejected_put_leaves_node_untouched() {
        let mut p = Persister::new();
        assert!(p.put_long("", 7).is_err());
        assert!(p.put_string("k", "nul\0inside").is_err());
        assert!(p.is_empty());
    }

    #[test]
    fn child_count_error_reports_actual_count() {
        let mut p = Persister::new();
        for _ in 0..3 {
            p.new_child("c").unwrap();
        }
        let err = p.get_child("c").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(err, PersisterError::ChildCount { name: "c".into(), count: 3 });
        assert_eq!(err.to_string(), "expected exactly 1 child named 'c', found 3");
    }

    #[test]
    fn children_iterates_by_first_use_then_creation() {
        let mut p = Persister::new();
        p.new_child("b").unwrap().put_int("i", 0).unwrap();
        p.new_child("a").unwrap().put_int("i", 1).unwrap();
        p.new_child("b").unwrap().put_int("i", 2).unwrap();

        let order: Vec<(&str, i32)> = p
            .children()
            .map(|(name, child)| (name, child.get_int("i").unwrap()))
            .collect();
        assert_eq!(order, vec![("b", 0), ("b", 2), ("a", 1)]);
        assert_eq!(p.child_names().collect::<Vec<_>>(), vec!["b", "a"]);
    }

    #[test]
    fn equality_ignores_value_order_but_not_child_order() {
        let mut a = Persister::new();
        a.put_int("x", 1).unwrap();
        a.put_int("y", 2).unwrap();
        let mut b = Persister::new();
        b.put_int("y", 2).unwrap();
        b.put_int("x", 1).unwrap();
        assert_eq!(a, b);

        a.new_child("c").unwrap().put_string("n", "first").unwrap();
        a.new_child("c").unwrap().put_string("n", "second").unwrap();
        b.new_child("c").unwrap().put_string("n", "second").unwrap();
        b.new_child("c").unwrap().put_string("n", "first").unwrap();
        assert_ne!(a, b);
    }
}
