//! Error types for the persister data model.

use core::fmt;

use crate::ValueKind;

/// Broad classification of a [`PersisterError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller passed an unusable argument, or asked for exactly one
    /// child where there were zero or several.
    InvalidArgument,
    /// A typed lookup found no value for the key.
    NotFound,
}

/// Error raised by [`Persister`](crate::Persister) operations.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PersisterError {
    /// A key was empty or contained a NUL character.
    InvalidKey {
        /// The offending key.
        key: String,
        /// The namespace the key was meant for.
        kind: ValueKind,
    },
    /// A string value contained a NUL character.
    InvalidValue {
        /// The key the value was meant for.
        key: String,
    },
    /// A child name was empty or contained a NUL character.
    InvalidChildName {
        /// The offending name.
        name: String,
    },
    /// `get_child` found a number of children other than one.
    ChildCount {
        /// The requested child name.
        name: String,
        /// How many children are registered under `name`.
        count: usize,
    },
    /// A typed `get` found no value for the key.
    NotFound {
        /// The missing key.
        key: String,
        /// The namespace that was searched.
        kind: ValueKind,
    },
}

impl PersisterError {
    /// Returns the broad classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PersisterError::NotFound { .. } => ErrorKind::NotFound,
            _ => ErrorKind::InvalidArgument,
        }
    }

    /// Returns a stable error code.
    pub fn code(&self) -> &'static str {
        match self {
            PersisterError::InvalidKey { .. } => "persister::invalid_key",
            PersisterError::InvalidValue { .. } => "persister::invalid_value",
            PersisterError::InvalidChildName { .. } => "persister::invalid_child_name",
            PersisterError::ChildCount { .. } => "persister::child_count",
            PersisterError::NotFound { .. } => "persister::not_found",
        }
    }
}

impl fmt::Display for PersisterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersisterError::InvalidKey { key, kind } => {
                write!(f, "invalid {kind} key {key:?}: keys must be non-empty and free of NUL")
            }
            PersisterError::InvalidValue { key } => {
                write!(f, "invalid string value for key '{key}': values must be free of NUL")
            }
            PersisterError::InvalidChildName { name } => {
                write!(f, "invalid child name {name:?}: names must be non-empty and free of NUL")
            }
            PersisterError::ChildCount { name, count } => {
                write!(f, "expected exactly 1 child named '{name}', found {count}")
            }
            PersisterError::NotFound { key, kind } => write!(f, "no such {kind}: {key}"),
        }
    }
}

impl std::error::Error for PersisterError {}
