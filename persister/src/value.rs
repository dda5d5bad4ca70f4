use core::fmt;

/// One of the four independent value namespaces of a [`Persister`](crate::Persister).
///
/// Keys are scoped per kind: the same key may hold a string, an int, a long
/// and a double at the same time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValueKind {
    /// UTF-8 text.
    String,
    /// 32-bit signed integer.
    Int,
    /// 64-bit signed integer.
    Long,
    /// 64-bit float.
    Double,
}

impl ValueKind {
    /// All kinds, in the order a [`Persister`](crate::Persister) emits them to a store.
    pub const ALL: [ValueKind; 4] = [
        ValueKind::String,
        ValueKind::Int,
        ValueKind::Long,
        ValueKind::Double,
    ];

    /// Lowercase type name, as used in error messages.
    pub const fn name(self) -> &'static str {
        match self {
            ValueKind::String => "string",
            ValueKind::Int => "int",
            ValueKind::Long => "long",
            ValueKind::Double => "double",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
