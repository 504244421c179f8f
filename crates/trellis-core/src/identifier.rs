//! Identifier management using string interning for efficient storage and comparison.
//!
//! This module provides the [`Id`] type with an efficient string-interner based
//! approach, plus the [`IdAllocator`] that mints fresh node and edge identifiers.

use std::{
    fmt,
    sync::{Mutex, OnceLock},
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner for efficient identifier storage.
///
/// # Thread Safety
///
/// This uses `Mutex` for thread-safe access to the string interner.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn interner() -> &'static Mutex<DefaultStringInterner> {
    INTERNER.get_or_init(|| Mutex::new(DefaultStringInterner::new()))
}

/// Efficient identifier type using string interning.
///
/// Identifiers are opaque: equality and hashing work on the interned symbol,
/// and the textual form is only materialized for display and serialization.
///
/// # Examples
///
/// ```
/// use trellis_core::identifier::Id;
///
/// let a = Id::new("n1");
/// let b = Id::new("n1");
/// assert_eq!(a, b);
/// assert_eq!(a.resolve(), "n1");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Creates an `Id` from a string, interning it if necessary.
    pub fn new(name: &str) -> Self {
        let mut interner = interner().lock().expect("Failed to acquire interner lock");
        Self(interner.get_or_intern(name))
    }

    /// Returns the textual form of this identifier.
    pub fn resolve(&self) -> String {
        let interner = interner().lock().expect("Failed to acquire interner lock");
        interner
            .resolve(self.0)
            .expect("Symbol was interned by Id::new")
            .to_string()
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.resolve())
    }
}

impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.resolve())
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Id::new(&name))
    }
}

/// Mints fresh node (`n<k>`) and edge (`e<k>`) identifiers.
///
/// Each parse pass owns its own allocator, so identifiers are unique within a
/// document snapshot. A controller that mutates an existing snapshot re-seeds
/// its allocator with [`IdAllocator::seed`] so newly created entities never
/// collide with parsed ones.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    next_node: u64,
    next_edge: u64,
}

impl IdAllocator {
    /// Creates an allocator starting at `n1` / `e1`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a fresh node identifier.
    pub fn node_id(&mut self) -> Id {
        self.next_node += 1;
        Id::new(&format!("n{}", self.next_node))
    }

    /// Returns a fresh edge identifier.
    pub fn edge_id(&mut self) -> Id {
        self.next_edge += 1;
        Id::new(&format!("e{}", self.next_edge))
    }

    /// Advances the counters past every `n<k>` / `e<k>` identifier in `ids`.
    ///
    /// Identifiers in other shapes are ignored; they cannot collide with the
    /// allocator's output.
    pub fn seed<I: IntoIterator<Item = Id>>(&mut self, ids: I) {
        for id in ids {
            let name = id.resolve();
            if let Some(ordinal) = name
                .strip_prefix('n')
                .and_then(|rest| rest.parse::<u64>().ok())
            {
                self.next_node = self.next_node.max(ordinal);
            }
            if let Some(ordinal) = name
                .strip_prefix('e')
                .and_then(|rest| rest.parse::<u64>().ok())
            {
                self.next_edge = self.next_edge.max(ordinal);
            }
        }
    }
}
