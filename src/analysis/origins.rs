//! Origin map: variable-to-origin bookkeeping with chain resolution.
//!
//! Every propagation rule in the taint engine funnels through this map. A
//! variable's recorded entry is one link of a chain: either the `SOURCE`
//! sentinel, the variable itself (freshly defined, untainted), or another
//! variable to follow. [`OriginMap::resolve`] walks a chain to its root;
//! [`OriginMap::set`] overwrites a link unconditionally.
//!
//! Resolution is deliberately unmemoized - each call re-walks the full chain.
//! Chain length is bounded by the number of writes the pass has made, so the
//! walk stays cheap at the scale of one function.

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::{Error, Result};

/// A resolved origin: the root a value ultimately derives from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    /// The value derives from a `SOURCE` call - it is tainted.
    Source,
    /// The value derives from the named token: a root variable or a literal.
    Token(String),
}

impl Origin {
    /// Returns `true` if this origin is the `SOURCE` sentinel.
    #[must_use]
    pub fn is_source(&self) -> bool {
        matches!(self, Origin::Source)
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Source => f.write_str("SOURCE"),
            Origin::Token(t) => f.write_str(t),
        }
    }
}

/// Mapping from variable identifiers to their recorded origins.
///
/// Entries form chains (`%y -> %x -> %slot`) that [`resolve`](Self::resolve)
/// walks to a root. Unmapped tokens - including numeric literals - resolve to
/// themselves, so the map never needs to be seeded.
///
/// As written by the forward pass no chain can contain a cycle (every link
/// points at state recorded strictly earlier), but resolution still guards
/// against one and fails closed if the invariant is ever broken.
#[derive(Debug, Clone, Default)]
pub struct OriginMap {
    entries: HashMap<String, Origin>,
}

impl OriginMap {
    /// Creates an empty origin map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `origin` for `var`, overwriting any previous entry.
    pub fn set(&mut self, var: &str, origin: Origin) {
        log::debug!("origin updated: {var} <- {origin}");
        self.entries.insert(var.to_string(), origin);
    }

    /// Resolves `var` to its root origin by walking the recorded chain.
    ///
    /// - An unmapped token resolves to itself. This covers both variables the
    ///   pass never wrote and literal tokens.
    /// - A self-mapping terminates the walk: the variable is its own origin.
    /// - The `SOURCE` sentinel terminates the walk as [`Origin::Source`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::OriginCycle`] if the walk revisits a variable. The
    /// forward pass never records such a chain; hitting this means the map
    /// was corrupted, and resolution fails closed instead of looping.
    pub fn resolve(&self, var: &str) -> Result<Origin> {
        let mut visited: HashSet<&str> = HashSet::new();
        let mut current = var;

        loop {
            match self.entries.get(current) {
                None => return Ok(Origin::Token(current.to_string())),
                Some(Origin::Source) => return Ok(Origin::Source),
                Some(Origin::Token(next)) => {
                    if next == current {
                        return Ok(Origin::Token(current.to_string()));
                    }
                    if !visited.insert(current) {
                        return Err(Error::OriginCycle(var.to_string()));
                    }
                    current = next;
                }
            }
        }
    }

    /// Number of recorded entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no entry has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
