//! Inert basic-block label registry.
//!
//! Records the labels seen in the current function and the order they were
//! first encountered. The taint engine never consults this registry during
//! propagation - it exists purely as pass-through bookkeeping, and as the
//! extension point a genuine control-flow graph would grow out of. No edges
//! or per-block instruction lists are kept.

use std::collections::HashMap;

/// Label-to-insertion-index registry for one function.
///
/// A fresh registry is created for every function definition; the function
/// name itself is registered first as the initial pseudo-block.
#[derive(Debug, Clone, Default)]
pub struct BlockRegistry {
    indices: HashMap<String, usize>,
    next_index: usize,
}

impl BlockRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `label` and returns its insertion index.
    ///
    /// Re-registering an already-seen label assigns it a fresh index, the
    /// same way the insertion counter treats every label line.
    pub fn register(&mut self, label: &str) -> usize {
        let index = self.next_index;
        self.next_index += 1;
        self.indices.insert(label.to_string(), index);
        index
    }

    /// Returns the insertion index recorded for `label`, if any.
    #[must_use]
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.indices.get(label).copied()
    }

    /// Number of distinct registered labels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Returns `true` if no label has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}
