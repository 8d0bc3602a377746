//! Conditional-region tracking.
//!
//! The analyzer has no control-flow graph, so it approximates "this code is
//! under a condition" textually: a two-target branch records its true/false
//! labels as pending, and a later label line that matches one of them opens
//! a conditional region. The region spans only the instructions between that
//! label and the next label line - not the full set of blocks a real CFG
//! would consider dominated.
//!
//! The open block's status is an explicit three-state tag rather than a pair
//! of ad-hoc booleans: [`BlockCondition`] is computed once per label line and
//! held until the next one.

/// Condition status of the currently open block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockCondition {
    /// The block is not a recorded branch target.
    #[default]
    Unconditional,
    /// The block is the true-branch target of the most recent branch.
    TrueBranch,
    /// The block is the false-branch target of the most recent branch.
    FalseBranch,
}

/// Tracks pending branch targets and the open block's condition.
///
/// Lives across function boundaries: only a new branch replaces the pending
/// targets, and only a new label recomputes the condition tag.
#[derive(Debug, Clone, Default)]
pub struct RegionTracker {
    pending_true: Option<String>,
    pending_false: Option<String>,
    condition: BlockCondition,
}

impl RegionTracker {
    /// Creates a tracker with no pending targets and an unconditional block.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the targets of a two-target branch, replacing any previously
    /// pending pair. Only the most recently seen branch is tracked.
    pub fn record_branch(&mut self, true_label: &str, false_label: &str) {
        self.pending_true = Some(true_label.to_string());
        self.pending_false = Some(false_label.to_string());
    }

    /// Recomputes the condition tag for a newly opened block.
    ///
    /// The tag is `TrueBranch` or `FalseBranch` when `label` equals the
    /// corresponding pending target (true wins if both match), otherwise
    /// `Unconditional`. Returns the new tag.
    pub fn enter_block(&mut self, label: &str) -> BlockCondition {
        self.condition = if self.pending_true.as_deref() == Some(label) {
            BlockCondition::TrueBranch
        } else if self.pending_false.as_deref() == Some(label) {
            BlockCondition::FalseBranch
        } else {
            BlockCondition::Unconditional
        };
        self.condition
    }

    /// The condition tag of the currently open block.
    #[must_use]
    pub fn condition(&self) -> BlockCondition {
        self.condition
    }

    /// Returns `true` if the open block is a recorded branch target.
    #[must_use]
    pub fn in_conditional(&self) -> bool {
        self.condition != BlockCondition::Unconditional
    }
}
