//! # flowscope Prelude
//!
//! This module provides a convenient prelude for the most commonly used types
//! from the flowscope library. Import this module to get quick access to the
//! essential types for running a taint analysis.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all flowscope operations
pub use crate::Error;

/// The result type used throughout flowscope
pub use crate::Result;

// ================================================================================================
// Main Entry Points
// ================================================================================================

/// The taint engine driving the forward pass
pub use crate::analysis::TaintEngine;

/// The final analysis verdict
pub use crate::analysis::Verdict;

// ================================================================================================
// Analysis State
// ================================================================================================

/// Per-function analysis state
pub use crate::analysis::FunctionContext;

/// Origin chains and their resolution
pub use crate::analysis::{Origin, OriginMap};

/// Conditional-region tracking
pub use crate::analysis::{BlockCondition, RegionTracker};

/// The designated sensitive callee names
pub use crate::analysis::{SINK_FN, SOURCE_FN};

// ================================================================================================
// Textual IR Front End
// ================================================================================================

/// Line classification into typed instruction records
pub use crate::ir::{classify, BinOp, Instruction, Operand, PhiIncoming};
