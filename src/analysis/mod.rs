//! Taint-propagation infrastructure.
//!
//! This module implements the core of the analyzer: a single linear forward
//! pass that tracks how values derive from one another and whether anything
//! returned by a `SOURCE` call reaches the checked argument of a `SINK`
//! call.
//!
//! # Architecture
//!
//! The analysis is organized into focused sub-modules:
//!
//! - [`origins`] - the origin map: variable-to-origin chains and resolution
//! - [`regions`] - conditional-region tracking for the sticky-store rule
//! - [`blocks`] - inert basic-block label bookkeeping
//! - [`engine`] - the per-instruction propagation rules and the driver
//!
//! # Usage
//!
//! ```rust
//! use flowscope::analysis::{TaintEngine, Verdict};
//!
//! let verdict = TaintEngine::analyze_lines([
//!     "%s = call i32 () @SOURCE()",
//!     "call void @SINK(i32 %s)",
//! ])?;
//! assert_eq!(verdict, Verdict::Flow);
//! # Ok::<(), flowscope::Error>(())
//! ```

pub mod blocks;
pub mod engine;
pub mod origins;
pub mod regions;

// Re-export primary types at module level
pub use blocks::BlockRegistry;
pub use engine::{FunctionContext, TaintEngine, Verdict, SINK_FN, SOURCE_FN};
pub use origins::{Origin, OriginMap};
pub use regions::{BlockCondition, RegionTracker};
