// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]

//! # flowscope
//!
//! An intraprocedural taint-propagation analyzer over a textual, LLVM-style
//! IR instruction stream. flowscope tracks whether a value returned by a
//! designated `SOURCE` call can reach the first argument of a designated
//! `SINK` call - through copies, loads and stores, arithmetic, and
//! control-flow merges - and reports a single binary verdict.
//!
//! ## Features
//!
//! - **Single forward pass** - each line is classified and fully processed
//!   before the next is read; no fixed-point iteration
//! - **Origin chains** - every value resolves to the root it derives from,
//!   with a cycle guard that fails closed on corrupted state
//! - **Sticky conditional taint** - a slot tainted before a branch cannot be
//!   cleared by a store inside a recorded branch target, conservatively
//!   approximating a merge join without a control-flow graph
//! - **Permissive front end** - unrecognized or malformed lines are no-ops,
//!   never errors
//!
//! ## Quick Start
//!
//! Add `flowscope` to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! flowscope = "0.1"
//! ```
//!
//! ### Using the Prelude
//!
//! For convenient access to the most commonly used types, import the prelude:
//!
//! ```rust
//! use flowscope::prelude::*;
//!
//! let verdict = TaintEngine::analyze_lines([
//!     "define i32 @main() {",
//!     "%x = alloca i32",
//!     "%s = call i32 () @SOURCE()",
//!     "store i32 %s, ptr %x",
//!     "%y = load i32, ptr %x",
//!     "call void @SINK(i32 %y)",
//!     "}",
//! ])?;
//! println!("{}", verdict); // "Flow."
//! # Ok::<(), flowscope::Error>(())
//! ```
//!
//! ### Analyzing a File
//!
//! ```rust,no_run
//! use flowscope::TaintEngine;
//! use std::path::Path;
//!
//! let verdict = TaintEngine::analyze_file(Path::new("program.ll"))?;
//! println!("{}", verdict);
//! # Ok::<(), flowscope::Error>(())
//! ```
//!
//! ## Architecture
//!
//! `flowscope` is organized into several key modules:
//!
//! - [`ir`] - the textual front end: line classification into typed
//!   [`ir::Instruction`] records
//! - [`analysis`] - the taint engine: origin chains, conditional regions,
//!   per-instruction propagation, and the verdict
//! - [`prelude`] - convenient re-exports of commonly used types
//! - [`Error`] and [`Result`] - comprehensive error handling
//!
//! ## Scope and Soundness
//!
//! The analysis is intraprocedural and purely textual: program text order
//! stands in for execution order, there is no control-flow graph, no alias
//! analysis beyond direct variable-to-variable copies, and no notion of path
//! feasibility. The verdict spans the whole input - a flow detected in any
//! function of a multi-function file yields `"Flow."`.

pub mod analysis;
pub mod ir;
pub mod prelude;

mod error;

/// The result type used throughout flowscope.
pub type Result<T> = std::result::Result<T, Error>;

/// The error type covering every failure this library can return.
///
/// See [`error::Error`] variants for the failure modes: I/O failures while
/// reading input, and internal-consistency failures during origin
/// resolution.
pub use error::Error;

/// Main entry point for running a taint analysis.
///
/// See [`analysis::TaintEngine`] for the driver API: line-, reader-, and
/// file-based passes plus incremental stepping.
///
/// # Example
///
/// ```rust,no_run
/// use flowscope::TaintEngine;
/// let verdict = TaintEngine::analyze_file(std::path::Path::new("program.ll"))?;
/// println!("{}", verdict);
/// # Ok::<(), flowscope::Error>(())
/// ```
pub use analysis::TaintEngine;

/// The binary analysis verdict, rendering as `"Flow."` or `"No Flow."`.
pub use analysis::Verdict;
