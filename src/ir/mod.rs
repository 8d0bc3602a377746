//! Textual IR front end.
//!
//! This module turns raw lines of a simplified LLVM-style textual IR into
//! typed [`Instruction`] records the taint engine can consume. It is a
//! mechanical lexer: one line in, at most one record out, no state carried
//! between lines.
//!
//! # Architecture
//!
//! - [`instruction`] - the typed records: [`Instruction`], [`Operand`],
//!   [`BinOp`], [`PhiIncoming`]
//! - [`classifier`] - keyword-priority dispatch plus per-kind grammars
//!
//! # Usage
//!
//! ```rust
//! use flowscope::ir::{classify, Instruction};
//!
//! let instr = classify("%x = alloca i32");
//! assert!(matches!(instr, Some(Instruction::Alloca { .. })));
//! assert!(classify("ret i32 0").is_none());
//! ```

pub mod classifier;
pub mod instruction;

// Re-export primary types at module level
pub use classifier::classify;
pub use instruction::{BinOp, Instruction, Operand, PhiIncoming};
