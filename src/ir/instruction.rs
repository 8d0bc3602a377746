//! Typed instruction records for the textual IR front end.
//!
//! A raw input line is turned into exactly one [`Instruction`] variant by the
//! [`classifier`](crate::ir::classifier), or dropped entirely when it matches
//! nothing. The records carry only what the taint engine consumes: variable
//! tokens keep their `%` sigil, literals stay as the bare text that appeared
//! in the line, and types are discarded during classification.

use std::fmt;

use strum::{Display, EnumString};

/// A value position in an instruction: either an IR register/stack slot or a
/// literal constant.
///
/// The distinction matters for propagation: variable operands are resolved
/// through the origin map, while literal operands pass through as their own
/// textual value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    /// A variable token, sigil included (e.g. `%x`).
    Var(String),
    /// A literal token (e.g. `42`).
    Literal(String),
}

impl Operand {
    /// Classifies a raw token by its sigil: `%`-prefixed tokens are variables,
    /// everything else is a literal.
    #[must_use]
    pub fn from_token(token: &str) -> Self {
        if token.starts_with('%') {
            Operand::Var(token.to_string())
        } else {
            Operand::Literal(token.to_string())
        }
    }

    /// Returns `true` if this operand names a variable.
    #[must_use]
    pub fn is_var(&self) -> bool {
        matches!(self, Operand::Var(_))
    }

    /// Returns the raw token text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Operand::Var(s) | Operand::Literal(s) => s,
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The four binary arithmetic opcodes the analyzer understands.
///
/// All four propagate taint identically; the opcode is retained for
/// diagnostics only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum BinOp {
    /// Integer addition.
    Add,
    /// Integer subtraction.
    Sub,
    /// Integer multiplication.
    Mul,
    /// Integer division.
    Div,
}

/// One incoming value of a phi node: the merged value and the predecessor
/// block label it arrives from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhiIncoming {
    /// The merged value, variable or literal.
    pub value: Operand,
    /// The predecessor block label, sigil stripped.
    pub block: String,
}

/// A classified input line.
///
/// Each variant corresponds to one grammar the classifier recognizes. Lines
/// that match no grammar produce no record at all, so there is no `Other`
/// variant here; "ignored" is represented by the classifier returning `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// `define ... @Name(...)` - opens a new function scope.
    FunctionDef {
        /// The function name, `@` sigil stripped.
        name: String,
    },

    /// `Label:` - opens a new basic block.
    Label {
        /// The block label, trailing `:` stripped.
        name: String,
    },

    /// `%v = alloca T` - a fresh, untainted stack slot.
    Alloca {
        /// The defined variable.
        dst: String,
    },

    /// `%dst = load T, ptr %src` - a copy out of a slot.
    Load {
        /// The defined variable.
        dst: String,
        /// The slot being read.
        src: String,
    },

    /// `store T %src, ptr %dst` - a copy into a slot.
    Store {
        /// The stored value, variable or literal.
        src: Operand,
        /// The slot being written.
        dst: String,
    },

    /// `%dst = op T %a, %b` for `op` in add/sub/mul/div.
    Binary {
        /// The arithmetic opcode.
        op: BinOp,
        /// The defined variable.
        dst: String,
        /// The first operand.
        lhs: Operand,
        /// The second operand.
        rhs: Operand,
    },

    /// `call` with or without an assigned result.
    Call {
        /// The assigned variable, when the call form is `%dst = call ...`.
        dst: Option<String>,
        /// The callee name, `@` sigil stripped.
        callee: String,
        /// The variable tokens that appeared in the argument list, in order.
        /// Literal arguments are dropped during classification.
        args: Vec<String>,
    },

    /// `%dst = phi T [v, %l] [, [v, %l]]` - a control-flow merge.
    Phi {
        /// The defined variable.
        dst: String,
        /// The incoming values, at most two.
        incomings: Vec<PhiIncoming>,
    },

    /// `br T %cond, label %lt, label %lf` - a two-target branch.
    CondBr {
        /// The branch condition variable.
        cond: String,
        /// The taken-when-true label, sigil stripped.
        true_label: String,
        /// The taken-when-false label, sigil stripped.
        false_label: String,
    },

    /// `br label %x` - an unconditional jump. Carried for completeness; has
    /// no effect on taint state.
    Br {
        /// The jump target label, sigil stripped.
        target: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operand_from_token_sigil() {
        assert_eq!(
            Operand::from_token("%x"),
            Operand::Var("%x".to_string())
        );
        assert_eq!(Operand::from_token("42"), Operand::Literal("42".to_string()));
        assert!(Operand::from_token("%x").is_var());
        assert!(!Operand::from_token("42").is_var());
    }

    #[test]
    fn test_binop_from_keyword() {
        assert_eq!("add".parse::<BinOp>().unwrap(), BinOp::Add);
        assert_eq!("sub".parse::<BinOp>().unwrap(), BinOp::Sub);
        assert_eq!("mul".parse::<BinOp>().unwrap(), BinOp::Mul);
        assert_eq!("div".parse::<BinOp>().unwrap(), BinOp::Div);
        assert!("xor".parse::<BinOp>().is_err());
    }

    #[test]
    fn test_binop_display_roundtrip() {
        assert_eq!(BinOp::Mul.to_string(), "mul");
    }
}
