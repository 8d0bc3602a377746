//! Keyword-priority line classifier.
//!
//! Turns one raw input line into a typed [`Instruction`] record, or `None`
//! when the line matches nothing the analyzer understands. Classification is
//! a two-step process:
//!
//! 1. A keyword scan picks the candidate instruction kind. The scan order is
//!    fixed (function definition, label, store, load, alloca, arithmetic,
//!    call, phi, branch) and the first keyword hit wins.
//! 2. The full grammar for that kind is matched. A line that carries the
//!    keyword but fails the grammar classifies as nothing at all - permissive
//!    recovery that turns malformed lines into no-ops instead of errors.
//!
//! The scan order is observable: a call to a callee whose name embeds an
//! arithmetic keyword (e.g. `@addUser`) is claimed by the arithmetic scan,
//! fails its grammar, and is dropped. Callers relying on such lines must not
//! expect them to reach the taint engine.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::ir::instruction::{BinOp, Instruction, Operand, PhiIncoming};

static DEFINE_NAME_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"@(\w+)").unwrap());

static ALLOCA_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(%\w+)\s*=\s*alloca\s+(\w+)").unwrap());

static LOAD_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(%\w+)\s*=\s*load\s+\w+, ptr\s+(%\w+)").unwrap());

static STORE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^store\s+\w+\s+([\w%]+),\s*ptr\s+(%\w+)").unwrap());

static BINARY_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(%\w+)\s*=\s*(add|sub|mul|div)\s+\w+\s+([\w%]+),\s*([\w%]+)").unwrap()
});

static CALL_ASSIGN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(%\w+)\s*=\s*call\s+\w+\s+(?:\([^)]*\)\*?\s+)?@(\w+)\((.*)\)").unwrap()
});

static CALL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^call\s+\w+\s+(?:\([^)]*\)\*?\s+)?@(\w+)\((.*)\)").unwrap());

static ARG_VAR_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"%\w+").unwrap());

static PHI_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(%\w+)\s*=\s*phi\s+\w+\s+\[(%\w+|\d+),\s*%(\w+)\](?:,\s+\[(%\w+|\d+),\s*%(\w+)\])?")
        .unwrap()
});

static COND_BR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^br\s+\w+\s+(%\w+),\s+label\s+%(\w+),\s+label\s+%(\w+)").unwrap()
});

static BR_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^br\s+label\s+%(\w+)").unwrap());

/// Classifies one raw input line.
///
/// Returns the typed record for the line, or `None` when the line is empty,
/// unrecognized, or matches an instruction keyword without satisfying the
/// full grammar.
#[must_use]
pub fn classify(raw: &str) -> Option<Instruction> {
    let line = raw.trim();
    if line.is_empty() {
        return None;
    }

    if line.starts_with("define") {
        return classify_define(line);
    }
    if let Some(name) = line.strip_suffix(':') {
        return Some(Instruction::Label {
            name: name.to_string(),
        });
    }
    if line.contains("store") {
        return classify_store(line);
    }
    if line.contains("load") {
        return classify_load(line);
    }
    if line.contains("alloca") {
        return classify_alloca(line);
    }
    if ["add", "sub", "mul", "div"].iter().any(|op| line.contains(op)) {
        return classify_binary(line);
    }
    if line.contains("call") {
        return classify_call(line);
    }
    if line.contains("phi") {
        return classify_phi(line);
    }
    if line.contains("br label") {
        return classify_br(line);
    }
    if line.contains("br") {
        return classify_cond_br(line);
    }

    None
}

fn classify_define(line: &str) -> Option<Instruction> {
    let caps = DEFINE_NAME_REGEX.captures(line)?;
    Some(Instruction::FunctionDef {
        name: caps[1].to_string(),
    })
}

fn classify_store(line: &str) -> Option<Instruction> {
    let caps = STORE_REGEX.captures(line)?;
    Some(Instruction::Store {
        src: Operand::from_token(&caps[1]),
        dst: caps[2].to_string(),
    })
}

fn classify_load(line: &str) -> Option<Instruction> {
    let caps = LOAD_REGEX.captures(line)?;
    Some(Instruction::Load {
        dst: caps[1].to_string(),
        src: caps[2].to_string(),
    })
}

fn classify_alloca(line: &str) -> Option<Instruction> {
    let caps = ALLOCA_REGEX.captures(line)?;
    Some(Instruction::Alloca {
        dst: caps[1].to_string(),
    })
}

fn classify_binary(line: &str) -> Option<Instruction> {
    let caps = BINARY_REGEX.captures(line)?;
    let op = caps[2].parse::<BinOp>().ok()?;
    Some(Instruction::Binary {
        op,
        dst: caps[1].to_string(),
        lhs: Operand::from_token(&caps[3]),
        rhs: Operand::from_token(&caps[4]),
    })
}

fn classify_call(line: &str) -> Option<Instruction> {
    if let Some(caps) = CALL_ASSIGN_REGEX.captures(line) {
        return Some(Instruction::Call {
            dst: Some(caps[1].to_string()),
            callee: caps[2].to_string(),
            args: var_args(&caps[3]),
        });
    }
    let caps = CALL_REGEX.captures(line)?;
    Some(Instruction::Call {
        dst: None,
        callee: caps[1].to_string(),
        args: var_args(&caps[2]),
    })
}

/// Extracts the variable tokens from a call argument list, dropping literal
/// arguments and type annotations.
fn var_args(args: &str) -> Vec<String> {
    ARG_VAR_REGEX
        .find_iter(args)
        .map(|m| m.as_str().to_string())
        .collect()
}

fn classify_phi(line: &str) -> Option<Instruction> {
    let caps = PHI_REGEX.captures(line)?;
    let mut incomings = vec![PhiIncoming {
        value: Operand::from_token(&caps[2]),
        block: caps[3].to_string(),
    }];
    if let (Some(value), Some(block)) = (caps.get(4), caps.get(5)) {
        incomings.push(PhiIncoming {
            value: Operand::from_token(value.as_str()),
            block: block.as_str().to_string(),
        });
    }
    Some(Instruction::Phi {
        dst: caps[1].to_string(),
        incomings,
    })
}

fn classify_cond_br(line: &str) -> Option<Instruction> {
    let caps = COND_BR_REGEX.captures(line)?;
    Some(Instruction::CondBr {
        cond: caps[1].to_string(),
        true_label: caps[2].to_string(),
        false_label: caps[3].to_string(),
    })
}

fn classify_br(line: &str) -> Option<Instruction> {
    let caps = BR_REGEX.captures(line)?;
    Some(Instruction::Br {
        target: caps[1].to_string(),
    })
}
