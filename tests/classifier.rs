//! Integration tests for the textual front end.
//!
//! Runs the classifier over a realistic program and verifies the sequence of
//! typed records it produces, including the lines it must drop.

use flowscope::ir::{classify, BinOp, Instruction, Operand};

#[test]
fn test_program_classification_sequence() {
    let program = "\
define i32 @main() {
entry:
%x = alloca i32
%s = call i32 () @SOURCE()
store i32 %s, ptr %x
%y = load i32, ptr %x
%z = add i32 %y, 1
br i1 %cmp, label %lbl_t, label %lbl_f
lbl_t:
br label %merge
merge:
%m = phi i32 [%z, %lbl_t], [0, %lbl_f]
call void @SINK(i32 %m)
ret i32 0
}
";
    let instrs: Vec<Instruction> = program.lines().filter_map(classify).collect();

    let kinds: Vec<&str> = instrs
        .iter()
        .map(|i| match i {
            Instruction::FunctionDef { .. } => "define",
            Instruction::Label { .. } => "label",
            Instruction::Alloca { .. } => "alloca",
            Instruction::Load { .. } => "load",
            Instruction::Store { .. } => "store",
            Instruction::Binary { .. } => "binary",
            Instruction::Call { .. } => "call",
            Instruction::Phi { .. } => "phi",
            Instruction::CondBr { .. } => "condbr",
            Instruction::Br { .. } => "br",
        })
        .collect();

    // `ret` and the closing brace are dropped; everything else classifies.
    assert_eq!(
        kinds,
        vec![
            "define", "label", "alloca", "call", "store", "load", "binary", "condbr", "label",
            "br", "label", "phi", "call",
        ]
    );
}

#[test]
fn test_classified_payloads() {
    assert_eq!(
        classify("%z = mul i32 %a, 3"),
        Some(Instruction::Binary {
            op: BinOp::Mul,
            dst: "%z".to_string(),
            lhs: Operand::Var("%a".to_string()),
            rhs: Operand::Literal("3".to_string()),
        })
    );

    assert_eq!(
        classify("  store i32 %value, ptr %slot  "),
        Some(Instruction::Store {
            src: Operand::Var("%value".to_string()),
            dst: "%slot".to_string(),
        })
    );
}

#[test]
fn test_permissive_recovery_drops_near_misses() {
    // Keyword present, grammar violated: no record, no error.
    assert_eq!(classify("store i32 %lonely"), None);
    assert_eq!(classify("%x = load i32"), None);
    assert_eq!(classify("%x = phi i32"), None);
    assert_eq!(classify("br i1 %cmp, label %only_one"), None);
    assert_eq!(classify("define without a name"), None);
}

#[test]
fn test_comments_and_noise_are_dropped() {
    assert_eq!(classify("; ModuleID = 'program'"), None);
    assert_eq!(classify("target triple = \"x86_64\""), None);
    assert_eq!(classify("ret void"), None);
}
