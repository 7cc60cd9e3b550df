//! Structured source emission: renders the basic-block graph as a
//! standalone Rust program driving the `pietc` runtime. Every block becomes
//! one arm of a state-machine loop; a block with one successor jumps, a
//! block with several dispatches on the selector its final instruction
//! computes, with the last successor as the default arm.

use crate::program::{Arg, BasicBlock, BlockGraph, Opcode};
use std::fmt::Write;

/// Renders the block graph as Rust source
pub fn emit_rust(blocks: &BlockGraph) -> String {
    let mut out = String::new();
    out.push_str("//! Program emitted by pietc.\n");
    out.push_str("#![allow(unused_variables, unused_mut)]\n\n");
    out.push_str("use pietc::runtime::{ConsoleIo, Stack};\n\n");
    out.push_str("fn main() {\n");
    out.push_str("    let mut io = ConsoleIo::console();\n");
    out.push_str("    let mut stack = Stack::new();\n");
    out.push_str("    let mut block = 0usize;\n");
    out.push_str("    loop {\n");
    out.push_str("        match block {\n");
    for (id, block) in blocks.blocks().enumerate() {
        let _ = writeln!(out, "            {id} => {{");
        emit_block(&mut out, block);
        out.push_str("            }\n");
    }
    out.push_str("            _ => return,\n");
    out.push_str("        }\n");
    out.push_str("    }\n");
    out.push_str("}\n");
    out
}

fn emit_block(out: &mut String, block: &BasicBlock) {
    let mut dispatched = false;
    for (index, instr) in block.code.iter().enumerate() {
        let last = index + 1 == block.code.len();
        let selector = match instr.op {
            Opcode::Switch if last => Some("stack.switch_select()"),
            Opcode::Pointer if last => Some("stack.pointer_select()"),
            Opcode::Jez if last => Some("stack.eq_zero()"),
            _ => None,
        };
        if let Some(selector) = selector {
            emit_dispatch(out, selector, &block.successors);
            dispatched = true;
        } else if let Some(statement) = statement(instr.op, &instr.arg) {
            let _ = writeln!(out, "                {statement}");
            if instr.op == Opcode::Halt {
                dispatched = true;
            }
        }
    }
    if !dispatched {
        match block.successors.first() {
            Some(next) => {
                let _ = writeln!(out, "                block = {next};");
            }
            None => out.push_str("                return;\n"),
        }
    }
}

fn emit_dispatch(out: &mut String, selector: &str, successors: &[usize]) {
    let _ = writeln!(out, "                match {selector} {{");
    for (choice, target) in successors.iter().enumerate() {
        if choice + 1 == successors.len() {
            let _ = writeln!(out, "                    _ => block = {target},");
        } else {
            let _ = writeln!(out, "                    {choice} => block = {target},");
        }
    }
    out.push_str("                }\n");
}

fn statement(op: Opcode, arg: &Arg) -> Option<String> {
    let text = match (op, arg) {
        (Opcode::Nop, _) => return None,
        (Opcode::Halt, _) => "return;".to_string(),
        (Opcode::Push, Arg::Value(value)) => format!("stack.push({value});"),
        (Opcode::PushSeq, Arg::Values(values)) => {
            let list = values
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            format!("stack.push_run(&[{list}]);")
        }
        (Opcode::Pop, _) => "stack.discard();".to_string(),
        (Opcode::PopN, Arg::Value(count)) => format!("stack.discard_n({count});"),
        (Opcode::Duplicate, _) => "stack.duplicate();".to_string(),
        (Opcode::InNumber, _) => "stack.in_number(&mut io);".to_string(),
        (Opcode::InChar, _) => "stack.in_char(&mut io);".to_string(),
        (Opcode::OutNumber, _) => "stack.out_number(&mut io);".to_string(),
        (Opcode::OutChar, _) => "stack.out_char(&mut io);".to_string(),
        (Opcode::Add, _) => "stack.add();".to_string(),
        (Opcode::Subtract, _) => "stack.sub();".to_string(),
        (Opcode::Multiply, _) => "stack.mul();".to_string(),
        (Opcode::Divide, _) => "stack.div();".to_string(),
        (Opcode::Modulo, _) => "stack.modulo();".to_string(),
        (Opcode::Greater, _) => "stack.greater();".to_string(),
        (Opcode::Not, _) => "stack.not();".to_string(),
        (Opcode::Swap, _) => "stack.swap();".to_string(),
        (Opcode::Roll, _) => "stack.roll();".to_string(),
        // a mid-block control opcode cannot occur; emit nothing
        (Opcode::Switch | Opcode::Pointer | Opcode::Jez, _) => return None,
        (Opcode::Push | Opcode::PushSeq | Opcode::PopN, _) => return None,
    };
    Some(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asm;
    use crate::program::BlockGraph;

    fn emit(source: &str) -> String {
        let graph = asm::assemble(source).unwrap();
        emit_rust(&BlockGraph::from_graph(&graph))
    }

    #[test]
    fn straight_line_jumps_or_returns() {
        let text = emit("PUSH 5\nOUTN\nHALT");
        assert!(text.contains("stack.push(5);"));
        assert!(text.contains("stack.out_number(&mut io);"));
        assert!(text.contains("return;"));
        assert!(text.contains("0 => {"));
    }

    #[test]
    fn fused_runs_emit_bulk_operations() {
        let text = emit("PUSH 1\nPUSH 2\nPUSH 3\nADD\nPOP\nPOP\nHALT");
        assert!(text.contains("stack.push_run(&[1, 2, 3]);"));
        assert!(text.contains("stack.discard_n(2);"));
    }

    #[test]
    fn branches_dispatch_with_a_default_arm() {
        let text = emit(
            "INN\n\
             JEZ zero\n\
             OUTN\n\
             HALT\n\
             LABEL zero\n\
             HALT",
        );
        assert!(text.contains("match stack.eq_zero() {"));
        assert!(text.contains("0 => block = 1,"));
        assert!(text.contains("_ => block = 2,"));
    }

    #[test]
    fn emitted_source_is_a_complete_program() {
        let text = emit("HALT");
        assert!(text.starts_with("//! Program emitted by pietc.\n"));
        assert!(text.contains("use pietc::runtime::{ConsoleIo, Stack};"));
        assert!(text.contains("fn main() {"));
        assert!(text.contains("_ => return,"));
    }
}
