//! Interpreters for the two program representations: a node-by-node walk
//! of the instruction graph and a block-at-a-time run of the basic-block
//! graph. Both drive the same stack operations, so block fusion cannot
//! change observable behavior.

use super::io::Io;
use super::stack::Stack;
use crate::program::{Arg, BlockGraph, Opcode, ProgramGraph, Succ};
use tracing::trace;

/// Executes one non-control instruction against the stack
pub fn exec_op(op: Opcode, arg: &Arg, stack: &mut Stack, io: &mut dyn Io) {
    match op {
        Opcode::Nop => {}
        Opcode::Push => {
            if let Arg::Value(value) = arg {
                stack.push(*value);
            }
        }
        Opcode::PushSeq => {
            if let Arg::Values(values) = arg {
                stack.push_run(values);
            }
        }
        Opcode::Pop => stack.discard(),
        Opcode::PopN => {
            if let Arg::Value(count) = arg {
                stack.discard_n(*count);
            }
        }
        Opcode::Duplicate => stack.duplicate(),
        Opcode::InNumber => stack.in_number(io),
        Opcode::InChar => stack.in_char(io),
        Opcode::OutNumber => stack.out_number(io),
        Opcode::OutChar => stack.out_char(io),
        Opcode::Add => stack.add(),
        Opcode::Subtract => stack.sub(),
        Opcode::Multiply => stack.mul(),
        Opcode::Divide => stack.div(),
        Opcode::Modulo => stack.modulo(),
        Opcode::Greater => stack.greater(),
        Opcode::Not => stack.not(),
        Opcode::Swap => stack.swap(),
        Opcode::Roll => stack.roll(),
        // control opcodes are resolved by the caller
        Opcode::Halt | Opcode::Switch | Opcode::Pointer | Opcode::Jez => {}
    }
}

/// Runs the unconsolidated instruction graph to its halt
pub fn run_graph(graph: &ProgramGraph, io: &mut dyn Io) {
    let mut stack = Stack::new();
    let mut pc = graph.entry();
    loop {
        let node = graph.node(pc);
        trace!(pc, op = %node.op, "step");
        pc = match node.succ {
            Succ::Halt => return,
            Succ::One(next) => {
                exec_op(node.op, &node.arg, &mut stack, io);
                next
            }
            Succ::Two(targets) => {
                let selector = match node.op {
                    Opcode::Jez => stack.eq_zero(),
                    _ => stack.switch_select(),
                };
                targets[selector]
            }
            Succ::Four(targets) => targets[stack.pointer_select()],
        };
    }
}

/// Runs the basic-block graph to its halt
pub fn run_blocks(blocks: &BlockGraph, io: &mut dyn Io) {
    let mut stack = Stack::new();
    let mut current = 0;
    loop {
        let block = blocks.block(current);
        trace!(block = current, "enter");
        let mut taken = None;
        for (index, instr) in block.code.iter().enumerate() {
            let last = index + 1 == block.code.len();
            match instr.op {
                Opcode::Halt => return,
                Opcode::Switch if last => {
                    taken = block.successors.get(stack.switch_select()).copied();
                }
                Opcode::Pointer if last => {
                    taken = block.successors.get(stack.pointer_select()).copied();
                }
                Opcode::Jez if last => {
                    taken = block.successors.get(stack.eq_zero()).copied();
                }
                op => exec_op(op, &instr.arg, &mut stack, io),
            }
        }
        current = match taken.or_else(|| block.successors.first().copied()) {
            Some(next) => next,
            None => return,
        };
    }
}
