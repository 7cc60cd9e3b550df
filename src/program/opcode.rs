//! Instruction opcodes and the color-delta decoding table.

use crate::codel::{brightness_delta, hue_delta, Color};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stack-machine instruction opcodes.
///
/// `PushSeq` and `PopN` only appear after basic-block fusion; `Jez`, `Swap`
/// and explicit `Nop` jumps additionally come from the assembly front-end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Opcode {
    /// No operation
    Nop,
    /// Stop execution
    Halt,
    /// Push one constant
    Push,
    /// Push an ordered run of constants
    PushSeq,
    /// Discard the top of the stack
    Pop,
    /// Discard N values
    PopN,
    /// Duplicate the top of the stack
    Duplicate,
    /// Read a decimal integer
    InNumber,
    /// Read one code point
    InChar,
    /// Write a decimal integer
    OutNumber,
    /// Write one code point
    OutChar,
    /// Addition
    Add,
    /// Subtraction
    Subtract,
    /// Multiplication
    Multiply,
    /// Division
    Divide,
    /// Remainder
    Modulo,
    /// Comparison, pushes 1 or 0
    Greater,
    /// Logical negation
    Not,
    /// Exchange the top two values
    Swap,
    /// Rotate the top `depth` values by `iter`
    Roll,
    /// Two-way branch on the parity of the popped value
    Switch,
    /// Four-way branch on the popped value mod 4
    Pointer,
    /// Two-way branch: taken when the popped value is zero
    Jez,
}

/// Shape of the constant argument an opcode carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgShape {
    /// No argument
    None,
    /// One constant
    Value,
    /// Ordered list of constants
    Values,
}

impl Opcode {
    /// Argument shape for this opcode
    pub fn arg_shape(self) -> ArgShape {
        match self {
            Opcode::Push | Opcode::PopN => ArgShape::Value,
            Opcode::PushSeq => ArgShape::Values,
            _ => ArgShape::None,
        }
    }

    /// Number of outgoing edges a node with this opcode carries
    pub fn successor_count(self) -> usize {
        match self {
            Opcode::Halt => 0,
            Opcode::Switch | Opcode::Jez => 2,
            Opcode::Pointer => 4,
            _ => 1,
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Opcode::Nop => "NOP",
            Opcode::Halt => "HALT",
            Opcode::Push => "PUSH",
            Opcode::PushSeq => "PUSHSEQ",
            Opcode::Pop => "POP",
            Opcode::PopN => "POPN",
            Opcode::Duplicate => "DUP",
            Opcode::InNumber => "INN",
            Opcode::InChar => "INC",
            Opcode::OutNumber => "OUTN",
            Opcode::OutChar => "OUTC",
            Opcode::Add => "ADD",
            Opcode::Subtract => "SUB",
            Opcode::Multiply => "MUL",
            Opcode::Divide => "DIV",
            Opcode::Modulo => "MOD",
            Opcode::Greater => "GREATER",
            Opcode::Not => "NOT",
            Opcode::Swap => "SWAP",
            Opcode::Roll => "ROLL",
            Opcode::Switch => "SWITCH",
            Opcode::Pointer => "POINTER",
            Opcode::Jez => "JEZ",
        };
        f.write_str(name)
    }
}

/// The fixed decode table, hue delta outer, brightness delta inner
const DECODE: [Opcode; 18] = [
    Opcode::Nop,
    Opcode::Push,
    Opcode::Pop,
    Opcode::Add,
    Opcode::Subtract,
    Opcode::Multiply,
    Opcode::Divide,
    Opcode::Modulo,
    Opcode::Not,
    Opcode::Greater,
    Opcode::Pointer,
    Opcode::Switch,
    Opcode::Duplicate,
    Opcode::Roll,
    Opcode::InNumber,
    Opcode::InChar,
    Opcode::OutNumber,
    Opcode::OutChar,
];

/// Decodes the instruction on the edge between two region colors. Any
/// achromatic endpoint makes the transition silent.
pub fn decode(from: Color, to: Color) -> Opcode {
    match (hue_delta(from, to), brightness_delta(from, to)) {
        (Some(hue), Some(brightness)) => DECODE[(hue * 3 + brightness) as usize],
        _ => Opcode::Nop,
    }
}
