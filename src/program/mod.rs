//! The instruction program: opcodes, the node-arena control-flow graph and
//! its regrouping into basic blocks.

mod blocks;
mod graph;
mod opcode;

pub use blocks::{BasicBlock, BlockGraph, BlockId, BlockOp};
pub use graph::{Arg, Node, NodeId, ProgramGraph, Succ};
pub use opcode::{decode, ArgShape, Opcode};
