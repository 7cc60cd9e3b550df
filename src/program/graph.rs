//! The program graph: an arena of instruction nodes, eight per region (one
//! per direction/chooser state), with edges stored as node indices so the
//! graph can hold cycles without ownership knots.

use super::opcode::{decode, Opcode};
use crate::region::{Exit, Region, RegionGraph};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Index of a node in the program graph arena
pub type NodeId = usize;

/// Constant argument carried by a node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Arg {
    /// No argument
    None,
    /// One constant
    Value(i32),
    /// Ordered run of constants
    Values(Vec<i32>),
}

/// Outgoing edges of a node, in selector order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Succ {
    /// Execution stops here
    Halt,
    /// Unconditional continuation
    One(NodeId),
    /// Switch / branch-if-zero alternatives
    Two([NodeId; 2]),
    /// Pointer rotations by 0..4 steps
    Four([NodeId; 4]),
}

/// One instruction node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Operation
    pub op: Opcode,
    /// Constant argument, shaped per `op.arg_shape()`
    pub arg: Arg,
    /// Outgoing edges
    pub succ: Succ,
}

impl Node {
    /// Edge count and argument shape agree with the opcode's tables
    pub fn is_well_formed(&self) -> bool {
        use crate::program::opcode::ArgShape;
        let succ_len = match self.succ {
            Succ::Halt => 0,
            Succ::One(_) => 1,
            Succ::Two(_) => 2,
            Succ::Four(_) => 4,
        };
        let arg_ok = matches!(
            (self.op.arg_shape(), &self.arg),
            (ArgShape::None, Arg::None)
                | (ArgShape::Value, Arg::Value(_))
                | (ArgShape::Values, Arg::Values(_))
        );
        succ_len == self.op.successor_count() && arg_ok
    }
}

/// Instruction graph with a designated entry node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramGraph {
    nodes: Vec<Node>,
    entry: NodeId,
}

/// Repairs an adjacency slot the way a blocked traversal rotates: probe the
/// slot, toggle the chooser, then advance the direction with the chooser
/// left toggled, up to four rounds. A slot counts as usable when it has a
/// target or carries the cyclic flag.
fn effective_exit(region: &Region, dp: usize, cc: usize) -> Exit {
    let mut d = dp;
    let mut c = cc;
    for _ in 0..4 {
        let exit = region.exit(d, c);
        if exit.target.is_some() || exit.crossed {
            return exit;
        }
        c = 1 - c;
        let exit = region.exit(d, c);
        if exit.target.is_some() || exit.crossed {
            return exit;
        }
        d = (d + 1) % 4;
    }
    region.exit(dp, cc)
}

/// Arena slot of (region, direction, chooser)
fn slot(region: usize, dp: usize, cc: usize) -> NodeId {
    region * 8 + dp * 2 + cc
}

impl ProgramGraph {
    /// Builds the instruction graph from the region adjacency graph.
    /// Execution enters at region 0 heading right with the left chooser.
    pub fn from_regions(graph: &RegionGraph) -> Self {
        if graph.is_empty() {
            return ProgramGraph {
                nodes: vec![Node {
                    op: Opcode::Halt,
                    arg: Arg::None,
                    succ: Succ::Halt,
                }],
                entry: 0,
            };
        }
        let mut nodes = Vec::with_capacity(graph.len() * 8);
        for (id, region) in graph.regions().enumerate() {
            for dp in 0..4 {
                for cc in 0..2 {
                    let exit = effective_exit(region, dp, cc);
                    nodes.push(Self::node_for(graph, id, exit));
                }
            }
        }
        debug!(nodes = nodes.len(), "program graph built");
        ProgramGraph { nodes, entry: 0 }
    }

    fn node_for(graph: &RegionGraph, id: usize, exit: Exit) -> Node {
        let target = match exit.target {
            Some(target) => target,
            // dead end or enclosed pocket
            None => {
                return Node {
                    op: Opcode::Halt,
                    arg: Arg::None,
                    succ: Succ::Halt,
                }
            }
        };
        if !exit.crossed {
            // reached through white: a silent slide into the target state
            return Node {
                op: Opcode::Nop,
                arg: Arg::None,
                succ: Succ::One(slot(target, exit.dp, exit.cc)),
            };
        }
        let source = graph.region(id);
        let op = decode(source.color, graph.region(target).color);
        let arg = if op == Opcode::Push {
            Arg::Value(source.size as i32)
        } else {
            Arg::None
        };
        let succ = match op {
            Opcode::Pointer => {
                let mut next = [0; 4];
                for (step, entry) in next.iter_mut().enumerate() {
                    *entry = slot(target, (exit.dp + step) % 4, exit.cc);
                }
                Succ::Four(next)
            }
            Opcode::Switch => Succ::Two([
                slot(target, exit.dp, exit.cc),
                slot(target, exit.dp, 1 - exit.cc),
            ]),
            _ => Succ::One(slot(target, exit.dp, exit.cc)),
        };
        Node { op, arg, succ }
    }

    /// Assembles a graph from pre-built nodes (used by the assembly
    /// front-end).
    pub(crate) fn from_parts(nodes: Vec<Node>, entry: NodeId) -> Self {
        debug_assert!(entry < nodes.len());
        debug_assert!(nodes.iter().all(Node::is_well_formed));
        ProgramGraph { nodes, entry }
    }

    /// Entry node id
    pub fn entry(&self) -> NodeId {
        self.entry
    }

    /// Node by id
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    /// Number of nodes in the arena
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// The arena is never empty; a program with no regions is a lone halt
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
