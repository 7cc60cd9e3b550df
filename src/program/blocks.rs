//! Basic-block extraction: collapses straight-line runs of the program
//! graph into ordered instruction sequences and fuses adjacent constant
//! pushes and discards into bulk operations.

use super::graph::{Arg, NodeId, ProgramGraph, Succ};
use super::opcode::Opcode;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::debug;

/// Index of a basic block; block 0 is the entry
pub type BlockId = usize;

/// One instruction inside a block, stripped of edges
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockOp {
    /// Operation
    pub op: Opcode,
    /// Constant argument
    pub arg: Arg,
}

/// A maximal straight-line run. The final instruction may be a
/// multi-successor one; `successors` lists target blocks in that
/// instruction's selector order, and is empty for a halting block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicBlock {
    /// Instruction sequence
    pub code: Vec<BlockOp>,
    /// Successor blocks, one per outgoing edge of the final instruction
    pub successors: Vec<BlockId>,
}

/// The program regrouped into basic blocks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockGraph {
    blocks: Vec<BasicBlock>,
}

impl BlockGraph {
    /// Regroups the program graph. Block ids are assigned in BFS discovery
    /// order from the entry node and are stable: they double as the jump
    /// labels of emitted source.
    pub fn from_graph(graph: &ProgramGraph) -> Self {
        let mut builder = Builder {
            graph,
            entry_block: HashMap::new(),
            queue: VecDeque::new(),
            blocks: Vec::new(),
        };
        builder.entry_block.insert(graph.entry(), 0);
        builder.queue.push_back(graph.entry());
        while let Some(start) = builder.queue.pop_front() {
            let block = builder.walk(start);
            builder.blocks.push(block);
        }
        debug!(blocks = builder.blocks.len(), "basic blocks built");
        BlockGraph {
            blocks: builder.blocks,
        }
    }

    /// Number of blocks
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// True only for a graph that was never built; kept for completeness
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Block by id
    pub fn block(&self, id: BlockId) -> &BasicBlock {
        &self.blocks[id]
    }

    /// Iterates blocks in id order
    pub fn blocks(&self) -> impl Iterator<Item = &BasicBlock> {
        self.blocks.iter()
    }
}

struct Builder<'g> {
    graph: &'g ProgramGraph,
    entry_block: HashMap<NodeId, BlockId>,
    queue: VecDeque<NodeId>,
    blocks: Vec<BasicBlock>,
}

impl Builder<'_> {
    /// Block id owning `node` as its entry, registering and enqueueing a
    /// fresh block if the node has none yet.
    fn block_of(&mut self, node: NodeId) -> BlockId {
        if let Some(&id) = self.entry_block.get(&node) {
            return id;
        }
        let id = self.entry_block.len();
        self.entry_block.insert(node, id);
        self.queue.push_back(node);
        id
    }

    /// Extends one block from its entry node until a multi-successor
    /// instruction, a halt, or a node already walked in this run.
    fn walk(&mut self, start: NodeId) -> BasicBlock {
        let mut block = BasicBlock {
            code: Vec::new(),
            successors: Vec::new(),
        };
        let mut walked: HashSet<NodeId> = HashSet::new();
        let mut pending_pushes: Vec<i32> = Vec::new();
        let mut pending_pops: i32 = 0;
        let mut current = start;
        loop {
            if walked.contains(&current) {
                // the run bit its own tail: close with a jump to the
                // block that owns (or now owns) the revisited node
                let target = self.block_of(current);
                flush_pushes(&mut block, &mut pending_pushes);
                flush_pops(&mut block, &mut pending_pops);
                block.successors.push(target);
                break;
            }
            walked.insert(current);
            let node = self.graph.node(current);
            let mut fused = false;
            if node.op == Opcode::Push {
                if let Arg::Value(value) = node.arg {
                    pending_pushes.push(value);
                    fused = true;
                }
            } else {
                flush_pushes(&mut block, &mut pending_pushes);
            }
            if node.op == Opcode::Pop {
                pending_pops += 1;
                fused = true;
            } else {
                flush_pops(&mut block, &mut pending_pops);
            }
            if !fused {
                block.code.push(BlockOp {
                    op: node.op,
                    arg: node.arg.clone(),
                });
            }
            match node.succ {
                Succ::One(next) => current = next,
                Succ::Halt => break,
                Succ::Two(targets) => {
                    for target in targets {
                        let id = self.block_of(target);
                        block.successors.push(id);
                    }
                    break;
                }
                Succ::Four(targets) => {
                    for target in targets {
                        let id = self.block_of(target);
                        block.successors.push(id);
                    }
                    break;
                }
            }
        }
        block
    }
}

fn flush_pushes(block: &mut BasicBlock, pending: &mut Vec<i32>) {
    match pending.len() {
        0 => {}
        1 => block.code.push(BlockOp {
            op: Opcode::Push,
            arg: Arg::Value(pending[0]),
        }),
        _ => block.code.push(BlockOp {
            op: Opcode::PushSeq,
            arg: Arg::Values(std::mem::take(pending)),
        }),
    }
    pending.clear();
}

fn flush_pops(block: &mut BasicBlock, pending: &mut i32) {
    match *pending {
        0 => {}
        1 => block.code.push(BlockOp {
            op: Opcode::Pop,
            arg: Arg::None,
        }),
        n => block.code.push(BlockOp {
            op: Opcode::PopN,
            arg: Arg::Value(n),
        }),
    }
    *pending = 0;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::graph::Node;

    fn single(op: Opcode, arg: Arg, next: NodeId) -> Node {
        Node {
            op,
            arg,
            succ: Succ::One(next),
        }
    }

    fn halt() -> Node {
        Node {
            op: Opcode::Halt,
            arg: Arg::None,
            succ: Succ::Halt,
        }
    }

    fn graph_of(nodes: Vec<Node>) -> ProgramGraph {
        ProgramGraph::from_parts(nodes, 0)
    }

    #[test]
    fn straight_line_collapses_to_one_block() {
        let graph = graph_of(vec![
            single(Opcode::InNumber, Arg::None, 1),
            single(Opcode::Duplicate, Arg::None, 2),
            single(Opcode::OutNumber, Arg::None, 3),
            halt(),
        ]);
        let blocks = BlockGraph::from_graph(&graph);
        assert_eq!(blocks.len(), 1);
        let block = blocks.block(0);
        assert_eq!(block.code.len(), 4);
        assert!(block.successors.is_empty());
        assert_eq!(block.code[3].op, Opcode::Halt);
    }

    #[test]
    fn push_runs_fuse_into_a_sequence() {
        let graph = graph_of(vec![
            single(Opcode::Push, Arg::Value(1), 1),
            single(Opcode::Push, Arg::Value(2), 2),
            single(Opcode::Push, Arg::Value(3), 3),
            single(Opcode::Add, Arg::None, 4),
            halt(),
        ]);
        let blocks = BlockGraph::from_graph(&graph);
        let block = blocks.block(0);
        assert_eq!(block.code[0].op, Opcode::PushSeq);
        assert_eq!(block.code[0].arg, Arg::Values(vec![1, 2, 3]));
        assert_eq!(block.code[1].op, Opcode::Add);
    }

    #[test]
    fn singleton_runs_stay_plain() {
        let graph = graph_of(vec![
            single(Opcode::Push, Arg::Value(7), 1),
            single(Opcode::Pop, Arg::None, 2),
            single(Opcode::Not, Arg::None, 3),
            halt(),
        ]);
        let blocks = BlockGraph::from_graph(&graph);
        let block = blocks.block(0);
        assert_eq!(block.code[0].op, Opcode::Push);
        assert_eq!(block.code[0].arg, Arg::Value(7));
        assert_eq!(block.code[1].op, Opcode::Pop);
        assert_eq!(block.code[1].arg, Arg::None);
    }

    #[test]
    fn pop_runs_fuse_into_a_count() {
        let graph = graph_of(vec![
            single(Opcode::Pop, Arg::None, 1),
            single(Opcode::Pop, Arg::None, 2),
            single(Opcode::Pop, Arg::None, 3),
            single(Opcode::OutNumber, Arg::None, 4),
            halt(),
        ]);
        let blocks = BlockGraph::from_graph(&graph);
        let block = blocks.block(0);
        assert_eq!(block.code[0].op, Opcode::PopN);
        assert_eq!(block.code[0].arg, Arg::Value(3));
    }

    #[test]
    fn branch_targets_become_blocks_in_selector_order() {
        let graph = graph_of(vec![
            Node {
                op: Opcode::Jez,
                arg: Arg::None,
                succ: Succ::Two([1, 2]),
            },
            single(Opcode::OutNumber, Arg::None, 3),
            single(Opcode::OutChar, Arg::None, 3),
            halt(),
        ]);
        let blocks = BlockGraph::from_graph(&graph);
        let entry = blocks.block(0);
        assert_eq!(entry.code.len(), 1);
        assert_eq!(entry.code[0].op, Opcode::Jez);
        assert_eq!(entry.successors, vec![1, 2]);
        assert_eq!(blocks.block(1).code[0].op, Opcode::OutNumber);
        assert_eq!(blocks.block(2).code[0].op, Opcode::OutChar);
    }

    #[test]
    fn self_loop_cites_its_own_block() {
        let graph = graph_of(vec![single(Opcode::Nop, Arg::None, 0)]);
        let blocks = BlockGraph::from_graph(&graph);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks.block(0).successors, vec![0]);
    }

    #[test]
    fn fusion_stops_at_block_boundaries() {
        // push, then a branch: the pending run must flush before the branch
        let graph = graph_of(vec![
            single(Opcode::Push, Arg::Value(5), 1),
            single(Opcode::Push, Arg::Value(6), 2),
            Node {
                op: Opcode::Switch,
                arg: Arg::None,
                succ: Succ::Two([3, 4]),
            },
            halt(),
            halt(),
        ]);
        let blocks = BlockGraph::from_graph(&graph);
        let entry = blocks.block(0);
        assert_eq!(entry.code[0].op, Opcode::PushSeq);
        assert_eq!(entry.code[0].arg, Arg::Values(vec![5, 6]));
        assert_eq!(entry.code[1].op, Opcode::Switch);
        assert_eq!(entry.successors.len(), 2);
    }
}
