use alloy::primitives::U256;
use evmaot_analyzer::{AdvancedCodeAnalysis, Block, BlockInfo, Instruction, Op, Operand};
use evmaot_vm::core::{
    opcodes::{op_table, OpTable, JUMP, JUMPI, RETURN, REVERT, SELFDESTRUCT, STOP},
    revision::Revision,
};
use hashbrown::HashMap;
use petgraph::{
    stable_graph::{NodeIndex, StableDiGraph},
    visit::{Dfs, EdgeRef},
};
use tracing::{trace, warn};

/// A node of the lowered control-flow graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A basic block of the contract.
    Block(BasicBlock),
    /// The per-contract dispatch table used by jumps whose target is popped at run time.
    JumpTable,
    /// The shared exit path that turns the execution state into a result.
    Cleanup,
}

/// How control may move from one node to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    /// Linear flow into the next block in program order.
    FallThrough,
    /// An unconditional transfer to a labelled block.
    Jump,
    /// A conditional transfer to a labelled block.
    Branch,
    /// A transfer into the jump table.
    Dispatch,
    /// A handler ended execution, or the block halts.
    Exit,
    /// A jump whose destination is not a JUMPDEST.
    BadJump,
}

/// The literal or number handed to a handler through its instruction argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Argument {
    /// The handler does not read its argument.
    None,
    /// A literal of at most 8 bytes.
    SmallPush(u64),
    /// A literal wider than 8 bytes.
    Push(U256),
    /// The block's gas so far, or the instruction's own pc.
    Number(u64),
}

impl From<Operand> for Argument {
    fn from(operand: Operand) -> Self {
        match operand {
            Operand::SmallPush(value) => Self::SmallPush(value),
            Operand::Push(value) => Self::Push(value),
            Operand::GasCheckpoint(gas) => Self::Number(gas as u64),
            Operand::ProgramCounter(pc) => Self::Number(pc as u64),
            Operand::None | Operand::Jump { .. } => Self::None,
        }
    }
}

/// One straight-line step inside a basic block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// The block entry check of gas, stack underflow and stack overflow.
    Precheck(BlockInfo),
    /// A push folded into the jump that ends the block.
    Eliminated {
        /// Byte offset of the push.
        pc: usize,
        /// The push opcode.
        opcode: u8,
    },
    /// A call to the opcode's handler wrapper.
    Invoke {
        /// Byte offset of the opcode.
        pc: usize,
        /// The opcode value.
        opcode: u8,
        /// The handler's instruction argument.
        argument: Argument,
        /// Whether the handler may end execution.
        may_break: bool,
    },
    /// An opcode with no handler in the active revision.
    Undefined {
        /// Byte offset of the opcode.
        pc: usize,
        /// The opcode value.
        opcode: u8,
    },
}

impl Step {
    /// Returns true if control may leave the block to the cleanup path at this step.
    pub fn may_break(&self) -> bool {
        match self {
            Self::Precheck(_) | Self::Undefined { .. } => true,
            Self::Invoke { may_break, .. } => *may_break,
            Self::Eliminated { .. } => false,
        }
    }
}

/// How control leaves a basic block once its last step has run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Exit {
    /// Continue with the next block.
    FallThrough,
    /// JUMP to the JUMPDEST at the given offset.
    Jump(usize),
    /// JUMPI to the JUMPDEST at the given offset.
    Branch(usize),
    /// JUMP to an offset that is not a JUMPDEST.
    BadJump(usize),
    /// JUMPI to an offset that is not a JUMPDEST.
    BadBranch(usize),
    /// JUMP through the jump table.
    Dispatch,
    /// JUMPI through the jump table.
    DispatchIf,
    /// The block ends execution.
    Halt,
}

impl Exit {
    /// Returns the jump opcode lowered into this exit, if any.
    pub fn opcode(&self) -> Option<u8> {
        match self {
            Self::Jump(_) | Self::BadJump(_) | Self::Dispatch => Some(JUMP),
            Self::Branch(_) | Self::BadBranch(_) | Self::DispatchIf => Some(JUMPI),
            Self::FallThrough | Self::Halt => None,
        }
    }

    /// Returns true if the block continues with the next block when the exit is not taken.
    pub fn falls_through(&self) -> bool {
        matches!(
            self,
            Self::FallThrough | Self::Branch(_) | Self::BadBranch(_) | Self::DispatchIf
        )
    }
}

/// A basic block lowered into steps and an exit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicBlock {
    /// Byte offset at which the block starts.
    pub start_pc: usize,
    /// The block's label, present iff the block starts at a JUMPDEST.
    pub label: Option<usize>,
    /// The block's aggregates.
    pub info: BlockInfo,
    /// The straight-line steps, starting with the precheck.
    pub steps: Vec<Step>,
    /// How control leaves the block.
    pub exit: Exit,
    /// Byte offset of the JUMP or JUMPI lowered into the exit.
    pub jump_pc: Option<usize>,
}

/// The control-flow graph of one contract.
///
/// Blocks keep their program order, which is also the order the emitter writes them in. The
/// graph carries one jump table node and one cleanup node.
#[derive(Debug, Clone)]
pub struct ControlFlowGraph {
    /// The revision whose opcode table selected the handlers.
    pub revision: Revision,
    graph: StableDiGraph<Node, Edge>,
    order: Vec<NodeIndex>,
    labels: HashMap<usize, NodeIndex>,
    jump_table: NodeIndex,
    cleanup: NodeIndex,
}

impl ControlFlowGraph {
    /// Lowers an analysis into a control-flow graph.
    pub fn build(analysis: &AdvancedCodeAnalysis) -> Self {
        let table = op_table(analysis.revision);
        let mut graph = StableDiGraph::new();
        let mut order = Vec::with_capacity(analysis.block_count());
        let mut labels = HashMap::new();

        for block in analysis.blocks() {
            let lowered = lower_block(analysis, table, block);
            let label = lowered.label;
            let node = graph.add_node(Node::Block(lowered));
            if let Some(pc) = label {
                labels.insert(pc, node);
            }
            order.push(node);
        }
        let jump_table = graph.add_node(Node::JumpTable);
        let cleanup = graph.add_node(Node::Cleanup);

        for (i, &node) in order.iter().enumerate() {
            let Node::Block(block) = &graph[node] else { continue };
            let next = order.get(i + 1).copied();
            let mut edges = Vec::with_capacity(3);

            match block.exit {
                Exit::Jump(target) => edges.extend(labels.get(&target).map(|&to| (to, Edge::Jump))),
                Exit::Branch(target) => {
                    edges.extend(labels.get(&target).map(|&to| (to, Edge::Branch)))
                }
                Exit::BadJump(_) | Exit::BadBranch(_) => edges.push((cleanup, Edge::BadJump)),
                Exit::Dispatch | Exit::DispatchIf => edges.push((jump_table, Edge::Dispatch)),
                Exit::Halt => edges.push((cleanup, Edge::Exit)),
                Exit::FallThrough => {}
            }
            if block.exit.falls_through() {
                edges.extend(next.map(|to| (to, Edge::FallThrough)));
            }
            if block.exit != Exit::Halt && block.steps.iter().any(Step::may_break) {
                edges.push((cleanup, Edge::Exit));
            }

            for (to, edge) in edges {
                graph.add_edge(node, to, edge);
            }
        }

        for target in &analysis.jumpdest_targets {
            if let Some(&to) = labels.get(target) {
                graph.add_edge(jump_table, to, Edge::Jump);
            }
        }
        graph.add_edge(jump_table, cleanup, Edge::BadJump);

        trace!(
            "built control-flow graph: {} nodes, {} edges",
            graph.node_count(),
            graph.edge_count()
        );

        Self { revision: analysis.revision, graph, order, labels, jump_table, cleanup }
    }

    /// Returns the underlying graph.
    pub fn graph(&self) -> &StableDiGraph<Node, Edge> {
        &self.graph
    }

    /// Returns the entry block.
    pub fn entry(&self) -> Option<NodeIndex> {
        self.order.first().copied()
    }

    /// Returns the jump table node.
    pub fn jump_table(&self) -> NodeIndex {
        self.jump_table
    }

    /// Returns the cleanup node.
    pub fn cleanup(&self) -> NodeIndex {
        self.cleanup
    }

    /// Returns the number of basic blocks.
    pub fn block_count(&self) -> usize {
        self.order.len()
    }

    /// Iterates over the basic blocks in program order.
    pub fn blocks(&self) -> impl Iterator<Item = (NodeIndex, &BasicBlock)> + '_ {
        self.order.iter().filter_map(move |&node| match &self.graph[node] {
            Node::Block(block) => Some((node, block)),
            _ => None,
        })
    }

    /// Returns the block labelled with `pc`, if any.
    pub fn block_at_label(&self, pc: usize) -> Option<NodeIndex> {
        self.labels.get(&pc).copied()
    }

    /// Returns the outgoing edges of `node`, sorted by target for stable iteration.
    pub fn successors(&self, node: NodeIndex) -> Vec<(NodeIndex, Edge)> {
        let mut successors: Vec<_> =
            self.graph.edges(node).map(|edge| (edge.target(), *edge.weight())).collect();
        successors.sort_by_key(|(to, edge)| (to.index(), *edge as u8));
        successors
    }

    /// Returns the jump table's entries as `(offset, block)` pairs, in ascending offset order.
    pub fn jump_table_entries(&self) -> Vec<(usize, NodeIndex)> {
        let mut entries: Vec<_> = self
            .graph
            .edges(self.jump_table)
            .filter(|edge| *edge.weight() == Edge::Jump)
            .filter_map(|edge| match &self.graph[edge.target()] {
                Node::Block(BasicBlock { label: Some(pc), .. }) => Some((*pc, edge.target())),
                _ => None,
            })
            .collect();
        entries.sort_unstable_by_key(|(pc, _)| *pc);
        entries
    }

    /// Returns true if any block jumps through the jump table.
    pub fn has_dynamic_jumps(&self) -> bool {
        self.blocks().any(|(_, block)| matches!(block.exit, Exit::Dispatch | Exit::DispatchIf))
    }

    /// Returns the start offsets of blocks that no path from the entry block reaches.
    pub fn unreachable_blocks(&self) -> Vec<usize> {
        let Some(entry) = self.entry() else { return Vec::new() };

        let mut reached = hashbrown::HashSet::new();
        let mut dfs = Dfs::new(&self.graph, entry);
        while let Some(node) = dfs.next(&self.graph) {
            reached.insert(node);
        }

        self.blocks()
            .filter(|(node, _)| !reached.contains(node))
            .map(|(_, block)| block.start_pc)
            .collect()
    }
}

/// Lowers one analyzed block.
fn lower_block(analysis: &AdvancedCodeAnalysis, table: &OpTable, block: Block<'_>) -> BasicBlock {
    let header = block.header;
    let mut steps = Vec::with_capacity(block.body.len() + 1);
    let mut exit = Exit::FallThrough;
    let mut jump_pc = None;

    steps.push(Step::Precheck(header.info));
    for instr in block.body {
        match *instr {
            Instruction::BeginBlock(_) => {}
            Instruction::Eliminated { pc, opcode } => steps.push(Step::Eliminated { pc, opcode }),
            Instruction::Op(Op { pc, opcode: opcode @ (JUMP | JUMPI), operand }) => {
                let target = match operand {
                    Operand::Jump { target } => target,
                    _ => None,
                };
                jump_pc = Some(pc);
                exit = lower_jump(analysis, pc, opcode, target);
            }
            Instruction::Op(Op { pc, opcode, operand }) => {
                let entry = &table[opcode as usize];
                match entry.handler {
                    Some(_) => steps.push(Step::Invoke {
                        pc,
                        opcode,
                        argument: operand.into(),
                        may_break: entry.kind.may_break(),
                    }),
                    None => steps.push(Step::Undefined { pc, opcode }),
                }
                if matches!(opcode, STOP | RETURN | REVERT | SELFDESTRUCT) {
                    exit = Exit::Halt;
                }
            }
        }
    }

    BasicBlock {
        start_pc: header.pc,
        label: analysis.is_jumpdest(header.pc).then_some(header.pc),
        info: header.info,
        steps,
        exit,
        jump_pc,
    }
}

/// Picks the exit for a JUMP or JUMPI at `pc`.
fn lower_jump(
    analysis: &AdvancedCodeAnalysis,
    pc: usize,
    opcode: u8,
    target: Option<usize>,
) -> Exit {
    match (opcode, target) {
        (JUMP, Some(target)) if analysis.is_jumpdest(target) => Exit::Jump(target),
        (JUMP, None) => Exit::Dispatch,
        (_, Some(target)) if analysis.is_jumpdest(target) => Exit::Branch(target),
        (_, None) => Exit::DispatchIf,
        (_, Some(target)) => {
            warn!("jump at pc {} targets {}, which is not a JUMPDEST", pc, target);
            if opcode == JUMP {
                Exit::BadJump(target)
            } else {
                Exit::BadBranch(target)
            }
        }
    }
}
