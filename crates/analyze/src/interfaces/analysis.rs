use std::fmt;

use evmaot_vm::core::revision::Revision;
use hashbrown::HashSet;

use crate::interfaces::{BlockHeader, BlockInfo, Instruction};

/// The analyzed form of one contract's bytecode.
///
/// The instruction list starts with a block marker, interleaves retained instructions with a
/// marker at every block boundary, and ends with a synthetic STOP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvancedCodeAnalysis {
    /// The revision the bytecode was analyzed for.
    pub revision: Revision,
    /// The instruction list.
    pub instructions: Vec<Instruction>,
    /// Offsets of every JUMPDEST, in ascending order.
    pub jumpdest_targets: Vec<usize>,
    targets_set: HashSet<usize>,
}

/// A view of one basic block: its marker and the entries up to the next marker.
#[derive(Debug, Clone, Copy)]
pub struct Block<'a> {
    /// The block's marker.
    pub header: &'a BlockHeader,
    /// The block's entries, excluding the marker.
    pub body: &'a [Instruction],
}

impl AdvancedCodeAnalysis {
    pub(crate) fn new(revision: Revision, code_len: usize) -> Self {
        Self {
            revision,
            instructions: Vec::with_capacity(code_len + 2),
            jumpdest_targets: Vec::new(),
            targets_set: HashSet::new(),
        }
    }

    /// Appends a block marker at `pc` and returns its index in the instruction list.
    pub(crate) fn push_marker(&mut self, pc: usize) -> usize {
        self.instructions
            .push(Instruction::BeginBlock(BlockHeader { pc, info: BlockInfo::default() }));
        self.instructions.len() - 1
    }

    /// Writes a closed block's aggregates into its marker.
    pub(crate) fn close_block(&mut self, index: usize, info: BlockInfo) {
        if let Some(Instruction::BeginBlock(header)) = self.instructions.get_mut(index) {
            header.info = info;
        }
    }

    pub(crate) fn add_jumpdest(&mut self, pc: usize) {
        self.jumpdest_targets.push(pc);
        self.targets_set.insert(pc);
    }

    /// Returns true if `pc` is the offset of a JUMPDEST.
    #[inline]
    pub fn is_jumpdest(&self, pc: usize) -> bool {
        self.targets_set.contains(&pc)
    }

    /// Iterates over the basic blocks in program order.
    pub fn blocks(&self) -> impl Iterator<Item = Block<'_>> + '_ {
        let starts: Vec<usize> = self
            .instructions
            .iter()
            .enumerate()
            .filter(|(_, instr)| matches!(instr, Instruction::BeginBlock(_)))
            .map(|(i, _)| i)
            .collect();
        let ends: Vec<usize> = starts
            .iter()
            .skip(1)
            .copied()
            .chain(std::iter::once(self.instructions.len()))
            .collect();

        starts.into_iter().zip(ends).filter_map(move |(start, end)| {
            match &self.instructions[start] {
                Instruction::BeginBlock(header) => {
                    Some(Block { header, body: &self.instructions[start + 1..end] })
                }
                _ => None,
            }
        })
    }

    /// Returns the number of basic blocks.
    pub fn block_count(&self) -> usize {
        self.instructions
            .iter()
            .filter(|instr| matches!(instr, Instruction::BeginBlock(_)))
            .count()
    }

    /// Returns the number of entries eliminated by jump fusion.
    pub fn eliminated_count(&self) -> usize {
        self.instructions
            .iter()
            .filter(|instr| matches!(instr, Instruction::Eliminated { .. }))
            .count()
    }
}

impl fmt::Display for AdvancedCodeAnalysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "; revision: {}", self.revision)?;
        writeln!(
            f,
            "; jumpdests: [{}]",
            self.jumpdest_targets
                .iter()
                .map(|pc| format!("{pc:06x}"))
                .collect::<Vec<_>>()
                .join(", ")
        )?;
        for instr in &self.instructions {
            writeln!(f, "{instr}")?;
        }
        Ok(())
    }
}
