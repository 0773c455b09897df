use evmaot_vm::core::opcodes::OpTableEntry;

use crate::interfaces::BlockInfo;

/// Running aggregates of the currently open basic block.
///
/// Values are accumulated in wide integers and clamped when the block is closed. A clamped stack
/// value already exceeds the 1024 item stack limit, so clamping never changes a precheck outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct BlockAccumulator {
    gas_cost: u64,
    stack_req: i32,
    stack_max_growth: i32,
    stack_change: i32,
    begin_index: usize,
}

impl BlockAccumulator {
    /// Opens a block whose marker sits at `begin_index` in the instruction list.
    pub(crate) fn open(begin_index: usize) -> Self {
        Self { begin_index, ..Default::default() }
    }

    /// Accounts for one opcode of the block.
    pub(crate) fn account(&mut self, entry: &OpTableEntry) {
        // an opcode popping `stack_req` items after `stack_change` net pushes needs
        // `stack_req - stack_change` items to be present when the block is entered
        self.stack_req = self.stack_req.max(entry.stack_req as i32 - self.stack_change);
        self.stack_change += entry.stack_change as i32;
        self.stack_max_growth = self.stack_max_growth.max(self.stack_change);
        self.gas_cost += entry.gas() as u64;
    }

    /// Returns the gas accounted so far, including the last accounted opcode.
    pub(crate) fn gas_so_far(&self) -> u32 {
        u32::try_from(self.gas_cost).unwrap_or(u32::MAX)
    }

    /// Returns the index of the block's marker.
    pub(crate) fn begin_index(&self) -> usize {
        self.begin_index
    }

    /// Closes the block, returning its compact aggregates.
    pub(crate) fn close(&self) -> BlockInfo {
        BlockInfo {
            gas_cost: self.gas_so_far(),
            stack_req: clamp_i16(self.stack_req),
            stack_max_growth: clamp_i16(self.stack_max_growth),
        }
    }
}

fn clamp_i16(value: i32) -> i16 {
    value.clamp(i16::MIN as i32, i16::MAX as i32) as i16
}

#[cfg(test)]
mod tests {
    use super::*;
    use evmaot_vm::core::{
        opcodes::{op_table, ADD, DUP1, POP, PUSH1, SWAP2},
        revision::Revision,
    };

    fn accumulate(ops: &[u8]) -> BlockInfo {
        let table = op_table(Revision::latest());
        let mut block = BlockAccumulator::open(0);
        for op in ops {
            block.account(&table[*op as usize]);
        }
        block.close()
    }

    #[test]
    fn test_empty_block() {
        assert_eq!(accumulate(&[]), BlockInfo::default());
    }

    #[test]
    fn test_stack_req_is_worst_case_deficit() {
        // ADD needs 2, then POP needs 1 more beyond the single result
        let info = accumulate(&[ADD, POP, POP]);
        assert_eq!(info.stack_req, 3);
        assert_eq!(info.stack_max_growth, 0);
        assert_eq!(info.gas_cost, 3 + 2 + 2);
    }

    #[test]
    fn test_pushes_cover_later_pops() {
        let info = accumulate(&[PUSH1, PUSH1, ADD, DUP1, SWAP2]);
        // SWAP2 needs 3 items while only 2 were produced in the block
        assert_eq!(info.stack_req, 1);
        assert_eq!(info.stack_max_growth, 2);
    }

    #[test]
    fn test_clamping() {
        let table = op_table(Revision::latest());
        let mut block = BlockAccumulator::open(0);
        for _ in 0..40_000 {
            block.account(&table[PUSH1 as usize]);
        }
        assert_eq!(block.close().stack_max_growth, i16::MAX);
        assert_eq!(block.close().gas_cost, 120_000);
    }
}
