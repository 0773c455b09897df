use std::fmt;

use alloy::primitives::U256;
use evmaot_vm::core::opcodes::opcode_name;

/// The aggregate resource requirements of one basic block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct BlockInfo {
    /// Total gas charged by every instruction in the block.
    pub gas_cost: u32,
    /// Stack depth required at block entry so that no instruction in the block underflows.
    pub stack_req: i16,
    /// Peak net stack growth reached inside the block.
    pub stack_max_growth: i16,
}

/// The synthetic marker that opens a basic block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct BlockHeader {
    /// Byte offset at which the block starts.
    pub pc: usize,
    /// The block's aggregates, populated when the block is closed.
    pub info: BlockInfo,
}

/// Auxiliary data attached to a retained instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operand {
    /// No auxiliary data.
    None,
    /// The literal of a PUSH1 to PUSH8.
    SmallPush(u64),
    /// The literal of a PUSH9 to PUSH32.
    Push(U256),
    /// The block's running gas total at this instruction, including its own cost.
    GasCheckpoint(u32),
    /// The instruction's own offset, for PC.
    ProgramCounter(usize),
    /// The target of a JUMP or JUMPI, when it is known statically.
    Jump {
        /// The fused target, or `None` when the target is popped at run time.
        target: Option<usize>,
    },
}

/// A retained opcode occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Op {
    /// Byte offset of the opcode.
    pub pc: usize,
    /// The opcode value.
    pub opcode: u8,
    /// Opcode-dependent auxiliary data.
    pub operand: Operand,
}

/// One entry of the instruction list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Instruction {
    /// Opens a basic block.
    BeginBlock(BlockHeader),
    /// A retained opcode.
    Op(Op),
    /// A push whose literal was folded into the following jump.
    Eliminated {
        /// Byte offset of the eliminated push.
        pc: usize,
        /// The eliminated push opcode.
        opcode: u8,
    },
}

impl Instruction {
    /// Returns the byte offset of the entry.
    pub fn pc(&self) -> usize {
        match self {
            Self::BeginBlock(header) => header.pc,
            Self::Op(op) => op.pc,
            Self::Eliminated { pc, .. } => *pc,
        }
    }

    /// Returns the retained opcode, if any.
    pub fn as_op(&self) -> Option<&Op> {
        match self {
            Self::Op(op) => Some(op),
            _ => None,
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => Ok(()),
            Self::SmallPush(value) => write!(f, "0x{value:x}"),
            Self::Push(value) => write!(f, "0x{value:x}"),
            Self::GasCheckpoint(gas) => write!(f, "gas={gas}"),
            Self::ProgramCounter(pc) => write!(f, "pc={pc}"),
            Self::Jump { target: Some(target) } => write!(f, "-> {target:06x}"),
            Self::Jump { target: None } => f.write_str("-> dynamic"),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BeginBlock(BlockHeader { pc, info }) => write!(
                f,
                "{pc:06x} BEGINBLOCK gas={} stack_req={} stack_max_growth={}",
                info.gas_cost, info.stack_req, info.stack_max_growth
            ),
            Self::Op(Op { pc, opcode, operand: Operand::None }) => {
                write!(f, "{pc:06x}   {}", opcode_name(*opcode))
            }
            Self::Op(Op { pc, opcode, operand }) => {
                write!(f, "{pc:06x}   {} {operand}", opcode_name(*opcode))
            }
            Self::Eliminated { pc, opcode } => {
                write!(f, "{pc:06x}   {} (eliminated)", opcode_name(*opcode))
            }
        }
    }
}
