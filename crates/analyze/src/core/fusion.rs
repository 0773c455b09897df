use evmaot_vm::core::opcodes::{opcode_name, PUSH1, PUSH3};
use tracing::trace;

use crate::interfaces::{Instruction, Op, Operand};

/// Resolves the target of the JUMP or JUMPI just appended to `instructions`.
///
/// When the entry right before the jump is a PUSH1 to PUSH3 with a nonzero literal, the literal
/// becomes the jump's static target and the push is eliminated. A zero literal is never fused,
/// since a zero target means "not known statically".
pub(crate) fn fuse_jump(instructions: &mut [Instruction]) {
    let [.., prev, Instruction::Op(jump)] = instructions else {
        return;
    };

    let fused = match &*prev {
        Instruction::Op(Op { pc, opcode, operand: Operand::SmallPush(value) })
            if (PUSH1..=PUSH3).contains(opcode) && *value != 0 =>
        {
            Some((*pc, *opcode, *value as usize))
        }
        _ => None,
    };

    if let Some((pc, opcode, target)) = fused {
        trace!(
            "fused {} at {:06x} into {} at {:06x} (target {:06x})",
            opcode_name(opcode),
            pc,
            opcode_name(jump.opcode),
            jump.pc,
            target
        );
        jump.operand = Operand::Jump { target: Some(target) };
        *prev = Instruction::Eliminated { pc, opcode };
    }
}
