mod block;
mod fusion;
mod properties;

use std::time::Instant;

use alloy::primitives::U256;
use evmaot_vm::core::{
    opcodes::{
        op_table, push_size, CALL, CALLCODE, CREATE, CREATE2, DELEGATECALL, GAS, JUMP, JUMPDEST,
        JUMPI, PC, PUSH1, PUSH32, PUSH8, PUSH9, RETURN, REVERT, SELFDESTRUCT, SSTORE, STATICCALL,
        STOP,
    },
    revision::Revision,
};
use tracing::{debug, info};

use crate::{
    core::block::BlockAccumulator,
    error::Error,
    interfaces::{AdvancedCodeAnalysis, AnalyzerArgs, Instruction, Op, Operand},
};

/// Analyzes the bytecode named by `args`.
///
/// The target is loaded (raw hex or a file containing hex), then split into basic blocks for the
/// requested revision, or the latest revision when none is given.
pub async fn analyze_target(args: AnalyzerArgs) -> Result<AdvancedCodeAnalysis, Error> {
    let start_time = Instant::now();
    let revision = args.revision.unwrap_or_default();

    let start_fetch_time = Instant::now();
    let bytecode = args.get_bytecode().map_err(|e| Error::InvalidTarget(e.to_string()))?;
    debug!("fetching target bytecode took {:?}", start_fetch_time.elapsed());

    let analysis = analyze(revision, &bytecode);

    info!(
        "analyzed {} bytes into {} blocks for {}",
        bytecode.len(),
        analysis.block_count(),
        revision
    );
    debug!("analysis took {:?}", start_time.elapsed());
    Ok(analysis)
}

/// Decodes `code` into an instruction list annotated with per-block aggregates.
///
/// Analysis never fails. Undefined opcodes are kept as ordinary instructions, and a push whose
/// literal runs past the end of the code reads zero bytes for the missing part.
///
/// ```
/// use evmaot_analyzer::{analyze, Instruction};
/// use evmaot_vm::core::revision::Revision;
///
/// let analysis = analyze(Revision::latest(), &[]);
/// assert_eq!(analysis.instructions.len(), 2);
/// assert!(matches!(analysis.instructions[0], Instruction::BeginBlock(_)));
/// ```
pub fn analyze(revision: Revision, code: &[u8]) -> AdvancedCodeAnalysis {
    let table = op_table(revision);
    let mut analysis = AdvancedCodeAnalysis::new(revision, code.len());

    let mut block = BlockAccumulator::open(analysis.push_marker(0));
    let mut pos = 0;
    while pos < code.len() {
        let pc = pos;
        let opcode = code[pos];
        pos += 1;

        block.account(&table[opcode as usize]);

        if opcode == JUMPDEST {
            // a JUMPDEST always opens the block it belongs to
            analysis.add_jumpdest(pc);
        } else {
            let operand = match opcode {
                PUSH1..=PUSH8 => {
                    let size = push_size(opcode);
                    let value = read_small_push(code, pos, size);
                    pos += size;
                    Operand::SmallPush(value)
                }
                PUSH9..=PUSH32 => {
                    let size = push_size(opcode);
                    let value = read_push(code, pos, size);
                    pos += size;
                    Operand::Push(value)
                }
                GAS | CALL | CALLCODE | DELEGATECALL | STATICCALL | CREATE | CREATE2 | SSTORE => {
                    Operand::GasCheckpoint(block.gas_so_far())
                }
                PC => Operand::ProgramCounter(pc),
                JUMP | JUMPI => Operand::Jump { target: None },
                _ => Operand::None,
            };
            analysis.instructions.push(Instruction::Op(Op { pc, opcode, operand }));

            if opcode == JUMP || opcode == JUMPI {
                fusion::fuse_jump(&mut analysis.instructions);
            }
        }

        if is_terminator(opcode) || code.get(pos) == Some(&JUMPDEST) {
            analysis.close_block(block.begin_index(), block.close());
            block = BlockAccumulator::open(analysis.push_marker(pos));
        }
    }
    analysis.close_block(block.begin_index(), block.close());

    // guard against falling off the end of the code
    analysis.instructions.push(Instruction::Op(Op {
        pc: code.len(),
        opcode: STOP,
        operand: Operand::None,
    }));

    debug!(
        "analyzed {} bytes: {} instructions, {} blocks, {} jumpdests, {} fused jumps",
        code.len(),
        analysis.instructions.len(),
        analysis.block_count(),
        analysis.jumpdest_targets.len(),
        analysis.eliminated_count()
    );
    analysis
}

/// Returns true if `opcode` ends its basic block.
fn is_terminator(opcode: u8) -> bool {
    matches!(opcode, JUMP | JUMPI | STOP | RETURN | REVERT | SELFDESTRUCT)
}

/// Reads a big-endian literal of `size` (at most 8) bytes starting at `pos`, right-padding with
/// zeros when the code ends early.
fn read_small_push(code: &[u8], pos: usize, size: usize) -> u64 {
    let mut buf = [0u8; 8];
    let available = code.get(pos..).unwrap_or_default();
    let n = size.min(available.len());
    buf[8 - size..8 - size + n].copy_from_slice(&available[..n]);
    u64::from_be_bytes(buf)
}

/// Reads a big-endian literal of `size` (at most 32) bytes starting at `pos`, right-padding with
/// zeros when the code ends early.
fn read_push(code: &[u8], pos: usize, size: usize) -> U256 {
    let mut buf = [0u8; 32];
    let available = code.get(pos..).unwrap_or_default();
    let n = size.min(available.len());
    buf[32 - size..32 - size + n].copy_from_slice(&available[..n]);
    U256::from_be_bytes(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interfaces::{BlockHeader, BlockInfo};
    use evmaot_vm::core::opcodes::{ADD, PUSH2, PUSH3};

    fn op(pc: usize, opcode: u8, operand: Operand) -> Instruction {
        Instruction::Op(Op { pc, opcode, operand })
    }

    fn marker(pc: usize, gas_cost: u32, stack_req: i16, stack_max_growth: i16) -> Instruction {
        Instruction::BeginBlock(BlockHeader {
            pc,
            info: BlockInfo { gas_cost, stack_req, stack_max_growth },
        })
    }

    /// The offsets of every opcode an interpreter would decode, JUMPDESTs excluded.
    fn decoded_offsets(code: &[u8]) -> Vec<usize> {
        let mut offsets = Vec::new();
        let mut pos = 0;
        while pos < code.len() {
            if code[pos] != JUMPDEST {
                offsets.push(pos);
            }
            pos += 1 + push_size(code[pos]);
        }
        offsets
    }

    fn retained_offsets(analysis: &AdvancedCodeAnalysis) -> Vec<usize> {
        analysis
            .instructions
            .iter()
            .filter(|instr| !matches!(instr, Instruction::BeginBlock(_)))
            .map(Instruction::pc)
            .collect()
    }

    #[test]
    fn test_empty_code() {
        let analysis = analyze(Revision::latest(), &[]);
        assert_eq!(analysis.instructions, vec![marker(0, 0, 0, 0), op(0, STOP, Operand::None)]);
        assert!(analysis.jumpdest_targets.is_empty());
    }

    #[test]
    fn test_zero_push_before_jump_is_not_fused() {
        // PUSH1 5, PUSH1 0, JUMP
        let analysis = analyze(Revision::latest(), &[0x60, 0x05, 0x60, 0x00, 0x56]);
        assert_eq!(
            analysis.instructions,
            vec![
                marker(0, 14, 0, 2),
                op(0, PUSH1, Operand::SmallPush(5)),
                op(2, PUSH1, Operand::SmallPush(0)),
                op(4, JUMP, Operand::Jump { target: None }),
                marker(5, 0, 0, 0),
                op(5, STOP, Operand::None),
            ]
        );
    }

    #[test]
    fn test_fused_jump_to_non_jumpdest() {
        // PUSH1 5, JUMP, STOP, STOP, STOP
        let analysis = analyze(Revision::latest(), &[0x60, 0x05, 0x56, 0x00, 0x00, 0x00]);
        assert_eq!(analysis.instructions[1], Instruction::Eliminated { pc: 0, opcode: PUSH1 });
        assert_eq!(analysis.instructions[2], op(2, JUMP, Operand::Jump { target: Some(5) }));
        assert!(!analysis.is_jumpdest(5));
    }

    #[test]
    fn test_fused_jump_keeps_its_target() {
        // PUSH1 3, JUMP, STOP, JUMPDEST, STOP. The JUMPDEST sits at offset 4, so the fused target
        // is recorded as is and judged by the emitter.
        let analysis = analyze(Revision::latest(), &[0x60, 0x03, 0x56, 0x00, 0x5b, 0x00]);
        assert_eq!(
            analysis.instructions,
            vec![
                marker(0, 11, 0, 1),
                Instruction::Eliminated { pc: 0, opcode: PUSH1 },
                op(2, JUMP, Operand::Jump { target: Some(3) }),
                marker(3, 0, 0, 0),
                op(3, STOP, Operand::None),
                marker(4, 1, 0, 0),
                op(5, STOP, Operand::None),
                marker(6, 0, 0, 0),
                op(6, STOP, Operand::None),
            ]
        );
        assert_eq!(analysis.jumpdest_targets, vec![4]);
        assert!(analysis.is_jumpdest(4));
    }

    #[test]
    fn test_stop_ends_block_without_jumpdest() {
        // STOP, ADD
        let analysis = analyze(Revision::latest(), &[0x00, 0x01]);
        assert_eq!(
            analysis.instructions,
            vec![
                marker(0, 0, 0, 0),
                op(0, STOP, Operand::None),
                marker(1, 3, 2, 0),
                op(1, ADD, Operand::None),
                op(2, STOP, Operand::None),
            ]
        );
    }

    #[test]
    fn test_next_jumpdest_closes_block() {
        // PUSH1 1, JUMPDEST, JUMPDEST, STOP
        let analysis = analyze(Revision::latest(), &[0x60, 0x01, 0x5b, 0x5b, 0x00]);
        let headers: Vec<usize> = analysis.blocks().map(|block| block.header.pc).collect();
        assert_eq!(headers, vec![0, 2, 3, 5]);
        assert_eq!(analysis.jumpdest_targets, vec![2, 3]);
    }

    #[test]
    fn test_jumpdest_at_offset_zero() {
        let analysis = analyze(Revision::latest(), &[0x5b, 0x00]);
        assert_eq!(analysis.instructions[0], marker(0, 1, 0, 0));
        assert!(analysis.is_jumpdest(0));
    }

    #[test]
    fn test_gas_checkpoints_and_pc() {
        // PUSH1 0, PUSH1 0, SSTORE, GAS, PC
        let analysis = analyze(Revision::Istanbul, &[0x60, 0x00, 0x60, 0x00, 0x55, 0x5a, 0x58]);
        assert_eq!(analysis.instructions[3], op(4, SSTORE, Operand::GasCheckpoint(6)));
        assert_eq!(analysis.instructions[4], op(5, GAS, Operand::GasCheckpoint(8)));
        assert_eq!(analysis.instructions[5], op(6, PC, Operand::ProgramCounter(6)));
        assert_eq!(analysis.instructions[0], marker(0, 10, 0, 2));
    }

    #[test]
    fn test_wide_push_literal() {
        let mut code = vec![PUSH32];
        code.extend((1..=32).collect::<Vec<u8>>());
        let analysis = analyze(Revision::latest(), &code);

        let expected = U256::from_be_slice(&code[1..]);
        assert_eq!(analysis.instructions[1], op(0, PUSH32, Operand::Push(expected)));
        assert_eq!(analysis.instructions[2], op(33, STOP, Operand::None));
    }

    #[test]
    fn test_truncated_push_is_zero_padded() {
        let small = analyze(Revision::latest(), &[PUSH3, 0xab]);
        assert_eq!(small.instructions[1], op(0, PUSH3, Operand::SmallPush(0xab0000)));
        assert_eq!(small.instructions[2], op(2, STOP, Operand::None));

        let wide = analyze(Revision::latest(), &[PUSH9, 0x01]);
        assert_eq!(wide.instructions[1], op(0, PUSH9, Operand::Push(U256::from(1u8) << 64)));
    }

    #[test]
    fn test_undefined_opcode_is_retained() {
        // PUSH0 is undefined before Shanghai
        let analysis = analyze(Revision::London, &[0x5f, 0x0c]);
        assert_eq!(analysis.instructions[1], op(0, 0x5f, Operand::None));
        assert_eq!(analysis.instructions[2], op(1, 0x0c, Operand::None));
        assert_eq!(analysis.instructions[0], marker(0, 0, 0, 0));

        let shanghai = analyze(Revision::Shanghai, &[0x5f]);
        assert_eq!(shanghai.instructions[0], marker(0, 2, 0, 1));
    }

    #[test]
    fn test_fusion_needs_small_push() {
        // PUSH2 0x0003, JUMPI / PUSH3 0, JUMPI / ADD, JUMP
        let fused = analyze(Revision::latest(), &[PUSH2, 0x00, 0x03, JUMPI]);
        assert_eq!(fused.instructions[2], op(3, JUMPI, Operand::Jump { target: Some(3) }));

        let zero = analyze(Revision::latest(), &[PUSH3, 0x00, 0x00, 0x00, JUMPI]);
        assert_eq!(zero.instructions[2], op(4, JUMPI, Operand::Jump { target: None }));

        let computed = analyze(Revision::latest(), &[ADD, JUMP]);
        assert_eq!(computed.instructions[2], op(1, JUMP, Operand::Jump { target: None }));
    }

    #[test]
    fn test_retained_offsets_reproduce_decoding() {
        let samples: [&[u8]; 5] = [
            &[],
            &[0x60, 0x03, 0x56, 0x00, 0x5b, 0x00],
            &[0x5b, 0x5b, 0x61, 0x5b, 0x5b, 0x00, 0x7f, 0x01],
            &[0x01, 0x02, 0x57, 0x5b, 0x58, 0x5a, 0xf3, 0xfe, 0xff],
            &[0x62, 0x00, 0x00, 0x07, 0x56, 0x60, 0x00, 0x5b, 0x60, 0x05, 0x57],
        ];
        for code in samples {
            let analysis = analyze(Revision::latest(), code);
            let mut offsets = decoded_offsets(code);
            offsets.push(code.len());
            assert_eq!(retained_offsets(&analysis), offsets, "code {code:02x?}");
        }
    }

    #[test]
    fn test_every_block_header_matches_its_body() {
        let code = [0x60, 0x01, 0x60, 0x02, 0x01, 0x80, 0x5b, 0x50, 0x50, 0x50, 0x00];
        let analysis = analyze(Revision::latest(), &code);
        let blocks: Vec<_> = analysis.blocks().collect();

        // PUSH1, PUSH1, ADD, DUP1 | JUMPDEST, POP, POP, POP, STOP | <end>
        assert_eq!(
            blocks[0].header.info,
            BlockInfo { gas_cost: 12, stack_req: 0, stack_max_growth: 2 }
        );
        assert_eq!(
            blocks[1].header.info,
            BlockInfo { gas_cost: 7, stack_req: 3, stack_max_growth: 0 }
        );
        assert_eq!(blocks[2].header.info, BlockInfo::default());
    }

    #[tokio::test]
    async fn test_analyze_target() {
        let args = crate::AnalyzerArgsBuilder::new()
            .target("0x6003565b00".to_string())
            .revision(Some(Revision::Berlin))
            .build()
            .expect("failed to build args");

        let analysis = analyze_target(args).await.expect("failed to analyze target");
        assert_eq!(analysis.revision, Revision::Berlin);
        assert_eq!(analysis.jumpdest_targets, vec![3]);
    }

    #[tokio::test]
    async fn test_analyze_invalid_target() {
        let args = crate::AnalyzerArgsBuilder::new()
            .target("0x60zz".to_string())
            .build()
            .expect("failed to build args");

        assert!(matches!(analyze_target(args).await, Err(Error::InvalidTarget(_))));
    }
}
