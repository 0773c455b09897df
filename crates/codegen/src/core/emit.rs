use std::fmt::Write;

use evmaot_vm::core::opcodes::{opcode_name, JUMPDEST};

use crate::{
    core::graph::{Argument, BasicBlock, ControlFlowGraph, Exit, Step},
    error::Error,
    scaffold::{wrapper_name, HEADER_FILE},
};

/// Writes a contract's control-flow graph as a C++ translation unit.
///
/// Blocks are written in program order. Each block opens with its label (when it is a jump
/// destination) and its precheck, and control between blocks is expressed with `goto`: to a
/// label for resolved jumps, to `JUMPTABLE` for popped targets and to `ENDING` when a handler
/// stops execution.
#[derive(Debug)]
pub struct Emitter<'a> {
    cfg: &'a ControlFlowGraph,
    out: String,
}

impl<'a> Emitter<'a> {
    /// Emits the translation unit defining `execute_<name>`.
    pub fn emit(name: &str, cfg: &'a ControlFlowGraph) -> Result<String, Error> {
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(Error::InvalidName(name.to_string()));
        }

        let mut emitter = Self { cfg, out: String::new() };
        emitter.prologue(name)?;
        for (_, block) in cfg.blocks() {
            emitter.block(block)?;
        }
        emitter.jump_table()?;
        emitter.cleanup()?;
        Ok(emitter.out)
    }

    fn prologue(&mut self, name: &str) -> Result<(), Error> {
        let signature = format!(
            "evmc_result execute_{name}(evmc_vm* /*unused*/, const evmc_host_interface* host, \
             evmc_host_context* ctx,\n    evmc_revision rev, const evmc_message* msg, const uint8_t* \
             code, size_t code_size) noexcept"
        );

        writeln!(self.out, "// generated by evmaot for {}, do not edit", self.cfg.revision)?;
        writeln!(self.out, "#include <memory>")?;
        writeln!(self.out, "#include \"{HEADER_FILE}\"")?;
        writeln!(self.out)?;
        writeln!(self.out, "extern \"C\" {{ // declare the execute function with C linkage")?;
        writeln!(self.out, "{signature};")?;
        writeln!(self.out, "}}")?;
        writeln!(self.out)?;

        // wide literals live as long as the program so instructions can point at them
        let mut literals = 0;
        for (_, block) in self.cfg.blocks() {
            for step in &block.steps {
                if let Step::Invoke { pc, argument: Argument::Push(value), .. } = step {
                    let [w0, w1, w2, w3] = value.as_limbs();
                    writeln!(
                        self.out,
                        "static const intx::uint256 kPush{pc}{{{w0:#x}ull, {w1:#x}ull, {w2:#x}ull, {w3:#x}ull}};"
                    )?;
                    literals += 1;
                }
            }
        }
        if literals > 0 {
            writeln!(self.out)?;
        }

        writeln!(self.out, "{signature}")?;
        writeln!(self.out, "{{")?;
        writeln!(
            self.out,
            "    auto state = std::make_unique<evmone::AdvancedExecutionState>(*msg, rev, *host, ctx, code, code_size);"
        )?;
        writeln!(self.out, "    evmone::instruction instr(nullptr);")?;
        writeln!(self.out, "    evmone::instruction* next_instr = 1 + &instr;")?;
        writeln!(self.out, "    size_t PC = ~size_t(0);")?;
        Ok(())
    }

    fn block(&mut self, block: &BasicBlock) -> Result<(), Error> {
        if let Some(label) = block.label {
            writeln!(self.out, "L{label:05}:")?;
        }
        for step in &block.steps {
            self.step(block, step)?;
        }
        self.exit(block)
    }

    fn step(&mut self, block: &BasicBlock, step: &Step) -> Result<(), Error> {
        match *step {
            Step::Precheck(info) => {
                writeln!(self.out, "// pc={} BEGINBLOCK", block.start_pc)?;
                writeln!(
                    self.out,
                    "instr=instr_from_block({}, {}, {});",
                    info.gas_cost, info.stack_req, info.stack_max_growth
                )?;
                writeln!(
                    self.out,
                    "if(next_instr!={}(&instr, *state)) goto ENDING;",
                    wrapper_name(JUMPDEST)
                )?;
            }
            Step::Eliminated { pc, opcode } => {
                writeln!(
                    self.out,
                    "// pc={pc} op={opcode} ({}) fused into the jump",
                    opcode_name(opcode)
                )?;
            }
            Step::Invoke { pc, opcode, argument, may_break } => {
                writeln!(self.out, "// pc={pc} op={opcode} ({})", opcode_name(opcode))?;
                match argument {
                    Argument::None => {}
                    Argument::SmallPush(value) => {
                        writeln!(self.out, "instr=instr_from_push({value}ull);")?
                    }
                    Argument::Push(_) => writeln!(self.out, "instr=instr_from_push(kPush{pc});")?,
                    Argument::Number(number) => {
                        writeln!(self.out, "instr=instr_from_num({number});")?
                    }
                }
                if may_break {
                    // a handler that did not return the next instruction stopped execution
                    writeln!(
                        self.out,
                        "if(next_instr!={}(&instr, *state)) goto ENDING;",
                        wrapper_name(opcode)
                    )?;
                } else {
                    writeln!(self.out, "{}(&instr, *state);", wrapper_name(opcode))?;
                }
            }
            Step::Undefined { pc, opcode } => {
                writeln!(self.out, "// pc={pc} op={opcode} ({})", opcode_name(opcode))?;
                writeln!(self.out, "evmone::op_undefined(&instr, *state);")?;
                writeln!(self.out, "goto ENDING;")?;
            }
        }
        Ok(())
    }

    fn exit(&mut self, block: &BasicBlock) -> Result<(), Error> {
        if let (Some(pc), Some(opcode)) = (block.jump_pc, block.exit.opcode()) {
            writeln!(self.out, "// pc={pc} op={opcode} ({})", opcode_name(opcode))?;
        }

        match block.exit {
            Exit::FallThrough => {}
            Exit::Jump(target) => writeln!(self.out, "goto L{target:05};")?,
            Exit::Branch(target) => {
                writeln!(self.out, "if(test_jump_cond(*state)) {{")?;
                writeln!(self.out, "  goto L{target:05};")?;
                writeln!(self.out, "}}")?;
            }
            Exit::BadJump(target) => {
                writeln!(
                    self.out,
                    "state->exit(EVMC_BAD_JUMP_DESTINATION); goto ENDING; // {target}"
                )?;
            }
            Exit::BadBranch(target) => {
                writeln!(self.out, "if(test_jump_cond(*state)) {{")?;
                writeln!(
                    self.out,
                    "  state->exit(EVMC_BAD_JUMP_DESTINATION); goto ENDING; // {target}"
                )?;
                writeln!(self.out, "}}")?;
            }
            Exit::Dispatch => {
                writeln!(self.out, "PC=pop_target_pc(*state);")?;
                writeln!(self.out, "goto JUMPTABLE;")?;
            }
            Exit::DispatchIf => {
                writeln!(self.out, "PC=get_target_pc(*state);")?;
                // an all-ones PC means the jump is not taken
                writeln!(self.out, "if((~PC)!=0) goto JUMPTABLE;")?;
            }
            Exit::Halt => writeln!(self.out, "goto ENDING;")?,
        }
        Ok(())
    }

    fn jump_table(&mut self) -> Result<(), Error> {
        writeln!(self.out, "JUMPTABLE:")?;
        writeln!(self.out, "switch(PC){{")?;
        for (target, _) in self.cfg.jump_table_entries() {
            writeln!(self.out, "  case {target}: goto L{target:05};")?;
        }
        writeln!(self.out, "  default:")?;
        writeln!(self.out, "    state->exit(EVMC_BAD_JUMP_DESTINATION);")?;
        writeln!(self.out, "    goto ENDING;")?;
        writeln!(self.out, "}}")?;
        Ok(())
    }

    fn cleanup(&mut self) -> Result<(), Error> {
        self.out.push_str(
            r#"ENDING:
    const auto gas_left =
        (state->status == EVMC_SUCCESS || state->status == EVMC_REVERT) ? state->gas_left : 0;

    return evmc::make_result(
        state->status, gas_left, state->memory.data() + state->output_offset, state->output_size);
}
"#,
        );
        Ok(())
    }
}
