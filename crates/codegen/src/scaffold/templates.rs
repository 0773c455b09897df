//! C++ fragments of the shared runtime scaffold.

/// Start of `instrexe.hpp`: handler shapes, literal constructors and jump helpers.
pub(crate) const HEADER_PRELUDE: &str = r#"#pragma once
#include <cstddef>
#include <cstdint>
#include "analysis.hpp"
#include "instructions.hpp"

namespace evmone
{
// a popped jump target that is not taken
constexpr size_t kNoJump = ~size_t(0);
// a popped jump target that does not fit a program counter
constexpr size_t kBadTarget = ~size_t(0) - 1;

template <void InstrFn(Stack&)>
inline const instruction* op(const instruction* instr, AdvancedExecutionState& state) noexcept
{
    InstrFn(state.stack);
    return ++instr;
}

template <void InstrFn(ExecutionState&)>
inline const instruction* op(const instruction* instr, AdvancedExecutionState& state) noexcept
{
    InstrFn(state);
    return ++instr;
}

template <evmc_status_code InstrFn(ExecutionState&)>
inline const instruction* op(const instruction* instr, AdvancedExecutionState& state) noexcept
{
    const auto status_code = InstrFn(state);
    if (status_code != EVMC_SUCCESS)
        return state.exit(status_code);
    return ++instr;
}

inline const instruction* op_pc(const instruction* instr, AdvancedExecutionState& state) noexcept
{
    state.stack.push(instr->arg.number);
    return ++instr;
}

inline const instruction* op_push0(const instruction* instr, AdvancedExecutionState& state) noexcept
{
    state.stack.push(0);
    return ++instr;
}

inline const instruction* op_push_small(const instruction* instr, AdvancedExecutionState& state) noexcept
{
    state.stack.push(instr->arg.small_push_value);
    return ++instr;
}

inline const instruction* op_push_full(const instruction* instr, AdvancedExecutionState& state) noexcept
{
    state.stack.push(*instr->arg.push_value);
    return ++instr;
}

inline size_t narrow_target_pc(const intx::uint256& pc) noexcept
{
    if (pc >= kBadTarget)
        return kBadTarget;
    return static_cast<size_t>(pc);
}

inline bool test_jump_cond(AdvancedExecutionState& state) noexcept
{
    const auto top = state.stack.pop();
    return top != 0;
}

inline size_t pop_target_pc(AdvancedExecutionState& state) noexcept
{
    const auto pc = state.stack.pop();
    return narrow_target_pc(pc);
}

inline size_t get_target_pc(AdvancedExecutionState& state) noexcept
{
    const auto pc = state.stack.pop();
    const auto cond = state.stack.pop();
    if (cond == 0)
        return kNoJump;
    return narrow_target_pc(pc);
}

const instruction* op_stop(const instruction*, AdvancedExecutionState& state) noexcept;
const instruction* op_invalid(const instruction*, AdvancedExecutionState& state) noexcept;
const instruction* op_sstore(const instruction* instr, AdvancedExecutionState& state) noexcept;
const instruction* op_gas(const instruction* instr, AdvancedExecutionState& state) noexcept;
template <evmc_status_code status_code>
const instruction* op_return(const instruction*, AdvancedExecutionState& state) noexcept;
template <evmc_call_kind Kind, bool Static = false>
const instruction* op_call(const instruction* instr, AdvancedExecutionState& state) noexcept;
template <evmc_call_kind Kind>
const instruction* op_create(const instruction* instr, AdvancedExecutionState& state) noexcept;
const instruction* op_undefined(const instruction*, AdvancedExecutionState& state) noexcept;
const instruction* op_selfdestruct(const instruction*, AdvancedExecutionState& state) noexcept;
const instruction* opx_beginblock(const instruction* instr, AdvancedExecutionState& state) noexcept;
}

inline evmone::instruction instr_from_block(uint32_t gas_cost, int16_t stack_req, int16_t stack_max_growth)
{
    evmone::instruction instr(nullptr);
    instr.arg.block.gas_cost = gas_cost;
    instr.arg.block.stack_req = stack_req;
    instr.arg.block.stack_max_growth = stack_max_growth;
    return instr;
}

inline evmone::instruction instr_from_push(uint64_t v)
{
    evmone::instruction instr(nullptr);
    instr.arg.small_push_value = v;
    return instr;
}

// v must outlive the instruction, so literals are emitted as static constants
inline evmone::instruction instr_from_push(const intx::uint256& v)
{
    evmone::instruction instr(nullptr);
    instr.arg.push_value = &v;
    return instr;
}

inline evmone::instruction instr_from_num(uint64_t n)
{
    evmone::instruction instr(nullptr);
    instr.arg.number = n;
    return instr;
}

"#;

/// Start of `instrexe.cpp`: the handlers compiled once and shared by every contract.
pub(crate) const SOURCE_PRELUDE: &str = r#"#include "instrexe.hpp"

namespace evmone
{
const instruction* op_stop(const instruction*, AdvancedExecutionState& state) noexcept
{
    return state.exit(EVMC_SUCCESS);
}

const instruction* op_invalid(const instruction*, AdvancedExecutionState& state) noexcept
{
    return state.exit(EVMC_INVALID_INSTRUCTION);
}

const instruction* op_sstore(const instruction* instr, AdvancedExecutionState& state) noexcept
{
    const auto gas_left_correction = state.current_block_cost - instr->arg.number;
    state.gas_left += gas_left_correction;

    const auto status = sstore(state);
    if (status != EVMC_SUCCESS)
        return state.exit(status);

    if ((state.gas_left -= gas_left_correction) < 0)
        return state.exit(EVMC_OUT_OF_GAS);

    return ++instr;
}

const instruction* op_gas(const instruction* instr, AdvancedExecutionState& state) noexcept
{
    const auto correction = state.current_block_cost - instr->arg.number;
    const auto gas = static_cast<uint64_t>(state.gas_left + correction);
    state.stack.push(gas);
    return ++instr;
}

template <evmc_status_code status_code>
const instruction* op_return(const instruction*, AdvancedExecutionState& state) noexcept
{
    const auto offset = state.stack[0];
    const auto size = state.stack[1];

    if (!check_memory(state, offset, size))
        return state.exit(EVMC_OUT_OF_GAS);

    state.output_size = static_cast<size_t>(size);
    if (state.output_size != 0)
        state.output_offset = static_cast<size_t>(offset);
    return state.exit(status_code);
}

template <evmc_call_kind Kind, bool Static>
const instruction* op_call(const instruction* instr, AdvancedExecutionState& state) noexcept
{
    const auto gas_left_correction = state.current_block_cost - instr->arg.number;
    state.gas_left += gas_left_correction;

    const auto status = call<Kind, Static>(state);
    if (status != EVMC_SUCCESS)
        return state.exit(status);

    if ((state.gas_left -= gas_left_correction) < 0)
        return state.exit(EVMC_OUT_OF_GAS);

    return ++instr;
}

template <evmc_call_kind Kind>
const instruction* op_create(const instruction* instr, AdvancedExecutionState& state) noexcept
{
    const auto gas_left_correction = state.current_block_cost - instr->arg.number;
    state.gas_left += gas_left_correction;

    const auto status = create<Kind>(state);
    if (status != EVMC_SUCCESS)
        return state.exit(status);

    if ((state.gas_left -= gas_left_correction) < 0)
        return state.exit(EVMC_OUT_OF_GAS);

    return ++instr;
}

const instruction* op_undefined(const instruction*, AdvancedExecutionState& state) noexcept
{
    return state.exit(EVMC_UNDEFINED_INSTRUCTION);
}

const instruction* op_selfdestruct(const instruction*, AdvancedExecutionState& state) noexcept
{
    return state.exit(selfdestruct(state));
}

const instruction* opx_beginblock(const instruction* instr, AdvancedExecutionState& state) noexcept
{
    auto& block = instr->arg.block;

    if ((state.gas_left -= block.gas_cost) < 0)
        return state.exit(EVMC_OUT_OF_GAS);

    if (static_cast<int>(state.stack.size()) < block.stack_req)
        return state.exit(EVMC_STACK_UNDERFLOW);

    if (static_cast<int>(state.stack.size()) + block.stack_max_growth > Stack::limit)
        return state.exit(EVMC_STACK_OVERFLOW);

    state.current_block_cost = block.gas_cost;
    return ++instr;
}
}

"#;
