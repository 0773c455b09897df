//! EVM opcodes and related utilities.
//!
//! This module provides the static description of every opcode the compiler knows about:
//! - Opcode constants and names
//! - Stack inputs and outputs, from which block stack requirements are derived
//! - The revision that activates the opcode and its gas cost at activation
//! - The runtime handler expression and how the generated code must dispatch to it
//!
//! Repricings and the per-revision tables built from this description live in [`schedule`].
//!
//! The declaration style is partially adapted from https://github.com/bluealloy/revm

/// Per-revision opcode tables
pub mod schedule;
pub use schedule::*;

use crate::core::revision::Revision;

/// How the generated code dispatches to an opcode's runtime handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerKind {
    /// A pure stack operation. Never fails once the block precheck has passed.
    Stack,
    /// Reads execution state. Never fails once the block precheck has passed.
    State,
    /// Reads or writes execution state and may fail, so the caller must test the result.
    StateWithStatus,
    /// Needs the instruction's auxiliary number (pc or block gas so far). Never fails.
    Full,
    /// Needs the instruction's context and may end execution.
    FullWithBreak,
    /// JUMP and JUMPI. Lowered to native control flow, never dispatched.
    Jump,
}

impl HandlerKind {
    /// Returns true if a handler of this kind may not return the next instruction, in which case
    /// the generated code must branch to the cleanup path.
    #[inline]
    pub const fn may_break(self) -> bool {
        matches!(self, Self::StateWithStatus | Self::FullWithBreak)
    }
}

/// Information about an opcode, such as its name, stack inputs and outputs, and runtime handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OpCodeInfo {
    /// Name
    name: &'static str,
    /// Stack inputs.
    inputs: u8,
    /// Stack outputs.
    outputs: u8,
    /// Gas cost charged when the opcode is activated.
    gas: u16,
    /// The revision that activates the opcode.
    since: Revision,
    /// How the generated code dispatches to the handler.
    kind: HandlerKind,
    /// The runtime handler expression, relative to the `evmone` namespace.
    handler: &'static str,
    /// Whether the handler wrapper is defined inline in the scaffold header.
    inline: bool,
}

impl OpCodeInfo {
    /// Creates a new opcode info with the given name and default values.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            inputs: 0,
            outputs: 0,
            gas: 0,
            since: Revision::Frontier,
            kind: HandlerKind::Stack,
            handler: "",
            inline: false,
        }
    }

    /// Returns the name of the opcode.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the number of stack inputs.
    #[inline]
    pub const fn inputs(&self) -> u8 {
        self.inputs
    }

    /// Returns the number of stack outputs.
    #[inline]
    pub const fn outputs(&self) -> u8 {
        self.outputs
    }

    /// Returns the minimum stack depth the opcode needs.
    #[inline]
    pub const fn stack_req(&self) -> i16 {
        self.inputs as i16
    }

    /// Returns the net change of the stack depth after the opcode executes.
    #[inline]
    pub const fn stack_change(&self) -> i16 {
        self.outputs as i16 - self.inputs as i16
    }

    /// Returns the gas charged by the opcode when it is activated.
    #[inline]
    pub const fn base_gas(&self) -> u16 {
        self.gas
    }

    /// Returns the revision that activates the opcode.
    #[inline]
    pub const fn since(&self) -> Revision {
        self.since
    }

    /// Returns the handler classification.
    #[inline]
    pub const fn kind(&self) -> HandlerKind {
        self.kind
    }

    /// Returns the runtime handler expression.
    #[inline]
    pub const fn handler(&self) -> &'static str {
        self.handler
    }

    /// Returns whether the handler wrapper is inlined.
    #[inline]
    pub const fn is_inline(&self) -> bool {
        self.inline
    }
}

/// Sets the number of stack inputs and outputs.
#[inline]
pub const fn stack_io(mut op: OpCodeInfo, inputs: u8, outputs: u8) -> OpCodeInfo {
    op.inputs = inputs;
    op.outputs = outputs;
    op
}

/// Sets the gas charged at activation.
#[inline]
pub const fn gas(mut op: OpCodeInfo, gas: u16) -> OpCodeInfo {
    op.gas = gas;
    op
}

/// Sets the activating revision.
#[inline]
pub const fn since(mut op: OpCodeInfo, revision: Revision) -> OpCodeInfo {
    op.since = revision;
    op
}

/// Sets the runtime handler expression.
#[inline]
pub const fn handler(mut op: OpCodeInfo, handler: &'static str) -> OpCodeInfo {
    op.handler = handler;
    op
}

/// Marks the handler wrapper as inline.
#[inline]
pub const fn inlined(mut op: OpCodeInfo) -> OpCodeInfo {
    op.inline = true;
    op
}

/// Classifies the handler as [`HandlerKind::Stack`].
#[inline]
pub const fn stack_op(mut op: OpCodeInfo) -> OpCodeInfo {
    op.kind = HandlerKind::Stack;
    op
}

/// Classifies the handler as [`HandlerKind::State`].
#[inline]
pub const fn state(mut op: OpCodeInfo) -> OpCodeInfo {
    op.kind = HandlerKind::State;
    op
}

/// Classifies the handler as [`HandlerKind::StateWithStatus`].
#[inline]
pub const fn state_with_status(mut op: OpCodeInfo) -> OpCodeInfo {
    op.kind = HandlerKind::StateWithStatus;
    op
}

/// Classifies the handler as [`HandlerKind::Full`].
#[inline]
pub const fn full(mut op: OpCodeInfo) -> OpCodeInfo {
    op.kind = HandlerKind::Full;
    op
}

/// Classifies the handler as [`HandlerKind::FullWithBreak`].
#[inline]
pub const fn full_with_break(mut op: OpCodeInfo) -> OpCodeInfo {
    op.kind = HandlerKind::FullWithBreak;
    op
}

/// Classifies the opcode as [`HandlerKind::Jump`].
#[inline]
pub const fn jump(mut op: OpCodeInfo) -> OpCodeInfo {
    op.kind = HandlerKind::Jump;
    op
}

macro_rules! opcodes {
    ($($val:literal => $name:ident => $($modifier:ident $(( $($modifier_arg:expr),* ))?),*);* $(;)?) => {
        // create a constant for each opcode
        $(
            #[doc = concat!("The `", stringify!($val), "` (\"", stringify!($name),"\") opcode.")]
            pub const $name: u8 = $val;
        )*

        /// Maps each opcode to its info.
        pub const OPCODE_INFO_TABLE: [Option<OpCodeInfo>; 256] = {
            let mut map = [None; 256];
            let mut prev: u8 = 0;
            $(
                let val: u8 = $val;
                assert!(val == 0 || val > prev, "opcodes must be sorted in ascending order");
                prev = val;
                let info = OpCodeInfo::new(
                    stringify!($name)
                );
                $(
                let info = $modifier(info, $($($modifier_arg),*)?);
                )*
                map[$val] = Some(info);
            )*
            let _ = prev;
            map
        };

        /// Maps each opcode to its name. (So we dont need to load [`OpCodeInfo`] to get the name)
        pub const OPCODE_NAME_TABLE: [&'static str; 256] = {
            let mut map = ["UNKNOWN"; 256];
            $(
                map[$val] = stringify!($name);
            )*
            map
        };
    }
}

/// Get the name of an opcode.
#[inline]
pub fn opcode_name(opcode: u8) -> &'static str {
    OPCODE_NAME_TABLE[opcode as usize]
}

/// Returns the static info for an opcode, if the opcode is assigned in any revision.
#[inline]
pub fn opcode_info(opcode: u8) -> Option<&'static OpCodeInfo> {
    OPCODE_INFO_TABLE[opcode as usize].as_ref()
}

/// Returns the number of literal bytes following a push opcode, or 0 for any other opcode.
#[inline]
pub const fn push_size(opcode: u8) -> usize {
    if opcode >= PUSH1 && opcode <= PUSH32 {
        (opcode - PUSH1 + 1) as usize
    } else {
        0
    }
}

opcodes! {
    0x00 => STOP => full_with_break, handler("op_stop");

    0x01 => ADD => stack_io(2, 1), gas(3), stack_op, inlined, handler("op<evmone::add>");
    0x02 => MUL => stack_io(2, 1), gas(5), stack_op, inlined, handler("op<evmone::mul>");
    0x03 => SUB => stack_io(2, 1), gas(3), stack_op, inlined, handler("op<evmone::sub>");
    0x04 => DIV => stack_io(2, 1), gas(5), stack_op, handler("op<evmone::div>");
    0x05 => SDIV => stack_io(2, 1), gas(5), stack_op, handler("op<evmone::sdiv>");
    0x06 => MOD => stack_io(2, 1), gas(5), stack_op, handler("op<evmone::mod>");
    0x07 => SMOD => stack_io(2, 1), gas(5), stack_op, handler("op<evmone::smod>");
    0x08 => ADDMOD => stack_io(3, 1), gas(8), stack_op, handler("op<evmone::addmod>");
    0x09 => MULMOD => stack_io(3, 1), gas(8), stack_op, handler("op<evmone::mulmod>");
    0x0a => EXP => stack_io(2, 1), gas(10), stack_op, handler("op<evmone::exp>");
    0x0b => SIGNEXTEND => stack_io(2, 1), gas(5), stack_op, inlined, handler("op<evmone::signextend>");

    0x10 => LT => stack_io(2, 1), gas(3), stack_op, inlined, handler("op<evmone::lt>");
    0x11 => GT => stack_io(2, 1), gas(3), stack_op, inlined, handler("op<evmone::gt>");
    0x12 => SLT => stack_io(2, 1), gas(3), stack_op, inlined, handler("op<evmone::slt>");
    0x13 => SGT => stack_io(2, 1), gas(3), stack_op, inlined, handler("op<evmone::sgt>");
    0x14 => EQ => stack_io(2, 1), gas(3), stack_op, inlined, handler("op<evmone::eq>");
    0x15 => ISZERO => stack_io(1, 1), gas(3), stack_op, inlined, handler("op<evmone::iszero>");
    0x16 => AND => stack_io(2, 1), gas(3), stack_op, inlined, handler("op<evmone::and_>");
    0x17 => OR => stack_io(2, 1), gas(3), stack_op, inlined, handler("op<evmone::or_>");
    0x18 => XOR => stack_io(2, 1), gas(3), stack_op, inlined, handler("op<evmone::xor_>");
    0x19 => NOT => stack_io(1, 1), gas(3), stack_op, inlined, handler("op<evmone::not_>");
    0x1a => BYTE => stack_io(2, 1), gas(3), stack_op, inlined, handler("op<evmone::byte>");
    0x1b => SHL => stack_io(2, 1), gas(3), since(Revision::Constantinople), stack_op, inlined, handler("op<evmone::shl>");
    0x1c => SHR => stack_io(2, 1), gas(3), since(Revision::Constantinople), stack_op, inlined, handler("op<evmone::shr>");
    0x1d => SAR => stack_io(2, 1), gas(3), since(Revision::Constantinople), stack_op, inlined, handler("op<evmone::sar>");

    0x20 => KECCAK256 => stack_io(2, 1), gas(30), state_with_status, handler("op<evmone::keccak256>");

    0x30 => ADDRESS => stack_io(0, 1), gas(2), state, inlined, handler("op<evmone::address>");
    0x31 => BALANCE => stack_io(1, 1), gas(20), state_with_status, handler("op<evmone::balance>");
    0x32 => ORIGIN => stack_io(0, 1), gas(2), state, inlined, handler("op<evmone::origin>");
    0x33 => CALLER => stack_io(0, 1), gas(2), state, inlined, handler("op<evmone::caller>");
    0x34 => CALLVALUE => stack_io(0, 1), gas(2), state, inlined, handler("op<evmone::callvalue>");
    0x35 => CALLDATALOAD => stack_io(1, 1), gas(3), state, inlined, handler("op<evmone::calldataload>");
    0x36 => CALLDATASIZE => stack_io(0, 1), gas(2), state, inlined, handler("op<evmone::calldatasize>");
    0x37 => CALLDATACOPY => stack_io(3, 0), gas(3), state_with_status, inlined, handler("op<evmone::calldatacopy>");
    0x38 => CODESIZE => stack_io(0, 1), gas(2), state, inlined, handler("op<evmone::codesize>");
    0x39 => CODECOPY => stack_io(3, 0), gas(3), state_with_status, inlined, handler("op<evmone::codecopy>");
    0x3a => GASPRICE => stack_io(0, 1), gas(2), state, inlined, handler("op<evmone::gasprice>");
    0x3b => EXTCODESIZE => stack_io(1, 1), gas(20), state_with_status, handler("op<evmone::extcodesize>");
    0x3c => EXTCODECOPY => stack_io(4, 0), gas(20), state_with_status, handler("op<evmone::extcodecopy>");
    0x3d => RETURNDATASIZE => stack_io(0, 1), gas(2), since(Revision::Byzantium), state, inlined, handler("op<evmone::returndatasize>");
    0x3e => RETURNDATACOPY => stack_io(3, 0), gas(3), since(Revision::Byzantium), state_with_status, inlined, handler("op<evmone::returndatacopy>");
    0x3f => EXTCODEHASH => stack_io(1, 1), gas(400), since(Revision::Constantinople), state_with_status, handler("op<evmone::extcodehash>");
    0x40 => BLOCKHASH => stack_io(1, 1), gas(20), state, handler("op<evmone::blockhash>");
    0x41 => COINBASE => stack_io(0, 1), gas(2), state, inlined, handler("op<evmone::coinbase>");
    0x42 => TIMESTAMP => stack_io(0, 1), gas(2), state, inlined, handler("op<evmone::timestamp>");
    0x43 => NUMBER => stack_io(0, 1), gas(2), state, inlined, handler("op<evmone::number>");
    0x44 => DIFFICULTY => stack_io(0, 1), gas(2), state, inlined, handler("op<evmone::difficulty>");
    0x45 => GASLIMIT => stack_io(0, 1), gas(2), state, inlined, handler("op<evmone::gaslimit>");
    0x46 => CHAINID => stack_io(0, 1), gas(2), since(Revision::Istanbul), state, inlined, handler("op<evmone::chainid>");
    0x47 => SELFBALANCE => stack_io(0, 1), gas(5), since(Revision::Istanbul), state, handler("op<evmone::selfbalance>");
    0x48 => BASEFEE => stack_io(0, 1), gas(2), since(Revision::London), state, handler("op<evmone::basefee>");

    0x50 => POP => stack_io(1, 0), gas(2), stack_op, inlined, handler("op<evmone::pop>");
    0x51 => MLOAD => stack_io(1, 1), gas(3), state_with_status, inlined, handler("op<evmone::mload>");
    0x52 => MSTORE => stack_io(2, 0), gas(3), state_with_status, inlined, handler("op<evmone::mstore>");
    0x53 => MSTORE8 => stack_io(2, 0), gas(3), state_with_status, inlined, handler("op<evmone::mstore8>");
    0x54 => SLOAD => stack_io(1, 1), gas(50), state_with_status, handler("op<evmone::sload>");
    0x55 => SSTORE => stack_io(2, 0), gas(0), full_with_break, handler("op_sstore");
    0x56 => JUMP => stack_io(1, 0), gas(8), jump;
    0x57 => JUMPI => stack_io(2, 0), gas(10), jump;
    0x58 => PC => stack_io(0, 1), gas(2), full, inlined, handler("op_pc");
    0x59 => MSIZE => stack_io(0, 1), gas(2), state, inlined, handler("op<evmone::msize>");
    0x5a => GAS => stack_io(0, 1), gas(2), full, handler("op_gas");
    0x5b => JUMPDEST => gas(1), full_with_break, handler("opx_beginblock");

    0x5f => PUSH0 => stack_io(0, 1), gas(2), since(Revision::Shanghai), full, inlined, handler("op_push0");
    0x60 => PUSH1 => stack_io(0, 1), gas(3), full, inlined, handler("op_push_small");
    0x61 => PUSH2 => stack_io(0, 1), gas(3), full, inlined, handler("op_push_small");
    0x62 => PUSH3 => stack_io(0, 1), gas(3), full, inlined, handler("op_push_small");
    0x63 => PUSH4 => stack_io(0, 1), gas(3), full, inlined, handler("op_push_small");
    0x64 => PUSH5 => stack_io(0, 1), gas(3), full, inlined, handler("op_push_small");
    0x65 => PUSH6 => stack_io(0, 1), gas(3), full, inlined, handler("op_push_small");
    0x66 => PUSH7 => stack_io(0, 1), gas(3), full, inlined, handler("op_push_small");
    0x67 => PUSH8 => stack_io(0, 1), gas(3), full, inlined, handler("op_push_small");
    0x68 => PUSH9 => stack_io(0, 1), gas(3), full, inlined, handler("op_push_full");
    0x69 => PUSH10 => stack_io(0, 1), gas(3), full, inlined, handler("op_push_full");
    0x6a => PUSH11 => stack_io(0, 1), gas(3), full, inlined, handler("op_push_full");
    0x6b => PUSH12 => stack_io(0, 1), gas(3), full, inlined, handler("op_push_full");
    0x6c => PUSH13 => stack_io(0, 1), gas(3), full, inlined, handler("op_push_full");
    0x6d => PUSH14 => stack_io(0, 1), gas(3), full, inlined, handler("op_push_full");
    0x6e => PUSH15 => stack_io(0, 1), gas(3), full, inlined, handler("op_push_full");
    0x6f => PUSH16 => stack_io(0, 1), gas(3), full, inlined, handler("op_push_full");
    0x70 => PUSH17 => stack_io(0, 1), gas(3), full, inlined, handler("op_push_full");
    0x71 => PUSH18 => stack_io(0, 1), gas(3), full, inlined, handler("op_push_full");
    0x72 => PUSH19 => stack_io(0, 1), gas(3), full, inlined, handler("op_push_full");
    0x73 => PUSH20 => stack_io(0, 1), gas(3), full, inlined, handler("op_push_full");
    0x74 => PUSH21 => stack_io(0, 1), gas(3), full, inlined, handler("op_push_full");
    0x75 => PUSH22 => stack_io(0, 1), gas(3), full, inlined, handler("op_push_full");
    0x76 => PUSH23 => stack_io(0, 1), gas(3), full, inlined, handler("op_push_full");
    0x77 => PUSH24 => stack_io(0, 1), gas(3), full, inlined, handler("op_push_full");
    0x78 => PUSH25 => stack_io(0, 1), gas(3), full, inlined, handler("op_push_full");
    0x79 => PUSH26 => stack_io(0, 1), gas(3), full, inlined, handler("op_push_full");
    0x7a => PUSH27 => stack_io(0, 1), gas(3), full, inlined, handler("op_push_full");
    0x7b => PUSH28 => stack_io(0, 1), gas(3), full, inlined, handler("op_push_full");
    0x7c => PUSH29 => stack_io(0, 1), gas(3), full, inlined, handler("op_push_full");
    0x7d => PUSH30 => stack_io(0, 1), gas(3), full, inlined, handler("op_push_full");
    0x7e => PUSH31 => stack_io(0, 1), gas(3), full, inlined, handler("op_push_full");
    0x7f => PUSH32 => stack_io(0, 1), gas(3), full, inlined, handler("op_push_full");

    0x80 => DUP1 => stack_io(1, 2), gas(3), stack_op, inlined, handler("op<evmone::dup<1>>");
    0x81 => DUP2 => stack_io(2, 3), gas(3), stack_op, inlined, handler("op<evmone::dup<2>>");
    0x82 => DUP3 => stack_io(3, 4), gas(3), stack_op, inlined, handler("op<evmone::dup<3>>");
    0x83 => DUP4 => stack_io(4, 5), gas(3), stack_op, inlined, handler("op<evmone::dup<4>>");
    0x84 => DUP5 => stack_io(5, 6), gas(3), stack_op, inlined, handler("op<evmone::dup<5>>");
    0x85 => DUP6 => stack_io(6, 7), gas(3), stack_op, inlined, handler("op<evmone::dup<6>>");
    0x86 => DUP7 => stack_io(7, 8), gas(3), stack_op, inlined, handler("op<evmone::dup<7>>");
    0x87 => DUP8 => stack_io(8, 9), gas(3), stack_op, inlined, handler("op<evmone::dup<8>>");
    0x88 => DUP9 => stack_io(9, 10), gas(3), stack_op, inlined, handler("op<evmone::dup<9>>");
    0x89 => DUP10 => stack_io(10, 11), gas(3), stack_op, inlined, handler("op<evmone::dup<10>>");
    0x8a => DUP11 => stack_io(11, 12), gas(3), stack_op, inlined, handler("op<evmone::dup<11>>");
    0x8b => DUP12 => stack_io(12, 13), gas(3), stack_op, inlined, handler("op<evmone::dup<12>>");
    0x8c => DUP13 => stack_io(13, 14), gas(3), stack_op, inlined, handler("op<evmone::dup<13>>");
    0x8d => DUP14 => stack_io(14, 15), gas(3), stack_op, inlined, handler("op<evmone::dup<14>>");
    0x8e => DUP15 => stack_io(15, 16), gas(3), stack_op, inlined, handler("op<evmone::dup<15>>");
    0x8f => DUP16 => stack_io(16, 17), gas(3), stack_op, inlined, handler("op<evmone::dup<16>>");

    0x90 => SWAP1 => stack_io(2, 2), gas(3), stack_op, inlined, handler("op<evmone::swap<1>>");
    0x91 => SWAP2 => stack_io(3, 3), gas(3), stack_op, inlined, handler("op<evmone::swap<2>>");
    0x92 => SWAP3 => stack_io(4, 4), gas(3), stack_op, inlined, handler("op<evmone::swap<3>>");
    0x93 => SWAP4 => stack_io(5, 5), gas(3), stack_op, inlined, handler("op<evmone::swap<4>>");
    0x94 => SWAP5 => stack_io(6, 6), gas(3), stack_op, inlined, handler("op<evmone::swap<5>>");
    0x95 => SWAP6 => stack_io(7, 7), gas(3), stack_op, inlined, handler("op<evmone::swap<6>>");
    0x96 => SWAP7 => stack_io(8, 8), gas(3), stack_op, inlined, handler("op<evmone::swap<7>>");
    0x97 => SWAP8 => stack_io(9, 9), gas(3), stack_op, inlined, handler("op<evmone::swap<8>>");
    0x98 => SWAP9 => stack_io(10, 10), gas(3), stack_op, inlined, handler("op<evmone::swap<9>>");
    0x99 => SWAP10 => stack_io(11, 11), gas(3), stack_op, inlined, handler("op<evmone::swap<10>>");
    0x9a => SWAP11 => stack_io(12, 12), gas(3), stack_op, inlined, handler("op<evmone::swap<11>>");
    0x9b => SWAP12 => stack_io(13, 13), gas(3), stack_op, inlined, handler("op<evmone::swap<12>>");
    0x9c => SWAP13 => stack_io(14, 14), gas(3), stack_op, inlined, handler("op<evmone::swap<13>>");
    0x9d => SWAP14 => stack_io(15, 15), gas(3), stack_op, inlined, handler("op<evmone::swap<14>>");
    0x9e => SWAP15 => stack_io(16, 16), gas(3), stack_op, inlined, handler("op<evmone::swap<15>>");
    0x9f => SWAP16 => stack_io(17, 17), gas(3), stack_op, inlined, handler("op<evmone::swap<16>>");

    0xa0 => LOG0 => stack_io(2, 0), gas(375), state_with_status, handler("op<evmone::log<0>>");
    0xa1 => LOG1 => stack_io(3, 0), gas(750), state_with_status, handler("op<evmone::log<1>>");
    0xa2 => LOG2 => stack_io(4, 0), gas(1125), state_with_status, handler("op<evmone::log<2>>");
    0xa3 => LOG3 => stack_io(5, 0), gas(1500), state_with_status, handler("op<evmone::log<3>>");
    0xa4 => LOG4 => stack_io(6, 0), gas(1875), state_with_status, handler("op<evmone::log<4>>");

    0xf0 => CREATE => stack_io(3, 1), gas(32000), full_with_break, handler("op_create<EVMC_CREATE>");
    0xf1 => CALL => stack_io(7, 1), gas(40), full_with_break, handler("op_call<EVMC_CALL>");
    0xf2 => CALLCODE => stack_io(7, 1), gas(40), full_with_break, handler("op_call<EVMC_CALLCODE>");
    0xf3 => RETURN => stack_io(2, 0), gas(0), full_with_break, handler("op_return<EVMC_SUCCESS>");
    0xf4 => DELEGATECALL => stack_io(6, 1), gas(40), since(Revision::Homestead), full_with_break, handler("op_call<EVMC_DELEGATECALL>");
    0xf5 => CREATE2 => stack_io(4, 1), gas(32000), since(Revision::Constantinople), full_with_break, handler("op_create<EVMC_CREATE2>");
    0xfa => STATICCALL => stack_io(6, 1), gas(700), since(Revision::Byzantium), full_with_break, handler("op_call<EVMC_CALL, true>");
    0xfd => REVERT => stack_io(2, 0), gas(0), since(Revision::Byzantium), full_with_break, handler("op_return<EVMC_REVERT>");
    0xfe => INVALID => full_with_break, handler("op_invalid");
    0xff => SELFDESTRUCT => stack_io(1, 0), gas(0), full_with_break, handler("op_selfdestruct");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stack_effects_are_derived_from_io() {
        let add = opcode_info(ADD).expect("ADD is assigned");
        assert_eq!((add.stack_req(), add.stack_change()), (2, -1));

        let dup3 = opcode_info(DUP3).expect("DUP3 is assigned");
        assert_eq!((dup3.stack_req(), dup3.stack_change()), (3, 1));

        let swap16 = opcode_info(SWAP16).expect("SWAP16 is assigned");
        assert_eq!((swap16.stack_req(), swap16.stack_change()), (17, 0));

        let call = opcode_info(CALL).expect("CALL is assigned");
        assert_eq!((call.stack_req(), call.stack_change()), (7, -6));

        let log4 = opcode_info(LOG4).expect("LOG4 is assigned");
        assert_eq!((log4.stack_req(), log4.stack_change()), (6, -6));
    }

    #[test]
    fn test_opcode_names() {
        assert_eq!(opcode_name(KECCAK256), "KECCAK256");
        assert_eq!(opcode_name(JUMPDEST), "JUMPDEST");
        assert_eq!(opcode_name(0x0c), "UNKNOWN");
        assert!(opcode_info(0xef).is_none());
    }

    #[test]
    fn test_push_size() {
        assert_eq!(push_size(PUSH0), 0);
        assert_eq!(push_size(PUSH1), 1);
        assert_eq!(push_size(PUSH8), 8);
        assert_eq!(push_size(PUSH32), 32);
        assert_eq!(push_size(DUP1), 0);
    }

    #[test]
    fn test_every_non_jump_opcode_has_a_handler() {
        for info in OPCODE_INFO_TABLE.iter().flatten() {
            match info.kind() {
                HandlerKind::Jump => assert!(info.handler().is_empty()),
                _ => assert!(!info.handler().is_empty(), "{} has no handler", info.name()),
            }
        }
    }

    #[test]
    fn test_exits_may_break() {
        for op in [STOP, RETURN, REVERT, SELFDESTRUCT, INVALID, CALL, CREATE, SSTORE, JUMPDEST] {
            let info = opcode_info(op).expect("opcode is assigned");
            assert!(info.kind().may_break(), "{} must be able to break", info.name());
        }
        for op in [ADD, ADDRESS, PC, GAS, PUSH1] {
            let info = opcode_info(op).expect("opcode is assigned");
            assert!(!info.kind().may_break(), "{} must not break", info.name());
        }
    }
}
