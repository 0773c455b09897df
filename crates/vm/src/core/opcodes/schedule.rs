use crate::core::{
    opcodes::*,
    revision::{Revision, REVISION_COUNT},
};

/// An opcode's metadata as seen by one revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OpTableEntry {
    /// Gas charged by the opcode, or `None` when the opcode is undefined in this revision.
    pub gas_cost: Option<u32>,
    /// Minimum stack depth the opcode needs.
    pub stack_req: i16,
    /// Net stack depth change after the opcode executes.
    pub stack_change: i16,
    /// Runtime handler expression, or `None` when the opcode is undefined or is a jump.
    pub handler: Option<&'static str>,
    /// How the generated code dispatches to the handler.
    pub kind: HandlerKind,
    /// Whether the handler wrapper is inlined.
    pub inline: bool,
}

impl OpTableEntry {
    /// The entry of an opcode that is not defined in a revision.
    pub const UNDEFINED: Self = Self {
        gas_cost: None,
        stack_req: 0,
        stack_change: 0,
        handler: None,
        kind: HandlerKind::Stack,
        inline: false,
    };

    const fn activate(info: &OpCodeInfo) -> Self {
        let handler = match info.kind() {
            HandlerKind::Jump => None,
            _ => Some(info.handler()),
        };
        Self {
            gas_cost: Some(info.base_gas() as u32),
            stack_req: info.stack_req(),
            stack_change: info.stack_change(),
            handler,
            kind: info.kind(),
            inline: info.is_inline(),
        }
    }

    /// Returns true if the opcode is defined in this revision.
    #[inline]
    pub const fn is_defined(&self) -> bool {
        self.gas_cost.is_some()
    }

    /// Returns the gas charged by the opcode, treating undefined opcodes as free.
    #[inline]
    pub fn gas(&self) -> u32 {
        self.gas_cost.unwrap_or(0)
    }
}

/// A revision's view of all 256 opcode values.
pub type OpTable = [OpTableEntry; 256];

/// Gas repricings applied on top of the activation cost, in chronological order.
pub const GAS_REPRICINGS: &[(Revision, u8, u32)] = &[
    (Revision::TangerineWhistle, BALANCE, 400),
    (Revision::TangerineWhistle, EXTCODESIZE, 700),
    (Revision::TangerineWhistle, EXTCODECOPY, 700),
    (Revision::TangerineWhistle, SLOAD, 200),
    (Revision::TangerineWhistle, CALL, 700),
    (Revision::TangerineWhistle, CALLCODE, 700),
    (Revision::TangerineWhistle, DELEGATECALL, 700),
    (Revision::TangerineWhistle, SELFDESTRUCT, 5000),
    (Revision::Istanbul, BALANCE, 700),
    (Revision::Istanbul, EXTCODEHASH, 700),
    (Revision::Istanbul, SLOAD, 800),
    (Revision::Berlin, BALANCE, 100),
    (Revision::Berlin, EXTCODESIZE, 100),
    (Revision::Berlin, EXTCODECOPY, 100),
    (Revision::Berlin, EXTCODEHASH, 100),
    (Revision::Berlin, CALL, 100),
    (Revision::Berlin, CALLCODE, 100),
    (Revision::Berlin, DELEGATECALL, 100),
    (Revision::Berlin, STATICCALL, 100),
    (Revision::Berlin, SLOAD, 100),
];

/// Builds every revision's table. Revision N starts as a copy of revision N-1, then the opcodes
/// activated in N are added and N's repricings are applied.
const fn build_op_tables() -> [OpTable; REVISION_COUNT] {
    let mut tables = [[OpTableEntry::UNDEFINED; 256]; REVISION_COUNT];

    let mut rev = 0;
    while rev < REVISION_COUNT {
        if rev > 0 {
            tables[rev] = tables[rev - 1];
        }

        let mut op = 0;
        while op < 256 {
            if let Some(info) = &OPCODE_INFO_TABLE[op] {
                if info.since() as usize == rev {
                    tables[rev][op] = OpTableEntry::activate(info);
                }
            }
            op += 1;
        }

        let mut i = 0;
        while i < GAS_REPRICINGS.len() {
            let (revision, op, gas) = GAS_REPRICINGS[i];
            if revision as usize == rev {
                assert!(
                    tables[rev][op as usize].gas_cost.is_some(),
                    "repriced an undefined opcode"
                );
                tables[rev][op as usize].gas_cost = Some(gas);
            }
            i += 1;
        }

        rev += 1;
    }

    tables
}

/// The opcode tables of every revision, indexed by `Revision as usize`.
pub static OP_TABLES: [OpTable; REVISION_COUNT] = build_op_tables();

/// Returns the opcode table for the given revision.
///
/// ```
/// use evmaot_vm::core::{opcodes::{op_table, SLOAD}, revision::Revision};
///
/// assert_eq!(op_table(Revision::Istanbul)[SLOAD as usize].gas_cost, Some(800));
/// ```
#[inline]
pub fn op_table(revision: Revision) -> &'static OpTable {
    &OP_TABLES[revision as usize]
}
