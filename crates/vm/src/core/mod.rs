/// Opcode constants, opcode information and per-revision opcode tables
pub mod opcodes;

/// Protocol revisions in chronological order
pub mod revision;
