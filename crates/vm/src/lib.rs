//! evmaot EVM metadata
//!
//! This crate describes the EVM instruction set as the ahead-of-time compiler sees it: opcode
//! constants, per-opcode stack effects and runtime handler names, the ordered list of protocol
//! revisions, and the immutable per-revision opcode tables derived from them.

/// Core metadata: revisions, opcode information and per-revision opcode tables
pub mod core;
