//! The analyzer turns raw EVM bytecode into the instruction list consumed by the code emitter.
//!
//! Bytecode is split into basic blocks. Each block is headed by a synthetic marker carrying the
//! block's total gas cost, the stack depth it needs on entry and the peak stack growth inside it,
//! so the generated code can check all three once per block instead of once per instruction.
//! Jumps whose target is pushed by the immediately preceding small push are resolved while
//! analyzing.

/// Error types for the analyzer module
pub mod error;

mod core;
mod interfaces;

// re-export the public interface
pub use core::{analyze, analyze_target};
pub use error::Error;
pub use interfaces::{
    AdvancedCodeAnalysis, AnalyzerArgs, AnalyzerArgsBuilder, Block, BlockHeader, BlockInfo,
    Instruction, Op, Operand,
};
