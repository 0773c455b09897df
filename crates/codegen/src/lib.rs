//! Lowers analyzed bytecode into C++ for the evmone advanced interpreter's handlers.
//!
//! Each contract becomes one translation unit whose control flow mirrors the contract's
//! control-flow graph. The shared scaffold provides the handler wrappers those units call.

/// Error types for the codegen module
pub mod error;
/// The runtime scaffold shared by every generated contract
pub mod scaffold;

mod core;
mod interfaces;

// re-export the public interface
pub use core::{
    emit::Emitter,
    generate, scaffold,
    graph::{Argument, BasicBlock, ControlFlowGraph, Edge, Exit, Node, Step},
};
pub use error::Error;
pub use interfaces::{ScaffoldArgs, ScaffoldArgsBuilder};
pub use scaffold::Scaffold;
