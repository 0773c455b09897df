//! The core crate is the integration point for evmaot's tools: the analyzer, the code generator
//! and the batch compiler.
//!
//! It re-exports each tool's crate so other projects can depend on evmaot through one crate.

// Re-export all tool-specific modules
pub use evmaot_analyzer;
pub use evmaot_codegen;
pub use evmaot_common;
pub use evmaot_compiler;
pub use evmaot_vm;
