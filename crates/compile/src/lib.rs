//! The batch compiler turns a directory of contract bytecode into a set of C++ sources, one per
//! contract, plus the shared scaffold, an address-keyed registry and the script that builds all
//! of them into one shared library.

/// Error types for the compiler module
pub mod error;

mod core;
mod interfaces;

// re-export the public interface
pub use core::{
    compile,
    input::read_contracts,
    registry::{self, REGISTRY_FILE},
    script::{self, ScriptOptions, SCRIPT_FILE},
};
pub use error::Error;
pub use interfaces::{
    CompileResult, CompiledContract, CompilerArgs, CompilerArgsBuilder, DEFAULT_CXX,
    DEFAULT_LIBRARY_NAME, DEFAULT_TOOLCHAIN_ENV,
};
