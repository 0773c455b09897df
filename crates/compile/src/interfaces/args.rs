use clap::Parser;
use derive_builder::Builder;
use evmaot_vm::core::revision::Revision;

pub use evmaot_config::{DEFAULT_CXX, DEFAULT_LIBRARY_NAME, DEFAULT_TOOLCHAIN_ENV};

/// Arguments for the compile subcommand
#[derive(Debug, Clone, Parser, Builder)]
#[clap(
    about = "Compile a directory of contract bytecode into C++ sources and a build script",
    override_usage = "evmaot compile <INPUT_DIR> [OPTIONS]"
)]
pub struct CompilerArgs {
    /// Directory holding one file per contract. Each file is named after the contract's address
    /// and contains its hex-encoded bytecode.
    #[clap(required = true)]
    pub input_dir: String,

    /// The revision to compile for. Defaults to the configured revision, or 'shanghai' when none
    /// is configured.
    #[clap(long, short)]
    pub revision: Option<Revision>,

    /// Number of worker threads. Defaults to the available parallelism.
    #[clap(long, short)]
    pub threads: Option<usize>,

    /// The C++ compiler used by the generated build script.
    #[clap(long)]
    pub cxx: Option<String>,

    /// The environment variable holding the toolchain root (evmone, evmc, intx and keccak).
    #[clap(long)]
    pub toolchain_env: Option<String>,

    /// Name of the shared library built by the generated build script.
    #[clap(long)]
    pub library_name: Option<String>,

    /// The output directory to write the generated files to
    #[clap(long = "output", short = 'o', default_value = "output", hide_default_value = true)]
    pub output: String,
}

impl CompilerArgs {
    /// Returns the number of worker threads to use.
    pub fn thread_count(&self) -> usize {
        self.threads
            .filter(|threads| *threads > 0)
            .unwrap_or_else(|| std::thread::available_parallelism().map_or(1, |n| n.get()))
    }
}

impl CompilerArgsBuilder {
    /// Create a new instance of the [`CompilerArgsBuilder`]
    pub fn new() -> Self {
        Self {
            input_dir: Some(String::new()),
            revision: Some(None),
            threads: Some(None),
            cxx: Some(None),
            toolchain_env: Some(None),
            library_name: Some(None),
            output: Some(String::new()),
        }
    }
}
