use clap::Parser;
use derive_builder::Builder;
use evmaot_common::ether::bytecode::get_bytecode_from_target;
use evmaot_vm::core::revision::Revision;
use eyre::Result;

/// Arguments for the analyze subcommand
#[derive(Debug, Clone, Parser, Builder)]
#[clap(
    about = "Split EVM bytecode into basic blocks and print the precheck listing",
    override_usage = "evmaot analyze <TARGET> [OPTIONS]"
)]
pub struct AnalyzerArgs {
    /// The target to analyze, either a file containing hex bytecode or raw hex bytecode.
    #[clap(required = true)]
    pub target: String,

    /// The revision whose opcode table is used. Defaults to the configured revision, or
    /// 'shanghai' when none is configured.
    #[clap(long, short)]
    pub revision: Option<Revision>,

    /// Name of the output file.
    #[clap(long, short, default_value = "", hide_default_value = true)]
    pub name: String,

    /// The output directory to write the output to or 'print' to print to the console
    #[clap(long = "output", short = 'o', default_value = "output", hide_default_value = true)]
    pub output: String,
}

impl AnalyzerArgs {
    /// Get the bytecode for the target
    pub fn get_bytecode(&self) -> Result<Vec<u8>> {
        get_bytecode_from_target(&self.target)
    }
}

impl AnalyzerArgsBuilder {
    /// Create a new instance of the [`AnalyzerArgsBuilder`]
    pub fn new() -> Self {
        Self {
            target: Some(String::new()),
            revision: Some(None),
            name: Some(String::new()),
            output: Some(String::new()),
        }
    }
}
