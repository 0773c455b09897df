use clap::Parser;
use derive_builder::Builder;
use evmaot_vm::core::revision::Revision;

/// Arguments for the scaffold subcommand
#[derive(Debug, Clone, Parser, Builder)]
#[clap(
    about = "Write the shared handler scaffold (instrexe.hpp and instrexe.cpp)",
    override_usage = "evmaot scaffold [OPTIONS]"
)]
pub struct ScaffoldArgs {
    /// The revision whose opcodes receive wrappers. Defaults to the configured revision, or
    /// 'shanghai' when none is configured.
    #[clap(long, short)]
    pub revision: Option<Revision>,

    /// The output directory to write the output to or 'print' to print to the console
    #[clap(long = "output", short = 'o', default_value = "output", hide_default_value = true)]
    pub output: String,
}

impl ScaffoldArgsBuilder {
    /// Create a new instance of the [`ScaffoldArgsBuilder`]
    pub fn new() -> Self {
        Self { revision: Some(None), output: Some(String::new()) }
    }
}
