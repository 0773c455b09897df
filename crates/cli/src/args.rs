use clap::{Parser, Subcommand};

use evmaot_config::ConfigArgs;
use evmaot_core::{
    evmaot_analyzer::AnalyzerArgs, evmaot_codegen::ScaffoldArgs, evmaot_compiler::CompilerArgs,
};

use crate::log_args::LogArgs;

#[derive(Debug, Parser)]
#[clap(name = "evmaot", version)]
pub(crate) struct Arguments {
    #[clap(subcommand)]
    pub(crate) sub: Subcommands,

    #[clap(flatten)]
    pub(crate) logs: LogArgs,
}

#[derive(Debug, Subcommand)]
#[clap(
    about = "evmaot compiles EVM contract bytecode ahead of time into C++ for the evmone advanced interpreter."
)]
#[allow(clippy::large_enum_variant)]
pub(crate) enum Subcommands {
    #[clap(
        name = "compile",
        about = "Compile a directory of contracts into C++ sources, a registry and a build script"
    )]
    Compile(CompilerArgs),

    #[clap(name = "analyze", about = "Split EVM bytecode into basic blocks with gas and stack prechecks")]
    Analyze(AnalyzerArgs),

    #[clap(name = "scaffold", about = "Write the shared handler scaffold for a revision")]
    Scaffold(ScaffoldArgs),

    #[clap(name = "config", about = "Display and edit the current configuration")]
    Config(ConfigArgs),
}
