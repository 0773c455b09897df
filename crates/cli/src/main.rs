pub(crate) mod args;
pub(crate) mod error;
pub(crate) mod log_args;
pub(crate) mod output;

use args::{Arguments, Subcommands};
use error::Error;
use output::{build_output_dir, build_output_path, print_with_less};
use tracing::{info, Level};

use clap::Parser;

use evmaot_common::utils::io::file::{short_path, write_file};
use evmaot_config::{config, Configuration};
use evmaot_core::{
    evmaot_analyzer::analyze_target, evmaot_codegen::scaffold, evmaot_compiler::compile,
    evmaot_vm::core::revision::Revision,
};

fn configured_revision(configuration: &Configuration) -> Result<Revision, Error> {
    configuration
        .revision()
        .map_err(|e| Error::Generic(format!("invalid configured revision: {}", e)))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let args = Arguments::parse();

    // setup logging
    let _guard = args.logs.init_tracing();

    // options left empty on the command line fall back to the configuration
    let configuration = Configuration::load()
        .map_err(|e| Error::Generic(format!("failed to load configuration: {}", e)))?;

    match args.sub {
        Subcommands::Compile(mut cmd) => {
            if cmd.revision.is_none() {
                cmd.revision = Some(configured_revision(&configuration)?);
            }
            if cmd.threads.is_none() {
                cmd.threads = configuration.threads();
            }
            if cmd.cxx.is_none() {
                cmd.cxx = Some(configuration.cxx);
            }
            if cmd.toolchain_env.is_none() {
                cmd.toolchain_env = Some(configuration.toolchain_env);
            }
            if cmd.library_name.is_none() {
                cmd.library_name = Some(configuration.library_name);
            }

            let output_dir = build_output_dir(&cmd.output)
                .map_err(|e| Error::Generic(format!("failed to build output path: {}", e)))?;

            let result = compile(cmd)
                .await
                .map_err(|e| Error::Generic(format!("failed to compile contracts: {}", e)))?;

            if args.logs.verbosity.level() >= Level::DEBUG {
                for contract in &result.contracts {
                    info!(
                        "{}: {} bytes, {} blocks, {} bytes of C++",
                        contract.address,
                        contract.code_size,
                        contract.blocks,
                        contract.source.len()
                    );
                }
            }

            let written = result
                .write(&output_dir)
                .map_err(|e| Error::Generic(format!("failed to write output: {}", e)))?;
            info!("wrote {} files to '{}'", written.len(), short_path(&output_dir));
        }

        Subcommands::Analyze(mut cmd) => {
            if cmd.revision.is_none() {
                cmd.revision = Some(configured_revision(&configuration)?);
            }

            // if the user has passed an output filename, override the default filename
            let mut filename = "analysis.txt".to_string();
            let given_name = cmd.name.as_str();

            if !given_name.is_empty() {
                filename = format!("{}-{}", given_name, filename);
            }

            let analysis = analyze_target(cmd.clone())
                .await
                .map_err(|e| Error::Generic(format!("failed to analyze bytecode: {}", e)))?;
            let listing = analysis.to_string();

            if cmd.output == "print" {
                print_with_less(&listing)
                    .await
                    .map_err(|e| Error::Generic(format!("failed to print analysis: {}", e)))?;
            } else {
                let output_path = build_output_path(&cmd.output, &filename)
                    .map_err(|e| Error::Generic(format!("failed to build output path: {}", e)))?;

                write_file(&output_path, &listing)
                    .map_err(|e| Error::Generic(format!("failed to write analysis: {}", e)))?;
                info!("wrote analysis to '{}'", short_path(&output_path));
            }
        }

        Subcommands::Scaffold(mut cmd) => {
            if cmd.revision.is_none() {
                cmd.revision = Some(configured_revision(&configuration)?);
            }

            let scaffold = scaffold(cmd.clone())
                .await
                .map_err(|e| Error::Generic(format!("failed to generate scaffold: {}", e)))?;

            if cmd.output == "print" {
                let output_str = scaffold
                    .files()
                    .iter()
                    .map(|(name, contents)| format!("// {}\n{}", name, contents))
                    .collect::<Vec<_>>()
                    .join("\n");
                print_with_less(&output_str)
                    .await
                    .map_err(|e| Error::Generic(format!("failed to print scaffold: {}", e)))?;
            } else {
                for (name, contents) in scaffold.files() {
                    let output_path = build_output_path(&cmd.output, name).map_err(|e| {
                        Error::Generic(format!("failed to build output path: {}", e))
                    })?;

                    write_file(&output_path, contents)
                        .map_err(|e| Error::Generic(format!("failed to write scaffold: {}", e)))?;
                    info!("wrote '{}'", short_path(&output_path));
                }
            }
        }

        Subcommands::Config(cmd) => {
            config(cmd).map_err(|e| Error::Generic(format!("failed to configure: {}", e)))?;
        }
    }

    Ok(())
}
