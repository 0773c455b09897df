pub(crate) mod input;
pub mod registry;
pub mod script;

use std::time::Instant;

use evmaot_analyzer::analyze;
use evmaot_codegen::{generate, Scaffold};
use evmaot_common::utils::{env::get_env, threading::task_pool};
use tracing::{debug, info};

use crate::{
    core::{input::read_contracts, script::ScriptOptions},
    error::Error,
    interfaces::{
        CompileResult, CompiledContract, CompilerArgs, DEFAULT_CXX, DEFAULT_LIBRARY_NAME,
        DEFAULT_TOOLCHAIN_ENV,
    },
};

/// Compiles every contract in `args.input_dir`.
///
/// Contracts are analyzed and emitted in parallel, then ordered by address, so the result does
/// not depend on the thread count. The first contract that fails aborts the whole batch. Nothing
/// is written to disk; see [`CompileResult::write`].
pub async fn compile(args: CompilerArgs) -> Result<CompileResult, Error> {
    let start_time = Instant::now();
    let revision = args.revision.unwrap_or_default();
    let threads = args.thread_count();

    let toolchain_env =
        args.toolchain_env.clone().unwrap_or_else(|| DEFAULT_TOOLCHAIN_ENV.to_string());
    let options = ScriptOptions {
        cxx: args.cxx.clone().unwrap_or_else(|| DEFAULT_CXX.to_string()),
        toolchain_root: get_env(&toolchain_env),
        toolchain_env,
        library_name: args
            .library_name
            .clone()
            .unwrap_or_else(|| DEFAULT_LIBRARY_NAME.to_string()),
    };
    // reject bad options before doing any work
    options.validate()?;

    let start_read_time = Instant::now();
    let contracts = read_contracts(&args.input_dir)?;
    debug!("reading {} contracts took {:?}", contracts.len(), start_read_time.elapsed());

    let start_codegen_time = Instant::now();
    let items: Vec<(String, Vec<u8>)> = contracts.into_iter().collect();
    let mut results = task_pool(items, threads, move |(address, code)| {
        let analysis = analyze(revision, &code);
        let source = generate(&address, &analysis);
        (address, code.len(), analysis.block_count(), source)
    })?;
    results.sort_by(|a, b| a.0.cmp(&b.0));
    debug!(
        "generating {} contracts on {} threads took {:?}",
        results.len(),
        threads,
        start_codegen_time.elapsed()
    );

    let contracts = results
        .into_iter()
        .map(|(address, code_size, blocks, source)| match source {
            Ok(source) => Ok(CompiledContract { address, code_size, blocks, source }),
            Err(source) => Err(Error::Contract { name: address, source }),
        })
        .collect::<Result<Vec<_>, Error>>()?;

    let addresses: Vec<String> =
        contracts.iter().map(|contract| contract.address.clone()).collect();
    let scaffold = Scaffold::generate(revision)?;
    let registry = registry::generate(&addresses)?;
    let script = script::generate(&addresses, &options)?;

    info!(
        "compiled {} contracts ({} blocks) for {}",
        contracts.len(),
        contracts.iter().map(|contract| contract.blocks).sum::<usize>(),
        revision
    );
    debug!("compilation took {:?}", start_time.elapsed());

    Ok(CompileResult { revision, contracts, scaffold, registry, script })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interfaces::CompilerArgsBuilder;
    use evmaot_common::utils::io::file::write_file;
    use evmaot_vm::core::revision::Revision;

    fn fixture(test: &str, files: &[(&str, &str)]) -> String {
        let dir = std::env::temp_dir().join("evmaot-compile-tests").join(test);
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).expect("failed to create fixture directory");
        for (name, contents) in files {
            write_file(&dir.join(name).to_string_lossy(), contents)
                .expect("failed to write fixture");
        }
        dir.to_string_lossy().to_string()
    }

    fn args(input_dir: String, threads: usize) -> CompilerArgs {
        CompilerArgsBuilder::new()
            .input_dir(input_dir)
            .revision(Some(Revision::Istanbul))
            .threads(Some(threads))
            .toolchain_env(Some("EVMAOT_TEST_TOOLCHAIN_ROOT".to_string()))
            .build()
            .expect("failed to build args")
    }

    #[tokio::test]
    async fn test_compile_orders_by_address() {
        let dir = fixture("ordered", &[
            ("0x00000000000000000000000000000000000000CC", "6004565b00"),
            ("00000000000000000000000000000000000000aa", "600035565b00"),
            ("00000000000000000000000000000000000000bb", ""),
        ]);
        let result = compile(args(dir, 2)).await.expect("failed to compile");

        assert_eq!(
            result.contracts.iter().map(|c| c.address.as_str()).collect::<Vec<_>>(),
            vec![
                "00000000000000000000000000000000000000aa",
                "00000000000000000000000000000000000000bb",
                "00000000000000000000000000000000000000cc",
            ]
        );
        assert_eq!(result.revision, Revision::Istanbul);
        assert_eq!(result.scaffold.revision, Revision::Istanbul);
        assert!(result.script.contains(": \"${EVMAOT_TEST_TOOLCHAIN_ROOT:?"));
        assert!(result.registry.contains("m.reserve(3);"));
        assert!(result.contracts[0].source.contains("PC=pop_target_pc(*state);"));
    }

    #[tokio::test]
    async fn test_compile_is_independent_of_thread_count() {
        let files: Vec<(String, String)> = (0..8u8)
            .map(|i| (format!("{:040x}", i), format!("60{:02x}565b00", i % 5 + 3)))
            .collect();
        let files: Vec<(&str, &str)> =
            files.iter().map(|(n, c)| (n.as_str(), c.as_str())).collect();
        let dir = fixture("threads", &files);

        let single = compile(args(dir.clone(), 1)).await.expect("failed to compile");
        let many = compile(args(dir, 4)).await.expect("failed to compile");

        assert_eq!(single.contracts, many.contracts);
        assert_eq!(single.registry, many.registry);
        assert_eq!(single.script, many.script);
    }

    #[tokio::test]
    async fn test_compile_fails_fast_on_bad_input() {
        let dir = fixture("bad", &[
            ("00000000000000000000000000000000000000aa", "6000"),
            ("00000000000000000000000000000000000000bb", "not hex"),
        ]);
        assert!(matches!(compile(args(dir, 2)).await, Err(Error::InvalidHex { .. })));
    }

    #[tokio::test]
    async fn test_compile_rejects_bad_options() {
        let dir = fixture("options", &[]);
        let mut args = args(dir, 1);
        args.toolchain_env = Some("NOT-AN-ENV".to_string());
        assert!(matches!(compile(args).await, Err(Error::InvalidOption(_))));
    }

    #[tokio::test]
    async fn test_write_result() {
        let dir = fixture("write", &[("00000000000000000000000000000000000000aa", "00")]);
        let result = compile(args(dir.clone(), 1)).await.expect("failed to compile");

        let output = std::path::Path::new(&dir).join("out").to_string_lossy().to_string();
        let written = result.write(&output).expect("failed to write output");
        let names: Vec<_> = written
            .iter()
            .filter_map(|path| std::path::Path::new(path).file_name())
            .map(|name| name.to_string_lossy().to_string())
            .collect();

        assert_eq!(names, vec![
            "00000000000000000000000000000000000000aa.cpp",
            "instrexe.hpp",
            "instrexe.cpp",
            "query_executor.cpp",
            "compile.sh",
        ]);

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&written[4]).expect("script exists").permissions().mode();
            assert_eq!(mode & 0o777, 0o755);
        }
    }
}
