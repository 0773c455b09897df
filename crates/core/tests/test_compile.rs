//! Integration tests for the batch compiler.

#[cfg(test)]
mod integration_tests {
    use std::path::Path;

    use evmaot_common::utils::io::file::{read_file, write_file};
    use evmaot_compiler::{
        compile, registry, script, CompilerArgsBuilder, Error, ScriptOptions, REGISTRY_FILE,
        SCRIPT_FILE,
    };
    use evmaot_vm::core::revision::Revision;

    fn fixture(test: &str, files: &[(&str, &str)]) -> (String, String) {
        let root = std::env::temp_dir().join("evmaot-core-tests").join(test);
        let _ = std::fs::remove_dir_all(&root);
        let input = root.join("contracts");
        std::fs::create_dir_all(&input).expect("failed to create fixture directory");
        for (name, contents) in files {
            write_file(&input.join(name).to_string_lossy(), contents)
                .expect("failed to write fixture");
        }
        (input.to_string_lossy().to_string(), root.join("build").to_string_lossy().to_string())
    }

    #[tokio::test]
    async fn test_compile_and_write() {
        evmaot_tracing::init_test_tracing();

        let (input, output) = fixture(
            "compile_and_write",
            &[
                // a dispatcher-like contract with a dynamic jump
                ("0x1111111111111111111111111111111111111111", "600035565b005b600160015500"),
                ("2222222222222222222222222222222222222222", "6003565b00"),
                (".gitkeep", ""),
            ],
        );
        let args = CompilerArgsBuilder::new()
            .input_dir(input)
            .revision(Some(Revision::Berlin))
            .toolchain_env(Some("EVMAOT_CORE_TEST_TOOLCHAIN".to_string()))
            .build()
            .expect("failed to build args");

        let result = compile(args).await.expect("failed to compile");
        assert_eq!(result.revision, Revision::Berlin);
        assert_eq!(
            result.contracts.iter().map(|c| c.address.as_str()).collect::<Vec<_>>(),
            vec![
                "1111111111111111111111111111111111111111",
                "2222222222222222222222222222222222222222"
            ]
        );

        let written = result.write(&output).expect("failed to write result");
        let names: Vec<String> = written
            .iter()
            .filter_map(|path| Path::new(path).file_name())
            .map(|name| name.to_string_lossy().to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                "1111111111111111111111111111111111111111.cpp",
                "2222222222222222222222222222222222222222.cpp",
                "instrexe.hpp",
                "instrexe.cpp",
                REGISTRY_FILE,
                SCRIPT_FILE,
            ]
        );

        // every contract is declared, registered and built
        let registry = read_file(&format!("{output}/{REGISTRY_FILE}")).expect("missing registry");
        let script = read_file(&format!("{output}/{SCRIPT_FILE}")).expect("missing script");
        for contract in &result.contracts {
            let source =
                read_file(&format!("{output}/{}", contract.file_name())).expect("missing source");
            assert!(source.contains(&format!("evmc_result execute_{}(", contract.address)));
            assert!(registry.contains(&format!("execute_{});", contract.address)));
            assert!(script.contains(&contract.file_name()));
        }
        assert!(script.contains("EVMAOT_CORE_TEST_TOOLCHAIN"));
    }

    #[test]
    fn test_registry_and_script_generators() {
        let addresses = vec!["33".repeat(20)];

        let registry = registry::generate(&addresses).expect("failed to generate registry");
        assert!(registry.contains(&format!("execute_{});", "33".repeat(20))));

        let options = ScriptOptions {
            cxx: "clang++".to_string(),
            toolchain_env: "EVMAOT_CORE_TEST_TOOLCHAIN".to_string(),
            toolchain_root: None,
            library_name: "libcontracts.so".to_string(),
        };
        let script = script::generate(&addresses, &options).expect("failed to generate script");
        assert!(script.contains(&format!("-c {}.cpp\n", "33".repeat(20))));
        assert!(script.contains("-shared -o libcontracts.so query_executor.cpp"));
    }

    #[tokio::test]
    async fn test_compile_duplicate_contracts() {
        let (input, _) = fixture(
            "duplicate_contracts",
            &[
                ("0xAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA", "00"),
                ("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "00"),
            ],
        );
        let args = CompilerArgsBuilder::new()
            .input_dir(input)
            .build()
            .expect("failed to build args");

        assert!(matches!(compile(args).await, Err(Error::DuplicateContract(_))));
    }

    #[tokio::test]
    async fn test_compile_empty_directory() {
        let (input, _) = fixture("empty_directory", &[]);
        let args = CompilerArgsBuilder::new()
            .input_dir(input)
            .build()
            .expect("failed to build args");

        let result = compile(args).await.expect("failed to compile");
        assert!(result.contracts.is_empty());
        assert!(result.registry.contains("m.reserve(0);"));
        // the scaffold is generated even without contracts
        assert!(result.scaffold.header.contains("maotBEGINBLOCK"));
    }
}
