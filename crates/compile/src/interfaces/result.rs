use std::path::Path;

use evmaot_codegen::Scaffold;
use evmaot_common::utils::io::file::{write_executable, write_file};
use evmaot_vm::core::revision::Revision;
use tracing::debug;

use crate::{
    core::{registry::REGISTRY_FILE, script::SCRIPT_FILE},
    error::Error,
};

/// The translation unit generated for one contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledContract {
    /// The contract's address as lowercase hex without a prefix.
    pub address: String,
    /// Length of the contract's bytecode.
    pub code_size: usize,
    /// Number of basic blocks in the contract.
    pub blocks: usize,
    /// Contents of `<address>.cpp`.
    pub source: String,
}

impl CompiledContract {
    /// Returns the name of the contract's translation unit.
    pub fn file_name(&self) -> String {
        format!("{}.cpp", self.address)
    }
}

/// Everything a compile run generates, in a deterministic order.
#[derive(Debug, Clone)]
pub struct CompileResult {
    /// The revision the contracts were compiled for.
    pub revision: Revision,
    /// The contracts, sorted by address.
    pub contracts: Vec<CompiledContract>,
    /// The shared handler scaffold.
    pub scaffold: Scaffold,
    /// Contents of the registry translation unit.
    pub registry: String,
    /// Contents of the build script.
    pub script: String,
}

impl CompileResult {
    /// Returns every generated file as `(file name, contents)`, in the order they are written.
    pub fn files(&self) -> Vec<(String, &str)> {
        let mut files: Vec<(String, &str)> = self
            .contracts
            .iter()
            .map(|contract| (contract.file_name(), contract.source.as_str()))
            .collect();
        files.extend(self.scaffold.files().map(|(name, contents)| (name.to_string(), contents)));
        files.push((REGISTRY_FILE.to_string(), self.registry.as_str()));
        files.push((SCRIPT_FILE.to_string(), self.script.as_str()));
        files
    }

    /// Writes every generated file into `output_dir` and returns the written paths. The build
    /// script is made executable.
    pub fn write(&self, output_dir: &str) -> Result<Vec<String>, Error> {
        let mut written = Vec::new();
        for (name, contents) in self.files() {
            let path = Path::new(output_dir).join(&name).to_string_lossy().to_string();
            let result = if name == SCRIPT_FILE {
                write_executable(&path, contents)
            } else {
                write_file(&path, contents)
            };
            result.map_err(|e| Error::Io(format!("failed to write '{path}': {e}")))?;
            debug!("wrote {} bytes to '{}'", contents.len(), path);
            written.push(path);
        }
        Ok(written)
    }
}
