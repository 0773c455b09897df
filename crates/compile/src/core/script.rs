use crate::error::Error;

/// File name of the build script.
pub const SCRIPT_FILE: &str = "compile.sh";

/// Include directories under the toolchain root, relative to it.
const INCLUDE_DIRS: [&str; 4] = [
    "evmwrap/evmone.release/",
    "evmwrap/evmc/include/",
    "evmwrap/intx/include",
    "evmwrap/keccak/include",
];

/// Options of the generated build script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptOptions {
    /// The C++ compiler command.
    pub cxx: String,
    /// Name of the environment variable holding the toolchain root.
    pub toolchain_env: String,
    /// The toolchain root captured when the script was generated, if the variable was set.
    pub toolchain_root: Option<String>,
    /// Name of the shared library to build.
    pub library_name: String,
}

impl ScriptOptions {
    /// Checks that every option can be written into the script as is.
    pub fn validate(&self) -> Result<(), Error> {
        let mut env = self.toolchain_env.chars();
        let valid_env = env.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_') &&
            env.all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !valid_env {
            return Err(Error::InvalidOption(format!(
                "'{}' is not a valid environment variable name",
                self.toolchain_env
            )));
        }
        if self.cxx.trim().is_empty() {
            return Err(Error::InvalidOption("the C++ compiler command is empty".to_string()));
        }
        if self.library_name.is_empty() ||
            self.library_name.contains(|c: char| c == '/' || c.is_whitespace())
        {
            return Err(Error::InvalidOption(format!(
                "'{}' is not a valid library file name",
                self.library_name
            )));
        }
        Ok(())
    }
}

/// Quotes `value` for a POSIX shell.
fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

/// Generates the build script that compiles every contract, the scaffold and the registry into
/// one shared library with only `query_executor` exported.
pub fn generate(addresses: &[String], options: &ScriptOptions) -> Result<String, Error> {
    options.validate()?;

    let env = &options.toolchain_env;
    let includes =
        INCLUDE_DIRS.iter().map(|dir| format!("-I ${env}/{dir}")).collect::<Vec<_>>().join(" ");
    // every object is built hidden, so only symbols marked default are exported
    let cmd =
        format!("{} -O3 -fPIC -fvisibility=hidden -std=c++17 {includes}", options.cxx.trim());

    let mut lines = vec![
        "#!/bin/bash".to_string(),
        "# generated by evmaot, do not edit".to_string(),
        "set -e".to_string(),
        "cd \"$(dirname \"$0\")\"".to_string(),
    ];
    match &options.toolchain_root {
        Some(root) => lines.push(format!("export {env}={}", shell_quote(root))),
        None => lines.push(format!(": \"${{{env}:?{env} must point at the toolchain root}}\"")),
    }

    for address in addresses {
        lines.push(format!("echo === {address} ==="));
        lines.push(format!("{cmd} -c {address}.cpp"));
    }
    lines.push(format!("{cmd} -c instrexe.cpp"));

    let objects = addresses.iter().map(|address| format!(" {address}.o")).collect::<String>();
    lines.push(format!(
        "{cmd} -shared -o {} query_executor.cpp instrexe.o{objects}",
        options.library_name
    ));

    let mut script = lines.join("\n");
    script.push('\n');
    Ok(script)
}
