//! The runtime scaffold shared by every generated contract.
//!
//! The scaffold declares one `maot<NAME>` wrapper per opcode the revision defines. Small
//! wrappers are defined inline in the header so the native compiler can fold them into each
//! contract. The rest are compiled once into `instrexe.cpp`.

mod templates;

use std::fmt::Write;

use evmaot_vm::core::{
    opcodes::{op_table, opcode_name, JUMPDEST},
    revision::Revision,
};
use tracing::debug;

use crate::error::Error;

/// File name of the scaffold header.
pub const HEADER_FILE: &str = "instrexe.hpp";
/// File name of the scaffold source.
pub const SOURCE_FILE: &str = "instrexe.cpp";

/// Returns the name of the wrapper the generated code calls for `opcode`.
///
/// JUMPDEST never reaches the generated code as an opcode. Its handler performs the block
/// precheck, so its wrapper is named after the block marker instead.
pub fn wrapper_name(opcode: u8) -> String {
    match opcode {
        JUMPDEST => "maotBEGINBLOCK".to_string(),
        _ => format!("maot{}", opcode_name(opcode)),
    }
}

fn wrapper_signature(opcode: u8) -> String {
    format!(
        "const evmone::instruction* {}(const evmone::instruction* instr, \
         evmone::AdvancedExecutionState& state) noexcept",
        wrapper_name(opcode)
    )
}

/// The generated `instrexe.hpp` / `instrexe.cpp` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scaffold {
    /// The revision whose defined opcodes received wrappers.
    pub revision: Revision,
    /// Contents of [`HEADER_FILE`].
    pub header: String,
    /// Contents of [`SOURCE_FILE`].
    pub source: String,
}

impl Scaffold {
    /// Generates the scaffold for `revision`.
    pub fn generate(revision: Revision) -> Result<Self, Error> {
        let table = op_table(revision);
        let mut header = format!("// generated by evmaot for {revision}, do not edit\n");
        let mut source = header.clone();
        header.push_str(templates::HEADER_PRELUDE);
        source.push_str(templates::SOURCE_PRELUDE);

        let mut inlined = 0;
        let mut shared = 0;
        for (opcode, entry) in table.iter().enumerate() {
            // undefined opcodes and jumps have no wrapper
            let Some(handler) = entry.handler else { continue };
            let opcode = opcode as u8;
            let signature = wrapper_signature(opcode);

            writeln!(header, "// {} {}", opcode, opcode_name(opcode))?;
            if entry.inline {
                writeln!(
                    header,
                    "inline {signature}\n{{\n    return evmone::{handler}(instr, state);\n}}\n"
                )?;
                inlined += 1;
            } else {
                writeln!(header, "{signature};\n")?;
                writeln!(source, "// {} {}", opcode, opcode_name(opcode))?;
                writeln!(
                    source,
                    "{signature}\n{{\n    return evmone::{handler}(instr, state);\n}}\n"
                )?;
                shared += 1;
            }
        }

        debug!(
            "generated scaffold for {}: {} inline and {} shared wrappers",
            revision, inlined, shared
        );
        Ok(Self { revision, header, source })
    }

    /// Returns the scaffold as `(file name, contents)` pairs.
    pub fn files(&self) -> [(&'static str, &str); 2] {
        [(HEADER_FILE, &self.header), (SOURCE_FILE, &self.source)]
    }
}
