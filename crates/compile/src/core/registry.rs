use std::fmt::Write;

use crate::error::Error;

/// File name of the registry translation unit.
pub const REGISTRY_FILE: &str = "query_executor.cpp";

const EXECUTE_PARAMS: &str = "(evmc_vm* /*unused*/, const evmc_host_interface* host, \
    evmc_host_context* ctx,\n    evmc_revision rev, const evmc_message* msg, const uint8_t* code, \
    size_t code_size) noexcept";

/// Renders an address as a C++ string literal of its raw bytes, e.g. `"\x00\xaa"`.
///
/// The literal may contain NUL bytes, so it must be used with an explicit length.
pub fn address_literal(address: &str) -> String {
    let mut literal = String::with_capacity(2 + address.len() * 2);
    literal.push('"');
    for pair in address.as_bytes().chunks(2) {
        literal.push_str("\\x");
        literal.push_str(&String::from_utf8_lossy(pair));
    }
    literal.push('"');
    literal
}

/// Generates the registry translation unit.
///
/// `addresses` are lowercase 40-digit hex addresses. They are listed in the given order. The
/// exported `query_executor` maps a raw 20-byte address to its `execute_<address>` function, or
/// to `nullptr` when no contract matches. The lookup table is built on first call.
pub fn generate(addresses: &[String]) -> Result<String, Error> {
    let mut out = String::new();

    writeln!(out, "// generated by evmaot, do not edit")?;
    writeln!(out, "#include <string>")?;
    writeln!(out, "#include <unordered_map>")?;
    writeln!(out, "#include \"evmc/evmc.h\"")?;
    writeln!(out)?;
    writeln!(out, "extern \"C\" {{")?;
    writeln!(
        out,
        "__attribute__ ((visibility (\"default\"))) evmc_execute_fn query_executor(const evmc_address* destination);"
    )?;
    for address in addresses {
        writeln!(out, "evmc_result execute_{address}{EXECUTE_PARAMS};")?;
    }
    writeln!(out, "}}")?;
    writeln!(out)?;

    writeln!(out, "evmc_execute_fn query_executor(const evmc_address* destination) {{")?;
    writeln!(out, "    static const std::unordered_map<std::string, evmc_execute_fn> m = [] {{")?;
    writeln!(out, "        std::unordered_map<std::string, evmc_execute_fn> m;")?;
    writeln!(out, "        m.reserve({});", addresses.len())?;
    for address in addresses {
        writeln!(
            out,
            "        m.emplace(std::string({}, 20), execute_{address});",
            address_literal(address)
        )?;
    }
    writeln!(out, "        return m;")?;
    writeln!(out, "    }}();")?;
    writeln!(out)?;
    writeln!(out, "    std::string key((const char*)(destination->bytes), 20);")?;
    writeln!(out, "    auto got = m.find(key);")?;
    writeln!(out, "    if(got == m.end()) return nullptr;")?;
    writeln!(out, "    return got->second;")?;
    writeln!(out, "}}")?;

    Ok(out)
}
