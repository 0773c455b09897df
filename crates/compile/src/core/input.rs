use std::{collections::BTreeMap, fs, path::Path};

use alloy::primitives::Address;
use evmaot_common::utils::{
    io::file::read_file,
    strings::{decode_hex, encode_hex},
};
use tracing::{debug, trace};

use crate::error::Error;

/// Reads every contract in `dir`, keyed by canonical address.
///
/// Each regular file must be named after a 20-byte address, with or without `0x` and in any
/// case, and hold the contract's hex bytecode. Surrounding whitespace is ignored. Hidden files
/// and subdirectories are skipped. Addresses are canonicalised to lowercase hex without a prefix,
/// so the map iterates in the order the registry lists contracts.
pub fn read_contracts(dir: &str) -> Result<BTreeMap<String, Vec<u8>>, Error> {
    let entries =
        fs::read_dir(dir).map_err(|e| Error::Io(format!("failed to read directory '{dir}': {e}")))?;

    let mut contracts = BTreeMap::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::Io(format!("failed to read directory '{dir}': {e}")))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy().to_string();
        if file_name.starts_with('.') {
            trace!("skipping hidden file '{}'", file_name);
            continue;
        }

        let address = canonical_address(&file_name)?;
        let code = read_bytecode(&path, &file_name)?;
        debug!("read {} bytes of bytecode for {}", code.len(), address);

        if contracts.insert(address.clone(), code).is_some() {
            return Err(Error::DuplicateContract(address));
        }
    }

    Ok(contracts)
}

/// Parses a file name as an address and returns it as lowercase hex without a prefix.
fn canonical_address(name: &str) -> Result<String, Error> {
    let address =
        name.parse::<Address>().map_err(|_| Error::InvalidAddress(name.to_string()))?;
    Ok(encode_hex(address.as_slice()))
}

fn read_bytecode(path: &Path, name: &str) -> Result<Vec<u8>, Error> {
    let path_str = path.to_string_lossy();
    let contents =
        read_file(&path_str).map_err(|e| Error::Io(format!("failed to read '{path_str}': {e}")))?;
    decode_hex(contents.trim())
        .map_err(|e| Error::InvalidHex { name: name.to_string(), reason: e.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use evmaot_common::utils::io::file::write_file;

    fn fixture(test: &str, files: &[(&str, &str)]) -> String {
        let dir = std::env::temp_dir().join("evmaot-input-tests").join(test);
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).expect("failed to create fixture directory");
        for (name, contents) in files {
            write_file(&dir.join(name).to_string_lossy(), contents)
                .expect("failed to write fixture");
        }
        dir.to_string_lossy().to_string()
    }

    const A: &str = "00000000000000000000000000000000000000aa";
    const B: &str = "00000000000000000000000000000000000000bb";

    #[test]
    fn test_read_contracts_sorted_and_canonical() {
        let dir = fixture(
            "sorted",
            &[
                (B.to_uppercase().as_str(), "6001\n"),
                (format!("0x{A}").as_str(), "  600556  "),
                (".hidden", "zz"),
            ],
        );
        let contracts = read_contracts(&dir).expect("failed to read contracts");

        assert_eq!(
            contracts.keys().cloned().collect::<Vec<_>>(),
            vec![A.to_string(), B.to_string()]
        );
        assert_eq!(contracts[A], vec![0x60, 0x05, 0x56]);
        assert_eq!(contracts[B], vec![0x60, 0x01]);
    }

    #[test]
    fn test_duplicate_address() {
        let dir = fixture("duplicate", &[(A, "00"), (format!("0x{A}").as_str(), "00")]);
        assert!(matches!(
            read_contracts(&dir),
            Err(Error::DuplicateContract(address)) if address == A
        ));
    }

    #[test]
    fn test_invalid_address() {
        let dir = fixture("address", &[("contract.hex", "00")]);
        assert!(matches!(
            read_contracts(&dir),
            Err(Error::InvalidAddress(name)) if name == "contract.hex"
        ));
    }

    #[test]
    fn test_invalid_hex() {
        let dir = fixture("hex", &[(A, "60zz")]);
        assert!(matches!(read_contracts(&dir), Err(Error::InvalidHex { name, .. }) if name == A));
    }

    #[test]
    fn test_missing_directory() {
        assert!(matches!(read_contracts("/surely/not/a/directory"), Err(Error::Io(_))));
    }

    #[test]
    fn test_empty_file_is_empty_code() {
        let dir = fixture("empty", &[(A, "\n")]);
        let contracts = read_contracts(&dir).expect("failed to read contracts");
        assert_eq!(contracts[A], Vec::<u8>::new());
    }
}
