use std::path::Path;

use crate::utils::{io::file::read_file, strings::decode_hex};
use eyre::{eyre, Result};
use tracing::{debug, error};

/// Given a target, determines whether it is a file path or raw bytecode and returns the decoded
/// bytecode for the target.
///
/// Files are expected to hold hex-encoded bytecode. Surrounding whitespace and line breaks are
/// ignored, as is an optional `0x` prefix.
///
/// ```
/// use evmaot_common::ether::bytecode::get_bytecode_from_target;
///
/// let bytecode = get_bytecode_from_target("600556").expect("should decode bytecode");
/// assert_eq!(bytecode, vec![0x60, 0x05, 0x56]);
/// ```
pub fn get_bytecode_from_target(target: &str) -> Result<Vec<u8>> {
    let path = Path::new(target);
    if path.is_file() {
        debug!("reading bytecode from file '{}'", target);
        let contents = read_file(target)?;
        let contents: String = contents.split_whitespace().collect();
        return decode_hex(&contents).map_err(|e| {
            error!("file '{}' doesn't contain valid bytecode.", target);
            eyre!("file '{}' doesn't contain valid bytecode: {}", target, e)
        });
    }

    decode_hex(target)
}
