/// Loading bytecode from raw hex or from files.
pub mod bytecode;
