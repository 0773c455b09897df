//! Common utilities used across the evmaot codebase.
//!
//! This crate provides shared functionality for the evmaot toolkit: loading
//! bytecode targets, hex decoding, file IO and a small thread pool used by the
//! batch compiler.

/// Utilities for working with EVM bytecode payloads.
pub mod ether;

/// General utility functions and types for common tasks.
pub mod utils;
