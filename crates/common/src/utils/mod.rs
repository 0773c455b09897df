/// Environment variable utilities.
pub mod env;

/// Input/output utilities for file manipulation.
pub mod io;

/// String manipulation and hex encoding utilities.
pub mod strings;

/// Threading and multi-threading utilities.
pub mod threading;
