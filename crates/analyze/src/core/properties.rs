//! Property-based checks of the analysis over generated bytecode, across every revision.
