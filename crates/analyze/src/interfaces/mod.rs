mod analysis;
mod args;
mod instruction;

// re-export the public interface
pub use analysis::*;
pub use args::*;
pub use instruction::*;
