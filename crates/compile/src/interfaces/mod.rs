mod args;
mod result;

// re-export the public interface
pub use args::*;
pub use result::*;
