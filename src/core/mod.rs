//! Directory walk module
//!
//! Directory size computation and tree copy, both walking subdirectories
//! from an explicit worklist and reporting per-path failures.

mod report;
mod size;
mod tree;

pub use report::*;
pub use size::*;
pub use tree::*;
