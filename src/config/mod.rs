//! Configuration module for fskit
//!
//! Provides the copy options and the CLI arguments of the demo binary.

mod settings;

pub use settings::*;
