//! Configuration settings for fskit
//!
//! Defines the copy options shared by the library and the CLI arguments
//! of the demonstration binary.

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default chunk size for file copies
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Largest accepted chunk size
pub const MAX_CHUNK_SIZE: usize = 64 * 1024 * 1024;

/// Default permission bits for newly created destination files
pub const DEFAULT_CREATE_MODE: u32 = 0o666;

/// Default upper bound for joined paths (Linux `PATH_MAX`)
pub const DEFAULT_MAX_PATH_LEN: usize = 4096;

/// fskit - thin wrappers over filesystem primitives
#[derive(Parser, Debug, Clone)]
#[command(name = "fskit")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Read, inspect, size and copy files and directory trees")]
#[command(long_about = r#"
fskit exposes the library operations as small commands.

Examples:
  fskit ls ./src                 # List entries with size and mtime
  fskit cat Cargo.toml           # Print a file and its size
  fskit size ./target -r         # Recursive directory size
  fskit cp a.bin b.bin           # Chunked file copy
  fskit cptree ./src ./backup    # Mirror a tree into an existing directory
"#)]
pub struct CliArgs {
    /// Command to run
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output (-v debug, -vv trace)
    #[arg(short = 'v', long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Chunk size for file copies (e.g., 4K, 1M)
    #[arg(long, default_value = "4K", value_name = "SIZE", global = true)]
    pub chunk_size: String,

    /// Longest joined path accepted while walking directories
    #[arg(long, default_value_t = DEFAULT_MAX_PATH_LEN, value_name = "BYTES", global = true)]
    pub max_path_len: usize,
}

/// Subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// List every entry of a directory with its metadata
    Ls {
        /// Directory to list
        dir: PathBuf,

        /// Print one JSON object per entry
        #[arg(long)]
        json: bool,
    },

    /// Print a file's contents and size
    Cat {
        /// File to read
        file: PathBuf,
    },

    /// Print existence, type and size of a path
    Stat {
        /// Path to inspect
        path: PathBuf,
    },

    /// Print the total size of the files in a directory
    Size {
        /// Directory to measure
        dir: PathBuf,

        /// Descend into subdirectories
        #[arg(short = 'r', long)]
        recursive: bool,
    },

    /// Copy a single file
    Cp {
        /// Source file
        source: PathBuf,
        /// Destination file
        destination: PathBuf,
    },

    /// Copy a directory tree into an existing directory
    Cptree {
        /// Source directory
        source: PathBuf,
        /// Existing destination directory
        destination: PathBuf,
    },
}

/// Options for file and tree copies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyOptions {
    /// Bytes read and written per chunk
    pub chunk_size: usize,
    /// Permission bits for created files (Unix, subject to umask)
    pub create_mode: u32,
    /// Longest joined path accepted during directory walks
    pub max_path_len: usize,
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            create_mode: DEFAULT_CREATE_MODE,
            max_path_len: DEFAULT_MAX_PATH_LEN,
        }
    }
}

impl CopyOptions {
    /// Create options from CLI arguments
    pub fn from_cli(args: &CliArgs) -> Result<Self, String> {
        let chunk_size = parse_size(&args.chunk_size)
            .map_err(|e| format!("Invalid chunk size: {}", e))?;
        let chunk_size = usize::try_from(chunk_size)
            .map_err(|_| format!("Chunk size {} does not fit in memory", chunk_size))?;

        let options = Self {
            chunk_size,
            max_path_len: args.max_path_len,
            ..Self::default()
        };
        options.validate()?;
        Ok(options)
    }

    /// Reject option values no operation can work with
    pub fn validate(&self) -> Result<(), String> {
        if self.chunk_size == 0 {
            return Err("Chunk size must be greater than zero".to_string());
        }
        if self.chunk_size > MAX_CHUNK_SIZE {
            return Err(format!(
                "Chunk size must be at most {}",
                humansize::format_size(MAX_CHUNK_SIZE as u64, humansize::BINARY)
            ));
        }
        if self.max_path_len == 0 {
            return Err("Maximum path length must be greater than zero".to_string());
        }
        Ok(())
    }
}

/// Parse human-readable size string to bytes
pub fn parse_size(size: &str) -> Result<u64, String> {
    let size = size.trim().to_uppercase();

    if size.is_empty() {
        return Err("Empty size string".to_string());
    }

    let (num_str, multiplier) = if size.ends_with("GB") || size.ends_with('G') {
        (size.trim_end_matches(|c| c == 'G' || c == 'B'), 1024u64 * 1024 * 1024)
    } else if size.ends_with("MB") || size.ends_with('M') {
        (size.trim_end_matches(|c| c == 'M' || c == 'B'), 1024u64 * 1024)
    } else if size.ends_with("KB") || size.ends_with('K') {
        (size.trim_end_matches(|c| c == 'K' || c == 'B'), 1024u64)
    } else if size.ends_with('B') {
        (size.trim_end_matches('B'), 1u64)
    } else {
        (size.as_str(), 1u64)
    };

    let num: f64 = num_str
        .trim()
        .parse()
        .map_err(|_| format!("Invalid number: {}", num_str))?;

    if !num.is_finite() {
        return Err(format!("Invalid number: {}", num_str));
    }
    if num < 0.0 {
        return Err(format!("Negative size: {}", num_str));
    }

    let bytes = num * multiplier as f64;
    if bytes >= u64::MAX as f64 {
        return Err(format!("Size out of range: {}", size));
    }

    Ok(bytes as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("4096").unwrap(), 4096);
        assert_eq!(parse_size("4K").unwrap(), 4096);
        assert_eq!(parse_size("4kb").unwrap(), 4096);
        assert_eq!(parse_size("1M").unwrap(), 1024 * 1024);
        assert_eq!(parse_size("1G").unwrap(), 1024 * 1024 * 1024);
        assert_eq!(parse_size("512B").unwrap(), 512);
        assert!(parse_size("").is_err());
        assert!(parse_size("lots").is_err());
        assert!(parse_size("-1K").is_err());
    }

    #[test]
    fn test_parse_size_rejects_non_finite_and_huge() {
        assert!(parse_size("1e30").is_err());
        assert!(parse_size("inf").is_err());
        assert!(parse_size("NaN").is_err());
        assert!(parse_size("1e11G").is_err());
    }

    #[test]
    fn test_chunk_size_upper_bound() {
        let args = CliArgs::parse_from(["fskit", "cp", "a", "b", "--chunk-size", "1e30"]);
        assert!(CopyOptions::from_cli(&args).is_err());

        let args = CliArgs::parse_from(["fskit", "cp", "a", "b", "--chunk-size", "1G"]);
        assert!(CopyOptions::from_cli(&args).is_err());

        let args = CliArgs::parse_from(["fskit", "cp", "a", "b", "--chunk-size", "64M"]);
        assert_eq!(CopyOptions::from_cli(&args).unwrap().chunk_size, MAX_CHUNK_SIZE);

        let options = CopyOptions {
            chunk_size: usize::MAX,
            ..Default::default()
        };
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_default_options() {
        let options = CopyOptions::default();
        assert_eq!(options.chunk_size, 4096);
        assert_eq!(options.create_mode, 0o666);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_from_cli() {
        let args = CliArgs::parse_from(["fskit", "cp", "a", "b", "--chunk-size", "64K"]);
        let options = CopyOptions::from_cli(&args).unwrap();
        assert_eq!(options.chunk_size, 64 * 1024);
        assert_eq!(options.max_path_len, DEFAULT_MAX_PATH_LEN);

        let args = CliArgs::parse_from(["fskit", "cp", "a", "b", "--chunk-size", "0"]);
        assert!(CopyOptions::from_cli(&args).is_err());
    }

    #[test]
    fn test_options_serde() {
        let options = CopyOptions {
            chunk_size: 8192,
            ..Default::default()
        };
        let json = serde_json::to_string(&options).unwrap();
        let back: CopyOptions = serde_json::from_str(&json).unwrap();
        assert_eq!(back, options);
    }
}
