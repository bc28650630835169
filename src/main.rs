//! fskit CLI - filesystem wrapper demo
//!
//! Exposes the library operations as subcommands.

use clap::Parser;
use fskit::config::{CliArgs, Commands, CopyOptions};
use fskit::core::{SizeScanner, TreeCopier};
use fskit::error::{FsError, Result};
use fskit::fs::{self as fsx, DirReader, FileCopier};
use std::io::Write;
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn main() {
    let args = CliArgs::parse();

    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    };

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(&args) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Returns `Ok(false)` when the command completed with recorded failures
fn run(args: &CliArgs) -> Result<bool> {
    let options = CopyOptions::from_cli(args).map_err(FsError::Config)?;

    match &args.command {
        Commands::Ls { dir, json } => cmd_ls(dir, *json, &options),
        Commands::Cat { file } => cmd_cat(file),
        Commands::Stat { path } => cmd_stat(path),
        Commands::Size { dir, recursive } => cmd_size(dir, *recursive, &options),
        Commands::Cp {
            source,
            destination,
        } => cmd_cp(source, destination, options),
        Commands::Cptree {
            source,
            destination,
        } => cmd_cptree(source, destination, options, args.quiet),
    }
}

fn cmd_ls(dir: &Path, json: bool, options: &CopyOptions) -> Result<bool> {
    let reader = DirReader::open(dir)?.with_max_path_len(options.max_path_len);
    let mut ok = true;

    for item in reader {
        match item {
            Ok(entry) if json => match serde_json::to_string(&entry) {
                Ok(line) => println!("{}", line),
                Err(e) => {
                    eprintln!("Could not encode {}: {}", entry.path.display(), e);
                    ok = false;
                }
            },
            Ok(entry) => println!("{}", entry),
            Err(e) => {
                tracing::warn!("Skipping entry: {}", e);
                ok = false;
            }
        }
    }

    Ok(ok)
}

fn cmd_cat(file: &Path) -> Result<bool> {
    let content = fsx::read_file(file)?;

    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(content.as_bytes())
        .and_then(|_| stdout.flush())
        .map_err(|e| FsError::io("<stdout>", e))?;

    eprintln!(
        "\n--- {}: {} bytes ---",
        file.display(),
        content.size()
    );
    Ok(true)
}

fn cmd_stat(path: &Path) -> Result<bool> {
    let exists = fsx::exists(path);
    println!("path:    {}", path.display());
    println!("exists:  {}", exists);
    println!("is_file: {}", fsx::is_file(path));
    println!("is_dir:  {}", fsx::is_dir(path));

    match fsx::size(path) {
        Ok(size) => println!(
            "size:    {} ({} bytes)",
            humansize::format_size(size, humansize::BINARY),
            size
        ),
        Err(e) => println!("size:    unavailable ({})", e),
    }

    Ok(exists)
}

fn cmd_size(dir: &Path, recursive: bool, options: &CopyOptions) -> Result<bool> {
    let report = SizeScanner::new()
        .recursive(recursive)
        .with_max_path_len(options.max_path_len)
        .scan(dir)?;

    report.print_summary();
    Ok(report.is_complete())
}

fn cmd_cp(source: &Path, destination: &Path, options: CopyOptions) -> Result<bool> {
    let bytes = FileCopier::new(options).copy(source, destination)?;
    println!(
        "Copied {} -> {} ({})",
        source.display(),
        destination.display(),
        humansize::format_size(bytes, humansize::BINARY)
    );
    Ok(true)
}

fn cmd_cptree(source: &Path, destination: &Path, options: CopyOptions, quiet: bool) -> Result<bool> {
    let report = TreeCopier::new(options).copy_tree(source, destination)?;

    if !quiet {
        report.print_summary();
    }

    Ok(report.is_success())
}
