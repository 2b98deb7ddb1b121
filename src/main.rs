//! Heap Trace CLI
//!
//! Inspects heap dumps produced from grouped allocation contexts and turns
//! them into collapsed stacks for flamegraph tools.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::fs;
use std::path::PathBuf;

use heap_trace_context::aggregator::{
    calculate_hot_paths, calculate_size_distribution, collapsed_stacks_from_dump,
    merge_small_stacks,
};
use heap_trace_context::output::read_heap_dump;
use heap_trace_context::utils::config::{DEFAULT_MIN_STACK_SIZE, DEFAULT_TOP_PATHS, SCHEMA_VERSION};
use heap_trace_context::MAX_FRAME_COUNT;

/// Heap Trace - inspect heap profiling dumps
#[derive(Parser, Debug)]
#[command(name = "heap-trace")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a heap dump file and print a summary
    Validate {
        /// Path to heap dump JSON file
        #[arg(short, long)]
        file: PathBuf,

        /// Number of hot paths to print
        #[arg(long, default_value_t = DEFAULT_TOP_PATHS)]
        top: usize,
    },

    /// Print collapsed stacks ("a;b;c bytes") for flamegraph tools
    Collapse {
        /// Path to heap dump JSON file
        #[arg(short, long)]
        file: PathBuf,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Fold stacks below this many bytes into "other"
        #[arg(long, default_value_t = DEFAULT_MIN_STACK_SIZE)]
        min_size: u64,
    },

    /// Display schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Commands::Validate { file, top } => {
            validate_heap_dump(file, top)?;
        }

        Commands::Collapse {
            file,
            output,
            min_size,
        } => {
            collapse_heap_dump(file, output, min_size)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}

/// Validate a heap dump file
///
/// **Private** - internal command implementation
fn validate_heap_dump(file_path: PathBuf, top: usize) -> Result<()> {
    println!("Validating heap dump: {}", file_path.display());

    let dump = read_heap_dump(&file_path)?;
    let stacks = collapsed_stacks_from_dump(&dump);
    let distribution = calculate_size_distribution(&stacks);

    println!("✓ Valid heap dump JSON");
    println!("  Version: {}", dump.version);
    println!("  Process: {}", dump.process_name);
    println!("  Total Size: {} bytes", dump.total_size);
    println!("  Allocations: {}", dump.total_count);
    println!("  Contexts: {}", dump.entries.len());
    println!("  Hot Paths: {}", dump.hot_paths.len());
    println!("  {}", distribution.summary());

    for path in calculate_hot_paths(&stacks, distribution.total_size, top) {
        println!("  {:>6.2}%  {} bytes  {}", path.percentage, path.size, path.stack);
    }

    if let Some(entry) = dump.entries.iter().find(|e| e.stack.len() > MAX_FRAME_COUNT) {
        log::warn!(
            "Entry with {} frames exceeds the backtrace capacity of {}",
            entry.stack.len(),
            MAX_FRAME_COUNT
        );
    }

    Ok(())
}

/// Write collapsed stacks for a heap dump
///
/// **Private** - internal command implementation
fn collapse_heap_dump(file_path: PathBuf, output: Option<PathBuf>, min_size: u64) -> Result<()> {
    let dump = read_heap_dump(&file_path)?;
    let stacks = merge_small_stacks(collapsed_stacks_from_dump(&dump), min_size);

    let mut text = String::new();
    for stack in &stacks {
        text.push_str(&stack.to_line());
        text.push('\n');
    }

    match output {
        Some(path) => {
            fs::write(&path, text)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("Wrote {} collapsed stacks to {}", stacks.len(), path.display());
        }
        None => print!("{}", text),
    }

    Ok(())
}

/// Display schema information
///
/// **Private** - internal command implementation
fn display_schema(show_details: bool) {
    println!("Heap Trace Dump Schema");
    println!("Current Version: {}", SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Schema Structure:");
        println!("  version: string          - Schema version (e.g., '1.0.0')");
        println!("  process_name: string     - Profiled process");
        println!("  total_size: number       - Bytes across all contexts");
        println!("  total_count: number      - Allocations across all contexts");
        println!("  entries: array           - One per allocation context");
        println!("    stack: string[]        - Frame labels, outermost first");
        println!("    type_name: string?     - Allocated type, if known");
        println!("    size: number           - Bytes allocated");
        println!("    count: number          - Allocations");
        println!("  hot_paths: array         - Largest collapsed stacks");
        println!("    stack: string          - Collapsed stack");
        println!("    size: number           - Bytes allocated");
        println!("    count: number          - Allocations");
        println!("    percentage: number     - Percentage of total bytes");
        println!("  generated_at: string     - RFC 3339 timestamp");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
///
/// **Private** - internal command implementation
fn display_version() {
    println!("Heap Trace v{}", env!("CARGO_PKG_VERSION"));
    println!("Dump Schema: v{}", SCHEMA_VERSION);
    println!("Backtrace capacity: {} frames", MAX_FRAME_COUNT);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_top_defaults() {
        let cli = Cli::try_parse_from(["heap-trace", "validate", "--file", "heap.json"]).unwrap();
        match cli.command {
            Commands::Validate { file, top } => {
                assert_eq!(file, PathBuf::from("heap.json"));
                assert_eq!(top, DEFAULT_TOP_PATHS);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_validate_top_override() {
        let cli =
            Cli::try_parse_from(["heap-trace", "validate", "-f", "heap.json", "--top", "3"]).unwrap();
        assert!(matches!(cli.command, Commands::Validate { top: 3, .. }));
    }
}
