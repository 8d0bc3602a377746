use std::path::PathBuf;

use clap::Parser;

use flowscope::TaintEngine;

/// flowscope - taint-flow analysis for textual LLVM-style IR
#[derive(Debug, Parser)]
#[command(name = "flowscope", version, about, long_about = None)]
struct Cli {
    /// Path to the textual IR input file.
    #[arg(value_name = "FILE")]
    path: PathBuf,

    /// Enable verbose (debug-level) logging output.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Show flowscope info+ on stderr; --verbose enables debug; RUST_LOG overrides
    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_module("flowscope", level)
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false)
        .init();

    let verdict = TaintEngine::analyze_file(&cli.path)?;
    println!("{verdict}");

    Ok(())
}
