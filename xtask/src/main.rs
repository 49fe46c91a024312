// Desktop/tooling crate: unwrap/expect/panic acceptable in non-embedded code.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod check;
mod config;
mod descriptor;
mod doc;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Touch deck development tasks", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check firmware builds for the hardware target and the host
    Check,
    /// Run all tests (unit, integration, doc)
    Test {
        /// Run only unit tests
        #[arg(long)]
        unit: bool,
        /// Run only integration tests
        #[arg(long)]
        integration: bool,
        /// Cases per proptest property (PROPTEST_CASES)
        #[arg(long)]
        cases: Option<u32>,
    },
    /// Check cross-crate doc references, then document host and hardware builds
    Doc {
        /// Open documentation in browser
        #[arg(long)]
        open: bool,
    },
    /// Validate a deck configuration file and print derived sizes
    Config {
        /// JSON file; omit to print the default configuration
        path: Option<std::path::PathBuf>,
    },
    /// Print the HID report descriptor
    Descriptor {
        /// One C array initializer instead of a commented dump
        #[arg(long)]
        c_array: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => check::run(),
        Commands::Test {
            unit,
            integration,
            cases,
        } => test::run(unit, integration, cases),
        Commands::Doc { open } => doc::run(open),
        Commands::Config { path } => config::run(path.as_deref()),
        Commands::Descriptor { c_array } => descriptor::run(c_array),
    }
}
