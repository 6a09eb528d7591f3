//! snapsync — reconcile a build output tree with a published snapshot.
//!
//! # Usage
//!
//! ```text
//! snapsync plan [--config <file>] [--pair SRC=DST]... [--commit-message <msg>] [--json]
//! snapsync status [--config <file>] [--pair SRC=DST]... [--json]
//! ```
//!
//! Nothing is executed: `plan` prints the shell script that would bring the
//! snapshot up to date, `status` summarises it per pair.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{plan::PlanArgs, status::StatusArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "snapsync",
    version,
    about = "Print the commands that bring a snapshot tree in line with a build tree",
    long_about = None,
)]
struct Cli {
    /// Log each classified path to stderr.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the shell and svn commands needed to update the snapshot.
    Plan(PlanArgs),

    /// Summarise pending changes per source/destination pair.
    Status(StatusArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Commands::Plan(args) => args.run(),
        Commands::Status(args) => args.run(),
    }
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
