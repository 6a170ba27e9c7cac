//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// binlink - link package executables into a bin directory
#[derive(Parser)]
#[command(name = "binlink")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Link the bins of every package in a modules directory
    Link(LinkArgs),

    /// Show which bins would be linked, and which would be rejected
    Plan(PlanArgs),
}

#[derive(Args)]
pub struct LinkArgs {
    /// Directory containing installed packages (e.g. node_modules)
    pub modules_dir: PathBuf,

    /// Directory to write shims to (defaults to <MODULES_DIR>/.bin)
    #[arg(long, env = "BINLINK_BIN_DIR")]
    pub bin_dir: Option<PathBuf>,

    /// Accept package manifests without a name
    #[arg(long)]
    pub allow_exotic_manifests: bool,
}

#[derive(Args)]
pub struct PlanArgs {
    #[command(flatten)]
    pub link: LinkArgs,

    /// Print the plan as JSON
    #[arg(long)]
    pub json: bool,
}
