//! binlink CLI - link package executables into a bin directory

use std::io::IsTerminal;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use binlink::util::diagnostic;
use binlink::LinkError;

mod cli;
mod commands;

use cli::{Cli, Commands};

/// Options shared by every command.
pub struct GlobalOptions {
    /// Use ANSI colors on stderr
    pub color: bool,
}

fn main() {
    let cli = Cli::parse();
    let opts = GlobalOptions {
        color: !cli.no_color && std::io::stderr().is_terminal(),
    };

    if let Err(e) = run(cli, &opts) {
        match e.downcast_ref::<LinkError>() {
            Some(link_error) => diagnostic::emit(&link_error.to_diagnostic(), opts.color),
            None => eprintln!("error: {:#}", e),
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli, opts: &GlobalOptions) -> Result<()> {
    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("binlink=debug")
    } else {
        EnvFilter::new("binlink=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_ansi(opts.color)
        .with_writer(std::io::stderr)
        .init();

    // Execute command
    match cli.command {
        Commands::Link(args) => commands::link::execute(args, opts),
        Commands::Plan(args) => commands::plan::execute(args, opts),
    }
}
