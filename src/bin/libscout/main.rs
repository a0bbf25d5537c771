//! libscout CLI - locate native libraries for extension builds

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use libscout::util::GlobalContext;
use libscout::ResolveError;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        if let Some(help) = e.downcast_ref::<ResolveError>().and_then(ResolveError::help) {
            eprintln!("help: {}", help);
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging; RUST_LOG wins when set
    let default = if cli.verbose {
        "libscout=debug"
    } else {
        "libscout=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let mut gctx = GlobalContext::new()?;
    if let Some(root) = &cli.root {
        gctx = gctx.with_root(root);
    }

    // Execute command
    match cli.command {
        Commands::Resolve(args) => commands::resolve::execute(args, &gctx),
        Commands::Fetch(args) => commands::fetch::execute(args, &gctx),
        Commands::Build(args) => commands::build::execute(args, &gctx),
        Commands::Platform(args) => commands::platform::execute(args, &gctx),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
