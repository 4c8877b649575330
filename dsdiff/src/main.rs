mod cli;
mod commands;
mod error;
mod util;

use structopt::StructOpt;
use tracing_subscriber::EnvFilter;

use cli::{CliOpts, Commands};

fn main() -> anyhow::Result<()> {
    let opts = CliOpts::from_iter(wild::args_os());

    let filter = if opts.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match opts.cmd {
        Commands::Info(args) => commands::info(args)?,
        Commands::Tree(args) => commands::tree(args)?,
    };

    Ok(())
}
