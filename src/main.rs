use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use themer::cli::{self, Args, Command};
use themer::Colorimetry;

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    match &args.command {
        Command::Create(create) => create.run(&Colorimetry::new()),
        Command::Switch(switch) => switch.run(),
        Command::List => cli::list(),
    }
}
