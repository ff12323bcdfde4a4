use clap::Parser;

mod cmd;

use cmd::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Show(a) => a.run(),
        Commands::Simulate(a) => a.run(),
        Commands::Coverage(a) => a.run(),
    }
}
