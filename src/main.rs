use std::process::ExitCode;

use clap::Parser;

use massfit::cli::{Cli, Command};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Process-wide logging, configured exactly once at startup.
    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .init();

    let result = match &cli.command {
        Command::Demo(args) => massfit::app::run_demo(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
