use std::process::ExitCode;

use clap::Parser;
use podcat::cli::{Arguments, ExitStatus};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    let args = Arguments::parse();
    init_tracing(args.common.verbose);

    match podcat::cli::run_cli(args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitStatus::Error.into()
        }
    }
}

/// Progress logs go to stderr so stdout only carries the command report.
fn init_tracing(verbose: bool) {
    let default = if verbose { "podcat=debug" } else { "podcat=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .init();
}
