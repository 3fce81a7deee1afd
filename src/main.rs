use std::process::ExitCode;

use clap::Parser;
use owo_colors::{OwoColorize, Stream::Stderr};
use tracing_subscriber::EnvFilter;

use issuedesk::DeskError;
use issuedesk::cli::Cli;

const LOG_ENV: &str = "ISSUEDESK_LOG";

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn report(err: &DeskError) {
    let tag = "error:".if_supports_color(Stderr, |s| s.red()).to_string();
    match err.field_errors() {
        Some(fields) => {
            eprintln!("{tag} invalid input");
            for (field, message) in fields {
                eprintln!("  {field}: {message}");
            }
        }
        None => eprintln!("{tag} {err}"),
    }
    if matches!(err, DeskError::Unauthorized(_)) {
        eprintln!("Your session may have expired. Run `issuedesk login` to sign in again.");
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match cli.command.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(&e);
            ExitCode::FAILURE
        }
    }
}
