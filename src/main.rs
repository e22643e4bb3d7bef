use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod cli;
mod commands;
mod domain;
mod fixture;
mod services;

use cli::Cli;
use domain::constants::{
    EXIT_CHECKS_FAILED, EXIT_CONFIG_INVALID, EXIT_FIXTURE_INVALID, EXIT_FIXTURE_MISSING,
    EXIT_INTERNAL, LOG_ENV,
};
use domain::models::ErrorReport;
use fixture::FixtureError;
use services::config::ConfigError;
use services::output::print_error;
use services::suite::SuiteError;

/// clap's own exit code for usage errors; `--only` typos share it.
const EXIT_USAGE: u8 = 2;

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

fn classify(err: &anyhow::Error) -> (u8, &'static str) {
    if let Some(e) = err.downcast_ref::<FixtureError>() {
        let code = if e.is_not_found() {
            EXIT_FIXTURE_MISSING
        } else {
            EXIT_FIXTURE_INVALID
        };
        return (code, e.kind());
    }
    if err.downcast_ref::<ConfigError>().is_some() {
        return (EXIT_CONFIG_INVALID, "config_error");
    }
    if err.downcast_ref::<SuiteError>().is_some() {
        return (EXIT_USAGE, "unknown_check");
    }
    (EXIT_INTERNAL, "internal")
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    match commands::handle_commands(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(EXIT_CHECKS_FAILED),
        Err(err) => {
            let (code, kind) = classify(&err);
            tracing::debug!(kind, "command failed: {err:#}");
            print_error(
                cli.json,
                ErrorReport {
                    kind: kind.to_string(),
                    message: format!("{err:#}"),
                },
            );
            ExitCode::from(code)
        }
    }
}
