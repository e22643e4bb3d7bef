use crate::cli::{Cli, Commands};
use crate::domain::models::FixtureSummary;
use crate::fixture::{load_fixture, Fixture};
use crate::services::config::load_config;
use crate::services::output::{print_one, print_out, render_report, render_summary};
use crate::services::suite::{list_checks, run_suite};

/// Runs the selected command. `Ok(false)` means the fixture loaded but at least
/// one check failed.
pub fn handle_commands(cli: &Cli) -> anyhow::Result<bool> {
    let command = cli
        .command
        .clone()
        .unwrap_or(Commands::Check { only: Vec::new() });

    match command {
        Commands::Checks => {
            print_out(cli.json, &list_checks(), |c| format!("{}\t{}", c.id, c.rule))?;
            Ok(true)
        }
        Commands::Validate => {
            let fixture = load_fixture(&cli.input)?;
            print_one(cli.json, true, summarize(&fixture), render_summary)?;
            Ok(true)
        }
        Commands::Check { only } => {
            let mut config = load_config(cli.config.as_deref())?;
            if let Some(mode) = cli.datetime_mode {
                config.datetime_mode = mode;
            }
            let fixture = load_fixture(&cli.input)?;
            let report = run_suite(&fixture, &config, &only)?;
            let passed = report.passed;
            print_one(cli.json, passed, report, render_report)?;
            Ok(passed)
        }
    }
}

fn summarize(fixture: &Fixture) -> FixtureSummary {
    FixtureSummary {
        fixture: fixture.path().display().to_string(),
        digest: fixture.digest().to_string(),
        samples: fixture.samples().len(),
        openapi_paths: fixture.openapi()["paths"]
            .as_object()
            .map(|p| p.len())
            .unwrap_or(0),
        deprecated_endpoints: fixture.deprecated_endpoints().len(),
        client_code_lines: fixture.client_code_lines(),
    }
}
