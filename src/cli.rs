use crate::domain::constants::DEFAULT_INPUT;
use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "apicompat",
    version,
    about = "API before/after compatibility checker"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(
        long,
        global = true,
        env = "APICOMPAT_INPUT",
        default_value = DEFAULT_INPUT,
        help = "Fixture describing client, OpenAPI document, samples and compat policy"
    )]
    pub input: PathBuf,
    #[arg(
        long,
        global = true,
        help = "TOML config (defaults to ./apicompat.toml when present)"
    )]
    pub config: Option<PathBuf>,
    #[arg(
        long,
        global = true,
        value_enum,
        help = "Override how date-time fields are validated"
    )]
    pub datetime_mode: Option<DateTimeMode>,
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Load the fixture and run the compatibility checks (default).
    Check {
        #[arg(long, help = "Run only the named check (repeatable)")]
        only: Vec<String>,
    },
    /// Load the fixture and verify its shape without running checks.
    Validate,
    /// List the available checks.
    Checks,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DateTimeMode {
    /// `YYYY-MM-DDTHH:MM:SSZ` only.
    #[default]
    Strict,
    /// Any RFC 3339 timestamp, offsets and fractional seconds included.
    Rfc3339,
}
