//! `fieldseal`: operator binary entry point.
//!
//! Startup sequence:
//! 1. Parse the command line.
//! 2. Load and validate [`Config`] from environment variables.
//! 3. Initialise structured JSON logging on stderr.
//! 4. Load the secret settings and run the requested command.

mod cli;
mod commands;
mod config;
mod telemetry;

use std::io::Write;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use common::protocol::ErrorReport;
use common::ServiceError;
use fieldseal::SecretSettings;
use tracing::{error, info};

use cli::Cli;
use config::Config;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let json = cli.json;

    match run(cli) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(code = e.code(), "command failed");
            report_error(&e, json);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

fn run(cli: Cli) -> Result<String, ServiceError> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = Config::from_env().map_err(|e| ServiceError::Configuration(format!("{e:#}")))?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init(cfg.log_level.trim()).map_err(|e| ServiceError::Internal(format!("{e:#}")))?;
    info!(version = env!("CARGO_PKG_VERSION"), "fieldseal starting");

    // -----------------------------------------------------------------------
    // 3. Secret settings
    // -----------------------------------------------------------------------
    let settings = SecretSettings::from_env()
        .context("failed to read secret configuration")
        .map_err(|e| ServiceError::Configuration(format!("{e:#}")))?;

    // -----------------------------------------------------------------------
    // 4. Command
    // -----------------------------------------------------------------------
    commands::execute(cli.command, &settings, std::io::stdin().lock())
}

fn report_error(e: &ServiceError, json: bool) {
    if json {
        let body = ErrorReport::new(e.code(), e.to_string());
        if let Ok(line) = serde_json::to_string(&body) {
            println!("{line}");
            return;
        }
    }
    // Telemetry may not be up; write to stderr directly.
    let _ = writeln!(std::io::stderr(), "ERROR: {e}");
}
