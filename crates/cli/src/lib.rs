pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use frontdesk_core::config::{AppConfig, LoadOptions};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "frontdesk",
    about = "Front-desk call dispatch operator CLI",
    long_about = "Inspect configuration, validate the staff directory, and run routing lookups and dispatch decisions against explicit inputs.",
    after_help = "Examples:\n  frontdesk doctor --json\n  frontdesk validate\n  frontdesk route-key \"The Great Company\"\n  frontdesk dispatch --call call.json --at 2026-10-14T14:00:00Z"
)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        help = "Path to frontdesk.toml (defaults to ./frontdesk.toml or ./config/frontdesk.toml)"
    )]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Check configuration, directory load, and directory validation")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
    #[command(about = "Load the staff directory and report every validation issue")]
    Validate,
    #[command(about = "Resolve the routing letter for a business or last name")]
    RouteKey {
        #[arg(help = "Business name or last name as given by the caller")]
        identifier: String,
    },
    #[command(about = "Report office open state and optional staff availability")]
    Hours {
        #[arg(long, help = "RFC 3339 timestamp to evaluate (defaults to now)")]
        at: Option<String>,
        #[arg(long, help = "Staff member name to check availability for")]
        staff: Option<String>,
    },
    #[command(about = "Look up the claims phone number for an insurance carrier")]
    Carrier {
        #[arg(help = "Carrier name as given by the caller")]
        name: String,
    },
    #[command(about = "Decide where a call goes from a JSON call state")]
    Dispatch {
        #[arg(long, help = "Path to a JSON call state file")]
        call: PathBuf,
        #[arg(long, help = "RFC 3339 timestamp to decide at (defaults to now)")]
        at: Option<String>,
        #[arg(
            long = "unreachable",
            value_name = "EXTENSION",
            help = "Extension to treat as unreachable (repeatable)"
        )]
        unreachable: Vec<String>,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let options = LoadOptions {
        require_file: cli.config.is_some(),
        config_path: cli.config,
        ..LoadOptions::default()
    };

    if let Ok(config) = AppConfig::load(options.clone()) {
        init_logging(&config);
    }

    let result = match cli.command {
        Command::Doctor { json } => commands::doctor::run(&options, json),
        Command::Config => commands::config::run(&options),
        Command::Validate => commands::validate::run(&options),
        Command::RouteKey { identifier } => commands::route_key::run(&options, &identifier),
        Command::Hours { at, staff } => {
            commands::hours::run(&options, at.as_deref(), staff.as_deref())
        }
        Command::Carrier { name } => commands::carrier::run(&options, &name),
        Command::Dispatch { call, at, unreachable } => {
            commands::dispatch::run(&options, &call, at.as_deref(), &unreachable)
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

/// Logs go to stderr so command output on stdout stays machine-readable.
fn init_logging(config: &AppConfig) {
    use frontdesk_core::config::LogFormat::*;

    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(log_filter(&config.logging.level))
        .with_writer(std::io::stderr);

    let installed = match config.logging.format {
        Compact => builder.compact().try_init(),
        Pretty => builder.pretty().try_init(),
        Json => builder.json().try_init(),
    };
    if let Err(error) = installed {
        eprintln!("frontdesk: log subscriber not installed: {error}");
    }
}

fn log_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(level.trim()).unwrap_or_else(|_| EnvFilter::new("info"))
}
