//! Command-line interface.
//!
//! Parses arguments, loads configuration, installs logging and dispatches to
//! the command implementations.

pub mod commands;
pub mod output;
pub mod types;

use anyhow::Result;

use crate::domain::models::LoggingConfig;
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::logging::{scrub, LoggerImpl};

pub use types::{Cli, Commands};

/// Run the parsed command line. No subcommand means `sync`.
pub async fn run(cli: Cli) -> Result<()> {
    let command = cli
        .command
        .unwrap_or_else(|| Commands::Sync(commands::sync::SyncArgs::default()));
    let json = cli.json;

    // init writes the config file, so it runs before any config is loaded.
    let command = match command {
        Commands::Init(args) => {
            let _logger = LoggerImpl::init(&LoggingConfig::default())?;
            return commands::init::execute(args, json).await;
        }
        other => other,
    };

    let config = ConfigLoader::extract(cli.config.as_deref())?;
    let _logger = LoggerImpl::init(&config.logging)?;

    match command {
        Commands::Sync(args) => commands::sync::execute(args, &config, json).await,
        Commands::Decode(args) => commands::decode::execute(args, json),
        Commands::Orgs(args) => commands::orgs::execute(args, &config, json).await,
        Commands::Init(args) => commands::init::execute(args, json).await,
    }
}

/// Report a failed command and exit with status 1.
///
/// The full error chain is printed with credentials scrubbed.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    let chain: Vec<String> = err.chain().map(|cause| scrub(&cause.to_string())).collect();

    if json_mode {
        let body = serde_json::json!({
            "success": false,
            "error": chain.first().cloned().unwrap_or_default(),
            "causes": chain.iter().skip(1).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        eprintln!("Error: {}", chain.join("\n  caused by: "));
    }

    std::process::exit(1)
}
