//! Management CLI for the proxy rule engine.
//!
//! Mirrors the settings panel's backend surface (read the config, update
//! one scalar) and adds operator tools: validate a config file and
//! dry-run a routing decision for a hypothetical request.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use proxy_engine::config::load_config;
use proxy_engine::engine::{decide, RequestContext};
use proxy_engine::health::HealthRegistry;
use proxy_engine::settings::SettingsStore;

#[derive(Parser)]
#[command(name = "rules-cli")]
#[command(about = "Management CLI for the proxy rule engine", long_about = None)]
struct Cli {
    /// Path to the proxy configuration file.
    #[arg(short, long, default_value = "proxy_config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the configuration file
    Validate,
    /// Dry-run a routing decision for a request
    Decide {
        /// Request host (Host header)
        host: String,
        /// Request path
        path: String,
        /// Query string, without the leading '?'
        #[arg(short, long)]
        query: Option<String>,
        /// User-agent header value
        #[arg(short, long, default_value = "")]
        user_agent: String,
    },
    /// Print the raw configuration as JSON
    Get,
    /// Update one global scalar setting
    Set {
        /// Setting name (e.g. listening_port_http)
        name: String,
        /// New value; empty string clears the setting
        value: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Validate => match load_config(&cli.config) {
            Ok(config) => {
                println!(
                    "OK: {} domain rule(s) in {}",
                    config.proxy_rules.len(),
                    cli.config.display()
                );
            }
            Err(e) => {
                eprintln!("Invalid configuration: {e}");
                std::process::exit(1);
            }
        },
        Commands::Decide {
            host,
            path,
            query,
            user_agent,
        } => {
            let config = load_config(&cli.config)?;
            // One-shot evaluation: no probes have run, so every location
            // is health-unknown and eligible.
            let health = HealthRegistry::new().snapshot();
            let request = RequestContext {
                host,
                path,
                query,
                user_agent,
            };
            let decision = decide(&config, &health, &request);
            println!("{}", serde_json::to_string_pretty(&decision)?);
        }
        Commands::Get => {
            let store = SettingsStore::new(&cli.config);
            let config = store.get_configuration()?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Commands::Set { name, value } => {
            let store = SettingsStore::new(&cli.config);
            if store.save_value(&name, &value)? {
                println!("Saved {name}");
            } else {
                eprintln!("Unknown setting: {name}");
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
