// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Zela - the WhatsApp conversational engine of the Zela family assistant.
//!
//! This is the binary entry point for the engine sidecar.

use clap::{Parser, Subcommand};

mod serve;
mod shell;

/// Zela - WhatsApp conversational engine.
#[derive(Parser, Debug)]
#[command(name = "zela", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the webhook server wired to the SaaS backend.
    Serve,
    /// Launch a local sandbox conversation (no backend required).
    Shell,
    /// Print the resolved configuration.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup.
    let config = match zela_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            zela_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Shell) => shell::run_shell(config).await,
        Some(Commands::Config) => print_config(config),
        None => {
            println!("zela: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

/// Print the resolved configuration with secrets redacted.
fn print_config(mut config: zela_config::ZelaConfig) -> Result<(), zela_core::ZelaError> {
    if config.whatsapp.access_token.is_some() {
        config.whatsapp.access_token = Some("<redacted>".to_string());
    }
    if config.backend.api_token.is_some() {
        config.backend.api_token = Some("<redacted>".to_string());
    }

    let rendered = toml::to_string_pretty(&config)
        .map_err(|e| zela_core::ZelaError::Config(format!("failed to render config: {e}")))?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
mod tests {
    #[test]
    fn binary_loads_config_defaults() {
        // Verify config loads with defaults (no config file needed).
        let config = zela_config::load_and_validate_str("").expect("default config should be valid");
        assert_eq!(config.agent.name, "zela");
    }

    #[test]
    fn redaction_hides_tokens() {
        let config = zela_config::load_and_validate_str(
            "[backend]\napi_token = \"super-secret\"\n",
        )
        .unwrap();
        assert_eq!(config.backend.api_token.as_deref(), Some("super-secret"));
        // print_config consumes and redacts; just verify it succeeds.
        super::print_config(config).unwrap();
    }
}
