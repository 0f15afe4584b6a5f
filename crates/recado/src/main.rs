// SPDX-FileCopyrightText: 2026 Recado Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Recado - a tiered intent router for a Spanish-language personal assistant.
//!
//! This is the binary entry point for the Recado CLI.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use recado_config::RecadoConfig;
use recado_core::InferenceProvider;
use recado_ollama::OllamaClient;
use recado_router::{IntentRouter, SignatureRegistry, base_signatures};
use tracing_subscriber::EnvFilter;

mod shell;

/// Recado - route assistant messages to execution tiers.
#[derive(Parser, Debug)]
#[command(name = "recado", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Route a single message and print the decision as JSON.
    Route {
        /// The message to classify.
        message: String,
    },
    /// Launch an interactive routing REPL.
    Shell,
    /// Print the resolved configuration.
    Config,
}

fn init_tracing(log_level: &str) {
    // RUST_LOG wins over the configured level when set.
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match recado_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            recado_config::render_errors(&errors);
            std::process::exit(1);
        }
    };
    init_tracing(&config.agent.log_level);

    let exit_code = match cli.command {
        Some(Commands::Route { message }) => run_route(&config, &message).await,
        Some(Commands::Shell) => shell::run_shell(config).await,
        Some(Commands::Config) => run_config(&config),
        None => {
            println!("recado: use --help for available commands");
            0
        }
    };
    std::process::exit(exit_code);
}

async fn run_route(config: &RecadoConfig, message: &str) -> i32 {
    let provider: Arc<dyn InferenceProvider> = match OllamaClient::new(&config.ollama) {
        Ok(client) => Arc::new(client),
        Err(err) => {
            eprintln!("error: {err}");
            return 1;
        }
    };
    let registry = Arc::new(SignatureRegistry::new(base_signatures()));
    let router = IntentRouter::new(config, provider, registry);

    let decision = router.route(message).await;
    match serde_json::to_string_pretty(&decision) {
        Ok(json) => {
            println!("{json}");
            0
        }
        Err(err) => {
            eprintln!("error: failed to serialize decision: {err}");
            1
        }
    }
}

fn run_config(config: &RecadoConfig) -> i32 {
    match toml::to_string_pretty(config) {
        Ok(rendered) => {
            print!("{rendered}");
            0
        }
        Err(err) => {
            eprintln!("error: failed to render config: {err}");
            1
        }
    }
}
