// SPDX-FileCopyrightText: 2026 Recado Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `recado shell` command implementation.
//!
//! Launches an interactive REPL that routes each line and prints the
//! decision with a colored tier. Operator commands start with `:`; the only
//! one today is `:learn <intent> <keyword>`, which feeds the keyword
//! learning queue as a validated event.

use std::sync::Arc;

use chrono::Utc;
use colored::Colorize;
use recado_config::RecadoConfig;
use recado_core::{InferenceProvider, Intent, LearnedKeyword, RoutingDecision, Tier};
use recado_ollama::OllamaClient;
use recado_router::{
    InMemoryLearnedStore, IntentRouter, LearningQueue, SignatureRegistry, base_signatures,
    spawn_learning_worker,
};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::info;

/// Runs the `recado shell` interactive REPL.
pub async fn run_shell(config: RecadoConfig) -> i32 {
    let provider: Arc<dyn InferenceProvider> = match OllamaClient::new(&config.ollama) {
        Ok(client) => Arc::new(client),
        Err(err) => {
            eprintln!("error: {err}");
            return 1;
        }
    };

    let (registry, learning) = if config.learning.enabled {
        let store = Arc::new(InMemoryLearnedStore::new());
        let registry = Arc::new(SignatureRegistry::with_source(
            base_signatures(),
            store.clone(),
            std::time::Duration::from_secs(config.router.registry_refresh_secs),
        ));
        let (queue, _worker) = spawn_learning_worker(
            config.learning.queue_capacity,
            config.learning.min_confidence,
            store,
            registry.clone(),
        );
        (registry, Some(queue))
    } else {
        (Arc::new(SignatureRegistry::new(base_signatures())), None)
    };

    let router = IntentRouter::new(&config, provider, registry);

    let mut rl = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(err) => {
            eprintln!("error: failed to initialize readline: {err}");
            return 1;
        }
    };

    println!("{}", "recado shell".bold().green());
    println!("Type {} to exit.\n", "/quit".yellow());

    let prompt = format!("{}> ", config.agent.name.green());
    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed == "/quit" || trimmed == "/exit" {
                    break;
                }
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&line);

                if let Some(rest) = trimmed.strip_prefix(":learn") {
                    handle_learn(rest, learning.as_ref());
                    continue;
                }

                let decision = router.route(trimmed).await;
                print_decision(&decision);
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("error: readline failed: {err}");
                return 1;
            }
        }
    }

    println!("adiós");
    0
}

/// Parse and submit a `:learn <intent> <keyword>` command. The operator
/// typing the command is the validation step, so the event carries full
/// confidence.
fn handle_learn(args: &str, learning: Option<&LearningQueue>) {
    let Some(queue) = learning else {
        println!("{}", "learning is disabled in configuration".yellow());
        return;
    };

    let mut parts = args.split_whitespace();
    let (Some(intent_name), Some(keyword), None) = (parts.next(), parts.next(), parts.next())
    else {
        println!("usage: :learn <intent> <keyword>");
        return;
    };
    let Ok(intent) = intent_name.parse::<Intent>() else {
        println!("{} unknown intent '{intent_name}'", "error:".red());
        return;
    };

    queue.submit(LearnedKeyword {
        intent,
        keyword: keyword.to_string(),
        confidence: 1.0,
        validated_by: "operator".to_string(),
        learned_at: Utc::now(),
    });
    info!(%intent, keyword, "learning event submitted");
    println!("learning {} for {}", keyword.bold(), intent.to_string().cyan());
}

fn print_decision(decision: &RoutingDecision) {
    let tier = match decision.tier {
        Tier::Deterministic => "deterministic".green(),
        Tier::Local => "local".yellow(),
        Tier::Api => "api".red(),
    };
    println!(
        "{} {} ({:.2}) - {}",
        tier,
        decision.intent.to_string().bold(),
        decision.confidence,
        decision.reason
    );
    for (key, value) in &decision.params {
        println!("  {key} = {value}");
    }
}
