//! Lexaid terminal front end - composition root.
//!
//! 1. Resolve configuration (CLI > env > TOML file > defaults)
//! 2. Build the HTTP client, session store and dispatcher
//! 3. Spawn a renderer that redraws from store snapshots on every event
//! 4. Read questions and commands from stdin until /quit or EOF
//! 5. On EOF, wait for the answer still in flight before exiting

mod cli;
mod command;
mod render;
mod view;

use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;
use tracing_subscriber::EnvFilter;

use lexaid_chat::{
    suggestions_for, AskService, ChatError, HttpAskClient, QueryDispatcher, SessionStore,
    SubmitOutcome,
};
use lexaid_core::{LexaidConfig, LexaidError};

use crate::cli::CliArgs;
use crate::command::Command;
use crate::view::Renderer;

/// Missing file means defaults; a file that exists must parse.
fn load_config(path: &Path) -> Result<LexaidConfig, LexaidError> {
    if path.exists() {
        LexaidConfig::load(path)
    } else {
        Ok(LexaidConfig::default())
    }
}

fn report(outcome: SubmitOutcome) {
    match outcome {
        SubmitOutcome::Ignored(ChatError::RequestInFlight) => {
            println!("Still waiting for the previous answer; your question was not sent.");
        }
        SubmitOutcome::Ignored(ChatError::SuggestionUnavailable) => {
            println!("Suggestions are only available before the first question.");
        }
        _ => {}
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config.
    let config_file = args.resolve_config_path();
    let mut config = load_config(&config_file)?;
    config.apply_env_overrides();
    args.apply_to(&mut config);

    // Tracing. Logs go to stderr so they stay out of the transcript.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting Lexaid v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration resolved");
    config.validate()?;

    // Session.
    let client = Arc::new(
        HttpAskClient::from_config(&config.service)
            .map_err(|e| LexaidError::Chat(e.to_string()))?,
    );
    let service: Arc<dyn AskService> = client.clone();
    let dispatcher = Arc::new(QueryDispatcher::new(
        Arc::new(SessionStore::new()),
        service,
        config.service.top_k,
    ));
    let store = Arc::clone(dispatcher.store());
    tracing::info!(
        session_id = %store.session_id(),
        base_url = client.base_url(),
        top_k = dispatcher.top_k(),
        "Q&A service configured"
    );

    let renderer = Renderer::spawn(Arc::clone(&store), |block| println!("\n{}\n", block));
    let mut submits = JoinSet::new();

    // Presentation state.
    let mut show_disclaimer = true;
    println!("{}\n", render::DISCLAIMER);
    println!("{}\n", render::format_suggestions(suggestions_for(&store.snapshot())));
    println!("Type /help for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match command::parse_command(&line) {
            Command::Quit => {
                // Leave immediately; an unanswered question is dropped.
                submits.abort_all();
                break;
            }
            Command::Ask(question) => {
                store.set_draft(question.clone());
                let dispatcher = Arc::clone(&dispatcher);
                submits.spawn(async move { report(dispatcher.submit(&question).await) });
            }
            Command::Suggestion(index) => {
                let dispatcher = Arc::clone(&dispatcher);
                submits.spawn(async move { report(dispatcher.submit_suggestion(index).await) });
            }
            Command::Health => match client.health().await {
                Ok(health) => println!("{}", render::format_health(&health)),
                Err(e) => {
                    tracing::warn!(error = %e, "Health check failed");
                    println!("The legal Q&A service is not reachable right now.");
                }
            },
            Command::Documents => match client.documents().await {
                Ok(list) => println!("{}", render::format_documents(&list)),
                Err(e) => {
                    tracing::warn!(error = %e, "Document listing failed");
                    println!("Could not list documents right now.");
                }
            },
            Command::Dismiss => {
                show_disclaimer = false;
                println!("Disclaimer hidden.");
            }
            Command::Help => {
                if show_disclaimer {
                    println!("{}\n", render::DISCLAIMER);
                }
                let offered = suggestions_for(&store.snapshot());
                if !offered.is_empty() {
                    println!("{}\n", render::format_suggestions(offered));
                }
                println!("{}", render::HELP);
            }
            Command::Unknown(name) => println!("Unknown command {}. Type /help.", name),
        }
    }

    renderer.finish(submits).await;
    tracing::info!(session_id = %store.session_id(), messages = store.len(), "Session ended");
    Ok(())
}
