mod commands;
mod render;

use std::ops::ControlFlow;
use std::sync::Arc;

use assistant_client::session::format_suggestions;
use assistant_client::{ChatSession, ClientConfig, DispatchOutcome, HttpAssistantClient, ask_once};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tracing::{error, info};

use crate::commands::{Command, HELP_TEXT, parse_command};

const DEFAULT_LOG_FILTER: &str = "chat_cli=info,assistant_client=info";

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match ClientConfig::from_env() {
        Ok(cfg) => cfg,
        Err(err) => {
            error!("failed to read assistant client config: {err}");
            std::process::exit(1);
        }
    };

    let client = match HttpAssistantClient::new(&config) {
        Ok(client) => Arc::new(client),
        Err(err) => {
            error!("failed to build assistant client: {err}");
            std::process::exit(1);
        }
    };

    info!(api_base_url = %client.base_url(), "chat client starting");

    let session = ChatSession::new(client.clone(), &config);
    let render_task = tokio::spawn(render::render_events(session.subscribe()));

    tokio::spawn({
        let session = session.clone();
        async move {
            // Failure is logged by the session; sends still work without an id.
            let _ = session.initialize().await;
        }
    });

    println!("{HELP_TEXT}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            _ = signal::ctrl_c() => {
                info!("shutdown signal received");
                break;
            }
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(err) => {
                        error!("failed to read stdin: {err}");
                        break;
                    }
                };

                if handle_command(parse_command(&line), &session, &client)
                    .await
                    .is_break()
                {
                    break;
                }
            }
        }
    }

    render_task.abort();
}

async fn handle_command(
    command: Command,
    session: &ChatSession,
    client: &HttpAssistantClient,
) -> ControlFlow<()> {
    match command {
        Command::Send(text) => {
            let session = session.clone();
            tokio::spawn(async move {
                if session.send(&text).await == DispatchOutcome::Busy {
                    println!("still waiting on the previous reply");
                }
            });
        }
        Command::NewChat => {
            let session = session.clone();
            tokio::spawn(async move {
                if let Err(err) = session.start_new_chat().await {
                    println!("new chat started without a session id: {err}");
                }
            });
        }
        Command::Forget => forget_session(session, client).await,
        Command::History => show_history(session, client).await,
        Command::Ask(text) => match ask_once(client, &text).await {
            Ok(response) => {
                println!("{}", response.ai_response);
                if let Some(block) = format_suggestions(response.suggestions()) {
                    println!("{block}");
                }
            }
            Err(err) => println!("error: {}", err.user_message()),
        },
        Command::Health => match client.health().await {
            Ok(health) => println!("assistant service is {}", health.status),
            Err(err) => println!("assistant service unreachable: {}", err.user_message()),
        },
        Command::Help => println!("{HELP_TEXT}"),
        Command::Quit => return ControlFlow::Break(()),
        Command::Empty => {}
        Command::Unknown(name) => println!("unknown command {name}; try /help"),
    }
    ControlFlow::Continue(())
}

async fn show_history(session: &ChatSession, client: &HttpAssistantClient) {
    let session_id = session.session_id();
    if session_id.is_empty() {
        println!("no active session yet");
        return;
    }

    match client.fetch_session_messages(&session_id).await {
        Ok(history) if history.messages.is_empty() => {
            println!("session {} has no messages", history.session_id);
        }
        Ok(history) => {
            for turn in history.messages {
                println!("{}: {}", turn.role, turn.content);
            }
        }
        Err(err) => println!("could not load history: {}", err.user_message()),
    }
}

async fn forget_session(session: &ChatSession, client: &HttpAssistantClient) {
    let session_id = session.session_id();
    if !session_id.is_empty() {
        match client.delete_session(&session_id).await {
            Ok(deleted) => info!(session_id = %session_id, "{}", deleted.message),
            Err(err) => println!("could not delete session: {}", err.user_message()),
        }
    }

    if let Err(err) = session.start_new_chat().await {
        println!("new chat started without a session id: {err}");
    }
}
