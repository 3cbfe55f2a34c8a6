//! Interactive terminal console.
//!
//! Drives the session controller against the real Gemini client: plain
//! lines are submitted as chat messages, slash commands exercise modes,
//! design synthesis, and connector drafts. Speech engines are not wired in
//! this environment, so capture stays disabled and playback is attempted
//! only when an engine is present.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use aria_core::{Role, SessionController};
use aria_llm::GeminiClient;
use aria_speech::{CaptureBridge, Playback};

const HELP: &str = "\
commands:
  /modes            list modes
  /mode <id>        switch mode
  /spawn            spawn a mode from the latest proposal or notes
  /notes <text>     set operator notes
  /design           run design synthesis
  /connect          create a connector draft from the notes
  /integrations     list integrations
  /help             this text
  /quit             exit
anything else is sent as a chat message";

/// Run the console until `/quit` or EOF.
pub async fn run() -> Result<()> {
    let client =
        GeminiClient::from_env().context("set GEMINI_API_KEY to use the console")?;
    let session = Arc::new(SessionController::new(Arc::new(client)));

    // No platform engines in a terminal build; both bridges degrade.
    let capture = CaptureBridge::new(None);
    let playback = Playback::new(None);
    if !capture.available() {
        debug!("speech capture disabled");
    }

    println!("aria console - /help for commands");
    print_mode_banner(&session).await;

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim().to_string();
        if line.is_empty() {
            continue;
        }

        match line.split_once(' ').map_or((line.as_str(), ""), |(a, b)| (a, b)) {
            ("/quit", _) => break,
            ("/help", _) => println!("{HELP}"),
            ("/modes", _) => {
                for mode in session.modes().await {
                    println!("  {} - {} ({})", mode.id, mode.name, mode.description);
                }
            }
            ("/mode", id) => match session.set_mode(id.trim()).await {
                Ok(()) => print_mode_banner(&session).await,
                Err(err) => println!("! {err}"),
            },
            ("/notes", text) => {
                session.set_operator_notes(text.trim()).await;
                println!("noted.");
            }
            ("/design", _) => match session.run_design_synthesis().await {
                Ok(proposal) => println!("proposal:\n{proposal}"),
                Err(err) => println!("! {err}"),
            },
            ("/spawn", _) => {
                let mode = session.auto_spawn_mode().await;
                println!("spawned {} ({})", mode.id, mode.name);
            }
            ("/connect", _) => match session.create_connector_draft().await {
                Ok(draft) => println!("drafted {} - {}", draft.id, draft.name),
                Err(err) => println!("! {err}"),
            },
            ("/integrations", _) => {
                for integration in session.integrations().await {
                    println!(
                        "  {} [{}] - {}",
                        integration.id,
                        integration.status.as_str(),
                        integration.description
                    );
                }
            }
            _ => {
                session.submit(&line).await;
                render_latest(&session, &playback).await;
            }
        }
    }

    Ok(())
}

async fn print_mode_banner(session: &Arc<SessionController>) {
    let mode = session.current_mode().await;
    println!("[{}] {}", mode.id, mode.description);
}

/// Print everything the last turn appended and speak the assistant reply.
async fn render_latest(session: &Arc<SessionController>, playback: &Playback) {
    let messages = session.visible_messages().await;
    let mode = session.current_mode().await;

    for message in messages.iter().rev().take(2).rev() {
        match message.role {
            Role::Assistant => {
                println!("{}: {}", mode.name, message.text);
                if playback.available() {
                    if let Err(err) = playback
                        .say(&mode.id, mode.voice_hint.as_deref(), &message.text)
                        .await
                    {
                        debug!("playback failed: {err}");
                    }
                }
            }
            Role::System => println!("  [system] {}", message.text),
            Role::User => {}
        }
    }
}
