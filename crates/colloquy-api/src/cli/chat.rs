//! Interactive chat session.
//!
//! Drives a `SessionController` over the HTTP transport against a
//! running Colloquy server: optimistic user echo, a spinner while a turn
//! is in flight, and a single error affordance per failed turn. The
//! already-sent user message always stays visible, even when the turn
//! fails.

use std::io::Write;

use console::style;
use secrecy::SecretString;

use colloquy_core::session::SessionController;
use colloquy_types::chat::MessageRole;
use colloquy_types::session::{SessionMessage, SessionPhase};
use colloquy_infra::transport::HttpTurnTransport;

use super::input::{ChatInput, InputEvent};

/// Run the interactive chat loop.
pub async fn run_chat(
    server: String,
    chat_id: Option<String>,
    token: Option<String>,
) -> anyhow::Result<()> {
    let resuming = chat_id.is_some();
    let transport = HttpTurnTransport::new(server.clone(), token.map(SecretString::from));
    let mut controller = SessionController::new(transport, chat_id);

    println!();
    println!(
        "  {} colloquy chat {} {}",
        style("●").cyan().bold(),
        style("·").dim(),
        style(controller.chat_id()).dim()
    );
    println!("  {} connected to {server}", style("·").dim());
    println!();

    if resuming {
        let spinner = thinking_spinner("loading history...");
        controller.load_history().await;
        spinner.finish_and_clear();
    }

    let (mut input, mut stdout) = ChatInput::new(format!("{} ", style("you ❯").bold()))?;

    // Show any preloaded history before the first prompt.
    for message in controller.messages().to_vec() {
        render_message(&mut stdout, &message)?;
    }

    loop {
        match input.read_line().await {
            InputEvent::Message(text) => {
                if text.is_empty() {
                    continue;
                }

                let spinner = thinking_spinner("thinking...");
                let submitted = controller.submit(&text).await;
                spinner.finish_and_clear();
                if !submitted {
                    continue;
                }

                match controller.phase() {
                    SessionPhase::Idle => {
                        if let Some(reply) = controller
                            .messages()
                            .iter()
                            .rev()
                            .find(|m| m.role == MessageRole::Assistant)
                        {
                            render_message(&mut stdout, &reply.clone())?;
                        }
                    }
                    SessionPhase::Error => {
                        if let Some(error) = controller.last_error() {
                            writeln!(
                                stdout,
                                "  {} {}",
                                style("✗").red().bold(),
                                style(error.to_string()).red()
                            )?;
                        }
                    }
                    SessionPhase::Sending => {}
                }
            }
            InputEvent::Eof | InputEvent::Interrupted => {
                writeln!(stdout, "  {} bye", style("·").dim())?;
                break;
            }
        }
    }

    Ok(())
}

fn thinking_spinner(message: &str) -> indicatif::ProgressBar {
    let spinner = indicatif::ProgressBar::new_spinner();
    spinner.set_style(
        indicatif::ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .expect("static spinner template"),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    spinner
}

fn render_message(
    stdout: &mut rustyline_async::SharedWriter,
    message: &SessionMessage,
) -> std::io::Result<()> {
    let label = match message.role {
        MessageRole::User => style("you").bold(),
        MessageRole::Assistant => style("assistant").cyan().bold(),
    };
    writeln!(stdout, "  {label} {}", message.content)
}
