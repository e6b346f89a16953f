//! Colloquy CLI and REST API entry point.
//!
//! Binary name: `colloquy`
//!
//! Parses CLI arguments, initializes tracing and services, then
//! dispatches to the appropriate command handler or starts the REST API
//! server.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;
use console::style;

use cli::{Cli, Commands, TokenCommand};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    colloquy_observe::tracing_setup::init_tracing(cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    match cli.command {
        // Shell completions don't need app state
        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            generate(shell, &mut cmd, "colloquy", &mut std::io::stdout());
        }

        // The chat client talks to a running server over HTTP; no local
        // state either.
        Commands::Chat {
            server,
            chat_id,
            token,
        } => {
            cli::chat::run_chat(server, chat_id, token).await?;
        }

        Commands::Serve { host, port } => {
            let state = AppState::init().await?;
            let router = http::router::build_router(state);

            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            println!();
            println!(
                "  {} colloquy API listening on {}",
                style("●").green().bold(),
                style(format!("http://{addr}")).cyan()
            );
            println!();

            axum::serve(listener, router).await?;
        }

        Commands::Token { command } => match command {
            TokenCommand::Create { user_id } => {
                let state = AppState::init().await?;
                cli::token::create(&state, &user_id).await?;
            }
        },
    }

    colloquy_observe::tracing_setup::shutdown_tracing();
    Ok(())
}
