//! CLI argument definitions.

pub mod chat;
pub mod input;
pub mod token;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Colloquy: a conversational assistant front end.
#[derive(Debug, Parser)]
#[command(name = "colloquy", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Export spans via OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the REST API server.
    Serve {
        /// Address to bind.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        /// Port to listen on.
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },

    /// Start an interactive chat session against a running server.
    Chat {
        /// Base URL of the Colloquy server.
        #[arg(long, default_value = "http://127.0.0.1:8080")]
        server: String,
        /// Resume an existing chat instead of starting a new one.
        #[arg(long)]
        chat_id: Option<String>,
        /// API token for an authenticated session (guest when absent).
        #[arg(long, env = "COLLOQUY_TOKEN")]
        token: Option<String>,
    },

    /// Manage API tokens.
    Token {
        #[command(subcommand)]
        command: TokenCommand,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Debug, Subcommand)]
pub enum TokenCommand {
    /// Mint an API token for a user id (shown once, stored hashed).
    Create {
        /// User id the token authenticates as.
        user_id: String,
    },
}
