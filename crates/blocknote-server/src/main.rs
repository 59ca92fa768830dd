//! blocknote command-line interface.
//!
//! Usage:
//!   # Run the generation server (stub responses unless GEMINI_API_KEY is set)
//!   blocknote serve --listen 127.0.0.1:3000
//!
//!   # Dispatch one prompt against a running server and print the blocks
//!   blocknote prompt "plan a picnic"
//!
//!   # Ask for an outline of some markdown
//!   blocknote summarize --kind outline "$(cat notes.md)"
//!
//!   # Preview a markdown file as HTML
//!   blocknote markdown notes.md

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::AsyncReadExt;
use tracing_subscriber::{EnvFilter, fmt};

use blocknote_dispatch::{
    BlocknoteConfig, HttpGenerationClient, HttpSummarizeClient, PromptDispatcher, SummarizeClient,
    SummarizeKind,
};
use blocknote_server::AppState;
use blocknote_store::shared_block_store;

/// Block-based notes with AI generation.
#[derive(Parser, Debug)]
#[command(name = "blocknote")]
#[command(about = "Block-based note engine with AI generation")]
struct Args {
    /// Config file (default: $XDG_CONFIG_HOME/blocknote/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the generation/summarization HTTP server
    Serve {
        /// Address to bind (overrides [server].listen)
        #[arg(long)]
        listen: Option<SocketAddr>,
    },

    /// Send a prompt and print the generated blocks
    Prompt {
        text: String,

        /// Server base URL (overrides [client].endpoint)
        #[arg(long)]
        endpoint: Option<String>,

        /// Print HTML instead of plain text
        #[arg(long)]
        html: bool,
    },

    /// Summarize, explain, or outline some text
    Summarize {
        text: String,

        /// summarize, explain, or outline
        #[arg(long, default_value = "summarize", value_parser = parse_kind)]
        kind: SummarizeKind,

        /// Server base URL (overrides [client].endpoint)
        #[arg(long)]
        endpoint: Option<String>,
    },

    /// Render a markdown file (or stdin) to HTML
    Markdown {
        /// Input file; reads stdin when omitted
        path: Option<PathBuf>,
    },
}

fn parse_kind(s: &str) -> Result<SummarizeKind, String> {
    SummarizeKind::from_str(s).ok_or_else(|| format!("unknown kind '{s}'"))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so command output stays pipeable
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = BlocknoteConfig::load(args.config.as_deref()).context("loading config")?;

    match args.command {
        Command::Serve { listen } => {
            let listen = match listen {
                Some(addr) => addr,
                None => config
                    .server
                    .listen
                    .parse()
                    .with_context(|| format!("invalid listen address '{}'", config.server.listen))?,
            };
            let state = AppState::from_config(&config.gemini)?;
            blocknote_server::run_server(listen, state).await
        }
        Command::Prompt {
            text,
            endpoint,
            html,
        } => {
            let mut client_config = config.client;
            if let Some(endpoint) = endpoint {
                client_config.endpoint = endpoint;
            }
            let client = HttpGenerationClient::new(&client_config)?;
            tracing::debug!(endpoint = %client.base_url(), "dispatching prompt");

            let store = shared_block_store();
            let dispatcher = PromptDispatcher::new(Arc::new(client), store.clone());
            dispatcher.submit(&text).await?;

            let store = store.read();
            let out = if html {
                blocknote_render::render_document(store.blocks(), store.selected())
            } else {
                blocknote_render::render_text_document(store.blocks(), store.selected())
            };
            println!("{out}");
            Ok(())
        }
        Command::Summarize {
            text,
            kind,
            endpoint,
        } => {
            let mut client_config = config.client;
            if let Some(endpoint) = endpoint {
                client_config.endpoint = endpoint;
            }
            let client = HttpSummarizeClient::new(&client_config)?;
            let summary = client.summarize(&text, kind).await?;
            println!("{summary}");
            Ok(())
        }
        Command::Markdown { path } => {
            let source = match path {
                Some(path) => tokio::fs::read_to_string(&path)
                    .await
                    .with_context(|| format!("reading {}", path.display()))?,
                None => {
                    let mut buf = String::new();
                    tokio::io::stdin().read_to_string(&mut buf).await?;
                    buf
                }
            };
            print!("{}", blocknote_render::render_markdown(&source));
            Ok(())
        }
    }
}
