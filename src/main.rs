// src/main.rs
// Cla - Italian intent-classifier chatbot

use anyhow::Result;
use clap::{Parser, Subcommand};
use cla::{ChatPipeline, config::EnvConfig, web};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "cla")]
#[command(about = "Italian intent-classifier chatbot with a generative fallback")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the web chat server (default)
    Serve {
        /// Address to bind
        #[arg(long, env = "CLA_HOST")]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long, env = "CLA_PORT")]
        port: Option<u16>,

        /// Directory holding the exported model artifacts
        #[arg(short, long, env = "CLA_ARTIFACTS_DIR")]
        artifacts: Option<PathBuf>,
    },

    /// Classify a single message and print the reply
    Classify {
        /// Message text
        text: String,

        /// Directory holding the exported model artifacts
        #[arg(short, long, env = "CLA_ARTIFACTS_DIR")]
        artifacts: Option<PathBuf>,
    },
}

fn parse_level(level: &str) -> Level {
    level.trim().parse().unwrap_or(Level::INFO)
}

fn load_pipeline(config: &EnvConfig) -> Result<Arc<ChatPipeline>> {
    let validation = config.validate();
    for warning in &validation.warnings {
        warn!("{}", warning);
    }
    if !validation.is_valid() {
        anyhow::bail!("invalid configuration:\n{}", validation.report());
    }

    Ok(Arc::new(ChatPipeline::from_config(config)?))
}

async fn run_server(config: EnvConfig) -> Result<()> {
    let pipeline = load_pipeline(&config)?;

    let mut state = web::AppState::new(pipeline);
    if config.static_dir.is_dir() {
        state = state.with_static_dir(config.static_dir.clone());
    } else {
        warn!(dir = %config.static_dir.display(), "Static directory not found, /static disabled");
    }

    let app = web::create_router(state);
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Cla running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn run_classify(config: EnvConfig, text: &str) -> Result<()> {
    let pipeline = load_pipeline(&config)?;

    let text = text.trim();
    let (normalized, prediction) = pipeline.classify(text).await?;
    let reply = pipeline.router().respond(text, prediction).await;

    println!("normalized: {}", normalized);
    println!("category:   {}", prediction.category);
    println!("confidence: {:.4}", prediction.confidence);
    println!("reply:      {}", reply);
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Subscriber first: EnvConfig::load logs while parsing
    let log_level = std::env::var("CLA_LOG_LEVEL").unwrap_or_default();
    let subscriber = FmtSubscriber::builder()
        .with_max_level(parse_level(&log_level))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();
    let mut config = EnvConfig::load();

    match cli.command {
        None => run_server(config).await,
        Some(Commands::Serve { host, port, artifacts }) => {
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(dir) = artifacts {
                config.artifacts_dir = dir;
            }
            run_server(config).await
        }
        Some(Commands::Classify { text, artifacts }) => {
            if let Some(dir) = artifacts {
                config.artifacts_dir = dir;
            }
            run_classify(config, &text).await
        }
    }
}
