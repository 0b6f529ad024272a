//! AgentRun Server

use std::net::SocketAddr;
use std::time::Duration;

use clap::{ArgAction, Parser};
use tokio::net::TcpListener;
use tracing::{error, info};

use agentrun_server::{http, logging, AppState, Config};

/// Single-slot agent runner.
#[derive(Parser, Debug)]
#[command(name = "agentrun-server", about = "Run one agent at a time and poll its status over HTTP")]
struct Args {
    /// HTTP server address
    #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1:8000")]
    bind_addr: String,

    /// Deployment environment name
    #[arg(long, env = "APP_ENV", default_value = "development")]
    app_env: String,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Emit JSON log lines (set to false for human-readable text)
    #[arg(long, env = "LOG_JSON", default_value_t = true, action = ArgAction::Set)]
    log_json: bool,

    /// Seconds each agent works before returning
    #[arg(long, env = "AGENT_TIMEOUT", default_value_t = 5)]
    agent_timeout: u64,

    /// Seed for the policy checker's decisions
    #[arg(long, env = "AGENT_SEED")]
    agent_seed: Option<u64>,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            bind_addr: args.bind_addr,
            app_env: args.app_env,
            log_level: args.log_level.to_lowercase(),
            log_json: args.log_json,
            agent_delay: Duration::from_secs(args.agent_timeout),
            agent_seed: args.agent_seed,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = Config::from(Args::parse());
    logging::init(&config)?;

    let addr: SocketAddr = config.bind_addr.parse()?;

    info!(
        http_addr = %addr,
        app_env = %config.app_env,
        agent_delay_secs = config.agent_delay.as_secs(),
        "Starting AgentRun server"
    );

    let state = AppState::new(config);
    let router = http::create_router(state);

    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);

    if let Err(e) = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(error = %e, "HTTP server error");
        return Err(e.into());
    }

    info!("AgentRun server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
