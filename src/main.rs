use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use people_api::app::{app, AppState};
use people_api::auth::{generate_jwt, Claims};
use people_api::clock::SystemClock;
use people_api::config::{self, StoreBackend};
use people_api::database::Database;

#[derive(Parser)]
#[command(name = "people-api")]
#[command(about = "People API - person records with audited timestamps")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve {
        #[arg(long, help = "Storage strategy: tracked or sql")]
        backend: Option<StoreBackend>,

        #[arg(long, help = "Port to listen on")]
        port: Option<u16>,
    },

    #[command(about = "Print a signed bearer token")]
    Token {
        #[arg(long, help = "Token subject")]
        subject: String,

        #[arg(long, default_value = "admin", help = "Role claim (admin may write)")]
        role: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, STORE_BACKEND, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Serve { backend: None, port: None }) {
        Commands::Serve { backend, port } => serve(backend, port).await,
        Commands::Token { subject, role } => {
            let config = config::config();
            let claims = Claims::new(subject, role, config.security.jwt_expiry_hours);
            let token = generate_jwt(&claims, &config.security.jwt_secret)?;
            println!("{}", token);
            Ok(())
        }
    }
}

async fn serve(backend: Option<StoreBackend>, port: Option<u16>) -> anyhow::Result<()> {
    let mut config = config::config().clone();
    if let Some(backend) = backend {
        config.store.backend = backend;
    }
    if let Some(port) = port {
        config.api.port = port;
    }

    if config.security.jwt_secret.is_empty() {
        bail!("SECURITY_JWT_SECRET must be set in {:?} mode", config.environment);
    }

    tracing::info!("Starting People API in {:?} mode", config.environment);

    let db = Database::connect(&config.database)
        .await
        .with_context(|| format!("failed to open {}", config.database.url))?;

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let state = AppState::new(config, db.clone(), Arc::new(SystemClock));

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!(
        "People API listening on http://{} ({:?} backend)",
        bind_addr,
        state.people.backend()
    );

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    db.close().await;
    tracing::info!("Shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for ctrl-c: {}", e);
        std::future::pending::<()>().await;
    }
}
