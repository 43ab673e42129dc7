use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::process;
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

mod auth;
mod config;
mod db;
mod logging;
mod mail;
mod server;
mod services;
mod storage;

use crate::auth::AuthSession;
use crate::db::postgres::PostgresDatabase;
use crate::mail::service::{MailTransport, Mailer, SmtpMailTransport};
use crate::server::AppState;
use crate::services::artworks::ArtworkService;
use crate::services::delete_flow::DeleteAllFlow;
use crate::storage::gateway::StorageGateway;
use crate::storage::s3::S3ObjectStore;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config.toml",
        global = true
    )]
    config: String,

    /// Show verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the contact-form mail relay server
    Serve,
    /// Create database tables and indexes
    InitDb,
    /// Check SMTP connectivity and credentials
    VerifySmtp,
    /// Delete every artwork owned by a user (asks twice)
    PurgeArtworks {
        /// Owner whose artworks are purged
        #[arg(long)]
        user: Uuid,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match config::load_config(&cli.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    let _log_guard = if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .init();
        None
    } else {
        Some(logging::init_logging(config.logging.as_ref())?)
    };

    info!("Artfolio v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration loaded from: {}", cli.config);

    match cli.command {
        Commands::Serve => serve(config).await,
        Commands::InitDb => init_db(config).await,
        Commands::VerifySmtp => verify_smtp(config).await,
        Commands::PurgeArtworks { user } => purge_artworks(config, user).await,
    }
}

/// Start the mail relay. An SMTP verification failure is reported but
/// does not prevent startup, matching how the relay is deployed.
async fn serve(config: config::Config) -> Result<()> {
    let transport: Arc<dyn MailTransport> = Arc::new(SmtpMailTransport::new(&config.smtp)?);
    let mailer = Arc::new(Mailer::new(transport, &config.smtp));

    info!("Verifying SMTP connection...");
    match mailer.verify().await {
        Ok(()) => info!("SMTP connection verified"),
        Err(e) => warn!("SMTP verification failed, starting anyway: {}", e),
    }

    let state = AppState { mailer };
    server::start_server(state, &config.server).await
}

async fn init_db(config: config::Config) -> Result<()> {
    let database = PostgresDatabase::new(&config.database).await?;
    database.init_schema().await?;
    info!("Database schema initialized");
    Ok(())
}

async fn verify_smtp(config: config::Config) -> Result<()> {
    let transport = SmtpMailTransport::new(&config.smtp)?;
    match transport.verify().await {
        Ok(()) => {
            info!("SMTP connection verified");
            Ok(())
        }
        Err(e) => {
            error!("SMTP verification failed: {}", e);
            process::exit(1);
        }
    }
}

/// Irreversible bulk deletion, gated behind two interactive
/// confirmations.
async fn purge_artworks(config: config::Config, user: Uuid) -> Result<()> {
    let mut flow = DeleteAllFlow::new();
    for prompt in [
        format!("Delete ALL artworks owned by {}? [y/N] ", user),
        "This cannot be undone. Confirm again. [y/N] ".to_string(),
    ] {
        if !ask(&prompt)? {
            info!("Purge cancelled");
            return Ok(());
        }
        flow = flow.confirm();
    }
    let token = flow
        .arm()
        .context("Purge was not fully confirmed")?;

    let database = PostgresDatabase::new(&config.database).await?;
    let store = S3ObjectStore::new(&config.storage).await?;
    let gateway = Arc::new(StorageGateway::new(store));
    let service = ArtworkService::new(database, gateway, Some(AuthSession::new(user)));

    service.delete_all(token).await?;
    info!("All artworks owned by {} deleted", user);
    Ok(())
}

fn ask(prompt: &str) -> Result<bool> {
    print!("{}", prompt);
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("y"))
}
