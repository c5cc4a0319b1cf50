use anyhow::Context;
use clap::{Parser, Subcommand};

use booktracker_db::Database;
use booktracker_kernel::{settings::Settings, InitCtx};

/// Track books through HTML pages and a JSON API.
#[derive(Debug, Parser)]
#[command(name = "booktracker", version, about)]
struct Cli {
    /// SQLite database file (overrides `database.path`)
    #[arg(long, global = true)]
    database: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the web pages and JSON API (default)
    Serve {
        /// Address to bind (overrides `server.host`)
        #[arg(long)]
        host: Option<String>,
        /// Port to bind (overrides `server.port`)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Create or upgrade the schema, then exit
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load().context("failed to load settings")?;
    if let Some(path) = cli.database {
        settings.database.path = path;
    }

    booktracker_telemetry::init(&settings.telemetry)?;

    match cli.command.unwrap_or(Command::Serve {
        host: None,
        port: None,
    }) {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                settings.server.host = host;
            }
            if let Some(port) = port {
                settings.server.port = port;
            }
            serve(settings).await
        }
        Command::Migrate => migrate(settings).await,
    }
}

async fn serve(settings: Settings) -> anyhow::Result<()> {
    tracing::info!(
        env = ?settings.environment,
        db = %settings.database.path,
        "booktracker starting"
    );

    let db = Database::open(&settings.database.path).await?;
    let app = booktracker_app::bootstrap(&settings, &db).await?;

    let ctx = InitCtx {
        settings: &settings,
        db: &db,
    };
    app.registry.start_modules(&ctx).await?;

    let served = booktracker_http::start_server(
        app.router,
        &settings,
        booktracker_http::shutdown_signal(),
    )
    .await;

    app.registry.stop_modules().await?;
    db.close().await?;
    served
}

async fn migrate(settings: Settings) -> anyhow::Result<()> {
    let db = Database::open(&settings.database.path).await?;
    booktracker_app::bootstrap(&settings, &db).await?;
    db.close().await?;

    tracing::info!(db = %settings.database.path, "migrations complete");
    Ok(())
}
