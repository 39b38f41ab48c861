//! BC Racing Message Blast Server
//!
//! Serves the message form and list, persists submissions to SQLite,
//! and fans each saved message out as one email per configured
//! recipient.
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `BCRACING_CONFIG` | - | Path to a config TOML file |
//! | `BCRACING_HTTP_HOST` | `0.0.0.0` | Bind address |
//! | `BCRACING_HTTP_PORT` | `8080` | HTTP port |
//! | `BCRACING_DATABASE_URL` | `sqlite://bcracing.db` | SQLite URL |
//! | `BCRACING_SMTP_HOST` | - | SMTP relay host |
//! | `BCRACING_SMTP_USERNAME` | - | SMTP username |
//! | `BCRACING_SMTP_PASSWORD` | - | SMTP password |
//! | `BCRACING_NOTIFY_RECIPIENTS` | - | Comma-separated recipients |
//! | `RUST_LOG` | `info` | Log level |
//! | `LOG_FORMAT` | `text` | `json` for structured output |

use std::str::FromStr;
use std::sync::Arc;

use anyhow::Result;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::info;

use bc_config::ConfigLoader;
use bc_platform::{
    messages_router, MessageRepository, MessageService, MessagesState, ReminderDispatcher,
    SmtpMailer,
};

#[tokio::main]
async fn main() -> Result<()> {
    bc_common::logging::init_logging("bc-server");

    info!("Starting BC Racing server");

    let config = ConfigLoader::new().load()?;

    // SQLite pool, creating the database file on first run
    let db_path = config
        .database
        .url
        .strip_prefix("sqlite://")
        .unwrap_or(&config.database.url);
    let options = SqliteConnectOptions::from_str(db_path)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new().connect_with(options).await?;
    info!(url = %config.database.url, "Connected to SQLite");

    let repo = Arc::new(MessageRepository::new(pool));
    repo.init_schema().await?;

    // Mailer and dispatcher
    let mailer = Arc::new(SmtpMailer::new(&config.smtp)?);
    let dispatcher = Arc::new(ReminderDispatcher::new(mailer, config.notify.clone()));
    info!(
        recipients = config.notify.recipients.len(),
        smtp_host = %config.smtp.host,
        "Reminder dispatch configured"
    );

    let service = Arc::new(MessageService::new(
        repo.clone(),
        dispatcher,
        config.notify.recipients.clone(),
    ));

    let app = messages_router(MessagesState {
        service,
        repo: repo.clone(),
    })
    .route("/health", get(health_handler))
    .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.http.host, config.http.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", addr);
    info!("Press Ctrl+C to shutdown");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("BC Racing server shutdown complete");
    Ok(())
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "UP",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
