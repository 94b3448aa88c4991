//! Wild Card score tracker entrypoint wiring the HTTP API, the Telegram bot and both sinks.

use std::net::SocketAddr;

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wild_card_score::{
    bot::{self, client::TelegramClient},
    config::AppConfig,
    dao::chat_webhook::ChatWebhookClient,
    routes,
    services::sheet_recorder::google_connector,
    state::{AppState, SharedState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load();
    let port = config.port;
    let timeout = config.sink_timeout;
    let telegram_token = config.telegram_bot_token.clone();

    let webhook = ChatWebhookClient::new(config.chat_webhook_url.clone(), timeout)
        .context("building chat webhook client")?;
    if !webhook.is_configured() {
        warn!("GOOGLE_CHAT_WEBHOOK_URL not set; chat notifications are disabled");
    }

    let connector = config
        .sheets
        .clone()
        .map(|sheets| google_connector(sheets, timeout));

    let app_state = AppState::new(config, connector, webhook);

    tokio::spawn(initialize_sheet(app_state.clone()));

    match telegram_token {
        Some(token) => {
            let client = TelegramClient::new(&token).context("building telegram client")?;
            tokio::spawn(bot::run(app_state.clone(), client));
        }
        None => warn!("TELEGRAM_BOT_TOKEN not set; chat bot is disabled"),
    }

    let app = build_router(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    let service = app.into_make_service();
    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

/// Connect to the spreadsheet and repair its header row before the first submission.
async fn initialize_sheet(state: SharedState) {
    if state.recorder().initialize_sheet().await {
        info!("spreadsheet ready");
    } else {
        warn!("spreadsheet unavailable at startup; will retry on the next submission");
    }
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: SharedState) -> Router<()> {
    routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = term.recv() => {},
                }
            }
            Err(err) => {
                warn!(error = %err, "failed to install SIGTERM handler; waiting for Ctrl+C");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
