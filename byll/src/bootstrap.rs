use crate::{
    config::AppConfig,
    handler::WebhookHandler,
    messenger::MessengerClient,
    webhook::{AppState, router},
};
use axum::Router;
use byll_application::MessageProcessor;
use byll_infrastructure::{ByllCommandParser, InMemoryLedgerStore};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

/// Wires the store, processor and Messenger client into the HTTP router
pub struct AppBuilder;

impl AppBuilder {
    pub fn build(config: &AppConfig) -> Router {
        // Ledgers live as long as the process.
        let store: &'static InMemoryLedgerStore = Box::leak(Box::new(InMemoryLedgerStore::new()));
        let processor = MessageProcessor::new(&ByllCommandParser, store);
        let notifier = MessengerClient::new(
            config.send_api_url.as_str(),
            config.page_access_token.as_str(),
        );

        router(Arc::new(AppState {
            handler: WebhookHandler::new(processor, notifier),
            app_secret: config.app_secret.clone(),
            validation_token: config.validation_token.clone(),
        }))
    }
}

/// Initialize logging and tracing
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e:?}");
    }
}

/// Run the application with proper error handling
pub async fn run() {
    init_logging();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    let app = AppBuilder::build(&config);

    let listener = match TcpListener::bind(config.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(addr = %config.bind_addr, "Failed to bind: {e:?}");
            std::process::exit(1);
        }
    };

    tracing::info!(addr = %config.bind_addr, "Byll is listening");
    if let Err(why) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!("Server error: {why:?}");
    }
}
