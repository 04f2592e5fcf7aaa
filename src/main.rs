//! Billing Gate server
//!
//! Serves the Stripe webhook endpoints plus a sample paid route and a sample
//! free route, backed by the in-memory subscription store.
//!
//! # Environment Variables
//!
//! - `BILLING_GATE__PAYMENT__STRIPE_SECRET_KEY`: Required Stripe secret key
//! - `BILLING_GATE__PAYMENT__SUBSCRIPTIONS_ENDPOINT_SECRET`: Optional signing secret
//! - `BILLING_GATE__PAYMENT__INVOICES_ENDPOINT_SECRET`: Optional signing secret

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use billing_gate::adapters::http::{protect, webhook_router, AccessGate, RouteConfig, WebhookAppState};
use billing_gate::adapters::{InMemorySubscriptionStore, StripeClient};
use billing_gate::config::AppConfig;
use billing_gate::domain::billing::{InvoiceChannel, SubscriptionChannel, WebhookDispatcher};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load_validated()?;

    init_tracing(&config);

    let payment = &config.payment;
    tracing::info!(
        environment = ?config.server.environment,
        test_mode = payment.is_test_mode(),
        "Starting billing gate"
    );
    let unsigned = config.unsigned_channels();
    if config.is_production() && !unsigned.is_empty() {
        tracing::warn!(channels = ?unsigned, "Running in production with unsigned webhook endpoints");
    }

    // Client first: dispatchers verify through it.
    let stripe = Arc::new(StripeClient::from_config(payment));
    let store = Arc::new(InMemorySubscriptionStore::new());

    let gate = AccessGate::new(store.clone());
    let webhooks = WebhookAppState::new(
        WebhookDispatcher::new(
            stripe.clone(),
            store.clone(),
            SubscriptionChannel::new(store.clone()),
            payment.subscriptions_secret(),
        ),
        WebhookDispatcher::new(
            stripe,
            store.clone(),
            InvoiceChannel::new(store),
            payment.invoices_secret(),
        ),
    );

    let app = Router::new()
        .route("/health", get(health))
        .route("/reports", protect(get(reports), RouteConfig::paid(), &gate))
        .route("/pricing", protect(get(pricing), RouteConfig::free(), &gate))
        .merge(webhook_router(webhooks))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(config.server.request_timeout()));

    let addr = config.server.socket_addr()?;
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.server.log_level.clone().into());

    let registry = tracing_subscriber::registry().with(filter);
    if config.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer().compact()).init();
    }
}

async fn health() -> &'static str {
    "ok"
}

async fn reports() -> &'static str {
    "paid report"
}

async fn pricing() -> &'static str {
    "pricing"
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        },
    }
}
