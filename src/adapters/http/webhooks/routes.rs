//! Axum router configuration for webhook endpoints.

use axum::{routing::post, Router};

use super::handlers::{handle_invoice_webhook, handle_subscription_webhook, WebhookAppState};

/// Create the webhook routes.
///
/// # Routes
/// - `POST /subscriptions` - Handle subscription lifecycle events
/// - `POST /invoices` - Handle invoice updates
pub fn webhook_routes() -> Router<WebhookAppState> {
    Router::new()
        .route("/subscriptions", post(handle_subscription_webhook))
        .route("/invoices", post(handle_invoice_webhook))
}

/// Create the webhook router mounted at `/webhooks`, with state applied.
///
/// # Example
///
/// ```ignore
/// let app = Router::new()
///     .merge(webhook_router(webhook_state))
///     .route("/reports", protect(get(reports), RouteConfig::paid(), &gate));
/// ```
pub fn webhook_router(state: WebhookAppState) -> Router {
    Router::new()
        .nest("/webhooks", webhook_routes())
        .with_state(state)
}
