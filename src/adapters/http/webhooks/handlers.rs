//! HTTP handlers for Stripe webhook deliveries.
//!
//! Handlers hand the raw body to the channel's dispatcher untouched; the
//! signature covers the exact bytes received.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};

use crate::domain::billing::{
    InvoiceChannel, SubscriptionChannel, WebhookChannel, WebhookDispatcher, WebhookError,
};

/// Header Stripe signs deliveries with.
const SIGNATURE_HEADER: &str = "stripe-signature";

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for webhook handlers.
#[derive(Clone)]
pub struct WebhookAppState {
    pub subscriptions: Arc<WebhookDispatcher<SubscriptionChannel>>,
    pub invoices: Arc<WebhookDispatcher<InvoiceChannel>>,
}

impl WebhookAppState {
    pub fn new(
        subscriptions: WebhookDispatcher<SubscriptionChannel>,
        invoices: WebhookDispatcher<InvoiceChannel>,
    ) -> Self {
        Self {
            subscriptions: Arc::new(subscriptions),
            invoices: Arc::new(invoices),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /webhooks/subscriptions - Handle subscription lifecycle events
pub async fn handle_subscription_webhook(
    State(state): State<WebhookAppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    dispatch(&state.subscriptions, &headers, &body).await
}

/// POST /webhooks/invoices - Handle invoice update events
pub async fn handle_invoice_webhook(
    State(state): State<WebhookAppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    dispatch(&state.invoices, &headers, &body).await
}

async fn dispatch<C: WebhookChannel>(
    dispatcher: &WebhookDispatcher<C>,
    headers: &HeaderMap,
    body: &[u8],
) -> Response {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok());

    match dispatcher.dispatch(body, signature).await {
        Ok(_) => StatusCode::OK.into_response(),
        Err(err) => WebhookApiError(err).into_response(),
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// Converts dispatch failures to bare status responses.
///
/// Stripe only reads the status code, so no body is sent.
struct WebhookApiError(WebhookError);

impl IntoResponse for WebhookApiError {
    fn into_response(self) -> Response {
        if let WebhookError::Collaborator(err) = &self.0 {
            tracing::error!(error = %err, "Webhook processing failed");
        }
        self.0.status_code().into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::billing::SignatureVerificationError;
    use crate::domain::foundation::DomainError;

    #[test]
    fn verification_error_maps_to_400() {
        let response =
            WebhookApiError(SignatureVerificationError::NoMatchingSignature.into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn collaborator_error_maps_to_500() {
        let response =
            WebhookApiError(DomainError::database("connection lost").into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
