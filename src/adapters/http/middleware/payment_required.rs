//! Payment-required access gate for axum routes.
//!
//! This module provides:
//! - `AccessGate` - per-request subscription check over a `SubscriptionLookup`
//! - `payment_required_middleware` - axum middleware running the gate
//! - `protect` - wraps a route in the gate when its `RouteConfig` asks for it
//!
//! # Architecture
//!
//! ```text
//! Request → payment_required_middleware → lookup → active/trialing? → Handler
//!                                                        ↓ no
//!                                                  402 Payment Required
//! ```
//!
//! # Example
//!
//! ```ignore
//! let gate = AccessGate::new(lookup.clone());
//!
//! let app = Router::new()
//!     .route("/reports", protect(get(reports), RouteConfig::paid(), &gate))
//!     .route("/pricing", protect(get(pricing), RouteConfig::free(), &gate));
//! ```

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{request::Parts, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::MethodRouter,
    Json,
};

use crate::adapters::http::dto::ErrorResponse;
use crate::domain::billing::{evaluate_access, AccessDenied};
use crate::ports::SubscriptionLookup;

/// Per-request subscription check.
///
/// Stateless: every call asks the lookup again. Lookup failures deny access.
#[derive(Clone)]
pub struct AccessGate {
    lookup: Arc<dyn SubscriptionLookup>,
}

impl AccessGate {
    pub fn new(lookup: Arc<dyn SubscriptionLookup>) -> Self {
        Self { lookup }
    }

    /// Decide whether the caller of `request` may run a paid operation.
    pub async fn check(&self, request: &Parts) -> Result<(), AccessDenied> {
        let subscription = self.lookup.find_for_request(request).await.map_err(|e| {
            tracing::error!(error = %e, path = %request.uri.path(), "Subscription lookup failed");
            AccessDenied::LookupFailed(e.to_string())
        })?;

        evaluate_access(subscription.as_ref())
    }
}

/// Registration-time options for a route.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouteConfig {
    /// Route requires an active or trialing subscription.
    pub payment_required: bool,
}

impl RouteConfig {
    pub fn paid() -> Self {
        Self {
            payment_required: true,
        }
    }

    pub fn free() -> Self {
        Self::default()
    }
}

/// Wrap `route` in the access gate if `config.payment_required` is set.
///
/// Free routes are returned untouched. The gate is added as the outermost
/// route layer, so apply `protect` after any layers the route already has:
/// the gate then runs before them and before the handler, and those layers
/// still run on allowed requests.
pub fn protect<S>(route: MethodRouter<S>, config: RouteConfig, gate: &AccessGate) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    if !config.payment_required {
        return route;
    }
    route.route_layer(middleware::from_fn_with_state(
        gate.clone(),
        payment_required_middleware,
    ))
}

/// Middleware that rejects callers without an authorizing subscription.
///
/// On denial the request never reaches inner layers or the handler.
pub async fn payment_required_middleware(
    State(gate): State<AccessGate>,
    request: Request,
    next: Next,
) -> Response {
    let (parts, body) = request.into_parts();

    match gate.check(&parts).await {
        Ok(()) => next.run(Request::from_parts(parts, body)).await,
        Err(reason) => {
            tracing::debug!(%reason, path = %parts.uri.path(), "Payment required");
            PaymentRequired.into_response()
        }
    }
}

/// Rejection for callers without an authorizing subscription.
///
/// Deliberately carries no subscription details.
#[derive(Debug, Clone, Copy)]
pub struct PaymentRequired;

impl IntoResponse for PaymentRequired {
    fn into_response(self) -> Response {
        (
            StatusCode::PAYMENT_REQUIRED,
            Json(ErrorResponse::new("PAYMENT_REQUIRED", "Subscription required")),
        )
            .into_response()
    }
}
