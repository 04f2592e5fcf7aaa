//! Stripe client holder.
//!
//! One `StripeClient` is built at startup and shared (behind an `Arc`) by the
//! webhook dispatchers. It is read-only after construction.
//!
//! # Security
//!
//! - HMAC-SHA256 signature verification with constant-time comparison
//! - Timestamp tolerance (default 5 minutes) against replayed deliveries
//! - Secrets handled via `secrecy::SecretString`
//!
//! # Configuration
//!
//! ```ignore
//! let client = Arc::new(StripeClient::from_config(&config.payment));
//! let event = client.verify_event(&body, signature, &endpoint_secret)?;
//! ```

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use super::signature::{verify_signature, SignatureHeader};
use crate::config::PaymentConfig;
use crate::domain::billing::{SignatureVerificationError, StripeEvent, Subscription};
use crate::domain::foundation::DomainError;
use crate::ports::WebhookVerifier;

/// Default maximum age for signed webhooks (5 minutes).
const DEFAULT_TOLERANCE_SECS: i64 = 300;

/// Configured Stripe client.
pub struct StripeClient {
    /// Stripe secret API key (sk_live_... or sk_test_...).
    secret_key: SecretString,

    http_client: reqwest::Client,

    /// Base URL for Stripe API (default: https://api.stripe.com).
    api_base_url: String,

    /// Maximum signature age in seconds; 0 disables the check.
    tolerance_secs: i64,
}

impl StripeClient {
    /// Create a client for the given secret key.
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: SecretString::new(secret_key.into()),
            http_client: reqwest::Client::new(),
            api_base_url: "https://api.stripe.com".to_string(),
            tolerance_secs: DEFAULT_TOLERANCE_SECS,
        }
    }

    /// Create a client from payment configuration.
    pub fn from_config(config: &PaymentConfig) -> Self {
        Self {
            secret_key: config.stripe_secret_key.clone(),
            http_client: reqwest::Client::new(),
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            tolerance_secs: config.signature_tolerance_secs,
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the signature timestamp tolerance.
    pub fn with_tolerance_secs(mut self, tolerance_secs: i64) -> Self {
        self.tolerance_secs = tolerance_secs;
        self
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    /// Verify a webhook payload and parse it into an event.
    ///
    /// # Verification Steps
    ///
    /// 1. Parse the signature header
    /// 2. Compare every v1 signature against the expected HMAC (constant-time)
    /// 3. Check the timestamp against the tolerance
    /// 4. Parse the raw payload into a `StripeEvent`
    pub fn verify_event(
        &self,
        payload: &[u8],
        signature_header: &str,
        endpoint_secret: &SecretString,
    ) -> Result<StripeEvent, SignatureVerificationError> {
        let header = SignatureHeader::parse(signature_header)?;

        verify_signature(
            payload,
            &header,
            endpoint_secret.expose_secret(),
            chrono::Utc::now().timestamp(),
            self.tolerance_secs,
        )?;

        self.parse_unverified(payload)
    }

    /// Fetch a subscription from the Stripe API.
    ///
    /// Returns `Ok(None)` when Stripe answers 404.
    pub async fn retrieve_subscription(
        &self,
        subscription_id: &str,
    ) -> Result<Option<Subscription>, DomainError> {
        let url = format!("{}/v1/subscriptions/{}", self.api_base_url, subscription_id);

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(self.secret_key.expose_secret())
            .send()
            .await
            .map_err(|e| DomainError::provider(format!("Stripe request failed: {}", e)))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            tracing::error!(
                status = %response.status(),
                subscription_id,
                "Stripe API returned an error"
            );
            return Err(DomainError::provider(format!(
                "Stripe API error: {}",
                response.status()
            ))
            .with_detail("subscription_id", subscription_id));
        }

        let subscription = response
            .json::<Subscription>()
            .await
            .map_err(|e| DomainError::provider(format!("Invalid Stripe response: {}", e)))?;
        Ok(Some(subscription))
    }
}

#[async_trait]
impl WebhookVerifier for StripeClient {
    async fn construct_event(
        &self,
        payload: &[u8],
        signature_header: &str,
        endpoint_secret: &SecretString,
    ) -> Result<StripeEvent, SignatureVerificationError> {
        self.verify_event(payload, signature_header, endpoint_secret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::stripe::generate_test_header;
    use crate::domain::billing::SubscriptionStatus;
    use crate::domain::foundation::ErrorCode;

    const TEST_SECRET: &str = "whsec_test_secret_12345";

    fn endpoint_secret() -> SecretString {
        SecretString::new(TEST_SECRET.to_string())
    }

    fn event_payload() -> String {
        serde_json::json!({
            "id": "evt_full_test",
            "type": "customer.subscription.updated",
            "created": 1704067200,
            "data": {
                "object": {"id": "sub_123", "status": "active"}
            },
            "livemode": true,
            "api_version": "2023-10-16"
        })
        .to_string()
    }

    #[test]
    fn config_sets_base_url_and_tolerance() {
        let config = PaymentConfig {
            api_base_url: "http://localhost:12111/".to_string(),
            signature_tolerance_secs: 60,
            ..PaymentConfig::new("sk_test_xxx")
        };

        let client = StripeClient::from_config(&config);

        assert_eq!(client.api_base_url(), "http://localhost:12111");
        assert_eq!(client.tolerance_secs, 60);
    }

    #[test]
    fn verify_event_valid_signature() {
        let client = StripeClient::new("sk_test_xxx");
        let payload = event_payload();
        let header =
            generate_test_header(payload.as_bytes(), TEST_SECRET, chrono::Utc::now().timestamp());

        let event = client
            .verify_event(payload.as_bytes(), &header, &endpoint_secret())
            .unwrap();

        assert_eq!(event.id, "evt_full_test");
        assert_eq!(event.event_type, "customer.subscription.updated");
        assert!(event.is_live());
    }

    #[test]
    fn verify_event_rejects_bad_header() {
        let client = StripeClient::new("sk_test_xxx");

        let result = client.verify_event(event_payload().as_bytes(), "bad_sig", &endpoint_secret());

        assert!(matches!(
            result,
            Err(SignatureVerificationError::MalformedHeader(_))
        ));
    }

    #[test]
    fn verify_event_rejects_wrong_secret() {
        let client = StripeClient::new("sk_test_xxx");
        let payload = event_payload();
        let header = generate_test_header(
            payload.as_bytes(),
            "whsec_someone_else",
            chrono::Utc::now().timestamp(),
        );

        let result = client.verify_event(payload.as_bytes(), &header, &endpoint_secret());

        assert_eq!(result.unwrap_err(), SignatureVerificationError::NoMatchingSignature);
    }

    #[test]
    fn verify_event_rejects_stale_delivery() {
        let client = StripeClient::new("sk_test_xxx");
        let payload = event_payload();
        let header = generate_test_header(
            payload.as_bytes(),
            TEST_SECRET,
            chrono::Utc::now().timestamp() - 600,
        );

        let result = client.verify_event(payload.as_bytes(), &header, &endpoint_secret());

        assert_eq!(
            result.unwrap_err(),
            SignatureVerificationError::TimestampOutOfTolerance
        );
    }

    #[test]
    fn verify_event_rejects_signed_garbage() {
        let client = StripeClient::new("sk_test_xxx");
        let payload = "not valid json";
        let header =
            generate_test_header(payload.as_bytes(), TEST_SECRET, chrono::Utc::now().timestamp());

        let result = client.verify_event(payload.as_bytes(), &header, &endpoint_secret());

        assert!(matches!(
            result,
            Err(SignatureVerificationError::InvalidPayload(_))
        ));
    }

    #[test]
    fn parse_unverified_ignores_signatures() {
        let client = StripeClient::new("sk_test_xxx");

        let event = client.parse_unverified(event_payload().as_bytes()).unwrap();

        assert_eq!(event.id, "evt_full_test");
    }

    #[test]
    fn parse_unverified_rejects_garbage() {
        let client = StripeClient::new("sk_test_xxx");

        let result = client.parse_unverified(b"{ not json");

        assert!(matches!(
            result,
            Err(SignatureVerificationError::InvalidPayload(_))
        ));
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Subscription API Tests
    // ════════════════════════════════════════════════════════════════════════════

    /// Serves `/v1/subscriptions/:id` on an ephemeral port and returns its base URL.
    async fn spawn_stripe_stub() -> String {
        use axum::{
            extract::Path,
            http::{HeaderMap, StatusCode},
            response::IntoResponse,
            routing::get,
            Json, Router,
        };

        async fn subscription(Path(id): Path<String>, headers: HeaderMap) -> axum::response::Response {
            let authorized = headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                == Some("Bearer sk_test_xxx");
            if !authorized {
                return StatusCode::UNAUTHORIZED.into_response();
            }
            match id.as_str() {
                "sub_123" => Json(serde_json::json!({
                    "id": "sub_123",
                    "object": "subscription",
                    "status": "trialing",
                    "customer": "cus_1"
                }))
                .into_response(),
                "sub_broken" => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
                _ => StatusCode::NOT_FOUND.into_response(),
            }
        }

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new().route("/v1/subscriptions/:id", get(subscription));
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/", addr)
    }

    #[tokio::test]
    async fn retrieve_subscription_returns_record() {
        let client = StripeClient::new("sk_test_xxx").with_base_url(spawn_stripe_stub().await);

        let subscription = client.retrieve_subscription("sub_123").await.unwrap().unwrap();

        assert_eq!(subscription.id, "sub_123");
        assert_eq!(subscription.status, SubscriptionStatus::Trialing);
        assert_eq!(subscription.customer.as_deref(), Some("cus_1"));
        assert_eq!(subscription.extra["object"], "subscription");
    }

    #[tokio::test]
    async fn retrieve_subscription_not_found_is_none() {
        let client = StripeClient::new("sk_test_xxx").with_base_url(spawn_stripe_stub().await);

        let subscription = client.retrieve_subscription("sub_missing").await.unwrap();

        assert!(subscription.is_none());
    }

    #[tokio::test]
    async fn retrieve_subscription_server_error_is_provider_error() {
        let client = StripeClient::new("sk_test_xxx").with_base_url(spawn_stripe_stub().await);

        let err = client.retrieve_subscription("sub_broken").await.unwrap_err();

        assert_eq!(err.code, ErrorCode::PaymentProviderError);
        assert_eq!(err.details.get("subscription_id").map(String::as_str), Some("sub_broken"));
    }

    #[tokio::test]
    async fn retrieve_subscription_sends_secret_key_as_bearer() {
        let client = StripeClient::new("sk_test_other").with_base_url(spawn_stripe_stub().await);

        let err = client.retrieve_subscription("sub_123").await.unwrap_err();

        assert_eq!(err.code, ErrorCode::PaymentProviderError);
    }

    #[tokio::test]
    async fn retrieve_subscription_unreachable_host_is_provider_error() {
        let client = StripeClient::new("sk_test_xxx").with_base_url("http://127.0.0.1:1");

        let err = client.retrieve_subscription("sub_123").await.unwrap_err();

        assert_eq!(err.code, ErrorCode::PaymentProviderError);
    }

    #[tokio::test]
    async fn construct_event_delegates_to_verify() {
        let client = StripeClient::new("sk_test_xxx");
        let verifier: &dyn WebhookVerifier = &client;
        let payload = event_payload();
        let header =
            generate_test_header(payload.as_bytes(), TEST_SECRET, chrono::Utc::now().timestamp());

        let event = verifier
            .construct_event(payload.as_bytes(), &header, &endpoint_secret())
            .await
            .unwrap();

        assert_eq!(event.id, "evt_full_test");
    }
}
