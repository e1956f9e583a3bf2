// SPDX-License-Identifier: Apache-2.0

use super::{CreatePaymentIntent, PaymentIntent, PaymentsClient, PaymentsError};
use crate::store::RetryPolicy;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use std::time::Duration;
use tracing::{instrument, warn};

pub const STRIPE_API_BASE: &str = "https://api.stripe.com";
const IDEMPOTENCY_KEY: &str = "idempotency-key";

pub struct StripeBackend {
    base_url: String,
    secret_key: String,
    retry: RetryPolicy,
}

impl StripeBackend {
    #[must_use]
    pub fn new(base_url: String, secret_key: String, retry: RetryPolicy) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            secret_key,
            retry,
        }
    }

    fn client(&self) -> reqwest::Client {
        reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new())
    }

    fn auth_headers(&self, idempotency_key: &str) -> Result<HeaderMap, PaymentsError> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.secret_key))
            .map_err(|e| PaymentsError(format!("invalid auth header: {e}")))?;
        headers.insert(AUTHORIZATION, bearer);
        let key = HeaderValue::from_str(idempotency_key)
            .map_err(|e| PaymentsError(format!("invalid idempotency key: {e}")))?;
        headers.insert(IDEMPOTENCY_KEY, key);
        Ok(headers)
    }
}

/// Stripe's bracket notation for nested form fields.
#[must_use]
pub fn payment_intent_form(request: &CreatePaymentIntent) -> Vec<(String, String)> {
    let mut form = vec![
        ("amount".to_string(), request.amount.to_string()),
        ("currency".to_string(), request.currency.clone()),
        (
            "automatic_payment_methods[enabled]".to_string(),
            "true".to_string(),
        ),
        ("description".to_string(), request.description.clone()),
    ];
    if let Some(email) = &request.receipt_email {
        form.push(("receipt_email".to_string(), email.clone()));
    }
    for (key, value) in &request.metadata {
        form.push((format!("metadata[{key}]"), value.clone()));
    }
    form
}

#[async_trait]
impl PaymentsClient for StripeBackend {
    fn backend_tag(&self) -> &'static str {
        "stripe"
    }

    #[instrument(name = "payments_stripe_create_intent", skip(self, request))]
    async fn create_payment_intent(
        &self,
        request: CreatePaymentIntent,
    ) -> Result<PaymentIntent, PaymentsError> {
        let url = format!("{}/v1/payment_intents", self.base_url);
        let client = self.client();
        // Same idempotency key on every attempt.
        let headers = self.auth_headers(&uuid::Uuid::new_v4().to_string())?;
        let form = payment_intent_form(&request);
        let mut attempt = 0;
        loop {
            attempt += 1;
            let req = client.post(&url).headers(headers.clone()).form(&form);
            match req.send().await {
                Ok(resp) if resp.status().is_success() => {
                    return resp
                        .json::<PaymentIntent>()
                        .await
                        .map_err(|e| PaymentsError(format!("stripe response decode failed: {e}")));
                }
                Ok(resp) => {
                    let status = resp.status();
                    if !status.is_server_error() || attempt >= self.retry.max_attempts {
                        let detail = resp.text().await.unwrap_or_default();
                        return Err(PaymentsError(format!(
                            "stripe create payment intent failed status={status}: {detail}"
                        )));
                    }
                    warn!(%status, attempt, "stripe server error, retrying");
                }
                Err(e) => {
                    if attempt >= self.retry.max_attempts {
                        return Err(PaymentsError(format!(
                            "stripe create payment intent failed: {e}"
                        )));
                    }
                }
            }
            tokio::time::sleep(self.retry.backoff(attempt)).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_uses_bracket_notation_and_skips_missing_email() {
        let request = CreatePaymentIntent::new(10_000, "cad", "Evaluation")
            .with_receipt_email("  ")
            .with_metadata("dogName", "Rex");
        let form = payment_intent_form(&request);
        assert!(form.contains(&("amount".to_string(), "10000".to_string())));
        assert!(form.contains(&(
            "automatic_payment_methods[enabled]".to_string(),
            "true".to_string()
        )));
        assert!(form.contains(&("metadata[dogName]".to_string(), "Rex".to_string())));
        assert!(!form.iter().any(|(k, _)| k == "receipt_email"));
    }
}
