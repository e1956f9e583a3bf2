// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::BTreeMap;

pub mod fake;
pub mod stripe;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentsError(pub String);

impl std::fmt::Display for PaymentsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for PaymentsError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePaymentIntent {
    pub amount: u64,
    pub currency: String,
    pub description: String,
    pub receipt_email: Option<String>,
    pub metadata: BTreeMap<String, String>,
}

impl CreatePaymentIntent {
    #[must_use]
    pub fn new(amount: u64, currency: &str, description: &str) -> Self {
        Self {
            amount,
            currency: currency.to_string(),
            description: description.to_string(),
            receipt_email: None,
            metadata: BTreeMap::new(),
        }
    }

    /// Blank addresses are dropped; the provider rejects them.
    #[must_use]
    pub fn with_receipt_email(mut self, email: &str) -> Self {
        let email = email.trim();
        self.receipt_email = (!email.is_empty()).then(|| email.to_string());
        self
    }

    #[must_use]
    pub fn with_metadata(mut self, key: &str, value: &str) -> Self {
        self.metadata.insert(key.to_string(), value.to_string());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    #[serde(default)]
    pub client_secret: Option<String>,
    pub amount: u64,
    pub currency: String,
    pub status: String,
}

#[async_trait]
pub trait PaymentsClient: Send + Sync + 'static {
    fn backend_tag(&self) -> &'static str;

    async fn create_payment_intent(
        &self,
        request: CreatePaymentIntent,
    ) -> Result<PaymentIntent, PaymentsError>;
}
