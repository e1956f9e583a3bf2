// SPDX-License-Identifier: Apache-2.0

use super::{CreatePaymentIntent, PaymentIntent, PaymentsClient, PaymentsError};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::Mutex;

/// Deterministic in-process payments provider.
#[derive(Default)]
pub struct FakePayments {
    pub requests: Mutex<Vec<CreatePaymentIntent>>,
    pub fail: AtomicBool,
    next_id: AtomicU64,
}

impl FakePayments {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn recorded(&self) -> Vec<CreatePaymentIntent> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl PaymentsClient for FakePayments {
    fn backend_tag(&self) -> &'static str {
        "fake"
    }

    async fn create_payment_intent(
        &self,
        request: CreatePaymentIntent,
    ) -> Result<PaymentIntent, PaymentsError> {
        if self.fail.load(Ordering::Relaxed) {
            return Err(PaymentsError("fake payments: provider unavailable".to_string()));
        }
        let n = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let intent = PaymentIntent {
            id: format!("pi_fake_{n}"),
            client_secret: Some(format!("pi_fake_{n}_secret")),
            amount: request.amount,
            currency: request.currency.clone(),
            status: "requires_payment_method".to_string(),
        };
        self.requests.lock().await.push(request);
        Ok(intent)
    }
}
