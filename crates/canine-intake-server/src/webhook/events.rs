// SPDX-License-Identifier: Apache-2.0

use crate::store::{Document, DocumentRef, DocumentStore, StoreError};
use canine_intake_api::PaymentEventDto;
use canine_intake_model::{PaymentStatus, PAYMENT_LOOKUP_COLLECTIONS};
use serde_json::Value;
use tracing::{info, warn};

pub const EVENT_PAYMENT_SUCCEEDED: &str = "payment_intent.succeeded";
pub const EVENT_PAYMENT_FAILED: &str = "payment_intent.payment_failed";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    Updated(DocumentRef),
    NoMatchingLead,
    Ignored,
}

#[derive(Debug)]
pub enum EventError {
    MalformedObject(String),
    Store(StoreError),
}

impl std::fmt::Display for EventError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedObject(e) => write!(f, "malformed payment intent object: {e}"),
            Self::Store(e) => write!(f, "store failure: {e}"),
        }
    }
}

impl std::error::Error for EventError {}

impl From<StoreError> for EventError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Finds the lead holding `payment_intent_id` and merges `doc` into it.
///
/// Collections are searched in a fixed order and the first match wins.
pub async fn update_lead_by_payment_intent(
    store: &dyn DocumentStore,
    payment_intent_id: &str,
    doc: Document,
) -> Result<Option<DocumentRef>, StoreError> {
    for collection in PAYMENT_LOOKUP_COLLECTIONS {
        if let Some(found) = store
            .find_by_field(collection, "paymentIntentId", payment_intent_id)
            .await?
        {
            store
                .update(&found, doc.with_server_timestamp("updatedAt"))
                .await?;
            return Ok(Some(found));
        }
    }
    Ok(None)
}

pub async fn apply_event(
    store: &dyn DocumentStore,
    event: &PaymentEventDto,
) -> Result<EventOutcome, EventError> {
    let doc = match event.event_type.as_str() {
        EVENT_PAYMENT_SUCCEEDED => Document::new()
            .with("paymentStatus", PaymentStatus::Succeeded.as_str())
            .with("stripeEventId", event.id.as_str())
            .with_server_timestamp("paidAt"),
        EVENT_PAYMENT_FAILED => {
            let intent = event
                .payment_intent()
                .map_err(|e| EventError::MalformedObject(e.to_string()))?;
            let message = intent
                .last_payment_error
                .and_then(|e| e.message)
                .map_or(Value::Null, Value::String);
            Document::new()
                .with("paymentStatus", PaymentStatus::Failed.as_str())
                .with("paymentErrorMessage", message)
                .with("stripeEventId", event.id.as_str())
        }
        other => {
            info!(event_id = %event.id, event_type = other, "payment event ignored");
            return Ok(EventOutcome::Ignored);
        }
    };
    let intent = event
        .payment_intent()
        .map_err(|e| EventError::MalformedObject(e.to_string()))?;
    let updated = update_lead_by_payment_intent(store, &intent.id, doc).await?;
    match (&updated, event.event_type.as_str()) {
        (None, _) => {
            info!(event_id = %event.id, payment_intent_id = %intent.id, "no lead matches payment intent");
            Ok(EventOutcome::NoMatchingLead)
        }
        (Some(found), EVENT_PAYMENT_FAILED) => {
            warn!(
                event_id = %event.id,
                payment_intent_id = %intent.id,
                collection = %found.collection,
                lead_id = %found.id,
                "payment failed"
            );
            Ok(EventOutcome::Updated(found.clone()))
        }
        (Some(found), _) => {
            info!(
                event_id = %event.id,
                payment_intent_id = %intent.id,
                collection = %found.collection,
                lead_id = %found.id,
                "payment succeeded"
            );
            Ok(EventOutcome::Updated(found.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryStore;
    use serde_json::json;

    fn event(event_type: &str, object: Value) -> PaymentEventDto {
        serde_json::from_value(json!({
            "id": "evt_1",
            "type": event_type,
            "data": { "object": object },
        }))
        .expect("event")
    }

    #[tokio::test]
    async fn succeeded_event_marks_program_signup_paid() {
        let store = InMemoryStore::new();
        let lead = store
            .add(
                "program_signups",
                Document::new()
                    .with("paymentIntentId", "pi_9")
                    .with("paymentStatus", "requires_payment_method"),
            )
            .await
            .expect("seed");
        let outcome = apply_event(
            &store,
            &event(EVENT_PAYMENT_SUCCEEDED, json!({ "id": "pi_9" })),
        )
        .await
        .expect("apply");
        assert_eq!(outcome, EventOutcome::Updated(lead.clone()));
        let fields = store.get(&lead).await.expect("doc");
        assert_eq!(fields["paymentStatus"], "succeeded");
        assert_eq!(fields["stripeEventId"], "evt_1");
        assert!(fields.contains_key("paidAt"));
        assert!(fields.contains_key("updatedAt"));
    }

    #[tokio::test]
    async fn failed_event_without_message_stores_null() {
        let store = InMemoryStore::new();
        let lead = store
            .add(
                "bookings_in_person_evaluations",
                Document::new().with("paymentIntentId", "pi_3"),
            )
            .await
            .expect("seed");
        apply_event(&store, &event(EVENT_PAYMENT_FAILED, json!({ "id": "pi_3" })))
            .await
            .expect("apply");
        let fields = store.get(&lead).await.expect("doc");
        assert_eq!(fields["paymentStatus"], "failed");
        assert_eq!(fields["paymentErrorMessage"], Value::Null);
    }

    #[tokio::test]
    async fn unmatched_and_unknown_events_are_not_errors() {
        let store = InMemoryStore::new();
        let outcome = apply_event(
            &store,
            &event(EVENT_PAYMENT_SUCCEEDED, json!({ "id": "pi_missing" })),
        )
        .await
        .expect("apply");
        assert_eq!(outcome, EventOutcome::NoMatchingLead);
        let ignored = apply_event(&store, &event("charge.refunded", json!({})))
            .await
            .expect("apply");
        assert_eq!(ignored, EventOutcome::Ignored);
    }
}
