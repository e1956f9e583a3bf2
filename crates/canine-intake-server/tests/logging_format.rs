use std::io;
use std::sync::{Arc, Mutex};

use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

struct BufferWriter(Arc<Mutex<Vec<u8>>>);

impl<'a> MakeWriter<'a> for SharedBuffer {
    type Writer = BufferWriter;

    fn make_writer(&'a self) -> Self::Writer {
        BufferWriter(Arc::clone(&self.0))
    }
}

impl io::Write for BufferWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut guard = self
            .0
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "lock poisoned"))?;
        guard.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn first_json_line(sink: &SharedBuffer) -> serde_json::Value {
    let bytes = sink.0.lock().expect("lock output").clone();
    let text = String::from_utf8(bytes).expect("utf8 log output");
    let line = text
        .lines()
        .find(|l| !l.trim().is_empty())
        .expect("log line");
    serde_json::from_str(line).expect("json log line")
}

#[test]
fn audit_lines_are_structured_json() {
    let sink = SharedBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(sink.clone())
        .json()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        tracing::info!(
            target: "intake_audit",
            request_id = "req-123",
            method = "POST",
            path = "/api/bookings",
            status = 200_u16,
            "audit"
        );
    });

    let parsed = first_json_line(&sink);
    assert_eq!(parsed.get("level").and_then(|v| v.as_str()), Some("INFO"));
    assert_eq!(
        parsed.get("target").and_then(|v| v.as_str()),
        Some("intake_audit")
    );
    let fields = parsed.get("fields").expect("fields object");
    assert_eq!(
        fields.get("request_id").and_then(|v| v.as_str()),
        Some("req-123")
    );
    assert_eq!(
        fields.get("path").and_then(|v| v.as_str()),
        Some("/api/bookings")
    );
}

#[tokio::test]
async fn webhook_events_log_through_the_subscriber() {
    use canine_intake_server::{Document, DocumentStore, InMemoryStore};

    let sink = SharedBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(sink.clone())
        .json()
        .with_max_level(Level::INFO)
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let store = InMemoryStore::new();
    store
        .add(
            "bookings_discovery_calls",
            Document::new().with("paymentIntentId", "pi_log"),
        )
        .await
        .expect("seed");
    let event: canine_intake_api::PaymentEventDto = serde_json::from_value(serde_json::json!({
        "id": "evt_log",
        "type": "payment_intent.succeeded",
        "data": { "object": { "id": "pi_log" } }
    }))
    .expect("event");
    canine_intake_server::webhook::apply_event(&store, &event)
        .await
        .expect("apply");

    let parsed = first_json_line(&sink);
    let fields = parsed.get("fields").expect("fields object");
    assert_eq!(
        fields.get("message").and_then(|v| v.as_str()),
        Some("payment succeeded")
    );
    assert_eq!(
        fields.get("event_id").and_then(|v| v.as_str()),
        Some("evt_log")
    );
}
