// SPDX-License-Identifier: Apache-2.0

use super::{Document, DocumentRef, DocumentStore, StoreError};
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::Mutex;

/// Process-local store for tests and local development.
#[derive(Default)]
pub struct InMemoryStore {
    collections: Mutex<HashMap<String, BTreeMap<String, Map<String, Value>>>>,
    pub fail_writes: AtomicBool,
    pub fail_reads: AtomicBool,
    pub write_calls: AtomicU64,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, target: &DocumentRef) -> Option<Map<String, Value>> {
        self.collections
            .lock()
            .await
            .get(&target.collection)
            .and_then(|c| c.get(&target.id))
            .cloned()
    }

    pub async fn documents(&self, collection: &str) -> Vec<(String, Map<String, Value>)> {
        self.collections
            .lock()
            .await
            .get(collection)
            .map(|c| c.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default()
    }

    fn check_write(&self) -> Result<(), StoreError> {
        self.write_calls.fetch_add(1, Ordering::Relaxed);
        if self.fail_writes.load(Ordering::Relaxed) {
            return Err(StoreError("memory store: writes disabled".to_string()));
        }
        Ok(())
    }
}

fn stamped(doc: Document) -> Map<String, Value> {
    let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    let mut fields = doc.fields;
    for key in doc.server_timestamps {
        fields.insert(key, Value::String(now.clone()));
    }
    fields
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    fn backend_tag(&self) -> &'static str {
        "memory"
    }

    async fn add(&self, collection: &str, doc: Document) -> Result<DocumentRef, StoreError> {
        self.check_write()?;
        let id = uuid::Uuid::new_v4().simple().to_string();
        self.collections
            .lock()
            .await
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), stamped(doc));
        Ok(DocumentRef {
            collection: collection.to_string(),
            id,
        })
    }

    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Option<DocumentRef>, StoreError> {
        if self.fail_reads.load(Ordering::Relaxed) {
            return Err(StoreError("memory store: reads disabled".to_string()));
        }
        let lock = self.collections.lock().await;
        let found = lock.get(collection).and_then(|docs| {
            docs.iter()
                .find(|(_, fields)| fields.get(field).and_then(Value::as_str) == Some(value))
                .map(|(id, _)| id.clone())
        });
        Ok(found.map(|id| DocumentRef {
            collection: collection.to_string(),
            id,
        }))
    }

    async fn update(&self, target: &DocumentRef, doc: Document) -> Result<(), StoreError> {
        self.check_write()?;
        let mut lock = self.collections.lock().await;
        let existing = lock
            .get_mut(&target.collection)
            .and_then(|c| c.get_mut(&target.id))
            .ok_or_else(|| {
                StoreError(format!(
                    "memory store: no document {}/{}",
                    target.collection, target.id
                ))
            })?;
        existing.extend(stamped(doc));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn add_find_update_roundtrip() {
        let store = InMemoryStore::new();
        let doc = Document::new()
            .with("paymentIntentId", "pi_1")
            .with_server_timestamp("createdAt");
        let created = store.add("leads", doc).await.expect("add");
        let found = store
            .find_by_field("leads", "paymentIntentId", "pi_1")
            .await
            .expect("find");
        assert_eq!(found.as_ref(), Some(&created));

        store
            .update(&created, Document::new().with("paymentStatus", "succeeded"))
            .await
            .expect("update");
        let fields = store.get(&created).await.expect("stored");
        assert_eq!(fields["paymentStatus"], "succeeded");
        assert!(fields["createdAt"].as_str().is_some_and(|s| s.ends_with('Z')));
    }

    #[tokio::test]
    async fn update_of_missing_document_fails() {
        let store = InMemoryStore::new();
        let missing = DocumentRef {
            collection: "leads".to_string(),
            id: "nope".to_string(),
        };
        assert!(store.update(&missing, Document::new()).await.is_err());
    }
}
