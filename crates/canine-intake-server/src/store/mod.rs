// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use serde_json::{Map, Value};

pub mod firestore;
pub mod memory;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError(pub String);

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for StoreError {}

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub base_backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            base_backoff_ms: 120,
        }
    }
}

impl RetryPolicy {
    /// Linear backoff: attempt `n` waits `n * base`.
    #[must_use]
    pub fn backoff(&self, attempt: usize) -> std::time::Duration {
        std::time::Duration::from_millis(self.base_backoff_ms.saturating_mul(attempt as u64))
    }
}

/// Fields to write, plus the field names the store fills with its own clock.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub fields: Map<String, Value>,
    pub server_timestamps: Vec<String>,
}

impl Document {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self {
            fields,
            server_timestamps: Vec::new(),
        }
    }

    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    #[must_use]
    pub fn with_server_timestamp(mut self, key: &str) -> Self {
        self.fields.remove(key);
        if !self.server_timestamps.iter().any(|k| k == key) {
            self.server_timestamps.push(key.to_string());
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentRef {
    pub collection: String,
    pub id: String,
}

#[async_trait]
pub trait DocumentStore: Send + Sync + 'static {
    fn backend_tag(&self) -> &'static str;

    /// Creates a document with a store-assigned id.
    async fn add(&self, collection: &str, doc: Document) -> Result<DocumentRef, StoreError>;

    /// First document whose string `field` equals `value`.
    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Option<DocumentRef>, StoreError>;

    /// Merges `doc` into an existing document.
    async fn update(&self, target: &DocumentRef, doc: Document) -> Result<(), StoreError>;
}
