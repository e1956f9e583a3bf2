// SPDX-License-Identifier: Apache-2.0

use super::{Document, DocumentRef, DocumentStore, RetryPolicy, StoreError};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;
use serde_json::{json, Map, Value};
use std::time::Duration;
use tracing::{debug, instrument};

pub const FIRESTORE_PUBLIC_BASE_URL: &str = "https://firestore.googleapis.com/v1";

/// Emulator hosts are plain HTTP and take no credentials.
#[must_use]
pub fn firestore_base_url(emulator_host: Option<&str>) -> String {
    match emulator_host.map(str::trim).filter(|h| !h.is_empty()) {
        Some(host) => format!("http://{host}/v1"),
        None => FIRESTORE_PUBLIC_BASE_URL.to_string(),
    }
}

pub struct FirestoreBackend {
    base_url: String,
    project_id: String,
    access_token: Option<String>,
    retry: RetryPolicy,
}

impl FirestoreBackend {
    #[must_use]
    pub fn new(
        base_url: String,
        project_id: String,
        access_token: Option<String>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            project_id,
            access_token: access_token.filter(|t| !t.trim().is_empty()),
            retry,
        }
    }

    fn database_path(&self) -> String {
        format!("projects/{}/databases/(default)/documents", self.project_id)
    }

    fn commit_url(&self) -> String {
        format!("{}/{}:commit", self.base_url, self.database_path())
    }

    fn run_query_url(&self) -> String {
        format!("{}/{}:runQuery", self.base_url, self.database_path())
    }

    fn document_name(&self, collection: &str, id: &str) -> String {
        format!("{}/{collection}/{id}", self.database_path())
    }

    fn client(&self) -> reqwest::Client {
        reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new())
    }

    fn auth_headers(&self) -> Result<HeaderMap, StoreError> {
        let mut headers = HeaderMap::new();
        if let Some(token) = &self.access_token {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| StoreError(format!("invalid auth header: {e}")))?;
            headers.insert(AUTHORIZATION, value);
        }
        Ok(headers)
    }

    /// Retries transport errors, 429 and 5xx. A 409 after a retried create
    /// means an earlier attempt landed, so it is reported as success.
    #[instrument(name = "store_firestore_post_with_retry", skip(self, body))]
    async fn post_with_retry(
        &self,
        url: &str,
        body: &Value,
        conflict_after_retry_ok: bool,
    ) -> Result<Value, StoreError> {
        let client = self.client();
        let headers = self.auth_headers()?;
        let mut attempt = 0;
        loop {
            attempt += 1;
            let req = client.post(url).headers(headers.clone()).json(body);
            match req.send().await {
                Ok(resp) if resp.status().is_success() => {
                    return resp
                        .json::<Value>()
                        .await
                        .map_err(|e| StoreError(format!("firestore response decode failed: {e}")));
                }
                Ok(resp)
                    if resp.status() == StatusCode::CONFLICT
                        && conflict_after_retry_ok
                        && attempt > 1 =>
                {
                    debug!(url, attempt, "firestore create already applied");
                    return Ok(Value::Null);
                }
                Ok(resp) => {
                    let status = resp.status();
                    let retryable =
                        status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS;
                    if !retryable || attempt >= self.retry.max_attempts {
                        let detail = resp.text().await.unwrap_or_default();
                        return Err(StoreError(format!(
                            "firestore request failed status={status} url={url}: {detail}"
                        )));
                    }
                }
                Err(e) => {
                    if attempt >= self.retry.max_attempts {
                        return Err(StoreError(format!("firestore request failed url={url}: {e}")));
                    }
                }
            }
            tokio::time::sleep(self.retry.backoff(attempt)).await;
        }
    }

    fn write_body(&self, target: &DocumentRef, doc: &Document, create: bool) -> Value {
        let mut write = json!({
            "update": {
                "name": self.document_name(&target.collection, &target.id),
                "fields": encode_fields(&doc.fields),
            },
            "currentDocument": { "exists": !create },
        });
        if !create {
            let paths: Vec<&String> = doc.fields.keys().collect();
            write["updateMask"] = json!({ "fieldPaths": paths });
        }
        if !doc.server_timestamps.is_empty() {
            let transforms: Vec<Value> = doc
                .server_timestamps
                .iter()
                .map(|field| json!({ "fieldPath": field, "setToServerValue": "REQUEST_TIME" }))
                .collect();
            write["updateTransforms"] = Value::Array(transforms);
        }
        json!({ "writes": [write] })
    }
}

/// Converts plain JSON into Firestore's typed value encoding.
#[must_use]
pub fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => match (n.as_i64(), n.as_u64()) {
            (Some(i), _) => json!({ "integerValue": i.to_string() }),
            (None, Some(u)) => json!({ "integerValue": u.to_string() }),
            _ => json!({ "doubleValue": n.as_f64().unwrap_or_default() }),
        },
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => {
            let values: Vec<Value> = items.iter().map(encode_value).collect();
            json!({ "arrayValue": { "values": values } })
        }
        Value::Object(map) => json!({ "mapValue": { "fields": encode_fields(map) } }),
    }
}

fn encode_fields(fields: &Map<String, Value>) -> Value {
    Value::Object(
        fields
            .iter()
            .map(|(k, v)| (k.clone(), encode_value(v)))
            .collect(),
    )
}

fn document_id_from_query(response: &Value) -> Option<String> {
    response
        .as_array()?
        .iter()
        .find_map(|row| row.get("document")?.get("name")?.as_str())
        .and_then(|name| name.rsplit('/').next())
        .map(str::to_string)
}

#[async_trait]
impl DocumentStore for FirestoreBackend {
    fn backend_tag(&self) -> &'static str {
        "firestore"
    }

    async fn add(&self, collection: &str, doc: Document) -> Result<DocumentRef, StoreError> {
        let target = DocumentRef {
            collection: collection.to_string(),
            id: uuid::Uuid::new_v4().simple().to_string(),
        };
        let body = self.write_body(&target, &doc, true);
        self.post_with_retry(&self.commit_url(), &body, true).await?;
        Ok(target)
    }

    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Option<DocumentRef>, StoreError> {
        let body = json!({
            "structuredQuery": {
                "from": [{ "collectionId": collection }],
                "where": {
                    "fieldFilter": {
                        "field": { "fieldPath": field },
                        "op": "EQUAL",
                        "value": { "stringValue": value },
                    }
                },
                "limit": 1,
            }
        });
        let response = self.post_with_retry(&self.run_query_url(), &body, false).await?;
        Ok(document_id_from_query(&response).map(|id| DocumentRef {
            collection: collection.to_string(),
            id,
        }))
    }

    async fn update(&self, target: &DocumentRef, doc: Document) -> Result<(), StoreError> {
        let body = self.write_body(target, &doc, false);
        self.post_with_retry(&self.commit_url(), &body, false).await?;
        Ok(())
    }
}
