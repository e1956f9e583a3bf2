// SPDX-License-Identifier: Apache-2.0

use crate::webhook::DEFAULT_TOLERANCE_SECS;
use std::path::Path;
use std::time::Duration;

pub const CONFIG_SCHEMA_VERSION: &str = "1";

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub capacity: f64,
    pub refill_per_sec: f64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            capacity: 10.0,
            refill_per_sec: 0.5,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub max_body_bytes: usize,
    pub request_timeout: Duration,
    pub cors_allowed_origins: Vec<String>,
    pub enable_audit_log: bool,
    pub submit_rate_limit: RateLimitConfig,
    pub stripe_webhook_secret: Option<String>,
    pub webhook_tolerance_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 64 * 1024,
            request_timeout: Duration::from_secs(10),
            cors_allowed_origins: Vec::new(),
            enable_audit_log: false,
            submit_rate_limit: RateLimitConfig::default(),
            stripe_webhook_secret: None,
            webhook_tolerance_secs: DEFAULT_TOLERANCE_SECS,
        }
    }
}

impl ApiConfig {
    /// Webhook secret when one is configured and non-blank.
    #[must_use]
    pub fn webhook_secret(&self) -> Option<&str> {
        self.stripe_webhook_secret
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    #[must_use]
    pub fn origin_allowed(&self, origin: &str) -> bool {
        self.cors_allowed_origins
            .iter()
            .any(|o| o == "*" || o == origin)
    }
}

/// Which payments provider the binary talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentsSelection {
    Stripe { secret_key: String, api_base: String },
    Fake,
}

/// Which document store the binary writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreSelection {
    Firestore {
        project_id: String,
        base_url: String,
        access_token: Option<String>,
    },
    Memory,
}

pub fn validate_startup_config_contract(api: &ApiConfig) -> Result<(), String> {
    if api.max_body_bytes == 0 {
        return Err("max body bytes must be > 0".to_string());
    }
    if api.request_timeout.is_zero() {
        return Err("request timeout must be > 0".to_string());
    }
    let rl = &api.submit_rate_limit;
    if rl.capacity < 1.0 || !rl.refill_per_sec.is_finite() || rl.refill_per_sec <= 0.0 {
        return Err("submit rate limit requires capacity >= 1 and refill > 0".to_string());
    }
    if api.cors_allowed_origins.iter().any(|o| o.trim().is_empty()) {
        return Err("cors allowed origins must not contain blank entries".to_string());
    }
    if api.stripe_webhook_secret.is_some() && api.webhook_secret().is_none() {
        return Err("stripe webhook secret is set but blank".to_string());
    }
    Ok(())
}

pub fn validate_backend_contract(
    store: &StoreSelection,
    payments: &PaymentsSelection,
) -> Result<(), String> {
    if let StoreSelection::Firestore { project_id, .. } = store {
        if project_id.trim().is_empty() {
            return Err("firestore store requires FIREBASE_PROJECT_ID".to_string());
        }
    }
    if let PaymentsSelection::Stripe { secret_key, .. } = payments {
        if secret_key.trim().is_empty() {
            return Err("stripe payments require STRIPE_SECRET_KEY".to_string());
        }
    }
    Ok(())
}

/// Reads a credential mounted as a file; surrounding whitespace is dropped.
pub fn read_secret_file(path: &Path) -> Result<String, String> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| format!("read secret file {} failed: {e}", path.display()))?;
    let secret = raw.trim().to_string();
    if secret.is_empty() {
        return Err(format!("secret file {} is empty", path.display()));
    }
    Ok(secret)
}

/// Comma separated list with blanks dropped.
#[must_use]
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_passes_startup_contract() {
        validate_startup_config_contract(&ApiConfig::default()).expect("default config");
    }

    #[test]
    fn startup_contract_rejects_zero_refill_and_blank_secret() {
        let api = ApiConfig {
            submit_rate_limit: RateLimitConfig {
                capacity: 5.0,
                refill_per_sec: 0.0,
            },
            ..ApiConfig::default()
        };
        assert!(validate_startup_config_contract(&api).is_err());

        let api = ApiConfig {
            stripe_webhook_secret: Some("  ".to_string()),
            ..ApiConfig::default()
        };
        let err = validate_startup_config_contract(&api).expect_err("blank secret");
        assert!(err.contains("webhook secret"));
    }

    #[test]
    fn backend_contract_requires_credentials() {
        let store = StoreSelection::Memory;
        let payments = PaymentsSelection::Stripe {
            secret_key: String::new(),
            api_base: "https://api.stripe.com".to_string(),
        };
        assert!(validate_backend_contract(&store, &payments).is_err());
        assert!(validate_backend_contract(&store, &PaymentsSelection::Fake).is_ok());
    }

    #[test]
    fn secret_file_is_trimmed_and_must_not_be_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("token");
        std::fs::write(&path, "ya29.token\n").expect("write");
        assert_eq!(read_secret_file(&path).as_deref(), Ok("ya29.token"));

        std::fs::write(&path, "\n").expect("write");
        assert!(read_secret_file(&path).is_err());
        assert!(read_secret_file(&dir.path().join("missing")).is_err());
    }

    #[test]
    fn origin_list_parsing_drops_blanks() {
        assert_eq!(
            parse_list("https://a.example, ,https://b.example"),
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
    }
}
