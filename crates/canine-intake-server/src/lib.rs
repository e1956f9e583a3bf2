#![forbid(unsafe_code)]
//! HTTP service for the canine intake funnel.
//!
//! Persists booking and program-signup leads, creates payment intents and
//! applies signed payment webhooks to stored leads.

use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::Router;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

pub mod config;
mod http;
mod middleware;
pub mod payments;
mod rate_limiter;
pub mod store;
pub mod webhook;

pub use config::{
    parse_list, read_secret_file, validate_backend_contract, validate_startup_config_contract,
    ApiConfig, PaymentsSelection, RateLimitConfig, StoreSelection, CONFIG_SCHEMA_VERSION,
};
pub use payments::fake::FakePayments;
pub use payments::stripe::{StripeBackend, STRIPE_API_BASE};
pub use payments::{CreatePaymentIntent, PaymentIntent, PaymentsClient, PaymentsError};
pub use rate_limiter::RateLimiter;
pub use store::firestore::{firestore_base_url, FirestoreBackend};
pub use store::memory::InMemoryStore;
pub use store::{Document, DocumentRef, DocumentStore, RetryPolicy, StoreError};

pub const CRATE_NAME: &str = "canine-intake-server";

pub const BOOKINGS_ROUTE: &str = "/api/bookings";
pub const PAYMENT_INTENT_ROUTE: &str = "/api/stripe/create-payment-intent";
pub const PROGRAM_SIGNUPS_ROUTE: &str = "/api/program-signups";
pub const WEBHOOK_ROUTE: &str = "/api/stripe/webhook";

#[derive(Clone)]
pub struct AppState {
    pub api: ApiConfig,
    pub store: Arc<dyn DocumentStore>,
    pub payments: Arc<dyn PaymentsClient>,
    pub ready: Arc<AtomicBool>,
    pub accepting_requests: Arc<AtomicBool>,
    pub request_id_seed: Arc<AtomicU64>,
    pub(crate) submit_limiter: Arc<RateLimiter>,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>, payments: Arc<dyn PaymentsClient>) -> Self {
        Self::with_config(store, payments, ApiConfig::default())
    }

    #[must_use]
    pub fn with_config(
        store: Arc<dyn DocumentStore>,
        payments: Arc<dyn PaymentsClient>,
        api: ApiConfig,
    ) -> Self {
        Self {
            api,
            store,
            payments,
            ready: Arc::new(AtomicBool::new(true)),
            accepting_requests: Arc::new(AtomicBool::new(true)),
            request_id_seed: Arc::new(AtomicU64::new(1)),
            submit_limiter: Arc::new(RateLimiter::default()),
        }
    }

    /// Reports not-ready and refuses new writes while in-flight requests drain.
    pub fn begin_shutdown(&self) {
        self.ready.store(false, Ordering::Relaxed);
        self.accepting_requests.store(false, Ordering::Relaxed);
    }

    #[cfg(test)]
    pub(crate) fn for_tests() -> Self {
        Self::new(
            Arc::new(InMemoryStore::new()),
            Arc::new(FakePayments::new()),
        )
    }
}

pub fn build_router(state: AppState) -> Router {
    let not_allowed = http::response::method_not_allowed_handler;
    Router::new()
        .route("/healthz", get(http::health::healthz_handler))
        .route("/readyz", get(http::health::readyz_handler))
        .route("/v1/version", get(http::health::version_handler))
        .route("/v1/openapi.json", get(http::health::openapi_handler))
        .route(
            BOOKINGS_ROUTE,
            post(http::bookings::create_booking_handler).fallback(not_allowed),
        )
        .route(
            PAYMENT_INTENT_ROUTE,
            post(http::payment_intent::create_payment_intent_handler).fallback(not_allowed),
        )
        .route(
            PROGRAM_SIGNUPS_ROUTE,
            post(http::program_signups::create_program_signup_handler).fallback(not_allowed),
        )
        .route(
            WEBHOOK_ROUTE,
            post(http::webhook::stripe_webhook_handler).fallback(not_allowed),
        )
        .layer(from_fn_with_state(
            state.clone(),
            middleware::guard::submit_guard_middleware,
        ))
        .layer(from_fn_with_state(
            state.clone(),
            middleware::cors::cors_middleware,
        ))
        .layer(from_fn_with_state(
            state.clone(),
            middleware::guard::audit_middleware,
        ))
        .layer(from_fn_with_state(
            state.clone(),
            middleware::request_tracing::request_tracing_middleware,
        ))
        .layer(DefaultBodyLimit::max(state.api.max_body_bytes))
        .with_state(state)
}
