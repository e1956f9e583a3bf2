#![forbid(unsafe_code)]

use canine_intake_server::{
    build_router, firestore_base_url, parse_list, read_secret_file, validate_backend_contract,
    validate_startup_config_contract, ApiConfig, AppState, DocumentStore, FakePayments,
    FirestoreBackend, InMemoryStore, PaymentsClient, PaymentsSelection, RateLimitConfig,
    RetryPolicy, StoreSelection, StripeBackend, STRIPE_API_BASE,
};
use std::env;
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn env_bool(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| match v.as_str() {
            "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
            "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default)
}

fn env_f64(name: &str, default: f64) -> f64 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<f64>().ok())
        .unwrap_or(default)
}

fn env_duration_ms(name: &str, default_ms: u64) -> Duration {
    Duration::from_millis(env_u64(name, default_ms))
}

fn env_opt(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Inline value wins; otherwise `<NAME>_FILE` names a mounted secret.
fn env_secret(name: &str) -> Result<Option<String>, String> {
    if let Some(value) = env_opt(name) {
        return Ok(Some(value));
    }
    match env_opt(&format!("{name}_FILE")) {
        Some(path) => read_secret_file(&PathBuf::from(path)).map(Some),
        None => Ok(None),
    }
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = sigint.recv() => {}
                }
            }
            _ => {
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if env_bool("INTAKE_LOG_JSON", true) {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

fn api_config_from_env() -> Result<ApiConfig, String> {
    let defaults = ApiConfig::default();
    Ok(ApiConfig {
        max_body_bytes: env_usize("INTAKE_MAX_BODY_BYTES", defaults.max_body_bytes),
        request_timeout: env_duration_ms(
            "INTAKE_REQUEST_TIMEOUT_MS",
            defaults.request_timeout.as_millis() as u64,
        ),
        cors_allowed_origins: parse_list(
            &env::var("INTAKE_CORS_ALLOWED_ORIGINS").unwrap_or_default(),
        ),
        enable_audit_log: env_bool("INTAKE_ENABLE_AUDIT_LOG", defaults.enable_audit_log),
        submit_rate_limit: RateLimitConfig {
            capacity: env_f64(
                "INTAKE_SUBMIT_RATE_LIMIT_CAPACITY",
                defaults.submit_rate_limit.capacity,
            ),
            refill_per_sec: env_f64(
                "INTAKE_SUBMIT_RATE_LIMIT_REFILL_PER_SEC",
                defaults.submit_rate_limit.refill_per_sec,
            ),
        },
        stripe_webhook_secret: env_secret("STRIPE_WEBHOOK_SECRET")?,
        webhook_tolerance_secs: env_u64(
            "STRIPE_WEBHOOK_TOLERANCE_SECS",
            defaults.webhook_tolerance_secs,
        ),
    })
}

fn store_selection_from_env() -> Result<StoreSelection, String> {
    if env_opt("INTAKE_STORE").as_deref() == Some("memory") {
        return Ok(StoreSelection::Memory);
    }
    let emulator = env_opt("FIRESTORE_EMULATOR_HOST");
    let access_token = if emulator.is_some() {
        None
    } else {
        env_secret("FIRESTORE_ACCESS_TOKEN")?
    };
    Ok(StoreSelection::Firestore {
        project_id: env_opt("FIREBASE_PROJECT_ID").unwrap_or_default(),
        base_url: env_opt("FIRESTORE_BASE_URL")
            .unwrap_or_else(|| firestore_base_url(emulator.as_deref())),
        access_token,
    })
}

fn payments_selection_from_env() -> Result<PaymentsSelection, String> {
    if env_opt("INTAKE_PAYMENTS").as_deref() == Some("fake") {
        return Ok(PaymentsSelection::Fake);
    }
    Ok(PaymentsSelection::Stripe {
        secret_key: env_secret("STRIPE_SECRET_KEY")?.unwrap_or_default(),
        api_base: env_opt("STRIPE_API_BASE").unwrap_or_else(|| STRIPE_API_BASE.to_string()),
    })
}

fn retry_policy_from_env() -> RetryPolicy {
    let defaults = RetryPolicy::default();
    RetryPolicy {
        max_attempts: env_usize("INTAKE_UPSTREAM_MAX_ATTEMPTS", defaults.max_attempts).max(1),
        base_backoff_ms: env_u64("INTAKE_UPSTREAM_BACKOFF_MS", defaults.base_backoff_ms),
    }
}

#[tokio::main]
async fn main() -> Result<(), String> {
    init_tracing();

    let bind_addr = env::var("INTAKE_BIND").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let api = api_config_from_env()?;
    validate_startup_config_contract(&api)?;
    let store_selection = store_selection_from_env()?;
    let payments_selection = payments_selection_from_env()?;
    validate_backend_contract(&store_selection, &payments_selection)?;
    let retry = retry_policy_from_env();

    let store: Arc<dyn DocumentStore> = match store_selection {
        StoreSelection::Memory => Arc::new(InMemoryStore::new()),
        StoreSelection::Firestore {
            project_id,
            base_url,
            access_token,
        } => Arc::new(FirestoreBackend::new(
            base_url,
            project_id,
            access_token,
            retry.clone(),
        )),
    };
    let payments: Arc<dyn PaymentsClient> = match payments_selection {
        PaymentsSelection::Fake => Arc::new(FakePayments::new()),
        PaymentsSelection::Stripe {
            secret_key,
            api_base,
        } => Arc::new(StripeBackend::new(api_base, secret_key, retry)),
    };
    info!(
        store = store.backend_tag(),
        payments = payments.backend_tag(),
        webhook_enabled = api.webhook_secret().is_some(),
        "backends configured"
    );

    let state = AppState::with_config(store, payments, api);
    state.ready.store(false, Ordering::Relaxed);
    let app = build_router(state.clone());

    let addr: std::net::SocketAddr = bind_addr
        .parse()
        .map_err(|e| format!("invalid bind addr {bind_addr}: {e}"))?;
    let socket = if addr.is_ipv4() {
        tokio::net::TcpSocket::new_v4().map_err(|e| format!("socket v4 failed: {e}"))?
    } else {
        tokio::net::TcpSocket::new_v6().map_err(|e| format!("socket v6 failed: {e}"))?
    };
    socket
        .set_reuseaddr(true)
        .map_err(|e| format!("set_reuseaddr failed: {e}"))?;
    socket.bind(addr).map_err(|e| format!("bind failed: {e}"))?;
    let listener: TcpListener = socket
        .listen(1024)
        .map_err(|e| format!("listen failed: {e}"))?;
    state.ready.store(true, Ordering::Relaxed);
    info!("canine-intake-server listening on {bind_addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            wait_for_shutdown_signal().await;
            info!("shutdown signal received, draining");
            state.begin_shutdown();
            let drain_ms = env_u64("INTAKE_SHUTDOWN_DRAIN_MS", 2000);
            tokio::time::sleep(Duration::from_millis(drain_ms)).await;
        })
        .await
        .map_err(|e| format!("server failed: {e}"))
}
