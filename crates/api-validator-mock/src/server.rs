// crates/api-validator-mock/src/server.rs
// ============================================================================
// Module: Mock Accounts Server
// Description: axum router, handlers, and lifecycle for the mock.
// Purpose: Serve the accounts contract over loopback HTTP.
// Dependencies: axum, tokio, api-validator-core
// ============================================================================

//! ## Overview
//! [`router`] builds the axum application. [`serve`] runs it on a caller
//! provided listener until a shutdown future resolves, which suits the CLI.
//! [`spawn`] runs it on a dedicated thread with its own runtime and returns a
//! handle that stops the server on drop, which suits tests.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::future::Future;
use std::net::SocketAddr;
use std::net::TcpListener as StdTcpListener;
use std::sync::Arc;
use std::sync::Mutex;
use std::thread;

use api_validator_core::AccountsListing;
use api_validator_core::ErrorBody;
use api_validator_core::ErrorType;
use axum::Json;
use axum::Router;
use axum::extract::Path;
use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::Uri;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::get;
use serde::Deserialize;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::runtime::Builder;
use tokio::sync::oneshot;

use crate::fixtures::MockConfig;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Request observed by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    /// Request path.
    pub path: String,
    /// Raw query string, if any.
    pub query: Option<String>,
}

/// Mock server failures.
#[derive(Debug, Error)]
pub enum MockError {
    /// Listener could not be bound.
    #[error("mock bind failed: {0}")]
    Bind(String),
    /// Server runtime failed.
    #[error("mock server failed: {0}")]
    Serve(String),
}

/// Shared handler state.
#[derive(Clone)]
struct MockState {
    /// Served configuration.
    config: Arc<MockConfig>,
    /// Requests in arrival order.
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockState {
    /// Appends a request to the log.
    fn record(&self, uri: &Uri) {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(RecordedRequest {
                path: uri.path().to_string(),
                query: uri.query().map(str::to_string),
            });
        }
    }
}

/// Query parameters accepted by both endpoints.
#[derive(Debug, Default, Deserialize)]
struct BalancesQuery {
    /// Raw `balances` flag; only `true` (any case) requests balances.
    balances: Option<String>,
}

impl BalancesQuery {
    /// Returns true when balances were requested.
    fn requested(&self) -> bool {
        self.balances.as_deref().is_some_and(|value| value.eq_ignore_ascii_case("true"))
    }
}

// ============================================================================
// SECTION: Router
// ============================================================================

/// Builds the mock application router.
pub fn router(config: MockConfig) -> Router {
    router_with_log(config, Arc::new(Mutex::new(Vec::new())))
}

/// Builds the router around an externally owned request log.
fn router_with_log(config: MockConfig, requests: Arc<Mutex<Vec<RecordedRequest>>>) -> Router {
    let state = MockState {
        config: Arc::new(config),
        requests,
    };
    Router::new()
        .route("/accounts", get(list_accounts))
        .route("/accounts/{account_id}", get(account_details))
        .with_state(state)
}

/// Handles `GET /accounts`.
async fn list_accounts(
    State(state): State<MockState>,
    uri: Uri,
    Query(query): Query<BalancesQuery>,
) -> Json<AccountsListing> {
    state.record(&uri);
    let include = state.config.faults.include_balances(query.requested());
    let accounts =
        state.config.accounts.iter().map(|account| account.render(&account.id, include)).collect();
    Json(AccountsListing {
        accounts,
    })
}

/// Handles `GET /accounts/{account_id}`.
async fn account_details(
    State(state): State<MockState>,
    uri: Uri,
    Path(account_id): Path<String>,
    Query(query): Query<BalancesQuery>,
) -> Response {
    state.record(&uri);
    let faults = &state.config.faults;
    if let Some(failure) = &faults.detail_failure {
        let status =
            StatusCode::from_u16(failure.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = ErrorBody::new(failure.error_type, failure.message.clone());
        return (status, Json(body)).into_response();
    }
    let account = state
        .config
        .find(&account_id)
        .filter(|account| !faults.hide_from_details.contains(&account.id));
    let Some(account) = account else {
        let body = ErrorBody::new(ErrorType::NotFound, format!("account {account_id} not found"));
        return (StatusCode::NOT_FOUND, Json(body)).into_response();
    };
    let id = faults.detail_id_override.as_deref().unwrap_or(&account.id);
    let include = faults.include_balances(query.requested());
    Json(account.render(id, include)).into_response()
}

// ============================================================================
// SECTION: Lifecycle
// ============================================================================

/// Serves the mock on the listener until `shutdown` resolves.
///
/// # Errors
///
/// Returns [`MockError::Serve`] when the server fails.
pub async fn serve<F>(
    listener: TcpListener,
    config: MockConfig,
    shutdown: F,
) -> Result<(), MockError>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(config))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|err| MockError::Serve(err.to_string()))
}

/// Handle for a mock running on its own thread.
pub struct MockServerHandle {
    /// Bound address.
    addr: SocketAddr,
    /// Shutdown trigger.
    shutdown: Option<oneshot::Sender<()>>,
    /// Server thread.
    join: Option<thread::JoinHandle<()>>,
    /// Requests observed by the server.
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockServerHandle {
    /// Returns the bound address.
    #[must_use]
    pub const fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Returns the base URL clients should target.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Returns the requests observed so far.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().map_or_else(|_| Vec::new(), |entries| entries.clone())
    }

    /// Stops the server and waits for its thread.
    pub fn shutdown(mut self) {
        self.stop();
    }

    /// Signals shutdown and joins the server thread.
    fn stop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

impl Drop for MockServerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Spawns the mock on `127.0.0.1:0` in a background thread.
///
/// # Errors
///
/// Returns [`MockError::Bind`] when the listener cannot be created.
pub fn spawn(config: MockConfig) -> Result<MockServerHandle, MockError> {
    spawn_on("127.0.0.1:0", config)
}

/// Spawns the mock on an explicit address in a background thread.
///
/// # Errors
///
/// Returns [`MockError::Bind`] when the listener cannot be created.
pub fn spawn_on(bind: &str, config: MockConfig) -> Result<MockServerHandle, MockError> {
    let listener =
        StdTcpListener::bind(bind).map_err(|err| MockError::Bind(format!("{bind}: {err}")))?;
    listener.set_nonblocking(true).map_err(|err| MockError::Bind(err.to_string()))?;
    let addr = listener.local_addr().map_err(|err| MockError::Bind(err.to_string()))?;

    let requests = Arc::new(Mutex::new(Vec::new()));
    let app = router_with_log(config, Arc::clone(&requests));
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let join = thread::spawn(move || {
        let Ok(runtime) = Builder::new_current_thread().enable_all().build() else {
            return;
        };
        runtime.block_on(async move {
            let Ok(listener) = TcpListener::from_std(listener) else {
                return;
            };
            let server = axum::serve(listener, app).with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            });
            let _ = server.await;
        });
    });
    Ok(MockServerHandle {
        addr,
        shutdown: Some(shutdown_tx),
        join: Some(join),
        requests,
    })
}
