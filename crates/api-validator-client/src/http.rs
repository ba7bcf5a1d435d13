// crates/api-validator-client/src/http.rs
// ============================================================================
// Module: HTTP Accounts Client
// Description: reqwest-backed implementation of the accounts capability.
// Purpose: Issue list/detail requests and classify every failure mode.
// Dependencies: reqwest, serde_json, url, api-validator-core
// ============================================================================

//! ## Overview
//! Endpoints resolve as `{base}/accounts` and `{base}/accounts/{id}`, with
//! `balances=true` appended only when requested. Non-success statuses decode
//! the JSON error body when possible and keep a bounded raw preview
//! otherwise. Redirects are not followed and requests are never retried.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::time::Duration;

use api_validator_config::ServerConfig;
use api_validator_core::Account;
use api_validator_core::AccountId;
use api_validator_core::AccountsClient;
use api_validator_core::AccountsListing;
use api_validator_core::ClientError;
use api_validator_core::ErrorBody;
use api_validator_core::GetAccountDetailsOptions;
use api_validator_core::GetAccountsOptions;
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::ACCEPT;
use reqwest::header::AUTHORIZATION;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderName;
use reqwest::header::HeaderValue;
use reqwest::redirect::Policy;
use serde::de::DeserializeOwned;
use url::Url;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum number of characters kept from an undecodable error body.
pub const MAX_ERROR_PREVIEW_CHARS: usize = 512;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// HTTP client configuration.
///
/// # Invariants
/// - `base_url` is an absolute http(s) URL without query or fragment.
#[derive(Clone)]
pub struct HttpClientConfig {
    /// Base URL the accounts endpoints are resolved against.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Maximum accepted response body size in bytes.
    pub max_response_bytes: usize,
    /// Optional bearer token.
    pub bearer_token: Option<String>,
    /// Static headers sent on every request.
    pub headers: Vec<(String, String)>,
}

impl HttpClientConfig {
    /// Builds a configuration with defaults for everything but the base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let defaults = ServerConfig::default();
        Self {
            base_url: base_url.into(),
            timeout: defaults.timeout(),
            max_response_bytes: defaults.max_response_bytes,
            bearer_token: None,
            headers: Vec::new(),
        }
    }
}

impl From<&ServerConfig> for HttpClientConfig {
    fn from(config: &ServerConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            timeout: config.timeout(),
            max_response_bytes: config.max_response_bytes,
            bearer_token: config.bearer_token.clone(),
            headers: config
                .headers
                .iter()
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect(),
        }
    }
}

impl fmt::Debug for HttpClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClientConfig")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("max_response_bytes", &self.max_response_bytes)
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| "<redacted>"))
            .field("headers", &self.headers.iter().map(|(name, _)| name).collect::<Vec<_>>())
            .finish()
    }
}

// ============================================================================
// SECTION: Client
// ============================================================================

/// Accounts client speaking HTTP to the implementation under test.
pub struct HttpAccountsClient {
    /// Reqwest client instance.
    client: Client,
    /// Parsed base URL.
    base_url: Url,
    /// Headers attached to every request.
    headers: HeaderMap,
    /// Maximum accepted response body size in bytes.
    max_response_bytes: usize,
}

impl HttpAccountsClient {
    /// Builds a new HTTP accounts client.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidRequest`] when the base URL or a header is
    /// invalid, or [`ClientError::Transport`] when the HTTP client cannot be
    /// constructed.
    pub fn new(config: HttpClientConfig) -> Result<Self, ClientError> {
        let base_url = Url::parse(config.base_url.trim())
            .map_err(|err| ClientError::InvalidRequest(format!("invalid base url: {err}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidRequest(
                "base url cannot carry path segments".to_string(),
            ));
        }
        let headers = build_headers(config.bearer_token.as_deref(), &config.headers)?;
        let client = Client::builder()
            .timeout(config.timeout)
            .redirect(Policy::none())
            .build()
            .map_err(|err| ClientError::Transport(err.to_string()))?;
        Ok(Self {
            client,
            base_url,
            headers,
            max_response_bytes: config.max_response_bytes,
        })
    }

    /// Builds a client from validated server configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the client cannot be constructed.
    pub fn from_config(config: &ServerConfig) -> Result<Self, ClientError> {
        Self::new(HttpClientConfig::from(config))
    }

    /// Returns the base URL requests are resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves the list endpoint URL.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidRequest`] when the URL cannot be built.
    pub fn accounts_url(&self, options: GetAccountsOptions) -> Result<Url, ClientError> {
        self.endpoint(&["accounts"], options.balances)
    }

    /// Resolves the detail endpoint URL; the identifier is percent-encoded.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidRequest`] when the URL cannot be built.
    pub fn account_details_url(
        &self,
        account_id: &AccountId,
        balances: bool,
    ) -> Result<Url, ClientError> {
        if account_id.as_str().is_empty() {
            return Err(ClientError::InvalidRequest("account id must be non-empty".to_string()));
        }
        self.endpoint(&["accounts", account_id.as_str()], balances)
    }

    /// Appends path segments and the optional balances flag to the base URL.
    fn endpoint(&self, segments: &[&str], balances: bool) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url.path_segments_mut().map_err(|()| {
                ClientError::InvalidRequest("base url cannot carry path segments".to_string())
            })?;
            path.pop_if_empty();
            path.extend(segments);
        }
        if balances {
            url.query_pairs_mut().append_pair("balances", "true");
        }
        Ok(url)
    }

    /// Issues a GET request and decodes the success payload.
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ClientError> {
        let response = self
            .client
            .get(url)
            .headers(self.headers.clone())
            .send()
            .await
            .map_err(|err| ClientError::Transport(err.to_string()))?;
        let status = response.status();
        let body = read_response_body_with_limit(response, self.max_response_bytes).await?;
        if !status.is_success() {
            return Err(service_error(status.as_u16(), &body));
        }
        serde_json::from_slice(&body).map_err(|err| ClientError::Decode(err.to_string()))
    }
}

#[async_trait]
impl AccountsClient for HttpAccountsClient {
    async fn get_accounts(
        &self,
        options: GetAccountsOptions,
    ) -> Result<AccountsListing, ClientError> {
        let url = self.accounts_url(options)?;
        self.get_json(url).await
    }

    async fn get_account_details(
        &self,
        options: GetAccountDetailsOptions,
    ) -> Result<Account, ClientError> {
        let url = self.account_details_url(&options.account_id, options.balances)?;
        self.get_json(url).await
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds the static header map attached to every request.
fn build_headers(
    bearer_token: Option<&str>,
    extra: &[(String, String)],
) -> Result<HeaderMap, ClientError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    if let Some(token) = bearer_token {
        let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| ClientError::InvalidRequest("invalid bearer token".to_string()))?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }
    for (name, value) in extra {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| ClientError::InvalidRequest(format!("invalid header name: {name}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|_| ClientError::InvalidRequest(format!("invalid value for {name}")))?;
        headers.insert(name, value);
    }
    Ok(headers)
}

/// Reads a response body while enforcing a hard size limit.
async fn read_response_body_with_limit(
    mut response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, ClientError> {
    let mut body = Vec::new();
    let mut total: usize = 0;
    while let Some(chunk) =
        response.chunk().await.map_err(|err| ClientError::Transport(err.to_string()))?
    {
        let next_total = total.checked_add(chunk.len()).ok_or(ClientError::ResponseTooLarge {
            actual: usize::MAX,
            limit,
        })?;
        if next_total > limit {
            return Err(ClientError::ResponseTooLarge {
                actual: next_total,
                limit,
            });
        }
        body.extend_from_slice(&chunk);
        total = next_total;
    }
    Ok(body)
}

/// Classifies a non-success response body.
pub(crate) fn service_error(status: u16, body: &[u8]) -> ClientError {
    match serde_json::from_slice::<ErrorBody>(body) {
        Ok(decoded) => ClientError::service(status, decoded),
        Err(_) => {
            let preview: String =
                String::from_utf8_lossy(body).chars().take(MAX_ERROR_PREVIEW_CHARS).collect();
            ClientError::Service {
                status,
                body: None,
                raw: Some(preview),
            }
        }
    }
}
