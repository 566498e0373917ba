//! The Daraja API client.
//!
//! [`DarajaClient`] runs every operation through the same linear pipeline:
//! validate the request, derive the security credential if the operation
//! needs one, encode the payload, obtain a bearer token, POST, then map the
//! response. Any failure aborts the call immediately; there are no retries.
//!
//! ## Response mapping
//!
//! - `200` - the body is decoded into the operation's response type; a
//!   decode failure is returned as [`DarajaError::Decode`]
//! - anything else - the body is decoded leniently into an [`ApiError`]; a
//!   `401` also evicts the rejected token from the cache
//!
//! The response body is always read to the end before mapping.

use std::sync::Arc;
use std::time::Duration;

use daraja::DarajaConfig;
use daraja::proto::{
    ApiResponse, RegisterUrlResponse, StkPushResponse, StkQueryResponse, paths,
};
use daraja::request::{
    B2cRequest, BalanceQuery, C2bSimulate, ExpressQuery, ExpressRequest, RegisterUrls,
    ReversalRequest, TransactionStatusQuery, Validate,
};
use daraja::timestamp::DarajaTimestamp;
use reqwest::header::{CACHE_CONTROL, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

#[cfg(feature = "telemetry")]
use tracing::{Span, instrument};

use crate::auth::{AuthToken, TokenCache};
use crate::constants::{DEFAULT_TIMEOUT, DEFAULT_TOKEN_CACHE_MARGIN, TOKEN_CACHE_CONTROL};
use crate::error::{ApiError, DarajaError};

/// Client for the Daraja API.
///
/// Cheap to clone; clones share the HTTP connection pool and the token
/// cache.
///
/// # Example
///
/// ```rust,no_run
/// use daraja::request::B2cRequest;
/// use daraja::{DarajaConfig, Environment};
/// use daraja_http::DarajaClient;
///
/// # async fn run() -> Result<(), daraja_http::DarajaError> {
/// # let certificate: Vec<u8> = Vec::new();
/// let config = DarajaConfig::new("key", "secret", Environment::Sandbox)
///     .with_certificate(certificate);
/// let client = DarajaClient::new(config)?;
/// let response = client
///     .b2c(B2cRequest {
///         initiator_name: "testapi".into(),
///         initiator_password: "Safaricom999!*!".into(),
///         short_code: "600981".into(),
///         phone_number: "0712345678".into(),
///         amount: 100,
///         result_url: "https://example.com/b2c/result".into(),
///         ..Default::default()
///     })
///     .await?;
/// println!("{}", response.conversation_id);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct DarajaClient {
    config: DarajaConfig,
    /// Gateway base URL, without a trailing slash.
    base_url: String,
    client: Client,
    /// Applied to every request, including the token request.
    timeout: Duration,
    /// `None` fetches a token for every request.
    token_cache: Option<Arc<TokenCache>>,
}

impl DarajaClient {
    /// Creates a client for the configured environment.
    ///
    /// # Errors
    ///
    /// Returns [`DarajaError::Config`] if the configuration is invalid.
    pub fn new(config: DarajaConfig) -> Result<Self, DarajaError> {
        config.validate()?;
        Ok(Self {
            base_url: config.base_url().to_owned(),
            config,
            client: Client::new(),
            timeout: DEFAULT_TIMEOUT,
            token_cache: Some(Arc::new(TokenCache::new(DEFAULT_TOKEN_CACHE_MARGIN))),
        })
    }

    /// Creates a client from the `DARAJA_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`DarajaError::Config`] if a variable is missing or invalid.
    pub fn from_env() -> Result<Self, DarajaError> {
        Self::new(DarajaConfig::from_env()?)
    }

    /// Sends requests to `base_url` instead of the environment's gateway.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.base_url = base_url.trim_end_matches('/').to_owned();
        self
    }

    /// Sets the timeout for all future requests.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Uses a preconfigured `reqwest` client.
    #[must_use]
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Sets how long before expiry a cached token is refreshed.
    ///
    /// Starts a new cache, no longer shared with clones made before this
    /// call. Default is 60 seconds. Use [`Self::without_token_cache()`] to
    /// fetch a token for every request.
    #[must_use]
    pub fn with_token_cache_margin(mut self, margin: Duration) -> Self {
        self.token_cache = Some(Arc::new(TokenCache::new(margin)));
        self
    }

    /// Disables token caching.
    #[must_use]
    pub fn without_token_cache(mut self) -> Self {
        self.token_cache = None;
        self
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &DarajaConfig {
        &self.config
    }

    /// Returns the base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the token cache, if caching is enabled.
    #[must_use]
    pub fn token_cache(&self) -> Option<&TokenCache> {
        self.token_cache.as_deref()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Fetches a new access token, bypassing the cache.
    ///
    /// # Errors
    ///
    /// Returns [`DarajaError::Api`] on a non-200 status,
    /// [`DarajaError::Decode`] on a malformed body and
    /// [`DarajaError::MissingAccessToken`] if the token is empty.
    #[cfg_attr(
        feature = "telemetry",
        instrument(name = "daraja.auth_token", skip_all, err)
    )]
    pub async fn auth_token(&self) -> Result<AuthToken, DarajaError> {
        let context = "GET token";
        let response = self
            .client
            .get(self.url(paths::TOKEN))
            .basic_auth(
                self.config.consumer_key(),
                Some(self.config.consumer_secret()),
            )
            .header(CACHE_CONTROL, TOKEN_CACHE_CONTROL)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|source| DarajaError::Transport { context, source })?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|source| DarajaError::Transport { context, source })?;
        if status != StatusCode::OK {
            return Err(ApiError::from_response(status, &body).into());
        }
        let token: AuthToken = serde_json::from_slice(&body)?;
        if token.access_token.is_empty() {
            return Err(DarajaError::MissingAccessToken);
        }
        Ok(token)
    }

    async fn bearer_token(&self) -> Result<String, DarajaError> {
        let token = match &self.token_cache {
            Some(cache) => cache.get_or_fetch(|| self.auth_token()).await?,
            None => self.auth_token().await?,
        };
        Ok(token.access_token)
    }

    /// Encodes `payload`, POSTs it with a bearer token and maps the response.
    ///
    /// `context` is a human-readable identifier used in tracing and error
    /// messages (e.g. `"POST b2c"`).
    async fn post_json<T, R>(
        &self,
        path: &str,
        context: &'static str,
        payload: &T,
    ) -> Result<R, DarajaError>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let body = serde_json::to_vec(payload).map_err(DarajaError::Encode)?;
        let url = self.url(path);
        let token = self.bearer_token().await?;
        let response = self
            .client
            .post(url)
            .bearer_auth(&token)
            .header(CONTENT_TYPE, "application/json")
            .timeout(self.timeout)
            .body(body)
            .send()
            .await
            .map_err(|source| DarajaError::Transport { context, source })?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|source| DarajaError::Transport { context, source })?;

        if status == StatusCode::UNAUTHORIZED
            && let Some(cache) = &self.token_cache
        {
            cache.invalidate(&token).await;
        }

        let result = if status == StatusCode::OK {
            serde_json::from_slice(&bytes).map_err(DarajaError::from)
        } else {
            Err(ApiError::from_response(status, &bytes).into())
        };

        record_result_on_span(&result);

        result
    }

    /// Prompts a subscriber to pay (Lipa Na M-Pesa Online).
    ///
    /// # Errors
    ///
    /// Returns [`DarajaError`] if validation, transport or the gateway fails.
    #[cfg_attr(
        feature = "telemetry",
        instrument(name = "daraja.stk_push", skip_all, err)
    )]
    pub async fn stk_push(&self, request: ExpressRequest) -> Result<StkPushResponse, DarajaError> {
        let payload = request.into_payload(&DarajaTimestamp::now())?;
        self.post_json(paths::STK_PUSH, "POST stk push", &payload)
            .await
    }

    /// Queries the outcome of a push payment.
    ///
    /// # Errors
    ///
    /// Returns [`DarajaError`] if validation, transport or the gateway fails.
    #[cfg_attr(
        feature = "telemetry",
        instrument(name = "daraja.stk_push_query", skip_all, err)
    )]
    pub async fn stk_push_query(
        &self,
        query: ExpressQuery,
    ) -> Result<StkQueryResponse, DarajaError> {
        let payload = query.into_payload(&DarajaTimestamp::now())?;
        self.post_json(paths::STK_QUERY, "POST stk push query", &payload)
            .await
    }

    /// Pays a subscriber from a short code.
    ///
    /// # Errors
    ///
    /// Returns [`DarajaError`] if validation, credential derivation,
    /// transport or the gateway fails.
    #[cfg_attr(
        feature = "telemetry",
        instrument(name = "daraja.b2c", skip_all, err)
    )]
    pub async fn b2c(&self, mut request: B2cRequest) -> Result<ApiResponse, DarajaError> {
        request.validate()?;
        let credential = self
            .config
            .security_credential(&request.initiator_password)?;
        let payload = request.into_payload(credential)?;
        self.post_json(paths::B2C, "POST b2c", &payload).await
    }

    /// Requests the balance of a short code.
    ///
    /// # Errors
    ///
    /// Returns [`DarajaError`] if validation, credential derivation,
    /// transport or the gateway fails.
    #[cfg_attr(
        feature = "telemetry",
        instrument(name = "daraja.balance_query", skip_all, err)
    )]
    pub async fn balance_query(&self, mut query: BalanceQuery) -> Result<ApiResponse, DarajaError> {
        query.validate()?;
        let credential = self.config.security_credential(&query.initiator_password)?;
        let payload = query.into_payload(credential)?;
        self.post_json(paths::BALANCE, "POST account balance", &payload)
            .await
    }

    /// Looks up the status of a transaction.
    ///
    /// # Errors
    ///
    /// Returns [`DarajaError`] if validation, credential derivation,
    /// transport or the gateway fails.
    #[cfg_attr(
        feature = "telemetry",
        instrument(name = "daraja.transaction_status", skip_all, err)
    )]
    pub async fn transaction_status(
        &self,
        mut query: TransactionStatusQuery,
    ) -> Result<ApiResponse, DarajaError> {
        query.validate()?;
        let credential = self.config.security_credential(&query.initiator_password)?;
        let payload = query.into_payload(credential)?;
        self.post_json(paths::TRANSACTION_STATUS, "POST transaction status", &payload)
            .await
    }

    /// Reverses a transaction.
    ///
    /// # Errors
    ///
    /// Returns [`DarajaError`] if validation, credential derivation,
    /// transport or the gateway fails.
    #[cfg_attr(
        feature = "telemetry",
        instrument(name = "daraja.reverse", skip_all, err)
    )]
    pub async fn reverse(&self, mut request: ReversalRequest) -> Result<ApiResponse, DarajaError> {
        request.validate()?;
        let credential = self
            .config
            .security_credential(&request.initiator_password)?;
        let payload = request.into_payload(credential)?;
        self.post_json(paths::REVERSAL, "POST reversal", &payload)
            .await
    }

    /// Registers validation and confirmation URLs for a short code.
    ///
    /// # Errors
    ///
    /// Returns [`DarajaError`] if validation, transport or the gateway fails.
    #[cfg_attr(
        feature = "telemetry",
        instrument(name = "daraja.register_urls", skip_all, err)
    )]
    pub async fn register_urls(
        &self,
        request: RegisterUrls,
    ) -> Result<RegisterUrlResponse, DarajaError> {
        let payload = request.into_payload()?;
        self.post_json(paths::REGISTER_URLS, "POST register urls", &payload)
            .await
    }

    /// Simulates a customer payment (sandbox only).
    ///
    /// # Errors
    ///
    /// Returns [`DarajaError`] if validation, transport or the gateway fails.
    #[cfg_attr(
        feature = "telemetry",
        instrument(name = "daraja.c2b_simulate", skip_all, err)
    )]
    pub async fn c2b_simulate(&self, request: C2bSimulate) -> Result<ApiResponse, DarajaError> {
        let payload = request.into_payload()?;
        self.post_json(paths::C2B_SIMULATE, "POST c2b simulate", &payload)
            .await
    }
}

/// Records the outcome of a request on the current span.
#[cfg(feature = "telemetry")]
fn record_result_on_span<R>(result: &Result<R, DarajaError>) {
    let span = Span::current();
    match result {
        Ok(_) => {
            span.record("otel.status_code", "OK");
        }
        Err(err) => {
            span.record("otel.status_code", "ERROR");
            span.record("error.message", tracing::field::display(err));
            tracing::event!(tracing::Level::ERROR, error = %err, "Request to gateway failed");
        }
    }
}

/// Records the outcome of a request on the current span.
/// Noop if telemetry feature is off.
#[cfg(not(feature = "telemetry"))]
const fn record_result_on_span<R>(_result: &Result<R, DarajaError>) {}
