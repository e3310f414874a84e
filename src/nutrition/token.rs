//! OAuth2 client-credentials token cache.
//!
//! One cached access token is shared by every concurrent request. When it is
//! absent or inside the expiry margin, the first caller starts a refresh and
//! publishes it as a shared future; every other caller that arrives before
//! the refresh settles awaits that same future. At most one token exchange
//! runs per expiry cycle, and all waiters observe the same token or the
//! same [`ClassifiedError`].
//!
//! The state cell is a `parking_lot::Mutex` that is only held for the
//! check-and-publish step, never across an `.await`. The published future
//! always settles with a value (a panicking exchange becomes an error), and
//! a refresh abandoned by every waiter is resumed by the next caller.

use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use parking_lot::Mutex;
use serde::Deserialize;
use tokio::time::Instant;

use super::classify::{classify_response, truncate};
use super::domain::{ClassifiedError, ErrorKind};
use super::transport::{HttpRequest, HttpTransport};

/// Tokens expiring within this margin are refreshed
pub const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Client-credentials grant parameters
#[derive(Clone)]
pub struct OAuthCredentials {
    pub token_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub scope: String,
}

impl fmt::Debug for OAuthCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthCredentials")
            .field("token_url", &self.token_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[HIDDEN]")
            .field("scope", &self.scope)
            .finish()
    }
}

/// A bearer token value
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken([HIDDEN])")
    }
}

/// Token endpoint success body (`token_type` and `scope` are not needed)
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    /// Lifetime in seconds
    expires_in: u64,
}

struct TokenState {
    value: AccessToken,
    expires_at: Instant,
}

impl TokenState {
    fn is_fresh(&self, now: Instant) -> bool {
        now + EXPIRY_MARGIN < self.expires_at
    }
}

type RefreshFuture = Shared<BoxFuture<'static, Result<AccessToken, ClassifiedError>>>;

#[derive(Default)]
struct Slot {
    state: Option<TokenState>,
    inflight: Option<RefreshFuture>,
}

/// Caches an OAuth2 access token and refreshes it single-flight
pub struct TokenCache {
    credentials: Arc<OAuthCredentials>,
    transport: Arc<dyn HttpTransport>,
    slot: Arc<Mutex<Slot>>,
    timeout: Option<Duration>,
}

impl TokenCache {
    pub fn new(credentials: OAuthCredentials, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            credentials: Arc::new(credentials),
            transport,
            slot: Arc::new(Mutex::new(Slot::default())),
            timeout: None,
        }
    }

    /// Bound each token exchange
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Return the cached token, refreshing it first if needed.
    ///
    /// No retry happens here; a failed exchange is reported to every caller
    /// waiting on it, and the next call after that starts a new exchange.
    pub async fn get_valid_token(&self) -> Result<AccessToken, ClassifiedError> {
        let refresh = {
            let mut slot = self.slot.lock();
            if let Some(state) = &slot.state
                && state.is_fresh(Instant::now())
            {
                tracing::debug!("Using cached access token");
                return Ok(state.value.clone());
            }
            match slot.inflight.clone() {
                Some(refresh) => refresh,
                None => {
                    let refresh = self.start_refresh();
                    slot.inflight = Some(refresh.clone());
                    refresh
                }
            }
        };
        refresh.await
    }

    /// Drop the cached token so the next call exchanges credentials again
    pub fn invalidate(&self) {
        let mut slot = self.slot.lock();
        if slot.state.take().is_some() {
            tracing::info!("Access token invalidated");
        }
    }

    fn start_refresh(&self) -> RefreshFuture {
        let credentials = Arc::clone(&self.credentials);
        let transport = Arc::clone(&self.transport);
        let slot = Arc::clone(&self.slot);
        let timeout = self.timeout;

        async move {
            let outcome = AssertUnwindSafe(exchange(transport.as_ref(), &credentials, timeout))
                .catch_unwind()
                .await
                .unwrap_or_else(|_| {
                    tracing::error!("Token exchange panicked");
                    Err(ClassifiedError::unavailable("Token exchange failed unexpectedly"))
                });
            let mut slot = slot.lock();
            slot.inflight = None;
            let state = outcome?;
            let token = state.value.clone();
            slot.state = Some(state);
            Ok(token)
        }
        .boxed()
        .shared()
    }

    #[cfg(test)]
    pub(crate) fn seed(&self, value: &str, valid_for: Duration) {
        self.slot.lock().state = Some(TokenState {
            value: AccessToken(value.to_string()),
            expires_at: Instant::now() + valid_for,
        });
    }
}

/// Perform the client-credentials exchange
async fn exchange(
    transport: &dyn HttpTransport,
    credentials: &OAuthCredentials,
    timeout: Option<Duration>,
) -> Result<TokenState, ClassifiedError> {
    tracing::info!(
        token_url = %credentials.token_url,
        client_id = %credentials.client_id,
        "Requesting new access token"
    );

    let form = format!(
        "grant_type=client_credentials&scope={}&client_id={}&client_secret={}",
        urlencoding::encode(&credentials.scope),
        urlencoding::encode(&credentials.client_id),
        urlencoding::encode(&credentials.client_secret),
    );
    let request = HttpRequest::post(&credentials.token_url)
        .header("Content-Type", "application/x-www-form-urlencoded")
        .header("Accept", "application/json")
        .body(form)
        .timeout(timeout);

    let response = transport.send(request).await?;

    if !response.is_success() {
        let mut error = classify_response("token endpoint", response.status, &response.body);
        error.kind = ErrorKind::Auth;
        error.message = format!("Failed to get access token: {}", error.message);
        tracing::error!(status = response.status, "{}", error.message);
        return Err(error);
    }

    let body: TokenResponse = serde_json::from_str(&response.body).map_err(|e| {
        ClassifiedError::unavailable(format!("Malformed token response: {e}"))
            .with_detail(truncate(&response.body, 200))
    })?;

    tracing::info!(
        expires_in = body.expires_in,
        "Access token received"
    );
    let expires_at = Instant::now()
        .checked_add(Duration::from_secs(body.expires_in))
        .ok_or_else(|| {
            ClassifiedError::unavailable(format!(
                "Malformed token response: expires_in {} is out of range",
                body.expires_in
            ))
        })?;
    Ok(TokenState {
        value: AccessToken(body.access_token),
        expires_at,
    })
}
