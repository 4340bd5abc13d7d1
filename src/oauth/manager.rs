//! Process-wide access token cache with single-flight refresh.
//!
//! The manager hands out a bearer token for every Dropbox call. A cached
//! token is returned without any I/O while it is more than the refresh margin
//! away from expiry. Otherwise one refresh-token exchange is started and
//! published as a shared future; every caller that arrives while it runs
//! awaits that same future and sees the same result. The exchange settles the
//! cache and clears the in-flight slot under the state lock, so a failed
//! refresh is never replayed to later callers.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Duration, Utc};
use futures::future::{BoxFuture, FutureExt, Shared};

use crate::config::DropboxSettings;
use crate::error::GalleryboxError;
use crate::oauth::credentials::Credentials;
use crate::oauth::token::{exchange_refresh_token, IssuedToken};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub secret: String,
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// Whether the token may still be handed out at `now`.
    pub fn is_usable(&self, now: DateTime<Utc>, margin: Duration) -> bool {
        now + margin < self.expires_at
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RefreshPolicy {
    pub margin: Duration,
    pub default_ttl: Duration,
}

impl Default for RefreshPolicy {
    fn default() -> Self {
        Self {
            margin: Duration::seconds(60),
            default_ttl: Duration::minutes(5),
        }
    }
}

impl RefreshPolicy {
    /// Fails with `ConfigError` when a configured duration does not fit a `chrono::Duration`.
    pub fn from_settings(settings: &DropboxSettings) -> Result<Self, GalleryboxError> {
        Ok(Self {
            margin: seconds_setting("refreshMarginSecs", settings.refresh_margin_secs)?,
            default_ttl: seconds_setting("defaultTokenTtlSecs", settings.default_token_ttl_secs)?,
        })
    }

    /// A reported TTL that cannot be represented is a protocol error, never a panic.
    fn to_access_token(
        self,
        issued: IssuedToken,
        now: DateTime<Utc>,
    ) -> Result<AccessToken, GalleryboxError> {
        let ttl = match issued.expires_in {
            Some(secs) => Duration::try_seconds(secs.max(0)).ok_or_else(|| {
                GalleryboxError::ProtocolError(format!("Token expires_in out of range: {secs}"))
            })?,
            None => self.default_ttl,
        };
        let expires_at = now.checked_add_signed(ttl).ok_or_else(|| {
            GalleryboxError::ProtocolError(format!(
                "Token expiry overflows: expires_in {}s",
                ttl.num_seconds()
            ))
        })?;
        Ok(AccessToken {
            secret: issued.access_token,
            expires_at,
        })
    }
}

fn seconds_setting(field: &str, secs: u64) -> Result<Duration, GalleryboxError> {
    i64::try_from(secs)
        .ok()
        .and_then(Duration::try_seconds)
        .ok_or_else(|| GalleryboxError::ConfigError {
            path: std::path::PathBuf::from("<dropbox>"),
            detail: format!("{field} is out of range: {secs}"),
        })
}

type RefreshFuture = Shared<BoxFuture<'static, Result<AccessToken, GalleryboxError>>>;

#[derive(Default)]
struct TokenState {
    cached: Option<AccessToken>,
    in_flight: Option<RefreshFuture>,
    exchanges: u64,
}

fn lock(state: &Mutex<TokenState>) -> MutexGuard<'_, TokenState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct TokenManager {
    http: reqwest::Client,
    token_url: Arc<str>,
    credentials: Arc<Credentials>,
    policy: RefreshPolicy,
    state: Arc<Mutex<TokenState>>,
}

impl std::fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenManager")
            .field("token_url", &self.token_url)
            .field("credentials", &self.credentials)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl TokenManager {
    pub fn new(
        http: reqwest::Client,
        token_url: &str,
        credentials: Credentials,
        policy: RefreshPolicy,
    ) -> Self {
        Self {
            http,
            token_url: Arc::from(token_url),
            credentials: Arc::new(credentials),
            policy,
            state: Arc::new(Mutex::new(TokenState::default())),
        }
    }

    /// Return a bearer token, refreshing it first if needed.
    pub async fn access_token(&self) -> Result<String, GalleryboxError> {
        let refresh = {
            let mut state = lock(&self.state);
            if let Some(token) = state.cached.as_ref() {
                if token.is_usable(Utc::now(), self.policy.margin) {
                    return Ok(token.secret.clone());
                }
            }
            match state.in_flight.as_ref() {
                Some(pending) => {
                    tracing::debug!("Joining in-flight token refresh");
                    pending.clone()
                }
                None => {
                    let pending = self.start_refresh();
                    state.in_flight = Some(pending.clone());
                    pending
                }
            }
        };

        refresh.await.map(|token| token.secret)
    }

    /// Drop the cached token if it is still `secret`, e.g. after Dropbox rejected it.
    pub fn invalidate(&self, secret: &str) {
        let mut state = lock(&self.state);
        if state.cached.as_ref().is_some_and(|t| t.secret == secret) {
            tracing::debug!("Discarding rejected access token");
            state.cached = None;
        }
    }

    pub fn cached_expiry(&self) -> Option<DateTime<Utc>> {
        lock(&self.state).cached.as_ref().map(|t| t.expires_at)
    }

    /// Number of token exchanges that have settled so far.
    pub fn exchange_count(&self) -> u64 {
        lock(&self.state).exchanges
    }

    fn start_refresh(&self) -> RefreshFuture {
        let http = self.http.clone();
        let token_url = Arc::clone(&self.token_url);
        let credentials = Arc::clone(&self.credentials);
        let state = Arc::clone(&self.state);
        let policy = self.policy;

        async move {
            tracing::info!("Refreshing Dropbox access token");
            let result = exchange_refresh_token(&http, &token_url, &credentials)
                .await
                .and_then(|issued| policy.to_access_token(issued, Utc::now()));

            let mut guard = lock(&state);
            guard.exchanges += 1;
            guard.in_flight = None;
            match &result {
                Ok(token) => {
                    tracing::debug!("Access token valid until {}", token.expires_at);
                    guard.cached = Some(token.clone());
                }
                Err(e) => tracing::warn!("Access token refresh failed: {e}"),
            }
            result
        }
        .boxed()
        .shared()
    }
}
