//! Access token freshness and caching.
//!
//! Payment calls need a bearer token from `/accessToken/get`. The
//! [`TokenCache`] keeps the last token and hands it out while it stays
//! fresh, refreshing at most once at a time no matter how many calls race
//! for it.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use time::OffsetDateTime;
use tokio::sync::Mutex;
use vipps_proto::AccessTokenResponse;

use crate::error::{Error, ParseError};

/// Default time before expiry at which a token stops being reused.
pub const DEFAULT_REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// A bearer token and the instant it expires.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    value: String,
    token_type: String,
    expires_at: OffsetDateTime,
}

impl AccessToken {
    /// Creates a token directly.
    #[must_use]
    pub fn new(
        value: impl Into<String>,
        token_type: impl Into<String>,
        expires_at: OffsetDateTime,
    ) -> Self {
        Self {
            value: value.into(),
            token_type: token_type.into(),
            expires_at,
        }
    }

    /// Reads a token out of an exchange response received at `now`.
    ///
    /// Expiry is taken from the relative `expires_in` when present, since it
    /// does not depend on the provider's clock, then from the absolute
    /// `expires_on`. A response with neither is treated as already expired.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::MissingField`] if the response carries no token.
    pub fn from_response(
        response: &AccessTokenResponse,
        now: OffsetDateTime,
    ) -> Result<Self, ParseError> {
        if response.access_token.is_empty() {
            return Err(ParseError::MissingField("access_token"));
        }

        let expires_at = response
            .expires_in
            .and_then(|secs| i64::try_from(secs).ok())
            .and_then(|secs| now.checked_add(time::Duration::seconds(secs)))
            .or_else(|| {
                response
                    .expires_on
                    .and_then(|epoch| OffsetDateTime::from_unix_timestamp(epoch).ok())
            })
            .unwrap_or(now);

        let token_type = if response.token_type.is_empty() {
            "Bearer".to_owned()
        } else {
            response.token_type.clone()
        };

        Ok(Self {
            value: response.access_token.clone(),
            token_type,
            expires_at,
        })
    }

    /// The raw token sent in `Authorization: Bearer ...`.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Token type as reported by the provider.
    #[must_use]
    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    /// Instant the token expires.
    #[must_use]
    pub const fn expires_at(&self) -> OffsetDateTime {
        self.expires_at
    }

    /// Whether the token is still usable at `now` with `margin` to spare.
    ///
    /// A margin too large to add to `now` counts as not fresh.
    #[must_use]
    pub fn is_fresh(&self, now: OffsetDateTime, margin: Duration) -> bool {
        time::Duration::try_from(margin)
            .ok()
            .and_then(|margin| now.checked_add(margin))
            .is_some_and(|deadline| deadline < self.expires_at)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("token_type", &self.token_type)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

/// Single-slot cache of the current [`AccessToken`].
///
/// The slot lock is held across a refresh, so concurrent callers that find
/// the token stale wait for the one refresh in flight instead of starting
/// their own.
pub struct TokenCache {
    margin: Duration,
    state: Mutex<Option<AccessToken>>,
}

impl TokenCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new(margin: Duration) -> Self {
        Self {
            margin,
            state: Mutex::new(None),
        }
    }

    /// Refresh margin in use.
    #[must_use]
    pub const fn margin(&self) -> Duration {
        self.margin
    }

    /// Returns the cached token, calling `refresh` first if it is missing or
    /// about to expire.
    ///
    /// # Errors
    ///
    /// Returns whatever `refresh` fails with. The cache is left empty.
    pub async fn get_or_refresh<F, Fut>(&self, refresh: F) -> Result<AccessToken, Error>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<AccessToken, Error>> + Send,
    {
        let mut state = self.state.lock().await;
        if let Some(token) = state.as_ref()
            && token.is_fresh(OffsetDateTime::now_utc(), self.margin)
        {
            #[cfg(feature = "telemetry")]
            tracing::trace!("Reusing cached access token");
            return Ok(token.clone());
        }

        #[cfg(feature = "telemetry")]
        tracing::debug!("Refreshing access token");

        *state = None;
        let token = refresh().await?;

        #[cfg(feature = "telemetry")]
        tracing::debug!(expires_at = %token.expires_at, "Access token refreshed");

        *state = Some(token.clone());
        drop(state);
        Ok(token)
    }

    /// Drops the cached token so the next call refreshes.
    pub async fn invalidate(&self) {
        #[cfg(feature = "telemetry")]
        tracing::debug!("Invalidating cached access token");
        self.state.lock().await.take();
    }

    /// Drops the cached token only if it is still `value`.
    ///
    /// Returns `false` when the slot already holds another token, e.g. one a
    /// concurrent caller refreshed after `value` was handed out.
    pub async fn invalidate_if_current(&self, value: &str) -> bool {
        let mut state = self.state.lock().await;
        if state.as_ref().is_some_and(|token| token.value == value) {
            #[cfg(feature = "telemetry")]
            tracing::debug!("Invalidating cached access token");
            *state = None;
            return true;
        }
        false
    }

    /// The cached token, fresh or not.
    pub async fn current(&self) -> Option<AccessToken> {
        self.state.lock().await.clone()
    }
}

impl Default for TokenCache {
    fn default() -> Self {
        Self::new(DEFAULT_REFRESH_MARGIN)
    }
}

impl fmt::Debug for TokenCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCache")
            .field("margin", &self.margin)
            .finish_non_exhaustive()
    }
}
