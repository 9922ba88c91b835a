//! The [`Vipps`] client root.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use time::OffsetDateTime;

use crate::api::{Authorization, Payment};
use crate::config::{Credentials, Environment, VippsConfig};
use crate::error::{Error, TransportError};
use crate::http::{ReqwestTransport, Transport};
use crate::resource::{GetToken, Resource, Session, execute};
use crate::token::{AccessToken, TokenCache};

/// Entry point of the library.
///
/// Owns the credentials, the [`Transport`] and the access token cache, and
/// hands out the [`Payment`] and [`Authorization`] facades. The client is
/// `Send + Sync`; share it behind an `Arc` to use it from several tasks.
pub struct Vipps {
    credentials: Credentials,
    transport: Arc<dyn Transport>,
    tokens: TokenCache,
}

impl Vipps {
    /// Creates a client talking to `environment` over HTTPS.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] if the environment's base URL is invalid.
    pub fn try_new(credentials: Credentials, environment: Environment) -> Result<Self, Error> {
        Self::from_config(&VippsConfig::new(credentials).with_environment(environment))
    }

    /// Creates a client from a full configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] if the base URL is invalid.
    pub fn from_config(config: &VippsConfig) -> Result<Self, Error> {
        let base_url = config.base_url().map_err(TransportError::from)?;
        let mut transport = ReqwestTransport::new(base_url);
        if let Some(timeout) = config.timeout() {
            transport = transport.with_timeout(timeout);
        }
        Ok(Self::with_transport(config.credentials.clone(), transport)
            .with_token_refresh_margin(config.token_refresh_margin()))
    }

    /// Creates a client that sends every request through `transport`.
    #[must_use]
    pub fn with_transport(credentials: Credentials, transport: impl Transport + 'static) -> Self {
        Self {
            credentials,
            transport: Arc::new(transport),
            tokens: TokenCache::default(),
        }
    }

    /// Sets how long before expiry a cached token is refreshed.
    #[must_use]
    pub fn with_token_refresh_margin(mut self, margin: Duration) -> Self {
        self.tokens = TokenCache::new(margin);
        self
    }

    /// Payment lifecycle operations.
    #[must_use]
    pub const fn payment(&self) -> Payment<'_> {
        Payment::new(self)
    }

    /// Direct access to the token exchange.
    #[must_use]
    pub const fn authorization(&self) -> Authorization<'_> {
        Authorization::new(self)
    }

    /// Credentials the client authenticates with.
    #[must_use]
    pub const fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Transport requests are sent through.
    #[must_use]
    pub fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    /// Returns a fresh access token, fetching one if the cached token is
    /// missing or close to expiry.
    ///
    /// # Errors
    ///
    /// Returns the error of the token exchange if a refresh fails.
    pub async fn access_token(&self) -> Result<AccessToken, Error> {
        self.tokens.get_or_refresh(|| self.fetch_token()).await
    }

    /// Drops the cached access token.
    pub async fn invalidate_token(&self) {
        self.tokens.invalidate().await;
    }

    async fn fetch_token(&self) -> Result<AccessToken, Error> {
        let resource = GetToken::new(&self.credentials);
        let response = execute(&resource, self.transport()).await?;
        Ok(AccessToken::from_response(&response, OffsetDateTime::now_utc())?)
    }

    fn session(&self, token: &AccessToken) -> Session {
        Session::new(
            &self.credentials.subscription_key,
            &self.credentials.merchant_serial_number,
            token.value(),
        )
    }

    /// Runs the Resource built by `build` under a fresh session.
    ///
    /// A `401` from the provider drops the cached token if it is still the one
    /// the request carried; the call itself is not retried.
    pub(crate) async fn dispatch<R, F>(&self, build: F) -> Result<R::Output, Error>
    where
        R: Resource + Sync,
        R::Output: Send,
        F: FnOnce(Session) -> R + Send,
    {
        let token = self.access_token().await?;
        let resource = build(self.session(&token));
        let result = execute(&resource, self.transport()).await;
        if let Err(Error::Provider(err)) = &result
            && err.is_unauthorized()
        {
            #[cfg(feature = "telemetry")]
            tracing::warn!("Access token rejected");
            self.tokens.invalidate_if_current(token.value()).await;
        }
        result
    }
}

impl fmt::Debug for Vipps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vipps")
            .field("credentials", &self.credentials)
            .field("tokens", &self.tokens)
            .finish_non_exhaustive()
    }
}
