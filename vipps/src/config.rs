//! Credentials, environments and client configuration.
//!
//! Everything here is plain data handed to [`Vipps`](crate::Vipps) at
//! construction. Nothing is read from the process environment; loading a
//! configuration file is left to the application (see the `vipps-cli` crate).
//!
//! # Example Configuration
//!
//! ```rust
//! use vipps::VippsConfig;
//!
//! let config: VippsConfig = serde_json::from_value(serde_json::json!({
//!     "environment": "production",
//!     "timeout_secs": 30,
//!     "credentials": {
//!         "client_id": "client-id",
//!         "client_secret": "client-secret",
//!         "subscription_key": "subscription-key",
//!         "merchant_serial_number": "123456"
//!     }
//! }))
//! .unwrap();
//! assert_eq!(config.base_url().unwrap().as_str(), "https://api.vipps.no/");
//! ```

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::constants::{PRODUCTION_BASE_URL, TEST_BASE_URL};

/// Merchant credentials shared by every request of one client.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Client id used for the token exchange.
    pub client_id: String,

    /// Client secret used for the token exchange.
    pub client_secret: String,

    /// API gateway subscription key.
    pub subscription_key: String,

    /// Merchant serial number (MSN) of the sales unit.
    pub merchant_serial_number: String,
}

impl Credentials {
    /// Creates a new set of credentials.
    #[must_use]
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        subscription_key: impl Into<String>,
        merchant_serial_number: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            subscription_key: subscription_key.into(),
            merchant_serial_number: merchant_serial_number.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("subscription_key", &"<redacted>")
            .field("merchant_serial_number", &self.merchant_serial_number)
            .finish()
    }
}

/// Provider environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Merchant test environment (`apitest.vipps.no`).
    #[default]
    Test,
    /// Production environment (`api.vipps.no`).
    Production,
}

impl Environment {
    /// Returns the base URL of the environment.
    #[must_use]
    pub const fn base_url(self) -> &'static str {
        match self {
            Self::Test => TEST_BASE_URL,
            Self::Production => PRODUCTION_BASE_URL,
        }
    }
}

/// Full client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VippsConfig {
    /// Merchant credentials.
    pub credentials: Credentials,

    /// Target environment (default: `test`).
    #[serde(default)]
    pub environment: Environment,

    /// Overrides the environment's base URL, e.g. for a proxy or mock server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<Url>,

    /// Per-request timeout in seconds. Unset means the transport's default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// How long before its expiry a cached token is already refreshed
    /// (default: 60).
    #[serde(default = "default_token_refresh_margin_secs")]
    pub token_refresh_margin_secs: u64,
}

const fn default_token_refresh_margin_secs() -> u64 {
    60
}

impl VippsConfig {
    /// Creates a configuration for the test environment with defaults.
    #[must_use]
    pub const fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            environment: Environment::Test,
            base_url: None,
            timeout_secs: None,
            token_refresh_margin_secs: default_token_refresh_margin_secs(),
        }
    }

    /// Selects the environment.
    #[must_use]
    pub const fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Overrides the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Returns the effective base URL.
    ///
    /// # Errors
    ///
    /// Returns [`url::ParseError`] if the environment URL cannot be parsed.
    pub fn base_url(&self) -> Result<Url, url::ParseError> {
        match &self.base_url {
            Some(url) => Ok(url.clone()),
            None => Url::parse(self.environment.base_url()),
        }
    }

    /// Returns the configured request timeout.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Returns the token refresh margin.
    #[must_use]
    pub const fn token_refresh_margin(&self) -> Duration {
        Duration::from_secs(self.token_refresh_margin_secs)
    }
}
