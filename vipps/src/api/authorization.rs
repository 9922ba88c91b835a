//! Token exchange facade.

use vipps_proto::AccessTokenResponse;

use crate::client::Vipps;
use crate::error::Error;
use crate::resource::{GetToken, execute};

/// Access to the raw token exchange.
///
/// Payment calls obtain their token through the client's cache; this facade
/// talks to the provider directly and never reads or fills the cache.
#[derive(Debug, Clone, Copy)]
pub struct Authorization<'a> {
    client: &'a Vipps,
}

impl<'a> Authorization<'a> {
    pub(crate) const fn new(client: &'a Vipps) -> Self {
        Self { client }
    }

    /// Exchanges the client credentials for a new access token.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Provider`] if the credentials are rejected.
    #[cfg_attr(
        feature = "telemetry",
        tracing::instrument(name = "vipps.authorization.get_token", skip_all, err)
    )]
    pub async fn get_token(&self) -> Result<AccessTokenResponse, Error> {
        let resource = GetToken::new(self.client.credentials());
        execute(&resource, self.client.transport()).await
    }
}
