//! Access token exchange.

use std::fmt;

use vipps_proto::AccessTokenResponse;

use super::Resource;
use crate::config::Credentials;
use crate::constants::{
    ACCESS_TOKEN_PATH, CLIENT_ID_HEADER, CLIENT_SECRET_HEADER, SUBSCRIPTION_KEY_HEADER,
};
use crate::http::{Headers, HttpMethod};

/// `POST /accessToken/get`.
///
/// Exchanges client id and secret, sent as headers, for a bearer token. The
/// body is empty and no `Authorization` header is sent.
#[derive(Clone, PartialEq, Eq)]
pub struct GetToken {
    subscription_key: String,
    client_id: String,
    client_secret: String,
}

impl GetToken {
    /// Creates the exchange for the given credentials.
    #[must_use]
    pub fn new(credentials: &Credentials) -> Self {
        Self::from_parts(
            &credentials.subscription_key,
            &credentials.client_id,
            &credentials.client_secret,
        )
    }

    /// Creates the exchange from individual values.
    #[must_use]
    pub fn from_parts(
        subscription_key: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            subscription_key: subscription_key.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }
}

impl fmt::Debug for GetToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GetToken")
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

impl Resource for GetToken {
    type Body = ();
    type Output = AccessTokenResponse;

    fn method(&self) -> HttpMethod {
        HttpMethod::Post
    }

    fn path(&self) -> String {
        ACCESS_TOKEN_PATH.to_owned()
    }

    fn headers(&self) -> Headers {
        Headers::from([
            (CLIENT_ID_HEADER.to_owned(), self.client_id.clone()),
            (CLIENT_SECRET_HEADER.to_owned(), self.client_secret.clone()),
            (
                SUBSCRIPTION_KEY_HEADER.to_owned(),
                self.subscription_key.clone(),
            ),
        ])
    }

    fn body(&self) -> Option<&()> {
        None
    }
}
