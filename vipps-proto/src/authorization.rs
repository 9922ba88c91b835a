//! Access token response returned by `POST /accessToken/get`.

use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, PickFirst, serde_as};

/// Response of the access token exchange.
///
/// Unlike the payment Models this one uses `snake_case` keys on the wire.
/// The provider sends its numeric fields as strings (`"86398"`), so every
/// number is accepted either as a JSON number or as a numeric string.
///
/// Every field is optional on the wire: an empty object parses into
/// [`AccessTokenResponse::default()`].
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTokenResponse {
    /// Token type, normally `"Bearer"`.
    #[serde(default)]
    pub token_type: String,

    /// Lifetime of the token in seconds, counted from issuance.
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,

    /// Extended lifetime in seconds.
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ext_expires_in: Option<u64>,

    /// Expiry as Unix seconds.
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_on: Option<i64>,

    /// Start of validity as Unix seconds.
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_before: Option<i64>,

    /// Resource identifier the token was issued for.
    #[serde(default)]
    pub resource: String,

    /// The bearer token itself.
    #[serde(default)]
    pub access_token: String,
}
