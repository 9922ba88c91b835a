//! Header names, paths and base URLs used on the wire.

/// Base URL of the provider's test environment.
pub const TEST_BASE_URL: &str = "https://apitest.vipps.no";

/// Base URL of the provider's production environment.
pub const PRODUCTION_BASE_URL: &str = "https://api.vipps.no";

/// Path of the access token exchange.
pub const ACCESS_TOKEN_PATH: &str = "/accessToken/get";

/// Collection path of the eCommerce v2 payment API.
pub const PAYMENTS_PATH: &str = "/ecomm/v2/payments";

/// API gateway subscription key, sent on every request.
pub const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// Merchant serial number, sent on every payment request.
pub const MERCHANT_SERIAL_NUMBER_HEADER: &str = "Merchant-Serial-Number";

/// Bearer token header.
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// Content type header.
pub const CONTENT_TYPE_HEADER: &str = "Content-Type";

/// Client id header of the token exchange.
pub const CLIENT_ID_HEADER: &str = "client_id";

/// Client secret header of the token exchange.
pub const CLIENT_SECRET_HEADER: &str = "client_secret";

/// Content type of every request body.
pub const JSON_CONTENT_TYPE: &str = "application/json";
