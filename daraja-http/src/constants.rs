//! Client defaults.

use std::time::Duration;

pub use daraja::proto::paths;

/// Timeout applied to the token request and to every transaction request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// How long before its reported expiry a cached token is refreshed.
pub const DEFAULT_TOKEN_CACHE_MARGIN: Duration = Duration::from_secs(60);

/// `Cache-Control` value sent with token requests.
pub const TOKEN_CACHE_CONTROL: &str = "no-cache";
