//! Gateway timestamps and the push-payment password.
//!
//! Push-payment requests carry a `Timestamp` in `YYYYMMDDHHMMSS` form, local
//! to East Africa Time, and a `Password` derived from it. The gateway checks
//! that the password was built from the same timestamp sent alongside it.

use std::fmt::{Display, Formatter};

use base64::Engine;
use base64::engine::general_purpose::STANDARD as b64;
use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};

/// `strftime` layout of a gateway timestamp.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Offset of East Africa Time from UTC, in seconds.
const EAT_OFFSET_SECS: i32 = 3 * 3600;

/// East Africa Time, the gateway's local time.
fn eat() -> FixedOffset {
    FixedOffset::east_opt(EAT_OFFSET_SECS).expect("Invalid EAT offset")
}

/// A `YYYYMMDDHHMMSS` timestamp in East Africa Time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DarajaTimestamp(String);

impl DarajaTimestamp {
    /// Returns the current time.
    #[must_use]
    pub fn now() -> Self {
        Self::at(&Utc::now())
    }

    /// Returns the timestamp of `instant`, converted to East Africa Time.
    #[must_use]
    pub fn at<Tz: TimeZone>(instant: &DateTime<Tz>) -> Self {
        Self(instant.with_timezone(&eat()).format(TIMESTAMP_FORMAT).to_string())
    }

    /// Formats a wall-clock time that is already in East Africa Time.
    #[must_use]
    pub fn from_naive(local: NaiveDateTime) -> Self {
        Self(local.format(TIMESTAMP_FORMAT).to_string())
    }

    /// Returns the formatted timestamp.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for DarajaTimestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Builds the push-payment password: `base64(short_code + pass_key + timestamp)`.
#[must_use]
pub fn stk_password(short_code: &str, pass_key: &str, timestamp: &DarajaTimestamp) -> String {
    b64.encode(format!("{short_code}{pass_key}{}", timestamp.as_str()))
}
