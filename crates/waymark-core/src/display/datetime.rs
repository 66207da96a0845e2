//! DateTime display utilities.

use std::fmt;

use jiff::{tz::TimeZone, Timestamp};

/// Epoch seconds rendered in the system timezone as `YYYY-MM-DD HH:MM:SS TZ`.
///
/// Values outside the supported timestamp range fall back to the raw number.
pub struct LocalDateTime(pub i64);

impl fmt::Display for LocalDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match Timestamp::from_second(self.0) {
            Ok(timestamp) => write!(
                f,
                "{}",
                timestamp
                    .to_zoned(TimeZone::system())
                    .strftime("%Y-%m-%d %H:%M:%S %Z")
            ),
            Err(_) => write!(f, "{}", self.0),
        }
    }
}
