//! Local timestamp rendering for sheet rows and chat notifications.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// `10/16/2026, 02:05:09 PM`
pub fn sheet_timestamp(now: DateTime<Utc>, tz: Tz) -> String {
    now.with_timezone(&tz)
        .format("%m/%d/%Y, %I:%M:%S %p")
        .to_string()
}

/// `10/16/2026, 02:05 PM`
pub fn chat_timestamp(now: DateTime<Utc>, tz: Tz) -> String {
    now.with_timezone(&tz).format("%m/%d/%Y, %I:%M %p").to_string()
}
