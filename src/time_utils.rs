// SPDX-License-Identifier: MIT

//! Shared helpers for date/time handling.

use chrono::{DateTime, Datelike, Utc};

/// Calendar-day key ("YYYY-MM-DD") used to key per-gym daily rosters.
pub fn day_key(date: DateTime<Utc>) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        date.month(),
        date.day()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_day_key_zero_pads() {
        let date = Utc.with_ymd_and_hms(2024, 3, 7, 15, 30, 0).unwrap();
        assert_eq!(day_key(date), "2024-03-07");
    }

    #[test]
    fn test_day_key_is_stable_within_a_day() {
        let morning = Utc.with_ymd_and_hms(2024, 3, 7, 0, 0, 1).unwrap();
        let night = Utc.with_ymd_and_hms(2024, 3, 7, 23, 59, 59).unwrap();
        assert_eq!(day_key(morning), day_key(night));
    }
}
