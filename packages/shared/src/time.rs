//! Wall-clock helpers for display.
//!
//! Message ordering never depends on these values; the hub orders events with
//! Lamport timestamps only. Wall-clock time is shown next to received messages
//! so a human can correlate the console with the hub's logs.

use chrono::{DateTime, Local, TimeZone};

/// Display format used by the terminal client (`2024/01/01 09:00:00`).
const DISPLAY_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Format the current local time for console display.
pub fn now_for_display() -> String {
    format_for_display(&Local::now())
}

/// Format any timezone-aware date-time for console display.
pub fn format_for_display<Tz: TimeZone>(datetime: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    datetime.format(DISPLAY_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn test_format_for_display() {
        // テスト項目: 日時が表示用フォーマットに変換される
        // given (前提条件):
        let jst = FixedOffset::east_opt(9 * 3600).unwrap();
        let datetime = jst.with_ymd_and_hms(2023, 1, 1, 9, 30, 5).unwrap();

        // when (操作):
        let result = format_for_display(&datetime);

        // then (期待する結果):
        assert_eq!(result, "2023/01/01 09:30:05");
    }

    #[test]
    fn test_now_for_display_has_expected_shape() {
        // テスト項目: 現在時刻が "YYYY/MM/DD HH:MM:SS" 形式で返される
        // given (前提条件):

        // when (操作):
        let result = now_for_display();

        // then (期待する結果):
        assert_eq!(result.len(), 19);
        assert_eq!(&result[4..5], "/");
        assert_eq!(&result[10..11], " ");
    }
}
