use chrono::{DateTime, Datelike, TimeZone, Utc};
use std::{
    convert::TryInto,
    time::{SystemTime, UNIX_EPOCH},
};

const FULL_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";
const SHORT_FORMAT: &str = "%Y-%m-%d";
const COMPACT_FULL_FORMAT: &str = "%Y%m%dT%H%M%SZ";
const COMPACT_SHORT_FORMAT: &str = "%Y%m%d";

/// ISO-8601 格式的 UTC 时间
///
/// `short` 总是 `full` 的日期前缀。
/// 年份在 0000 至 9999 之间时，`short` 恰为 `full` 的前 10 个字符（紧凑格式为前 8 个字符），
/// 超出该范围的年份会带有符号和更多位数，可以用 [`Iso8601::checked_from_system_time`] 排除
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Iso8601 {
    full: String,
    short: String,
}

impl Iso8601 {
    /// 以扩展格式表示时间，例如 `1970-01-01T00:00:00Z` 和 `1970-01-01`
    ///
    /// 上传策略的 `expiration` 字段使用该格式
    pub fn from_system_time(time: SystemTime) -> Self {
        Self::format(time, FULL_FORMAT, SHORT_FORMAT)
    }

    /// 以扩展格式表示时间，年份超出 0000 至 9999 时返回 `None`
    pub fn checked_from_system_time(time: SystemTime) -> Option<Self> {
        to_date_time(time)
            .filter(|date_time| (0..=9999).contains(&date_time.year()))
            .map(|_| Self::from_system_time(time))
    }

    /// 以紧凑格式表示时间，例如 `19700101T000000Z` 和 `19700101`
    ///
    /// `x-amz-date` 字段以及签名密钥的日期范围使用该格式
    pub fn compact_from_system_time(time: SystemTime) -> Self {
        Self::format(time, COMPACT_FULL_FORMAT, COMPACT_SHORT_FORMAT)
    }

    fn format(time: SystemTime, full_format: &str, short_format: &str) -> Self {
        let time: DateTime<Utc> = time.into();
        Self {
            full: time.format(full_format).to_string(),
            short: time.format(short_format).to_string(),
        }
    }

    /// 精确到秒的完整时间
    #[inline]
    pub fn full(&self) -> &str {
        &self.full
    }

    /// 仅包含日期
    #[inline]
    pub fn short(&self) -> &str {
        &self.short
    }

    /// 拆分为完整时间和日期
    #[inline]
    pub fn into_parts(self) -> (String, String) {
        (self.full, self.short)
    }
}

fn to_date_time(time: SystemTime) -> Option<DateTime<Utc>> {
    let (secs, nanos) = match time.duration_since(UNIX_EPOCH) {
        Ok(elapsed) => (elapsed.as_secs().try_into().ok()?, elapsed.subsec_nanos()),
        Err(err) => {
            let before = err.duration();
            let secs: i64 = before.as_secs().try_into().ok()?;
            match before.subsec_nanos() {
                0 => (secs.checked_neg()?, 0),
                nanos => (secs.checked_neg()?.checked_sub(1)?, 1_000_000_000 - nanos),
            }
        }
    };
    Utc.timestamp_opt(secs, nanos).single()
}

impl From<SystemTime> for Iso8601 {
    #[inline]
    fn from(time: SystemTime) -> Self {
        Self::from_system_time(time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    #[test]
    fn test_format_epoch() {
        let formatted = Iso8601::from_system_time(UNIX_EPOCH);
        assert_eq!(formatted.full(), "1970-01-01T00:00:00Z");
        assert_eq!(formatted.short(), "1970-01-01");

        let formatted = Iso8601::compact_from_system_time(UNIX_EPOCH);
        assert_eq!(formatted.full(), "19700101T000000Z");
        assert_eq!(formatted.short(), "19700101");
    }

    #[test]
    fn test_format_drops_fractional_seconds() {
        // 2013-08-06T12:34:56.789Z
        let time = UNIX_EPOCH + Duration::from_millis(1_375_792_496_789);
        let (full, short) = Iso8601::from(time).into_parts();
        assert_eq!(full, "2013-08-06T12:34:56Z");
        assert_eq!(short, "2013-08-06");
        assert!(full.starts_with(&short));

        let formatted = Iso8601::compact_from_system_time(time);
        assert_eq!(formatted.full(), "20130806T123456Z");
        assert_eq!(formatted.short(), "20130806");
    }

    #[test]
    fn test_format_before_epoch() {
        let time = UNIX_EPOCH - Duration::from_secs(1);
        let formatted = Iso8601::from_system_time(time);
        assert_eq!(formatted.full(), "1969-12-31T23:59:59Z");
        assert_eq!(formatted.short(), "1969-12-31");
    }

    #[test]
    fn test_checked_format_keeps_four_digit_years() {
        // 9999-12-31T23:59:59Z
        let last = UNIX_EPOCH + Duration::from_secs(253_402_300_799);
        let formatted = Iso8601::checked_from_system_time(last).unwrap();
        assert_eq!(formatted.full(), "9999-12-31T23:59:59Z");
        assert_eq!(formatted.short(), &formatted.full()[..10]);

        let next = last + Duration::from_secs(1);
        assert_eq!(Iso8601::checked_from_system_time(next), None);
        let unchecked = Iso8601::from_system_time(next);
        assert_eq!(unchecked.full(), "+10000-01-01T00:00:00Z");
        assert!(unchecked.full().starts_with(unchecked.short()));

        let before_epoch = UNIX_EPOCH - Duration::from_millis(1500);
        assert_eq!(
            Iso8601::checked_from_system_time(before_epoch)
                .unwrap()
                .full(),
            "1969-12-31T23:59:58Z"
        );
        assert_eq!(
            Iso8601::checked_from_system_time(UNIX_EPOCH),
            Some(Iso8601::from_system_time(UNIX_EPOCH))
        );
    }

    #[test]
    fn test_format_leap_day() {
        // 2024-02-29T23:59:59Z
        let time = UNIX_EPOCH + Duration::from_secs(1_709_251_199);
        assert_eq!(
            Iso8601::from_system_time(time).full(),
            "2024-02-29T23:59:59Z"
        );
    }
}
