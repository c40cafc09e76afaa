use chrono::prelude::*;
use chrono_tz::Tz;

/// Converts a UTC timestamp in millis into the given timezone.
///
/// Every timestamp in the domain is kept as UTC millis so that comparisons
/// happen in one frame, the timezone is only applied for display and parsing.
pub fn to_local(timestamp_millis: i64, tz: &Tz) -> DateTime<Tz> {
    DateTime::<Utc>::from_timestamp_millis(timestamp_millis)
        .unwrap_or_default()
        .with_timezone(tz)
}

/// 18:30
pub fn format_time(timestamp_millis: i64, tz: &Tz) -> String {
    to_local(timestamp_millis, tz).format("%H:%M").to_string()
}

/// 15.12.2026 18:30
pub fn format_date_time(timestamp_millis: i64, tz: &Tz) -> String {
    to_local(timestamp_millis, tz)
        .format("%d.%m.%Y %H:%M")
        .to_string()
}

/// Parses a `DD.MM HH:MM` string in the given timezone.
///
/// The year is taken from `now_millis`. A date that has already passed, or
/// that does not exist in that year, is moved to the next year it occurs in.
pub fn parse_day_month_time(input: &str, now_millis: i64, tz: &Tz) -> Option<i64> {
    let now = to_local(now_millis, tz);
    let parse = |year: i32| {
        NaiveDateTime::parse_from_str(&format!("{} {}", input.trim(), year), "%d.%m %H:%M %Y")
            .ok()
            .and_then(|naive| tz.from_local_datetime(&naive).earliest())
    };

    // 29.02 only exists in leap years, so look a few years ahead
    (now.year()..=now.year() + 4)
        .filter_map(parse)
        .map(|date_time| date_time.timestamp_millis())
        .find(|timestamp| *timestamp >= now_millis)
}

/// Parses a `HH:MM` time on the same local day as `day_millis`. Times before
/// `day_millis` are moved to the next day.
pub fn parse_time_after(input: &str, day_millis: i64, tz: &Tz) -> Option<i64> {
    let time = NaiveTime::parse_from_str(input.trim(), "%H:%M").ok()?;
    let day = to_local(day_millis, tz).date_naive();
    let date_time = tz.from_local_datetime(&day.and_time(time)).earliest()?;
    if date_time.timestamp_millis() > day_millis {
        return Some(date_time.timestamp_millis());
    }
    let next_day = day.succ_opt()?;
    tz.from_local_datetime(&next_day.and_time(time))
        .earliest()
        .map(|dt| dt.timestamp_millis())
}
