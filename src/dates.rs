use chrono::{DateTime, Duration, FixedOffset, TimeZone, Timelike};

/// India Standard Time is UTC+05:30 all year
pub const IST_OFFSET_SECONDS: i32 = 5 * 3600 + 30 * 60;

pub fn ist() -> FixedOffset {
    FixedOffset::east_opt(IST_OFFSET_SECONDS).expect("IST offset is within one day")
}

/// Issue date as printed on the bulletin, e.g. "05 October 2026"
pub fn format_ist_date<Tz: TimeZone>(instant: &DateTime<Tz>) -> String {
    instant.with_timezone(&ist()).format("%d %B %Y").to_string()
}

/// Midnight IST of the day containing `instant`
pub fn start_of_today_ist<Tz: TimeZone>(instant: &DateTime<Tz>) -> DateTime<FixedOffset> {
    let local = instant.with_timezone(&ist());
    local
        - Duration::seconds(local.num_seconds_from_midnight() as i64)
        - Duration::nanoseconds(local.nanosecond() as i64)
}
