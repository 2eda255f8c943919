use chrono::{DateTime, Datelike, TimeZone, Timelike};

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// English ordinal suffix for a day of the month.
pub fn ordinal_suffix(day: u32) -> &'static str {
    match day {
        1 | 21 | 31 => "st",
        2 | 22 => "nd",
        3 | 23 => "rd",
        _ => "th",
    }
}

/// Renders a list timestamp as `"Weekday, Day<ordinal> Month, H:MM"`,
/// e.g. `Mon, 1st Jan, 9:05`. The hour is 24-hour and unpadded; minutes are
/// always two digits. The timestamp is rendered in its own time zone.
pub fn format_timestamp<Tz: TimeZone>(timestamp: &DateTime<Tz>) -> String {
    let weekday = WEEKDAYS[timestamp.weekday().num_days_from_sunday() as usize];
    let day = timestamp.day();
    let month = MONTHS[timestamp.month0() as usize];

    format!(
        "{}, {}{} {}, {}:{:02}",
        weekday,
        day,
        ordinal_suffix(day),
        month,
        timestamp.hour(),
        timestamp.minute()
    )
}
