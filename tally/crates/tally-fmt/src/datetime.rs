//! Date, time, and duration rendering.

use tally_eval::temporal::{Duration, PlainDate, PlainDateTime, PlainTime};
use tally_util::{DateOrder, Settings, TimeFormat};

const MONTH_ABBREV: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const WEEKDAY_ABBREV: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Render a date through the settings template (`YYYY MM DD MMM DDD`).
pub fn format_date(date: &PlainDate, settings: &Settings) -> String {
    let mut out = settings.date_format.clone();
    out = out.replace("YYYY", &format!("{:04}", date.year));
    out = out.replace("MMM", MONTH_ABBREV[(date.month - 1) as usize]);
    out = out.replace("MM", &format!("{:02}", date.month));
    out = out.replace("DDD", WEEKDAY_ABBREV[date.weekday() as usize]);
    out = out.replace("DD", &format!("{:02}", date.day));
    out
}

/// Render a wall-clock time per the clock setting. Seconds only show
/// when they carry information.
pub fn format_time(time: &PlainTime, settings: &Settings) -> String {
    let with_seconds = time.second != 0 || time.millisecond != 0;
    match settings.time_format {
        TimeFormat::H23 => {
            if with_seconds {
                format!("{:02}:{:02}:{:02}", time.hour, time.minute, time.second)
            } else {
                format!("{:02}:{:02}", time.hour, time.minute)
            }
        }
        TimeFormat::H12 => {
            let (hour, meridiem) = match time.hour {
                0 => (12, "am"),
                1..=11 => (time.hour, "am"),
                12 => (12, "pm"),
                _ => (time.hour - 12, "pm"),
            };
            if with_seconds {
                format!("{hour}:{:02}:{:02} {meridiem}", time.minute, time.second)
            } else {
                format!("{hour}:{:02} {meridiem}", time.minute)
            }
        }
    }
}

/// Render a date-time in the configured part order.
pub fn format_datetime(dt: &PlainDateTime, settings: &Settings) -> String {
    let date = format_date(&dt.date, settings);
    let time = format_time(&dt.time, settings);
    match settings.date_order {
        DateOrder::DateFirst => format!("{date} {time}"),
        DateOrder::TimeFirst => format!("{time} {date}"),
    }
}

/// Render a duration as its populated components, largest first.
pub fn format_duration(d: &Duration, settings: &Settings) -> String {
    let components: [(f64, &str); 8] = [
        (d.years, "yr"),
        (d.months, "mo"),
        (d.weeks, "wk"),
        (d.days, "d"),
        (d.hours, "h"),
        (d.minutes, "min"),
        (d.seconds, "s"),
        (d.millis, "ms"),
    ];
    let mut parts = Vec::new();
    for (amount, symbol) in components {
        if amount != 0.0 {
            let number = crate::number::format_number(amount, settings, crate::number::Precision::Auto);
            parts.push(format!("{number} {symbol}"));
        }
    }
    if parts.is_empty() {
        return "0 s".to_string();
    }
    parts.join(" ")
}
