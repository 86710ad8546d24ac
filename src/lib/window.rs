//! Window expressions.
//!
//! A window bounds an allocation query in time. It is either a named period
//! (`today`, `week`, `lastmonth`, ...), a relative duration (`5d`, `12h`)
//! optionally shifted back with `offset`, or an explicit `start,end` pair in
//! RFC3339 or Unix seconds. Parsing happens client-side so a malformed window
//! is rejected before any request reaches the backend.

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};

use crate::lib::error::ValidationError;

/// Concrete UTC time range `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Window {
    /// Parse a window expression relative to `now`
    pub fn parse(input: &str, now: DateTime<Utc>) -> Result<Self, ValidationError> {
        parse_window(input, now).map_err(|reason| ValidationError::InvalidWindow {
            input: input.to_string(),
            reason,
        })
    }
}

fn parse_window(input: &str, now: DateTime<Utc>) -> Result<Window, String> {
    let expr = input.trim();
    if expr.is_empty() {
        return Err("window is empty".to_string());
    }

    if let Some(window) = named_window(expr, now) {
        return Ok(window);
    }

    if let Some((start, end)) = expr.split_once(',') {
        return parse_pair(start.trim(), end.trim());
    }

    let (span, offset) = match expr.split_once("offset") {
        Some((span, offset)) => (span.trim(), Some(parse_duration(offset.trim())?)),
        None => (expr, None),
    };
    let span = parse_duration(span)?;
    if span.is_zero() {
        return Err("window duration must be greater than zero".to_string());
    }

    let out_of_range = || "window is out of range".to_string();
    let end = now
        .checked_sub_signed(offset.unwrap_or_else(Duration::zero))
        .ok_or_else(out_of_range)?;
    let start = end.checked_sub_signed(span).ok_or_else(out_of_range)?;
    Ok(Window { start, end })
}

fn named_window(expr: &str, now: DateTime<Utc>) -> Option<Window> {
    let today = midnight(now.date_naive());
    let week_start = today - Duration::days(i64::from(now.weekday().num_days_from_sunday()));
    let month_start = midnight(now.date_naive().with_day(1)?);

    let window = match expr {
        "today" => Window {
            start: today,
            end: now,
        },
        "yesterday" => Window {
            start: today - Duration::days(1),
            end: today,
        },
        "week" => Window {
            start: week_start,
            end: now,
        },
        "lastweek" => Window {
            start: week_start - Duration::weeks(1),
            end: week_start,
        },
        "month" => Window {
            start: month_start,
            end: now,
        },
        "lastmonth" => {
            let last_day = month_start.date_naive().pred_opt()?;
            Window {
                start: midnight(last_day.with_day(1)?),
                end: month_start,
            }
        }
        _ => return None,
    };
    Some(window)
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(chrono::NaiveTime::MIN))
}

/// Parse `<N><unit>` where unit is one of `m`, `h`, `d`, `w`
fn parse_duration(expr: &str) -> Result<Duration, String> {
    let split = expr
        .find(|c: char| !c.is_ascii_digit())
        .ok_or_else(|| format!("duration {expr:?} is missing a unit (m, h, d, w)"))?;
    let (amount, unit) = expr.split_at(split);
    if amount.is_empty() {
        return Err(format!("duration {expr:?} is missing an amount"));
    }
    let amount: i64 = amount
        .parse()
        .map_err(|e| format!("invalid amount in {expr:?}: {e}"))?;

    let duration = match unit {
        "m" => Duration::try_minutes(amount),
        "h" => Duration::try_hours(amount),
        "d" => Duration::try_days(amount),
        "w" => Duration::try_weeks(amount),
        other => return Err(format!("unknown duration unit {other:?}")),
    };
    duration.ok_or_else(|| format!("duration {expr:?} is out of range"))
}

fn parse_pair(start: &str, end: &str) -> Result<Window, String> {
    let (start, end) = match (start.parse::<i64>(), end.parse::<i64>()) {
        (Ok(start), Ok(end)) => (unix_seconds(start)?, unix_seconds(end)?),
        _ => (rfc3339(start)?, rfc3339(end)?),
    };
    if start >= end {
        return Err("window start must be before its end".to_string());
    }
    Ok(Window { start, end })
}

fn unix_seconds(secs: i64) -> Result<DateTime<Utc>, String> {
    DateTime::from_timestamp(secs, 0).ok_or_else(|| format!("timestamp {secs} is out of range"))
}

fn rfc3339(value: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(&value.to_ascii_uppercase())
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| format!("invalid timestamp {value:?}: {e}"))
}
