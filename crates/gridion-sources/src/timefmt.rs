// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of GridION.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

//! Timestamp normalization for the upstream wire formats.
//!
//! The providers disagree on almost everything: RFC 3339 with offset, bare
//! `Z`-suffixed, naive date-times that are documented as UTC but never carry a
//! zone, and date plus separate `HH:MM` columns. Each observed format gets one
//! helper here returning `DateTime<Utc>`, so no client does its own ad hoc
//! parsing. The UTC tagging of naive fields mirrors what the providers
//! document; it is not verified against the payload.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};

use crate::error::{SourceError, SourceResult};

/// RFC 3339 with offset or trailing `Z` (`2025-01-10T12:30:00Z`,
/// `2025-01-10T12:30:00+01:00`)
pub fn parse_rfc3339_utc(value: &str) -> SourceResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| SourceError::unexpected(format!("bad timestamp '{value}': {e}")))
}

/// Minute-resolution `2025-01-10T12:30Z`, as the carbon intensity API emits
pub fn parse_minute_z_utc(value: &str) -> SourceResult<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%MZ")
        .map(|t| t.and_utc())
        .map_err(|e| SourceError::unexpected(format!("bad timestamp '{value}': {e}")))
}

/// Naive `2025-01-10T12:30:00`, documented as UTC
pub fn parse_naive_utc(value: &str) -> SourceResult<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .map(|t| t.and_utc())
        .map_err(|e| SourceError::unexpected(format!("bad naive timestamp '{value}': {e}")))
}

/// Naive `2025-01-10 12:30:00` (space separated), documented as UTC
pub fn parse_space_naive_utc(value: &str) -> SourceResult<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
        .map(|t| t.and_utc())
        .map_err(|e| SourceError::unexpected(format!("bad naive timestamp '{value}': {e}")))
}

/// Plain `2025-01-10` date
pub fn parse_date(value: &str) -> SourceResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| SourceError::unexpected(format!("bad date '{value}': {e}")))
}

/// Date in either ISO (`2025-01-10`) or the `10-Jan-2025` form some CSV
/// exports use
pub fn parse_flexible_date(value: &str) -> SourceResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(value, "%d-%b-%Y"))
        .map_err(|e| SourceError::unexpected(format!("bad date '{value}': {e}")))
}

/// Date column plus separate `HH:MM` time column, combined and tagged UTC
pub fn combine_date_and_time_utc(date: NaiveDate, time: &str) -> SourceResult<DateTime<Utc>> {
    let time = NaiveTime::parse_from_str(time, "%H:%M")
        .map_err(|e| SourceError::unexpected(format!("bad time '{time}': {e}")))?;
    Ok(date.and_time(time).and_utc())
}

/// Round up to the next half-hour boundary; a time already on the boundary is
/// returned unchanged (seconds stripped).
pub fn ceil_half_hour(t: DateTime<Utc>) -> DateTime<Utc> {
    let floored = t
        .with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .and_then(|t| t.with_minute(t.minute() / 30 * 30))
        .unwrap_or(t);
    if floored == t {
        floored
    } else {
        floored + Duration::minutes(30)
    }
}

/// Truncate to the start of the current hour
pub fn truncate_hour(t: DateTime<Utc>) -> DateTime<Utc> {
    t.with_minute(0)
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(t)
}

/// UK settlement period for the given instant: 48 half-hour slots per day,
/// 1-based from midnight.
pub fn settlement_period(t: DateTime<Utc>) -> u32 {
    (t.hour() * 60 + t.minute()) / 30 + 1
}

/// Offset from midnight of a 1-based settlement period
pub fn period_offset(period: u32) -> Duration {
    Duration::minutes(30 * (i64::from(period) - 1))
}

/// Whether a point falls on one of the two-hourly checkpoints (even hour,
/// minute zero) the 14-day series is subsampled to.
pub fn is_even_hour_checkpoint(t: DateTime<Utc>) -> bool {
    t.minute() == 0 && t.hour() % 2 == 0
}

/// Query window for the hourly wind forecast.
///
/// The publisher rolls the window at 20:00 and does not extend it to day+2
/// until around 03:30 UTC, so before that cutoff the anchor day is shifted
/// back to keep the window fully populated.
pub fn wind_forecast_window(now_utc: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let cutoff = now_utc
        .date_naive()
        .and_hms_opt(3, 30, 0)
        .map(|t| t.and_utc())
        .unwrap_or(now_utc);

    let anchor_day = if now_utc < cutoff {
        now_utc.date_naive() - Duration::days(1)
    } else {
        now_utc.date_naive()
    };

    let start = (anchor_day - Duration::days(1))
        .and_hms_opt(0, 0, 0)
        .map(|t| t.and_utc())
        .unwrap_or(now_utc);
    let end = (anchor_day + Duration::days(2))
        .and_hms_opt(20, 0, 0)
        .map(|t| t.and_utc())
        .unwrap_or(now_utc);

    (start, end)
}
