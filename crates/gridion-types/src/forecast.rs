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

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One (start time, generation MW) forecast point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub start_time: DateTime<Utc>,
    pub generation: i64,
}

/// Hourly wind generation forecast over a rolling ~3-day window.
///
/// `current_value` is the point matching the current hour; the source client
/// rejects a response where that point is missing or zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindForecast {
    pub current_value: i64,
    pub forecast: Vec<ForecastPoint>,
}

/// Half-hourly solar generation forecast.
///
/// Unlike wind, a zero `current_value` is legitimate overnight; only a missing
/// matching point is rejected upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolarForecast {
    pub current_value: i64,
    pub forecast: Vec<ForecastPoint>,
}

/// Long-range wind forecast split into the two display horizons: native
/// resolution out to three days, and two-hourly checkpoints out to fourteen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LongTermWindForecast {
    pub three_day: Vec<ForecastPoint>,
    pub fourteen_day: Vec<ForecastPoint>,
}

/// Embedded (distribution-connected) wind and solar forecast, both horizons
/// for each fuel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddedForecast {
    pub current_solar: i64,
    pub current_wind: i64,
    pub three_day_solar: Vec<ForecastPoint>,
    pub fourteen_day_solar: Vec<ForecastPoint>,
    pub three_day_wind: Vec<ForecastPoint>,
    pub fourteen_day_wind: Vec<ForecastPoint>,
}

/// Today's and tomorrow's forecast wind generation peak
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindPeaks {
    pub today_peak: f64,
    pub tomorrow_peak: f64,
    pub today_peak_time: DateTime<Utc>,
    pub tomorrow_peak_time: DateTime<Utc>,
}

/// One day-ahead demand point; the day-ahead feed reports both boundaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemandDayAheadPoint {
    pub start_time: DateTime<Utc>,
    pub national_demand: i64,
    pub transmission_demand: i64,
}

/// Half-hourly national demand forecast for the next ~48 hours
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandDayAheadForecast {
    pub current_value: i64,
    pub forecast: Vec<DemandDayAheadPoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemandPoint {
    pub start_time: DateTime<Utc>,
    pub national_demand: i64,
}

/// Longer-range national demand forecast (3-day native or 14-day two-hourly),
/// spliced with the day-ahead series for the first ~24 hours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandForecast {
    pub current_value: i64,
    pub forecast: Vec<DemandPoint>,
}

/// One published surplus-margin figure for a forecast day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarginForecastPoint {
    pub forecast_date: NaiveDate,
    pub margin_mw: i64,
    pub publish_time: DateTime<Utc>,
}

/// Forecast spare generation capacity above expected demand.
///
/// `current` is the nearest upcoming forecast day, when one exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarginForecast {
    pub current: Option<MarginForecastPoint>,
    pub forecast: Vec<MarginForecastPoint>,
}
