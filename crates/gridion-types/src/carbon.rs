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

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One half-hour slot of the 48 h carbon intensity forecast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarbonIntensityPoint {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    /// Forecast intensity in gCO2eq/kWh
    pub forecast: i64,
}

/// Region-scoped carbon intensity, present only when a region id is configured
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionalCarbonIntensity {
    pub region_id: u32,
    pub region_name: String,
    pub current: i64,
    /// May be empty when the secondary forecast call degraded
    pub forecast: Vec<CarbonIntensityPoint>,
}

/// National carbon intensity with the optional forward view.
///
/// `current` is the newest measured value (gCO2eq/kWh). The forecast list may
/// be empty: a failed forecast call degrades rather than failing the category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarbonIntensity {
    pub current: i64,
    pub forecast: Vec<CarbonIntensityPoint>,
    pub regional: Option<RegionalCarbonIntensity>,
}
