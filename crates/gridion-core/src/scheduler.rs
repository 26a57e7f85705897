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

//! Per-category refresh scheduling.
//!
//! Upstream publication cadences differ wildly (frequency moves every few
//! seconds, DFS requirements a few times a day), so each category carries its
//! own interval instead of polling everything at the tightest one and risking
//! rate limits.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

/// One independently refreshed slice of the snapshot.
///
/// `GridGeneration` is a composite: the fuel mix, the embedded-generation
/// merge, the wind peaks and the demand/transfer sums all refresh (and fall
/// back) together so they stay mutually consistent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    GridFrequency,
    SellPrice,
    GridGeneration,
    SystemWarnings,
    CarbonIntensity,
    MarginForecast,
    WindForecast,
    WindForecastEarliest,
    SolarForecast,
    DemandDayAhead,
    DemandLongTerm,
    LongTermWindForecast,
    EmbeddedForecast,
    DfsRequirements,
}

impl Category {
    pub const ALL: [Category; 14] = [
        Category::GridFrequency,
        Category::SellPrice,
        Category::GridGeneration,
        Category::SystemWarnings,
        Category::CarbonIntensity,
        Category::MarginForecast,
        Category::WindForecast,
        Category::WindForecastEarliest,
        Category::SolarForecast,
        Category::DemandDayAhead,
        Category::DemandLongTerm,
        Category::LongTermWindForecast,
        Category::EmbeddedForecast,
        Category::DfsRequirements,
    ];

    /// Minimum age before the category is fetched again
    pub fn interval(self) -> Duration {
        match self {
            Category::GridFrequency => Duration::minutes(2),
            Category::SellPrice | Category::GridGeneration | Category::SystemWarnings => {
                Duration::minutes(5)
            }
            Category::CarbonIntensity | Category::MarginForecast => Duration::minutes(15),
            Category::WindForecast
            | Category::WindForecastEarliest
            | Category::SolarForecast
            | Category::DemandDayAhead
            | Category::DemandLongTerm
            | Category::LongTermWindForecast
            | Category::EmbeddedForecast
            | Category::DfsRequirements => Duration::minutes(30),
        }
    }

    /// Stable name used in logs
    pub fn key(self) -> &'static str {
        match self {
            Category::GridFrequency => "grid_frequency",
            Category::SellPrice => "sell_price",
            Category::GridGeneration => "grid_generation",
            Category::SystemWarnings => "system_warnings",
            Category::CarbonIntensity => "carbon_intensity",
            Category::MarginForecast => "margin_forecast",
            Category::WindForecast => "wind_forecast",
            Category::WindForecastEarliest => "wind_forecast_earliest",
            Category::SolarForecast => "solar_forecast",
            Category::DemandDayAhead => "demand_day_ahead_forecast",
            Category::DemandLongTerm => "demand_long_term_forecast",
            Category::LongTermWindForecast => "long_term_wind_forecast",
            Category::EmbeddedForecast => "embedded_forecast",
            Category::DfsRequirements => "dfs_requirements",
        }
    }
}

/// Last-success bookkeeping for every category.
///
/// Created empty at orchestrator start and never persisted: the first pass
/// after a restart treats every category as due.
#[derive(Debug, Default)]
pub struct CategoryScheduler {
    last_updated: HashMap<Category, DateTime<Utc>>,
}

impl CategoryScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the category should be fetched this pass
    pub fn is_due(&self, category: Category, now: DateTime<Utc>) -> bool {
        match self.last_updated.get(&category) {
            Some(last) => now - *last >= category.interval(),
            None => true,
        }
    }

    /// Record a genuinely fresh (non-fallback) result. Fallback values must
    /// not advance the timestamp, otherwise a failing source would never be
    /// retried at its own cadence.
    pub fn mark_updated(&mut self, category: Category, now: DateTime<Utc>) {
        self.last_updated.insert(category, now);
    }

    pub fn last_updated(&self, category: Category) -> Option<DateTime<Utc>> {
        self.last_updated.get(&category).copied()
    }
}
