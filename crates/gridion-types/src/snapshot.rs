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

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::carbon::CarbonIntensity;
use crate::dfs::DfsRequirements;
use crate::forecast::{
    DemandDayAheadForecast, DemandForecast, EmbeddedForecast, LongTermWindForecast, MarginForecast,
    SolarForecast, WindForecast, WindPeaks,
};
use crate::generation::GridGeneration;
use crate::warnings::SystemWarnings;

/// The root value produced by one refresh pass.
///
/// Immutable once constructed; the next pass supersedes it wholesale. A `None`
/// field means the category has never produced a value — presentation layers
/// must render that as unavailable, not as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GridSnapshot {
    pub sell_price: Option<f64>,
    pub grid_frequency: Option<f64>,
    pub carbon_intensity: Option<CarbonIntensity>,
    pub grid_generation: Option<GridGeneration>,
    pub wind_data: Option<WindPeaks>,
    pub total_demand_mwh: Option<i64>,
    pub total_transfers_mwh: Option<i64>,
    pub wind_forecast: Option<WindForecast>,
    pub wind_forecast_earliest: Option<WindForecast>,
    pub solar_forecast: Option<SolarForecast>,
    pub demand_day_ahead_forecast: Option<DemandDayAheadForecast>,
    pub three_day_demand_forecast: Option<DemandForecast>,
    pub fourteen_day_demand_forecast: Option<DemandForecast>,
    pub long_term_wind_forecast: Option<LongTermWindForecast>,
    pub embedded_forecast: Option<EmbeddedForecast>,
    pub dfs_requirements: Option<DfsRequirements>,
    pub margin_forecast: Option<MarginForecast>,
    pub system_warnings: Option<SystemWarnings>,
}

impl GridSnapshot {
    /// Every dot-separated path the presentation layer may bind to.
    ///
    /// Bindings resolve by name at read time, so this list and the `field`
    /// match below are the stability contract: paths are added, never renamed.
    pub const FIELD_PATHS: &'static [&'static str] = &[
        "sell_price",
        "grid_frequency",
        "total_demand_mwh",
        "total_transfers_mwh",
        "carbon_intensity.current",
        "carbon_intensity.regional.current",
        "carbon_intensity.regional.region_name",
        "grid_generation.gas_mwh",
        "grid_generation.oil_mwh",
        "grid_generation.coal_mwh",
        "grid_generation.biomass_mwh",
        "grid_generation.nuclear_mwh",
        "grid_generation.wind_mwh",
        "grid_generation.national_wind_mwh",
        "grid_generation.embedded_wind_mwh",
        "grid_generation.solar_mwh",
        "grid_generation.pumped_storage_mwh",
        "grid_generation.hydro_mwh",
        "grid_generation.other_mwh",
        "grid_generation.france_mwh",
        "grid_generation.ireland_mwh",
        "grid_generation.netherlands_mwh",
        "grid_generation.belgium_mwh",
        "grid_generation.norway_mwh",
        "grid_generation.denmark_mwh",
        "grid_generation.total_generation_mwh",
        "grid_generation.fossil_fuel_percentage",
        "grid_generation.renewable_percentage",
        "grid_generation.low_carbon_percentage",
        "grid_generation.low_carbon_with_biomass_percentage",
        "grid_generation.other_percentage",
        "grid_generation.grid_collection_time",
        "wind_data.today_peak",
        "wind_data.tomorrow_peak",
        "wind_data.today_peak_time",
        "wind_data.tomorrow_peak_time",
        "wind_forecast.current_value",
        "wind_forecast_earliest.current_value",
        "solar_forecast.current_value",
        "demand_day_ahead_forecast.current_value",
        "three_day_demand_forecast.current_value",
        "fourteen_day_demand_forecast.current_value",
        "embedded_forecast.current_wind",
        "embedded_forecast.current_solar",
        "dfs_requirements.count",
        "margin_forecast.current.margin_mw",
        "margin_forecast.current.forecast_date",
        "system_warnings.current.warning_type",
        "system_warnings.current.text",
    ];

    /// Resolve one display binding path. `None` means the path is unknown or
    /// the backing category has no value yet.
    pub fn field(&self, path: &str) -> Option<Value> {
        let generation = self.grid_generation.as_ref();
        match path {
            "sell_price" => self.sell_price.map(|v| json!(v)),
            "grid_frequency" => self.grid_frequency.map(|v| json!(v)),
            "total_demand_mwh" => self.total_demand_mwh.map(|v| json!(v)),
            "total_transfers_mwh" => self.total_transfers_mwh.map(|v| json!(v)),

            "carbon_intensity.current" => self.carbon_intensity.as_ref().map(|c| json!(c.current)),
            "carbon_intensity.regional.current" => self
                .carbon_intensity
                .as_ref()
                .and_then(|c| c.regional.as_ref())
                .map(|r| json!(r.current)),
            "carbon_intensity.regional.region_name" => self
                .carbon_intensity
                .as_ref()
                .and_then(|c| c.regional.as_ref())
                .map(|r| json!(r.region_name)),

            "grid_generation.gas_mwh" => generation.map(|g| json!(g.gas_mwh)),
            "grid_generation.oil_mwh" => generation.map(|g| json!(g.oil_mwh)),
            "grid_generation.coal_mwh" => generation.map(|g| json!(g.coal_mwh)),
            "grid_generation.biomass_mwh" => generation.map(|g| json!(g.biomass_mwh)),
            "grid_generation.nuclear_mwh" => generation.map(|g| json!(g.nuclear_mwh)),
            "grid_generation.wind_mwh" => generation.map(|g| json!(g.wind_mwh)),
            "grid_generation.national_wind_mwh" => generation.map(|g| json!(g.national_wind_mwh)),
            "grid_generation.embedded_wind_mwh" => generation.map(|g| json!(g.embedded_wind_mwh)),
            "grid_generation.solar_mwh" => generation.map(|g| json!(g.solar_mwh)),
            "grid_generation.pumped_storage_mwh" => generation.map(|g| json!(g.pumped_storage_mwh)),
            "grid_generation.hydro_mwh" => generation.map(|g| json!(g.hydro_mwh)),
            "grid_generation.other_mwh" => generation.map(|g| json!(g.other_mwh)),
            "grid_generation.france_mwh" => generation.map(|g| json!(g.france_mwh)),
            "grid_generation.ireland_mwh" => generation.map(|g| json!(g.ireland_mwh)),
            "grid_generation.netherlands_mwh" => generation.map(|g| json!(g.netherlands_mwh)),
            "grid_generation.belgium_mwh" => generation.map(|g| json!(g.belgium_mwh)),
            "grid_generation.norway_mwh" => generation.map(|g| json!(g.norway_mwh)),
            "grid_generation.denmark_mwh" => generation.map(|g| json!(g.denmark_mwh)),
            "grid_generation.total_generation_mwh" => {
                generation.map(|g| json!(g.total_generation_mwh))
            }
            "grid_generation.fossil_fuel_percentage" => {
                generation.map(|g| json!(g.fossil_fuel_percentage))
            }
            "grid_generation.renewable_percentage" => {
                generation.map(|g| json!(g.renewable_percentage))
            }
            "grid_generation.low_carbon_percentage" => {
                generation.map(|g| json!(g.low_carbon_percentage))
            }
            "grid_generation.low_carbon_with_biomass_percentage" => {
                generation.map(|g| json!(g.low_carbon_with_biomass_percentage))
            }
            "grid_generation.other_percentage" => generation.map(|g| json!(g.other_percentage)),
            "grid_generation.grid_collection_time" => {
                generation.map(|g| json!(g.grid_collection_time))
            }

            "wind_data.today_peak" => self.wind_data.as_ref().map(|w| json!(w.today_peak)),
            "wind_data.tomorrow_peak" => self.wind_data.as_ref().map(|w| json!(w.tomorrow_peak)),
            "wind_data.today_peak_time" => {
                self.wind_data.as_ref().map(|w| json!(w.today_peak_time))
            }
            "wind_data.tomorrow_peak_time" => {
                self.wind_data.as_ref().map(|w| json!(w.tomorrow_peak_time))
            }

            "wind_forecast.current_value" => {
                self.wind_forecast.as_ref().map(|f| json!(f.current_value))
            }
            "wind_forecast_earliest.current_value" => self
                .wind_forecast_earliest
                .as_ref()
                .map(|f| json!(f.current_value)),
            "solar_forecast.current_value" => {
                self.solar_forecast.as_ref().map(|f| json!(f.current_value))
            }
            "demand_day_ahead_forecast.current_value" => self
                .demand_day_ahead_forecast
                .as_ref()
                .map(|f| json!(f.current_value)),
            "three_day_demand_forecast.current_value" => self
                .three_day_demand_forecast
                .as_ref()
                .map(|f| json!(f.current_value)),
            "fourteen_day_demand_forecast.current_value" => self
                .fourteen_day_demand_forecast
                .as_ref()
                .map(|f| json!(f.current_value)),
            "embedded_forecast.current_wind" => self
                .embedded_forecast
                .as_ref()
                .map(|f| json!(f.current_wind)),
            "embedded_forecast.current_solar" => self
                .embedded_forecast
                .as_ref()
                .map(|f| json!(f.current_solar)),

            "dfs_requirements.count" => self
                .dfs_requirements
                .as_ref()
                .map(|d| json!(d.requirements.len())),

            "margin_forecast.current.margin_mw" => self
                .margin_forecast
                .as_ref()
                .and_then(|m| m.current.as_ref())
                .map(|p| json!(p.margin_mw)),
            "margin_forecast.current.forecast_date" => self
                .margin_forecast
                .as_ref()
                .and_then(|m| m.current.as_ref())
                .map(|p| json!(p.forecast_date)),

            "system_warnings.current.warning_type" => self
                .system_warnings
                .as_ref()
                .and_then(|w| w.current.as_ref())
                .map(|c| json!(c.warning_type)),
            "system_warnings.current.text" => self
                .system_warnings
                .as_ref()
                .and_then(|w| w.current.as_ref())
                .map(|c| json!(c.text)),

            _ => None,
        }
    }
}
