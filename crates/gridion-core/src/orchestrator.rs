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

//! One refresh pass: decide which categories are due, fetch them with
//! fallback, merge with carried-over values and assemble the next snapshot.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use gridion_sources::{
    BmrsLegacyClient, CarbonClient, ElexonClient, NesoClient, SourceResult,
};
use gridion_types::{
    DemandForecast, GridGeneration, GridSnapshot, WindPeaks,
};

use crate::error::RefreshError;
use crate::fallback::{FetchOutcome, fetch_with_fallback, refresh_category};
use crate::metrics;
use crate::scheduler::{Category, CategoryScheduler};

/// Host-supplied configuration for one orchestrator instance
#[derive(Debug, Clone, Default)]
pub struct OrchestratorConfig {
    /// Credential for the legacy keyed XML reports. Without one, the margin
    /// forecast and system warnings categories are skipped entirely.
    pub api_key: Option<String>,
    /// Carbon intensity region to track alongside the national figure
    pub carbon_region_id: Option<u32>,
}

/// Owns the source clients and the per-category scheduler state for the
/// process lifetime. Exactly one pass runs at a time; the caller holds the
/// previous snapshot and feeds it back in as the fallback source.
#[derive(Debug)]
pub struct Orchestrator {
    elexon: ElexonClient,
    neso: NesoClient,
    carbon: CarbonClient,
    legacy: Option<BmrsLegacyClient>,
    carbon_region_id: Option<u32>,
    scheduler: CategoryScheduler,
}

impl Orchestrator {
    pub fn new(config: OrchestratorConfig) -> SourceResult<Self> {
        let legacy = match &config.api_key {
            Some(key) => Some(BmrsLegacyClient::new(key.clone())?),
            None => None,
        };

        Ok(Self {
            elexon: ElexonClient::new()?,
            neso: NesoClient::new()?,
            carbon: CarbonClient::new()?,
            legacy,
            carbon_region_id: config.carbon_region_id,
            scheduler: CategoryScheduler::new(),
        })
    }

    /// Build from pre-configured clients (tests point these at mock servers)
    pub fn with_clients(
        elexon: ElexonClient,
        neso: NesoClient,
        carbon: CarbonClient,
        legacy: Option<BmrsLegacyClient>,
        carbon_region_id: Option<u32>,
    ) -> Self {
        Self {
            elexon,
            neso,
            carbon,
            legacy,
            carbon_region_id,
            scheduler: CategoryScheduler::new(),
        }
    }

    pub fn scheduler(&self) -> &CategoryScheduler {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut CategoryScheduler {
        &mut self.scheduler
    }

    /// Run one refresh pass.
    ///
    /// Later groups may read earlier groups' freshly fetched or carried
    /// values (the long-range demand splice needs the day-ahead series).
    /// Only `InvalidAuth` aborts; every other failure degrades per category.
    pub async fn refresh(
        &mut self,
        now_utc: DateTime<Utc>,
        previous: Option<&GridSnapshot>,
    ) -> Result<GridSnapshot, RefreshError> {
        debug!("starting refresh pass at {now_utc}");

        // Independent scalar categories

        let grid_frequency = refresh_category(
            &mut self.scheduler,
            Category::GridFrequency,
            now_utc,
            previous.and_then(|p| p.grid_frequency),
            self.elexon.current_frequency(now_utc),
        )
        .await?;

        let sell_price = refresh_category(
            &mut self.scheduler,
            Category::SellPrice,
            now_utc,
            previous.and_then(|p| p.sell_price),
            self.elexon.current_price(now_utc),
        )
        .await?;

        let carbon_intensity = {
            let carbon = &self.carbon;
            let region_id = self.carbon_region_id;
            refresh_category(
                &mut self.scheduler,
                Category::CarbonIntensity,
                now_utc,
                previous.and_then(|p| p.carbon_intensity.clone()),
                async move {
                    let mut intensity = carbon.national(now_utc).await?;
                    if let Some(region_id) = region_id {
                        // The regional slice is an enrichment; losing it must
                        // not blank the national figure.
                        match carbon.regional(now_utc, region_id).await {
                            Ok(regional) => intensity.regional = Some(regional),
                            Err(e) => warn!("regional carbon intensity degraded: {e}"),
                        }
                    }
                    Ok(intensity)
                },
            )
            .await?
        };

        let (margin_forecast, system_warnings) = match &self.legacy {
            Some(legacy) => {
                let margin_forecast = refresh_category(
                    &mut self.scheduler,
                    Category::MarginForecast,
                    now_utc,
                    previous.and_then(|p| p.margin_forecast.clone()),
                    legacy.margin_forecast(now_utc),
                )
                .await?;

                let system_warnings = refresh_category(
                    &mut self.scheduler,
                    Category::SystemWarnings,
                    now_utc,
                    previous.and_then(|p| p.system_warnings.clone()),
                    legacy.system_warnings(),
                )
                .await?;

                (margin_forecast, system_warnings)
            }
            None => {
                debug!("no API key configured; margin forecast and system warnings skipped");
                (
                    previous.and_then(|p| p.margin_forecast.clone()),
                    previous.and_then(|p| p.system_warnings.clone()),
                )
            }
        };

        let dfs_requirements = refresh_category(
            &mut self.scheduler,
            Category::DfsRequirements,
            now_utc,
            previous.and_then(|p| p.dfs_requirements.clone()),
            self.neso.dfs_requirements(),
        )
        .await?;

        // Generation composite: fuel mix, embedded merge, wind peaks and the
        // demand/transfer sums refresh or fall back as one unit so they stay
        // mutually consistent.

        let carried_generation = (
            previous.and_then(|p| p.grid_generation.clone()),
            previous.and_then(|p| p.wind_data.clone()),
            previous.and_then(|p| p.total_demand_mwh),
            previous.and_then(|p| p.total_transfers_mwh),
        );

        let (grid_generation, wind_data, total_demand_mwh, total_transfers_mwh) =
            if self.scheduler.is_due(Category::GridGeneration, now_utc) {
                let elexon = &self.elexon;
                let neso = &self.neso;
                let fetch = async move {
                    let mut generation = elexon.generation(now_utc).await?;
                    let embedded = neso.embedded_generation(now_utc).await?;

                    generation.wind_mwh += embedded.wind_mwh;
                    generation.embedded_wind_mwh = embedded.wind_mwh;
                    generation.solar_mwh = embedded.solar_mwh;
                    metrics::apply_derived(&mut generation);

                    let wind_data = elexon.wind_peaks(now_utc).await?;
                    let total_demand = metrics::total_demand(&generation);
                    let total_transfers = metrics::total_transfers(&generation);

                    Ok(group(generation, wind_data, total_demand, total_transfers))
                };

                match fetch_with_fallback(
                    Category::GridGeneration.key(),
                    Some(carried_generation),
                    fetch,
                )
                .await?
                {
                    FetchOutcome::Fresh(fresh) => {
                        self.scheduler.mark_updated(Category::GridGeneration, now_utc);
                        fresh
                    }
                    FetchOutcome::Carried(carried) => {
                        carried.unwrap_or((None, None, None, None))
                    }
                }
            } else {
                carried_generation
            };

        // Long-horizon forecasts

        let wind_forecast = refresh_category(
            &mut self.scheduler,
            Category::WindForecast,
            now_utc,
            previous.and_then(|p| p.wind_forecast.clone()),
            self.elexon.wind_forecast(now_utc),
        )
        .await?;

        let wind_forecast_earliest = refresh_category(
            &mut self.scheduler,
            Category::WindForecastEarliest,
            now_utc,
            previous.and_then(|p| p.wind_forecast_earliest.clone()),
            self.elexon.wind_forecast_earliest(now_utc),
        )
        .await?;

        let long_term_wind_forecast = refresh_category(
            &mut self.scheduler,
            Category::LongTermWindForecast,
            now_utc,
            previous.and_then(|p| p.long_term_wind_forecast.clone()),
            self.neso.long_term_wind_forecast(now_utc),
        )
        .await?;

        let embedded_forecast = refresh_category(
            &mut self.scheduler,
            Category::EmbeddedForecast,
            now_utc,
            previous.and_then(|p| p.embedded_forecast.clone()),
            self.neso.embedded_wind_and_solar_forecast(now_utc),
        )
        .await?;

        let solar_forecast = refresh_category(
            &mut self.scheduler,
            Category::SolarForecast,
            now_utc,
            previous.and_then(|p| p.solar_forecast.clone()),
            self.elexon.solar_forecast(now_utc),
        )
        .await?;

        let demand_day_ahead_forecast = refresh_category(
            &mut self.scheduler,
            Category::DemandDayAhead,
            now_utc,
            previous.and_then(|p| p.demand_day_ahead_forecast.clone()),
            self.elexon.demand_day_ahead(now_utc),
        )
        .await?;

        // The long-range demand splice consumes the day-ahead series (fresh
        // or carried). Without that input it cannot run at all.

        let carried_demand = (
            previous.and_then(|p| p.three_day_demand_forecast.clone()),
            previous.and_then(|p| p.fourteen_day_demand_forecast.clone()),
        );

        let (three_day_demand_forecast, fourteen_day_demand_forecast) =
            if let Some(day_ahead) = &demand_day_ahead_forecast {
                if self.scheduler.is_due(Category::DemandLongTerm, now_utc) {
                    let neso = &self.neso;
                    let fetch = async move {
                        let (three_day, fourteen_day) =
                            neso.demand_forecast(now_utc, day_ahead).await?;
                        Ok(demand_pair(three_day, fourteen_day))
                    };

                    match fetch_with_fallback(
                        Category::DemandLongTerm.key(),
                        Some(carried_demand),
                        fetch,
                    )
                    .await?
                    {
                        FetchOutcome::Fresh(fresh) => {
                            self.scheduler.mark_updated(Category::DemandLongTerm, now_utc);
                            fresh
                        }
                        FetchOutcome::Carried(carried) => carried.unwrap_or((None, None)),
                    }
                } else {
                    carried_demand
                }
            } else {
                debug!("demand long-term forecast skipped: no day-ahead input available");
                carried_demand
            };

        debug!("refresh pass complete");

        Ok(GridSnapshot {
            sell_price,
            grid_frequency,
            carbon_intensity,
            grid_generation,
            wind_data,
            total_demand_mwh,
            total_transfers_mwh,
            wind_forecast,
            wind_forecast_earliest,
            solar_forecast,
            demand_day_ahead_forecast,
            three_day_demand_forecast,
            fourteen_day_demand_forecast,
            long_term_wind_forecast,
            embedded_forecast,
            dfs_requirements,
            margin_forecast,
            system_warnings,
        })
    }
}

type GenerationGroup = (
    Option<GridGeneration>,
    Option<WindPeaks>,
    Option<i64>,
    Option<i64>,
);

fn group(
    generation: GridGeneration,
    wind_data: WindPeaks,
    total_demand: i64,
    total_transfers: i64,
) -> GenerationGroup {
    (
        Some(generation),
        Some(wind_data),
        Some(total_demand),
        Some(total_transfers),
    )
}

fn demand_pair(
    three_day: DemandForecast,
    fourteen_day: DemandForecast,
) -> (Option<DemandForecast>, Option<DemandForecast>) {
    (Some(three_day), Some(fourteen_day))
}
