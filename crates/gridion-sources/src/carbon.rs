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

//! Client for the national carbon intensity API

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration as StdDuration;
use tracing::{debug, warn};

use gridion_types::{CarbonIntensity, CarbonIntensityPoint, RegionalCarbonIntensity};

use crate::error::{SourceError, SourceResult};
use crate::timefmt;

const DEFAULT_BASE_URL: &str = "https://api.carbonintensity.org.uk";
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Path timestamp format the API expects (`2025-01-10T12:30Z`)
fn query_instant(t: DateTime<Utc>) -> String {
    t.format("%Y-%m-%dT%H:%MZ").to_string()
}

#[derive(Debug, Deserialize)]
struct IntensityEnvelope {
    data: Vec<IntensitySlot>,
}

#[derive(Debug, Deserialize)]
struct IntensitySlot {
    from: String,
    to: String,
    intensity: IntensityValues,
}

#[derive(Debug, Deserialize)]
struct IntensityValues {
    forecast: Option<i64>,
    actual: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct RegionalListEnvelope {
    data: Vec<RegionalBlock>,
}

#[derive(Debug, Deserialize)]
struct RegionalObjectEnvelope {
    data: RegionalBlock,
}

#[derive(Debug, Deserialize)]
struct RegionalBlock {
    regionid: u32,
    shortname: String,
    data: Vec<IntensitySlot>,
}

/// carbonintensity.org.uk client
#[derive(Debug, Clone)]
pub struct CarbonClient {
    base_url: String,
    client: Client,
}

impl CarbonClient {
    pub fn new() -> SourceResult<Self> {
        let client = Client::builder()
            .timeout(StdDuration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            client,
        })
    }

    /// Point the client at a different base URL (tests, proxies)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        source_name: &str,
    ) -> SourceResult<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {url}");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::UnexpectedStatusCode {
                source_name: source_name.to_owned(),
                status: status.as_u16(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| SourceError::unexpected(format!("{source_name}: {e}")))
    }

    fn slots_to_points(slots: &[IntensitySlot]) -> SourceResult<Vec<CarbonIntensityPoint>> {
        let mut points = Vec::with_capacity(slots.len());
        for slot in slots {
            // Slots occasionally publish without a forecast figure; skip them
            // rather than failing the whole series.
            let Some(forecast) = slot.intensity.forecast else {
                continue;
            };
            points.push(CarbonIntensityPoint {
                from: timefmt::parse_minute_z_utc(&slot.from)?,
                to: timefmt::parse_minute_z_utc(&slot.to)?,
                forecast,
            });
        }
        Ok(points)
    }

    /// National carbon intensity: newest measured value over the past 24 h,
    /// plus the 48 h forward view.
    ///
    /// The forecast is best-effort: a failing forward call degrades to an
    /// empty list instead of failing the category.
    pub async fn national(&self, now_utc: DateTime<Utc>) -> SourceResult<CarbonIntensity> {
        let envelope: IntensityEnvelope = self
            .get_json(
                &format!("/intensity/{}/pt24h", query_instant(now_utc)),
                "carbon intensity",
            )
            .await?;

        let current = envelope
            .data
            .iter()
            .rev()
            .find_map(|slot| slot.intensity.actual)
            .ok_or_else(|| {
                SourceError::unexpected("carbon intensity has no measured value in window")
            })?;

        let forecast = match self.national_forecast(now_utc).await {
            Ok(points) => points,
            Err(e) => {
                warn!("carbon intensity forecast degraded to empty: {e}");
                Vec::new()
            }
        };

        Ok(CarbonIntensity {
            current,
            forecast,
            regional: None,
        })
    }

    async fn national_forecast(
        &self,
        now_utc: DateTime<Utc>,
    ) -> SourceResult<Vec<CarbonIntensityPoint>> {
        let envelope: IntensityEnvelope = self
            .get_json(
                &format!("/intensity/{}/fw48h", query_instant(now_utc)),
                "carbon intensity forecast",
            )
            .await?;

        Self::slots_to_points(&envelope.data)
    }

    /// Region-scoped intensity. The primary call supplies the region name and
    /// current value; the secondary 48 h call degrades like the national one.
    pub async fn regional(
        &self,
        now_utc: DateTime<Utc>,
        region_id: u32,
    ) -> SourceResult<RegionalCarbonIntensity> {
        let envelope: RegionalListEnvelope = self
            .get_json(
                &format!("/regional/regionid/{region_id}"),
                "regional carbon intensity",
            )
            .await?;

        let block = envelope.data.first().ok_or_else(|| {
            SourceError::unexpected("regional carbon intensity returned no region block")
        })?;

        let current = block
            .data
            .first()
            .and_then(|slot| slot.intensity.forecast)
            .ok_or_else(|| {
                SourceError::unexpected("regional carbon intensity has no current value")
            })?;

        let forecast = match self.regional_forecast(now_utc, region_id).await {
            Ok(points) => points,
            Err(e) => {
                warn!("regional carbon intensity forecast degraded to empty: {e}");
                Vec::new()
            }
        };

        Ok(RegionalCarbonIntensity {
            region_id: block.regionid,
            region_name: block.shortname.clone(),
            current,
            forecast,
        })
    }

    async fn regional_forecast(
        &self,
        now_utc: DateTime<Utc>,
        region_id: u32,
    ) -> SourceResult<Vec<CarbonIntensityPoint>> {
        let envelope: RegionalObjectEnvelope = self
            .get_json(
                &format!(
                    "/regional/intensity/{}/fw48h/regionid/{region_id}",
                    query_instant(now_utc),
                ),
                "regional carbon intensity forecast",
            )
            .await?;

        Self::slots_to_points(&envelope.data.data)
    }
}
