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

//! Client for the Elexon Insights API (JSON, `{"data": [...]}` envelope)

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Europe::London;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::time::Duration as StdDuration;
use tracing::debug;

use gridion_types::{
    DemandDayAheadForecast, DemandDayAheadPoint, ForecastPoint, GridGeneration, SolarForecast,
    WindForecast, WindPeaks,
};

use crate::error::{SourceError, SourceResult};
use crate::timefmt;

const DEFAULT_BASE_URL: &str = "https://data.elexon.co.uk/bmrs/api/v1";
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Query timestamp format the Insights API expects (`2025-01-10T12:30:00Z`)
fn query_time(t: DateTime<Utc>) -> String {
    t.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct FrequencyRecord {
    frequency: f64,
}

#[derive(Debug, Deserialize)]
struct MarketIndexRecord {
    price: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FuelInstRecord {
    publish_time: String,
    start_time: String,
    fuel_type: String,
    generation: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WindForecastRecord {
    start_time: String,
    generation: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WindPeakRecord {
    settlement_date: String,
    start_time: String,
    generation: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DayAheadGenerationRecord {
    business_type: String,
    settlement_date: String,
    settlement_period: u32,
    quantity: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DemandDayAheadRecord {
    start_time: String,
    national_demand: i64,
    transmission_system_demand: i64,
}

/// Elexon Insights API client
#[derive(Debug, Clone)]
pub struct ElexonClient {
    base_url: String,
    client: Client,
}

impl ElexonClient {
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
        path_and_query: &str,
        source_name: &str,
    ) -> SourceResult<T> {
        let url = format!("{}{}", self.base_url, path_and_query);
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

    /// Latest measured grid frequency (Hz) within the last few minutes
    pub async fn current_frequency(&self, now_utc: DateTime<Utc>) -> SourceResult<f64> {
        let path = format!(
            "/system/frequency?format=json&from={}&to={}",
            query_time(now_utc - Duration::minutes(5)),
            query_time(now_utc + Duration::minutes(1)),
        );
        let envelope: DataEnvelope<FrequencyRecord> =
            self.get_json(&path, "system frequency").await?;

        envelope
            .data
            .last()
            .map(|r| r.frequency)
            .ok_or_else(|| SourceError::unexpected("system frequency returned no items"))
    }

    /// Current market clearing price, rounded to two decimals
    pub async fn current_price(&self, now_utc: DateTime<Utc>) -> SourceResult<f64> {
        let today = now_utc.format("%Y-%m-%d");
        let yesterday = (now_utc - Duration::days(1)).format("%Y-%m-%d");
        let path = format!(
            "/balancing/pricing/market-index?from={yesterday}&to={today}\
             &settlementPeriodFrom=1&settlementPeriodTo=50&dataProviders=APXMIDP&format=json",
        );
        let envelope: DataEnvelope<MarketIndexRecord> =
            self.get_json(&path, "market index price").await?;

        let first = envelope
            .data
            .first()
            .ok_or_else(|| SourceError::unexpected("market index returned no items"))?;

        Ok((first.price * 100.0).round() / 100.0)
    }

    /// Transmission-level fuel-mix generation for the most recent published
    /// instant.
    ///
    /// The returned record carries raw per-fuel figures only; the embedded
    /// merge and the derived totals are the orchestrator's job. Multiple fuel
    /// codes fold into one logical field (both gas turbine types, the three
    /// France links, the three Ireland links).
    pub async fn generation(&self, now_utc: DateTime<Utc>) -> SourceResult<GridGeneration> {
        let path = format!(
            "/datasets/FUELINST?publishDateTimeFrom={}&publishDateTimeTo={}&format=json",
            query_time(now_utc - Duration::minutes(10)),
            query_time(now_utc),
        );
        let envelope: DataEnvelope<FuelInstRecord> = self.get_json(&path, "fuel mix").await?;

        let mut latest: Option<(&str, &str)> = None;
        for item in &envelope.data {
            match latest {
                // ISO timestamps compare correctly as strings within one zone
                Some((start, _)) if item.start_time.as_str() <= start => {}
                _ => latest = Some((item.start_time.as_str(), item.publish_time.as_str())),
            }
        }
        let (latest_start, latest_publish) =
            latest.ok_or_else(|| SourceError::unexpected("fuel mix returned no items"))?;

        let mut generation = GridGeneration::empty(timefmt::parse_rfc3339_utc(latest_publish)?);

        for item in &envelope.data {
            if item.start_time != latest_start {
                continue;
            }
            match item.fuel_type.as_str() {
                "CCGT" | "OCGT" => generation.gas_mwh += item.generation,
                "OIL" => generation.oil_mwh = item.generation,
                "COAL" => generation.coal_mwh = item.generation,
                "BIOMASS" => generation.biomass_mwh = item.generation,
                "NUCLEAR" => generation.nuclear_mwh = item.generation,
                "WIND" => {
                    generation.wind_mwh = item.generation;
                    generation.national_wind_mwh = item.generation;
                }
                "PS" => generation.pumped_storage_mwh = item.generation,
                "NPSHYD" => generation.hydro_mwh = item.generation,
                "OTHER" => generation.other_mwh = item.generation,
                "INTFR" | "INTELEC" | "INTIFA2" => generation.france_mwh += item.generation,
                "INTIRL" | "INTEW" | "INTGRNL" => generation.ireland_mwh += item.generation,
                "INTNED" => generation.netherlands_mwh = item.generation,
                "INTNEM" => generation.belgium_mwh = item.generation,
                "INTNSL" => generation.norway_mwh = item.generation,
                "INTVKL" => generation.denmark_mwh = item.generation,
                _ => {}
            }
        }

        // These five are never all zero on a healthy grid; all-zero means the
        // feed published a hollow frame.
        if generation.gas_mwh == 0
            && generation.coal_mwh == 0
            && generation.biomass_mwh == 0
            && generation.nuclear_mwh == 0
            && generation.hydro_mwh == 0
        {
            return Err(SourceError::unexpected(
                "fuel mix returned numerous zero values",
            ));
        }

        Ok(generation)
    }

    /// Hourly wind forecast, latest revision
    pub async fn wind_forecast(&self, now_utc: DateTime<Utc>) -> SourceResult<WindForecast> {
        self.fetch_wind_forecast(now_utc, "latest").await
    }

    /// Hourly wind forecast, earliest (first-published) revision
    pub async fn wind_forecast_earliest(
        &self,
        now_utc: DateTime<Utc>,
    ) -> SourceResult<WindForecast> {
        self.fetch_wind_forecast(now_utc, "earliest").await
    }

    async fn fetch_wind_forecast(
        &self,
        now_utc: DateTime<Utc>,
        revision: &str,
    ) -> SourceResult<WindForecast> {
        let (start, end) = timefmt::wind_forecast_window(now_utc);
        let path = format!(
            "/forecast/generation/wind/{revision}?from={}&to={}&format=json",
            start.format("%Y-%m-%dT%H:%M:%S"),
            end.format("%Y-%m-%dT%H:%M:%S"),
        );
        let envelope: DataEnvelope<WindForecastRecord> =
            self.get_json(&path, "wind forecast").await?;

        let current_hour = timefmt::truncate_hour(now_utc);
        let mut forecast = Vec::with_capacity(envelope.data.len());
        let mut current_generation = 0;

        for item in &envelope.data {
            let start_time = timefmt::parse_rfc3339_utc(&item.start_time)?;
            forecast.push(ForecastPoint {
                start_time,
                generation: item.generation,
            });
            if start_time == current_hour {
                current_generation = item.generation;
            }
        }

        // A zero "current" hour is implausible for national wind; it means the
        // window missed the publication roll-over and the data is stale.
        if current_generation == 0 {
            return Err(SourceError::unexpected(format!(
                "{revision} wind forecast 'current' is 0"
            )));
        }

        Ok(WindForecast {
            current_value: current_generation,
            forecast,
        })
    }

    /// Today's and tomorrow's forecast wind peak.
    ///
    /// The peak dataset is keyed by local settlement date, so the lookup days
    /// come from London time rather than UTC.
    pub async fn wind_peaks(&self, now_utc: DateTime<Utc>) -> SourceResult<WindPeaks> {
        let london_today = now_utc.with_timezone(&London).date_naive();
        let today = london_today.format("%Y-%m-%d").to_string();
        let tomorrow = (london_today + Duration::days(1))
            .format("%Y-%m-%d")
            .to_string();

        let envelope: DataEnvelope<WindPeakRecord> = self
            .get_json("/forecast/generation/wind/peak?format=json", "wind peak")
            .await?;

        let find = |date: &str| -> SourceResult<(f64, DateTime<Utc>)> {
            envelope
                .data
                .iter()
                .find(|item| item.settlement_date == date)
                .ok_or_else(|| SourceError::unexpected(format!("wind peak missing day {date}")))
                .and_then(|item| {
                    Ok((item.generation, timefmt::parse_rfc3339_utc(&item.start_time)?))
                })
        };

        let (today_peak, today_peak_time) = find(&today)?;
        let (tomorrow_peak, tomorrow_peak_time) = find(&tomorrow)?;

        Ok(WindPeaks {
            today_peak,
            tomorrow_peak,
            today_peak_time,
            tomorrow_peak_time,
        })
    }

    /// Half-hourly solar forecast from the day-ahead wind-and-solar dataset.
    ///
    /// Records are de-duplicated by (settlement date, settlement period); a
    /// matched zero is a normal overnight reading, but a window with no point
    /// for the current half hour at all is stale.
    pub async fn solar_forecast(&self, now_utc: DateTime<Utc>) -> SourceResult<SolarForecast> {
        let from = (now_utc - Duration::days(1)).format("%Y-%m-%d");
        let to = (now_utc + Duration::days(2)).format("%Y-%m-%d");
        let path = format!(
            "/forecast/generation/wind-and-solar/day-ahead?from={from}&to={to}\
             &processType=all&settlementPeriodFrom=1&settlementPeriodTo=50&format=json",
        );
        let envelope: DataEnvelope<DayAheadGenerationRecord> =
            self.get_json(&path, "solar forecast").await?;

        let nearest_half_hour = timefmt::ceil_half_hour(now_utc);
        let mut seen = HashSet::new();
        let mut forecast = Vec::new();
        let mut current_value = 0;
        let mut current_found = false;

        for item in &envelope.data {
            if item.business_type != "Solar generation" {
                continue;
            }
            if !seen.insert((item.settlement_date.clone(), item.settlement_period)) {
                continue;
            }

            let start_time = timefmt::parse_date(&item.settlement_date)?
                .and_hms_opt(0, 0, 0)
                .map(|t| t.and_utc())
                .ok_or_else(|| SourceError::unexpected("bad settlement date"))?
                + timefmt::period_offset(item.settlement_period);

            let generation = item.quantity as i64;
            forecast.push(ForecastPoint {
                start_time,
                generation,
            });

            if start_time == nearest_half_hour {
                current_value = generation;
                current_found = true;
            }
        }

        if forecast.is_empty() {
            return Err(SourceError::unexpected("solar forecast is empty"));
        }
        if !current_found {
            return Err(SourceError::unexpected(
                "solar forecast has no point for the current half hour",
            ));
        }

        forecast.sort_by_key(|p| p.start_time);

        Ok(SolarForecast {
            current_value,
            forecast,
        })
    }

    /// National demand forecast for the next two days at half-hour resolution
    pub async fn demand_day_ahead(
        &self,
        now_utc: DateTime<Utc>,
    ) -> SourceResult<DemandDayAheadForecast> {
        let path = format!(
            "/forecast/demand/day-ahead/latest?format=json&from={}&to={}&boundary=N",
            query_time(now_utc),
            query_time(now_utc + Duration::days(2)),
        );
        let envelope: DataEnvelope<DemandDayAheadRecord> =
            self.get_json(&path, "demand day-ahead").await?;

        if envelope.data.is_empty() {
            return Err(SourceError::unexpected("demand day-ahead returned no items"));
        }

        let nearest_half_hour = timefmt::ceil_half_hour(now_utc);
        let mut current_value = 0;
        let mut forecast = Vec::with_capacity(envelope.data.len());

        for item in &envelope.data {
            let start_time = timefmt::parse_rfc3339_utc(&item.start_time)?;
            if start_time == nearest_half_hour {
                current_value = item.national_demand;
            }
            forecast.push(DemandDayAheadPoint {
                start_time,
                national_demand: item.national_demand,
                transmission_demand: item.transmission_system_demand,
            });
        }

        Ok(DemandDayAheadForecast {
            current_value,
            forecast,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use mockito::{Matcher, Server, ServerGuard};
    use serde_json::json;

    async fn client_for(server: &ServerGuard) -> ElexonClient {
        ElexonClient::new().unwrap().with_base_url(server.url())
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 10, 12, 7, 0).unwrap()
    }

    #[tokio::test]
    async fn test_current_frequency_returns_last_item() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/system/frequency")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({"data": [
                    {"frequency": 49.91},
                    {"frequency": 50.04}
                ]})
                .to_string(),
            )
            .create_async()
            .await;

        let frequency = client_for(&server)
            .await
            .current_frequency(fixed_now())
            .await
            .unwrap();

        assert!((frequency - 50.04).abs() < f64::EPSILON);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_current_frequency_empty_is_unexpected_data() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/system/frequency")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(json!({"data": []}).to_string())
            .create_async()
            .await;

        let result = client_for(&server)
            .await
            .current_frequency(fixed_now())
            .await;

        assert!(matches!(result, Err(SourceError::UnexpectedData(_))));
    }

    #[tokio::test]
    async fn test_current_frequency_non_200_is_status_failure() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/system/frequency")
            .match_query(Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let result = client_for(&server)
            .await
            .current_frequency(fixed_now())
            .await;

        assert!(matches!(
            result,
            Err(SourceError::UnexpectedStatusCode { status: 503, .. })
        ));
    }

    #[tokio::test]
    async fn test_current_price_rounds_to_two_decimals() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/balancing/pricing/market-index")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(json!({"data": [{"price": 85.1278}, {"price": 90.0}]}).to_string())
            .create_async()
            .await;

        let price = client_for(&server)
            .await
            .current_price(fixed_now())
            .await
            .unwrap();

        assert!((price - 85.13).abs() < f64::EPSILON);
    }

    fn fuelinst_item(fuel_type: &str, generation: i64) -> serde_json::Value {
        json!({
            "publishTime": "2025-01-10T12:05:00Z",
            "startTime": "2025-01-10T12:00:00Z",
            "fuelType": fuel_type,
            "generation": generation
        })
    }

    #[tokio::test]
    async fn test_generation_sums_multi_code_fuels() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/datasets/FUELINST")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                json!({"data": [
                    fuelinst_item("CCGT", 9000),
                    fuelinst_item("OCGT", 120),
                    fuelinst_item("NUCLEAR", 4000),
                    fuelinst_item("NPSHYD", 300),
                    fuelinst_item("INTFR", 1000),
                    fuelinst_item("INTELEC", 500),
                    fuelinst_item("INTIFA2", 250),
                    fuelinst_item("INTIRL", -100),
                    fuelinst_item("INTEW", 50),
                ]})
                .to_string(),
            )
            .create_async()
            .await;

        let generation = client_for(&server)
            .await
            .generation(fixed_now())
            .await
            .unwrap();

        assert_eq!(generation.gas_mwh, 9120);
        assert_eq!(generation.france_mwh, 1750);
        assert_eq!(generation.ireland_mwh, -50);
        assert_eq!(generation.nuclear_mwh, 4000);
        assert_eq!(
            generation.grid_collection_time,
            Utc.with_ymd_and_hms(2025, 1, 10, 12, 5, 0).unwrap()
        );
    }

    #[tokio::test]
    async fn test_generation_keeps_only_latest_start_time() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/datasets/FUELINST")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                json!({"data": [
                    {
                        "publishTime": "2025-01-10T12:00:00Z",
                        "startTime": "2025-01-10T11:55:00Z",
                        "fuelType": "CCGT",
                        "generation": 100
                    },
                    {
                        "publishTime": "2025-01-10T12:05:00Z",
                        "startTime": "2025-01-10T12:00:00Z",
                        "fuelType": "CCGT",
                        "generation": 9000
                    },
                    {
                        "publishTime": "2025-01-10T12:05:00Z",
                        "startTime": "2025-01-10T12:00:00Z",
                        "fuelType": "NUCLEAR",
                        "generation": 4000
                    },
                ]})
                .to_string(),
            )
            .create_async()
            .await;

        let generation = client_for(&server)
            .await
            .generation(fixed_now())
            .await
            .unwrap();

        assert_eq!(generation.gas_mwh, 9000);
    }

    #[tokio::test]
    async fn test_generation_all_zero_sentinels_rejected() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/datasets/FUELINST")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                json!({"data": [
                    fuelinst_item("CCGT", 0),
                    fuelinst_item("COAL", 0),
                    fuelinst_item("BIOMASS", 0),
                    fuelinst_item("NUCLEAR", 0),
                    fuelinst_item("NPSHYD", 0),
                    fuelinst_item("WIND", 5000),
                ]})
                .to_string(),
            )
            .create_async()
            .await;

        let result = client_for(&server).await.generation(fixed_now()).await;

        assert!(matches!(result, Err(SourceError::UnexpectedData(_))));
    }

    #[tokio::test]
    async fn test_wind_forecast_current_hour_match() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/forecast/generation/wind/latest")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                json!({"data": [
                    {"startTime": "2025-01-10T11:00:00Z", "generation": 4100},
                    {"startTime": "2025-01-10T12:00:00Z", "generation": 4600},
                    {"startTime": "2025-01-10T13:00:00Z", "generation": 5200},
                ]})
                .to_string(),
            )
            .create_async()
            .await;

        let forecast = client_for(&server)
            .await
            .wind_forecast(fixed_now())
            .await
            .unwrap();

        assert_eq!(forecast.current_value, 4600);
        assert_eq!(forecast.forecast.len(), 3);
    }

    #[tokio::test]
    async fn test_wind_forecast_missing_current_hour_rejected() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/forecast/generation/wind/latest")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                json!({"data": [
                    {"startTime": "2025-01-10T09:00:00Z", "generation": 4100},
                    {"startTime": "2025-01-10T10:00:00Z", "generation": 4600},
                ]})
                .to_string(),
            )
            .create_async()
            .await;

        let result = client_for(&server).await.wind_forecast(fixed_now()).await;

        assert!(matches!(result, Err(SourceError::UnexpectedData(_))));
    }

    #[tokio::test]
    async fn test_wind_peaks_matched_by_settlement_date() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/forecast/generation/wind/peak")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                json!({"data": [
                    {"settlementDate": "2025-01-09", "startTime": "2025-01-09T03:00:00Z", "generation": 9100.0},
                    {"settlementDate": "2025-01-10", "startTime": "2025-01-10T15:00:00Z", "generation": 11200.0},
                    {"settlementDate": "2025-01-11", "startTime": "2025-01-11T02:00:00Z", "generation": 9400.0},
                ]})
                .to_string(),
            )
            .create_async()
            .await;

        let peaks = client_for(&server)
            .await
            .wind_peaks(fixed_now())
            .await
            .unwrap();

        assert!((peaks.today_peak - 11200.0).abs() < f64::EPSILON);
        assert!((peaks.tomorrow_peak - 9400.0).abs() < f64::EPSILON);
        assert_eq!(
            peaks.tomorrow_peak_time,
            Utc.with_ymd_and_hms(2025, 1, 11, 2, 0, 0).unwrap()
        );
    }

    #[tokio::test]
    async fn test_wind_peaks_missing_tomorrow_rejected() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/forecast/generation/wind/peak")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                json!({"data": [
                    {"settlementDate": "2025-01-10", "startTime": "2025-01-10T15:00:00Z", "generation": 11200.0},
                ]})
                .to_string(),
            )
            .create_async()
            .await;

        let result = client_for(&server).await.wind_peaks(fixed_now()).await;

        assert!(matches!(result, Err(SourceError::UnexpectedData(_))));
    }

    fn solar_item(date: &str, period: u32, quantity: f64) -> serde_json::Value {
        json!({
            "businessType": "Solar generation",
            "settlementDate": date,
            "settlementPeriod": period,
            "quantity": quantity
        })
    }

    #[tokio::test]
    async fn test_solar_forecast_dedupes_and_filters() {
        // fixed_now is 12:07, so the current half hour is 12:30 = period 26
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/forecast/generation/wind-and-solar/day-ahead")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                json!({"data": [
                    solar_item("2025-01-10", 26, 2100.0),
                    solar_item("2025-01-10", 26, 9999.0),
                    solar_item("2025-01-10", 27, 1900.0),
                    {
                        "businessType": "Wind generation",
                        "settlementDate": "2025-01-10",
                        "settlementPeriod": 26,
                        "quantity": 4600.0
                    },
                ]})
                .to_string(),
            )
            .create_async()
            .await;

        let forecast = client_for(&server)
            .await
            .solar_forecast(fixed_now())
            .await
            .unwrap();

        assert_eq!(forecast.current_value, 2100);
        assert_eq!(forecast.forecast.len(), 2);
        assert!(forecast.forecast.windows(2).all(|w| w[0].start_time <= w[1].start_time));
    }

    #[tokio::test]
    async fn test_solar_forecast_zero_current_is_legitimate() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/forecast/generation/wind-and-solar/day-ahead")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(json!({"data": [solar_item("2025-01-10", 26, 0.0)]}).to_string())
            .create_async()
            .await;

        let forecast = client_for(&server)
            .await
            .solar_forecast(fixed_now())
            .await
            .unwrap();

        assert_eq!(forecast.current_value, 0);
    }

    #[tokio::test]
    async fn test_solar_forecast_missing_current_point_rejected() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/forecast/generation/wind-and-solar/day-ahead")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(json!({"data": [solar_item("2025-01-10", 30, 1500.0)]}).to_string())
            .create_async()
            .await;

        let result = client_for(&server).await.solar_forecast(fixed_now()).await;

        assert!(matches!(result, Err(SourceError::UnexpectedData(_))));
    }

    #[tokio::test]
    async fn test_demand_day_ahead_current_value() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/forecast/demand/day-ahead/latest")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                json!({"data": [
                    {
                        "startTime": "2025-01-10T12:30:00Z",
                        "nationalDemand": 31000,
                        "transmissionSystemDemand": 28000
                    },
                    {
                        "startTime": "2025-01-10T13:00:00Z",
                        "nationalDemand": 32000,
                        "transmissionSystemDemand": 29000
                    },
                ]})
                .to_string(),
            )
            .create_async()
            .await;

        let forecast = client_for(&server)
            .await
            .demand_day_ahead(fixed_now())
            .await
            .unwrap();

        assert_eq!(forecast.current_value, 31000);
        assert_eq!(forecast.forecast.len(), 2);
        assert_eq!(forecast.forecast[0].transmission_demand, 28000);
    }

    #[tokio::test]
    async fn test_demand_day_ahead_empty_rejected() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/forecast/demand/day-ahead/latest")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(json!({"data": []}).to_string())
            .create_async()
            .await;

        let result = client_for(&server).await.demand_day_ahead(fixed_now()).await;

        assert!(matches!(result, Err(SourceError::UnexpectedData(_))));
    }
}
