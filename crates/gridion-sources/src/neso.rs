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

//! Client for the NESO data portal: CKAN datastore queries
//! (`{"result": {"records": [...]}}`) plus one raw CSV download.

use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration as StdDuration;
use tracing::debug;

use gridion_types::{
    DemandDayAheadForecast, DemandForecast, DemandPoint, DfsRequirement, DfsRequirements,
    EmbeddedForecast, ForecastPoint, LongTermWindForecast,
};

use crate::error::{SourceError, SourceResult};
use crate::timefmt;

const DEFAULT_BASE_URL: &str = "https://api.neso.energy";
// CKAN payloads are bulk dumps and need a longer timeout than the JSON APIs
const REQUEST_TIMEOUT_SECS: u64 = 20;

const LONG_TERM_WIND_RESOURCE: &str = "93c3048e-1dab-4057-a2a9-417540583929";
const EMBEDDED_WIND_SOLAR_RESOURCE: &str = "db6c038f-98af-4570-ab60-24d71ebd0ae5";
const DEMAND_FORECAST_RESOURCE: &str = "7c0411cd-2714-4bb5-a408-adb065edf34d";
const DFS_REQUIREMENTS_RESOURCE: &str = "f5605e2b-b677-424c-8df7-d0ce4ee03cef";
const DEMAND_DATA_UPDATE_PATH: &str = "/dataset/7a12172a-939c-404c-b581-a6128b74f588/resource/177f6fa4-ae49-4182-81ea-0c6b35f26ca6/download/demanddataupdate.csv";

/// CKAN datastore columns arrive as numbers or strings depending on how the
/// upstream table was loaded; accept both.
fn flexible_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    flexible_f64(deserializer).map(|v| v as i64)
}

fn flexible_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(v) => Ok(v),
        Raw::Text(s) => s.trim().parse::<f64>().map_err(serde::de::Error::custom),
    }
}

#[derive(Debug, Deserialize)]
struct DatastoreEnvelope<T> {
    result: DatastoreResult<T>,
}

#[derive(Debug, Deserialize)]
struct DatastoreResult<T> {
    records: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct LongTermWindRecord {
    #[serde(rename = "Datetime")]
    datetime: String,
    #[serde(rename = "Wind_Forecast", deserialize_with = "flexible_i64")]
    wind_forecast: i64,
}

#[derive(Debug, Deserialize)]
struct EmbeddedForecastRecord {
    #[serde(rename = "DATE_GMT")]
    date_gmt: String,
    #[serde(rename = "TIME_GMT")]
    time_gmt: String,
    #[serde(rename = "EMBEDDED_SOLAR_FORECAST", deserialize_with = "flexible_i64")]
    embedded_solar_forecast: i64,
    #[serde(rename = "EMBEDDED_WIND_FORECAST", deserialize_with = "flexible_i64")]
    embedded_wind_forecast: i64,
}

#[derive(Debug, Deserialize)]
struct DemandForecastRecord {
    #[serde(rename = "GDATETIME")]
    gdatetime: String,
    #[serde(rename = "NATIONALDEMAND", deserialize_with = "flexible_i64")]
    national_demand: i64,
}

#[derive(Debug, Deserialize)]
struct DfsRecord {
    #[serde(rename = "Delivery Date")]
    delivery_date: String,
    #[serde(rename = "From")]
    from: String,
    #[serde(rename = "To")]
    to: String,
    #[serde(rename = "Service Requirement MW", deserialize_with = "flexible_f64")]
    required_mw: f64,
    #[serde(rename = "Service Requirement Type")]
    requirement_type: String,
    #[serde(rename = "Dispatch Type")]
    dispatch_type: String,
    #[serde(rename = "Participant Bids Eligible")]
    participants_eligible: String,
}

#[derive(Debug, Deserialize)]
struct DemandDataRow {
    #[serde(rename = "SETTLEMENT_DATE")]
    settlement_date: String,
    #[serde(rename = "SETTLEMENT_PERIOD")]
    settlement_period: u32,
    #[serde(rename = "EMBEDDED_WIND_GENERATION")]
    embedded_wind_generation: i64,
    #[serde(rename = "EMBEDDED_SOLAR_GENERATION")]
    embedded_solar_generation: i64,
}

/// Distribution-level wind/solar estimates for the current settlement period
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbeddedActuals {
    pub wind_mwh: i64,
    pub solar_mwh: i64,
}

/// NESO data portal client
#[derive(Debug, Clone)]
pub struct NesoClient {
    base_url: String,
    client: Client,
}

impl NesoClient {
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

    async fn datastore_search<T: DeserializeOwned>(
        &self,
        resource_id: &str,
        extra_query: &str,
        source_name: &str,
    ) -> SourceResult<Vec<T>> {
        let url = format!(
            "{}/api/3/action/datastore_search?resource_id={resource_id}{extra_query}",
            self.base_url,
        );
        debug!("GET {url}");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::UnexpectedStatusCode {
                source_name: source_name.to_owned(),
                status: status.as_u16(),
            });
        }

        let envelope: DatastoreEnvelope<T> = response
            .json()
            .await
            .map_err(|e| SourceError::unexpected(format!("{source_name}: {e}")))?;

        Ok(envelope.result.records)
    }

    /// Embedded wind/solar generation for the current settlement period, from
    /// the half-hourly demand-data CSV update.
    pub async fn embedded_generation(
        &self,
        now_utc: DateTime<Utc>,
    ) -> SourceResult<EmbeddedActuals> {
        let url = format!("{}{DEMAND_DATA_UPDATE_PATH}", self.base_url);
        debug!("GET {url}");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::UnexpectedStatusCode {
                source_name: "embedded generation".to_owned(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let period = timefmt::settlement_period(now_utc);
        let today = now_utc.date_naive();

        let mut reader = csv::Reader::from_reader(body.as_bytes());
        for row in reader.deserialize::<DemandDataRow>() {
            let row = row.map_err(|e| {
                SourceError::unexpected(format!("embedded generation CSV: {e}"))
            })?;
            if timefmt::parse_flexible_date(&row.settlement_date)? == today
                && row.settlement_period == period
            {
                return Ok(EmbeddedActuals {
                    wind_mwh: row.embedded_wind_generation,
                    solar_mwh: row.embedded_solar_generation,
                });
            }
        }

        Err(SourceError::unexpected(
            "embedded generation CSV has no row for the current settlement period",
        ))
    }

    /// Long-range wind forecast cut to the two display horizons
    pub async fn long_term_wind_forecast(
        &self,
        now_utc: DateTime<Utc>,
    ) -> SourceResult<LongTermWindForecast> {
        let records: Vec<LongTermWindRecord> = self
            .datastore_search(LONG_TERM_WIND_RESOURCE, "&limit=32000", "long term wind")
            .await?;

        let nearest = timefmt::ceil_half_hour(now_utc);
        let in_three_days = nearest + Duration::days(3);
        let in_fourteen_days = nearest + Duration::days(14);

        let mut three_day = Vec::new();
        let mut fourteen_day = Vec::new();

        for record in &records {
            let start_time = timefmt::parse_naive_utc(&record.datetime)?;
            let point = ForecastPoint {
                start_time,
                generation: record.wind_forecast,
            };

            if start_time >= nearest && start_time <= in_three_days {
                three_day.push(point);
            }
            if start_time >= nearest
                && start_time <= in_fourteen_days
                && timefmt::is_even_hour_checkpoint(start_time)
            {
                fourteen_day.push(point);
            }
        }

        if three_day.is_empty() || fourteen_day.is_empty() {
            return Err(SourceError::unexpected("long term wind forecast is empty"));
        }

        Ok(LongTermWindForecast {
            three_day,
            fourteen_day,
        })
    }

    /// Embedded wind and solar forecast, both horizons for each fuel
    pub async fn embedded_wind_and_solar_forecast(
        &self,
        now_utc: DateTime<Utc>,
    ) -> SourceResult<EmbeddedForecast> {
        let records: Vec<EmbeddedForecastRecord> = self
            .datastore_search(
                EMBEDDED_WIND_SOLAR_RESOURCE,
                "&limit=32000",
                "embedded wind and solar forecast",
            )
            .await?;

        let nearest = timefmt::ceil_half_hour(now_utc);
        let in_three_days = nearest + Duration::days(3);
        let in_fourteen_days = nearest + Duration::days(14);

        let mut forecast = EmbeddedForecast {
            current_solar: 0,
            current_wind: 0,
            three_day_solar: Vec::new(),
            fourteen_day_solar: Vec::new(),
            three_day_wind: Vec::new(),
            fourteen_day_wind: Vec::new(),
        };

        for record in &records {
            // DATE_GMT carries a full (naive) date-time but only its date is
            // authoritative; the half-hour slot lives in TIME_GMT.
            let date = timefmt::parse_naive_utc(&record.date_gmt)?.date_naive();
            let start_time = timefmt::combine_date_and_time_utc(date, &record.time_gmt)?;

            let solar_point = ForecastPoint {
                start_time,
                generation: record.embedded_solar_forecast,
            };
            let wind_point = ForecastPoint {
                start_time,
                generation: record.embedded_wind_forecast,
            };

            if start_time == nearest {
                forecast.current_solar = record.embedded_solar_forecast;
                forecast.current_wind = record.embedded_wind_forecast;
            }

            if start_time >= nearest && start_time <= in_three_days {
                forecast.three_day_solar.push(solar_point);
                forecast.three_day_wind.push(wind_point);
            }
            if start_time >= nearest
                && start_time <= in_fourteen_days
                && timefmt::is_even_hour_checkpoint(start_time)
            {
                forecast.fourteen_day_solar.push(solar_point);
                forecast.fourteen_day_wind.push(wind_point);
            }
        }

        if forecast.three_day_solar.is_empty()
            || forecast.three_day_wind.is_empty()
            || forecast.fourteen_day_solar.is_empty()
            || forecast.fourteen_day_wind.is_empty()
        {
            return Err(SourceError::unexpected(
                "embedded wind and solar forecast is empty",
            ));
        }

        Ok(forecast)
    }

    /// 3-day and 14-day national demand forecasts.
    ///
    /// The long-range dataset only starts at the next publication day, so the
    /// first ~24 hours are spliced in from the finer day-ahead series the
    /// caller already holds (fresh or carried over).
    pub async fn demand_forecast(
        &self,
        now_utc: DateTime<Utc>,
        day_ahead: &DemandDayAheadForecast,
    ) -> SourceResult<(DemandForecast, DemandForecast)> {
        let records: Vec<DemandForecastRecord> = self
            .datastore_search(DEMAND_FORECAST_RESOURCE, "&limit=1000", "demand forecast")
            .await?;

        let first_record = records
            .first()
            .ok_or_else(|| SourceError::unexpected("demand forecast returned no records"))?;
        let first_record_time = timefmt::parse_naive_utc(&first_record.gdatetime)?;

        let nearest = timefmt::ceil_half_hour(now_utc);
        let in_three_days = nearest + Duration::days(3);
        let in_fourteen_days = nearest + Duration::days(14);

        let mut three_day = Vec::new();
        let mut fourteen_day = Vec::new();

        for item in &day_ahead.forecast {
            if item.start_time >= first_record_time {
                continue;
            }
            three_day.push(DemandPoint {
                start_time: item.start_time,
                national_demand: item.national_demand,
            });
            if timefmt::is_even_hour_checkpoint(item.start_time) {
                fourteen_day.push(DemandPoint {
                    start_time: item.start_time,
                    national_demand: item.national_demand,
                });
            }
        }

        for record in &records {
            let start_time = timefmt::parse_naive_utc(&record.gdatetime)?;
            let point = DemandPoint {
                start_time,
                national_demand: record.national_demand,
            };

            if start_time >= nearest && start_time <= in_three_days {
                three_day.push(point);
            }
            if start_time >= nearest
                && start_time <= in_fourteen_days
                && timefmt::is_even_hour_checkpoint(start_time)
            {
                fourteen_day.push(point);
            }
        }

        if three_day.is_empty() || fourteen_day.is_empty() {
            return Err(SourceError::unexpected("demand forecast is empty"));
        }

        let current_value = three_day
            .iter()
            .find(|p| p.start_time == nearest)
            .map(|p| p.national_demand)
            .unwrap_or(0);

        Ok((
            DemandForecast {
                current_value,
                forecast: three_day,
            },
            DemandForecast {
                current_value,
                forecast: fourteen_day,
            },
        ))
    }

    /// Most recent Demand Flexibility Service requirements (upstream-sorted,
    /// at most ten)
    pub async fn dfs_requirements(&self) -> SourceResult<DfsRequirements> {
        let records: Vec<DfsRecord> = self
            .datastore_search(
                DFS_REQUIREMENTS_RESOURCE,
                "&sort=Delivery%20Date%20desc,From%20desc&limit=10",
                "DFS requirements",
            )
            .await?;

        if records.is_empty() {
            return Err(SourceError::unexpected("DFS requirements returned no records"));
        }

        let mut requirements = Vec::with_capacity(records.len());
        for record in &records {
            let date = timefmt::parse_date(&record.delivery_date)?;
            requirements.push(DfsRequirement {
                start_time: timefmt::combine_date_and_time_utc(date, &record.from)?,
                end_time: timefmt::combine_date_and_time_utc(date, &record.to)?,
                required_mw: record.required_mw,
                requirement_type: record.requirement_type.clone(),
                dispatch_type: record.dispatch_type.clone(),
                participants_eligible: record
                    .participants_eligible
                    .split(',')
                    .map(|p| p.trim().to_owned())
                    .collect(),
            });
        }

        Ok(DfsRequirements { requirements })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use gridion_types::DemandDayAheadPoint;
    use mockito::{Matcher, Server, ServerGuard};
    use serde_json::json;

    async fn client_for(server: &ServerGuard) -> NesoClient {
        NesoClient::new().unwrap().with_base_url(server.url())
    }

    fn fixed_now() -> DateTime<Utc> {
        // Nearest half hour is 12:30
        Utc.with_ymd_and_hms(2025, 1, 10, 12, 7, 0).unwrap()
    }

    fn datastore_body(records: serde_json::Value) -> String {
        json!({"result": {"records": records}}).to_string()
    }

    #[tokio::test]
    async fn test_embedded_generation_selects_current_period() {
        // 12:07 falls in settlement period 25
        let mut server = Server::new_async().await;
        server
            .mock(
                "GET",
                "/dataset/7a12172a-939c-404c-b581-a6128b74f588/resource/177f6fa4-ae49-4182-81ea-0c6b35f26ca6/download/demanddataupdate.csv",
            )
            .with_status(200)
            .with_body(
                "SETTLEMENT_DATE,SETTLEMENT_PERIOD,EMBEDDED_WIND_GENERATION,EMBEDDED_SOLAR_GENERATION\n\
                 2025-01-10,24,2100,800\n\
                 2025-01-10,25,2300,900\n\
                 2025-01-11,25,2500,1000\n",
            )
            .create_async()
            .await;

        let actuals = client_for(&server)
            .await
            .embedded_generation(fixed_now())
            .await
            .unwrap();

        assert_eq!(
            actuals,
            EmbeddedActuals {
                wind_mwh: 2300,
                solar_mwh: 900
            }
        );
    }

    #[tokio::test]
    async fn test_embedded_generation_missing_period_rejected() {
        let mut server = Server::new_async().await;
        server
            .mock(
                "GET",
                Matcher::Regex("demanddataupdate.csv$".to_owned()),
            )
            .with_status(200)
            .with_body(
                "SETTLEMENT_DATE,SETTLEMENT_PERIOD,EMBEDDED_WIND_GENERATION,EMBEDDED_SOLAR_GENERATION\n\
                 2025-01-09,25,2300,900\n",
            )
            .create_async()
            .await;

        let result = client_for(&server)
            .await
            .embedded_generation(fixed_now())
            .await;

        assert!(matches!(result, Err(SourceError::UnexpectedData(_))));
    }

    #[tokio::test]
    async fn test_embedded_generation_status_failure() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", Matcher::Regex("demanddataupdate.csv$".to_owned()))
            .with_status(502)
            .create_async()
            .await;

        let result = client_for(&server)
            .await
            .embedded_generation(fixed_now())
            .await;

        assert!(matches!(
            result,
            Err(SourceError::UnexpectedStatusCode { status: 502, .. })
        ));
    }

    #[tokio::test]
    async fn test_long_term_wind_forecast_horizons() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/3/action/datastore_search")
            .match_query(Matcher::UrlEncoded(
                "resource_id".to_owned(),
                LONG_TERM_WIND_RESOURCE.to_owned(),
            ))
            .with_status(200)
            .with_body(datastore_body(json!([
                {"Datetime": "2025-01-10T12:30:00", "Wind_Forecast": 5000},
                {"Datetime": "2025-01-11T14:00:00", "Wind_Forecast": 6000},
                {"Datetime": "2025-01-11T15:00:00", "Wind_Forecast": 6100},
                {"Datetime": "2025-01-20T16:00:00", "Wind_Forecast": 7000},
                {"Datetime": "2025-02-10T12:00:00", "Wind_Forecast": 9000},
            ])))
            .create_async()
            .await;

        let forecast = client_for(&server)
            .await
            .long_term_wind_forecast(fixed_now())
            .await
            .unwrap();

        // Native resolution inside three days
        assert_eq!(forecast.three_day.len(), 3);
        // Even-hour checkpoints only, out to fourteen days
        let fourteen_times: Vec<_> = forecast
            .fourteen_day
            .iter()
            .map(|p| p.start_time)
            .collect();
        assert_eq!(
            fourteen_times,
            vec![
                Utc.with_ymd_and_hms(2025, 1, 11, 14, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2025, 1, 20, 16, 0, 0).unwrap(),
            ]
        );
    }

    #[tokio::test]
    async fn test_long_term_wind_forecast_empty_rejected() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/3/action/datastore_search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(datastore_body(json!([])))
            .create_async()
            .await;

        let result = client_for(&server)
            .await
            .long_term_wind_forecast(fixed_now())
            .await;

        assert!(matches!(result, Err(SourceError::UnexpectedData(_))));
    }

    #[tokio::test]
    async fn test_embedded_forecast_combines_date_and_time_columns() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/3/action/datastore_search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(datastore_body(json!([
                {
                    "DATE_GMT": "2025-01-10T00:00:00",
                    "TIME_GMT": "12:30",
                    "EMBEDDED_SOLAR_FORECAST": 900,
                    "EMBEDDED_WIND_FORECAST": 2300
                },
                {
                    "DATE_GMT": "2025-01-11T00:00:00",
                    "TIME_GMT": "14:00",
                    "EMBEDDED_SOLAR_FORECAST": "1100",
                    "EMBEDDED_WIND_FORECAST": "2600"
                },
            ])))
            .create_async()
            .await;

        let forecast = client_for(&server)
            .await
            .embedded_wind_and_solar_forecast(fixed_now())
            .await
            .unwrap();

        assert_eq!(forecast.current_solar, 900);
        assert_eq!(forecast.current_wind, 2300);
        assert_eq!(forecast.three_day_solar.len(), 2);
        // Only the 14:00 point is an even-hour checkpoint; its string-typed
        // CKAN columns parse too
        assert_eq!(forecast.fourteen_day_wind.len(), 1);
        assert_eq!(forecast.fourteen_day_wind[0].generation, 2600);
    }

    #[tokio::test]
    async fn test_demand_forecast_splices_day_ahead_prefix() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/3/action/datastore_search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(datastore_body(json!([
                {"GDATETIME": "2025-01-11T00:00:00", "NATIONALDEMAND": 29000},
                {"GDATETIME": "2025-01-11T02:00:00", "NATIONALDEMAND": 28000},
                {"GDATETIME": "2025-01-15T08:00:00", "NATIONALDEMAND": 33000},
            ])))
            .create_async()
            .await;

        let day_ahead = DemandDayAheadForecast {
            current_value: 31000,
            forecast: vec![
                DemandDayAheadPoint {
                    start_time: Utc.with_ymd_and_hms(2025, 1, 10, 12, 30, 0).unwrap(),
                    national_demand: 31000,
                    transmission_demand: 28000,
                },
                DemandDayAheadPoint {
                    start_time: Utc.with_ymd_and_hms(2025, 1, 10, 14, 0, 0).unwrap(),
                    national_demand: 31500,
                    transmission_demand: 28400,
                },
                DemandDayAheadPoint {
                    // Already covered by the long-range dataset; not spliced
                    start_time: Utc.with_ymd_and_hms(2025, 1, 11, 0, 0, 0).unwrap(),
                    national_demand: 29100,
                    transmission_demand: 26000,
                },
            ],
        };

        let (three_day, fourteen_day) = client_for(&server)
            .await
            .demand_forecast(fixed_now(), &day_ahead)
            .await
            .unwrap();

        // Day-ahead prefix + both in-window records
        assert_eq!(three_day.forecast.len(), 4);
        assert_eq!(three_day.current_value, 31000);
        assert_eq!(three_day.forecast[0].national_demand, 31000);

        // 14:00 from the prefix plus the even-hour records
        let fourteen_times: Vec<_> = fourteen_day
            .forecast
            .iter()
            .map(|p| p.start_time)
            .collect();
        assert_eq!(
            fourteen_times,
            vec![
                Utc.with_ymd_and_hms(2025, 1, 10, 14, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2025, 1, 11, 0, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2025, 1, 11, 2, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2025, 1, 15, 8, 0, 0).unwrap(),
            ]
        );
    }

    #[tokio::test]
    async fn test_demand_forecast_no_records_rejected() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/3/action/datastore_search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(datastore_body(json!([])))
            .create_async()
            .await;

        let day_ahead = DemandDayAheadForecast {
            current_value: 0,
            forecast: vec![],
        };
        let result = client_for(&server)
            .await
            .demand_forecast(fixed_now(), &day_ahead)
            .await;

        assert!(matches!(result, Err(SourceError::UnexpectedData(_))));
    }

    #[tokio::test]
    async fn test_dfs_requirements_parse() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/3/action/datastore_search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(datastore_body(json!([
                {
                    "Delivery Date": "2025-01-09",
                    "From": "17:00",
                    "To": "18:30",
                    "Service Requirement MW": 350.5,
                    "Service Requirement Type": "System Test",
                    "Dispatch Type": "Scheduled",
                    "Participant Bids Eligible": "In-day, Day-ahead"
                }
            ])))
            .create_async()
            .await;

        let requirements = client_for(&server)
            .await
            .dfs_requirements()
            .await
            .unwrap();

        assert_eq!(requirements.requirements.len(), 1);
        let requirement = &requirements.requirements[0];
        assert_eq!(
            requirement.start_time,
            Utc.with_ymd_and_hms(2025, 1, 9, 17, 0, 0).unwrap()
        );
        assert_eq!(
            requirement.end_time,
            Utc.with_ymd_and_hms(2025, 1, 9, 18, 30, 0).unwrap()
        );
        assert!((requirement.required_mw - 350.5).abs() < f64::EPSILON);
        assert_eq!(
            requirement.participants_eligible,
            vec!["In-day".to_owned(), "Day-ahead".to_owned()]
        );
    }

    #[tokio::test]
    async fn test_dfs_requirements_empty_rejected() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/3/action/datastore_search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(datastore_body(json!([])))
            .create_async()
            .await;

        let result = client_for(&server).await.dfs_requirements().await;

        assert!(matches!(result, Err(SourceError::UnexpectedData(_))));
    }
}
