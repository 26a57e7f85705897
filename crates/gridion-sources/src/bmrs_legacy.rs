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

//! Client for the legacy keyed XML reports (system warnings, margin forecast).
//!
//! Responses come wrapped in the old envelope:
//!
//! ```text
//! <response>
//!   <responseMetadata><httpCode>200</httpCode>...</responseMetadata>
//!   <responseBody><responseList><item>...</item></responseList></responseBody>
//! </response>
//! ```
//!
//! A body with exactly one record ships the `<item>` without any list
//! wrapper; the event-based reader below collects items one by one, so both
//! shapes normalize to the same `Vec`.

use chrono::{DateTime, Utc};
use quick_xml::Reader;
use quick_xml::events::Event;
use reqwest::{Client, StatusCode};
use std::collections::HashMap;
use std::time::Duration as StdDuration;
use tracing::debug;

use gridion_types::{MarginForecast, MarginForecastPoint, SystemWarning, SystemWarnings};

use crate::error::{SourceError, SourceResult};
use crate::timefmt;

const DEFAULT_BASE_URL: &str = "https://api.bmreports.com";
const REQUEST_TIMEOUT_SECS: u64 = 10;

type XmlItem = HashMap<String, String>;

/// Legacy keyed XML report client
#[derive(Debug, Clone)]
pub struct BmrsLegacyClient {
    base_url: String,
    api_key: String,
    client: Client,
}

impl BmrsLegacyClient {
    pub fn new(api_key: impl Into<String>) -> SourceResult<Self> {
        let client = Client::builder()
            .timeout(StdDuration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            api_key: api_key.into(),
            client,
        })
    }

    /// Point the client at a different base URL (tests, proxies)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn get_report(&self, report: &str, source_name: &str) -> SourceResult<Vec<XmlItem>> {
        let url = format!(
            "{}/BMRS/{report}/v1?APIKey={}&ServiceType=xml",
            self.base_url, self.api_key,
        );
        debug!("GET {}/BMRS/{report}/v1", self.base_url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(SourceError::InvalidAuth);
            }
            s if !s.is_success() => {
                return Err(SourceError::UnexpectedStatusCode {
                    source_name: source_name.to_owned(),
                    status: s.as_u16(),
                });
            }
            _ => {}
        }

        let body = response.text().await?;
        parse_envelope(&body, source_name)
    }

    /// All currently published system warnings, with the margin-stress
    /// "current" warning derived.
    pub async fn system_warnings(&self) -> SourceResult<SystemWarnings> {
        let items = self.get_report("SYSWARN", "system warnings").await?;
        if items.is_empty() {
            return Err(SourceError::unexpected("system warnings returned no items"));
        }

        let mut warnings = Vec::with_capacity(items.len());
        for item in &items {
            warnings.push(SystemWarning {
                warning_type: item_field(item, "warningType")?.to_owned(),
                publish_time: timefmt::parse_space_naive_utc(item_field(item, "publishTime")?)?,
                text: item_field(item, "warningText")?.to_owned(),
            });
        }

        Ok(SystemWarnings::from_warnings(warnings))
    }

    /// Day-level surplus margin forecast; `current` is the nearest forecast
    /// day not yet past.
    pub async fn margin_forecast(&self, now_utc: DateTime<Utc>) -> SourceResult<MarginForecast> {
        let items = self.get_report("OCNMFD", "margin forecast").await?;
        if items.is_empty() {
            return Err(SourceError::unexpected("margin forecast returned no items"));
        }

        let mut forecast = Vec::with_capacity(items.len());
        for item in &items {
            let margin_mw = item_field(item, "systemMargin")?
                .parse::<f64>()
                .map_err(|e| SourceError::unexpected(format!("bad systemMargin: {e}")))?
                as i64;
            forecast.push(MarginForecastPoint {
                forecast_date: timefmt::parse_date(item_field(item, "forecastDate")?)?,
                margin_mw,
                publish_time: timefmt::parse_space_naive_utc(item_field(item, "publishTime")?)?,
            });
        }

        forecast.sort_by_key(|p| p.forecast_date);
        let today = now_utc.date_naive();
        let current = forecast.iter().find(|p| p.forecast_date >= today).copied();

        Ok(MarginForecast { current, forecast })
    }
}

fn item_field<'a>(item: &'a XmlItem, field: &str) -> SourceResult<&'a str> {
    item.get(field)
        .map(String::as_str)
        .ok_or_else(|| SourceError::unexpected(format!("item missing '{field}'")))
}

/// Walk the envelope, validate its embedded `httpCode` and collect every
/// `<item>` as a flat field map.
fn parse_envelope(xml: &str, source_name: &str) -> SourceResult<Vec<XmlItem>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut items = Vec::new();
    let mut current_item: Option<XmlItem> = None;
    let mut active_tag: Option<String> = None;
    let mut http_code: Option<String> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let name = e.local_name();
                let tag = String::from_utf8_lossy(name.as_ref()).to_string();
                if tag == "item" {
                    current_item = Some(XmlItem::new());
                } else {
                    active_tag = Some(tag);
                }
            }
            Ok(Event::Text(e)) => {
                let text = e
                    .unescape()
                    .map_err(|err| {
                        SourceError::unexpected(format!("{source_name}: bad XML text: {err}"))
                    })?
                    .trim()
                    .to_string();
                if let Some(ref tag) = active_tag {
                    if tag == "httpCode" && http_code.is_none() {
                        http_code = Some(text.clone());
                    }
                    if let Some(item) = current_item.as_mut() {
                        item.insert(tag.clone(), text);
                    }
                }
            }
            Ok(Event::End(ref e)) => {
                let name = e.local_name();
                let tag = String::from_utf8_lossy(name.as_ref());
                if tag == "item"
                    && let Some(item) = current_item.take()
                {
                    items.push(item);
                }
                active_tag = None;
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(SourceError::unexpected(format!(
                    "{source_name}: malformed XML: {e}"
                )));
            }
            _ => {}
        }
    }

    match http_code.as_deref() {
        Some("200") => Ok(items),
        Some("204") => Err(SourceError::unexpected(format!(
            "{source_name}: envelope reports no content"
        ))),
        Some("403") => Err(SourceError::InvalidAuth),
        Some(code) => Err(SourceError::UnexpectedStatusCode {
            source_name: source_name.to_owned(),
            status: code.parse().unwrap_or(0),
        }),
        None => Err(SourceError::unexpected(format!(
            "{source_name}: envelope carries no httpCode"
        ))),
    }
}
