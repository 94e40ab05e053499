// src/providers/rentcast.rs
use crate::domain::{AreaSnapshot, ComparableListing, SubjectProperty};
use crate::providers::geocode::normalize_address;
use crate::providers::models::{
    history_trend_pct, MarketResponse, PropertyRecord, RentEstimate, ValueEstimate,
};
use crate::providers::{MarketDataProvider, ProviderError};
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const USER_AGENT: &str = "property-evaluator/0.1";

/// How much sale history to ask for; enough for the five-year trend.
const HISTORY_RANGE_MONTHS: u32 = 61;

pub struct RentCastProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl RentCastProvider {
    pub fn new(api_key: String, base_url: String, timeout: Duration) -> Result<Self, ProviderError> {
        if api_key.trim().is_empty() {
            return Err(ProviderError::Config("RentCast API key is empty".into()));
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// GET `path` and decode JSON. A 404 means "no data", not an error.
    fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Option<T>, ProviderError> {
        let start = Instant::now();
        let url = format!("{}{}", self.base_url, path);

        let resp = self
            .client
            .get(&url)
            .header("X-Api-Key", &self.api_key)
            .header(ACCEPT, "application/json")
            .query(query)
            .send()
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        debug!(path, status = status.as_u16(), elapsed = ?start.elapsed(), "rentcast response");

        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        serde_json::from_str(&text)
            .map(Some)
            .map_err(|e| ProviderError::Deserialize(e.to_string()))
    }

    fn rent_estimate(&self, address: &str) -> Option<f64> {
        let query = [("address", address.to_string())];
        match self.get_json::<RentEstimate>("/avm/rent/long-term", &query) {
            Ok(estimate) => estimate.and_then(|e| e.rent),
            Err(e) => {
                warn!(%address, error = %e, "rent estimate unavailable");
                None
            }
        }
    }
}

impl MarketDataProvider for RentCastProvider {
    fn name(&self) -> &'static str {
        "rentcast"
    }

    fn property_facts(&self, address: &str) -> Result<Option<SubjectProperty>, ProviderError> {
        let query = [("address", address.to_string())];
        let records: Option<Vec<PropertyRecord>> = self.get_json("/properties", &query)?;

        let Some(record) = records.and_then(|r| r.into_iter().next()) else {
            return Ok(None);
        };

        let mut subject = record.into_subject(address);
        subject.rent_estimate = self.rent_estimate(&subject.address);
        Ok(Some(subject))
    }

    fn area_snapshot(
        &self,
        subject: &SubjectProperty,
    ) -> Result<Option<AreaSnapshot>, ProviderError> {
        let Some(address) = normalize_address(&subject.address) else {
            return Ok(None);
        };
        let Some(zip) = address.postal_code.clone() else {
            debug!(address = %subject.address, "no ZIP code, skipping market lookup");
            return Ok(None);
        };

        let query = [
            ("zipCode", zip.clone()),
            ("dataType", "Sale".to_string()),
            ("historyRange", HISTORY_RANGE_MONTHS.to_string()),
        ];
        let market: Option<MarketResponse> = self.get_json("/markets", &query)?;
        let Some(sale) = market.and_then(|m| m.sale_data) else {
            return Ok(None);
        };

        Ok(Some(AreaSnapshot {
            area_name: address.area_name.or(Some(zip)),
            median_sold_price: sale.median_price,
            trend_12m_pct: history_trend_pct(&sale.history, 12),
            trend_5y_pct: history_trend_pct(&sale.history, 60),
        }))
    }

    fn comparables(
        &self,
        subject: &SubjectProperty,
        limit: usize,
    ) -> Result<Vec<ComparableListing>, ProviderError> {
        let query = [
            ("address", subject.address.clone()),
            ("compCount", limit.to_string()),
        ];
        let estimate: Option<ValueEstimate> = self.get_json("/avm/value", &query)?;

        Ok(estimate
            .map(|e| e.comparables.into_iter().map(|c| c.into_listing()).collect())
            .unwrap_or_default())
    }
}
