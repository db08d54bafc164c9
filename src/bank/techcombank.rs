//! Techcombank publishes one JSON document per day on its content API,
//! reachable without relays.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use log::debug;
use reqwest::header::HeaderMap;
use serde::Deserialize;
use serde_json::Value;

use crate::bank::RateAdapter;
use crate::error::{RateError, Result};
use crate::http::HttpFetch;
use crate::model::{Bank, ExchangeRateRow, field_or_na};

const RATES_URL: &str =
    "https://techcombank.com/content/techcombank/web/vn/vi/cong-cu-tien-ich/ty-gia/_jcr_content.exchange-rates";

pub fn rates_url(date: NaiveDate) -> String {
    format!("{}.{}.integration.json", RATES_URL, date.format("%Y-%m-%d"))
}

#[derive(Clone)]
pub struct TechcombankClient {
    http: Arc<dyn HttpFetch>,
}

impl TechcombankClient {
    pub fn new(http: Arc<dyn HttpFetch>) -> Self {
        Self { http }
    }

    /// Raw upstream document for a day. Non-2xx statuses are returned as
    /// [`RateError::UpstreamStatus`] so callers can forward them.
    pub async fn fetch_rates(&self, date: NaiveDate) -> Result<Value> {
        let url = rates_url(date);
        let resp = self.http.get(&url, &HeaderMap::new()).await?;
        if !resp.is_success() {
            return Err(RateError::UpstreamStatus {
                bank: Bank::Techcombank,
                status: resp.status,
            });
        }

        serde_json::from_str(&resp.body).map_err(|e| RateError::MalformedPayload {
            bank: Bank::Techcombank,
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl RateAdapter for TechcombankClient {
    fn bank(&self) -> Bank {
        Bank::Techcombank
    }

    async fn fetch_rate(&self, date: NaiveDate, currency: &str) -> Result<Option<ExchangeRateRow>> {
        let payload = self.fetch_rates(date).await?;
        map_row(date, currency, payload)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Payload {
    #[serde(default)]
    exchange_rate: Option<ExchangeRate>,
}

#[derive(Debug, Default, Deserialize)]
struct ExchangeRate {
    #[serde(default)]
    data: Option<Vec<Entry>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Entry {
    label: Option<Value>,
    ask_rate: Option<Value>,
    #[serde(rename = "bidRateCK")]
    bid_rate_ck: Option<Value>,
    #[serde(rename = "bidRateTM")]
    bid_rate_tm: Option<Value>,
    #[serde(rename = "askRateTM")]
    ask_rate_tm: Option<Value>,
    input_date: Option<Value>,
}

/// Picks the entry labelled `currency` out of a daily document.
pub fn map_row(date: NaiveDate, currency: &str, payload: Value) -> Result<Option<ExchangeRateRow>> {
    let payload: Payload = serde_json::from_value(payload).map_err(|e| RateError::MalformedPayload {
        bank: Bank::Techcombank,
        message: e.to_string(),
    })?;

    let entry = payload
        .exchange_rate
        .and_then(|rate| rate.data)
        .unwrap_or_default()
        .into_iter()
        .find(|entry| entry.label.as_ref().and_then(Value::as_str) == Some(currency));

    let Some(entry) = entry else {
        debug!("techcombank has no {} entry on {}", currency, date);
        return Ok(None);
    };

    Ok(Some(ExchangeRateRow {
        date,
        bank: Bank::Techcombank,
        currency: currency.to_string(),
        ask_rate: field_or_na(entry.ask_rate.as_ref()),
        bid_rate_ck: field_or_na(entry.bid_rate_ck.as_ref()),
        bid_rate_tm: field_or_na(entry.bid_rate_tm.as_ref()),
        ask_rate_tm: field_or_na(entry.ask_rate_tm.as_ref()),
        input_date: field_or_na(entry.input_date.as_ref()),
    }))
}
