//! BIDV publishes several rate tables a day. A time-search servlet lists the
//! tables for a date and a detail servlet returns one table by its record
//! name. Both are reached only through relays.

use async_trait::async_trait;
use chrono::NaiveDate;
use log::debug;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::bank::RateAdapter;
use crate::date_range::bidv_date;
use crate::error::{RateError, Result};
use crate::model::{Bank, ExchangeRateRow, NOT_AVAILABLE, field_or_na, present_text};
use crate::proxy::ProxyFetcher;

const TIME_SEARCH_URL: &str = "https://bidv.com.vn/ServicesBIDV/ExchangeDetailSearchTimeServlet";
const DETAIL_URL: &str = "https://bidv.com.vn/ServicesBIDV/ExchangeDetailServlet";

pub fn time_search_url(date: NaiveDate) -> String {
    format!("{}?date={}", TIME_SEARCH_URL, bidv_date(date))
}

pub fn detail_url(date: NaiveDate, namerecord: &str) -> String {
    format!("{}?date={}&time={}", DETAIL_URL, bidv_date(date), namerecord)
}

#[derive(Debug, Clone, Deserialize)]
pub struct TimeRecord {
    #[serde(default)]
    pub time: Option<Value>,
    #[serde(default)]
    pub namerecord: Option<Value>,
}

impl TimeRecord {
    fn time_number(&self) -> Option<f64> {
        match &self.time {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        }
    }

    fn time_text(&self) -> String {
        match &self.time {
            Some(Value::String(s)) => s.trim().to_string(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        }
    }

    /// Numeric when both times are numbers, otherwise a string comparison,
    /// so clock values like `"15:30"` still order by time of day.
    fn is_later_than(&self, other: &TimeRecord) -> bool {
        match (self.time_number(), other.time_number()) {
            (Some(a), Some(b)) => a > b,
            _ => self.time_text() > other.time_text(),
        }
    }

    fn namerecord(&self) -> String {
        match &self.namerecord {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TimeSearch {
    #[serde(default)]
    data: Option<Vec<TimeRecord>>,
}

/// Record with the greatest `time`; the first one wins on ties.
pub fn latest_record(records: &[TimeRecord]) -> Option<&TimeRecord> {
    let mut latest: Option<&TimeRecord> = None;
    for record in records {
        match latest {
            Some(current) if !record.is_later_than(current) => {}
            _ => latest = Some(record),
        }
    }
    latest
}

#[derive(Clone)]
pub struct BidvClient {
    proxy: ProxyFetcher,
}

impl BidvClient {
    pub fn new(proxy: ProxyFetcher) -> Self {
        Self { proxy }
    }

    /// Latest rate table published for `date`, as returned by the upstream.
    pub async fn fetch_rates(&self, date: NaiveDate) -> Result<Value> {
        let resp = self.proxy.fetch(&time_search_url(date)).await?;
        let search: TimeSearch = parse(&resp.body)?;
        let records = search.data.unwrap_or_default();

        let latest = latest_record(&records).ok_or(RateError::NoTimeRecords { date })?;
        let namerecord = latest.namerecord();
        debug!("bidv {} has {} tables, using {}", date, records.len(), namerecord);

        let resp = self.proxy.fetch(&detail_url(date, &namerecord)).await?;
        parse(&resp.body)
    }
}

#[async_trait]
impl RateAdapter for BidvClient {
    fn bank(&self) -> Bank {
        Bank::Bidv
    }

    async fn fetch_rate(&self, date: NaiveDate, currency: &str) -> Result<Option<ExchangeRateRow>> {
        let payload = self.fetch_rates(date).await?;
        map_row(date, currency, payload)
    }
}

fn parse<T: DeserializeOwned>(body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| RateError::MalformedPayload {
        bank: Bank::Bidv,
        message: e.to_string(),
    })
}

#[derive(Debug, Deserialize)]
struct Detail {
    #[serde(default)]
    data: Option<Vec<Entry>>,
    #[serde(default)]
    day_vi: Option<Value>,
    #[serde(default)]
    hour: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Entry {
    #[serde(default)]
    currency: Option<Value>,
    #[serde(default)]
    ban: Option<Value>,
    #[serde(default)]
    mua_ck: Option<Value>,
    #[serde(default)]
    mua_tm: Option<Value>,
}

/// Picks the `currency` entry out of a rate table.
///
/// BIDV has no separate cash sell rate, so both ask columns carry `ban`.
pub fn map_row(date: NaiveDate, currency: &str, payload: Value) -> Result<Option<ExchangeRateRow>> {
    let detail: Detail = serde_json::from_value(payload).map_err(|e| RateError::MalformedPayload {
        bank: Bank::Bidv,
        message: e.to_string(),
    })?;

    let entry = detail
        .data
        .unwrap_or_default()
        .into_iter()
        .find(|entry| entry.currency.as_ref().and_then(Value::as_str) == Some(currency));

    let Some(entry) = entry else {
        debug!("bidv has no {} entry on {}", currency, date);
        return Ok(None);
    };

    let input_date = match (
        present_text(detail.day_vi.as_ref()),
        present_text(detail.hour.as_ref()),
    ) {
        (Some(day), Some(hour)) => format!("{} {}", day, hour),
        (Some(part), None) | (None, Some(part)) => part,
        (None, None) => NOT_AVAILABLE.to_string(),
    };

    Ok(Some(ExchangeRateRow {
        date,
        bank: Bank::Bidv,
        currency: currency.to_string(),
        ask_rate: field_or_na(entry.ban.as_ref()),
        bid_rate_ck: field_or_na(entry.mua_ck.as_ref()),
        bid_rate_tm: field_or_na(entry.mua_tm.as_ref()),
        ask_rate_tm: field_or_na(entry.ban.as_ref()),
        input_date,
    }))
}
