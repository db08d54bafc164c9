//! Sequential fetch of one bank/currency over a date range.

use std::time::Duration;

use log::{debug, info, warn};

use crate::bank::RateAdapter;
use crate::date_range::DateRange;
use crate::error::Result;
use crate::model::{Bank, ExchangeRateRow};

/// Pause between two consecutive dates, keeps upstreams from throttling us.
pub const DEFAULT_DATE_DELAY: Duration = Duration::from_millis(200);

pub const NO_DATA_MESSAGE: &str = "No data found for the selected date range";

/// Rows collected by one fetch, in date order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateBatch {
    pub bank: Bank,
    pub currency: String,
    pub range: DateRange,
    pub rows: Vec<ExchangeRateRow>,
}

impl RateBatch {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// User-facing note for an empty result.
    pub fn message(&self) -> Option<&'static str> {
        self.is_empty().then_some(NO_DATA_MESSAGE)
    }
}

pub struct RangeFetcher<'a> {
    adapter: &'a dyn RateAdapter,
    delay: Duration,
}

impl<'a> RangeFetcher<'a> {
    pub fn new(adapter: &'a dyn RateAdapter) -> Self {
        Self {
            adapter,
            delay: DEFAULT_DATE_DELAY,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Fetches every day of `range` one after another. Upstream failures
    /// cost only their own date; any other error aborts the run.
    pub async fn fetch_range(&self, range: DateRange, currency: &str) -> Result<RateBatch> {
        let bank = self.adapter.bank();
        let mut rows = Vec::new();

        info!(
            "fetching {} {} for {} day(s) from {} to {}",
            bank,
            currency,
            range.day_count(),
            range.start(),
            range.end()
        );

        for (i, date) in range.days().enumerate() {
            if i > 0 {
                tokio::time::sleep(self.delay).await;
            }

            match self.adapter.fetch_rate(date, currency).await {
                Ok(Some(row)) => rows.push(row),
                Ok(None) => debug!("{} has no {} rate on {}", bank, currency, date),
                Err(e) if e.is_not_found() => debug!("{} has no data on {}: {}", bank, date, e),
                Err(e) if e.is_upstream() => warn!("{} fetch failed for {}: {}", bank, date, e),
                Err(e) => return Err(e),
            }
        }

        if rows.is_empty() {
            info!("{}", NO_DATA_MESSAGE);
        } else {
            info!("collected {} {} row(s) for {}", rows.len(), bank, currency);
        }

        Ok(RateBatch {
            bank,
            currency: currency.to_string(),
            range,
            rows,
        })
    }
}
