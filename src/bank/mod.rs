pub mod bidv;
pub mod techcombank;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::Result;
use crate::http::HttpFetch;
use crate::model::{Bank, ExchangeRateRow};
use crate::proxy::ProxyFetcher;

pub use bidv::BidvClient;
pub use techcombank::TechcombankClient;

/// Turns one calendar date into at most one normalized row.
///
/// `Ok(None)` means the bank published data for the date but not for the
/// requested currency.
#[async_trait]
pub trait RateAdapter: Send + Sync {
    fn bank(&self) -> Bank;

    async fn fetch_rate(&self, date: NaiveDate, currency: &str) -> Result<Option<ExchangeRateRow>>;
}

/// Upstream clients for every supported bank.
#[derive(Clone)]
pub struct BankClients {
    pub techcombank: TechcombankClient,
    pub bidv: BidvClient,
}

impl BankClients {
    pub fn new(http: Arc<dyn HttpFetch>, proxy: ProxyFetcher) -> Self {
        Self {
            techcombank: TechcombankClient::new(http),
            bidv: BidvClient::new(proxy),
        }
    }

    pub fn adapter(&self, bank: Bank) -> &dyn RateAdapter {
        match bank {
            Bank::Techcombank => &self.techcombank,
            Bank::Bidv => &self.bidv,
        }
    }
}
