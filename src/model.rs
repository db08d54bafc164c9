use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use crate::error::RateError;

/// Placeholder for a rate field the upstream did not provide.
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Bank {
    #[serde(rename = "Techcombank")]
    Techcombank,
    #[serde(rename = "BIDV")]
    Bidv,
}

impl Bank {
    /// Lowercase identifier used in routes, CLI arguments and file names.
    pub fn slug(&self) -> &'static str {
        match self {
            Bank::Techcombank => "techcombank",
            Bank::Bidv => "bidv",
        }
    }
}

impl fmt::Display for Bank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bank::Techcombank => f.write_str("Techcombank"),
            Bank::Bidv => f.write_str("BIDV"),
        }
    }
}

impl FromStr for Bank {
    type Err = RateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "techcombank" => Ok(Bank::Techcombank),
            "bidv" => Ok(Bank::Bidv),
            _ => Err(RateError::UnknownBank(s.to_string())),
        }
    }
}

/// One normalized rate record for a bank, date and currency.
///
/// Rates stay as the display strings the bank published, thousands
/// separators included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRateRow {
    pub date: NaiveDate,
    pub bank: Bank,
    pub currency: String,
    pub ask_rate: String,
    #[serde(rename = "bidRateCK")]
    pub bid_rate_ck: String,
    #[serde(rename = "bidRateTM")]
    pub bid_rate_tm: String,
    #[serde(rename = "askRateTM")]
    pub ask_rate_tm: String,
    pub input_date: String,
}

impl ExchangeRateRow {
    /// Fields in export column order.
    pub fn fields(&self) -> [String; 8] {
        [
            self.date.format("%Y-%m-%d").to_string(),
            self.bank.to_string(),
            self.currency.clone(),
            self.ask_rate.clone(),
            self.bid_rate_ck.clone(),
            self.bid_rate_tm.clone(),
            self.ask_rate_tm.clone(),
            self.input_date.clone(),
        ]
    }
}

/// Text of a JSON field when it carries a value, `None` for missing, null,
/// empty, zero or `false`.
pub fn present_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

/// Display string for a rate field, falling back to `N/A`.
pub fn field_or_na(value: Option<&Value>) -> String {
    present_text(value).unwrap_or_else(|| NOT_AVAILABLE.to_string())
}
