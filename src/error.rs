//! Error taxonomy for rate fetching and export.
//!
//! Errors fall into three groups:
//! - user input (missing or reversed dates, unknown bank or currency), raised
//!   before any network call
//! - upstream unavailability (transport failure, non-2xx status, exhausted
//!   relays, unparsable payload), which the date-range driver downgrades to
//!   "no row for this date"
//! - export failures while encoding or writing a file

use chrono::NaiveDate;
use thiserror::Error;

use crate::model::Bank;

pub type Result<T> = std::result::Result<T, RateError>;

#[derive(Error, Debug)]
pub enum RateError {
    #[error("Missing ?date=YYYY-MM-DD")]
    MissingDate,

    #[error("Please select both start and end dates")]
    MissingRangeBound,

    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Start date must be before end date ({start} > {end})")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("Unknown bank '{0}', expected techcombank or bidv")]
    UnknownBank(String),

    #[error("Currency '{currency}' is not offered by {bank}")]
    UnsupportedCurrency { bank: Bank, currency: String },

    #[error("Unsupported export format '{0}', expected json, csv or xlsx")]
    UnsupportedFormat(String),

    #[error("Request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("{bank} upstream error {status}")]
    UpstreamStatus { bank: Bank, status: u16 },

    #[error("No time records found for {date}")]
    NoTimeRecords { date: NaiveDate },

    #[error("fetch failed: {url} after {attempts} attempts")]
    FetchExhausted { url: String, attempts: u32 },

    #[error("Malformed {bank} payload: {message}")]
    MalformedPayload { bank: Bank, message: String },

    #[error("No data found for the selected date range")]
    NoData,

    #[error("Export failed: {0}")]
    Export(String),
}

impl RateError {
    /// Upstream has nothing for the requested date.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            RateError::NoTimeRecords { .. } | RateError::UpstreamStatus { status: 404, .. }
        )
    }

    /// Failures of the remote side that only cost the current date its row.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            RateError::Transport { .. }
                | RateError::UpstreamStatus { .. }
                | RateError::NoTimeRecords { .. }
                | RateError::FetchExhausted { .. }
                | RateError::MalformedPayload { .. }
        )
    }

    /// Errors caused by what the caller asked for, reported before fetching.
    pub fn is_user_input(&self) -> bool {
        matches!(
            self,
            RateError::MissingDate
                | RateError::MissingRangeBound
                | RateError::InvalidDate(_)
                | RateError::InvalidRange { .. }
                | RateError::UnknownBank(_)
                | RateError::UnsupportedCurrency { .. }
                | RateError::UnsupportedFormat(_)
        )
    }
}

impl From<csv::Error> for RateError {
    fn from(err: csv::Error) -> Self {
        RateError::Export(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for RateError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        RateError::Export(err.to_string())
    }
}

impl From<std::io::Error> for RateError {
    fn from(err: std::io::Error) -> Self {
        RateError::Export(err.to_string())
    }
}
