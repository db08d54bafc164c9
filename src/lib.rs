//! Daily exchange rates from Vietnamese banks (Techcombank, BIDV), fetched
//! over a date range and exported as CSV or XLSX.

pub mod bank;
pub mod catalog;
pub mod config;
pub mod date_range;
pub mod display;
pub mod driver;
pub mod error;
pub mod export;
pub mod http;
pub mod model;
pub mod proxy;
pub mod server;

pub use error::{RateError, Result};
