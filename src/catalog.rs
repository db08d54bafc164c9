//! Currencies each bank publishes rates for.

use serde::Serialize;

use crate::error::{RateError, Result};
use crate::model::Bank;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Currency {
    /// Label matched against the upstream payload.
    pub value: &'static str,
    /// Human readable name.
    pub label: &'static str,
}

const fn same(code: &'static str) -> Currency {
    Currency {
        value: code,
        label: code,
    }
}

const TECHCOMBANK: &[Currency] = &[
    same("USD (50,100)"),
    same("USD (1,2)"),
    same("USD (5,10,20)"),
    same("EUR"),
    same("GBP"),
    same("JPY"),
    same("AUD"),
    same("CAD"),
    same("CHF"),
    same("CNY"),
    same("HKD"),
    same("SGD"),
    same("THB"),
    same("KRW"),
    same("NZD"),
];

const BIDV: &[Currency] = &[
    same("USD"),
    Currency {
        value: "USD(1-2-5)",
        label: "USD (1-2-5)",
    },
    Currency {
        value: "USD(10-20)",
        label: "USD (10-20)",
    },
    same("EUR"),
    same("GBP"),
    same("JPY"),
    same("AUD"),
    same("CAD"),
    same("CHF"),
    same("CNY"),
    same("HKD"),
    same("SGD"),
    same("THB"),
    same("KRW"),
    same("NZD"),
    same("SEK"),
    same("DKK"),
    same("NOK"),
    same("RUB"),
    same("TWD"),
    same("MYR"),
    same("SAR"),
    same("KWD"),
    same("LAK"),
    Currency {
        value: "XAU",
        label: "Gold (XAU)",
    },
];

pub struct CurrencyCatalog;

impl CurrencyCatalog {
    /// Ordered currencies for a bank; the first one is the default.
    pub fn currencies(bank: Bank) -> &'static [Currency] {
        match bank {
            Bank::Techcombank => TECHCOMBANK,
            Bank::Bidv => BIDV,
        }
    }

    pub fn default_currency(bank: Bank) -> &'static str {
        Self::currencies(bank)[0].value
    }

    pub fn contains(bank: Bank, currency: &str) -> bool {
        Self::currencies(bank).iter().any(|c| c.value == currency)
    }
}

/// The bank and currency a fetch runs against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    bank: Bank,
    currency: String,
}

impl Selection {
    pub fn new(bank: Bank) -> Self {
        let mut selection = Self {
            bank,
            currency: String::new(),
        };
        selection.select_bank(bank);
        selection
    }

    pub fn with_currency(bank: Bank, currency: Option<&str>) -> Result<Self> {
        let mut selection = Self::new(bank);
        if let Some(currency) = currency {
            selection.select_currency(currency)?;
        }
        Ok(selection)
    }

    /// Switching banks resets the currency to the new bank's default.
    pub fn select_bank(&mut self, bank: Bank) {
        self.bank = bank;
        self.currency = CurrencyCatalog::default_currency(bank).to_string();
    }

    pub fn select_currency(&mut self, currency: &str) -> Result<()> {
        if !CurrencyCatalog::contains(self.bank, currency) {
            return Err(RateError::UnsupportedCurrency {
                bank: self.bank,
                currency: currency.to_string(),
            });
        }
        self.currency = currency.to_string();
        Ok(())
    }

    pub fn bank(&self) -> Bank {
        self.bank
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }
}
