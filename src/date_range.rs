use chrono::{Days, NaiveDate};

use crate::error::{RateError, Result};

/// Inclusive range of calendar days, `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(RateError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Builds a range from optional ISO date strings, as collected from a form.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self> {
        let (Some(start), Some(end)) = (non_blank(start), non_blank(end)) else {
            return Err(RateError::MissingRangeBound);
        };
        Self::new(parse_iso_date(start)?, parse_iso_date(end)?)
    }

    /// The week ending on `today`.
    pub fn last_week(today: NaiveDate) -> Self {
        let start = today.checked_sub_days(Days::new(7)).unwrap_or(NaiveDate::MIN);
        Self { start, end: today }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of days in the range, both ends included.
    pub fn day_count(&self) -> usize {
        (self.end - self.start).num_days() as usize + 1
    }

    pub fn days(&self) -> RangeDays {
        RangeDays {
            next: Some(self.start),
            end: self.end,
        }
    }
}

/// Iterator over the days of a [`DateRange`].
#[derive(Debug, Clone)]
pub struct RangeDays {
    next: Option<NaiveDate>,
    end: NaiveDate,
}

impl Iterator for RangeDays {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.succ_opt().filter(|next| *next <= self.end);
        Some(current)
    }
}

pub fn parse_iso_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| RateError::InvalidDate(s.to_string()))
}

/// `DD/MM/YYYY`, the form BIDV servlets expect.
pub fn bidv_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.trim().is_empty())
}
