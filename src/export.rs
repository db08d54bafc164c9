//! CSV and XLSX rendering of a fetched batch.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::info;
use rust_xlsxwriter::Workbook;

use crate::driver::RateBatch;
use crate::error::{RateError, Result};
use crate::model::ExchangeRateRow;

pub const HEADERS: [&str; 8] = [
    "Date",
    "Bank",
    "Currency",
    "Ask Rate",
    "Bid Rate CK",
    "Bid Rate TM",
    "Ask Rate TM",
    "Input Date",
];

pub const SHEET_NAME: &str = "Exchange Rates";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Xlsx,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        }
    }

    pub fn encode(&self, rows: &[ExchangeRateRow]) -> Result<Vec<u8>> {
        match self {
            ExportFormat::Csv => to_csv(rows).map(String::into_bytes),
            ExportFormat::Xlsx => to_xlsx(rows),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = RateError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "xlsx" => Ok(ExportFormat::Xlsx),
            _ => Err(RateError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Replaces everything but ASCII letters and digits with `_`.
pub fn sanitize_currency(currency: &str) -> String {
    currency
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

pub fn file_name(batch: &RateBatch, format: ExportFormat) -> String {
    format!(
        "exchange_rates_{}_{}_{}_to_{}.{}",
        batch.bank.slug(),
        sanitize_currency(&batch.currency),
        batch.range.start().format("%Y-%m-%d"),
        batch.range.end().format("%Y-%m-%d"),
        format.extension()
    )
}

/// Header line plus one line per row. Fields containing commas or quotes
/// are quoted.
pub fn to_csv(rows: &[ExchangeRateRow]) -> Result<String> {
    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    wtr.write_record(HEADERS)?;
    for row in rows {
        wtr.write_record(row.fields())?;
    }

    let bytes = wtr.into_inner().map_err(|e| RateError::Export(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| RateError::Export(e.to_string()))
}

/// Single-sheet workbook with the same columns as the CSV export.
pub fn to_xlsx(rows: &[ExchangeRateRow]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    {
        let worksheet = workbook.add_worksheet().set_name(SHEET_NAME)?;

        for (col, header) in HEADERS.iter().enumerate() {
            worksheet.write_string(0, col as u16, *header)?;
        }
        for (i, row) in rows.iter().enumerate() {
            for (col, field) in row.fields().iter().enumerate() {
                worksheet.write_string(i as u32 + 1, col as u16, field.as_str())?;
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

/// Writes the batch into `dir` under its export file name.
pub fn write_export(batch: &RateBatch, format: ExportFormat, dir: &Path) -> Result<PathBuf> {
    if batch.is_empty() {
        return Err(RateError::NoData);
    }

    fs::create_dir_all(dir)?;
    let path = dir.join(file_name(batch, format));
    fs::write(&path, format.encode(&batch.rows)?)?;

    info!("exported {} row(s) to {}", batch.len(), path.display());
    Ok(path)
}
