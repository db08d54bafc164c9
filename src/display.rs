//! Table rendering of rate strings. The transform is lossy and only meant
//! for screens; exports always carry the upstream text.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::model::{ExchangeRateRow, NOT_AVAILABLE};

const MAX_FRACTION_DIGITS: u32 = 3;

/// Regroups a numeric rate string with `,` thousands separators. Values that
/// do not parse are returned unchanged.
pub fn format_rate(value: &str) -> String {
    if value.is_empty() || value == NOT_AVAILABLE || value == "-" {
        return value.to_string();
    }

    let normalized = normalize_decimal_string(value);
    let Ok(number) = Decimal::from_str(&normalized) else {
        return value.to_string();
    };

    group_thousands(&number.round_dp(MAX_FRACTION_DIGITS).normalize().to_string())
}

fn normalize_decimal_string(s: &str) -> String {
    s.trim().replace(',', "")
}

fn group_thousands(plain: &str) -> String {
    let (sign, digits) = match plain.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", plain),
    };
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (digits, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    match frac_part {
        Some(frac) => format!("{}{}.{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}

/// Plain-text table of a batch for terminal output.
pub fn render_table(rows: &[ExchangeRateRow]) -> String {
    let header = [
        "Date", "Bank", "Currency", "Ask", "Bid CK", "Bid TM", "Ask TM", "Input Date",
    ];
    let body: Vec<[String; 8]> = rows
        .iter()
        .map(|row| {
            let mut fields = row.fields();
            for field in &mut fields[3..7] {
                *field = format_rate(field);
            }
            fields
        })
        .collect();

    let mut widths = header.map(str::len);
    for fields in &body {
        for (width, field) in widths.iter_mut().zip(fields.iter()) {
            *width = (*width).max(field.chars().count());
        }
    }

    let mut out = String::new();
    let mut push_line = |cells: Vec<&str>| {
        let line: Vec<String> = cells
            .iter()
            .zip(widths.iter())
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect();
        out.push_str(line.join("  ").trim_end());
        out.push('\n');
    };

    push_line(header.to_vec());
    for fields in &body {
        push_line(fields.iter().map(String::as_str).collect());
    }
    out
}
