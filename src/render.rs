//! Display helpers for the presentation layer
//!
//! Quantities and forecasts are rendered in the Brazilian layout
//! (`1.234,50`, `12/01/2025 08:00`). These helpers only format; the canonical
//! records are untouched.

use chrono::{DateTime, Utc};

use crate::models::{MatchedRecord, ScheduleRecord};

/// Format a quantity with `.` thousands and `,` decimal separators
pub fn format_quantity(quantity: Option<f64>) -> String {
    let Some(quantity) = quantity else {
        return String::new();
    };

    let fixed = format!("{:.2}", quantity.abs());
    let (integer, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    let sign = if quantity < 0.0 && fixed.chars().any(|c| c != '0' && c != '.') {
        "-"
    } else {
        ""
    };
    format!("{sign}{grouped},{fraction}")
}

/// Format a forecast as day-month-year (UTC)
pub fn format_forecast(forecast: Option<DateTime<Utc>>) -> String {
    forecast
        .map(|f| f.format("%d/%m/%Y %H:%M").to_string())
        .unwrap_or_default()
}

/// Render rows as a left-aligned plain-text table
pub fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let render_row = |cells: &[&str]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let separators: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let separators: Vec<&str> = separators.iter().map(String::as_str).collect();

    let mut lines = vec![render_row(headers), render_row(&separators)];
    for row in rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        lines.push(render_row(&cells));
    }
    lines.join("\n")
}

/// Plain-text table of matched rows
pub fn matched_table<'a>(records: impl IntoIterator<Item = &'a MatchedRecord>) -> String {
    let rows: Vec<Vec<String>> = records
        .into_iter()
        .map(|r| {
            vec![
                r.order_id.clone(),
                r.product.clone(),
                format_quantity(r.quantity),
                r.vessel_name.clone(),
                r.voyage_code.clone().unwrap_or_default(),
                r.carrier_name.clone().unwrap_or_default(),
                format_forecast(r.arrival_forecast),
            ]
        })
        .collect();

    table(
        &["Order", "Product", "Quantity", "Vessel", "Voyage", "Carrier", "Forecast"],
        &rows,
    )
}

/// Plain-text table of schedule records
pub fn schedule_table<'a>(records: impl IntoIterator<Item = &'a ScheduleRecord>) -> String {
    let rows: Vec<Vec<String>> = records
        .into_iter()
        .map(|r| {
            vec![
                r.vessel_name.clone(),
                r.voyage_code.clone().unwrap_or_default(),
                r.carrier_name.clone().unwrap_or_default(),
                format_forecast(r.arrival_forecast),
            ]
        })
        .collect();

    table(&["Vessel", "Voyage", "Carrier", "Forecast"], &rows)
}
