//! Free-text order parsing
//!
//! One order per line, fields in the fixed order
//! `order id, product, quantity, vessel, voyage`. Quoted fields may contain
//! the delimiter. Blank lines are ignored; any other line with the wrong
//! number of fields fails the whole batch.

use crate::models::OrderRecord;
use crate::utils::error::IngestError;
use crate::utils::parse_quantity;

use super::OrderIngestor;

/// Number of positional fields per line
pub const TEXT_FIELDS: usize = 5;

/// Orders pasted as delimited text
#[derive(Debug, Clone)]
pub struct TextOrders<'a> {
    text: &'a str,
    delimiter: u8,
}

impl<'a> TextOrders<'a> {
    pub fn new(text: &'a str, delimiter: u8) -> Self {
        Self { text, delimiter }
    }

    /// Split a single line into trimmed fields
    fn split_line(&self, line: &str) -> Result<Vec<String>, IngestError> {
        let line = tighten(line, char::from(self.delimiter));
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(self.delimiter)
            .trim(csv::Trim::All)
            .from_reader(line.as_bytes());

        let record = reader.records().next().transpose()?;

        Ok(record
            .map(|r| r.iter().map(str::to_string).collect())
            .unwrap_or_default())
    }
}

/// Drop unquoted whitespace around delimiters.
///
/// The csv reader only opens a quoted field when the quote is the field's
/// first byte, so `a, "b, c"` must become `a,"b, c"` before parsing.
fn tighten(line: &str, delimiter: char) -> String {
    let mut out = String::with_capacity(line.len());
    let mut quoted = false;
    let mut field_start = true;
    // Set right after a closing quote; a second quote there is an escape
    let mut after_quote = false;

    for c in line.chars() {
        if c == '"' && (quoted || field_start || after_quote) {
            quoted = !quoted;
            after_quote = !quoted;
        } else if !quoted && c == delimiter {
            let end = out
                .trim_end_matches(|w: char| w.is_whitespace() && w != delimiter)
                .len();
            out.truncate(end);
            out.push(c);
            field_start = true;
            after_quote = false;
            continue;
        } else if !quoted && field_start && c.is_whitespace() {
            continue;
        } else {
            after_quote = false;
        }
        field_start = false;
        out.push(c);
    }
    out
}

impl OrderIngestor for TextOrders<'_> {
    fn ingest(&self) -> Result<Vec<OrderRecord>, IngestError> {
        let mut orders = Vec::new();

        for (index, line) in self.text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }

            let fields = self.split_line(line)?;
            if fields.len() != TEXT_FIELDS {
                return Err(IngestError::MalformedLine {
                    line: index + 1,
                    expected: TEXT_FIELDS,
                    found: fields.len(),
                });
            }

            let mut fields = fields.into_iter();
            let mut next = || fields.next().unwrap_or_default();
            let (order_id, product, quantity, vessel_name, voyage_code) =
                (next(), next(), next(), next(), next());

            orders.push(OrderRecord {
                order_id,
                product,
                quantity: parse_quantity(&quantity),
                vessel_name,
                voyage_code: Some(voyage_code),
            });
        }

        tracing::debug!(orders = orders.len(), "Parsed free-text orders");
        Ok(orders)
    }
}
