//! Shared command-line argument groups

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::Args;

use berthwatch::models::KeySchema;
use berthwatch::orders::{OrderSource, UploadedFile};
use berthwatch::reconcile::{FilterColumn, MatchFilter};
use berthwatch::utils::parse_timestamp;

fn parse_since(value: &str) -> std::result::Result<DateTime<Utc>, String> {
    parse_timestamp(value).ok_or_else(|| format!("invalid timestamp: {value}"))
}

/// Schedule window and key schema
#[derive(Args, Debug, Clone)]
pub struct WindowArgs {
    /// Window start (ISO-8601); defaults to the configured number of days before now
    #[arg(long, value_parser = parse_since)]
    pub since: Option<DateTime<Utc>>,

    /// Join-key schema (vessel_only, vessel_voyage, vessel_carrier_voyage)
    #[arg(long)]
    pub key_schema: Option<KeySchema>,
}

/// Order source; at most one may be given
#[derive(Args, Debug, Clone)]
#[group(required = false, multiple = false)]
pub struct SourceArgs {
    /// Use the built-in sample orders
    #[arg(long)]
    pub sample: bool,

    /// Orders as free text, one per line: id, product, quantity, vessel, voyage
    #[arg(long)]
    pub text: Option<String>,

    /// Read free-text orders from a file
    #[arg(long)]
    pub text_file: Option<PathBuf>,

    /// Order table to upload (.csv, .tsv, .xlsx, .xls, .xlsb, .ods)
    #[arg(long)]
    pub upload: Option<PathBuf>,
}

impl SourceArgs {
    /// Resolve into an order source; no source means an upload still pending
    pub fn into_source(self) -> Result<OrderSource> {
        if self.sample {
            return Ok(OrderSource::Sample);
        }
        if let Some(text) = self.text {
            return Ok(OrderSource::Text(text));
        }
        if let Some(path) = self.text_file {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read orders file: {}", path.display()))?;
            return Ok(OrderSource::Text(text));
        }
        let file = self
            .upload
            .map(|path| {
                UploadedFile::from_path(&path)
                    .with_context(|| format!("Failed to read upload: {}", path.display()))
            })
            .transpose()?;
        Ok(OrderSource::Upload(file))
    }
}

/// Post-filters on the matched table
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Order id contains (case-insensitive)
    #[arg(long)]
    pub order: Option<String>,

    /// Product contains (case-insensitive)
    #[arg(long)]
    pub product: Option<String>,

    /// Vessel name contains (case-insensitive)
    #[arg(long)]
    pub vessel_contains: Option<String>,

    /// Keep only these carriers (repeatable)
    #[arg(long)]
    pub carrier: Vec<String>,

    /// Keep only these vessels (repeatable)
    #[arg(long)]
    pub vessel: Vec<String>,

    /// Earliest forecast date (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Latest forecast date (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<NaiveDate>,
}

impl FilterArgs {
    pub fn to_filter(&self) -> MatchFilter {
        let mut filter = MatchFilter::new()
            .contains(FilterColumn::OrderId, self.order.as_deref().unwrap_or_default())
            .contains(FilterColumn::Product, self.product.as_deref().unwrap_or_default())
            .contains(FilterColumn::Vessel, self.vessel_contains.as_deref().unwrap_or_default())
            .forecast_between(self.from, self.to);

        if !self.carrier.is_empty() {
            filter = filter.carriers(&self.carrier);
        }
        if !self.vessel.is_empty() {
            filter = filter.vessels(&self.vessel);
        }
        filter
    }
}
