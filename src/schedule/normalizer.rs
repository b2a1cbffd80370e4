//! Schedule normalization and deduplication
//!
//! Raw terminal entries are projected onto [`ScheduleRecord`] according to the
//! active [`KeySchema`], their keys standardized, and duplicates collapsed to
//! the latest forecast per key.

use std::collections::HashMap;

use serde_json::Value;

use crate::config::ScheduleFields;
use crate::models::{JoinKey, KeySchema, ScheduleRecord};
use crate::utils::{parse_timestamp, standardize_key, standardize_optional_key};

/// Projects and deduplicates raw schedule entries
#[derive(Debug, Clone, Default)]
pub struct ScheduleNormalizer {
    schema: KeySchema,
    fields: ScheduleFields,
}

impl ScheduleNormalizer {
    pub fn new(schema: KeySchema, fields: ScheduleFields) -> Self {
        Self { schema, fields }
    }

    pub fn schema(&self) -> KeySchema {
        self.schema
    }

    /// Normalize raw entries into the canonical, deduplicated schedule table
    pub fn normalize(&self, raw: &[Value]) -> Vec<ScheduleRecord> {
        let projected: Vec<ScheduleRecord> =
            raw.iter().filter_map(|entry| self.project(entry)).collect();

        let dropped = raw.len() - projected.len();
        if dropped > 0 {
            tracing::debug!(dropped, "Skipped schedule entries without a vessel name");
        }

        let records = dedup_latest(projected, self.schema);

        tracing::debug!(
            raw = raw.len(),
            normalized = records.len(),
            schema = %self.schema,
            "Normalized schedule"
        );

        records
    }

    /// Project a single raw entry; `None` when it carries no vessel name
    pub fn project(&self, entry: &Value) -> Option<ScheduleRecord> {
        let vessel_name = lookup_text(entry, &self.fields.vessel)
            .map(|v| standardize_key(&v))
            .filter(|v| !v.is_empty())?;

        let voyage_code = match self.schema {
            KeySchema::VesselOnly => None,
            KeySchema::VesselVoyage => lookup_text(entry, &self.fields.voyage),
            KeySchema::VesselCarrierVoyage => lookup_text(entry, &self.fields.carrier_voyage),
        };

        let carrier_name = lookup_text(entry, &self.fields.carrier)
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        let arrival_forecast =
            lookup_text(entry, &self.fields.forecast).and_then(|f| parse_timestamp(&f));

        Some(ScheduleRecord {
            vessel_name,
            voyage_code: standardize_optional_key(voyage_code.as_deref()),
            carrier_name,
            arrival_forecast,
        })
    }
}

/// Keep only the record with the latest forecast per join key
///
/// Records are stably sorted by forecast ascending (missing forecasts first)
/// and the last record of each key wins, so equal forecasts resolve to the
/// later input entry. Survivors are returned in sorted order.
pub fn dedup_latest(mut records: Vec<ScheduleRecord>, schema: KeySchema) -> Vec<ScheduleRecord> {
    // Option<DateTime> orders None before Some, and sort_by_key is stable
    records.sort_by_key(|r| r.arrival_forecast);

    let mut winner: HashMap<JoinKey, usize> = HashMap::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        winner.insert(record.join_key(schema), index);
    }

    records
        .into_iter()
        .enumerate()
        .filter(|(index, record)| winner.get(&record.join_key(schema)) == Some(index))
        .map(|(_, record)| record)
        .collect()
}

/// Resolve a dotted path and render the value as text
fn lookup_text(entry: &Value, path: &str) -> Option<String> {
    let value = path
        .split('.')
        .try_fold(entry, |current, segment| current.get(segment))?;

    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
