//! Reconciliation engine
//!
//! Left-joins orders to the normalized schedule on the active [`KeySchema`].
//! Every order appears exactly once in the result; orders without a schedule
//! match keep empty carrier and forecast fields.

pub mod filter;

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::models::{JoinKey, KeySchema, MatchedRecord, OrderRecord, ScheduleRecord};

pub use filter::{FilterColumn, MatchFilter};

/// Result of one reconciliation pass
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reconciliation {
    /// Key schema the join ran under
    pub schema: KeySchema,

    /// One row per input order, in input order
    pub matched: Vec<MatchedRecord>,

    /// Schedule records no order referenced
    pub unused_schedule: Vec<ScheduleRecord>,
}

/// Counts for operational review
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconciliationSummary {
    pub orders: usize,
    pub with_forecast: usize,
    pub unmatched: usize,
    pub unused_schedule: usize,
}

impl Reconciliation {
    /// Orders with no forecast
    pub fn unmatched(&self) -> impl Iterator<Item = &MatchedRecord> {
        self.matched.iter().filter(|r| r.is_unmatched())
    }

    pub fn summary(&self) -> ReconciliationSummary {
        let unmatched = self.unmatched().count();
        ReconciliationSummary {
            orders: self.matched.len(),
            with_forecast: self.matched.len() - unmatched,
            unmatched,
            unused_schedule: self.unused_schedule.len(),
        }
    }

    /// Matched rows passing `filter`
    pub fn filtered<'a>(
        &'a self,
        filter: &'a MatchFilter,
    ) -> impl Iterator<Item = &'a MatchedRecord> {
        self.matched.iter().filter(move |r| filter.matches(r))
    }
}

/// Join `orders` to `schedule` under `schema`
///
/// When several schedule records share a key (the normalizer was skipped),
/// the first one is used. Keys are standardized on both sides here, so raw
/// inputs join the same way normalized ones do.
pub fn reconcile(
    orders: &[OrderRecord],
    schedule: &[ScheduleRecord],
    schema: KeySchema,
) -> Reconciliation {
    let mut index: HashMap<JoinKey, usize> = HashMap::with_capacity(schedule.len());
    for (position, record) in schedule.iter().enumerate() {
        index.entry(record.join_key(schema)).or_insert(position);
    }

    let mut referenced: HashSet<usize> = HashSet::new();
    let matched: Vec<MatchedRecord> = orders
        .iter()
        .map(|order| {
            let hit = index.get(&order.join_key(schema)).copied();
            if let Some(position) = hit {
                referenced.insert(position);
            }
            MatchedRecord::from_parts(order, hit.map(|position| &schedule[position]))
        })
        .collect();

    // A duplicate-key record shadowed by the first one is never referenced
    let unused_schedule: Vec<ScheduleRecord> = schedule
        .iter()
        .enumerate()
        .filter(|(position, _)| !referenced.contains(position))
        .map(|(_, record)| record.clone())
        .collect();

    let reconciliation = Reconciliation {
        schema,
        matched,
        unused_schedule,
    };

    let summary = reconciliation.summary();
    tracing::info!(
        schema = %schema,
        orders = summary.orders,
        with_forecast = summary.with_forecast,
        unmatched = summary.unmatched,
        unused_schedule = summary.unused_schedule,
        "Reconciled orders against schedule"
    );

    reconciliation
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn forecast(day: u32) -> Option<DateTime<Utc>> {
        Some(Utc.with_ymd_and_hms(2025, 1, day, 8, 0, 0).unwrap())
    }

    fn schedule(vessel: &str, voyage: Option<&str>, carrier: &str, day: u32) -> ScheduleRecord {
        ScheduleRecord {
            vessel_name: vessel.to_string(),
            voyage_code: voyage.map(str::to_string),
            carrier_name: Some(carrier.to_string()),
            arrival_forecast: forecast(day),
        }
    }

    fn order(id: &str, vessel: &str, voyage: Option<&str>) -> OrderRecord {
        OrderRecord {
            order_id: id.to_string(),
            product: "Algodão".to_string(),
            quantity: Some(300.0),
            vessel_name: vessel.to_string(),
            voyage_code: voyage.map(str::to_string),
        }
    }

    #[test]
    fn test_match_after_standardization() {
        let schedule = vec![schedule("MSC BRUNA", Some("123E"), "MSC", 12)];
        let orders = vec![order("201", " msc bruna ", Some("123e"))];

        let result = reconcile(&orders, &schedule, KeySchema::VesselVoyage);

        assert_eq!(result.matched.len(), 1);
        assert_eq!(result.matched[0].carrier_name.as_deref(), Some("MSC"));
        assert_eq!(result.matched[0].arrival_forecast, forecast(12));
        assert!(result.unused_schedule.is_empty());
    }

    #[test]
    fn test_no_match_is_null_not_error() {
        let schedule = vec![schedule("MSC BRUNA", Some("123E"), "MSC", 12)];
        let orders = vec![order("201", "MSC BRUNA", Some("999X"))];

        let result = reconcile(&orders, &schedule, KeySchema::VesselVoyage);

        assert_eq!(result.matched[0].carrier_name, None);
        assert_eq!(result.matched[0].arrival_forecast, None);
        assert_eq!(result.unmatched().count(), 1);
        assert_eq!(result.unused_schedule.len(), 1);
    }

    #[test]
    fn test_vessel_only_ignores_voyage() {
        let schedule = vec![schedule("MSC BRUNA", None, "MSC", 12)];
        let orders = vec![order("201", "MSC BRUNA", Some("ANY"))];

        let result = reconcile(&orders, &schedule, KeySchema::VesselOnly);
        assert_eq!(result.matched[0].arrival_forecast, forecast(12));
    }

    #[test]
    fn test_many_orders_one_schedule() {
        let schedule = vec![schedule("MSC BRUNA", Some("123E"), "MSC", 12)];
        let orders = vec![
            order("201", "MSC BRUNA", Some("123E")),
            order("204", "MSC BRUNA", Some("123E")),
        ];

        let result = reconcile(&orders, &schedule, KeySchema::VesselVoyage);

        assert_eq!(result.matched.len(), 2);
        assert!(result.matched.iter().all(|m| m.arrival_forecast == forecast(12)));
    }

    #[test]
    fn test_duplicate_schedule_keys_take_first() {
        let schedule = vec![
            schedule("MSC BRUNA", Some("123E"), "FIRST", 10),
            schedule("msc bruna", Some("123e"), "SECOND", 12),
        ];
        let orders = vec![order("201", "MSC BRUNA", Some("123E"))];

        let result = reconcile(&orders, &schedule, KeySchema::VesselVoyage);

        assert_eq!(result.matched.len(), 1);
        assert_eq!(result.matched[0].carrier_name.as_deref(), Some("FIRST"));
        assert_eq!(result.unused_schedule.len(), 1);
    }

    #[test]
    fn test_order_preserved_with_empty_schedule() {
        let orders = vec![order("2", "B", None), order("1", "A", None)];

        let result = reconcile(&orders, &[], KeySchema::VesselVoyage);

        let ids: Vec<_> = result.matched.iter().map(|m| m.order_id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1"]);
    }

    #[test]
    fn test_matched_schedule_without_forecast_counts_as_unmatched() {
        let mut record = schedule("MSC BRUNA", Some("123E"), "MSC", 12);
        record.arrival_forecast = None;
        let orders = vec![order("201", "MSC BRUNA", Some("123E"))];

        let result = reconcile(&orders, &[record], KeySchema::VesselVoyage);

        assert_eq!(result.matched[0].carrier_name.as_deref(), Some("MSC"));
        assert_eq!(result.unmatched().count(), 1);
        assert!(result.unused_schedule.is_empty());
    }

    #[test]
    fn test_summary() {
        let schedule = vec![
            schedule("MSC BRUNA", Some("123E"), "MSC", 12),
            schedule("MAERSK LIMA", Some("502S"), "MAERSK", 14),
        ];
        let orders = vec![
            order("201", "MSC BRUNA", Some("123E")),
            order("999", "GHOST", Some("1")),
        ];

        let summary = reconcile(&orders, &schedule, KeySchema::VesselVoyage).summary();

        assert_eq!(
            summary,
            ReconciliationSummary {
                orders: 2,
                with_forecast: 1,
                unmatched: 1,
                unused_schedule: 1,
            }
        );
    }
}
