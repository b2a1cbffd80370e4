//! Property tests for deduplication and the left join

use std::collections::HashMap;

use berthwatch::models::{JoinKey, KeySchema, OrderRecord, ScheduleRecord};
use berthwatch::reconcile::reconcile;
use berthwatch::schedule::normalizer::dedup_latest;
use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;

const VESSELS: &[&str] = &["MSC BRUNA", "MAERSK LIMA", "CMA CGM SAMBA"];
const VOYAGES: &[&str] = &["123E", "502S", "0MX1N"];

fn schema_strategy() -> impl Strategy<Value = KeySchema> {
    prop_oneof![
        Just(KeySchema::VesselOnly),
        Just(KeySchema::VesselVoyage),
        Just(KeySchema::VesselCarrierVoyage),
    ]
}

fn forecast_strategy() -> impl Strategy<Value = Option<DateTime<Utc>>> {
    proptest::option::of((0i64..5_000_000).prop_map(|offset| {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap() + chrono::Duration::seconds(offset)
    }))
}

fn schedule_strategy() -> impl Strategy<Value = ScheduleRecord> {
    (
        0..VESSELS.len(),
        proptest::option::of(0..VOYAGES.len()),
        "[A-Z]{2,6}",
        forecast_strategy(),
    )
        .prop_map(|(vessel, voyage, carrier, arrival_forecast)| ScheduleRecord {
            vessel_name: VESSELS[vessel].to_string(),
            voyage_code: voyage.map(|v| VOYAGES[v].to_string()),
            carrier_name: Some(carrier),
            arrival_forecast,
        })
}

fn order_strategy() -> impl Strategy<Value = OrderRecord> {
    (
        "[0-9]{3}",
        0..VESSELS.len(),
        proptest::option::of(0..VOYAGES.len()),
    )
        .prop_map(|(order_id, vessel, voyage)| OrderRecord {
            order_id,
            product: "Soja".to_string(),
            quantity: Some(1.0),
            vessel_name: VESSELS[vessel].to_lowercase(),
            voyage_code: voyage.map(|v| VOYAGES[v].to_lowercase()),
        })
}

proptest! {
    #[test]
    fn dedup_keeps_one_latest_record_per_key(
        records in proptest::collection::vec(schedule_strategy(), 0..40),
        schema in schema_strategy(),
    ) {
        let mut latest: HashMap<JoinKey, Option<DateTime<Utc>>> = HashMap::new();
        for record in &records {
            let entry = latest.entry(record.join_key(schema)).or_insert(None);
            *entry = (*entry).max(record.arrival_forecast);
        }

        let deduped = dedup_latest(records, schema);

        prop_assert_eq!(deduped.len(), latest.len());
        for record in &deduped {
            prop_assert_eq!(record.arrival_forecast, latest[&record.join_key(schema)]);
        }
    }

    #[test]
    fn left_join_preserves_every_order(
        orders in proptest::collection::vec(order_strategy(), 0..30),
        schedule in proptest::collection::vec(schedule_strategy(), 0..20),
        schema in schema_strategy(),
    ) {
        let schedule = dedup_latest(schedule, schema);
        let result = reconcile(&orders, &schedule, schema);

        prop_assert_eq!(result.matched.len(), orders.len());
        for (matched, order) in result.matched.iter().zip(&orders) {
            prop_assert_eq!(&matched.order_id, &order.order_id);
        }

        for (matched, order) in result.matched.iter().zip(&orders) {
            let key = order.join_key(schema);
            let hit = schedule.iter().any(|s| s.join_key(schema) == key);
            prop_assert_eq!(matched.carrier_name.is_some(), hit);
        }
    }
}
