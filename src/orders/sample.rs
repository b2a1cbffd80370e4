// Built-in demo orders

use crate::models::OrderRecord;
use crate::utils::error::IngestError;

use super::OrderIngestor;

const SAMPLE: &[(&str, &str, f64, &str, &str)] = &[
    ("201", "Algodão", 300.0, "MSC BRUNA", "123E"),
    ("202", "Soja em grão", 1500.0, "MAERSK LIMA", "502S"),
    ("203", "Milho", 820.5, "CMA CGM SAMBA", "0MX1N"),
    ("204", "Café verde", 120.0, "MSC BRUNA", "123E"),
];

/// Fixed sample orders for demos and smoke tests
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleOrders;

impl OrderIngestor for SampleOrders {
    fn ingest(&self) -> Result<Vec<OrderRecord>, IngestError> {
        Ok(SAMPLE
            .iter()
            .map(|&(order_id, product, quantity, vessel, voyage)| OrderRecord {
                order_id: order_id.to_string(),
                product: product.to_string(),
                quantity: Some(quantity),
                vessel_name: vessel.to_string(),
                voyage_code: Some(voyage.to_string()),
            })
            .collect())
    }
}
