// Core data structures for the reconciliation engine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::{standardize_key, standardize_optional_key};

/// Convention used to identify a vessel trip when joining orders to the schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeySchema {
    /// Vessel name alone
    VesselOnly,
    /// Vessel name plus the terminal's generic voyage field
    #[default]
    VesselVoyage,
    /// Vessel name plus the carrier-native voyage code
    VesselCarrierVoyage,
}

impl KeySchema {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VesselOnly => "vessel_only",
            Self::VesselVoyage => "vessel_voyage",
            Self::VesselCarrierVoyage => "vessel_carrier_voyage",
        }
    }

    /// Whether the voyage identifier participates in the join key
    pub fn uses_voyage(&self) -> bool {
        !matches!(self, Self::VesselOnly)
    }

    /// Build the join key for a vessel/voyage pair under this schema
    pub fn key(&self, vessel_name: &str, voyage_code: Option<&str>) -> JoinKey {
        JoinKey {
            vessel: standardize_key(vessel_name),
            voyage: if self.uses_voyage() {
                standardize_optional_key(voyage_code)
            } else {
                None
            },
        }
    }
}

impl fmt::Display for KeySchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for KeySchema {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "vessel_only" | "vessel" => Ok(Self::VesselOnly),
            "vessel_voyage" | "voyage" => Ok(Self::VesselVoyage),
            "vessel_carrier_voyage" | "carrier_voyage" => Ok(Self::VesselCarrierVoyage),
            other => Err(format!("Unknown key schema: {other}")),
        }
    }
}

/// Standardized join key: upper-cased, trimmed vessel and optional voyage
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JoinKey {
    pub vessel: String,
    pub voyage: Option<String>,
}

/// One vessel call from the terminal schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRecord {
    pub vessel_name: String,
    pub voyage_code: Option<String>,
    pub carrier_name: Option<String>,
    pub arrival_forecast: Option<DateTime<Utc>>,
}

impl ScheduleRecord {
    /// Join key of this record under `schema`
    pub fn join_key(&self, schema: KeySchema) -> JoinKey {
        schema.key(&self.vessel_name, self.voyage_code.as_deref())
    }
}

/// One purchase/shipment order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub order_id: String,
    pub product: String,
    pub quantity: Option<f64>,
    pub vessel_name: String,
    pub voyage_code: Option<String>,
}

impl OrderRecord {
    /// Join key of this order under `schema`
    pub fn join_key(&self, schema: KeySchema) -> JoinKey {
        schema.key(&self.vessel_name, self.voyage_code.as_deref())
    }

    /// Apply the shared key standardization (trim + uppercase vessel and voyage)
    #[must_use]
    pub fn standardized(self) -> Self {
        Self {
            order_id: self.order_id.trim().to_string(),
            product: self.product.trim().to_string(),
            quantity: self.quantity,
            vessel_name: standardize_key(&self.vessel_name),
            voyage_code: standardize_optional_key(self.voyage_code.as_deref()),
        }
    }
}

/// An order joined with its schedule forecast (if any)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedRecord {
    pub order_id: String,
    pub product: String,
    pub quantity: Option<f64>,
    pub vessel_name: String,
    pub voyage_code: Option<String>,
    pub carrier_name: Option<String>,
    pub arrival_forecast: Option<DateTime<Utc>>,
}

impl MatchedRecord {
    /// Join an order with an optional schedule record
    pub fn from_parts(order: &OrderRecord, schedule: Option<&ScheduleRecord>) -> Self {
        Self {
            order_id: order.order_id.clone(),
            product: order.product.clone(),
            quantity: order.quantity,
            vessel_name: order.vessel_name.clone(),
            voyage_code: order.voyage_code.clone(),
            carrier_name: schedule.and_then(|s| s.carrier_name.clone()),
            arrival_forecast: schedule.and_then(|s| s.arrival_forecast),
        }
    }

    /// Whether the order has no usable forecast
    pub fn is_unmatched(&self) -> bool {
        self.arrival_forecast.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_schema_from_str() {
        assert_eq!("vessel_only".parse::<KeySchema>(), Ok(KeySchema::VesselOnly));
        assert_eq!("Vessel-Voyage".parse::<KeySchema>(), Ok(KeySchema::VesselVoyage));
        assert_eq!(
            "carrier_voyage".parse::<KeySchema>(),
            Ok(KeySchema::VesselCarrierVoyage)
        );
        assert!("berth".parse::<KeySchema>().is_err());
    }

    #[test]
    fn test_key_schema_default() {
        assert_eq!(KeySchema::default(), KeySchema::VesselVoyage);
    }

    #[test]
    fn test_vessel_only_key_ignores_voyage() {
        let key = KeySchema::VesselOnly.key(" msc bruna ", Some("123e"));
        assert_eq!(key.vessel, "MSC BRUNA");
        assert_eq!(key.voyage, None);
    }

    #[test]
    fn test_voyage_key_is_standardized() {
        let a = KeySchema::VesselVoyage.key(" msc bruna ", Some("123e"));
        let b = KeySchema::VesselVoyage.key("MSC BRUNA", Some(" 123E"));
        assert_eq!(a, b);
    }

    #[test]
    fn test_order_standardized() {
        let order = OrderRecord {
            order_id: " 201 ".to_string(),
            product: " Algodão".to_string(),
            quantity: Some(300.0),
            vessel_name: " msc bruna ".to_string(),
            voyage_code: Some("  ".to_string()),
        }
        .standardized();

        assert_eq!(order.order_id, "201");
        assert_eq!(order.product, "Algodão");
        assert_eq!(order.vessel_name, "MSC BRUNA");
        assert_eq!(order.voyage_code, None);
    }
}
