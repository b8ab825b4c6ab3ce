//! # Price Table
//!
//! The price list is an externally maintained JSON object keyed by material
//! name, each entry holding one or more unit-price fields:
//!
//! ```json
//! {
//!   "bricks": { "price_per_brick": 18 },
//!   "cement": { "price_per_bag": 1450 },
//!   "labour": { "rate_per_sqft": 650 }
//! }
//! ```
//!
//! The table is loaded once and shared read-only. Values stay untyped until a
//! calculator asks for them through a per-trade rate struct (see the
//! `*Rates::from_table` constructors in each calculation module), so a bad
//! entry only fails the trade that needs it.
//!
//! ## Example
//!
//! ```rust
//! use estimate_core::prices::PriceTable;
//!
//! let table = PriceTable::from_json_str(r#"{ "steel": { "price_per_ton": 265000 } }"#).unwrap();
//! assert_eq!(table.price("steel", "price_per_ton").unwrap(), 265000.0);
//! assert!(table.price("steel", "price_per_kg").is_err());
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{CalcError, CalcResult};

/// Read-only material price lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceTable {
    entries: BTreeMap<String, Value>,
}

impl PriceTable {
    /// Parse a price table from JSON text.
    ///
    /// The root must be an object; individual entries are not checked here.
    pub fn from_json_str(json: &str) -> CalcResult<Self> {
        serde_json::from_str(json).map_err(|e| CalcError::SerializationError {
            reason: format!("Invalid price table: {}", e),
        })
    }

    /// Load a price table from disk.
    pub fn load(path: &Path) -> CalcResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            CalcError::file_error("read price table", path.display().to_string(), e.to_string())
        })?;
        let table = Self::from_json_str(&contents)?;
        tracing::info!(path = %path.display(), materials = table.len(), "loaded price table");
        Ok(table)
    }

    /// Build a table in code, mostly for tests and fixtures.
    pub fn with_price(mut self, material: &str, field: &str, price: f64) -> Self {
        let entry = self
            .entries
            .entry(material.to_string())
            .or_insert_with(|| Value::Object(Default::default()));
        if let Value::Object(fields) = entry {
            fields.insert(field.to_string(), Value::from(price));
        }
        self
    }

    /// Number of materials in the table
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Material names in sorted order
    pub fn materials(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Look up `material.field` as a number.
    pub fn price(&self, material: &str, field: &str) -> CalcResult<f64> {
        let entry = self
            .entries
            .get(material)
            .ok_or_else(|| CalcError::missing_price(material, field))?;
        if !entry.is_object() {
            return Err(CalcError::malformed_price(material, field, entry.to_string()));
        }
        let value = entry
            .get(field)
            .ok_or_else(|| CalcError::missing_price(material, field))?;
        value
            .as_f64()
            .ok_or_else(|| CalcError::malformed_price(material, field, value.to_string()))
    }

    /// Look up the first of several accepted field names (e.g. `price_per_sft`
    /// and `price_per_sqft` are both in circulation). Reports the first name
    /// when none is present.
    pub fn price_any(&self, material: &str, fields: &[&str]) -> CalcResult<f64> {
        for field in fields {
            match self.price(material, field) {
                Err(CalcError::MissingPrice { .. }) => continue,
                other => return other,
            }
        }
        Err(CalcError::missing_price(material, fields.first().copied().unwrap_or_default()))
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::PriceTable;

    /// A complete price list covering every key the calculators read.
    pub(crate) const SAMPLE_PRICES: &str = r#"{
        "bricks": { "price_per_brick": 18 },
        "cement": { "price_per_bag": 1450 },
        "sand": { "price_per_cft": 90 },
        "rohri": { "price_per_cft": 60 },
        "bajri": { "price_per_cft": 180 },
        "crush": { "price_per_cft": 150 },
        "flooring_tiles": { "tiles_per_cmt": 1200 },
        "marble_steps": { "step_per_pcs": 3500 },
        "steel": { "price_per_ton": 265000 },
        "pipe_1_2_inch": { "price_per_ft": 55 },
        "elbow_1_2": { "price_per_unit": 40 },
        "socket_1_2": { "price_per_unit": 25 },
        "tee_1_2": { "price_per_unit": 45 },
        "brass_socket_1_2": { "price_per_unit": 180 },
        "pipe_1_25_inch": { "price_per_ft": 140 },
        "elbow_1_25": { "price_per_unit": 120 },
        "socket_1_25": { "price_per_unit": 90 },
        "tee_1_25": { "price_per_unit": 150 },
        "pipe_6_inch_sewer_pipe": { "price_per_ft": 420 },
        "elbow_6_inch": { "price_per_unit": 650 },
        "socket_6_inch": { "price_per_unit": 450 },
        "pipe_4_inch_sewer_pipe": { "price_per_ft": 260 },
        "elbow_4_inch": { "price_per_unit": 300 },
        "tee_4_inch": { "price_per_unit": 350 },
        "ytee_4_inch": { "price_per_unit": 400 },
        "ptrap_4_inch": { "price_per_unit": 380 },
        "bathroom_set": { "price_per_unit": 18000 },
        "commode": { "price_per_unit": 22000 },
        "wash_basin": { "price_per_unit": 9000 },
        "kitchen_sink": { "price_per_unit": 12000 },
        "kitchen_mixer": { "price_per_unit": 6500 },
        "washing_tap": { "price_per_unit": 1200 },
        "wire_3_29": { "price_per_ft": 18 },
        "wire_7_29": { "price_per_ft": 32 },
        "wire_7_36": { "price_per_ft": 48 },
        "wire_7_44": { "price_per_ft": 75 },
        "pipe": { "price_per_ft": 22 },
        "band": { "price_per_unit": 15 },
        "plastic_socket": { "price_per_unit": 10 },
        "fan_box": { "price_per_unit": 120 },
        "switch_box": { "price_per_unit": 90 },
        "electric_sheet": { "price_per_unit": 450 },
        "led_light": { "price_per_unit": 550 },
        "db": { "price_per_unit": 4500 },
        "breaker": { "price_per_unit": 1100 },
        "paint": { "price_per_gallon": 3200 },
        "primer": { "price_per_gallon": 2200 },
        "putty": { "price_per_gallon": 1500 },
        "exterior_paint": { "price_per_gallon": 4200 },
        "door": { "price_per_sft": 2200 },
        "window": { "price_per_sft": 1400 },
        "door_window_frame": { "price_per_rft": 650 },
        "door_lock": { "price_per_lock": 2500 },
        "bolt": { "price_per_bolt": 350 },
        "door_stopper": { "price_per_stopper": 250 },
        "labour": { "rate_per_sqft": 650 }
    }"#;

    pub(crate) fn sample_prices() -> PriceTable {
        PriceTable::from_json_str(SAMPLE_PRICES).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let table = fixtures::sample_prices();
        assert_eq!(table.price("bricks", "price_per_brick").unwrap(), 18.0);
        assert!(table.len() > 50);
    }

    #[test]
    fn test_missing_material_and_field() {
        let table = fixtures::sample_prices();
        assert_eq!(
            table.price("marble", "price_per_sqft"),
            Err(CalcError::missing_price("marble", "price_per_sqft"))
        );
        let err = table.price("bricks", "price_per_bag").unwrap_err();
        assert_eq!(err.error_code(), "MISSING_PRICE");
    }

    #[test]
    fn test_malformed_value() {
        let table =
            PriceTable::from_json_str(r#"{ "door": { "price_per_sft": "call us" } }"#).unwrap();
        let err = table.price("door", "price_per_sft").unwrap_err();
        assert_eq!(err.error_code(), "MALFORMED_PRICE");
    }

    #[test]
    fn test_price_any_prefers_first_present() {
        let table = PriceTable::default().with_price("door", "price_per_sqft", 2000.0);
        assert_eq!(table.price_any("door", &["price_per_sft", "price_per_sqft"]).unwrap(), 2000.0);
        let err = table.price_any("window", &["price_per_sft", "price_per_sqft"]).unwrap_err();
        assert_eq!(err, CalcError::missing_price("window", "price_per_sft"));
    }

    #[test]
    fn test_non_object_entry_is_local_error() {
        let json = r#"{ "bricks": 18, "cement": { "price_per_bag": 1450 } }"#;
        let table = PriceTable::from_json_str(json).unwrap();
        let err = table.price("bricks", "price_per_brick").unwrap_err();
        assert_eq!(err.error_code(), "MALFORMED_PRICE");
        assert_eq!(table.price("cement", "price_per_bag").unwrap(), 1450.0);
    }

    #[test]
    fn test_rejects_non_object_root() {
        assert!(PriceTable::from_json_str("[1, 2, 3]").is_err());
    }
}
