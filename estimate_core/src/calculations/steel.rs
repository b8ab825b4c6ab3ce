//! # Reinforcement Steel
//!
//! Steel is estimated from the RCC volume computed by the gray-structure
//! stage at a flat 2 kg per cubic foot. Running this stage before gray
//! structure is an error, not a zero.
//!
//! ## Example
//!
//! ```rust
//! use estimate_core::calculations::steel::{calculate, SteelRates};
//!
//! let result = calculate(1724.34, &SteelRates { price_per_ton: 265000.0 }).unwrap();
//! assert_eq!(result.total_steel_kg, 3448.68);
//! assert_eq!(result.total_steel_tons, 3.449);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::prices::PriceTable;
use crate::project::{DerivedResults, SlotName};
use crate::units::{round_to, Kilograms, Tons};

use super::{ensure_finite, CostBreakdown};

/// Reinforcement per cubic foot of RCC (kg)
pub const STEEL_KG_PER_CFT: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SteelRates {
    pub price_per_ton: f64,
}

impl SteelRates {
    pub fn from_table(prices: &PriceTable) -> CalcResult<Self> {
        Ok(SteelRates {
            price_per_ton: prices.price("steel", "price_per_ton")?,
        })
    }
}

/// Steel quantity and cost.
///
/// ## JSON Example
///
/// ```json
/// {
///   "rcc_volume_cft": 1724.34,
///   "steel_per_cft_kg": 2.0,
///   "total_steel_kg": 3448.68,
///   "total_steel_tons": 3.449,
///   "steel_rate_per_ton": 265000.0,
///   "total_steel_cost": 913985.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SteelResult {
    pub rcc_volume_cft: f64,
    pub steel_per_cft_kg: f64,
    /// 0.01 kg
    pub total_steel_kg: f64,
    /// 0.001 t
    pub total_steel_tons: f64,
    pub steel_rate_per_ton: f64,
    /// Tons × rate, whole currency
    pub total_steel_cost: f64,
}

impl CostBreakdown for SteelResult {
    fn total_cost(&self) -> f64 {
        self.total_steel_cost
    }
}

/// RCC volume from the gray-structure slot.
///
/// Fails with `MissingUpstream` unless that slot holds a computed result.
pub fn rcc_volume(results: &DerivedResults) -> CalcResult<f64> {
    results
        .gray_structure
        .computed()
        .map(|gray| gray.concrete_mix.total_volume_cft)
        .ok_or_else(|| CalcError::missing_upstream("Steel", SlotName::GrayStructure.as_str()))
}

/// Price the steel for a given RCC volume.
pub fn calculate(rcc_volume_cft: f64, rates: &SteelRates) -> CalcResult<SteelResult> {
    let kg = Kilograms(round_to(rcc_volume_cft * STEEL_KG_PER_CFT, 2));
    let tons = Tons(round_to(Tons::from(kg).value(), 3));
    let cost = (tons.value() * rates.price_per_ton).round();
    ensure_finite("Steel", "total_steel_cost", cost)?;

    Ok(SteelResult {
        rcc_volume_cft,
        steel_per_cft_kg: STEEL_KG_PER_CFT,
        total_steel_kg: kg.value(),
        total_steel_tons: tons.value(),
        steel_rate_per_ton: rates.price_per_ton,
        total_steel_cost: cost,
    })
}

/// Read the upstream volume, then price it.
pub fn calculate_from_results(
    results: &DerivedResults,
    prices: &PriceTable,
) -> CalcResult<SteelResult> {
    let volume = rcc_volume(results)?;
    calculate(volume, &SteelRates::from_table(prices)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prices::fixtures::sample_prices;

    #[test]
    fn test_reference_steel() {
        let result = calculate(1724.34, &SteelRates { price_per_ton: 265000.0 }).unwrap();
        assert_eq!(result.total_steel_kg, 3448.68);
        assert_eq!(result.total_steel_tons, 3.449);
        // 3.449 × 265000 = 913985
        assert_eq!(result.total_steel_cost, 913985.0);
    }

    #[test]
    fn test_without_gray_structure_is_error() {
        let results = DerivedResults::default();
        let err = calculate_from_results(&results, &sample_prices()).unwrap_err();
        assert_eq!(err, CalcError::missing_upstream("Steel", "gray_structure"));
    }

    #[test]
    fn test_missing_price() {
        let err = SteelRates::from_table(&PriceTable::default()).unwrap_err();
        assert_eq!(err, CalcError::missing_price("steel", "price_per_ton"));
    }
}
