//! # Trade Calculations
//!
//! Each trade follows the same pattern:
//!
//! - `*Rates` - unit prices pulled from the [`PriceTable`](crate::prices::PriceTable)
//!   by `from_table`, failing on the first missing key
//! - an input struct resolved from [`ProjectInputs`](crate::project::ProjectInputs)
//! - `*Result` - quantities and costs (JSON-serializable)
//! - `calculate(input, rates) -> CalcResult<*Result>` - pure calculation
//!
//! ## Available Calculations
//!
//! - [`gray_structure`] - composite of [`bricks`], [`cement_mortar`] and [`concrete_mix`]
//! - [`steel`] - reinforcement from the gray-structure RCC volume
//! - [`plumbing`] - supply, riser, sewer and ceramics
//! - [`electrical`] - wiring, conduit and accessories
//! - [`paint`] - interior and exterior coatings
//! - [`doors_windows`] - openings, frames and hardware
//! - [`labour`] - covered area × rate

pub mod bricks;
pub mod cement_mortar;
pub mod concrete_mix;
pub mod doors_windows;
pub mod electrical;
pub mod gray_structure;
pub mod labour;
pub mod paint;
pub mod plumbing;
pub mod steel;

use std::ops::{Add, Mul};

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

// Re-export commonly used types
pub use bricks::BricksResult;
pub use cement_mortar::CementMortarResult;
pub use concrete_mix::ConcreteMixResult;
pub use doors_windows::DoorsWindowsResult;
pub use electrical::ElectricalResult;
pub use gray_structure::{GrayStructureInput, GrayStructureOverrides, GrayStructureResult};
pub use labour::LabourResult;
pub use paint::PaintResult;
pub use plumbing::PlumbingResult;
pub use steel::SteelResult;

/// A result that rolls up to a single cost figure.
pub trait CostBreakdown {
    /// Total cost in the price table's currency
    fn total_cost(&self) -> f64;
}

/// Reject NaN and infinite values before they reach a result slot.
pub fn ensure_finite(calculation_type: &str, field: &str, value: f64) -> CalcResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CalcError::calculation_failed(
            calculation_type,
            format!("{} is not finite ({})", field, value),
        ))
    }
}

/// A counted or measured quantity at a unit rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricedQuantity {
    pub quantity: f64,
    pub rate: f64,
    pub cost: f64,
}

impl PricedQuantity {
    pub fn new(quantity: impl Into<f64>, rate: f64) -> Self {
        let quantity = quantity.into();
        PricedQuantity {
            quantity,
            rate,
            cost: quantity * rate,
        }
    }

    /// Σ cost
    pub fn sum(items: &[&PricedQuantity]) -> f64 {
        items.iter().map(|item| item.cost).sum()
    }
}

/// A whole-unit quantity derived from user-supplied counts.
///
/// Arithmetic is checked. Once a step overflows `u32` the whole expression
/// is poisoned and [`Count::get`] reports a calculation failure.
///
/// ```rust
/// use estimate_core::calculations::Count;
///
/// let (rooms, floors) = (Count::new(3), Count::new(2));
/// assert_eq!((rooms * 8 + 4).get("Electrical", "lights"), Ok(28));
/// assert!((Count::new(u32::MAX) * floors).get("Electrical", "lights").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Count(Option<u32>);

impl Count {
    pub const fn new(value: u32) -> Self {
        Count(Some(value))
    }

    /// Whole units in a measured value, rounded down
    pub fn floor(value: f64) -> Self {
        if (0.0..=u32::MAX as f64).contains(&value) {
            Count(Some(value.floor() as u32))
        } else {
            Count(None)
        }
    }

    pub fn get(self, calculation_type: &str, field: &str) -> CalcResult<u32> {
        self.0.ok_or_else(|| {
            CalcError::calculation_failed(
                calculation_type,
                format!("{} exceeds the supported count range", field),
            )
        })
    }
}

impl Add for Count {
    type Output = Count;
    fn add(self, rhs: Count) -> Count {
        Count(self.0.zip(rhs.0).and_then(|(a, b)| a.checked_add(b)))
    }
}

impl Add<u32> for Count {
    type Output = Count;
    fn add(self, rhs: u32) -> Count {
        self + Count::new(rhs)
    }
}

impl Mul for Count {
    type Output = Count;
    fn mul(self, rhs: Count) -> Count {
        Count(self.0.zip(rhs.0).and_then(|(a, b)| a.checked_mul(b)))
    }
}

impl Mul<u32> for Count {
    type Output = Count;
    fn mul(self, rhs: u32) -> Count {
        self * Count::new(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_finite() {
        assert_eq!(ensure_finite("Steel", "cost", 12.5), Ok(12.5));
        let err = ensure_finite("Steel", "cost", f64::NAN).unwrap_err();
        assert_eq!(err.error_code(), "CALCULATION_FAILED");
        assert!(ensure_finite("Paint", "cost", f64::INFINITY).is_err());
    }

    #[test]
    fn test_priced_quantity() {
        let a = PricedQuantity::new(12u32, 40.0);
        let b = PricedQuantity::new(2.5, 10.0);
        assert_eq!(a.cost, 480.0);
        assert_eq!(PricedQuantity::sum(&[&a, &b]), 505.0);
    }

    #[test]
    fn test_count_arithmetic() {
        let (b, k, fl) = (Count::new(2), Count::new(1), Count::new(3));
        assert_eq!(((b * 40 + k * 20) * fl).get("Plumbing", "pipe"), Ok(300));
        assert_eq!(Count::floor(53.2).get("Electrical", "bands"), Ok(53));
    }

    #[test]
    fn test_count_overflow_is_an_error() {
        let huge = Count::new(300_000_000);
        let err = (huge * 15 + 1).get("Plumbing", "pipe_1_2_inch length").unwrap_err();
        assert_eq!(err.error_code(), "CALCULATION_FAILED");
        assert!(err.to_string().contains("pipe_1_2_inch length"));

        // Poison survives later steps
        assert!((Count::new(u32::MAX) + 1 + Count::new(0)).get("x", "y").is_err());
        assert!(Count::floor(f64::NAN).get("x", "y").is_err());
        assert!(Count::floor(1e12).get("x", "y").is_err());
    }
}
