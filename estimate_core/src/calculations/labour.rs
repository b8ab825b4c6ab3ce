//! # Labour
//!
//! Covered area × a flat labour rate. Covered area is the plot area on every
//! floor, plus twice the plan area of each included tank (walls and slab)
//! and the plan area of the stair tower.

use serde::{Deserialize, Serialize};

use crate::errors::CalcResult;
use crate::prices::PriceTable;
use crate::project::{ProjectInputs, StructureKind};
use crate::sizes::RoomSize;

use super::{ensure_finite, CostBreakdown};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabourRates {
    pub rate_per_sqft: f64,
}

impl LabourRates {
    pub fn from_table(prices: &PriceTable) -> CalcResult<Self> {
        Ok(LabourRates {
            rate_per_sqft: prices.price("labour", "rate_per_sqft")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabourInput {
    pub plot_area_sqft: f64,
    pub number_of_floors: u32,
    pub underground_tank: Option<RoomSize>,
    pub overhead_tank: Option<RoomSize>,
    pub tower: Option<RoomSize>,
}

impl LabourInput {
    pub fn from_inputs(inputs: &ProjectInputs) -> Self {
        LabourInput {
            plot_area_sqft: inputs.plot_area().value(),
            number_of_floors: inputs.number_of_floors,
            underground_tank: inputs.structure(StructureKind::UndergroundTank),
            overhead_tank: inputs.structure(StructureKind::OverheadTank),
            tower: inputs.structure(StructureKind::Tower),
        }
    }

    pub fn covered_area(&self) -> f64 {
        let plan = |s: Option<RoomSize>| s.map(|s| s.area().value()).unwrap_or(0.0);
        self.plot_area_sqft * self.number_of_floors as f64
            + plan(self.underground_tank) * 2.0
            + plan(self.overhead_tank) * 2.0
            + plan(self.tower)
    }
}

/// Labour estimate.
///
/// ## JSON Example
///
/// ```json
/// {
///   "base_plot_area_sqft": 1200.0,
///   "number_of_floors": 2,
///   "total_area_sqft": 2400.0,
///   "labour_rate_per_sqft": 650.0,
///   "total_labour_cost": 1560000.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabourResult {
    pub base_plot_area_sqft: f64,
    pub number_of_floors: u32,
    /// Including tanks and tower
    pub total_area_sqft: f64,
    pub labour_rate_per_sqft: f64,
    pub total_labour_cost: f64,
}

impl CostBreakdown for LabourResult {
    fn total_cost(&self) -> f64 {
        self.total_labour_cost
    }
}

pub fn calculate(input: &LabourInput, rates: &LabourRates) -> CalcResult<LabourResult> {
    let area = input.covered_area();
    let cost = (area * rates.rate_per_sqft).round();
    ensure_finite("Labour", "total_labour_cost", cost)?;

    Ok(LabourResult {
        base_plot_area_sqft: input.plot_area_sqft,
        number_of_floors: input.number_of_floors,
        total_area_sqft: area,
        labour_rate_per_sqft: rates.rate_per_sqft,
        total_labour_cost: cost,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::OptionalStructure;

    #[test]
    fn test_plot_times_floors() {
        let inputs = ProjectInputs::new(30.0, 40.0, 2, 3);
        let rates = LabourRates { rate_per_sqft: 650.0 };
        let r = calculate(&LabourInput::from_inputs(&inputs), &rates).unwrap();
        assert_eq!(r.total_area_sqft, 2400.0);
        assert_eq!(r.total_labour_cost, 1_560_000.0);
    }

    #[test]
    fn test_tanks_and_tower_add_area() {
        let mut inputs = ProjectInputs::new(30.0, 40.0, 1, 2);
        inputs.underground_tank = OptionalStructure::included(None, None);
        inputs.overhead_tank = OptionalStructure::included(None, None);
        inputs.tower = OptionalStructure::included(Some(8.0), Some(8.0));
        let input = LabourInput::from_inputs(&inputs);
        // 1200 + 48×2 + 30×2 + 64
        assert_eq!(input.covered_area(), 1420.0);
    }

    #[test]
    fn test_explicit_plot_size() {
        let mut inputs = ProjectInputs::new(30.0, 40.0, 2, 2);
        inputs.plot_size_sqft = Some(1125.0);
        assert_eq!(LabourInput::from_inputs(&inputs).covered_area(), 2250.0);
    }

    #[test]
    fn test_missing_rate() {
        let err = LabourRates::from_table(&PriceTable::default()).unwrap_err();
        assert_eq!(err.error_code(), "MISSING_PRICE");
    }
}
