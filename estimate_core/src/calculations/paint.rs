//! # Paint
//!
//! Interior paint, primer and putty cover every wall and ceiling of the
//! parsed rooms, bathrooms and kitchens. Exterior paint covers a box around
//! the largest room dimensions, 20 × 20 ft when no room parsed.
//!
//! Coverage per gallon: paint 350 sqft, primer 300, putty 100, exterior 325.

use serde::{Deserialize, Serialize};

use crate::errors::CalcResult;
use crate::prices::PriceTable;
use crate::project::ProjectInputs;
use crate::sizes::{parse_sizes, total_area, total_wall_area, RoomSize, WALL_HEIGHT_FT};
use crate::units::round_to;

use super::{ensure_finite, CostBreakdown};

pub const PAINT_COVERAGE_SQFT: f64 = 350.0;
pub const PRIMER_COVERAGE_SQFT: f64 = 300.0;
pub const PUTTY_COVERAGE_SQFT: f64 = 100.0;
pub const EXTERIOR_COVERAGE_SQFT: f64 = 325.0;

/// Exterior footprint used when no room size parsed
pub const DEFAULT_EXTERIOR_FOOTPRINT: RoomSize = RoomSize::new(20.0, 20.0);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaintRates {
    pub paint_per_gallon: f64,
    pub primer_per_gallon: f64,
    pub putty_per_gallon: f64,
    pub exterior_per_gallon: f64,
}

impl PaintRates {
    pub fn from_table(prices: &PriceTable) -> CalcResult<Self> {
        let gallon = |material: &str| prices.price(material, "price_per_gallon");
        Ok(PaintRates {
            paint_per_gallon: gallon("paint")?,
            primer_per_gallon: gallon("primer")?,
            putty_per_gallon: gallon("putty")?,
            exterior_per_gallon: gallon("exterior_paint")?,
        })
    }
}

/// Parsed spaces for painting. No defaults are substituted for empty lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaintInput {
    pub number_of_floors: u32,
    pub rooms: Vec<RoomSize>,
    pub bathrooms: Vec<RoomSize>,
    pub kitchens: Vec<RoomSize>,
}

impl PaintInput {
    pub fn from_inputs(inputs: &ProjectInputs) -> Self {
        PaintInput {
            number_of_floors: inputs.number_of_floors,
            rooms: parse_sizes(&inputs.room_sizes).sizes,
            bathrooms: parse_sizes(&inputs.bathroom_sizes).sizes,
            kitchens: parse_sizes(&inputs.kitchen_sizes).sizes,
        }
    }

    /// Largest room length and largest room width, taken independently
    pub fn exterior_footprint(&self) -> RoomSize {
        if self.rooms.is_empty() {
            return DEFAULT_EXTERIOR_FOOTPRINT;
        }
        let max_length = self.rooms.iter().map(|r| r.length_ft).fold(f64::MIN, f64::max);
        let max_width = self.rooms.iter().map(|r| r.width_ft).fold(f64::MIN, f64::max);
        RoomSize::new(max_length, max_width)
    }
}

/// Gallons and cost of one coating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coating {
    pub gallons_required: f64,
    pub price_per_gallon: f64,
    pub cost: f64,
}

impl Coating {
    fn new(area_sqft: f64, coverage_sqft: f64, price_per_gallon: f64) -> (Self, f64) {
        let gallons = area_sqft / coverage_sqft;
        let cost = gallons * price_per_gallon;
        let coating = Coating {
            gallons_required: round_to(gallons, 2),
            price_per_gallon,
            cost: round_to(cost, 2),
        };
        (coating, cost)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteriorPaint {
    pub wall_area_sqft: f64,
    pub ceiling_area_sqft: f64,
    pub total_paint_area_sqft: f64,
    pub paint: Coating,
    pub primer: Coating,
    pub putty: Coating,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExteriorPaint {
    pub wall_area_sqft: f64,
    #[serde(flatten)]
    pub coating: Coating,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaintResult {
    pub interior: InteriorPaint,
    pub exterior: ExteriorPaint,
    pub total_cost: f64,
}

impl CostBreakdown for PaintResult {
    fn total_cost(&self) -> f64 {
        self.total_cost
    }
}

pub fn calculate(input: &PaintInput, rates: &PaintRates) -> CalcResult<PaintResult> {
    let floors = input.number_of_floors as f64;
    let spaces: Vec<RoomSize> = input
        .rooms
        .iter()
        .chain(&input.bathrooms)
        .chain(&input.kitchens)
        .copied()
        .collect();

    let wall_area = total_wall_area(&spaces).value() * floors;
    let ceiling_area = total_area(&spaces).value() * floors;
    let paint_area = wall_area + ceiling_area;

    let (paint, paint_cost) = Coating::new(paint_area, PAINT_COVERAGE_SQFT, rates.paint_per_gallon);
    let (primer, primer_cost) =
        Coating::new(paint_area, PRIMER_COVERAGE_SQFT, rates.primer_per_gallon);
    let (putty, putty_cost) = Coating::new(paint_area, PUTTY_COVERAGE_SQFT, rates.putty_per_gallon);

    let footprint = input.exterior_footprint();
    let exterior_area = footprint.perimeter_ft().value() * floors * WALL_HEIGHT_FT;
    let (exterior, exterior_cost) =
        Coating::new(exterior_area, EXTERIOR_COVERAGE_SQFT, rates.exterior_per_gallon);

    let total_cost = round_to(paint_cost + primer_cost + putty_cost + exterior_cost, 2);
    ensure_finite("Paint", "total_cost", total_cost)?;

    Ok(PaintResult {
        interior: InteriorPaint {
            wall_area_sqft: round_to(wall_area, 2),
            ceiling_area_sqft: round_to(ceiling_area, 2),
            total_paint_area_sqft: round_to(paint_area, 2),
            paint,
            primer,
            putty,
        },
        exterior: ExteriorPaint {
            wall_area_sqft: round_to(exterior_area, 2),
            coating: exterior,
        },
        total_cost,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::fixtures::reference_inputs;

    fn rates() -> PaintRates {
        PaintRates {
            paint_per_gallon: 3500.0,
            primer_per_gallon: 3000.0,
            putty_per_gallon: 1000.0,
            exterior_per_gallon: 3250.0,
        }
    }

    #[test]
    fn test_interior_areas() {
        let input = PaintInput::from_inputs(&reference_inputs());
        let r = calculate(&input, &rates()).unwrap();
        assert_eq!(r.interior.wall_area_sqft, 1332.0);
        assert_eq!(r.interior.ceiling_area_sqft, 360.0);
        assert_eq!(r.interior.total_paint_area_sqft, 1692.0);
        // 1692 / 350 × 3500
        assert_eq!(r.interior.paint.cost, 16920.0);
        assert_eq!(r.interior.putty.gallons_required, 16.92);
    }

    #[test]
    fn test_exterior_uses_max_room_dimensions() {
        let input = PaintInput {
            number_of_floors: 1,
            rooms: vec![RoomSize::new(12.0, 10.0), RoomSize::new(10.0, 14.0)],
            bathrooms: vec![],
            kitchens: vec![],
        };
        assert_eq!(input.exterior_footprint(), RoomSize::new(12.0, 14.0));
    }

    #[test]
    fn test_exterior_fallback_when_no_rooms() {
        let mut inputs = reference_inputs();
        inputs.room_sizes = String::new();
        inputs.number_of_floors = 2;
        let input = PaintInput::from_inputs(&inputs);
        assert_eq!(input.exterior_footprint(), DEFAULT_EXTERIOR_FOOTPRINT);

        let r = calculate(&input, &rates()).unwrap();
        // 2 × (20 + 20) × 2 floors × 9 ft
        assert_eq!(r.exterior.wall_area_sqft, 1440.0);
    }

    #[test]
    fn test_total_is_rounded_sum() {
        let input = PaintInput::from_inputs(&reference_inputs());
        let r = calculate(&input, &rates()).unwrap();
        let sum = r.interior.paint.cost
            + r.interior.primer.cost
            + r.interior.putty.cost
            + r.exterior.coating.cost;
        assert!((r.total_cost() - sum).abs() < 0.05);
    }

    #[test]
    fn test_missing_exterior_price() {
        let prices = PriceTable::default()
            .with_price("paint", "price_per_gallon", 1.0)
            .with_price("primer", "price_per_gallon", 1.0)
            .with_price("putty", "price_per_gallon", 1.0);
        assert_eq!(PaintRates::from_table(&prices).unwrap_err().error_code(), "MISSING_PRICE");
    }
}
