//! # Brick Masonry
//!
//! Brick count from the wall area of every room, bathroom and kitchen.
//!
//! ## Method
//!
//! - Wall area per space = 2(L + W) × 9 ft
//! - Summed over all spaces, × floors, × 0.85 for walls shared between spaces
//! - 1.5 bricks per sqft of wall, truncated to whole bricks

use serde::{Deserialize, Serialize};

use crate::errors::CalcResult;
use crate::prices::PriceTable;
use crate::units::{round_to, SqFt};

use super::gray_structure::Takeoff;
use super::CostBreakdown;

/// Fraction of gross wall area left after removing shared walls
pub const SHARED_WALL_FACTOR: f64 = 0.85;

/// Bricks per square foot of wall
pub const BRICKS_PER_SQFT: f64 = 1.5;

/// Brick prices pulled from the price table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrickRates {
    pub price_per_brick: f64,
}

impl BrickRates {
    pub fn from_table(prices: &PriceTable) -> CalcResult<Self> {
        Ok(BrickRates {
            price_per_brick: prices.price("bricks", "price_per_brick")?,
        })
    }
}

/// Brick quantity and cost.
///
/// ## JSON Example
///
/// ```json
/// {
///   "estimated_bricks": 1698,
///   "total_wall_area_sqft": 1132.2,
///   "brick_price_per_unit": 18.0,
///   "estimated_brick_cost": 30564.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BricksResult {
    /// Whole bricks required
    pub estimated_bricks: u64,

    /// Net wall area after the shared-wall reduction (sqft)
    pub total_wall_area_sqft: f64,

    pub brick_price_per_unit: f64,

    /// Bricks × unit price, truncated to whole currency
    pub estimated_brick_cost: f64,
}

impl CostBreakdown for BricksResult {
    fn total_cost(&self) -> f64 {
        self.estimated_brick_cost
    }
}

/// Net wall area across all floors: gross × floors × 0.85
pub fn net_wall_area(gross_per_floor: SqFt, floors: u32) -> SqFt {
    gross_per_floor * (floors as f64 * SHARED_WALL_FACTOR)
}

/// Whole bricks for a net wall area
pub fn brick_count(net_wall_area: SqFt) -> u64 {
    (net_wall_area.value() * BRICKS_PER_SQFT).max(0.0) as u64
}

/// Price the brick count in a takeoff.
pub fn calculate(takeoff: &Takeoff, rates: &BrickRates) -> BricksResult {
    let cost = (takeoff.bricks as f64 * rates.price_per_brick).trunc();
    BricksResult {
        estimated_bricks: takeoff.bricks,
        total_wall_area_sqft: round_to(takeoff.wall_area.value(), 2),
        brick_price_per_unit: rates.price_per_brick,
        estimated_brick_cost: cost,
    }
}
