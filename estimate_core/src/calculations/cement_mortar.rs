//! # Cement Mortar, Sand, Ballast and Tiles
//!
//! Every mortar stream is a 1:4 cement:sand mix by volume. Cement is 1/5 of
//! the volume, bagged at 1.25 cft per bag; sand is the remaining 4/5.
//!
//! | Stream      | Volume (cft)                              |
//! |-------------|-------------------------------------------|
//! | Masonry     | bricks / 200 bags, 7.5 cft sand per bag   |
//! | Plaster     | (wall + ceiling) × 2 faces × 0.042 ft     |
//! | Flooring    | floor area × 0.25 ft                      |
//! | Base ground | plot area × 0.5 ft                        |
//!
//! Rohri ballast under the base slab is plot area × 6 in. Floor and bathroom
//! wall tiles are priced per square metre.

use serde::{Deserialize, Serialize};

use crate::errors::CalcResult;
use crate::prices::PriceTable;
use crate::units::{round_to, Cft, Feet, SqM};

use super::concrete_mix::steps_per_floor;
use super::gray_structure::Takeoff;
use super::{CostBreakdown, Count};

/// Bricks laid per bag of masonry cement
pub const BRICKS_PER_CEMENT_BAG: f64 = 200.0;
/// Sand per bag of masonry cement (cft)
pub const SAND_CFT_PER_MASONRY_BAG: f64 = 7.5;
/// Plaster thickness, ~12 mm (ft)
pub const PLASTER_THICKNESS_FT: f64 = 0.042;
/// Floor screed thickness (ft)
pub const FLOORING_THICKNESS_FT: f64 = 0.25;
/// Base-ground slab thickness (ft)
pub const BASE_GROUND_THICKNESS_FT: f64 = 0.5;
/// Rohri ballast depth (ft)
pub const ROHRI_DEPTH_FT: f64 = 6.0 / 12.0;
/// Loose volume of one cement bag (cft)
pub const CFT_PER_CEMENT_BAG: f64 = 1.25;
/// Cement share of a 1:4 mix
pub const CEMENT_FRACTION: f64 = 0.2;
/// Sand share of a 1:4 mix
pub const SAND_FRACTION: f64 = 0.8;

/// Mortar-side prices pulled from the price table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MortarRates {
    pub cement_per_bag: f64,
    pub sand_per_cft: f64,
    pub rohri_per_cft: f64,
    pub tiles_per_cmt: f64,
    pub marble_step_per_pcs: f64,
}

impl MortarRates {
    pub fn from_table(prices: &PriceTable) -> CalcResult<Self> {
        Ok(MortarRates {
            cement_per_bag: prices.price("cement", "price_per_bag")?,
            sand_per_cft: prices.price("sand", "price_per_cft")?,
            rohri_per_cft: prices.price("rohri", "price_per_cft")?,
            tiles_per_cmt: prices.price("flooring_tiles", "tiles_per_cmt")?,
            marble_step_per_pcs: prices.price("marble_steps", "step_per_pcs")?,
        })
    }
}

/// Cement bags and sand for one 1:4 mortar volume.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MortarSplit {
    pub volume_cft: f64,
    pub cement_bags: f64,
    pub sand_cft: f64,
}

impl MortarSplit {
    /// Split a wet volume 1:4 into bags of cement and cft of sand
    pub fn from_volume(volume: Cft) -> Self {
        MortarSplit {
            volume_cft: volume.value(),
            cement_bags: volume.value() * CEMENT_FRACTION / CFT_PER_CEMENT_BAG,
            sand_cft: volume.value() * SAND_FRACTION,
        }
    }

    /// Masonry is quantified from the brick count, not a volume
    pub fn masonry(bricks: u64) -> Self {
        let cement_bags = bricks as f64 / BRICKS_PER_CEMENT_BAG;
        MortarSplit {
            volume_cft: 0.0,
            cement_bags,
            sand_cft: cement_bags * SAND_CFT_PER_MASONRY_BAG,
        }
    }
}

/// Cement, sand, rohri and tile quantities with their costs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CementMortarResult {
    pub masonry: MortarSplit,
    pub plaster: MortarSplit,
    pub flooring: MortarSplit,
    pub base_ground: MortarSplit,

    pub plaster_volume_cft: f64,
    pub cement_bags: f64,
    pub sand_cft: f64,
    pub rohri_cft: f64,
    pub floor_tiles_cmt: f64,
    pub bath_wall_tiles_cmt: f64,
    pub marble_steps: u32,

    pub cement_cost: f64,
    pub sand_cost: f64,
    pub rohri_cost: f64,
    pub floor_tiles_cost: f64,
    pub bath_wall_tiles_cost: f64,
    /// Reported alongside mortar; not part of `mortar_cost`
    pub marble_steps_cost: f64,

    /// Cement + sand + rohri + floor tiles + bathroom wall tiles
    pub mortar_cost: f64,
}

impl CostBreakdown for CementMortarResult {
    fn total_cost(&self) -> f64 {
        self.mortar_cost
    }
}

/// Quantify and price mortar, ballast and tiles for a takeoff.
pub fn calculate(takeoff: &Takeoff, rates: &MortarRates) -> CalcResult<CementMortarResult> {
    let masonry = MortarSplit::masonry(takeoff.bricks);
    let plastered = (takeoff.wall_area + takeoff.ceiling_area) * 2.0;
    let plaster = MortarSplit::from_volume(plastered * Feet(PLASTER_THICKNESS_FT));
    let flooring = MortarSplit::from_volume(takeoff.floor_area * Feet(FLOORING_THICKNESS_FT));
    let base_ground = MortarSplit::from_volume(takeoff.plot_area * Feet(BASE_GROUND_THICKNESS_FT));
    let rohri = takeoff.plot_area * Feet(ROHRI_DEPTH_FT);

    let floor_tiles: SqM = takeoff.floor_area.into();
    let bath_wall_tiles: SqM = takeoff.bath_wall_area.into();

    let streams = [masonry, plaster, flooring, base_ground];
    let cement_bags: f64 = streams.iter().map(|s| s.cement_bags).sum();
    let sand_cft: f64 = streams.iter().map(|s| s.sand_cft).sum();

    let cement_cost = cement_bags * rates.cement_per_bag;
    let sand_cost = sand_cft * rates.sand_per_cft;
    let rohri_cost = rohri.value() * rates.rohri_per_cft;
    let floor_tiles_cost = floor_tiles.value() * rates.tiles_per_cmt;
    let bath_wall_tiles_cost = bath_wall_tiles.value() * rates.tiles_per_cmt;

    let marble_steps =
        (Count::new(steps_per_floor()) * takeoff.floors).get("Gray Structure", "marble_steps")?;
    let marble_steps_cost = marble_steps as f64 * rates.marble_step_per_pcs;

    let mortar_cost =
        cement_cost + sand_cost + rohri_cost + floor_tiles_cost + bath_wall_tiles_cost;

    Ok(CementMortarResult {
        masonry,
        plaster,
        flooring,
        base_ground,
        plaster_volume_cft: plaster.volume_cft,
        cement_bags: round_to(cement_bags, 1),
        sand_cft: round_to(sand_cft, 1),
        rohri_cft: round_to(rohri.value(), 1),
        floor_tiles_cmt: round_to(floor_tiles.value(), 1),
        bath_wall_tiles_cmt: round_to(bath_wall_tiles.value(), 1),
        marble_steps,
        cement_cost: cement_cost.round(),
        sand_cost: sand_cost.round(),
        rohri_cost: rohri_cost.round(),
        floor_tiles_cost: floor_tiles_cost.round(),
        bath_wall_tiles_cost: bath_wall_tiles_cost.round(),
        marble_steps_cost: marble_steps_cost.round(),
        mortar_cost,
    })
}
