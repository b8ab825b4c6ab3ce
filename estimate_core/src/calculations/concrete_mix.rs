//! # RCC Concrete Mix
//!
//! Volumetric takeoff of every reinforced-concrete element, in cubic feet,
//! split into a 1:4:2 cement:bajri:crush mix.
//!
//! ## Elements
//!
//! | Element        | Volume (cft)                                        |
//! |----------------|-----------------------------------------------------|
//! | Footings       | 50 per column (5 × 5 × 2 pit)                       |
//! | Short columns  | 4 per column                                        |
//! | Full columns   | 10.5 per column                                     |
//! | Plinth beam    | (2(L + W) + 20 × rooms) × 2 × 0.5                   |
//! | Roof slab      | L × W × 0.42 × floors (5 in slab)                   |
//! | Beams          | (2(L + W) + 10 × rooms) × 1.5 × 0.5 × floors        |
//! | Tower          | 4 columns + slab + perimeter beam, when included    |
//! | Stairs         | steps per floor × floors × 3.5 × 0.5 × 0.583        |
//! | UG / OH tank   | walls (9 ft / 5 ft high, 6 in thick) + floor + slab |

use serde::{Deserialize, Serialize};

use crate::errors::CalcResult;
use crate::prices::PriceTable;
use crate::sizes::RoomSize;
use crate::units::{round_to, Cft};

use super::cement_mortar::CFT_PER_CEMENT_BAG;
use super::CostBreakdown;

/// Footing concrete per column (cft)
pub const FOOTING_CFT_PER_COLUMN: f64 = 50.0;
/// Short (plinth-level) column concrete per column (cft)
pub const SHORT_COLUMN_CFT_PER_COLUMN: f64 = 4.0;
/// Full-height column concrete per column (cft)
pub const FULL_COLUMN_CFT_PER_COLUMN: f64 = 10.5;
/// Slab thickness, 5 in (ft)
pub const SLAB_THICKNESS_FT: f64 = 0.42;
/// Storey height used for stair rise (ft)
pub const FLOOR_HEIGHT_FT: f64 = 10.0;
/// Riser height, ~7 in (ft)
pub const RISER_HEIGHT_FT: f64 = 0.583;
pub const STAIR_WIDTH_FT: f64 = 3.5;
pub const TREAD_DEPTH_FT: f64 = 0.5;
/// Underground tank wall height (ft)
pub const UG_TANK_WALL_HEIGHT_FT: f64 = 9.0;
/// Overhead tank wall height (ft)
pub const OH_TANK_WALL_HEIGHT_FT: f64 = 5.0;
/// Tank wall, floor and cover slab thickness (ft)
pub const TANK_THICKNESS_FT: f64 = 0.5;

/// Whole steps in one flight of stairs
pub fn steps_per_floor() -> u32 {
    (FLOOR_HEIGHT_FT / RISER_HEIGHT_FT) as u32
}

/// Concrete-side prices pulled from the price table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConcreteRates {
    pub cement_per_bag: f64,
    pub bajri_per_cft: f64,
    pub crush_per_cft: f64,
}

impl ConcreteRates {
    pub fn from_table(prices: &PriceTable) -> CalcResult<Self> {
        Ok(ConcreteRates {
            cement_per_bag: prices.price("cement", "price_per_bag")?,
            bajri_per_cft: prices.price("bajri", "price_per_cft")?,
            crush_per_cft: prices.price("crush", "price_per_cft")?,
        })
    }
}

/// Geometry the concrete takeoff needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcreteInput {
    pub number_of_floors: u32,
    pub number_of_rooms: u32,
    pub number_of_columns: u32,
    pub plot_length_ft: f64,
    pub plot_width_ft: f64,
    /// Resolved tank/tower plan sizes; `None` when not included
    pub underground_tank: Option<RoomSize>,
    pub overhead_tank: Option<RoomSize>,
    pub tower: Option<RoomSize>,
}

/// Per-element volumes (cft), unrounded.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ConcreteVolumes {
    pub footings_cft: f64,
    pub short_columns_cft: f64,
    pub full_columns_cft: f64,
    pub plinth_beam_cft: f64,
    pub slab_cft: f64,
    pub beams_cft: f64,
    pub tower_cft: f64,
    pub stairs_cft: f64,
    pub ug_tank_cft: f64,
    pub oh_tank_cft: f64,
}

impl ConcreteVolumes {
    pub fn total(&self) -> Cft {
        Cft(self.footings_cft
            + self.short_columns_cft
            + self.full_columns_cft
            + self.slab_cft
            + self.beams_cft
            + self.plinth_beam_cft
            + self.tower_cft
            + self.stairs_cft
            + self.ug_tank_cft
            + self.oh_tank_cft)
    }
}

/// Concrete quantities and costs.
///
/// ## JSON Example
///
/// ```json
/// {
///   "total_volume_cft": 1724.34,
///   "cement_bags": 197.1,
///   "bajri_cft": 985.3,
///   "crush_cft": 492.7,
///   "cement_cost": 285771.0,
///   "bajri_cost": 177359.0,
///   "crush_cost": 73900.0,
///   "concrete_cost": 537030.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcreteMixResult {
    pub volumes: ConcreteVolumes,
    pub steps_per_floor: u32,

    /// Total RCC volume rounded to 0.01 cft; the figure steel is estimated from
    pub total_volume_cft: f64,
    pub cement_bags: f64,
    pub bajri_cft: f64,
    pub crush_cft: f64,

    pub cement_cost: f64,
    pub bajri_cost: f64,
    pub crush_cost: f64,
    pub concrete_cost: f64,
}

impl CostBreakdown for ConcreteMixResult {
    fn total_cost(&self) -> f64 {
        self.concrete_cost
    }
}

fn tank_volume(size: RoomSize, wall_height_ft: f64) -> f64 {
    let wall_area = 2.0 * (size.length_ft * wall_height_ft + size.width_ft * wall_height_ft);
    let walls = wall_area * TANK_THICKNESS_FT;
    let floor = size.length_ft * size.width_ft * TANK_THICKNESS_FT;
    let cover_slab = floor;
    walls + floor + cover_slab
}

fn tower_volume(size: RoomSize) -> f64 {
    let columns = 4.0 * (1.5 * 0.5 * 10.0);
    let slab = size.length_ft * size.width_ft * SLAB_THICKNESS_FT;
    let beams = (size.length_ft + size.width_ft) * 2.0 * 1.5 * 0.5;
    columns + slab + beams
}

/// Element-by-element RCC volumes.
pub fn volumes(input: &ConcreteInput) -> ConcreteVolumes {
    let columns = input.number_of_columns as f64;
    let floors = input.number_of_floors as f64;
    let rooms = input.number_of_rooms as f64;
    let plot_perimeter = (input.plot_length_ft + input.plot_width_ft) * 2.0;

    let plinth_length = plot_perimeter + rooms * 20.0;
    let beam_length = plot_perimeter + rooms * 10.0;
    let step_volume = STAIR_WIDTH_FT * TREAD_DEPTH_FT * RISER_HEIGHT_FT;

    ConcreteVolumes {
        footings_cft: FOOTING_CFT_PER_COLUMN * columns,
        short_columns_cft: SHORT_COLUMN_CFT_PER_COLUMN * columns,
        full_columns_cft: FULL_COLUMN_CFT_PER_COLUMN * columns,
        plinth_beam_cft: plinth_length * 2.0 * 0.5,
        slab_cft: input.plot_length_ft * input.plot_width_ft * SLAB_THICKNESS_FT * floors,
        beams_cft: beam_length * 1.5 * 0.5 * floors,
        tower_cft: input.tower.map(tower_volume).unwrap_or(0.0),
        stairs_cft: floors * steps_per_floor() as f64 * step_volume,
        ug_tank_cft: input
            .underground_tank
            .map(|s| tank_volume(s, UG_TANK_WALL_HEIGHT_FT))
            .unwrap_or(0.0),
        oh_tank_cft: input
            .overhead_tank
            .map(|s| tank_volume(s, OH_TANK_WALL_HEIGHT_FT))
            .unwrap_or(0.0),
    }
}

const CEMENT_PART: f64 = 1.0 / 7.0;
const BAJRI_PART: f64 = 4.0 / 7.0;
const CRUSH_PART: f64 = 2.0 / 7.0;

/// Unrounded cement, bajri and crush costs of a 1:4:2 mix
fn mix_costs(total: Cft, rates: &ConcreteRates) -> [f64; 3] {
    let cement_bags = (total * CEMENT_PART).value() / CFT_PER_CEMENT_BAG;
    [
        cement_bags * rates.cement_per_bag,
        (total * BAJRI_PART).value() * rates.bajri_per_cft,
        (total * CRUSH_PART).value() * rates.crush_per_cft,
    ]
}

/// Unrounded mix cost of an RCC volume; `concrete_cost` is this, rounded.
pub fn mix_cost(total: Cft, rates: &ConcreteRates) -> f64 {
    let [cement, bajri, crush] = mix_costs(total, rates);
    cement + bajri + crush
}

/// Quantify and price the concrete mix.
pub fn calculate(input: &ConcreteInput, rates: &ConcreteRates) -> ConcreteMixResult {
    let volumes = volumes(input);
    let total = volumes.total();

    let cement_bags = (total * CEMENT_PART).value() / CFT_PER_CEMENT_BAG;
    let bajri_cft = total * BAJRI_PART;
    let crush_cft = total * CRUSH_PART;

    let [cement_cost, bajri_cost, crush_cost] = mix_costs(total, rates);
    let concrete_cost = cement_cost + bajri_cost + crush_cost;

    ConcreteMixResult {
        volumes,
        steps_per_floor: steps_per_floor(),
        total_volume_cft: round_to(total.value(), 2),
        cement_bags: round_to(cement_bags, 1),
        bajri_cft: round_to(bajri_cft.value(), 1),
        crush_cft: round_to(crush_cft.value(), 1),
        cement_cost: cement_cost.round(),
        bajri_cost: bajri_cost.round(),
        crush_cost: crush_cost.round(),
        concrete_cost: concrete_cost.round(),
    }
}
