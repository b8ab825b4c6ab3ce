//! # Gray Structure
//!
//! The structural shell: brick walls, mortar and plaster, and RCC concrete.
//! One stage computes all three and writes four slots (bricks,
//! cement_mortar, concrete_mix and the composite).
//!
//! ## Input resolution
//!
//! Each field comes from [`GrayStructureOverrides`] when set, else from the
//! project inputs. `Some(0)` is a real value, and an override structure with
//! `include: false` switches off a tank the project includes. Empty size
//! lists fall back to 12×12 rooms and 6×6 bathrooms (one each per room) and
//! a single 8×10 kitchen.
//!
//! ## Example
//!
//! ```rust
//! use estimate_core::calculations::gray_structure::{GrayStructureInput, GrayStructureOverrides};
//! use estimate_core::project::ProjectInputs;
//!
//! let inputs = ProjectInputs::new(30.0, 40.0, 1, 2);
//! let resolved = GrayStructureInput::resolve(&inputs, &GrayStructureOverrides::default());
//! assert_eq!(resolved.rooms.len(), 2);
//! assert_eq!(resolved.kitchens.len(), 1);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::CalcResult;
use crate::prices::PriceTable;
use crate::project::{OptionalStructure, ProjectInputs, StructureKind};
use crate::sizes::{parse_sizes, RoomSize, SpaceList};
use crate::units::{round_to, Feet, SqFt};

use super::bricks::{self, brick_count, net_wall_area, BrickRates, BricksResult};
use super::cement_mortar::{self, CementMortarResult, MortarRates};
use super::concrete_mix::{self, mix_cost, ConcreteInput, ConcreteMixResult, ConcreteRates};
use super::{ensure_finite, CostBreakdown};

pub const DEFAULT_ROOM: RoomSize = RoomSize::new(12.0, 12.0);
pub const DEFAULT_BATHROOM: RoomSize = RoomSize::new(6.0, 6.0);
pub const DEFAULT_KITCHEN: RoomSize = RoomSize::new(8.0, 10.0);

/// Per-call replacements for project inputs. Unset fields use the project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GrayStructureOverrides {
    #[serde(default)]
    pub number_of_floors: Option<u32>,
    #[serde(default)]
    pub number_of_rooms: Option<u32>,
    #[serde(default)]
    pub number_of_columns: Option<u32>,
    #[serde(default)]
    pub plot_length_ft: Option<f64>,
    #[serde(default)]
    pub plot_width_ft: Option<f64>,
    #[serde(default)]
    pub room_sizes: Option<String>,
    #[serde(default)]
    pub bathroom_sizes: Option<String>,
    #[serde(default)]
    pub kitchen_sizes: Option<String>,
    #[serde(default)]
    pub underground_tank: Option<OptionalStructure>,
    #[serde(default)]
    pub overhead_tank: Option<OptionalStructure>,
    #[serde(default)]
    pub tower: Option<OptionalStructure>,
}

/// Fully resolved gray-structure geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrayStructureInput {
    pub number_of_floors: u32,
    pub number_of_rooms: u32,
    pub number_of_columns: u32,
    pub plot_length_ft: f64,
    pub plot_width_ft: f64,
    pub rooms: SpaceList,
    pub bathrooms: SpaceList,
    pub kitchens: SpaceList,
    pub underground_tank: Option<RoomSize>,
    pub overhead_tank: Option<RoomSize>,
    pub tower: Option<RoomSize>,
}

impl GrayStructureInput {
    pub fn resolve(inputs: &ProjectInputs, overrides: &GrayStructureOverrides) -> Self {
        let floors = overrides.number_of_floors.unwrap_or(inputs.number_of_floors);
        let rooms = overrides.number_of_rooms.unwrap_or(inputs.number_of_rooms);
        let room_sizes = overrides.room_sizes.as_deref().unwrap_or(&inputs.room_sizes);
        let bathroom_sizes = overrides.bathroom_sizes.as_deref().unwrap_or(&inputs.bathroom_sizes);
        let kitchen_sizes = overrides.kitchen_sizes.as_deref().unwrap_or(&inputs.kitchen_sizes);
        let structure = |kind, over: Option<OptionalStructure>, project: OptionalStructure| {
            over.unwrap_or(project).resolve(kind)
        };

        GrayStructureInput {
            number_of_floors: floors,
            number_of_rooms: rooms,
            number_of_columns: overrides.number_of_columns.unwrap_or_else(|| inputs.columns()),
            plot_length_ft: overrides.plot_length_ft.unwrap_or(inputs.plot_length_ft),
            plot_width_ft: overrides.plot_width_ft.unwrap_or(inputs.plot_width_ft),
            rooms: parse_sizes(room_sizes).or_repeat(DEFAULT_ROOM, rooms),
            bathrooms: parse_sizes(bathroom_sizes).or_repeat(DEFAULT_BATHROOM, rooms),
            kitchens: parse_sizes(kitchen_sizes).or_repeat(DEFAULT_KITCHEN, 1),
            underground_tank: structure(
                StructureKind::UndergroundTank,
                overrides.underground_tank,
                inputs.underground_tank,
            ),
            overhead_tank: structure(
                StructureKind::OverheadTank,
                overrides.overhead_tank,
                inputs.overhead_tank,
            ),
            tower: structure(StructureKind::Tower, overrides.tower, inputs.tower),
        }
    }

    /// Rooms, bathrooms and kitchens together
    pub fn spaces(&self) -> [&SpaceList; 3] {
        [&self.rooms, &self.bathrooms, &self.kitchens]
    }

    fn concrete_input(&self) -> ConcreteInput {
        ConcreteInput {
            number_of_floors: self.number_of_floors,
            number_of_rooms: self.number_of_rooms,
            number_of_columns: self.number_of_columns,
            plot_length_ft: self.plot_length_ft,
            plot_width_ft: self.plot_width_ft,
            underground_tank: self.underground_tank,
            overhead_tank: self.overhead_tank,
            tower: self.tower,
        }
    }
}

/// Shared quantities the brick and mortar takeoffs both read.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Takeoff {
    pub floors: u32,
    /// Net wall area, all floors, after the shared-wall reduction
    pub wall_area: SqFt,
    /// Σ L × W × floors
    pub ceiling_area: SqFt,
    /// Same as ceiling area
    pub floor_area: SqFt,
    /// Bathroom wall area, all floors, for wall tiles
    pub bath_wall_area: SqFt,
    /// Plot length × width
    pub plot_area: SqFt,
    pub bricks: u64,
}

impl Takeoff {
    pub fn from_input(input: &GrayStructureInput) -> Self {
        let floors = input.number_of_floors as f64;
        let spaces = input.spaces();
        let gross_wall_area = spaces.iter().fold(SqFt(0.0), |acc, s| acc + s.wall_area());
        let wall_area = net_wall_area(gross_wall_area, input.number_of_floors);
        let floor_area = spaces.iter().fold(SqFt(0.0), |acc, s| acc + s.area()) * floors;

        Takeoff {
            floors: input.number_of_floors,
            wall_area,
            ceiling_area: floor_area,
            floor_area,
            bath_wall_area: input.bathrooms.wall_area() * floors,
            plot_area: Feet(input.plot_length_ft) * Feet(input.plot_width_ft),
            bricks: brick_count(wall_area),
        }
    }
}

/// Combined totals across bricks, mortar and concrete.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrayStructureTotals {
    /// Mortar bags + concrete bags, 0.1 bag
    pub total_cement_bags: f64,
    /// Brick cost + mortar cost + concrete cost, 0.01
    pub total_cost: f64,
}

/// Composite gray-structure estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrayStructureResult {
    pub bricks: BricksResult,
    pub cement_mortar: CementMortarResult,
    pub concrete_mix: ConcreteMixResult,
    pub totals: GrayStructureTotals,
}

impl CostBreakdown for GrayStructureResult {
    fn total_cost(&self) -> f64 {
        self.totals.total_cost
    }
}

/// All gray-structure rates. Lookup stops at the first missing key.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrayStructureRates {
    pub bricks: BrickRates,
    pub mortar: MortarRates,
    pub concrete: ConcreteRates,
}

impl GrayStructureRates {
    pub fn from_table(prices: &PriceTable) -> CalcResult<Self> {
        Ok(GrayStructureRates {
            bricks: BrickRates::from_table(prices)?,
            mortar: MortarRates::from_table(prices)?,
            concrete: ConcreteRates::from_table(prices)?,
        })
    }
}

/// Estimate bricks, mortar and concrete for the resolved input.
pub fn calculate(
    input: &GrayStructureInput,
    prices: &PriceTable,
) -> CalcResult<GrayStructureResult> {
    let rates = GrayStructureRates::from_table(prices)?;
    let takeoff = Takeoff::from_input(input);

    let bricks = bricks::calculate(&takeoff, &rates.bricks);
    let cement_mortar = cement_mortar::calculate(&takeoff, &rates.mortar)?;
    let concrete_mix = concrete_mix::calculate(&input.concrete_input(), &rates.concrete);

    let unrounded_bags = cement_mortar.masonry.cement_bags
        + cement_mortar.plaster.cement_bags
        + cement_mortar.flooring.cement_bags
        + cement_mortar.base_ground.cement_bags
        + concrete_mix.volumes.total().value() / 7.0 / cement_mortar::CFT_PER_CEMENT_BAG;
    let concrete_cost = mix_cost(concrete_mix.volumes.total(), &rates.concrete);
    let total_cost = bricks.estimated_brick_cost + cement_mortar.mortar_cost + concrete_cost;
    ensure_finite("Gray Structure", "total_cost", total_cost)?;

    tracing::debug!(
        bricks = bricks.estimated_bricks,
        concrete_cft = concrete_mix.total_volume_cft,
        total_cost,
        "gray structure estimated"
    );

    Ok(GrayStructureResult {
        totals: GrayStructureTotals {
            total_cement_bags: round_to(unrounded_bags, 1),
            total_cost: round_to(total_cost, 2),
        },
        bricks,
        cement_mortar,
        concrete_mix,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prices::fixtures::sample_prices;
    use crate::project::fixtures::{reference_inputs, with_all_structures};

    fn resolve(inputs: &ProjectInputs) -> GrayStructureInput {
        GrayStructureInput::resolve(inputs, &GrayStructureOverrides::default())
    }

    #[test]
    fn test_reference_house() {
        let result = calculate(&resolve(&reference_inputs()), &sample_prices()).unwrap();

        assert_eq!(result.bricks.estimated_bricks, 1698);
        assert_eq!(result.bricks.total_wall_area_sqft, 1132.2);
        // 1698 × 18
        assert_eq!(result.bricks.estimated_brick_cost, 30564.0);
        assert_eq!(result.concrete_mix.total_volume_cft, 1724.34);
        assert_eq!(result.cement_mortar.marble_steps, 17);
        assert!(result.totals.total_cost > result.bricks.estimated_brick_cost);
    }

    #[test]
    fn test_totals_combine_parts() {
        let result = calculate(&resolve(&reference_inputs()), &sample_prices()).unwrap();
        let parts = result.bricks.estimated_brick_cost
            + result.cement_mortar.mortar_cost
            + result.concrete_mix.concrete_cost;
        assert!((result.total_cost() - parts).abs() <= 0.5);

        // mortar 138.9 + concrete 197.1
        assert!((result.totals.total_cement_bags - 336.0).abs() <= 0.1);
    }

    #[test]
    fn test_total_uses_unrounded_concrete_cost() {
        let rates = GrayStructureRates::from_table(&sample_prices()).unwrap();
        let result = calculate(&resolve(&reference_inputs()), &sample_prices()).unwrap();
        let concrete = mix_cost(result.concrete_mix.volumes.total(), &rates.concrete);
        let expected = round_to(
            result.bricks.estimated_brick_cost + result.cement_mortar.mortar_cost + concrete,
            2,
        );
        assert_eq!(result.totals.total_cost, expected);
        assert_eq!(result.concrete_mix.concrete_cost, concrete.round());
    }

    #[test]
    fn test_empty_sizes_use_defaults() {
        let input = resolve(&ProjectInputs::new(30.0, 40.0, 1, 3));
        assert_eq!(input.rooms, SpaceList::Repeated { size: DEFAULT_ROOM, count: 3 });
        assert_eq!(input.bathrooms, SpaceList::Repeated { size: DEFAULT_BATHROOM, count: 3 });
        assert_eq!(input.kitchens, SpaceList::Repeated { size: DEFAULT_KITCHEN, count: 1 });
        assert_eq!(input.number_of_columns, 14);
    }

    #[test]
    fn test_huge_room_count_without_sizes() {
        let input = resolve(&ProjectInputs::new(30.0, 40.0, 1, u32::MAX));
        assert_eq!(input.rooms.len(), u64::from(u32::MAX));

        let takeoff = Takeoff::from_input(&input);
        assert!(takeoff.wall_area.value().is_finite());
        assert!(takeoff.bricks > 0);
    }

    #[test]
    fn test_overrides_take_precedence_including_zero() {
        let overrides = GrayStructureOverrides {
            number_of_floors: Some(0),
            room_sizes: Some("20x20".to_string()),
            ..Default::default()
        };
        let input = GrayStructureInput::resolve(&reference_inputs(), &overrides);
        assert_eq!(input.number_of_floors, 0);
        assert_eq!(input.rooms, SpaceList::Listed(vec![RoomSize::new(20.0, 20.0)]));
        assert_eq!(input.bathrooms, SpaceList::Listed(vec![DEFAULT_BATHROOM]));

        let takeoff = Takeoff::from_input(&input);
        assert_eq!(takeoff.bricks, 0);
    }

    #[test]
    fn test_structure_overrides() {
        let overrides = GrayStructureOverrides {
            underground_tank: Some(OptionalStructure::included(Some(10.0), None)),
            tower: Some(OptionalStructure::default()),
            ..Default::default()
        };
        let mut inputs = reference_inputs();
        inputs.tower = OptionalStructure::included(None, None);

        let input = GrayStructureInput::resolve(&inputs, &overrides);
        assert_eq!(input.underground_tank, Some(RoomSize::new(10.0, 6.0)));
        assert_eq!(input.overhead_tank, None);
        assert_eq!(input.tower, None);

        let plain = calculate(&resolve(&reference_inputs()), &sample_prices()).unwrap();
        let tanked = calculate(&input, &sample_prices()).unwrap();
        assert!(tanked.concrete_mix.volumes.ug_tank_cft > 0.0);
        assert!(tanked.concrete_mix.total_volume_cft > plain.concrete_mix.total_volume_cft);
    }

    #[test]
    fn test_bricks_monotonic_in_perimeter() {
        let mut small = reference_inputs();
        small.room_sizes = "12x12".to_string();
        let mut large = reference_inputs();
        large.room_sizes = "12x16".to_string();

        let a = Takeoff::from_input(&resolve(&small));
        let b = Takeoff::from_input(&resolve(&large));
        assert!(a.bricks <= b.bricks);
    }

    #[test]
    fn test_optional_structures_add_concrete() {
        let plain = calculate(&resolve(&reference_inputs()), &sample_prices()).unwrap();
        let full_input = resolve(&with_all_structures(reference_inputs()));
        let full = calculate(&full_input, &sample_prices()).unwrap();
        assert!(full.concrete_mix.total_volume_cft > plain.concrete_mix.total_volume_cft);
        assert_eq!(full.bricks, plain.bricks);
    }

    #[test]
    fn test_missing_price_fails_stage() {
        let prices =
            PriceTable::from_json_str(r#"{ "bricks": { "price_per_brick": 18 } }"#).unwrap();
        let err = calculate(&resolve(&reference_inputs()), &prices).unwrap_err();
        assert_eq!(err.error_code(), "MISSING_PRICE");
    }
}
