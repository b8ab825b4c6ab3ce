//! # Doors, Windows and Frames
//!
//! Opening counts come from rooms, bathrooms and kitchens per floor, plus a
//! fixed main door and one door/window each for the washing area, balcony
//! and stair tower. Frames (chokhat) are priced per running foot.
//!
//! | Opening              | Size (ft) | Frame (rft)   |
//! |----------------------|-----------|---------------|
//! | Main door            | 4 × 7     | 4 + 7 + 7     |
//! | Room / kitchen door  | 3 × 7     | 3 + 7 + 7     |
//! | Bath / washing door  | 3 × 6.5   | 3 + 6.5 + 6.5 |
//! | Balcony / tower door | 3 × 7     | 3 + 7 + 7     |
//! | Room window          | 4 × 4     | 16            |
//! | Kitchen window       | 3 × 3     | 12            |
//! | Bath / washing window| 2 × 2     | 8             |
//! | Balcony window       | 4 × 4     | 16            |
//! | Tower window         | 2 × 2     | 8             |
//! | Floor window, 4/floor| 4 × 4     | 16            |

use serde::{Deserialize, Serialize};

use crate::errors::CalcResult;
use crate::prices::PriceTable;
use crate::project::ProjectInputs;
use crate::units::round_to;

use super::{ensure_finite, CostBreakdown, Count};

/// Main, washing-area, balcony and tower doors
pub const FIXED_DOORS: u32 = 4;
/// Windows on every floor
pub const WINDOWS_PER_FLOOR: u32 = 4;

const DOORS_WINDOWS: &str = "Doors/Windows";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningCounts {
    pub rooms: u32,
    pub bathrooms: u32,
    pub kitchens: u32,
    pub floors: u32,
}

impl OpeningCounts {
    pub fn from_inputs(inputs: &ProjectInputs) -> Self {
        OpeningCounts {
            rooms: inputs.number_of_rooms,
            bathrooms: inputs.bathroom_count(),
            kitchens: inputs.kitchen_count(),
            floors: inputs.number_of_floors,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DoorWindowRates {
    pub door_per_sft: f64,
    pub window_per_sft: f64,
    pub frame_per_rft: f64,
    pub lock: f64,
    pub bolt: f64,
    pub stopper: f64,
}

impl DoorWindowRates {
    pub fn from_table(prices: &PriceTable) -> CalcResult<Self> {
        let area = ["price_per_sft", "price_per_sqft"];
        Ok(DoorWindowRates {
            door_per_sft: prices.price_any("door", &area)?,
            window_per_sft: prices.price_any("window", &area)?,
            frame_per_rft: prices.price("door_window_frame", "price_per_rft")?,
            lock: prices.price("door_lock", "price_per_lock")?,
            bolt: prices.price("bolt", "price_per_bolt")?,
            stopper: prices.price("door_stopper", "price_per_stopper")?,
        })
    }
}

/// Doors/windows quantities and costs.
///
/// ## JSON Example
///
/// ```json
/// {
///   "total_doors_qty": 8,
///   "total_windows_qty": 11,
///   "door_area_sft": 172.0,
///   "window_area_sft": 133.0,
///   "total_chokhat_rft": 283.0,
///   "door_cost": 378400.0,
///   "total_cost": 773350.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoorsWindowsResult {
    pub total_doors_qty: u32,
    pub total_windows_qty: u32,
    pub door_area_sft: f64,
    pub window_area_sft: f64,
    pub door_frame_rft: f64,
    pub window_frame_rft: f64,
    pub total_chokhat_rft: f64,

    pub door_cost: f64,
    pub window_cost: f64,
    pub chokhat_cost: f64,
    pub door_lock_cost: f64,
    pub bolt_cost: f64,
    pub door_stopper_cost: f64,
    pub total_cost: f64,
}

impl CostBreakdown for DoorsWindowsResult {
    fn total_cost(&self) -> f64 {
        self.total_cost
    }
}

pub fn calculate(
    counts: &OpeningCounts,
    rates: &DoorWindowRates,
) -> CalcResult<DoorsWindowsResult> {
    let (rooms, baths, kitchens) = (
        Count::new(counts.rooms),
        Count::new(counts.bathrooms),
        Count::new(counts.kitchens),
    );
    let fl = Count::new(counts.floors);

    let room_doors = (rooms * fl).get(DOORS_WINDOWS, "room doors")? as f64;
    let bath_doors = (baths * fl).get(DOORS_WINDOWS, "bathroom doors")? as f64;
    let kitchen_doors = (kitchens * fl).get(DOORS_WINDOWS, "kitchen doors")? as f64;
    let total_doors =
        ((rooms + baths + kitchens) * fl + FIXED_DOORS).get(DOORS_WINDOWS, "total doors")?;

    let floor_windows = (fl * WINDOWS_PER_FLOOR).get(DOORS_WINDOWS, "floor windows")?;
    let (room_w, bath_w, kitchen_w) =
        (counts.rooms as f64, counts.bathrooms as f64, counts.kitchens as f64);
    // Washing, balcony and tower windows are one each
    let total_windows =
        (rooms + baths + kitchens + floor_windows + 3).get(DOORS_WINDOWS, "total windows")?;
    let floor_windows = floor_windows as f64;

    let door_area = 4.0 * 7.0
        + (room_doors + kitchen_doors) * 3.0 * 7.0
        + (bath_doors + 1.0) * 3.0 * 6.5
        + 2.0 * 3.0 * 7.0;
    let window_area =
        room_w * 16.0 + kitchen_w * 9.0 + bath_w * 4.0 + 4.0 + 16.0 + 4.0 + floor_windows * 16.0;

    let door_frame = 18.0 + (room_doors + kitchen_doors + 2.0) * 17.0 + (bath_doors + 1.0) * 16.0;
    let window_frame =
        room_w * 16.0 + kitchen_w * 12.0 + bath_w * 8.0 + 8.0 + 16.0 + 8.0 + floor_windows * 16.0;
    let chokhat = door_frame + window_frame;

    let doors = total_doors as f64;
    let door_cost = (door_area * rates.door_per_sft).round();
    let window_cost = (window_area * rates.window_per_sft).round();
    let chokhat_cost = (chokhat * rates.frame_per_rft).round();
    let door_lock_cost = (doors * rates.lock).round();
    let bolt_cost = (doors * rates.bolt).round();
    let door_stopper_cost = (doors * rates.stopper).round();
    let total_cost =
        door_cost + window_cost + chokhat_cost + door_lock_cost + bolt_cost + door_stopper_cost;
    ensure_finite(DOORS_WINDOWS, "total_cost", total_cost)?;

    Ok(DoorsWindowsResult {
        total_doors_qty: total_doors,
        total_windows_qty: total_windows,
        door_area_sft: round_to(door_area, 2),
        window_area_sft: round_to(window_area, 2),
        door_frame_rft: round_to(door_frame, 2),
        window_frame_rft: round_to(window_frame, 2),
        total_chokhat_rft: round_to(chokhat, 2),
        door_cost,
        window_cost,
        chokhat_cost,
        door_lock_cost,
        bolt_cost,
        door_stopper_cost,
        total_cost,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CalcError;
    use crate::prices::fixtures::sample_prices;

    fn counts() -> OpeningCounts {
        OpeningCounts { rooms: 2, bathrooms: 1, kitchens: 1, floors: 1 }
    }

    #[test]
    fn test_reference_quantities() {
        let rates = DoorWindowRates::from_table(&sample_prices()).unwrap();
        let r = calculate(&counts(), &rates).unwrap();
        assert_eq!(r.total_doors_qty, 8);
        // 4 + 2 + 1 + 1 + 3
        assert_eq!(r.total_windows_qty, 11);
        // 28 + 3×21 + 2×19.5 + 42
        assert_eq!(r.door_area_sft, 172.0);
        // 32 + 9 + 4 + 24 + 64
        assert_eq!(r.window_area_sft, 133.0);
        // 18 + 5×17 + 2×16
        assert_eq!(r.door_frame_rft, 135.0);
        // 32 + 12 + 8 + 32 + 64
        assert_eq!(r.window_frame_rft, 148.0);
        assert_eq!(r.total_chokhat_rft, 283.0);
    }

    #[test]
    fn test_hardware_matches_door_count() {
        let rates = DoorWindowRates::from_table(&sample_prices()).unwrap();
        let r = calculate(&counts(), &rates).unwrap();
        assert_eq!(r.door_lock_cost, 8.0 * 2500.0);
        assert_eq!(r.bolt_cost, 8.0 * 350.0);
        assert_eq!(r.door_stopper_cost, 8.0 * 250.0);
        let sum = r.door_cost
            + r.window_cost
            + r.chokhat_cost
            + r.door_lock_cost
            + r.bolt_cost
            + r.door_stopper_cost;
        assert_eq!(r.total_cost(), sum);
    }

    #[test]
    fn test_accepts_either_area_field() {
        let prices = PriceTable::default()
            .with_price("door", "price_per_sqft", 2000.0)
            .with_price("window", "price_per_sft", 1400.0)
            .with_price("door_window_frame", "price_per_rft", 650.0)
            .with_price("door_lock", "price_per_lock", 2500.0)
            .with_price("bolt", "price_per_bolt", 350.0)
            .with_price("door_stopper", "price_per_stopper", 250.0);
        let rates = DoorWindowRates::from_table(&prices).unwrap();
        assert_eq!(rates.door_per_sft, 2000.0);
    }

    #[test]
    fn test_missing_frame_price() {
        let prices = PriceTable::default()
            .with_price("door", "price_per_sft", 2000.0)
            .with_price("window", "price_per_sft", 1400.0);
        let err = DoorWindowRates::from_table(&prices).unwrap_err();
        assert_eq!(err, CalcError::missing_price("door_window_frame", "price_per_rft"));
    }

    #[test]
    fn test_huge_count_fails_instead_of_overflowing() {
        let rates = DoorWindowRates::from_table(&sample_prices()).unwrap();
        let huge = OpeningCounts { floors: u32::MAX, ..counts() };
        let err = calculate(&huge, &rates).unwrap_err();
        assert_eq!(err.error_code(), "CALCULATION_FAILED");
        assert!(err.to_string().contains("room doors"));
    }
}
