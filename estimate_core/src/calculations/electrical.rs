//! # Electrical
//!
//! Points per space drive everything else: wire runs per point type, conduit
//! from total wire, and accessories from the point counts.
//!
//! | Point        | Per floor                                  |
//! |--------------|--------------------------------------------|
//! | Light        | 8 per room, 1 per bath, 4 per kitchen, 2 per washing area |
//! | Fan          | 1 per room, bath and kitchen               |
//! | AC           | 1 per room                                 |
//! | Multi-plug   | 2 per room, 2 per kitchen, 1 per washing area |
//!
//! Each cost group is rounded to 0.01 and the total is the rounded sum of
//! the groups.

use serde::{Deserialize, Serialize};

use crate::errors::CalcResult;
use crate::prices::PriceTable;
use crate::project::ProjectInputs;
use crate::units::round_to;

use super::{ensure_finite, CostBreakdown, Count};

/// Fraction of total wire length run through conduit
pub const CONDUIT_FACTOR: f64 = 0.8;
/// Conduit length per band / plastic socket (ft)
pub const CONDUIT_FT_PER_FIXING: f64 = 10.0;

const ELECTRICAL: &str = "Electrical";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectricalCounts {
    pub rooms: u32,
    pub bathrooms: u32,
    pub kitchens: u32,
    pub washing_areas: u32,
    pub floors: u32,
}

impl ElectricalCounts {
    pub fn from_inputs(inputs: &ProjectInputs) -> Self {
        ElectricalCounts {
            rooms: inputs.number_of_rooms,
            bathrooms: inputs.bathroom_count(),
            kitchens: inputs.kitchen_count(),
            washing_areas: inputs.number_of_washing_areas,
            floors: inputs.number_of_floors,
        }
    }

    /// Rooms, bathrooms, kitchens, washing areas and floors
    fn checked(&self) -> [Count; 5] {
        [
            Count::new(self.rooms),
            Count::new(self.bathrooms),
            Count::new(self.kitchens),
            Count::new(self.washing_areas),
            Count::new(self.floors),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElectricalRates {
    pub wire_3_29_per_ft: f64,
    pub wire_7_29_per_ft: f64,
    pub wire_7_36_per_ft: f64,
    pub wire_7_44_per_ft: f64,
    pub conduit_per_ft: f64,
    pub band: f64,
    pub plastic_socket: f64,
    pub fan_box: f64,
    pub switch_box: f64,
    pub electric_sheet: f64,
    pub led_light: f64,
    pub db: f64,
    pub breaker: f64,
}

impl ElectricalRates {
    pub fn from_table(prices: &PriceTable) -> CalcResult<Self> {
        let per_ft = |material: &str| prices.price(material, "price_per_ft");
        let unit = |material: &str| prices.price(material, "price_per_unit");
        Ok(ElectricalRates {
            wire_3_29_per_ft: per_ft("wire_3_29")?,
            wire_7_29_per_ft: per_ft("wire_7_29")?,
            wire_7_36_per_ft: per_ft("wire_7_36")?,
            wire_7_44_per_ft: per_ft("wire_7_44")?,
            conduit_per_ft: per_ft("pipe")?,
            band: unit("band")?,
            plastic_socket: unit("plastic_socket")?,
            fan_box: unit("fan_box")?,
            switch_box: unit("switch_box")?,
            electric_sheet: unit("electric_sheet")?,
            led_light: unit("led_light")?,
            db: unit("db")?,
            breaker: unit("breaker")?,
        })
    }
}

/// Point counts, all floors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectricalPoints {
    pub light: u32,
    pub fan: u32,
    pub ac: u32,
    pub multi_plug: u32,
}

impl ElectricalPoints {
    pub fn from_counts(c: &ElectricalCounts) -> CalcResult<Self> {
        let [rooms, baths, kitchens, washing, floors] = c.checked();
        let light = (rooms * 8 + baths + kitchens * 4 + washing * 2) * floors;
        let multi_plug = (rooms * 2 + kitchens * 2 + washing) * floors;
        Ok(ElectricalPoints {
            light: light.get(ELECTRICAL, "light points")?,
            fan: ((rooms + baths + kitchens) * floors).get(ELECTRICAL, "fan points")?,
            ac: (rooms * floors).get(ELECTRICAL, "ac points")?,
            multi_plug: multi_plug.get(ELECTRICAL, "multi-plug points")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wiring {
    pub wire_3_29_ft: f64,
    pub wire_7_29_ft: f64,
    pub wire_7_36_ft: f64,
    pub wire_7_44_ft: f64,
    pub cost: f64,
}

impl Wiring {
    pub fn total_ft(&self) -> f64 {
        self.wire_3_29_ft + self.wire_7_29_ft + self.wire_7_36_ft + self.wire_7_44_ft
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConduitPipe {
    pub length_ft: f64,
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandsAndSockets {
    pub band_quantity: u32,
    pub socket_quantity: u32,
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boxes {
    pub fan_boxes: u32,
    pub switch_boxes: u32,
    pub cost: f64,
}

/// Quantity and cost of a single counted item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountedItem {
    pub quantity: u32,
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DbAndBreakers {
    pub db_quantity: u32,
    pub breaker_quantity: u32,
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElectricalResult {
    pub points: ElectricalPoints,
    pub wiring: Wiring,
    pub conduit_pipe: ConduitPipe,
    pub bands_and_socket: BandsAndSockets,
    pub boxes: Boxes,
    pub electric_sheets: CountedItem,
    pub led_lights: CountedItem,
    pub db_and_breakers: DbAndBreakers,
    pub total_cost: f64,
}

impl CostBreakdown for ElectricalResult {
    fn total_cost(&self) -> f64 {
        self.total_cost
    }
}

fn cost2(value: f64) -> f64 {
    round_to(value, 2)
}

pub fn calculate(
    counts: &ElectricalCounts,
    rates: &ElectricalRates,
) -> CalcResult<ElectricalResult> {
    let points = ElectricalPoints::from_counts(counts)?;
    let [rooms, baths, kitchens, washing, floors] = counts.checked();

    let wire_3_29_ft = points.light as f64 * 15.0 * 2.0;
    let wire_7_29_ft = (points.fan as f64 + points.multi_plug as f64) * 20.0 * 2.0;
    let wire_7_36_ft = points.ac as f64 * 25.0 * 2.0;
    let wire_7_44_ft = counts.floors as f64 * 50.0 * 2.0;
    let wiring = Wiring {
        wire_3_29_ft,
        wire_7_29_ft,
        wire_7_36_ft,
        wire_7_44_ft,
        cost: cost2(
            wire_3_29_ft * rates.wire_3_29_per_ft
                + wire_7_29_ft * rates.wire_7_29_per_ft
                + wire_7_36_ft * rates.wire_7_36_per_ft
                + wire_7_44_ft * rates.wire_7_44_per_ft,
        ),
    };

    let conduit_ft = wiring.total_ft() * CONDUIT_FACTOR / 2.0;
    let conduit_pipe = ConduitPipe {
        length_ft: cost2(conduit_ft),
        cost: cost2(conduit_ft * rates.conduit_per_ft),
    };

    let fixings =
        Count::floor(conduit_ft / CONDUIT_FT_PER_FIXING).get(ELECTRICAL, "bands and sockets")?;
    let bands_and_socket = BandsAndSockets {
        band_quantity: fixings,
        socket_quantity: fixings,
        cost: cost2(fixings as f64 * rates.band + fixings as f64 * rates.plastic_socket),
    };

    let sheets = ((rooms + baths + kitchens + washing) * floors + points.ac + points.multi_plug)
        .get(ELECTRICAL, "electric sheets")?;
    let boxes = Boxes {
        fan_boxes: points.fan,
        switch_boxes: sheets,
        cost: cost2(points.fan as f64 * rates.fan_box + sheets as f64 * rates.switch_box),
    };
    let electric_sheets = CountedItem {
        quantity: sheets,
        cost: cost2(sheets as f64 * rates.electric_sheet),
    };
    let led_lights = CountedItem {
        quantity: points.light,
        cost: cost2(points.light as f64 * rates.led_light),
    };

    let breakers = (rooms * floors + points.ac).get(ELECTRICAL, "breakers")?;
    let db_and_breakers = DbAndBreakers {
        db_quantity: counts.floors,
        breaker_quantity: breakers,
        cost: cost2(counts.floors as f64 * rates.db + breakers as f64 * rates.breaker),
    };

    let total_cost = cost2(
        wiring.cost
            + conduit_pipe.cost
            + bands_and_socket.cost
            + boxes.cost
            + electric_sheets.cost
            + led_lights.cost
            + db_and_breakers.cost,
    );
    ensure_finite(ELECTRICAL, "total_cost", total_cost)?;

    Ok(ElectricalResult {
        points,
        wiring,
        conduit_pipe,
        bands_and_socket,
        boxes,
        electric_sheets,
        led_lights,
        db_and_breakers,
        total_cost,
    })
}
