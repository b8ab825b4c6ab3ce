//! # Plumbing
//!
//! Supply and drainage pipework plus sanitary fittings, split into five
//! subsystems:
//!
//! - ½" PPRC supply lines to bathrooms, kitchens, washing areas and geysers
//! - 1¼" riser
//! - 6" main sewer
//! - 4" branch sewer
//! - Ceramics (bath sets, commodes, basins, sinks, mixers, washing taps)
//!
//! Bathroom and kitchen counts are the number of non-empty entries in the
//! raw size strings; there is no fallback when they are empty.

use serde::{Deserialize, Serialize};

use crate::errors::CalcResult;
use crate::prices::PriceTable;
use crate::project::ProjectInputs;

use super::{ensure_finite, CostBreakdown, Count, PricedQuantity};

/// Counts every plumbing quantity is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlumbingCounts {
    pub bathrooms: u32,
    pub kitchens: u32,
    pub washing_areas: u32,
    pub geysers: u32,
    pub floors: u32,
}

impl PlumbingCounts {
    pub fn from_inputs(inputs: &ProjectInputs) -> Self {
        PlumbingCounts {
            bathrooms: inputs.bathroom_count(),
            kitchens: inputs.kitchen_count(),
            washing_areas: inputs.number_of_washing_areas,
            geysers: inputs.number_of_geysers,
            floors: inputs.number_of_floors,
        }
    }

    /// Bathrooms, kitchens, washing areas, geysers and floors
    fn checked(&self) -> [Count; 5] {
        [
            Count::new(self.bathrooms),
            Count::new(self.kitchens),
            Count::new(self.washing_areas),
            Count::new(self.geysers),
            Count::new(self.floors),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlumbingRates {
    pub pipe_1_2_per_ft: f64,
    pub elbow_1_2: f64,
    pub socket_1_2: f64,
    pub tee_1_2: f64,
    pub brass_socket_1_2: f64,

    pub pipe_1_25_per_ft: f64,
    pub elbow_1_25: f64,
    pub socket_1_25: f64,
    pub tee_1_25: f64,

    pub pipe_6_per_ft: f64,
    pub elbow_6: f64,
    pub socket_6: f64,

    pub pipe_4_per_ft: f64,
    pub elbow_4: f64,
    pub tee_4: f64,
    pub ytee_4: f64,
    pub ptrap_4: f64,

    pub bathroom_set: f64,
    pub commode: f64,
    pub wash_basin: f64,
    pub kitchen_sink: f64,
    pub kitchen_mixer: f64,
    pub washing_tap: f64,
}

impl PlumbingRates {
    pub fn from_table(prices: &PriceTable) -> CalcResult<Self> {
        let per_ft = |material: &str| prices.price(material, "price_per_ft");
        let unit = |material: &str| prices.price(material, "price_per_unit");
        Ok(PlumbingRates {
            pipe_1_2_per_ft: per_ft("pipe_1_2_inch")?,
            elbow_1_2: unit("elbow_1_2")?,
            socket_1_2: unit("socket_1_2")?,
            tee_1_2: unit("tee_1_2")?,
            brass_socket_1_2: unit("brass_socket_1_2")?,
            pipe_1_25_per_ft: per_ft("pipe_1_25_inch")?,
            elbow_1_25: unit("elbow_1_25")?,
            socket_1_25: unit("socket_1_25")?,
            tee_1_25: unit("tee_1_25")?,
            pipe_6_per_ft: per_ft("pipe_6_inch_sewer_pipe")?,
            elbow_6: unit("elbow_6_inch")?,
            socket_6: unit("socket_6_inch")?,
            pipe_4_per_ft: per_ft("pipe_4_inch_sewer_pipe")?,
            elbow_4: unit("elbow_4_inch")?,
            tee_4: unit("tee_4_inch")?,
            ytee_4: unit("ytee_4_inch")?,
            ptrap_4: unit("ptrap_4_inch")?,
            bathroom_set: unit("bathroom_set")?,
            commode: unit("commode")?,
            wash_basin: unit("wash_basin")?,
            kitchen_sink: unit("kitchen_sink")?,
            kitchen_mixer: unit("kitchen_mixer")?,
            washing_tap: unit("washing_tap")?,
        })
    }
}

/// ½" supply pipe and fittings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplyLines {
    pub pipe_ft: PricedQuantity,
    pub elbows: PricedQuantity,
    pub sockets: PricedQuantity,
    pub tees: PricedQuantity,
    pub brass_sockets: PricedQuantity,
    pub cost: f64,
}

/// 1¼" riser pipe and fittings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Riser {
    pub pipe_ft: PricedQuantity,
    pub elbows: PricedQuantity,
    pub sockets: PricedQuantity,
    pub tees: PricedQuantity,
    pub cost: f64,
}

/// 6" main sewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MainSewer {
    pub pipe_ft: PricedQuantity,
    pub elbows: PricedQuantity,
    pub sockets: PricedQuantity,
    pub cost: f64,
}

/// 4" branch sewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchSewer {
    pub pipe_ft: PricedQuantity,
    pub elbows: PricedQuantity,
    pub tees: PricedQuantity,
    pub ytees: PricedQuantity,
    pub ptraps: PricedQuantity,
    pub cost: f64,
}

/// Sanitary ware.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ceramics {
    pub bathroom_sets: PricedQuantity,
    pub commodes: PricedQuantity,
    pub wash_basins: PricedQuantity,
    pub kitchen_sinks: PricedQuantity,
    pub kitchen_mixers: PricedQuantity,
    pub washing_taps: PricedQuantity,
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlumbingResult {
    pub counts: PlumbingCounts,
    pub supply_1_2_inch: SupplyLines,
    pub riser_1_25_inch: Riser,
    pub sewer_6_inch: MainSewer,
    pub sewer_4_inch: BranchSewer,
    pub ceramics: Ceramics,
    /// Sum of the five subsystem costs
    pub total_cost: f64,
}

impl CostBreakdown for PlumbingResult {
    fn total_cost(&self) -> f64 {
        self.total_cost
    }
}

const PLUMBING: &str = "Plumbing";

fn supply(c: &PlumbingCounts, r: &PlumbingRates) -> CalcResult<SupplyLines> {
    let [b, k, w, g, fl] = c.checked();
    let length = ((b * 40 + k * 20 + w * 15 + g * 10) * fl).get(PLUMBING, "pipe_1_2_inch length")?;
    // Floors scale the washing-area fittings only
    let elbows = (b * 10 + k * 2 + w * 2 * fl).get(PLUMBING, "elbow_1_2 count")?;
    let sockets = elbows;
    let tees = (b * 5 + k + w * fl).get(PLUMBING, "tee_1_2 count")?;
    let brass = (b * 6 + k * 2 + w * 2 * fl).get(PLUMBING, "brass_socket_1_2 count")?;

    let pipe_ft = PricedQuantity::new(length, r.pipe_1_2_per_ft);
    let elbows = PricedQuantity::new(elbows, r.elbow_1_2);
    let sockets = PricedQuantity::new(sockets, r.socket_1_2);
    let tees = PricedQuantity::new(tees, r.tee_1_2);
    let brass_sockets = PricedQuantity::new(brass, r.brass_socket_1_2);
    let cost = PricedQuantity::sum(&[&pipe_ft, &elbows, &sockets, &tees, &brass_sockets]);
    Ok(SupplyLines {
        pipe_ft,
        elbows,
        sockets,
        tees,
        brass_sockets,
        cost,
    })
}

fn riser(c: &PlumbingCounts, r: &PlumbingRates) -> CalcResult<Riser> {
    let fl = Count::new(c.floors);
    let length = (fl * 100).get(PLUMBING, "pipe_1_25_inch length")?;
    let pipe_ft = PricedQuantity::new(length, r.pipe_1_25_per_ft);
    let elbows = PricedQuantity::new((fl * 4).get(PLUMBING, "elbow_1_25 count")?, r.elbow_1_25);
    let sockets = PricedQuantity::new((fl * 4).get(PLUMBING, "socket_1_25 count")?, r.socket_1_25);
    let tees = PricedQuantity::new((fl * 2).get(PLUMBING, "tee_1_25 count")?, r.tee_1_25);
    let cost = PricedQuantity::sum(&[&pipe_ft, &elbows, &sockets, &tees]);
    Ok(Riser {
        pipe_ft,
        elbows,
        sockets,
        tees,
        cost,
    })
}

fn main_sewer(c: &PlumbingCounts, r: &PlumbingRates) -> CalcResult<MainSewer> {
    let fl = Count::new(c.floors);
    let length = (fl * 25).get(PLUMBING, "pipe_6_inch length")?;
    let pipe_ft = PricedQuantity::new(length, r.pipe_6_per_ft);
    let elbows = PricedQuantity::new((fl * 2).get(PLUMBING, "elbow_6_inch count")?, r.elbow_6);
    let sockets = PricedQuantity::new((fl * 2).get(PLUMBING, "socket_6_inch count")?, r.socket_6);
    let cost = PricedQuantity::sum(&[&pipe_ft, &elbows, &sockets]);
    Ok(MainSewer {
        pipe_ft,
        elbows,
        sockets,
        cost,
    })
}

fn branch_sewer(c: &PlumbingCounts, r: &PlumbingRates) -> CalcResult<BranchSewer> {
    let [b, k, w, _, fl] = c.checked();
    let per_bath = (b * 2 * fl).get(PLUMBING, "4 inch fittings")?;
    let length = (b * 30 * fl).get(PLUMBING, "pipe_4_inch length")?;
    let pipe_ft = PricedQuantity::new(length, r.pipe_4_per_ft);
    let elbows = PricedQuantity::new(per_bath, r.elbow_4);
    let tees = PricedQuantity::new(per_bath, r.tee_4);
    let ytees = PricedQuantity::new(per_bath, r.ytee_4);
    let ptrap_count = (b * 3 + k + w * fl).get(PLUMBING, "ptrap_4_inch count")?;
    let ptraps = PricedQuantity::new(ptrap_count, r.ptrap_4);
    let cost = PricedQuantity::sum(&[&pipe_ft, &elbows, &tees, &ytees, &ptraps]);
    Ok(BranchSewer {
        pipe_ft,
        elbows,
        tees,
        ytees,
        ptraps,
        cost,
    })
}

fn ceramics(c: &PlumbingCounts, r: &PlumbingRates) -> CalcResult<Ceramics> {
    let [b, k, w, _, fl] = c.checked();
    let per_bath = (b * fl).get(PLUMBING, "bathroom fixtures")?;
    let per_kitchen = (k * fl).get(PLUMBING, "kitchen fixtures")?;
    let bathroom_sets = PricedQuantity::new(per_bath, r.bathroom_set);
    let commodes = PricedQuantity::new(per_bath, r.commode);
    let wash_basins = PricedQuantity::new(per_bath, r.wash_basin);
    let kitchen_sinks = PricedQuantity::new(per_kitchen, r.kitchen_sink);
    let kitchen_mixers = PricedQuantity::new(per_kitchen, r.kitchen_mixer);
    let tap_count = (w * 2).get(PLUMBING, "washing_tap count")?;
    let washing_taps = PricedQuantity::new(tap_count, r.washing_tap);
    let cost = PricedQuantity::sum(&[
        &bathroom_sets,
        &commodes,
        &wash_basins,
        &kitchen_sinks,
        &kitchen_mixers,
        &washing_taps,
    ]);
    Ok(Ceramics {
        bathroom_sets,
        commodes,
        wash_basins,
        kitchen_sinks,
        kitchen_mixers,
        washing_taps,
        cost,
    })
}

/// Quantify and price every plumbing subsystem.
///
/// Counts large enough to overflow a quantity fail with `CalculationFailed`.
pub fn calculate(counts: &PlumbingCounts, rates: &PlumbingRates) -> CalcResult<PlumbingResult> {
    let supply_1_2_inch = supply(counts, rates)?;
    let riser_1_25_inch = riser(counts, rates)?;
    let sewer_6_inch = main_sewer(counts, rates)?;
    let sewer_4_inch = branch_sewer(counts, rates)?;
    let ceramics = ceramics(counts, rates)?;

    let total_cost = supply_1_2_inch.cost
        + riser_1_25_inch.cost
        + sewer_6_inch.cost
        + sewer_4_inch.cost
        + ceramics.cost;
    ensure_finite(PLUMBING, "total_cost", total_cost)?;

    Ok(PlumbingResult {
        counts: *counts,
        supply_1_2_inch,
        riser_1_25_inch,
        sewer_6_inch,
        sewer_4_inch,
        ceramics,
        total_cost,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prices::fixtures::sample_prices;

    fn counts() -> PlumbingCounts {
        PlumbingCounts { bathrooms: 2, kitchens: 1, washing_areas: 1, geysers: 1, floors: 2 }
    }

    #[test]
    fn test_supply_quantities() {
        let rates = PlumbingRates::from_table(&sample_prices()).unwrap();
        let s = supply(&counts(), &rates).unwrap();
        // (80 + 20 + 15 + 10) × 2
        assert_eq!(s.pipe_ft.quantity, 250.0);
        // 20 + 2 + 2×2
        assert_eq!(s.elbows.quantity, 26.0);
        assert_eq!(s.sockets.quantity, 26.0);
        // 10 + 1 + 1×2
        assert_eq!(s.tees.quantity, 13.0);
        // 12 + 2 + 2×2
        assert_eq!(s.brass_sockets.quantity, 18.0);
    }

    #[test]
    fn test_sewer_and_ceramics() {
        let rates = PlumbingRates::from_table(&sample_prices()).unwrap();
        let result = calculate(&counts(), &rates).unwrap();
        assert_eq!(result.riser_1_25_inch.pipe_ft.quantity, 200.0);
        assert_eq!(result.sewer_6_inch.pipe_ft.quantity, 50.0);
        assert_eq!(result.sewer_4_inch.pipe_ft.quantity, 120.0);
        // 6 + 1 + 2
        assert_eq!(result.sewer_4_inch.ptraps.quantity, 9.0);
        assert_eq!(result.ceramics.commodes.quantity, 4.0);
        assert_eq!(result.ceramics.washing_taps.quantity, 2.0);
    }

    #[test]
    fn test_total_is_sum_of_subsystems() {
        let rates = PlumbingRates::from_table(&sample_prices()).unwrap();
        let r = calculate(&counts(), &rates).unwrap();
        let sum = r.supply_1_2_inch.cost
            + r.riser_1_25_inch.cost
            + r.sewer_6_inch.cost
            + r.sewer_4_inch.cost
            + r.ceramics.cost;
        assert_eq!(r.total_cost(), sum);
        // Pipe is priced by cost, not by length
        assert_eq!(r.supply_1_2_inch.pipe_ft.cost, 250.0 * 55.0);
    }

    #[test]
    fn test_counts_from_raw_strings() {
        let mut inputs = ProjectInputs::new(30.0, 40.0, 1, 2);
        inputs.bathroom_sizes = "6x6, oops".to_string();
        let c = PlumbingCounts::from_inputs(&inputs);
        assert_eq!(c.bathrooms, 2);
        assert_eq!(c.kitchens, 0);
    }

    #[test]
    fn test_missing_fitting_price() {
        let prices = PriceTable::default().with_price("pipe_1_2_inch", "price_per_ft", 55.0);
        let err = PlumbingRates::from_table(&prices).unwrap_err();
        assert_eq!(err, crate::errors::CalcError::missing_price("elbow_1_2", "price_per_unit"));
    }

    #[test]
    fn test_huge_count_fails_instead_of_overflowing() {
        let rates = PlumbingRates::from_table(&sample_prices()).unwrap();
        let huge = PlumbingCounts { washing_areas: 300_000_000, ..counts() };
        let err = calculate(&huge, &rates).unwrap_err();
        assert_eq!(err.error_code(), "CALCULATION_FAILED");
        assert!(err.to_string().contains("pipe_1_2_inch length"));
    }
}
