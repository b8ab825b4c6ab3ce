//! # Stage Pipeline
//!
//! Calculators run as stages over a shared [`Project`]. Each stage declares
//! the result slots it reads and the slot it writes; the execution order is
//! a topological sort of those declarations, so Gray Structure always runs
//! before Steel.
//!
//! A failing stage records an error object in its slot and the run moves
//! on. Only an ordering problem aborts a run.
//!
//! ## Example
//!
//! ```rust
//! use estimate_core::pipeline::{Estimator, Stage};
//! use estimate_core::prices::PriceTable;
//! use estimate_core::project::{Project, ProjectInputs};
//!
//! let prices = PriceTable::from_json_str(r#"{ "labour": { "rate_per_sqft": 650 } }"#).unwrap();
//! let mut project = Project::new("Client", "Site", ProjectInputs::new(30.0, 40.0, 2, 3));
//!
//! let report = Estimator::new(&prices).run_stages(&mut project, &[Stage::Labour]).unwrap();
//! assert_eq!(report.computed(), 1);
//! ```

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::calculations::gray_structure::{self, GrayStructureInput, GrayStructureOverrides};
use crate::calculations::{doors_windows, electrical, labour, paint, plumbing, steel};
use crate::errors::{CalcError, CalcResult};
use crate::prices::PriceTable;
use crate::project::{Project, Slot, SlotName, TradeFailure, TradeOutcome};

/// One calculator stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    GrayStructure,
    Steel,
    Plumbing,
    Paint,
    Electrical,
    DoorsWindows,
    Labour,
}

impl Stage {
    /// Declaration order; ties in the topological sort resolve to this order
    pub const ALL: [Stage; 7] = [
        Stage::GrayStructure,
        Stage::Steel,
        Stage::Plumbing,
        Stage::Paint,
        Stage::Electrical,
        Stage::DoorsWindows,
        Stage::Labour,
    ];

    /// Human-readable trade name
    pub fn name(&self) -> &'static str {
        match self {
            Stage::GrayStructure => "Gray Structure",
            Stage::Steel => "Steel",
            Stage::Plumbing => "Plumbing",
            Stage::Paint => "Paint",
            Stage::Electrical => "Electrical",
            Stage::DoorsWindows => "Doors/Windows",
            Stage::Labour => "Labour",
        }
    }

    /// The trade slot this stage fills. Gray Structure also fills its
    /// bricks, cement_mortar and concrete_mix component slots.
    pub fn writes(&self) -> SlotName {
        match self {
            Stage::GrayStructure => SlotName::GrayStructure,
            Stage::Steel => SlotName::Steel,
            Stage::Plumbing => SlotName::Plumbing,
            Stage::Paint => SlotName::Paint,
            Stage::Electrical => SlotName::Electrical,
            Stage::DoorsWindows => SlotName::DoorsWindows,
            Stage::Labour => SlotName::Labour,
        }
    }

    /// Derived slots this stage reads
    pub fn reads(&self) -> &'static [SlotName] {
        match self {
            Stage::Steel => &[SlotName::GrayStructure],
            _ => &[],
        }
    }

    /// Stages that write a slot this stage reads
    pub fn dependencies(&self) -> Vec<Stage> {
        Stage::ALL
            .into_iter()
            .filter(|other| self.reads().contains(&other.writes()))
            .collect()
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Kahn's algorithm over `nodes`. Among ready nodes the one listed first
/// in `nodes` goes first. Dependencies outside `nodes` are ignored.
pub fn topological_order<N, F>(nodes: &[N], dependencies: F) -> CalcResult<Vec<N>>
where
    N: Copy + PartialEq,
    F: Fn(N) -> Vec<N>,
{
    let index_of = |node: N| nodes.iter().position(|n| *n == node);

    let mut in_degree = vec![0usize; nodes.len()];
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
    for (i, node) in nodes.iter().enumerate() {
        for dep in dependencies(*node) {
            if let Some(d) = index_of(dep) {
                in_degree[i] += 1;
                children[d].push(i);
            }
        }
    }

    let mut ready: BTreeSet<usize> = (0..nodes.len()).filter(|i| in_degree[*i] == 0).collect();
    let mut order = Vec::with_capacity(nodes.len());
    while let Some(i) = ready.pop_first() {
        order.push(nodes[i]);
        for &child in &children[i] {
            in_degree[child] -= 1;
            if in_degree[child] == 0 {
                ready.insert(child);
            }
        }
    }

    if order.len() != nodes.len() {
        return Err(CalcError::Internal {
            message: "cycle detected in stage dependencies".to_string(),
        });
    }
    Ok(order)
}

/// Requested stages plus everything they depend on, in a valid run order.
pub fn execution_order(requested: &[Stage]) -> CalcResult<Vec<Stage>> {
    let mut needed: BTreeSet<Stage> = BTreeSet::new();
    let mut pending: Vec<Stage> = requested.to_vec();
    while let Some(stage) = pending.pop() {
        if needed.insert(stage) {
            pending.extend(stage.dependencies());
        }
    }
    let nodes: Vec<Stage> = Stage::ALL.into_iter().filter(|s| needed.contains(s)).collect();
    topological_order(&nodes, |stage| stage.dependencies())
}

/// How a stage ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StageStatus {
    Computed,
    Failed(TradeFailure),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageReport {
    pub stage: Stage,
    #[serde(flatten)]
    pub status: StageStatus,
}

/// Per-stage outcomes of one run, in execution order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub stages: Vec<StageReport>,
}

impl RunReport {
    pub fn computed(&self) -> usize {
        self.stages
            .iter()
            .filter(|r| r.status == StageStatus::Computed)
            .count()
    }

    pub fn failed(&self) -> impl Iterator<Item = &StageReport> {
        self.stages
            .iter()
            .filter(|r| matches!(r.status, StageStatus::Failed(_)))
    }
}

fn record<T>(slot: &mut Slot<T>, name: SlotName, result: CalcResult<T>) -> CalcResult<StageStatus> {
    let status = match &result {
        Ok(_) => StageStatus::Computed,
        Err(err) => StageStatus::Failed(TradeFailure::from(err)),
    };
    slot.set(name, TradeOutcome::from_result(result))?;
    Ok(status)
}

/// Runs calculator stages against a project with a fixed price table.
pub struct Estimator<'a> {
    prices: &'a PriceTable,
    overrides: GrayStructureOverrides,
}

impl<'a> Estimator<'a> {
    pub fn new(prices: &'a PriceTable) -> Self {
        Estimator {
            prices,
            overrides: GrayStructureOverrides::default(),
        }
    }

    /// Replace project inputs for the Gray Structure stage only
    pub fn with_overrides(mut self, overrides: GrayStructureOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Run every stage.
    pub fn run(&self, project: &mut Project) -> CalcResult<RunReport> {
        self.run_stages(project, &Stage::ALL)
    }

    /// Run the requested stages and their dependencies.
    pub fn run_stages(&self, project: &mut Project, requested: &[Stage]) -> CalcResult<RunReport> {
        let order = execution_order(requested)?;
        tracing::info!(project = %project.meta.id, stages = order.len(), "starting estimate run");

        let mut report = RunReport::default();
        for stage in order {
            let span = tracing::info_span!("stage", stage = stage.name());
            let _guard = span.enter();

            let status = match self.run_stage(stage, project) {
                Ok(status) => status,
                // Slot already written; the earlier outcome stands
                Err(err) => StageStatus::Failed(TradeFailure::from(&err)),
            };
            match &status {
                StageStatus::Computed => tracing::info!("stage computed"),
                StageStatus::Failed(failure) => {
                    tracing::warn!(code = %failure.code, error = %failure.error, "stage failed")
                }
            }
            report.stages.push(StageReport { stage, status });
        }

        project.touch();
        tracing::info!(
            computed = report.computed(),
            failed = report.failed().count(),
            "estimate run finished"
        );
        Ok(report)
    }

    fn run_stage(&self, stage: Stage, project: &mut Project) -> CalcResult<StageStatus> {
        let prices = self.prices;
        let inputs = &project.inputs;
        let results = &mut project.results;

        match stage {
            Stage::GrayStructure => {
                let input = GrayStructureInput::resolve(inputs, &self.overrides);
                let result = gray_structure::calculate(&input, prices);
                let bricks = result.as_ref().map(|r| r.bricks.clone()).map_err(Clone::clone);
                let mortar = result.as_ref().map(|r| r.cement_mortar.clone()).map_err(Clone::clone);
                let concrete =
                    result.as_ref().map(|r| r.concrete_mix.clone()).map_err(Clone::clone);
                record(&mut results.bricks, SlotName::Bricks, bricks)?;
                record(&mut results.cement_mortar, SlotName::CementMortar, mortar)?;
                record(&mut results.concrete_mix, SlotName::ConcreteMix, concrete)?;
                record(&mut results.gray_structure, SlotName::GrayStructure, result)
            }
            Stage::Steel => {
                let result = steel::calculate_from_results(results, prices);
                record(&mut results.steel, SlotName::Steel, result)
            }
            Stage::Plumbing => {
                let counts = plumbing::PlumbingCounts::from_inputs(inputs);
                let result = plumbing::PlumbingRates::from_table(prices)
                    .and_then(|rates| plumbing::calculate(&counts, &rates));
                record(&mut results.plumbing, SlotName::Plumbing, result)
            }
            Stage::Paint => {
                let input = paint::PaintInput::from_inputs(inputs);
                let result = paint::PaintRates::from_table(prices)
                    .and_then(|rates| paint::calculate(&input, &rates));
                record(&mut results.paint, SlotName::Paint, result)
            }
            Stage::Electrical => {
                let counts = electrical::ElectricalCounts::from_inputs(inputs);
                let result = electrical::ElectricalRates::from_table(prices)
                    .and_then(|rates| electrical::calculate(&counts, &rates));
                record(&mut results.electrical, SlotName::Electrical, result)
            }
            Stage::DoorsWindows => {
                let counts = doors_windows::OpeningCounts::from_inputs(inputs);
                let result = doors_windows::DoorWindowRates::from_table(prices)
                    .and_then(|rates| doors_windows::calculate(&counts, &rates));
                record(&mut results.doors_windows, SlotName::DoorsWindows, result)
            }
            Stage::Labour => {
                let input = labour::LabourInput::from_inputs(inputs);
                let result = labour::LabourRates::from_table(prices)
                    .and_then(|rates| labour::calculate(&input, &rates));
                record(&mut results.labour, SlotName::Labour, result)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prices::fixtures::sample_prices;
    use crate::project::fixtures::{reference_inputs, with_all_structures};
    use crate::project::{ProjectInputs, SlotState};
    use serde_json::Value;

    fn assert_costs_non_negative(value: &Value, path: &str) {
        match value {
            Value::Object(map) => {
                for (key, child) in map {
                    let path = format!("{}.{}", path, key);
                    if let (true, Some(cost)) = (key.ends_with("cost"), child.as_f64()) {
                        assert!(cost >= 0.0, "{} = {}", path, cost);
                    }
                    assert_costs_non_negative(child, &path);
                }
            }
            Value::Array(items) => items
                .iter()
                .enumerate()
                .for_each(|(i, item)| assert_costs_non_negative(item, &format!("{}[{}]", path, i))),
            _ => {}
        }
    }

    #[test]
    fn test_gray_structure_precedes_steel() {
        let order = execution_order(&[Stage::Steel, Stage::Labour]).unwrap();
        assert_eq!(order, vec![Stage::GrayStructure, Stage::Steel, Stage::Labour]);

        let all = execution_order(&Stage::ALL).unwrap();
        assert_eq!(all.to_vec(), Stage::ALL.to_vec());
    }

    #[test]
    fn test_dependencies_follow_slot_declarations() {
        assert_eq!(Stage::Steel.dependencies(), vec![Stage::GrayStructure]);
        assert!(Stage::Plumbing.dependencies().is_empty());
    }

    #[test]
    fn test_cycle_is_rejected() {
        let err = topological_order(&[1, 2, 3], |n| match n {
            1 => vec![3],
            2 => vec![1],
            3 => vec![2],
            _ => vec![],
        })
        .unwrap_err();
        assert_eq!(err.error_code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_stable_order_for_independent_nodes() {
        let order =
            topological_order(&['c', 'a', 'b'], |n| if n == 'c' { vec!['b'] } else { vec![] })
                .unwrap();
        assert_eq!(order, vec!['a', 'b', 'c']);
    }

    #[test]
    fn test_full_run_fills_every_slot() {
        let prices = sample_prices();
        let mut project = Project::new("Client", "Site", reference_inputs());
        let report = Estimator::new(&prices).run(&mut project).unwrap();

        assert_eq!(report.computed(), 7);
        for name in SlotName::ALL {
            assert!(project.results.is_set(name), "{} not set", name);
        }
        let concrete = project.results.concrete_mix.computed().unwrap();
        let steel = project.results.steel.computed().unwrap();
        assert_eq!(steel.rcc_volume_cft, concrete.total_volume_cft);
    }

    #[test]
    fn test_stage_failure_does_not_abort_run() {
        // Only labour and paint are priced
        let mut prices = PriceTable::default();
        for (material, field, price) in [
            ("labour", "rate_per_sqft", 650.0),
            ("paint", "price_per_gallon", 3200.0),
            ("primer", "price_per_gallon", 2200.0),
            ("putty", "price_per_gallon", 1500.0),
            ("exterior_paint", "price_per_gallon", 4200.0),
        ] {
            prices = prices.with_price(material, field, price);
        }
        let mut project = Project::new("Client", "Site", reference_inputs());
        let report = Estimator::new(&prices).run(&mut project).unwrap();

        assert_eq!(report.stages.len(), 7);
        assert_eq!(report.computed(), 2);
        assert!(matches!(project.results.state(SlotName::Labour), SlotState::Computed(_)));
        match project.results.state(SlotName::Steel) {
            SlotState::Failed(failure) => assert_eq!(failure.code, "MISSING_UPSTREAM"),
            other => panic!("unexpected steel state {:?}", other),
        }
        match project.results.state(SlotName::Bricks) {
            SlotState::Failed(failure) => assert_eq!(failure.code, "MISSING_PRICE"),
            other => panic!("unexpected bricks state {:?}", other),
        }
    }

    #[test]
    fn test_second_run_reports_already_computed() {
        let prices = sample_prices();
        let mut project = Project::new("Client", "Site", reference_inputs());
        let estimator = Estimator::new(&prices);
        estimator.run_stages(&mut project, &[Stage::Labour]).unwrap();
        let first = project.results.labour.clone();

        let report = estimator.run_stages(&mut project, &[Stage::Labour]).unwrap();
        match &report.stages[0].status {
            StageStatus::Failed(failure) => assert_eq!(failure.code, "ALREADY_COMPUTED"),
            other => panic!("unexpected status {:?}", other),
        }
        assert_eq!(project.results.labour, first);
    }

    #[test]
    fn test_overrides_reach_gray_structure_only() {
        let prices = sample_prices();
        let mut project = Project::new("Client", "Site", reference_inputs());
        let overrides = GrayStructureOverrides {
            number_of_floors: Some(2),
            ..Default::default()
        };
        Estimator::new(&prices)
            .with_overrides(overrides)
            .run(&mut project)
            .unwrap();

        let bricks = project.results.bricks.computed().unwrap();
        assert_eq!(bricks.estimated_bricks, 3396);
        let labour = project.results.labour.computed().unwrap();
        assert_eq!(labour.number_of_floors, 1);
    }

    #[test]
    fn test_costs_non_negative_for_non_negative_inputs() {
        let mut zero_floors = reference_inputs();
        zero_floors.number_of_floors = 0;
        let input_sets = [
            reference_inputs(),
            zero_floors,
            ProjectInputs::new(30.0, 40.0, 0, 0),
            ProjectInputs::new(0.0, 0.0, 1, 0),
            with_all_structures(reference_inputs()),
            with_all_structures(ProjectInputs::new(25.0, 50.0, 3, 4)),
        ];

        let prices = sample_prices();
        for inputs in input_sets {
            let mut project = Project::new("Client", "Site", inputs);
            let report = Estimator::new(&prices).run(&mut project).unwrap();
            assert_eq!(report.stages.len(), 7);

            for name in SlotName::ALL {
                if let SlotState::Computed(total) = project.results.state(name) {
                    assert!(total >= 0.0, "{} total {}", name, total);
                }
                let json = project.results.slot_json(name).unwrap().unwrap();
                assert_costs_non_negative(&json, &name.to_string());
            }
        }
    }

    #[test]
    fn test_huge_count_fails_one_stage_only() {
        let mut inputs = reference_inputs();
        inputs.number_of_washing_areas = 300_000_000;
        let prices = sample_prices();
        let mut project = Project::new("Client", "Site", inputs);
        let report = Estimator::new(&prices).run(&mut project).unwrap();

        assert_eq!(report.stages.len(), 7);
        match project.results.state(SlotName::Plumbing) {
            SlotState::Failed(failure) => assert_eq!(failure.code, "CALCULATION_FAILED"),
            other => panic!("unexpected plumbing state {:?}", other),
        }
        for name in [SlotName::GrayStructure, SlotName::Steel, SlotName::Paint, SlotName::Labour] {
            assert!(
                matches!(project.results.state(name), SlotState::Computed(_)),
                "{} not computed",
                name
            );
        }
    }
}
