//! # Project Data Structures
//!
//! The `Project` struct is the root container for one estimation run.
//! Inputs are set once when the project is created or loaded; derived
//! results are filled in by the pipeline, one write per slot.
//!
//! ## Structure
//!
//! ```text
//! Project
//! ├── meta: ProjectMetadata (version, id, client, site, timestamps)
//! ├── inputs: ProjectInputs (plot, floors, room strings, tanks, tower)
//! └── results: DerivedResults (write-once slots, one per calculator)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use estimate_core::project::{Project, ProjectInputs};
//!
//! let inputs = ProjectInputs::new(30.0, 40.0, 1, 2);
//! let project = Project::new("A. Client", "Plot 14-C", inputs);
//!
//! let json = serde_json::to_string_pretty(&project).unwrap();
//! assert!(json.contains("Plot 14-C"));
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculations::{
    BricksResult, CementMortarResult, ConcreteMixResult, CostBreakdown, DoorsWindowsResult,
    ElectricalResult, GrayStructureResult, LabourResult, PaintResult, PlumbingResult, SteelResult,
};
use crate::errors::{CalcError, CalcResult};
use crate::sizes::{count_entries, RoomSize};
use crate::units::{Feet, SqFt};

/// Current schema version for project files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Columns assumed when the input does not say
pub const DEFAULT_COLUMNS: u32 = 14;

/// Root project container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub meta: ProjectMetadata,

    /// Raw user inputs
    pub inputs: ProjectInputs,

    /// Derived results. Written by a run, never read back from a file.
    #[serde(default, skip_deserializing)]
    pub results: DerivedResults,
}

impl Project {
    /// Create a new project with empty results.
    pub fn new(client: impl Into<String>, site: impl Into<String>, inputs: ProjectInputs) -> Self {
        let now = Utc::now();
        Project {
            meta: ProjectMetadata {
                version: SCHEMA_VERSION.to_string(),
                id: Uuid::new_v4(),
                client: client.into(),
                site: site.into(),
                created: now,
                modified: now,
            },
            inputs,
            results: DerivedResults::default(),
        }
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }
}

/// Project metadata stored in the file header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    pub id: Uuid,

    #[serde(default)]
    pub client: String,

    /// Site or plot label
    #[serde(default)]
    pub site: String,

    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

// ============================================================================
// Inputs
// ============================================================================

/// Raw dimensions and counts supplied by the user.
///
/// Room, bathroom and kitchen sizes stay as the comma-separated strings the
/// user typed (`"12x12, 10x14"`); each calculator parses or counts them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectInputs {
    pub plot_length_ft: f64,
    pub plot_width_ft: f64,

    /// Explicit plot area; length × width when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plot_size_sqft: Option<f64>,

    pub number_of_floors: u32,
    pub number_of_rooms: u32,

    #[serde(default)]
    pub number_of_washing_areas: u32,

    #[serde(default)]
    pub number_of_geysers: u32,

    #[serde(default)]
    pub room_sizes: String,

    #[serde(default)]
    pub bathroom_sizes: String,

    #[serde(default)]
    pub kitchen_sizes: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_columns: Option<u32>,

    #[serde(default)]
    pub underground_tank: OptionalStructure,

    #[serde(default)]
    pub overhead_tank: OptionalStructure,

    #[serde(default)]
    pub tower: OptionalStructure,
}

impl ProjectInputs {
    /// Minimal inputs: plot, floors and rooms. Everything else empty or excluded.
    pub fn new(
        plot_length_ft: f64,
        plot_width_ft: f64,
        number_of_floors: u32,
        number_of_rooms: u32,
    ) -> Self {
        ProjectInputs {
            plot_length_ft,
            plot_width_ft,
            plot_size_sqft: None,
            number_of_floors,
            number_of_rooms,
            number_of_washing_areas: 0,
            number_of_geysers: 0,
            room_sizes: String::new(),
            bathroom_sizes: String::new(),
            kitchen_sizes: String::new(),
            number_of_columns: None,
            underground_tank: OptionalStructure::default(),
            overhead_tank: OptionalStructure::default(),
            tower: OptionalStructure::default(),
        }
    }

    /// Plot length × width
    pub fn plot_footprint(&self) -> SqFt {
        Feet(self.plot_length_ft) * Feet(self.plot_width_ft)
    }

    /// Explicit plot size when given, otherwise the footprint
    pub fn plot_area(&self) -> SqFt {
        self.plot_size_sqft.map(SqFt).unwrap_or_else(|| self.plot_footprint())
    }

    pub fn columns(&self) -> u32 {
        self.number_of_columns.unwrap_or(DEFAULT_COLUMNS)
    }

    /// Non-empty bathroom entries, parsed or not
    pub fn bathroom_count(&self) -> u32 {
        count_entries(&self.bathroom_sizes)
    }

    /// Non-empty kitchen entries, parsed or not
    pub fn kitchen_count(&self) -> u32 {
        count_entries(&self.kitchen_sizes)
    }

    /// Resolved plan size of an optional structure, `None` when excluded.
    pub fn structure(&self, kind: StructureKind) -> Option<RoomSize> {
        let structure = match kind {
            StructureKind::UndergroundTank => &self.underground_tank,
            StructureKind::OverheadTank => &self.overhead_tank,
            StructureKind::Tower => &self.tower,
        };
        structure.resolve(kind)
    }
}

/// The three optional structures a project may include.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureKind {
    UndergroundTank,
    OverheadTank,
    Tower,
}

impl StructureKind {
    /// Plan size used when the structure is included without dimensions
    pub fn default_size(&self) -> RoomSize {
        match self {
            StructureKind::UndergroundTank => RoomSize::new(8.0, 6.0),
            StructureKind::OverheadTank => RoomSize::new(6.0, 5.0),
            StructureKind::Tower => RoomSize::new(6.0, 6.0),
        }
    }
}

/// Inclusion flag plus optional dimensions for a tank or stair tower.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OptionalStructure {
    #[serde(default)]
    pub include: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length_ft: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width_ft: Option<f64>,
}

impl OptionalStructure {
    pub fn included(length_ft: Option<f64>, width_ft: Option<f64>) -> Self {
        OptionalStructure { include: true, length_ft, width_ft }
    }

    /// Dimensions that are absent or not positive fall back to the kind's
    /// default, one dimension at a time.
    pub fn resolve(&self, kind: StructureKind) -> Option<RoomSize> {
        if !self.include {
            return None;
        }
        let default = kind.default_size();
        let positive = |v: Option<f64>| v.filter(|x| *x > 0.0);
        Some(RoomSize::new(
            positive(self.length_ft).unwrap_or(default.length_ft),
            positive(self.width_ft).unwrap_or(default.width_ft),
        ))
    }
}

// ============================================================================
// Derived results
// ============================================================================

/// Names of the derived result slots, in dependency order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotName {
    Bricks,
    CementMortar,
    ConcreteMix,
    GrayStructure,
    Steel,
    Plumbing,
    Electrical,
    Paint,
    DoorsWindows,
    Labour,
}

impl SlotName {
    pub const ALL: [SlotName; 10] = [
        SlotName::Bricks,
        SlotName::CementMortar,
        SlotName::ConcreteMix,
        SlotName::GrayStructure,
        SlotName::Steel,
        SlotName::Plumbing,
        SlotName::Electrical,
        SlotName::Paint,
        SlotName::DoorsWindows,
        SlotName::Labour,
    ];

    /// Field name used in serialized results
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotName::Bricks => "bricks",
            SlotName::CementMortar => "cement_mortar",
            SlotName::ConcreteMix => "concrete_mix",
            SlotName::GrayStructure => "gray_structure",
            SlotName::Steel => "steel",
            SlotName::Plumbing => "plumbing",
            SlotName::Electrical => "electrical",
            SlotName::Paint => "paint",
            SlotName::DoorsWindows => "doors_windows",
            SlotName::Labour => "labour",
        }
    }
}

impl fmt::Display for SlotName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error object stored in a slot whose calculator failed.
///
/// Serializes as `{"error": "...", "code": "MISSING_PRICE"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeFailure {
    pub error: String,
    pub code: String,
}

impl From<&CalcError> for TradeFailure {
    fn from(err: &CalcError) -> Self {
        TradeFailure {
            error: err.to_string(),
            code: err.error_code().to_string(),
        }
    }
}

/// What a calculator left in its slot: a result or an error object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TradeOutcome<T> {
    Failed(TradeFailure),
    Computed(T),
}

impl<T> TradeOutcome<T> {
    pub fn from_result(result: CalcResult<T>) -> Self {
        match result {
            Ok(value) => TradeOutcome::Computed(value),
            Err(err) => TradeOutcome::Failed(TradeFailure::from(&err)),
        }
    }

    pub fn computed(&self) -> Option<&T> {
        match self {
            TradeOutcome::Computed(value) => Some(value),
            TradeOutcome::Failed(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&TradeFailure> {
        match self {
            TradeOutcome::Failed(failure) => Some(failure),
            TradeOutcome::Computed(_) => None,
        }
    }

    pub fn is_computed(&self) -> bool {
        matches!(self, TradeOutcome::Computed(_))
    }
}

/// A write-once result slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slot<T>(Option<TradeOutcome<T>>);

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Slot(None)
    }
}

impl<T> Slot<T> {
    pub fn outcome(&self) -> Option<&TradeOutcome<T>> {
        self.0.as_ref()
    }

    /// The computed value, if the slot holds one
    pub fn computed(&self) -> Option<&T> {
        self.0.as_ref().and_then(TradeOutcome::computed)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    /// Fill the slot. A second write is rejected and leaves the first intact.
    pub fn set(&mut self, name: SlotName, outcome: TradeOutcome<T>) -> CalcResult<()> {
        if self.0.is_some() {
            return Err(CalcError::AlreadyComputed { slot: name.to_string() });
        }
        self.0 = Some(outcome);
        Ok(())
    }
}

/// Every derived result of a run, in dependency order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DerivedResults {
    #[serde(default, skip_serializing_if = "Slot::is_empty")]
    pub bricks: Slot<BricksResult>,
    #[serde(default, skip_serializing_if = "Slot::is_empty")]
    pub cement_mortar: Slot<CementMortarResult>,
    #[serde(default, skip_serializing_if = "Slot::is_empty")]
    pub concrete_mix: Slot<ConcreteMixResult>,
    #[serde(default, skip_serializing_if = "Slot::is_empty")]
    pub gray_structure: Slot<GrayStructureResult>,
    #[serde(default, skip_serializing_if = "Slot::is_empty")]
    pub steel: Slot<SteelResult>,
    #[serde(default, skip_serializing_if = "Slot::is_empty")]
    pub plumbing: Slot<PlumbingResult>,
    #[serde(default, skip_serializing_if = "Slot::is_empty")]
    pub electrical: Slot<ElectricalResult>,
    #[serde(default, skip_serializing_if = "Slot::is_empty")]
    pub paint: Slot<PaintResult>,
    #[serde(default, skip_serializing_if = "Slot::is_empty")]
    pub doors_windows: Slot<DoorsWindowsResult>,
    #[serde(default, skip_serializing_if = "Slot::is_empty")]
    pub labour: Slot<LabourResult>,
}

/// Uniform view of one slot regardless of its result type.
#[derive(Debug, Clone, PartialEq)]
pub enum SlotState<'a> {
    Empty,
    Failed(&'a TradeFailure),
    /// Computed, with the trade's total cost
    Computed(f64),
}

fn slot_state<T: CostBreakdown>(slot: &Slot<T>) -> SlotState<'_> {
    match slot.outcome() {
        None => SlotState::Empty,
        Some(TradeOutcome::Failed(failure)) => SlotState::Failed(failure),
        Some(TradeOutcome::Computed(value)) => SlotState::Computed(value.total_cost()),
    }
}

impl DerivedResults {
    pub fn is_set(&self, name: SlotName) -> bool {
        !matches!(self.state(name), SlotState::Empty)
    }

    /// State and total cost of a slot
    pub fn state(&self, name: SlotName) -> SlotState<'_> {
        match name {
            SlotName::Bricks => slot_state(&self.bricks),
            SlotName::CementMortar => slot_state(&self.cement_mortar),
            SlotName::ConcreteMix => slot_state(&self.concrete_mix),
            SlotName::GrayStructure => slot_state(&self.gray_structure),
            SlotName::Steel => slot_state(&self.steel),
            SlotName::Plumbing => slot_state(&self.plumbing),
            SlotName::Electrical => slot_state(&self.electrical),
            SlotName::Paint => slot_state(&self.paint),
            SlotName::DoorsWindows => slot_state(&self.doors_windows),
            SlotName::Labour => slot_state(&self.labour),
        }
    }

    /// JSON of one slot's outcome, `None` when the slot is empty.
    pub fn slot_json(&self, name: SlotName) -> CalcResult<Option<serde_json::Value>> {
        fn to_json<T: Serialize>(slot: &Slot<T>) -> CalcResult<Option<serde_json::Value>> {
            slot.outcome()
                .map(|outcome| {
                    serde_json::to_value(outcome).map_err(|e| CalcError::SerializationError {
                        reason: e.to_string(),
                    })
                })
                .transpose()
        }
        match name {
            SlotName::Bricks => to_json(&self.bricks),
            SlotName::CementMortar => to_json(&self.cement_mortar),
            SlotName::ConcreteMix => to_json(&self.concrete_mix),
            SlotName::GrayStructure => to_json(&self.gray_structure),
            SlotName::Steel => to_json(&self.steel),
            SlotName::Plumbing => to_json(&self.plumbing),
            SlotName::Electrical => to_json(&self.electrical),
            SlotName::Paint => to_json(&self.paint),
            SlotName::DoorsWindows => to_json(&self.doors_windows),
            SlotName::Labour => to_json(&self.labour),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::LabourResult;

    #[test]
    fn test_project_creation() {
        let project = Project::new("Client", "Site", fixtures::reference_inputs());
        assert_eq!(project.meta.version, SCHEMA_VERSION);
        assert_eq!(project.meta.client, "Client");
        assert!(project.results.bricks.is_empty());
    }

    #[test]
    fn test_plot_area_prefers_explicit_size() {
        let mut inputs = ProjectInputs::new(30.0, 40.0, 1, 2);
        assert_eq!(inputs.plot_area(), SqFt(1200.0));
        inputs.plot_size_sqft = Some(1125.0);
        assert_eq!(inputs.plot_area(), SqFt(1125.0));
        assert_eq!(inputs.plot_footprint(), SqFt(1200.0));
    }

    #[test]
    fn test_structure_defaults() {
        let mut inputs = ProjectInputs::new(30.0, 40.0, 1, 2);
        assert_eq!(inputs.structure(StructureKind::Tower), None);

        inputs.underground_tank = OptionalStructure::included(Some(10.0), None);
        inputs.overhead_tank = OptionalStructure::included(Some(-1.0), Some(0.0));
        assert_eq!(
            inputs.structure(StructureKind::UndergroundTank),
            Some(RoomSize::new(10.0, 6.0))
        );
        assert_eq!(inputs.structure(StructureKind::OverheadTank), Some(RoomSize::new(6.0, 5.0)));
    }

    #[test]
    fn test_columns_default_and_explicit_zero() {
        let mut inputs = ProjectInputs::new(30.0, 40.0, 1, 2);
        assert_eq!(inputs.columns(), 14);
        inputs.number_of_columns = Some(0);
        assert_eq!(inputs.columns(), 0);
    }

    #[test]
    fn test_inputs_deserialize_with_defaults() {
        let json = r#"{
            "plot_length_ft": 30, "plot_width_ft": 40,
            "number_of_floors": 2, "number_of_rooms": 3,
            "bathroom_sizes": "6x6, 5x7",
            "tower": { "include": true }
        }"#;
        let inputs: ProjectInputs = serde_json::from_str(json).unwrap();
        assert_eq!(inputs.number_of_geysers, 0);
        assert_eq!(inputs.bathroom_count(), 2);
        assert_eq!(inputs.kitchen_count(), 0);
        assert_eq!(inputs.structure(StructureKind::Tower), Some(RoomSize::new(6.0, 6.0)));
    }

    #[test]
    fn test_slot_is_write_once() {
        let mut slot: Slot<LabourResult> = Slot::default();
        let first = TradeOutcome::Failed(TradeFailure {
            error: "x".into(),
            code: "MISSING_PRICE".into(),
        });
        slot.set(SlotName::Labour, first.clone()).unwrap();

        let err = slot.set(SlotName::Labour, first).unwrap_err();
        assert_eq!(err, CalcError::AlreadyComputed { slot: "labour".into() });
        assert_eq!(err.error_code(), "ALREADY_COMPUTED");
    }

    #[test]
    fn test_failed_outcome_serializes_as_error_object() {
        let outcome: TradeOutcome<LabourResult> =
            TradeOutcome::from_result(Err(CalcError::missing_price("labour", "rate_per_sqft")));
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["code"], "MISSING_PRICE");
        assert!(json["error"].as_str().unwrap().contains("labour.rate_per_sqft"));
    }

    #[test]
    fn test_results_not_read_back() {
        let mut project = Project::new("Client", "Site", fixtures::reference_inputs());
        project
            .results
            .labour
            .set(
                SlotName::Labour,
                TradeOutcome::Failed(TradeFailure { error: "e".into(), code: "C".into() }),
            )
            .unwrap();
        let json = serde_json::to_string(&project).unwrap();
        assert!(json.contains("\"labour\""));

        let loaded: Project = serde_json::from_str(&json).unwrap();
        assert!(!loaded.results.is_set(SlotName::Labour));
        assert_eq!(loaded.inputs, project.inputs);
    }
}
