//! # Advisory Context
//!
//! Serialized context for the conversational advisory layer, which lives
//! outside this crate. The general advisor gets the whole project and the
//! cost summary; each specialist gets the project inputs and its own trade
//! result.
//!
//! ## Example
//!
//! ```rust
//! use estimate_core::advisory::{AdvisoryContext, Specialist};
//! use estimate_core::project::{Project, ProjectInputs};
//! use estimate_core::summary::Summary;
//!
//! let project = Project::new("Client", "Site", ProjectInputs::new(30.0, 40.0, 1, 2));
//! let summary = Summary::from_results(&project.results, "PKR");
//! let context = AdvisoryContext::build(&project, &summary).unwrap();
//!
//! assert!(context.full_text.contains("**Grand Total**"));
//! let steel = context.context_for(Specialist::Steel);
//! assert!(steel["steel"].is_null());
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::errors::{CalcError, CalcResult};
use crate::project::{Project, SlotName};
use crate::summary::Summary;

/// Trade specialists the general advisor can hand a question to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Specialist {
    GrayStructure,
    DoorsWindows,
    Electrical,
    Plumbing,
    Labour,
    Steel,
    Paint,
}

impl Specialist {
    pub const ALL: [Specialist; 7] = [
        Specialist::GrayStructure,
        Specialist::DoorsWindows,
        Specialist::Electrical,
        Specialist::Plumbing,
        Specialist::Labour,
        Specialist::Steel,
        Specialist::Paint,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Specialist::GrayStructure => "Gray Structure Agent",
            Specialist::DoorsWindows => "Doors and Windows Agent",
            Specialist::Electrical => "Electrical Agent",
            Specialist::Plumbing => "Plumbing Agent",
            Specialist::Labour => "Labour Agent",
            Specialist::Steel => "Steel Agent",
            Specialist::Paint => "Paint Agent",
        }
    }

    /// Result slot this specialist answers from
    pub fn slot(&self) -> SlotName {
        match self {
            Specialist::GrayStructure => SlotName::GrayStructure,
            Specialist::DoorsWindows => SlotName::DoorsWindows,
            Specialist::Electrical => SlotName::Electrical,
            Specialist::Plumbing => SlotName::Plumbing,
            Specialist::Labour => SlotName::Labour,
            Specialist::Steel => SlotName::Steel,
            Specialist::Paint => SlotName::Paint,
        }
    }

    /// Items the specialist's estimate covers
    pub fn topics(&self) -> &'static [&'static str] {
        match self {
            Specialist::GrayStructure => &[
                "bricks", "cement", "sand", "rohri", "bajri", "crush", "columns", "beams", "slab",
                "plaster", "flooring", "stairs",
            ],
            Specialist::DoorsWindows => {
                &["doors", "windows", "chokhat", "locks", "bolts", "stoppers"]
            }
            Specialist::Electrical => &[
                "wires",
                "conduit",
                "bands",
                "sockets",
                "fan boxes",
                "switch boxes",
                "electric sheets",
                "LED lights",
                "distribution boards",
                "breakers",
            ],
            Specialist::Plumbing => {
                &["supply lines", "riser", "sewer lines", "fittings", "ceramics"]
            }
            Specialist::Labour => &["covered area", "labour rate"],
            Specialist::Steel => &["reinforcement weight", "steel rate"],
            Specialist::Paint => &["paint", "primer", "putty", "exterior paint"],
        }
    }
}

impl fmt::Display for Specialist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Context handed to the advisory layer after a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryContext {
    /// Pretty project JSON followed by the rendered summary
    pub full_text: String,
    pub inputs: Value,
    /// Specialist slots that hold a result or an error object
    pub trades: BTreeMap<SlotName, Value>,
}

fn to_value<T: Serialize>(value: &T) -> CalcResult<Value> {
    serde_json::to_value(value).map_err(|e| CalcError::SerializationError { reason: e.to_string() })
}

impl AdvisoryContext {
    pub fn build(project: &Project, summary: &Summary) -> CalcResult<Self> {
        let project_json = serde_json::to_string_pretty(project)
            .map_err(|e| CalcError::SerializationError { reason: e.to_string() })?;
        let full_text = format!("Project:\n{}\n\n{}", project_json, summary.render());

        let mut trades = BTreeMap::new();
        for specialist in Specialist::ALL {
            let slot = specialist.slot();
            if let Some(value) = project.results.slot_json(slot)? {
                trades.insert(slot, value);
            }
        }

        Ok(AdvisoryContext {
            full_text,
            inputs: to_value(&project.inputs)?,
            trades,
        })
    }

    /// Inputs plus one specialist's slot. The slot key is `null` when that
    /// trade never ran.
    pub fn context_for(&self, specialist: Specialist) -> Value {
        let slot = specialist.slot();
        let mut context = json!({
            "specialist": specialist.name(),
            "topics": specialist.topics(),
            "inputs": self.inputs,
        });
        context[slot.as_str()] = self.trades.get(&slot).cloned().unwrap_or(Value::Null);
        context
    }
}
