//! # estimate_core - Residential Construction Estimation Engine
//!
//! `estimate_core` turns a handful of house dimensions (plot size, floors,
//! room/bathroom/kitchen sizes, optional tanks and stair tower) into material
//! quantities and costs for each trade, then rolls them into a summary and
//! the context an advisory assistant answers from. All inputs and outputs
//! are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Pure calculators**: each trade is a function of inputs and unit rates
//! - **Explicit ordering**: stages declare what they read and write
//! - **Contained failures**: a trade that fails stores an error object and the run continues
//! - **Rich Errors**: structured error types with stable codes
//!
//! ## Quick Start
//!
//! ```rust
//! use estimate_core::pipeline::Estimator;
//! use estimate_core::prices::PriceTable;
//! use estimate_core::project::{Project, ProjectInputs};
//! use estimate_core::summary::Summary;
//!
//! let prices = PriceTable::from_json_str(r#"{ "labour": { "rate_per_sqft": 650 } }"#).unwrap();
//! let mut project = Project::new("Client", "Plot 14-C", ProjectInputs::new(30.0, 40.0, 2, 3));
//!
//! Estimator::new(&prices).run(&mut project).unwrap();
//! let summary = Summary::from_results(&project.results, "PKR");
//! assert_eq!(summary.grand_total, 1_560_000.0);
//! ```
//!
//! ## Modules
//!
//! - [`sizes`] - `"LxW"` dimension list parsing
//! - [`prices`] - material price table
//! - [`project`] - project inputs and write-once result slots
//! - [`calculations`] - per-trade quantity and cost calculators
//! - [`pipeline`] - stage ordering and execution
//! - [`summary`] - cost summary and grand total
//! - [`advisory`] - context for the advisory layer
//! - [`config`] - runtime configuration
//! - [`file_io`] - project loading and atomic report saves
//! - [`units`] - type-safe unit wrappers
//! - [`errors`] - structured error types

pub mod advisory;
pub mod calculations;
pub mod config;
pub mod errors;
pub mod file_io;
pub mod pipeline;
pub mod prices;
pub mod project;
pub mod sizes;
pub mod summary;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use errors::{CalcError, CalcResult};
pub use file_io::{load_project, load_project_or_inputs, save_report};
pub use pipeline::{Estimator, RunReport, Stage};
pub use prices::PriceTable;
pub use project::{Project, ProjectInputs, ProjectMetadata};
pub use summary::Summary;
