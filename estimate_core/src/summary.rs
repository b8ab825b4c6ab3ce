//! # Cost Summary
//!
//! Rolls each trade's `total_cost` into a labelled line and a grand total.
//! Trades appear in stage order. A trade whose slot holds an error is listed
//! as unavailable and left out of the total; a trade that never ran is
//! omitted.
//!
//! ## Example
//!
//! ```text
//! Gray Structure: 1,046,512.00 PKR
//! Steel: unavailable (MISSING_PRICE)
//! Labour: 780,000.00 PKR
//!
//! **Grand Total**: 1,826,512.00 PKR
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::pipeline::Stage;
use crate::project::{DerivedResults, SlotName, SlotState};
use crate::units::round_to;

/// What a summary line shows for its trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LineAmount {
    Priced { cost: f64 },
    Unavailable { code: String, error: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub trade: String,
    pub slot: SlotName,
    #[serde(flatten)]
    pub amount: LineAmount,
}

impl LineItem {
    pub fn cost(&self) -> Option<f64> {
        match self.amount {
            LineAmount::Priced { cost } => Some(cost),
            LineAmount::Unavailable { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub currency: String,
    pub lines: Vec<LineItem>,
    pub grand_total: f64,
}

impl Summary {
    /// Build the summary from whatever the run left in the trade slots.
    pub fn from_results(results: &DerivedResults, currency: impl Into<String>) -> Self {
        let mut lines = Vec::new();
        let mut total = 0.0;

        for stage in Stage::ALL {
            let amount = match results.state(stage.writes()) {
                SlotState::Empty => continue,
                SlotState::Computed(cost) => {
                    total += cost;
                    LineAmount::Priced { cost }
                }
                SlotState::Failed(failure) => LineAmount::Unavailable {
                    code: failure.code.clone(),
                    error: failure.error.clone(),
                },
            };
            lines.push(LineItem {
                trade: stage.name().to_string(),
                slot: stage.writes(),
                amount,
            });
        }

        Summary {
            currency: currency.into(),
            lines,
            grand_total: round_to(total, 2),
        }
    }

    /// Line for a trade slot, if that trade ran
    pub fn line(&self, slot: SlotName) -> Option<&LineItem> {
        self.lines.iter().find(|line| line.slot == slot)
    }

    pub fn unavailable(&self) -> impl Iterator<Item = &LineItem> {
        self.lines.iter().filter(|line| line.cost().is_none())
    }

    /// Plain-text rendering, one line per trade then the grand total.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            match &line.amount {
                LineAmount::Priced { cost } => {
                    writeln!(f, "{}: {} {}", line.trade, format_amount(*cost), self.currency)?
                }
                LineAmount::Unavailable { code, .. } => {
                    writeln!(f, "{}: unavailable ({})", line.trade, code)?
                }
            }
        }
        writeln!(f)?;
        write!(f, "**Grand Total**: {} {}", format_amount(self.grand_total), self.currency)
    }
}

/// Two decimals with comma thousands separators: `1234567.891` → `1,234,567.89`
pub fn format_amount(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && fixed.chars().any(|c| c != '0' && c != '.') {
        "-"
    } else {
        ""
    };
    format!("{}{}.{}", sign, grouped, fraction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::CostBreakdown;
    use crate::pipeline::Estimator;
    use crate::prices::fixtures::sample_prices;
    use crate::prices::PriceTable;
    use crate::project::fixtures::reference_inputs;
    use crate::project::Project;

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0.0), "0.00");
        assert_eq!(format_amount(999.5), "999.50");
        assert_eq!(format_amount(1000.0), "1,000.00");
        assert_eq!(format_amount(1_234_567.891), "1,234,567.89");
        assert_eq!(format_amount(-4200.0), "-4,200.00");
    }

    #[test]
    fn test_trade_cost_round_trips() {
        let prices = sample_prices();
        let mut project = Project::new("Client", "Site", reference_inputs());
        Estimator::new(&prices).run(&mut project).unwrap();

        let summary = Summary::from_results(&project.results, "PKR");
        let labour = project.results.labour.computed().unwrap();
        let labour_line = summary.line(SlotName::Labour).and_then(LineItem::cost);
        assert_eq!(labour_line, Some(labour.total_cost()));
        let steel = project.results.steel.computed().unwrap();
        let steel_line = summary.line(SlotName::Steel).and_then(LineItem::cost);
        assert_eq!(steel_line, Some(steel.total_cost()));

        let sum: f64 = summary.lines.iter().filter_map(LineItem::cost).sum();
        assert!((summary.grand_total - sum).abs() < 0.01);
        assert_eq!(summary.lines.len(), 7);
    }

    #[test]
    fn test_fixed_trade_order() {
        let prices = sample_prices();
        let mut project = Project::new("Client", "Site", reference_inputs());
        Estimator::new(&prices).run(&mut project).unwrap();

        let summary = Summary::from_results(&project.results, "PKR");
        let trades: Vec<&str> = summary.lines.iter().map(|line| line.trade.as_str()).collect();
        let expected = [
            "Gray Structure",
            "Steel",
            "Plumbing",
            "Paint",
            "Electrical",
            "Doors/Windows",
            "Labour",
        ];
        assert_eq!(trades, expected);
    }

    #[test]
    fn test_failed_trades_excluded_from_total() {
        let prices = PriceTable::default().with_price("labour", "rate_per_sqft", 650.0);
        let mut project = Project::new("Client", "Site", reference_inputs());
        Estimator::new(&prices).run(&mut project).unwrap();

        let summary = Summary::from_results(&project.results, "PKR");
        assert_eq!(summary.unavailable().count(), 6);
        // 30 × 40 × 1 floor × 650
        assert_eq!(summary.grand_total, 780_000.0);

        let text = summary.render();
        assert!(text.contains("Steel: unavailable (MISSING_UPSTREAM)"));
        assert!(text.contains("Plumbing: unavailable (MISSING_PRICE)"));
        assert!(text.contains("Labour: 780,000.00 PKR"));
        assert!(text.ends_with("\n\n**Grand Total**: 780,000.00 PKR"));
    }

    #[test]
    fn test_empty_results() {
        let summary = Summary::from_results(&DerivedResults::default(), "USD");
        assert!(summary.lines.is_empty());
        assert_eq!(summary.render(), "\n**Grand Total**: 0.00 USD");
    }
}
