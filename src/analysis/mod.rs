//! Market statistics and financial metrics.
//!
//! Everything in here is a pure function of its inputs: no I/O, no shared
//! state, and the same inputs always give the same outputs.

pub mod finance;
pub mod flags;
pub mod market;
pub mod stats;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub use finance::{
    analyze_condition, compute_buy_costs, compute_investment_metrics, compute_mortgage,
    compute_piti, estimate_rent, suggest_list_price,
};
pub use flags::generate_flags;
pub use market::{compute_market_stats, compute_market_stats_with_area};
