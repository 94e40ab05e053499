// src/domain/evaluation.rs

use crate::domain::finance::{BuyCosts, InvestmentMetrics, PricingSuggestion};
use crate::domain::market::{DemandLevel, PricePosition};
use serde::{Deserialize, Serialize};

/// Flow-specific results shown under "Detailed Metrics".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "flow", rename_all = "lowercase")]
pub enum FlowDetails {
    Rent {
        estimated_rent: f64,
        condition: String,
    },
    Buy {
        /// `None` when the listing had no price to finance.
        costs: Option<BuyCosts>,
        condition: String,
        /// Cap rate if the home were rented out instead (fraction).
        potential_cap_rate: Option<f64>,
    },
    Sell {
        pricing: PricingSuggestion,
        active_listings: usize,
        recent_sales: usize,
        median_days_on_market: Option<f64>,
    },
    Investment {
        monthly_rent: f64,
        costs: BuyCosts,
        metrics: InvestmentMetrics,
    },
}

/// The finished verdict for one property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub summary: String,
    pub price_position: PricePosition,
    pub demand_level: DemandLevel,
    pub red_flags: Vec<String>,
    pub green_flags: Vec<String>,
    pub details: FlowDetails,
}
