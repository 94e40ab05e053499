// src/domain/market.rs

use serde::{Deserialize, Serialize};

/// Where the subject's price-per-sqft sits within its comps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PricePosition {
    Underpriced,
    Average,
    Overpriced,
}

impl PricePosition {
    pub fn label(&self) -> &'static str {
        match self {
            PricePosition::Underpriced => "Underpriced",
            PricePosition::Average => "Average",
            PricePosition::Overpriced => "Overpriced",
        }
    }
}

/// Demand relative to supply, read off the supply/demand ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DemandLevel {
    Low,
    Balanced,
    High,
}

impl DemandLevel {
    pub fn label(&self) -> &'static str {
        match self {
            DemandLevel::Low => "Low Demand",
            DemandLevel::Balanced => "Balanced",
            DemandLevel::High => "High Demand",
        }
    }
}

/// Area-level figures reported by a market data provider.
/// Everything here is passed through untouched; nothing is derived.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AreaSnapshot {
    pub area_name: Option<String>,
    pub median_sold_price: Option<f64>,
    pub trend_12m_pct: Option<f64>,
    pub trend_5y_pct: Option<f64>,
}

/// Market statistics for one evaluation, recomputed from the comp pool
/// every time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketStats {
    pub area_name: Option<String>,

    pub comp_count: usize,
    pub median_price: Option<f64>,
    pub median_price_per_sqft: Option<f64>,
    pub median_days_on_market: Option<f64>,

    pub active_listings: usize,
    pub recent_sales: usize,
    /// active listings / max(1, recent sales); above 1 means more supply than demand.
    pub supply_demand_ratio: f64,
    pub demand_level: DemandLevel,

    pub trend_12m_pct: Option<f64>,
    pub trend_5y_pct: Option<f64>,
    /// Area median sale price from the provider, independent of the comp pool.
    #[serde(default)]
    pub area_median_sold_price: Option<f64>,

    pub price_position: PricePosition,
    pub subject_percentile: Option<f64>,

    /// Set when the comp pool was empty and a synthetic pool stood in for it.
    pub used_fallback_data: bool,
    /// Comps excluded from at least one statistic because of unusable numbers.
    pub skipped_records: usize,
}
