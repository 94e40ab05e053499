// src/analysis/market.rs

use crate::analysis::stats::{median, percentile_rank, positive};
use crate::domain::{
    AreaSnapshot, ComparableListing, DemandLevel, ListingStatus, MarketStats, PricePosition,
    SubjectProperty,
};
use tracing::{debug, warn};

/// Percentiles at or below this are underpriced.
pub const UNDERPRICED_MAX_PERCENTILE: f64 = 35.0;
/// Percentiles above the underpriced band and at or below this are average.
pub const AVERAGE_MAX_PERCENTILE: f64 = 65.0;

/// Below this supply/demand ratio the market favours sellers.
pub const HIGH_DEMAND_MAX_RATIO: f64 = 3.0;
/// Above this ratio inventory is piling up.
pub const LOW_DEMAND_MIN_RATIO: f64 = 6.0;

const FALLBACK_BASE_PRICE: f64 = 500_000.0;
const FALLBACK_BASE_SQFT: f64 = 1_800.0;
const FALLBACK_PRICE_JITTER: [f64; 8] = [0.85, 0.90, 0.95, 0.98, 1.02, 1.05, 1.10, 1.15];
const FALLBACK_DAYS_ON_MARKET: [f64; 8] = [12.0, 18.0, 24.0, 31.0, 38.0, 45.0, 52.0, 60.0];

/// Market statistics from the comp pool alone.
pub fn compute_market_stats(subject: &SubjectProperty, comps: &[ComparableListing]) -> MarketStats {
    compute_market_stats_with_area(subject, comps, None)
}

/// Market statistics from the comp pool, with area-level trend figures and
/// the area's median sold price passed through when a provider supplied them.
///
/// An empty pool never fails: a synthetic pool derived from the subject is
/// used instead and `used_fallback_data` is set.
pub fn compute_market_stats_with_area(
    subject: &SubjectProperty,
    comps: &[ComparableListing],
    area: Option<&AreaSnapshot>,
) -> MarketStats {
    let synthetic;
    let (pool, used_fallback_data) = if comps.is_empty() {
        debug!(address = %subject.address, "no comparables supplied, using synthetic pool");
        synthetic = synthetic_comps(subject);
        (synthetic.as_slice(), true)
    } else {
        (comps, false)
    };

    let mut prices = Vec::with_capacity(pool.len());
    let mut prices_per_sqft = Vec::with_capacity(pool.len());
    let mut days_on_market = Vec::with_capacity(pool.len());
    let mut skipped_records = 0;

    for comp in pool {
        let mut skipped = false;

        match positive(comp.price) {
            Some(price) => prices.push(price),
            None => skipped = true,
        }

        match comp.price_per_sqft() {
            Some(ppsf) => prices_per_sqft.push(ppsf),
            None => skipped = true,
        }

        match comp.days_on_market {
            Some(dom) if dom.is_finite() && dom >= 0.0 => days_on_market.push(dom),
            _ => skipped = true,
        }

        if skipped {
            skipped_records += 1;
        }
    }

    if skipped_records > 0 {
        warn!(
            skipped_records,
            comp_count = pool.len(),
            "comparables with unusable numbers were left out of market statistics"
        );
    }

    let active_listings = pool
        .iter()
        .filter(|c| c.status == ListingStatus::Active)
        .count();
    let recent_sales = pool
        .iter()
        .filter(|c| c.status == ListingStatus::Sold)
        .count();
    let ratio = supply_demand_ratio(active_listings, recent_sales);

    let subject_percentile = subject
        .price_per_sqft()
        .and_then(|ppsf| percentile_rank(&prices_per_sqft, ppsf));

    MarketStats {
        area_name: area.and_then(|a| a.area_name.clone()),
        comp_count: pool.len(),
        median_price: median(&prices),
        median_price_per_sqft: median(&prices_per_sqft),
        median_days_on_market: median(&days_on_market),
        active_listings,
        recent_sales,
        supply_demand_ratio: ratio,
        demand_level: demand_level(ratio),
        trend_12m_pct: area.and_then(|a| a.trend_12m_pct),
        trend_5y_pct: area.and_then(|a| a.trend_5y_pct),
        area_median_sold_price: area.and_then(|a| positive(a.median_sold_price)),
        price_position: subject_percentile
            .map(classify_percentile)
            .unwrap_or(PricePosition::Average),
        subject_percentile,
        used_fallback_data,
        skipped_records,
    }
}

/// Active listings over recent sales, with the denominator floored at 1.
pub fn supply_demand_ratio(active_listings: usize, recent_sales: usize) -> f64 {
    active_listings as f64 / recent_sales.max(1) as f64
}

/// Boundary values take the lower label: 35 is underpriced, 65 is average.
pub fn classify_percentile(percentile: f64) -> PricePosition {
    if percentile <= UNDERPRICED_MAX_PERCENTILE {
        PricePosition::Underpriced
    } else if percentile <= AVERAGE_MAX_PERCENTILE {
        PricePosition::Average
    } else {
        PricePosition::Overpriced
    }
}

pub fn demand_level(ratio: f64) -> DemandLevel {
    if ratio < HIGH_DEMAND_MAX_RATIO {
        DemandLevel::High
    } else if ratio > LOW_DEMAND_MIN_RATIO {
        DemandLevel::Low
    } else {
        DemandLevel::Balanced
    }
}

/// Fixed-jitter stand-in pool built around the subject's own price and size.
fn synthetic_comps(subject: &SubjectProperty) -> Vec<ComparableListing> {
    let base_price = positive(subject.list_price).unwrap_or(FALLBACK_BASE_PRICE);
    let sqft = positive(subject.sqft).unwrap_or(FALLBACK_BASE_SQFT);

    FALLBACK_PRICE_JITTER
        .iter()
        .zip(FALLBACK_DAYS_ON_MARKET)
        .enumerate()
        .map(|(i, (jitter, dom))| ComparableListing {
            address: None,
            // three sold for every active listing
            status: if i % 4 == 3 {
                ListingStatus::Active
            } else {
                ListingStatus::Sold
            },
            price: Some(base_price * jitter),
            sqft: Some(sqft),
            days_on_market: Some(dom),
            sale_date: None,
            distance_miles: None,
            bedrooms: subject.bedrooms,
            bathrooms: subject.bathrooms,
        })
        .collect()
}
