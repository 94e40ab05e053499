// src/analysis/flags.rs

use crate::domain::{DemandLevel, MarketStats, PricePosition, SubjectProperty};
use crate::format::money;

/// At most this many flags of each colour are shown.
pub const MAX_FLAGS: usize = 4;

/// Red (risk) and green (opportunity) flags for a property.
///
/// Rules are checked in priority order and each list is cut at `MAX_FLAGS`.
/// Price and demand signals are suppressed when the stats came from the
/// synthetic comp pool, since they would only echo the subject back.
pub fn generate_flags(subject: &SubjectProperty, stats: &MarketStats) -> (Vec<String>, Vec<String>) {
    let mut red = Vec::new();
    let mut green = Vec::new();

    if stats.used_fallback_data {
        red.push("Limited comparable data - market figures are estimated".to_string());
    } else {
        match stats.price_position {
            PricePosition::Overpriced => red.push("Priced above market average".to_string()),
            PricePosition::Underpriced => {
                green.push("Below market value - potential deal".to_string())
            }
            PricePosition::Average => {}
        }

        match stats.demand_level {
            DemandLevel::Low => red.push("High inventory - buyer's market".to_string()),
            DemandLevel::High => green.push("Low inventory - competitive market".to_string()),
            DemandLevel::Balanced => {}
        }
    }

    match subject.days_on_market {
        Some(days) if days > 60 => red.push(format!("Long time on market ({days} days)")),
        Some(days) if days < 15 => green.push("Recently listed - move quickly".to_string()),
        _ => {}
    }

    match stats.trend_12m_pct {
        Some(pct) if pct > 5.0 => green.push(format!("Strong appreciation (+{pct:.1}% 1yr)")),
        Some(pct) if pct < -2.0 => red.push(format!("Declining prices ({pct:.1}% 1yr)")),
        _ => {}
    }

    match subject.hoa_monthly {
        Some(hoa) if hoa > 500.0 => red.push(format!("High HOA fees ({}/mo)", money(hoa))),
        Some(hoa) if hoa > 0.0 && hoa < 200.0 => green.push("Reasonable HOA fees".to_string()),
        _ => {}
    }

    match subject.year_built {
        Some(year) if year > 2015 => green.push("Modern construction".to_string()),
        Some(year) if year < 1970 => red.push("Older property - may need updates".to_string()),
        _ => {}
    }

    red.truncate(MAX_FLAGS);
    green.truncate(MAX_FLAGS);
    (red, green)
}
