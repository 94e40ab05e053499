use crate::domain::{DemandLevel, Flow, FlowDetails, MarketStats, PricePosition};
use crate::format::{days, money, signed_pct};
use crate::narrative::{NarrativeContext, NarrativeError, Narrator};

const STRONG_CAP_RATE: f64 = 0.07;
const MODERATE_CAP_RATE: f64 = 0.05;

const APPRECIATING_TREND_PCT: f64 = 3.0;
const SOFTENING_TREND_PCT: f64 = -2.0;

/// Rule-based summaries; needs no network and never fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicNarrator;

impl HeuristicNarrator {
    pub fn summary(&self, ctx: &NarrativeContext) -> String {
        match ctx.flow {
            Flow::Rent => rent(ctx.stats, ctx.price_position),
            Flow::Buy => buy(ctx.stats, ctx.price_position),
            Flow::Sell => sell(ctx.stats),
            Flow::Investment => investment(ctx.stats, ctx.details),
        }
    }
}

impl Narrator for HeuristicNarrator {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    fn summarize(&self, ctx: &NarrativeContext) -> Result<String, NarrativeError> {
        Ok(self.summary(ctx))
    }
}

fn rent(stats: &MarketStats, position: PricePosition) -> String {
    let price = match position {
        PricePosition::Underpriced => "below market",
        PricePosition::Average => "fairly priced",
        PricePosition::Overpriced => "above market",
    };
    let demand = match stats.demand_level {
        DemandLevel::Low => "soft",
        DemandLevel::Balanced => "balanced",
        DemandLevel::High => "strong",
    };
    let pace = if stats.demand_level == DemandLevel::High {
        "quick"
    } else {
        "moderate"
    };

    format!(
        "This rental property appears {price} compared to similar units in the area. \
         The local rental market shows {demand} demand. \
         With median days on market at {} days, rental opportunities in this neighborhood \
         are moving at a {pace} pace. \
         Consider negotiating if pricing seems high relative to market conditions.",
        days(stats.median_days_on_market)
    )
}

fn buy(stats: &MarketStats, position: PricePosition) -> String {
    let price = match position {
        PricePosition::Underpriced => "underpriced",
        PricePosition::Average => "market-rate",
        PricePosition::Overpriced => "premium-priced",
    };

    let trend = stats.trend_12m_pct.unwrap_or(0.0);
    let direction = if trend > APPRECIATING_TREND_PCT {
        "appreciating"
    } else if trend > SOFTENING_TREND_PCT {
        "stable"
    } else {
        "softening"
    };

    let (market, action) = match stats.demand_level {
        DemandLevel::Low => ("buyer's", "thoughtfully"),
        DemandLevel::Balanced => ("balanced", "thoughtfully"),
        DemandLevel::High => ("seller's", "decisively"),
    };

    format!(
        "This property is {price} relative to comparable sales in the area. \
         The market is currently {direction} with a {} price change over the past year. \
         Local inventory levels suggest a {market} market. \
         Act {action} based on your timeline and budget constraints.",
        signed_pct(trend)
    )
}

fn sell(stats: &MarketStats) -> String {
    let (market, goal) = match stats.demand_level {
        DemandLevel::Low => ("buyer-friendly", "generate buyer interest"),
        DemandLevel::Balanced => ("balanced", "remain competitive"),
        DemandLevel::High => ("seller-friendly", "attract multiple offers"),
    };

    format!(
        "Current market conditions are {market} with {} active listings and {} recent sales. \
         Properties are averaging {} days on market. \
         Price strategically to {goal}. \
         Consider seasonal timing and current inventory levels when setting your list price.",
        stats.active_listings,
        stats.recent_sales,
        days(stats.median_days_on_market)
    )
}

fn investment(stats: &MarketStats, details: &FlowDetails) -> String {
    let (cap_rate, coc, monthly_noi) = match details {
        FlowDetails::Investment { metrics, .. } => {
            (metrics.cap_rate, metrics.cash_on_cash, metrics.monthly_noi)
        }
        _ => (0.0, 0.0, 0.0),
    };

    let quality = if cap_rate > STRONG_CAP_RATE {
        "strong"
    } else if cap_rate > MODERATE_CAP_RATE {
        "moderate"
    } else {
        "modest"
    };
    let outlook = if monthly_noi > 0.0 {
        "positive"
    } else {
        "challenging"
    };

    format!(
        "This investment opportunity shows a {quality} {:.1}% cap rate with a {:.1}% \
         cash-on-cash return. Monthly NOI of {} suggests {outlook} cash flow potential. \
         Consider operating expense ratios and local vacancy trends when finalizing your \
         analysis. Long-term appreciation in this market has been {:.1}% over 5 years.",
        cap_rate * 100.0,
        coc * 100.0,
        money(monthly_noi),
        stats.trend_5y_pct.unwrap_or(0.0)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::compute_market_stats;
    use crate::domain::finance::{BuyCosts, InvestmentMetrics, PitiBreakdown};
    use crate::domain::SubjectProperty;

    fn stats() -> MarketStats {
        compute_market_stats(&SubjectProperty::with_address("9 Oak Ct"), &[])
    }

    fn ctx<'a>(
        flow: Flow,
        subject: &'a SubjectProperty,
        stats: &'a MarketStats,
        details: &'a FlowDetails,
    ) -> NarrativeContext<'a> {
        NarrativeContext {
            flow,
            subject,
            stats,
            price_position: stats.price_position,
            details,
        }
    }

    #[test]
    fn buy_text_reports_trend_and_market() {
        let mut stats = stats();
        stats.trend_12m_pct = Some(4.5);
        stats.demand_level = DemandLevel::High;
        let text = buy(&stats, PricePosition::Underpriced);

        assert!(text.contains("underpriced"));
        assert!(text.contains("appreciating with a +4.5% price change"));
        assert!(text.contains("seller's market"));
        assert!(text.contains("Act decisively"));
    }

    #[test]
    fn missing_trend_reads_as_stable() {
        let text = buy(&stats(), PricePosition::Average);
        assert!(text.contains("stable with a +0.0% price change"));
    }

    #[test]
    fn sell_text_uses_counts() {
        let mut stats = stats();
        stats.active_listings = 4;
        stats.recent_sales = 9;
        stats.median_days_on_market = Some(21.0);
        stats.demand_level = DemandLevel::Low;
        let text = sell(&stats);

        assert!(text.contains("buyer-friendly with 4 active listings and 9 recent sales"));
        assert!(text.contains("averaging 21 days"));
        assert!(text.contains("generate buyer interest"));
    }

    #[test]
    fn investment_text_uses_metrics() {
        let subject = SubjectProperty::with_address("9 Oak Ct");
        let stats = stats();
        let costs = BuyCosts {
            purchase_price: 300_000.0,
            down_payment: 75_000.0,
            loan_amount: 225_000.0,
            piti: PitiBreakdown {
                principal_interest: 1_500.0,
                taxes: 300.0,
                insurance: 150.0,
                total: 1_950.0,
            },
            hoa_monthly: 0.0,
            total_monthly: 1_950.0,
        };
        let metrics = InvestmentMetrics {
            gross_annual_rent: 36_000.0,
            effective_gross_income: 34_200.0,
            vacancy_loss: 1_800.0,
            operating_expenses: 11_970.0,
            noi: 22_230.0,
            monthly_noi: 1_852.4,
            annual_debt_service: 18_000.0,
            annual_cash_flow: 4_230.0,
            cap_rate: 0.0741,
            cash_on_cash: 0.0564,
        };
        let details = FlowDetails::Investment {
            monthly_rent: 3_000.0,
            costs,
            metrics,
        };

        let text = HeuristicNarrator.summary(&ctx(Flow::Investment, &subject, &stats, &details));
        assert!(text.contains("strong 7.4% cap rate"));
        assert!(text.contains("5.6% cash-on-cash"));
        assert!(text.contains("Monthly NOI of $1,852"));
        assert!(text.contains("positive cash flow"));
    }

    #[test]
    fn every_flow_has_text() {
        let subject = SubjectProperty::with_address("9 Oak Ct");
        let stats = stats();
        let details = FlowDetails::Rent {
            estimated_rent: 2_000.0,
            condition: "Unknown".into(),
        };
        for flow in Flow::ALL {
            let text = HeuristicNarrator.summary(&ctx(flow, &subject, &stats, &details));
            assert!(!text.is_empty(), "{flow:?}");
        }
    }
}
