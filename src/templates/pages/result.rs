use crate::db::evaluations::EvaluationRecord;
use crate::domain::finance::{BuyCosts, InvestmentMetrics, PricingSuggestion};
use crate::domain::{DemandLevel, Flow, FlowDetails, MarketStats, PricePosition};
use crate::format::{days, money, percent, signed_pct};
use crate::templates::components::{flag_lists, metric_card, property_header, status_bar};
use crate::templates::desktop_layout;
use maud::{html, Markup};

fn position_index(position: PricePosition) -> usize {
    match position {
        PricePosition::Underpriced => 0,
        PricePosition::Average => 1,
        PricePosition::Overpriced => 2,
    }
}

fn demand_index(level: DemandLevel) -> usize {
    match level {
        DemandLevel::Low => 0,
        DemandLevel::Balanced => 1,
        DemandLevel::High => 2,
    }
}

pub fn result_page(record: &EvaluationRecord) -> Markup {
    let evaluation = &record.evaluation;
    let stats = &record.stats;

    let price_labels = match record.flow {
        Flow::Buy => ["Underpriced", "Average", "Overpriced"],
        _ => ["Low", "Normal", "High"],
    };

    desktop_layout(
        record.flow.title(),
        html! {
            main class="container" {
                p { a href="/" { "← Back to home" } " · " a href="/history" { "History" } }

                p class="eyebrow" { (record.flow.title()) }
                (property_header(&record.subject))

                @if stats.used_fallback_data {
                    div class="notice warning" {
                        strong { "Limited market data. " }
                        "No comparable listings were available, so market figures below are "
                        "estimated from a synthetic pool built around this property."
                    }
                }

                section class="card summary" {
                    h2 { "Analysis Summary" }
                    p { (evaluation.summary) }
                }

                section {
                    h2 { "Market Position" }
                    div class="two-col" {
                        (status_bar("Price Position", price_labels, position_index(evaluation.price_position)))
                        (status_bar(
                            "Market Demand",
                            ["Low Demand", "Balanced", "High Demand"],
                            demand_index(evaluation.demand_level),
                        ))
                    }
                    @if let Some(p) = stats.subject_percentile {
                        p class="muted" {
                            "Price per sqft sits at the " (format!("{p:.0}")) "th percentile of "
                            (stats.comp_count) " comparables."
                        }
                    }
                }

                (flag_lists(&evaluation.red_flags, &evaluation.green_flags))

                section {
                    h2 { "Detailed Metrics" }
                    (details(&evaluation.details, stats))
                }

                section {
                    h2 { "Market Context" }
                    @if let Some(area) = &stats.area_name {
                        p class="muted" { (area) }
                    }
                    div class="metric-grid" {
                        (metric_card("Active Listings", &stats.active_listings.to_string()))
                        (metric_card("Recent Sales", &stats.recent_sales.to_string()))
                        (metric_card("Median DOM", &format!("{} days", days(stats.median_days_on_market))))
                        (metric_card("1Y Price Trend", &trend(stats.trend_12m_pct)))
                        (metric_card("5Y Price Trend", &trend(stats.trend_5y_pct)))
                    }
                    @if stats.skipped_records > 0 {
                        p class="muted" {
                            (stats.skipped_records) " comparable records had unusable numbers and were left out."
                        }
                    }
                }

                form method="post" action=(format!("/evaluations/{}/delete", record.id)) class="inline" {
                    button type="submit" class="danger" { "Delete evaluation" }
                }
            }
        },
    )
}

fn trend(pct: Option<f64>) -> String {
    pct.map(signed_pct).unwrap_or_else(|| "N/A".into())
}

fn details(details: &FlowDetails, stats: &MarketStats) -> Markup {
    match details {
        FlowDetails::Rent {
            estimated_rent,
            condition,
        } => html! {
            div class="metric-grid" {
                (metric_card("Est. Monthly Rent", &money(*estimated_rent)))
                (metric_card("Property Condition", condition))
                @if let Some(median) = stats.median_price {
                    (metric_card("Area Median Price", &money(median)))
                }
            }
        },

        FlowDetails::Buy {
            costs,
            condition,
            potential_cap_rate,
        } => html! {
            @match costs {
                Some(costs) => {
                    (buy_costs(costs))
                }
                None => {
                    p class="muted" { "No list price was found, so monthly costs could not be computed." }
                }
            }
            div class="metric-grid" {
                (metric_card("Property Condition", condition))
            }
            @if let Some(rate) = potential_cap_rate {
                div class="notice" { "If rented out, estimated cap rate: " (percent(*rate)) }
            }
        },

        FlowDetails::Sell {
            pricing,
            active_listings,
            recent_sales,
            median_days_on_market,
        } => html! {
            (pricing_block(pricing))
            h3 { "Market Summary" }
            ul {
                li { "Active listings: " (active_listings) }
                li { "Recent sales: " (recent_sales) }
                li { "Median days on market: " (days(*median_days_on_market)) }
            }
        },

        FlowDetails::Investment {
            monthly_rent,
            costs,
            metrics,
        } => html! {
            (investment_block(*monthly_rent, costs, metrics))
        },
    }
}

fn buy_costs(costs: &BuyCosts) -> Markup {
    html! {
        div class="metric-grid" {
            (metric_card("Total Monthly", &money(costs.total_monthly)))
            (metric_card("Mortgage (P&I)", &money(costs.piti.principal_interest)))
            (metric_card("Property Tax", &money(costs.piti.taxes)))
            (metric_card("Insurance", &money(costs.piti.insurance)))
            @if costs.hoa_monthly > 0.0 {
                (metric_card("HOA", &money(costs.hoa_monthly)))
            }
            (metric_card("Down Payment", &money(costs.down_payment)))
        }
    }
}

fn pricing_block(pricing: &PricingSuggestion) -> Markup {
    html! {
        div class="metric-grid" {
            (metric_card("Suggested List Price", &money(pricing.suggested_price)))
            (metric_card(
                "Price Range",
                &format!("{} - {}", money(pricing.price_range_low), money(pricing.price_range_high)),
            ))
        }
        @if !pricing.reasons.is_empty() {
            h3 { "Pricing Rationale" }
            ul { @for reason in &pricing.reasons { li { (reason) } } }
        }
    }
}

fn investment_block(monthly_rent: f64, costs: &BuyCosts, m: &InvestmentMetrics) -> Markup {
    html! {
        div class="metric-grid" {
            (metric_card("Cap Rate", &percent(m.cap_rate)))
            (metric_card("Cash-on-Cash", &percent(m.cash_on_cash)))
            (metric_card("Monthly NOI", &money(m.monthly_noi)))
            (metric_card("Annual Cash Flow", &money(m.annual_cash_flow)))
        }
        h3 { "Income & Expenses (Annual)" }
        table class="breakdown" {
            tbody {
                tr { td { "Gross rent (" (money(monthly_rent)) "/mo)" } td { (money(m.gross_annual_rent)) } }
                tr { td { "Vacancy loss" } td { (money(-m.vacancy_loss)) } }
                tr { td { "Effective gross income" } td { (money(m.effective_gross_income)) } }
                tr { td { "Operating expenses" } td { (money(-m.operating_expenses)) } }
                tr class="total" { td { "Net operating income" } td { (money(m.noi)) } }
                tr { td { "Debt service" } td { (money(-m.annual_debt_service)) } }
                tr class="total" { td { "Cash flow" } td { (money(m.annual_cash_flow)) } }
            }
        }
        p class="muted" {
            "Purchase " (money(costs.purchase_price)) " with " (money(costs.down_payment))
            " down; loan " (money(costs.loan_amount)) "."
        }
    }
}
