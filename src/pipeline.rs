// src/pipeline.rs
use chrono::{DateTime, Datelike, Utc};
use std::collections::HashMap;
use tracing::{info, warn};

use crate::analysis::finance::{potential_cap_rate, rental_income_estimate, DEFAULT_PRICE};
use crate::analysis::stats::positive;
use crate::analysis::{
    analyze_condition, compute_buy_costs, compute_investment_metrics,
    compute_market_stats_with_area, estimate_rent, generate_flags, suggest_list_price,
};
use crate::app::Services;
use crate::db::evaluations::EvaluationRecord;
use crate::domain::{
    Assumptions, ComparableListing, Evaluation, Flow, FlowDetails, MarketStats, SubjectProperty,
};
use crate::errors::ServerError;
use crate::narrative::{narrate, NarrativeContext};
use crate::providers::geocode::normalize_address;

/// What the user asked for on the evaluate form.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationRequest {
    pub flow: Flow,
    pub listing_url: Option<String>,
    pub address: Option<String>,
    pub assumptions: Assumptions,
}

impl EvaluationRequest {
    /// Reads the evaluate form. Percent fields are entered as percentages
    /// (`7` for 7%) and blank fields keep the flow's defaults.
    pub fn from_form(flow: Flow, form: &HashMap<String, String>) -> Result<Self, ServerError> {
        let text = |name: &str| {
            form.get(name)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let listing_url = text("listing_url");
        let address = text("address");
        if listing_url.is_none() && address.is_none() {
            return Err(ServerError::BadRequest(
                "Please provide either a listing URL or a property address".into(),
            ));
        }

        let mut assumptions = match flow {
            Flow::Investment => Assumptions::investment_default(),
            _ => Assumptions::default(),
        };

        if let Some(v) = number(form, "interest_rate")? {
            assumptions.interest_rate = v / 100.0;
        }
        if let Some(v) = number(form, "down_payment_pct")? {
            assumptions.down_payment_pct = v / 100.0;
        }
        if let Some(v) = number(form, "loan_term_years")? {
            if v.fract() != 0.0 || !(1.0..=50.0).contains(&v) {
                return Err(ServerError::BadRequest(format!(
                    "Loan term must be a whole number of years between 1 and 50, got {v}"
                )));
            }
            assumptions.loan_term_years = v as u32;
        }
        if let Some(v) = number(form, "property_tax_rate")? {
            assumptions.property_tax_rate = v / 100.0;
        }
        if let Some(v) = number(form, "insurance_annual")? {
            assumptions.insurance_annual = Some(v);
        }
        if let Some(v) = number(form, "vacancy_rate")? {
            assumptions.vacancy_rate = v / 100.0;
        }
        if let Some(v) = number(form, "operating_expense_ratio")? {
            assumptions.operating_expense_ratio = v / 100.0;
        }

        Ok(Self {
            flow,
            listing_url,
            address,
            assumptions,
        })
    }
}

/// Parses an optional numeric form field. Commas, `$` and `%` are ignored.
fn number(form: &HashMap<String, String>, name: &str) -> Result<Option<f64>, ServerError> {
    let Some(raw) = form.get(name) else {
        return Ok(None);
    };
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, ',' | '$' | '%') && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return Ok(None);
    }

    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(ServerError::BadRequest(format!(
            "{} is not a number: '{}'",
            name.replace('_', " "),
            raw.trim()
        ))),
    }
}

/// Runs one evaluation end to end with the configured services.
pub struct Evaluator<'a> {
    services: &'a Services,
}

impl<'a> Evaluator<'a> {
    pub fn new(services: &'a Services) -> Self {
        Self { services }
    }

    pub fn evaluate(
        &self,
        request: &EvaluationRequest,
        now: DateTime<Utc>,
    ) -> Result<EvaluationRecord, ServerError> {
        let flow = request.flow;
        let subject = self.property_facts(request)?;

        let area = self
            .services
            .provider
            .area_snapshot(&subject)
            .unwrap_or_else(|e| {
                warn!(provider = self.services.provider.name(), error = %e, "area snapshot unavailable");
                None
            });

        let comps = self
            .services
            .provider
            .comparables(&subject, self.services.comps_limit)
            .unwrap_or_else(|e| {
                warn!(provider = self.services.provider.name(), error = %e, "comparables unavailable");
                Vec::new()
            });

        let stats = compute_market_stats_with_area(&subject, &comps, area.as_ref());

        let details = flow_details(
            flow,
            &subject,
            &stats,
            &comps,
            &request.assumptions,
            now.month(),
        )?;
        let (red_flags, green_flags) = generate_flags(&subject, &stats);

        let summary = narrate(
            self.services.narrator.as_ref(),
            &NarrativeContext {
                flow,
                subject: &subject,
                stats: &stats,
                price_position: stats.price_position,
                details: &details,
            },
        );

        info!(
            flow = flow.as_str(),
            address = %subject.address,
            comps = comps.len(),
            fallback = stats.used_fallback_data,
            position = stats.price_position.label(),
            "evaluation complete"
        );

        let evaluation = Evaluation {
            summary,
            price_position: stats.price_position,
            demand_level: stats.demand_level,
            red_flags,
            green_flags,
            details,
        };

        Ok(EvaluationRecord::new(
            flow,
            subject,
            stats,
            evaluation,
            request.assumptions.clone(),
            now.timestamp(),
        ))
    }

    /// Facts from the listing page when a URL was given, otherwise from the
    /// provider, otherwise just the cleaned-up address. A typed address is
    /// also looked up to fill gaps the listing page left.
    fn property_facts(&self, request: &EvaluationRequest) -> Result<SubjectProperty, ServerError> {
        let address = match request.address.as_deref() {
            Some(raw) => Some(
                normalize_address(raw)
                    .ok_or_else(|| ServerError::BadRequest("Address is empty".into()))?
                    .canonical,
            ),
            None => None,
        };

        let scraped = request
            .listing_url
            .as_deref()
            .map(|url| self.services.scraper.scrape(url));

        let Some(address) = address else {
            return scraped.ok_or_else(|| {
                ServerError::BadRequest("Please provide either a listing URL or a property address".into())
            });
        };

        let looked_up = match self.services.provider.property_facts(&address) {
            Ok(facts) => facts,
            Err(e) => {
                warn!(provider = self.services.provider.name(), %address, error = %e, "property lookup failed");
                None
            }
        };

        let base = match scraped {
            Some(scraped) => SubjectProperty {
                address: address.clone(),
                ..scraped
            },
            None => SubjectProperty::with_address(address),
        };

        Ok(match looked_up {
            Some(facts) => base.merged_with(facts),
            None => base,
        })
    }
}

fn flow_details(
    flow: Flow,
    subject: &SubjectProperty,
    stats: &MarketStats,
    comps: &[ComparableListing],
    assumptions: &Assumptions,
    month: u32,
) -> Result<FlowDetails, ServerError> {
    let condition = analyze_condition(subject).to_string();

    let details = match flow {
        Flow::Rent => FlowDetails::Rent {
            estimated_rent: estimate_rent(subject, Some(stats)),
            condition,
        },

        Flow::Buy => {
            let price = positive(subject.list_price);
            let costs = price
                .map(|p| compute_buy_costs(p, assumptions, subject.hoa_monthly, subject.taxes_annual))
                .transpose()?;

            let potential_cap_rate = price
                .zip(rental_income_estimate(subject))
                .and_then(|(p, rent)| potential_cap_rate(rent, subject.taxes_annual, p));

            FlowDetails::Buy {
                costs,
                condition,
                potential_cap_rate,
            }
        }

        Flow::Sell => FlowDetails::Sell {
            pricing: suggest_list_price(subject, stats, comps, month),
            active_listings: stats.active_listings,
            recent_sales: stats.recent_sales,
            median_days_on_market: stats.median_days_on_market,
        },

        Flow::Investment => {
            let price = positive(subject.list_price).unwrap_or(DEFAULT_PRICE);
            let monthly_rent = estimate_rent(subject, Some(stats));
            let costs =
                compute_buy_costs(price, assumptions, subject.hoa_monthly, subject.taxes_annual)?;

            let metrics = compute_investment_metrics(
                monthly_rent,
                assumptions.operating_expense_ratio,
                assumptions.vacancy_rate,
                price,
                costs.piti.principal_interest * 12.0,
                costs.down_payment,
            )?;

            FlowDetails::Investment {
                monthly_rent,
                costs,
                metrics,
            }
        }
    };

    Ok(details)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Services;
    use crate::domain::{AreaSnapshot, ListingStatus, PricePosition};
    use crate::narrative::HeuristicNarrator;
    use crate::providers::{MarketDataProvider, OfflineProvider, ProviderError};
    use crate::scraper::ListingScraper;
    use chrono::TimeZone;
    use std::time::Duration;

    fn form(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn april() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 15, 12, 0, 0).unwrap()
    }

    /// Knows one house and six comps around it.
    struct FixedProvider;

    impl MarketDataProvider for FixedProvider {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn property_facts(&self, address: &str) -> Result<Option<SubjectProperty>, ProviderError> {
            Ok(Some(SubjectProperty {
                list_price: Some(300_000.0),
                sqft: Some(1_500.0),
                bedrooms: Some(3.0),
                year_built: Some(2018),
                ..SubjectProperty::with_address(address)
            }))
        }

        fn area_snapshot(
            &self,
            _subject: &SubjectProperty,
        ) -> Result<Option<AreaSnapshot>, ProviderError> {
            Ok(Some(AreaSnapshot {
                area_name: Some("Springfield".into()),
                trend_12m_pct: Some(6.0),
                ..Default::default()
            }))
        }

        fn comparables(
            &self,
            _subject: &SubjectProperty,
            _limit: usize,
        ) -> Result<Vec<ComparableListing>, ProviderError> {
            Ok((0..6)
                .map(|i| ComparableListing {
                    address: Some(format!("{i} Comp St")),
                    status: if i < 2 {
                        ListingStatus::Active
                    } else {
                        ListingStatus::Sold
                    },
                    price: Some(330_000.0 + 10_000.0 * i as f64),
                    sqft: Some(1_500.0),
                    days_on_market: Some(20.0),
                    sale_date: None,
                    distance_miles: Some(0.5),
                    bedrooms: Some(3.0),
                    bathrooms: Some(2.0),
                })
                .collect())
        }
    }

    /// Knows the house and the area, but has no comps.
    struct AreaOnlyProvider;

    impl MarketDataProvider for AreaOnlyProvider {
        fn name(&self) -> &'static str {
            "area-only"
        }

        fn property_facts(&self, address: &str) -> Result<Option<SubjectProperty>, ProviderError> {
            FixedProvider.property_facts(address)
        }

        fn area_snapshot(
            &self,
            _subject: &SubjectProperty,
        ) -> Result<Option<AreaSnapshot>, ProviderError> {
            Ok(Some(AreaSnapshot {
                area_name: Some("Springfield".into()),
                median_sold_price: Some(600_000.0),
                ..Default::default()
            }))
        }

        fn comparables(
            &self,
            _subject: &SubjectProperty,
            _limit: usize,
        ) -> Result<Vec<ComparableListing>, ProviderError> {
            Ok(Vec::new())
        }
    }

    struct DownProvider;

    impl MarketDataProvider for DownProvider {
        fn name(&self) -> &'static str {
            "down"
        }

        fn property_facts(&self, _address: &str) -> Result<Option<SubjectProperty>, ProviderError> {
            Err(ProviderError::Network("timed out".into()))
        }

        fn area_snapshot(
            &self,
            _subject: &SubjectProperty,
        ) -> Result<Option<AreaSnapshot>, ProviderError> {
            Err(ProviderError::Network("timed out".into()))
        }

        fn comparables(
            &self,
            _subject: &SubjectProperty,
            _limit: usize,
        ) -> Result<Vec<ComparableListing>, ProviderError> {
            Err(ProviderError::Status {
                status: 500,
                body: "oops".into(),
            })
        }
    }

    fn services(provider: Box<dyn MarketDataProvider>) -> Services {
        let scraper = ListingScraper::new(Duration::from_secs(1)).unwrap();
        Services::new(provider, Box::new(HeuristicNarrator), scraper, 10)
    }

    fn request(flow: Flow, address: &str) -> EvaluationRequest {
        EvaluationRequest::from_form(flow, &form(&[("address", address)])).unwrap()
    }

    #[test]
    fn form_requires_url_or_address() {
        let err = EvaluationRequest::from_form(Flow::Buy, &form(&[("address", "  ")]));
        assert!(matches!(err, Err(ServerError::BadRequest(_))));
    }

    #[test]
    fn form_reads_percentages_as_fractions() {
        let req = EvaluationRequest::from_form(
            Flow::Buy,
            &form(&[
                ("address", "1 Main St"),
                ("interest_rate", "6.5"),
                ("down_payment_pct", "10%"),
                ("loan_term_years", "15"),
                ("insurance_annual", "$1,800"),
                ("vacancy_rate", ""),
            ]),
        )
        .unwrap();

        assert!((req.assumptions.interest_rate - 0.065).abs() < 1e-12);
        assert!((req.assumptions.down_payment_pct - 0.10).abs() < 1e-12);
        assert_eq!(req.assumptions.loan_term_years, 15);
        assert_eq!(req.assumptions.insurance_annual, Some(1_800.0));
        assert_eq!(req.assumptions.vacancy_rate, Assumptions::default().vacancy_rate);
    }

    #[test]
    fn form_rejects_garbage_numbers() {
        for (field, value) in [("interest_rate", "seven"), ("loan_term_years", "12.5")] {
            let err = EvaluationRequest::from_form(
                Flow::Buy,
                &form(&[("address", "1 Main St"), (field, value)]),
            );
            assert!(matches!(err, Err(ServerError::BadRequest(_))), "{field}");
        }
    }

    #[test]
    fn investment_defaults_to_larger_down_payment() {
        let req = request(Flow::Investment, "1 Main St");
        assert_eq!(req.assumptions, Assumptions::investment_default());
    }

    #[test]
    fn offline_buy_uses_fallback_and_flags_it() {
        let services = services(Box::new(OfflineProvider));
        let record = Evaluator::new(&services)
            .evaluate(&request(Flow::Buy, " 12  Elm St , Springfield, IL 62701"), april())
            .unwrap();

        assert_eq!(record.subject.address, "12 Elm St, Springfield, IL 62701");
        assert!(record.stats.used_fallback_data);
        assert_eq!(record.stats.trend_12m_pct, None);
        assert!(record.evaluation.red_flags[0].contains("Limited comparable data"));
        assert!(matches!(
            record.evaluation.details,
            FlowDetails::Buy { costs: None, .. }
        ));
        assert!(!record.evaluation.summary.is_empty());
    }

    #[test]
    fn provider_data_flows_into_stats_and_details() {
        let services = services(Box::new(FixedProvider));
        let record = Evaluator::new(&services)
            .evaluate(&request(Flow::Buy, "12 Elm St, Springfield, IL 62701"), april())
            .unwrap();

        assert!(!record.stats.used_fallback_data);
        assert_eq!(record.stats.comp_count, 6);
        assert_eq!(record.stats.trend_12m_pct, Some(6.0));
        assert_eq!(record.evaluation.price_position, PricePosition::Underpriced);

        match &record.evaluation.details {
            FlowDetails::Buy {
                costs: Some(costs),
                potential_cap_rate,
                ..
            } => {
                assert_eq!(costs.purchase_price, 300_000.0);
                assert!((costs.down_payment - 60_000.0).abs() < 1e-6);
                // 1,500 sqft at $2/sqft a month over a 300k price
                let rate = potential_cap_rate.expect("living area gives a rent basis");
                assert!((rate - 0.12).abs() < 1e-12);
            }
            other => panic!("unexpected details: {other:?}"),
        }
        assert!(record
            .evaluation
            .green_flags
            .iter()
            .any(|f| f.contains("Below market value")));
    }

    #[test]
    fn every_flow_evaluates_offline() {
        let services = services(Box::new(OfflineProvider));
        for flow in Flow::ALL {
            let record = Evaluator::new(&services)
                .evaluate(&request(flow, "5 Lake Rd, Boise, ID 83702"), april())
                .unwrap();
            assert_eq!(record.flow, flow);
            assert_eq!(record.created_at, april().timestamp());
        }
    }

    #[test]
    fn sell_pricing_uses_listing_month() {
        let services = services(Box::new(FixedProvider));
        let record = Evaluator::new(&services)
            .evaluate(&request(Flow::Sell, "12 Elm St, Springfield, IL 62701"), april())
            .unwrap();

        let FlowDetails::Sell { pricing, .. } = record.evaluation.details else {
            panic!("expected sell details");
        };
        assert_eq!(pricing.seasonal_factor, 1.015);
        // Sold comps are 350k..380k.
        assert!((pricing.suggested_price - 365_000.0 * 1.015).abs() < 1e-6);
    }

    #[test]
    fn sell_pricing_without_comps_anchors_on_area_median() {
        let services = services(Box::new(AreaOnlyProvider));
        let record = Evaluator::new(&services)
            .evaluate(&request(Flow::Sell, "12 Elm St, Springfield, IL 62701"), april())
            .unwrap();

        assert!(record.stats.used_fallback_data);
        assert_eq!(record.stats.area_median_sold_price, Some(600_000.0));
        let FlowDetails::Sell { pricing, .. } = record.evaluation.details else {
            panic!("expected sell details");
        };
        assert!((pricing.suggested_price - 600_000.0 * 1.015).abs() < 1e-6);
    }

    #[test]
    fn provider_outage_degrades_to_fallback() {
        let services = services(Box::new(DownProvider));
        let record = Evaluator::new(&services)
            .evaluate(&request(Flow::Rent, "7 Hill Ave, Austin, TX 78701"), april())
            .unwrap();

        assert!(record.stats.used_fallback_data);
        assert!(matches!(record.evaluation.details, FlowDetails::Rent { .. }));
    }

    #[test]
    fn investment_with_zero_down_is_rejected() {
        let services = services(Box::new(FixedProvider));
        let req = EvaluationRequest::from_form(
            Flow::Investment,
            &form(&[("address", "1 Main St, Springfield"), ("down_payment_pct", "0")]),
        )
        .unwrap();

        let err = Evaluator::new(&services).evaluate(&req, april());
        assert!(matches!(err, Err(ServerError::BadRequest(_))));
    }
}
