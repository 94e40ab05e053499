// src/analysis/finance.rs

use crate::analysis::market::{HIGH_DEMAND_MAX_RATIO, LOW_DEMAND_MIN_RATIO};
use crate::analysis::stats::{mean, positive};
use crate::analysis::AnalysisError;
use crate::domain::finance::{
    BuyCosts, InvestmentMetrics, MortgagePayment, PitiBreakdown, PricingSuggestion,
};
use crate::domain::{
    Assumptions, ComparableListing, ListingStatus, MarketStats, SubjectProperty,
};

/// Monthly rent as a share of property value (the "0.9% rule").
pub const RENT_TO_VALUE_MONTHLY: f64 = 0.009;
pub const RENT_PER_SQFT_MONTHLY: f64 = 2.0;
pub const DEFAULT_MONTHLY_RENT: f64 = 2_500.0;
pub const DEFAULT_PRICE: f64 = 500_000.0;

/// Half-width of the suggested listing range.
const PRICE_RANGE_SPREAD: f64 = 0.03;

/// Longest loan term the amortization formula accepts.
pub const MAX_LOAN_TERM_YEARS: u32 = 100;

fn non_negative(name: &str, value: f64) -> Result<f64, AnalysisError> {
    if !value.is_finite() || value < 0.0 {
        return Err(AnalysisError::InvalidInput(format!(
            "{name} must be a non-negative number, got {value}"
        )));
    }
    Ok(value)
}

fn strictly_positive(name: &str, value: f64) -> Result<f64, AnalysisError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(AnalysisError::InvalidInput(format!(
            "{name} must be greater than zero, got {value}"
        )));
    }
    Ok(value)
}

fn fraction(name: &str, value: f64) -> Result<f64, AnalysisError> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(AnalysisError::InvalidInput(format!(
            "{name} must be between 0 and 1, got {value}"
        )));
    }
    Ok(value)
}

/// Standard amortization: `M = P * r(1+r)^n / ((1+r)^n - 1)` with a
/// monthly rate `r` and `n` monthly payments. A zero rate is a straight
/// `P / n` split.
pub fn compute_mortgage(
    principal: f64,
    annual_rate: f64,
    term_years: u32,
) -> Result<MortgagePayment, AnalysisError> {
    let principal = non_negative("principal", principal)?;
    let annual_rate = non_negative("interest rate", annual_rate)?;
    let n = match term_years.checked_mul(12) {
        Some(n) if (1..=MAX_LOAN_TERM_YEARS).contains(&term_years) => n,
        _ => {
            return Err(AnalysisError::InvalidInput(format!(
                "loan term must be between 1 and {MAX_LOAN_TERM_YEARS} years, got {term_years}"
            )))
        }
    };
    let r = annual_rate / 12.0;

    let monthly_pi = if r == 0.0 {
        principal / f64::from(n)
    } else {
        let growth = (1.0 + r).powf(f64::from(n));
        principal * r * growth / (growth - 1.0)
    };

    Ok(MortgagePayment {
        principal,
        num_payments: n,
        monthly_pi,
    })
}

/// Adds monthly taxes and insurance to a mortgage payment.
/// `insurance_annual` is the yearly premium.
pub fn compute_piti(
    mortgage: &MortgagePayment,
    tax_rate: f64,
    insurance_annual: f64,
    property_value: f64,
) -> Result<PitiBreakdown, AnalysisError> {
    let principal_interest = non_negative("monthly payment", mortgage.monthly_pi)?;
    let tax_rate = non_negative("tax rate", tax_rate)?;
    let insurance_annual = non_negative("insurance estimate", insurance_annual)?;
    let property_value = non_negative("property value", property_value)?;

    let taxes = property_value * tax_rate / 12.0;
    let insurance = insurance_annual / 12.0;

    Ok(PitiBreakdown {
        principal_interest,
        taxes,
        insurance,
        total: principal_interest + taxes + insurance,
    })
}

/// NOI, cap rate and cash-on-cash for a rental.
///
/// Expenses are modelled as a ratio of effective gross income (rent after
/// vacancy). Returned rates are fractions.
pub fn compute_investment_metrics(
    gross_rent_monthly: f64,
    operating_expense_ratio: f64,
    vacancy_rate: f64,
    purchase_price: f64,
    annual_debt_service: f64,
    down_payment_amount: f64,
) -> Result<InvestmentMetrics, AnalysisError> {
    let gross_rent_monthly = non_negative("monthly rent", gross_rent_monthly)?;
    let operating_expense_ratio = fraction("operating expense ratio", operating_expense_ratio)?;
    let vacancy_rate = fraction("vacancy rate", vacancy_rate)?;
    let purchase_price = strictly_positive("purchase price", purchase_price)?;
    let annual_debt_service = non_negative("annual debt service", annual_debt_service)?;
    let down_payment_amount = strictly_positive("down payment", down_payment_amount)?;

    let gross_annual_rent = gross_rent_monthly * 12.0;
    let effective_gross_income = gross_annual_rent * (1.0 - vacancy_rate);
    let operating_expenses = effective_gross_income * operating_expense_ratio;
    let noi = effective_gross_income - operating_expenses;
    let annual_cash_flow = noi - annual_debt_service;

    Ok(InvestmentMetrics {
        gross_annual_rent,
        effective_gross_income,
        vacancy_loss: gross_annual_rent - effective_gross_income,
        operating_expenses,
        noi,
        monthly_noi: noi / 12.0,
        annual_debt_service,
        annual_cash_flow,
        cap_rate: noi / purchase_price,
        cash_on_cash: annual_cash_flow / down_payment_amount,
    })
}

/// Full monthly cost of buying at `purchase_price` under `assumptions`.
///
/// A known annual tax bill overrides the assumed tax rate.
pub fn compute_buy_costs(
    purchase_price: f64,
    assumptions: &Assumptions,
    hoa_monthly: Option<f64>,
    taxes_annual: Option<f64>,
) -> Result<BuyCosts, AnalysisError> {
    let purchase_price = strictly_positive("purchase price", purchase_price)?;
    let down_payment_pct = fraction("down payment percentage", assumptions.down_payment_pct)?;
    let hoa_monthly = non_negative("HOA fee", hoa_monthly.unwrap_or(0.0))?;

    let down_payment = purchase_price * down_payment_pct;
    let loan_amount = purchase_price - down_payment;

    let mortgage = compute_mortgage(
        loan_amount,
        assumptions.interest_rate,
        assumptions.loan_term_years,
    )?;

    let tax_rate = match positive(taxes_annual) {
        Some(annual) => annual / purchase_price,
        None => assumptions.property_tax_rate,
    };

    let piti = compute_piti(
        &mortgage,
        tax_rate,
        assumptions.insurance_for(purchase_price),
        purchase_price,
    )?;

    Ok(BuyCosts {
        purchase_price,
        down_payment,
        loan_amount,
        piti,
        hoa_monthly,
        total_monthly: piti.total + hoa_monthly,
    })
}

/// Fair monthly rent, from the best evidence available: an explicit
/// estimate, the list price, a comp-derived value, the living area, and
/// finally a flat default.
pub fn estimate_rent(subject: &SubjectProperty, stats: Option<&MarketStats>) -> f64 {
    if let Some(rent) = positive(subject.rent_estimate) {
        return rent;
    }
    if let Some(price) = positive(subject.list_price) {
        return price * RENT_TO_VALUE_MONTHLY;
    }

    let sqft = positive(subject.sqft);
    let comp_value = sqft.zip(stats.and_then(|s| positive(s.median_price_per_sqft)));
    if let Some((sqft, ppsf)) = comp_value {
        return sqft * ppsf * RENT_TO_VALUE_MONTHLY;
    }
    if let Some(sqft) = sqft {
        return sqft * RENT_PER_SQFT_MONTHLY;
    }

    DEFAULT_MONTHLY_RENT
}

/// Rent a buyer could ask if they let the home out: the explicit estimate,
/// else the living area at the per-sqft rate. The list price is not
/// evidence here since the cap rate is measured against it.
pub fn rental_income_estimate(subject: &SubjectProperty) -> Option<f64> {
    positive(subject.rent_estimate)
        .or_else(|| positive(subject.sqft).map(|sqft| sqft * RENT_PER_SQFT_MONTHLY))
}

/// Rough yield if a home bought to live in were rented out instead:
/// annual rent less taxes, over price. `None` without a usable price.
pub fn potential_cap_rate(monthly_rent: f64, taxes_annual: Option<f64>, price: f64) -> Option<f64> {
    let price = positive(Some(price))?;
    let taxes = positive(taxes_annual).unwrap_or(0.0);
    Some((monthly_rent * 12.0 - taxes) / price)
}

/// Seasonal list-price multiplier for a calendar month (1-12).
pub fn seasonal_factor(month: u32) -> f64 {
    match month {
        11 | 12 | 1 | 2 => 0.985,
        3..=6 => 1.015,
        _ => 1.0,
    }
}

/// Suggested list price for a seller, nudged by season. The anchor is the
/// mean of sold comps, else of all comps, else the area's median sale
/// price, else the subject's own list price. `month` is the calendar month
/// the listing would go live.
pub fn suggest_list_price(
    subject: &SubjectProperty,
    stats: &MarketStats,
    comps: &[ComparableListing],
    month: u32,
) -> PricingSuggestion {
    let sold: Vec<f64> = comps
        .iter()
        .filter(|c| c.status == ListingStatus::Sold)
        .filter_map(|c| positive(c.price))
        .collect();
    let all: Vec<f64> = comps.iter().filter_map(|c| positive(c.price)).collect();

    let anchor = mean(&sold)
        .or_else(|| mean(&all))
        .or(stats.area_median_sold_price)
        .or(positive(subject.list_price))
        .unwrap_or(DEFAULT_PRICE);

    let factor = seasonal_factor(month);
    let suggested_price = anchor * factor;

    let mut reasons = Vec::new();
    if factor > 1.0 {
        reasons.push("Peak selling season - market favors sellers".to_string());
    } else if factor < 1.0 {
        reasons.push("Off-season pricing to attract serious buyers".to_string());
    }

    if stats.supply_demand_ratio < HIGH_DEMAND_MAX_RATIO {
        reasons.push("Low inventory creates pricing power".to_string());
    } else if stats.supply_demand_ratio > LOW_DEMAND_MIN_RATIO {
        reasons.push("High inventory suggests competitive pricing needed".to_string());
    }

    PricingSuggestion {
        suggested_price,
        price_range_low: suggested_price * (1.0 - PRICE_RANGE_SPREAD),
        price_range_high: suggested_price * (1.0 + PRICE_RANGE_SPREAD),
        seasonal_factor: factor,
        reasons,
    }
}

const POSITIVE_KEYWORDS: [&str; 7] = [
    "updated",
    "renovated",
    "remodeled",
    "modern",
    "new",
    "pristine",
    "immaculate",
];
const NEGATIVE_KEYWORDS: [&str; 6] = [
    "original",
    "needs tlc",
    "fixer",
    "potential",
    "investor special",
    "as-is",
];

/// Rough condition label from listing copy, then from construction year.
pub fn analyze_condition(subject: &SubjectProperty) -> &'static str {
    let description = subject
        .description
        .as_deref()
        .unwrap_or_default()
        .to_lowercase();

    let positives = POSITIVE_KEYWORDS
        .iter()
        .filter(|kw| description.contains(*kw))
        .count();
    let negatives = NEGATIVE_KEYWORDS
        .iter()
        .filter(|kw| description.contains(*kw))
        .count();

    if positives > negatives && positives > 0 {
        return "Updated/Renovated";
    }
    if negatives > 0 {
        return "Original/Needs Work";
    }

    match subject.year_built {
        Some(year) if year > 2010 => "Modern/Like New",
        Some(year) if year < 1980 => "Older/Character Home",
        _ => "Average Condition",
    }
}
