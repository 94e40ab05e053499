// src/domain/finance.rs

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MortgagePayment {
    pub principal: f64,
    pub num_payments: u32,
    /// Monthly principal + interest.
    pub monthly_pi: f64,
}

/// Monthly principal, interest, taxes and insurance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PitiBreakdown {
    pub principal_interest: f64,
    pub taxes: f64,
    pub insurance: f64,
    pub total: f64,
}

/// What owning the property costs a buyer each month, plus cash up front.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BuyCosts {
    pub purchase_price: f64,
    pub down_payment: f64,
    pub loan_amount: f64,
    pub piti: PitiBreakdown,
    pub hoa_monthly: f64,
    pub total_monthly: f64,
}

/// Investment returns. Rates are fractions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InvestmentMetrics {
    pub gross_annual_rent: f64,
    pub effective_gross_income: f64,
    pub vacancy_loss: f64,
    pub operating_expenses: f64,
    pub noi: f64,
    pub monthly_noi: f64,
    pub annual_debt_service: f64,
    pub annual_cash_flow: f64,
    pub cap_rate: f64,
    pub cash_on_cash: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingSuggestion {
    pub suggested_price: f64,
    pub price_range_low: f64,
    pub price_range_high: f64,
    pub seasonal_factor: f64,
    pub reasons: Vec<String>,
}
