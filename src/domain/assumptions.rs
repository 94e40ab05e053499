// src/domain/assumptions.rs

use serde::{Deserialize, Serialize};

pub const DEFAULT_INTEREST_RATE: f64 = 0.07;
pub const DEFAULT_DOWN_PAYMENT_PCT: f64 = 0.20;
pub const INVESTMENT_DOWN_PAYMENT_PCT: f64 = 0.25;
pub const DEFAULT_LOAN_TERM_YEARS: u32 = 30;
pub const DEFAULT_PROPERTY_TAX_RATE: f64 = 0.012;
pub const DEFAULT_INSURANCE_RATE: f64 = 0.006;
pub const DEFAULT_VACANCY_RATE: f64 = 0.05;
pub const DEFAULT_OPERATING_EXPENSE_RATIO: f64 = 0.35;

/// Financing and operating assumptions supplied by the user.
/// Rates are fractions: 0.07 means 7%.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assumptions {
    pub interest_rate: f64,
    pub down_payment_pct: f64,
    pub loan_term_years: u32,
    pub property_tax_rate: f64,
    /// Annual premium. `None` falls back to `DEFAULT_INSURANCE_RATE` of the value.
    pub insurance_annual: Option<f64>,
    pub vacancy_rate: f64,
    pub operating_expense_ratio: f64,
}

impl Default for Assumptions {
    fn default() -> Self {
        Self {
            interest_rate: DEFAULT_INTEREST_RATE,
            down_payment_pct: DEFAULT_DOWN_PAYMENT_PCT,
            loan_term_years: DEFAULT_LOAN_TERM_YEARS,
            property_tax_rate: DEFAULT_PROPERTY_TAX_RATE,
            insurance_annual: None,
            vacancy_rate: DEFAULT_VACANCY_RATE,
            operating_expense_ratio: DEFAULT_OPERATING_EXPENSE_RATIO,
        }
    }
}

impl Assumptions {
    /// Investors typically put more down; everything else matches the default.
    pub fn investment_default() -> Self {
        Self {
            down_payment_pct: INVESTMENT_DOWN_PAYMENT_PCT,
            ..Self::default()
        }
    }

    pub fn insurance_for(&self, property_value: f64) -> f64 {
        self.insurance_annual
            .unwrap_or(property_value * DEFAULT_INSURANCE_RATE)
    }
}
