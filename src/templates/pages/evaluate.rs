use crate::domain::assumptions::{
    DEFAULT_INTEREST_RATE, DEFAULT_LOAN_TERM_YEARS, DEFAULT_OPERATING_EXPENSE_RATIO,
    DEFAULT_PROPERTY_TAX_RATE, DEFAULT_VACANCY_RATE,
};
use crate::domain::{Assumptions, Flow};
use crate::templates::desktop_layout;
use maud::{html, Markup};

fn pct_placeholder(fraction: f64) -> String {
    format!("{}", (fraction * 1000.0).round() / 10.0)
}

fn number_field(name: &str, label: &str, placeholder: &str, hint: &str) -> Markup {
    html! {
        label for=(name) { (label) }
        input type="text" inputmode="decimal" id=(name) name=(name) placeholder=(placeholder);
        small class="hint" { (hint) }
    }
}

pub fn evaluate_page(flow: Flow) -> Markup {
    let defaults = match flow {
        Flow::Investment => Assumptions::investment_default(),
        _ => Assumptions::default(),
    };
    let financed = matches!(flow, Flow::Buy | Flow::Investment);

    desktop_layout(
        flow.title(),
        html! {
            main class="container narrow" {
                p { a href="/" { "← Back to home" } }
                h1 { (flow.title()) }

                form method="post" action=(format!("/evaluate/{}", flow.as_str())) class="evaluate-form" {
                    fieldset {
                        legend { "Property Information" }

                        label for="listing_url" { "Listing URL (optional)" }
                        input type="url" id="listing_url" name="listing_url"
                            placeholder="https://www.example.com/homedetails/...";

                        p class="or" { "— or —" }

                        label for="address" { "Property Address" }
                        input type="text" id="address" name="address"
                            placeholder="123 Main St, San Francisco, CA 94102";
                    }

                    @if financed {
                        fieldset {
                            legend { "Financing (optional)" }
                            (number_field("interest_rate", "Interest rate (%)",
                                &pct_placeholder(DEFAULT_INTEREST_RATE), "Annual rate"))
                            (number_field("down_payment_pct", "Down payment (%)",
                                &pct_placeholder(defaults.down_payment_pct), "Share of purchase price"))
                            (number_field("loan_term_years", "Loan term (years)",
                                &DEFAULT_LOAN_TERM_YEARS.to_string(), "Whole years"))
                            (number_field("property_tax_rate", "Property tax (%)",
                                &pct_placeholder(DEFAULT_PROPERTY_TAX_RATE),
                                "Used when the annual tax bill is unknown"))
                            (number_field("insurance_annual", "Insurance ($/year)", "auto",
                                "Defaults to 0.6% of the price"))
                        }
                    }

                    @if flow == Flow::Investment {
                        fieldset {
                            legend { "Operations (optional)" }
                            (number_field("vacancy_rate", "Vacancy (%)",
                                &pct_placeholder(DEFAULT_VACANCY_RATE), "Share of the year vacant"))
                            (number_field("operating_expense_ratio", "Operating expenses (%)",
                                &pct_placeholder(DEFAULT_OPERATING_EXPENSE_RATIO),
                                "Share of effective gross income"))
                        }
                    }

                    button type="submit" class="primary" { "Evaluate Property" }
                }
            }
        },
    )
}
