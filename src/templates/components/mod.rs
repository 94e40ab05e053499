use maud::{html, Markup};

use crate::domain::SubjectProperty;
use crate::format::{grouped, money};

pub mod error;

pub use error::error_page;

pub fn card(title: &str, body: Markup) -> Markup {
    html! {
        div class="card" {
            h2 { (title) }
            div class="card-body" {
                (body)
            }
        }
    }
}

pub fn metric_card(label: &str, value: &str) -> Markup {
    html! {
        div class="metric" {
            div class="metric-label" { (label) }
            div class="metric-value" { (value) }
        }
    }
}

/// Three-segment indicator with `active` (0, 1 or 2) highlighted.
pub fn status_bar(title: &str, labels: [&str; 3], active: usize) -> Markup {
    html! {
        div class="status-bar" {
            div class="status-title" { (title) }
            div class="status-segments" {
                @for (i, label) in labels.iter().enumerate() {
                    div class=(segment_class(i, active)) { (label) }
                }
            }
        }
    }
}

fn segment_class(i: usize, active: usize) -> String {
    if i == active {
        format!("segment segment-{i} active")
    } else {
        format!("segment segment-{i}")
    }
}

pub fn flag_lists(red: &[String], green: &[String]) -> Markup {
    html! {
        div class="flags" {
            div class="flag-column red" {
                h3 { "Red Flags" }
                @if red.is_empty() {
                    p class="muted" { "No major concerns identified" }
                } @else {
                    ul { @for flag in red { li { (flag) } } }
                }
            }
            div class="flag-column green" {
                h3 { "Green Flags" }
                @if green.is_empty() {
                    p class="muted" { "No standout positives identified" }
                } @else {
                    ul { @for flag in green { li { (flag) } } }
                }
            }
        }
    }
}

pub fn property_header(subject: &SubjectProperty) -> Markup {
    let mut facts = Vec::new();
    if let Some(beds) = subject.bedrooms {
        facts.push(format!("{beds} bd"));
    }
    if let Some(baths) = subject.bathrooms {
        facts.push(format!("{baths} ba"));
    }
    if let Some(sqft) = subject.sqft {
        facts.push(format!("{} sqft", grouped(sqft)));
    }
    if let Some(year) = subject.year_built {
        facts.push(format!("Built {year}"));
    }

    html! {
        div class="property-header" {
            @if let Some(photo) = subject.photos.first() {
                img class="property-photo" src=(photo) alt="Property photo";
            }
            div {
                h1 { (subject.address) }
                @if let Some(price) = subject.list_price {
                    p class="price" { (money(price)) }
                }
                @if !facts.is_empty() {
                    p class="facts" { (facts.join(" · ")) }
                }
            }
        }
        (status_and_pricing(subject))
    }
}

/// Listing status, the prices on record, and where the facts came from.
pub fn status_and_pricing(subject: &SubjectProperty) -> Markup {
    let mut prices: Vec<(&str, String)> = Vec::new();
    if let Some(active) = subject.active_price {
        prices.push(("Active Price", money(active)));
    }
    if let Some(sold) = subject.last_sale_price {
        let value = match subject.last_sale_date {
            Some(date) => format!("{} ({})", money(sold), date.format("%b %Y")),
            None => money(sold),
        };
        prices.push(("Sold Price", value));
    }
    if let Some(listed) = subject
        .last_listed_price
        .filter(|p| Some(*p) != subject.active_price)
    {
        prices.push(("Last Listed", money(listed)));
    }
    if prices.is_empty() {
        if let Some(list) = subject.list_price {
            prices.push(("List Price", money(list)));
        }
    }

    html! {
        section class="two-col status-pricing" {
            div {
                h3 { "Status" }
                @match subject.status {
                    Some(status) => {
                        div class=(format!("status-badge {}", status.css_class())) { (status.label()) }
                    }
                    None => {
                        div class="status-badge status-unknown" { "Status Unknown" }
                    }
                }
                @if let Some(source) = &subject.data_source {
                    p class="muted" { "Source: " (source) }
                }
            }
            div {
                h3 { "Pricing Information" }
                @if prices.is_empty() {
                    p class="muted" { "Price information not available" }
                } @else {
                    dl class="price-list" {
                        @for (label, value) in &prices {
                            dt { (label) }
                            dd { (value) }
                        }
                    }
                }
                @if subject.priced_from_last_sale() {
                    p class="notice warning" {
                        "Not currently listed. Figures below use the last sale price, which may be well out of date."
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PropertyStatus;
    use chrono::NaiveDate;

    #[test]
    fn off_market_home_says_it_is_priced_from_last_sale() {
        let subject = SubjectProperty {
            list_price: Some(455_000.0),
            status: Some(PropertyStatus::OffMarket),
            last_sale_price: Some(455_000.0),
            last_sale_date: NaiveDate::from_ymd_opt(2011, 5, 20),
            last_listed_price: Some(469_000.0),
            data_source: Some("RentCast".into()),
            ..SubjectProperty::with_address("77 Grove St")
        };
        let html = status_and_pricing(&subject).into_string();

        assert!(html.contains("Off Market"));
        assert!(html.contains("status-off-market"));
        assert!(html.contains("Source: RentCast"));
        assert!(html.contains("$455,000 (May 2011)"));
        assert!(html.contains("Last Listed"));
        assert!(html.contains("$469,000"));
        assert!(html.contains("last sale price"));
        assert!(!html.contains("Active Price"));
    }

    #[test]
    fn active_listing_hides_matching_last_listed_price() {
        let subject = SubjectProperty {
            list_price: Some(520_000.0),
            status: Some(PropertyStatus::Active),
            active_price: Some(520_000.0),
            last_listed_price: Some(520_000.0),
            ..SubjectProperty::with_address("9 Vine St")
        };
        let html = status_and_pricing(&subject).into_string();

        assert!(html.contains("Active Price"));
        assert!(!html.contains("Last Listed"));
        assert!(!html.contains("last sale price"));
    }

    #[test]
    fn bare_address_shows_unknowns() {
        let html = status_and_pricing(&SubjectProperty::with_address("1 A St")).into_string();
        assert!(html.contains("Status Unknown"));
        assert!(html.contains("Price information not available"));
    }
}
