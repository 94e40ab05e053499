use crate::analysis::stats::positive;
use crate::domain::{ComparableListing, ListingStatus, PropertyStatus, SubjectProperty};
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::BTreeMap;

// RentCast payloads, trimmed to the fields we read.
//
// property
//  ├── formattedAddress
//  ├── latitude / longitude
//  ├── bedrooms / bathrooms / squareFootage / lotSize
//  ├── yearBuilt / propertyType
//  ├── listingStatus / price
//  ├── lastSalePrice / lastSaleDate / lastListPrice
//  ├── hoa
//  │    └── fee
//  └── propertyTaxes
//       └── "<year>"
//            └── total
//
// value estimate
//  ├── price
//  └── comparables[]
//
// market
//  └── saleData
//       ├── medianPrice
//       └── history
//            └── "YYYY-MM"
//                 └── medianPrice

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyRecord {
    pub formatted_address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub bedrooms: Option<f64>,
    pub bathrooms: Option<f64>,
    pub square_footage: Option<f64>,
    pub lot_size: Option<f64>,
    pub year_built: Option<i32>,
    pub property_type: Option<String>,
    pub listing_status: Option<String>,
    pub price: Option<f64>,
    pub last_sale_price: Option<f64>,
    pub last_sale_date: Option<String>,
    pub last_list_price: Option<f64>,
    pub hoa: Option<Hoa>,
    #[serde(default)]
    pub property_taxes: BTreeMap<String, TaxRecord>,
}

#[derive(Debug, Deserialize)]
pub struct Hoa {
    pub fee: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct TaxRecord {
    pub total: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct ValueEstimate {
    pub price: Option<f64>,
    #[serde(default)]
    pub comparables: Vec<Comparable>,
}

#[derive(Debug, Deserialize)]
pub struct RentEstimate {
    pub rent: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparable {
    pub formatted_address: Option<String>,
    pub price: Option<f64>,
    pub square_footage: Option<f64>,
    pub bedrooms: Option<f64>,
    pub bathrooms: Option<f64>,
    pub days_on_market: Option<f64>,
    pub distance: Option<f64>,
    pub status: Option<String>,
    pub removed_date: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketResponse {
    pub sale_data: Option<SaleData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleData {
    pub median_price: Option<f64>,
    #[serde(default)]
    pub history: BTreeMap<String, SaleHistoryPoint>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleHistoryPoint {
    pub median_price: Option<f64>,
}

impl PropertyRecord {
    /// Flattens a provider record into our subject model. `fallback_address`
    /// is used when the provider has no formatted address.
    ///
    /// The evaluation price is the asking price of an active listing, else
    /// the last sale price; both are kept so the page can say which.
    pub fn into_subject(self, fallback_address: &str) -> SubjectProperty {
        let status = PropertyStatus::from_listing_status(self.listing_status.as_deref());
        let active_price = match status {
            PropertyStatus::Active => positive(self.price),
            _ => None,
        };
        let last_sale_price = positive(self.last_sale_price);

        // BTreeMap keys are years, so the last entry is the latest bill.
        let taxes_annual = self
            .property_taxes
            .values()
            .rev()
            .find_map(|t| positive(t.total));

        SubjectProperty {
            address: self
                .formatted_address
                .filter(|a| !a.trim().is_empty())
                .unwrap_or_else(|| fallback_address.to_string()),
            property_type: self.property_type,
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            sqft: self.square_footage,
            lot_size_sqft: self.lot_size,
            year_built: self.year_built,
            list_price: active_price.or(last_sale_price),
            rent_estimate: None,
            status: Some(status),
            active_price,
            last_sale_price,
            last_sale_date: self.last_sale_date.as_deref().and_then(parse_date),
            last_listed_price: positive(self.last_list_price),
            data_source: Some("RentCast".to_string()),
            lat: self.latitude,
            lon: self.longitude,
            hoa_monthly: self.hoa.and_then(|h| h.fee),
            taxes_annual,
            days_on_market: None,
            description: None,
            photos: Vec::new(),
        }
    }
}

impl Comparable {
    /// Anything still listed as active counts as supply; everything that
    /// came off the market counts as a recent sale.
    pub fn into_listing(self) -> ComparableListing {
        let is_active = self
            .status
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case("active"))
            && self.removed_date.is_none();

        ComparableListing {
            address: self.formatted_address,
            status: if is_active {
                ListingStatus::Active
            } else {
                ListingStatus::Sold
            },
            price: self.price,
            sqft: self.square_footage,
            days_on_market: self.days_on_market,
            sale_date: self.removed_date.as_deref().and_then(parse_date),
            distance_miles: self.distance,
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
        }
    }
}

/// Accepts `2024-03-05` or an RFC 3339 timestamp starting with the date.
fn parse_date(s: &str) -> Option<NaiveDate> {
    let date = s.get(..10)?;
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

/// Percent change of the median price between the latest month in the
/// history and the month `months_back` before it. `None` unless both
/// months are present; gaps are never interpolated.
pub fn history_trend_pct(
    history: &BTreeMap<String, SaleHistoryPoint>,
    months_back: u32,
) -> Option<f64> {
    let (latest_key, latest) = history.iter().next_back()?;
    let latest_price = positive(latest.median_price)?;

    let (year, month) = latest_key.split_once('-')?;
    let year: i32 = year.parse().ok()?;
    let month: i32 = month.get(..2)?.parse().ok()?;

    let total = year * 12 + (month - 1) - months_back as i32;
    let earlier_key = format!("{:04}-{:02}", total.div_euclid(12), total.rem_euclid(12) + 1);

    let earlier_price = positive(history.get(&earlier_key)?.median_price)?;
    Some((latest_price - earlier_price) / earlier_price * 100.0)
}
