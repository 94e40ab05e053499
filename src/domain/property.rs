// src/domain/property.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Which question the user is asking about a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flow {
    Rent,
    Buy,
    Sell,
    Investment,
}

impl Flow {
    pub const ALL: [Flow; 4] = [Flow::Rent, Flow::Buy, Flow::Sell, Flow::Investment];

    pub fn from_slug(slug: &str) -> Option<Flow> {
        match slug {
            "rent" => Some(Flow::Rent),
            "buy" => Some(Flow::Buy),
            "sell" => Some(Flow::Sell),
            "investment" => Some(Flow::Investment),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Flow::Rent => "rent",
            Flow::Buy => "buy",
            Flow::Sell => "sell",
            Flow::Investment => "investment",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Flow::Rent => "Rent Evaluation",
            Flow::Buy => "Buy Evaluation",
            Flow::Sell => "Sell Evaluation",
            Flow::Investment => "Investment Analysis",
        }
    }
}

/// Market status of the subject itself, as reported by a data provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyStatus {
    Active,
    Pending,
    Sold,
    OffMarket,
}

impl PropertyStatus {
    /// Anything the provider does not call active, pending or sold is off
    /// the market.
    pub fn from_listing_status(raw: Option<&str>) -> PropertyStatus {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("active") => PropertyStatus::Active,
            Some("pending") => PropertyStatus::Pending,
            Some("sold") => PropertyStatus::Sold,
            _ => PropertyStatus::OffMarket,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PropertyStatus::Active => "Active",
            PropertyStatus::Pending => "Pending",
            PropertyStatus::Sold => "Sold",
            PropertyStatus::OffMarket => "Off Market",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            PropertyStatus::Active => "status-active",
            PropertyStatus::Pending => "status-pending",
            PropertyStatus::Sold => "status-sold",
            PropertyStatus::OffMarket => "status-off-market",
        }
    }
}

/// The property being evaluated.
///
/// Built once per evaluation from whatever source produced the facts
/// (listing scrape, data provider, or a bare address) and never mutated
/// afterwards; enrichment produces a new value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubjectProperty {
    pub address: String,
    pub property_type: Option<String>,
    pub bedrooms: Option<f64>,
    pub bathrooms: Option<f64>,
    pub sqft: Option<f64>,
    pub lot_size_sqft: Option<f64>,
    pub year_built: Option<i32>,
    /// Price the evaluation runs on: the asking price when listed, otherwise
    /// the last sale price. `active_price` and `last_sale_price` say which.
    pub list_price: Option<f64>,
    pub rent_estimate: Option<f64>,

    // Status and price history
    #[serde(default)]
    pub status: Option<PropertyStatus>,
    #[serde(default)]
    pub active_price: Option<f64>,
    #[serde(default)]
    pub last_sale_price: Option<f64>,
    #[serde(default)]
    pub last_sale_date: Option<NaiveDate>,
    #[serde(default)]
    pub last_listed_price: Option<f64>,
    /// Where the facts came from, e.g. "RentCast" or "Listing page".
    #[serde(default)]
    pub data_source: Option<String>,

    // Location
    pub lat: Option<f64>,
    pub lon: Option<f64>,

    // Carrying costs
    pub hoa_monthly: Option<f64>,
    pub taxes_annual: Option<f64>,

    pub days_on_market: Option<u32>,
    pub description: Option<String>,
    #[serde(default)]
    pub photos: Vec<String>,
}

impl SubjectProperty {
    pub fn with_address(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Default::default()
        }
    }

    /// Price per square foot, when both numbers are usable.
    pub fn price_per_sqft(&self) -> Option<f64> {
        let price = self.list_price.filter(|p| p.is_finite() && *p > 0.0)?;
        let sqft = self.sqft.filter(|s| s.is_finite() && *s > 0.0)?;
        Some(price / sqft)
    }

    /// True when there is no asking price and `list_price` is a past sale.
    pub fn priced_from_last_sale(&self) -> bool {
        self.active_price.is_none()
            && self.list_price.is_some()
            && self.list_price == self.last_sale_price
    }

    /// Fills every empty field of `self` from `other`.
    /// Fields already present on `self` win.
    pub fn merged_with(self, other: SubjectProperty) -> SubjectProperty {
        SubjectProperty {
            address: if self.address.trim().is_empty() {
                other.address
            } else {
                self.address
            },
            property_type: self.property_type.or(other.property_type),
            bedrooms: self.bedrooms.or(other.bedrooms),
            bathrooms: self.bathrooms.or(other.bathrooms),
            sqft: self.sqft.or(other.sqft),
            lot_size_sqft: self.lot_size_sqft.or(other.lot_size_sqft),
            year_built: self.year_built.or(other.year_built),
            list_price: self.list_price.or(other.list_price),
            rent_estimate: self.rent_estimate.or(other.rent_estimate),
            status: self.status.or(other.status),
            active_price: self.active_price.or(other.active_price),
            last_sale_price: self.last_sale_price.or(other.last_sale_price),
            last_sale_date: self.last_sale_date.or(other.last_sale_date),
            last_listed_price: self.last_listed_price.or(other.last_listed_price),
            data_source: match (self.data_source, other.data_source) {
                (Some(a), Some(b)) if a != b => Some(format!("{a} + {b}")),
                (a, b) => a.or(b),
            },
            lat: self.lat.or(other.lat),
            lon: self.lon.or(other.lon),
            hoa_monthly: self.hoa_monthly.or(other.hoa_monthly),
            taxes_annual: self.taxes_annual.or(other.taxes_annual),
            days_on_market: self.days_on_market.or(other.days_on_market),
            description: self.description.or(other.description),
            photos: if self.photos.is_empty() {
                other.photos
            } else {
                self.photos
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    Active,
    Sold,
}

/// A similar property used as a market-price reference point.
///
/// Numeric fields are optional because providers routinely omit them;
/// the stats engine skips what it cannot use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparableListing {
    pub address: Option<String>,
    pub status: ListingStatus,
    pub price: Option<f64>,
    pub sqft: Option<f64>,
    pub days_on_market: Option<f64>,
    pub sale_date: Option<NaiveDate>,
    pub distance_miles: Option<f64>,
    pub bedrooms: Option<f64>,
    pub bathrooms: Option<f64>,
}

impl ComparableListing {
    pub fn price_per_sqft(&self) -> Option<f64> {
        let price = self.price.filter(|p| p.is_finite() && *p > 0.0)?;
        let sqft = self.sqft.filter(|s| s.is_finite() && *s > 0.0)?;
        Some(price / sqft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flow_slugs_round_trip() {
        for flow in Flow::ALL {
            assert_eq!(Flow::from_slug(flow.as_str()), Some(flow));
        }
        assert_eq!(Flow::from_slug("lease"), None);
    }

    #[test]
    fn merge_prefers_existing_fields() {
        let scraped = SubjectProperty {
            address: "12 Oak St, Springfield, IL".into(),
            list_price: Some(410_000.0),
            ..Default::default()
        };
        let provider = SubjectProperty {
            address: "12 Oak Street, Springfield, IL 62701".into(),
            list_price: Some(399_000.0),
            sqft: Some(1_650.0),
            year_built: Some(1994),
            ..Default::default()
        };

        let merged = scraped.merged_with(provider);
        assert_eq!(merged.address, "12 Oak St, Springfield, IL");
        assert_eq!(merged.list_price, Some(410_000.0));
        assert_eq!(merged.sqft, Some(1_650.0));
        assert_eq!(merged.year_built, Some(1994));
    }

    #[test]
    fn merge_combines_sources_and_keeps_sale_history() {
        let scraped = SubjectProperty {
            list_price: Some(410_000.0),
            data_source: Some("Listing page".into()),
            ..SubjectProperty::with_address("12 Oak St")
        };
        let provider = SubjectProperty {
            status: Some(PropertyStatus::OffMarket),
            last_sale_price: Some(250_000.0),
            last_sale_date: NaiveDate::from_ymd_opt(2012, 6, 1),
            data_source: Some("RentCast".into()),
            ..SubjectProperty::with_address("12 Oak Street")
        };

        let merged = scraped.merged_with(provider);
        assert_eq!(merged.list_price, Some(410_000.0));
        assert_eq!(merged.last_sale_price, Some(250_000.0));
        assert_eq!(merged.status, Some(PropertyStatus::OffMarket));
        assert_eq!(merged.data_source.as_deref(), Some("Listing page + RentCast"));
        assert!(!merged.priced_from_last_sale());
    }

    #[test]
    fn listing_status_defaults_to_off_market() {
        assert_eq!(PropertyStatus::from_listing_status(Some("Active")), PropertyStatus::Active);
        assert_eq!(PropertyStatus::from_listing_status(Some("pending")), PropertyStatus::Pending);
        assert_eq!(PropertyStatus::from_listing_status(Some("Inactive")), PropertyStatus::OffMarket);
        assert_eq!(PropertyStatus::from_listing_status(None), PropertyStatus::OffMarket);
    }

    #[test]
    fn price_per_sqft_needs_both_numbers() {
        let mut subject = SubjectProperty::with_address("1 A St");
        assert_eq!(subject.price_per_sqft(), None);
        subject.list_price = Some(300_000.0);
        assert_eq!(subject.price_per_sqft(), None);
        subject.sqft = Some(1_500.0);
        assert_eq!(subject.price_per_sqft(), Some(200.0));
    }
}
