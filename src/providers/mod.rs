//! Sources of property facts, area figures and comparable listings.
//!
//! Which implementation runs is decided once at startup (see
//! `app::Services::from_config`); the evaluation pipeline only sees the trait.

pub mod geocode;
mod models;
mod offline;
mod rentcast;

use crate::domain::{AreaSnapshot, ComparableListing, SubjectProperty};
use thiserror::Error;

pub use offline::OfflineProvider;
pub use rentcast::RentCastProvider;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Unexpected data shape: {0}")]
    Deserialize(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub trait MarketDataProvider: Send + Sync {
    /// Short name for logs and the result page.
    fn name(&self) -> &'static str;

    /// Public-record facts for an address, if the provider knows it.
    fn property_facts(&self, address: &str) -> Result<Option<SubjectProperty>, ProviderError>;

    /// Area-level figures (trends, medians) around the subject.
    fn area_snapshot(
        &self,
        subject: &SubjectProperty,
    ) -> Result<Option<AreaSnapshot>, ProviderError>;

    /// Up to `limit` comparable listings. An empty result is normal.
    fn comparables(
        &self,
        subject: &SubjectProperty,
        limit: usize,
    ) -> Result<Vec<ComparableListing>, ProviderError>;
}
