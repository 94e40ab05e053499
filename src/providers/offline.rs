use crate::domain::{AreaSnapshot, ComparableListing, SubjectProperty};
use crate::providers::{MarketDataProvider, ProviderError};

/// Used when no data-provider credentials are configured.
///
/// Knows nothing, so evaluations run on the user's own input and the stats
/// engine's synthetic comp pool. It never invents trends.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineProvider;

impl MarketDataProvider for OfflineProvider {
    fn name(&self) -> &'static str {
        "offline"
    }

    fn property_facts(&self, _address: &str) -> Result<Option<SubjectProperty>, ProviderError> {
        Ok(None)
    }

    fn area_snapshot(
        &self,
        _subject: &SubjectProperty,
    ) -> Result<Option<AreaSnapshot>, ProviderError> {
        Ok(None)
    }

    fn comparables(
        &self,
        _subject: &SubjectProperty,
        _limit: usize,
    ) -> Result<Vec<ComparableListing>, ProviderError> {
        Ok(Vec::new())
    }
}
