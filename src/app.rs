// src/app.rs
use std::time::Duration;
use tracing::{info, warn};

use crate::config::Config;
use crate::db::Database;
use crate::narrative::{HeuristicNarrator, Narrator, OpenAiNarrator};
use crate::providers::{MarketDataProvider, OfflineProvider, RentCastProvider};
use crate::scraper::{ListingScraper, ScraperError};

/// Outbound collaborators of the evaluation pipeline. Built once at startup
/// and shared read-only by every worker.
pub struct Services {
    pub provider: Box<dyn MarketDataProvider>,
    pub narrator: Box<dyn Narrator>,
    pub scraper: ListingScraper,
    pub comps_limit: usize,
}

impl Services {
    pub fn new(
        provider: Box<dyn MarketDataProvider>,
        narrator: Box<dyn Narrator>,
        scraper: ListingScraper,
        comps_limit: usize,
    ) -> Self {
        Self {
            provider,
            narrator,
            scraper,
            comps_limit,
        }
    }

    /// Picks real clients where credentials are configured and the offline
    /// or heuristic stand-ins everywhere else.
    pub fn from_config(config: &Config) -> Result<Self, ScraperError> {
        let timeout = Duration::from_secs(config.http_timeout_secs);

        let provider: Box<dyn MarketDataProvider> = match &config.rentcast_api_key {
            Some(key) => match RentCastProvider::new(
                key.clone(),
                config.rentcast_base_url.clone(),
                timeout,
            ) {
                Ok(p) => Box::new(p),
                Err(e) => {
                    warn!(error = %e, "RentCast client unavailable, using offline data");
                    Box::new(OfflineProvider)
                }
            },
            None => Box::new(OfflineProvider),
        };

        let narrator: Box<dyn Narrator> = match &config.openai_api_key {
            Some(key) => match OpenAiNarrator::new(
                key.clone(),
                config.openai_base_url.clone(),
                config.openai_model.clone(),
                timeout,
            ) {
                Ok(n) => Box::new(n),
                Err(e) => {
                    warn!(error = %e, "OpenAI client unavailable, using heuristic summaries");
                    Box::new(HeuristicNarrator)
                }
            },
            None => Box::new(HeuristicNarrator),
        };

        info!(
            provider = provider.name(),
            narrator = narrator.name(),
            comps_limit = config.comps_limit,
            "services selected"
        );

        Ok(Self::new(
            provider,
            narrator,
            ListingScraper::new(timeout)?,
            config.comps_limit,
        ))
    }
}

/// Everything a request handler needs.
pub struct App {
    pub db: Database,
    pub services: Services,
}

impl App {
    pub fn new(db: Database, services: Services) -> Self {
        Self { db, services }
    }
}
