//! Plain-language summaries of a finished evaluation.

mod heuristic;
mod openai;

use crate::domain::{Flow, FlowDetails, MarketStats, PricePosition, SubjectProperty};
use thiserror::Error;
use tracing::warn;

pub use heuristic::HeuristicNarrator;
pub use openai::OpenAiNarrator;

#[derive(Debug, Error)]
pub enum NarrativeError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Narrative service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Unusable narrative response: {0}")]
    BadResponse(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Everything a narrator may talk about.
pub struct NarrativeContext<'a> {
    pub flow: Flow,
    pub subject: &'a SubjectProperty,
    pub stats: &'a MarketStats,
    pub price_position: PricePosition,
    pub details: &'a FlowDetails,
}

pub trait Narrator: Send + Sync {
    fn name(&self) -> &'static str;

    fn summarize(&self, ctx: &NarrativeContext) -> Result<String, NarrativeError>;
}

/// Runs `narrator`, falling back to the heuristic text on any failure or
/// an empty answer.
pub fn narrate(narrator: &dyn Narrator, ctx: &NarrativeContext) -> String {
    match narrator.summarize(ctx) {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => {
            warn!(narrator = narrator.name(), "empty narrative, using heuristic text");
            HeuristicNarrator.summary(ctx)
        }
        Err(e) => {
            warn!(narrator = narrator.name(), error = %e, "narrative failed, using heuristic text");
            HeuristicNarrator.summary(ctx)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::compute_market_stats;

    struct Broken;

    impl Narrator for Broken {
        fn name(&self) -> &'static str {
            "broken"
        }

        fn summarize(&self, _ctx: &NarrativeContext) -> Result<String, NarrativeError> {
            Err(NarrativeError::Network("connection refused".into()))
        }
    }

    struct Blank;

    impl Narrator for Blank {
        fn name(&self) -> &'static str {
            "blank"
        }

        fn summarize(&self, _ctx: &NarrativeContext) -> Result<String, NarrativeError> {
            Ok("  ".into())
        }
    }

    #[test]
    fn failures_fall_back_to_heuristic_text() {
        let subject = SubjectProperty::with_address("1 Test Way");
        let stats = compute_market_stats(&subject, &[]);
        let details = FlowDetails::Rent {
            estimated_rent: 2_500.0,
            condition: "Unknown".into(),
        };
        let ctx = NarrativeContext {
            flow: Flow::Rent,
            subject: &subject,
            stats: &stats,
            price_position: stats.price_position,
            details: &details,
        };

        let expected = HeuristicNarrator.summary(&ctx);
        assert_eq!(narrate(&Broken, &ctx), expected);
        assert_eq!(narrate(&Blank, &ctx), expected);
    }
}
