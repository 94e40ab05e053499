use crate::domain::{Flow, FlowDetails};
use crate::format::{days, money, percent, signed_pct};
use crate::narrative::{NarrativeContext, NarrativeError, Narrator};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::debug;

// Request / response bodies for the chat completions endpoint, trimmed to
// what we send and read.

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct SummaryPayload {
    summary: Option<String>,
}

pub struct OpenAiNarrator {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiNarrator {
    pub fn new(
        api_key: String,
        base_url: String,
        model: String,
        timeout: Duration,
    ) -> Result<Self, NarrativeError> {
        if api_key.trim().is_empty() {
            return Err(NarrativeError::Config("OpenAI API key is empty".into()));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NarrativeError::Network(e.to_string()))?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        })
    }
}

impl Narrator for OpenAiNarrator {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn summarize(&self, ctx: &NarrativeContext) -> Result<String, NarrativeError> {
        let start = Instant::now();

        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt(ctx.flow),
                },
                ChatMessage {
                    role: "user",
                    content: build_context(ctx),
                },
            ],
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .map_err(|e| NarrativeError::Network(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .map_err(|e| NarrativeError::Network(e.to_string()))?;

        debug!(status = status.as_u16(), elapsed = ?start.elapsed(), "chat completion response");

        if !status.is_success() {
            return Err(NarrativeError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        extract_summary(&text)
    }
}

fn system_prompt(flow: Flow) -> String {
    format!(
        "You are a real estate expert providing insights for a {} evaluation. \
         Provide a concise, actionable 4-6 sentence summary that helps the user make an \
         informed decision. Focus on pricing, market conditions, financial viability and \
         notable risks or opportunities. Be professional but conversational. \
         Respond in JSON format with a 'summary' field.",
        flow.as_str()
    )
}

/// One line of `label: value` pairs describing the evaluation.
fn build_context(ctx: &NarrativeContext) -> String {
    let subject = ctx.subject;
    let stats = ctx.stats;

    let mut parts = vec![
        format!("Flow: {}", ctx.flow.as_str()),
        format!("Property: {}", subject.address),
    ];

    if let Some(price) = subject.list_price {
        parts.push(format!("Price: {}", money(price)));
    }
    if let (Some(beds), Some(baths)) = (subject.bedrooms, subject.bathrooms) {
        parts.push(format!("{beds} bed, {baths} bath"));
    }
    if let Some(sqft) = subject.sqft {
        parts.push(format!("{sqft} sqft"));
    }

    if let Some(median) = stats.median_price {
        parts.push(format!("Area median: {}", money(median)));
    }
    if stats.median_days_on_market.is_some() {
        parts.push(format!("Median DOM: {} days", days(stats.median_days_on_market)));
    }
    if let Some(trend) = stats.trend_12m_pct {
        parts.push(format!("1yr trend: {}", signed_pct(trend)));
    }
    parts.push(format!("Price position: {}", ctx.price_position.label()));
    parts.push(format!("Demand: {}", stats.demand_level.label()));

    match ctx.details {
        FlowDetails::Rent { estimated_rent, .. } => {
            parts.push(format!("Estimated rent: {}", money(*estimated_rent)));
        }
        FlowDetails::Buy { costs, .. } => {
            if let Some(costs) = costs {
                parts.push(format!("Monthly cost: {}", money(costs.total_monthly)));
            }
        }
        FlowDetails::Sell { pricing, .. } => {
            parts.push(format!("Suggested price: {}", money(pricing.suggested_price)));
        }
        FlowDetails::Investment { metrics, .. } => {
            parts.push(format!("cap_rate: {}", percent(metrics.cap_rate)));
            parts.push(format!("cash_on_cash: {}", percent(metrics.cash_on_cash)));
            parts.push(format!("monthly_noi: {}", money(metrics.monthly_noi)));
        }
    }

    parts.join(" | ")
}

fn extract_summary(body: &str) -> Result<String, NarrativeError> {
    let response: ChatResponse =
        serde_json::from_str(body).map_err(|e| NarrativeError::BadResponse(e.to_string()))?;

    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| NarrativeError::BadResponse("no message content".into()))?;

    let payload: SummaryPayload =
        serde_json::from_str(&content).map_err(|e| NarrativeError::BadResponse(e.to_string()))?;

    payload
        .summary
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| NarrativeError::BadResponse("missing 'summary' field".into()))
}
