//! HTTP augmentation backend
//!
//! POSTs a financial-wellness prompt to a configured endpoint and expects a
//! JSON array of suggestions back. The endpoint is typically an LLM proxy;
//! the prompt constrains tone (supportive, non-judgmental) and shape.
//!
//! # Configuration
//!
//! Environment variables:
//! - `RUNWAY_AUGMENT_URL`: endpoint address (unset = augmentation skipped)
//! - `RUNWAY_AUGMENT_KEY`: optional bearer credential

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::debug;

use crate::error::Result;
use crate::models::Suggestion;
use crate::stats::{median, round_cents};

use super::{AugmentContext, SuggestionAugmentor};

pub struct HttpAugmentor {
    http_client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpAugmentor {
    pub fn new(endpoint: &str) -> Self {
        Self {
            http_client: Client::new(),
            endpoint: endpoint.to_string(),
            api_key: None,
        }
    }

    pub fn with_api_key(endpoint: &str, api_key: &str) -> Self {
        Self {
            http_client: Client::new(),
            endpoint: endpoint.to_string(),
            api_key: Some(api_key.to_string()),
        }
    }

    /// Build from `RUNWAY_AUGMENT_URL` / `RUNWAY_AUGMENT_KEY`.
    ///
    /// Returns None when no endpoint is configured; callers should fall
    /// back to `NoopAugmentor`.
    pub fn from_env() -> Option<Self> {
        let endpoint = std::env::var("RUNWAY_AUGMENT_URL").ok()?;
        if endpoint.trim().is_empty() {
            return None;
        }
        let api_key = std::env::var("RUNWAY_AUGMENT_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());
        Some(Self {
            http_client: Client::new(),
            endpoint,
            api_key,
        })
    }

    fn build_prompt(&self, ctx: &AugmentContext<'_>) -> String {
        let mut by_median: Vec<(&String, f64)> = ctx
            .category_history
            .iter()
            .map(|(category, spends)| (category, median(spends)))
            .collect();
        by_median.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        let category_breakdown = by_median
            .iter()
            .map(|(category, med)| format!("{category}: ${med:.2}"))
            .collect::<Vec<_>>()
            .join("\n");

        let mut by_variance: Vec<(&String, f64)> = ctx
            .category_history
            .iter()
            .map(|(category, spends)| (category, sample_variance(spends)))
            .collect();
        by_variance.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        let high_variance = by_variance
            .iter()
            .take(5)
            .map(|(category, _)| category.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        let subscriptions = if ctx.category_history.contains_key("Subscriptions") {
            "Subscriptions present"
        } else {
            "None detected"
        };

        let protected = if ctx.goal.protected_categories.is_empty() {
            "(none)".to_string()
        } else {
            ctx.goal.protected_categories.join(", ")
        };

        format!(
            "Role: You are a financial wellness assistant focused on supportive, non-judgmental guidance.\n\
             Context:\n\n\
             Goal:\n\
             Target: ${target:.2}\n\
             Deadline: {months} months\n\
             Monthly gap to close: ${gap:.2}\n\
             Spending summary (last {history_months} months):\n\
             {category_breakdown}\n\
             Detected patterns:\n\
             High-variance categories: {high_variance}\n\
             Recurring subscriptions: {subscriptions}\n\
             User preferences:\n\
             Protected categories: {protected}\n\
             Constraints:\n\n\
             Avoid shaming, judgment, or absolute language.\n\
             Avoid generic advice like \"spend less\" or \"cap category\".\n\
             Do not recommend cuts to essentials (e.g., rent, groceries, utilities) unless explicitly allowed.\n\
             No financial or investment advice.\n\
             Suggest small, concrete behavior changes, framed as optional tradeoffs.\n\
             Quantify estimated monthly impact when possible; be transparent about uncertainty and assumptions.\n\
             Task:\n\n\
             Generate 3-5 personalized spending adjustment suggestions that could realistically help close the monthly gap.\n\
             Each suggestion must include a short friendly title, a concrete behavioral change, an estimated monthly impact, \
             and a brief rationale, plus lever metadata.\n\
             Output (JSON array of suggestions):\n\
             [\n  {{\n    \"title\": \"...\",\n    \"action\": \"...\",\n    \"impactPerMonth\": 0.00,\n    \"rationale\": \"...\",\n    \"leverType\": \"variable_trim|subscription_cleanup|income|timeline\",\n    \"newMonthsToDeadline\": 11,\n    \"newRequiredMonthly\": 273.00\n  }}\n]\n\
             Notes:\n\n\
             If protected categories include a candidate category, skip it.\n\
             Use recent spend medians and typical amounts to estimate impact; state uncertainty.\n",
            target = ctx.goal.target_amount,
            months = ctx.goal.months_to_deadline,
            gap = round_cents(ctx.gap),
            history_months = ctx.baseline_months.len(),
        )
    }
}

#[async_trait]
impl SuggestionAugmentor for HttpAugmentor {
    async fn generate(&self, ctx: &AugmentContext<'_>) -> Result<Vec<Suggestion>> {
        let prompt = self.build_prompt(ctx);
        debug!(endpoint = %self.endpoint, "Requesting augmentation suggestions");

        let mut request = self
            .http_client
            .post(&self.endpoint)
            .json(&json!({ "prompt": prompt }));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?.error_for_status()?;
        let suggestions: Vec<Suggestion> = response.json().await?;
        Ok(suggestions)
    }
}

/// Sample variance (n-1 denominator); fewer than two points yield 0.
fn sample_variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    sum_sq / (values.len() - 1) as f64
}
