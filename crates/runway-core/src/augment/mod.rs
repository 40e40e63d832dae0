//! Pluggable suggestion augmentation
//!
//! The suggestion engine can hand its context to an external service that
//! returns zero or more additional suggestions. The backend is a trait so
//! the core never needs network access in tests:
//!
//! - `HttpAugmentor`: POSTs a prompt to a configured endpoint
//! - `NoopAugmentor`: default when no endpoint is configured
//! - `MockAugmentor`: canned responses for tests
//!
//! Augmentation is best-effort by contract: any failure is recovered as
//! "no suggestions" and must never fail the analysis.

mod http;
mod mock;

pub use http::HttpAugmentor;
pub use mock::MockAugmentor;

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{MonthKey, ResolvedGoal, Suggestion};

/// Everything a backend may use to tailor its suggestions.
#[derive(Debug, Clone)]
pub struct AugmentContext<'a> {
    pub goal: &'a ResolvedGoal,
    /// Per-category monthly spend over the baseline window
    pub category_history: &'a BTreeMap<String, Vec<f64>>,
    pub baseline_months: &'a [MonthKey],
    /// Median monthly capacity
    pub p50: f64,
    /// Monthly funding gap the suggestions should help close
    pub gap: f64,
}

/// A source of additional suggestions.
#[async_trait]
pub trait SuggestionAugmentor: Send + Sync {
    /// Produce additional suggestions for the given analysis context.
    ///
    /// Callers treat any error as an empty result.
    async fn generate(&self, ctx: &AugmentContext<'_>) -> Result<Vec<Suggestion>>;
}

/// Augmentor that never produces suggestions. Used when no endpoint is
/// configured.
pub struct NoopAugmentor;

#[async_trait]
impl SuggestionAugmentor for NoopAugmentor {
    async fn generate(&self, _ctx: &AugmentContext<'_>) -> Result<Vec<Suggestion>> {
        Ok(Vec::new())
    }
}
