//! Runway Core Library
//!
//! Shared functionality for the Runway savings goal forecaster:
//! - CSV ingestion for transaction history
//! - Calendar-month cash-flow aggregation
//! - Empirical-quantile capacity forecasting and goal classification
//! - Heuristic free-text goal parsing (amount + deadline extraction)
//! - Gap-closing suggestion engine with pluggable augmentation backends

pub mod aggregate;
pub mod augment;
pub mod config;
pub mod error;
pub mod forecast;
pub mod goal_text;
pub mod import;
pub mod models;
pub mod stats;
pub mod suggest;

pub use augment::{
    AugmentContext, HttpAugmentor, MockAugmentor, NoopAugmentor, SuggestionAugmentor,
};
pub use config::AnalysisConfig;
pub use error::{Error, Result};
pub use forecast::ForecastEngine;
pub use goal_text::{GoalTextParser, ParsedGoal};
pub use models::{
    ForecastResult, GoalRequest, GoalStatus, LeverType, MonthKey, MonthlyAggregate, ResolvedGoal,
    Suggestion, Transaction,
};
pub use suggest::SuggestionEngine;
